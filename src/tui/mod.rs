//! Terminal user interface for the registration form
//!
//! A records table with a modal form on top. Reference lookups run on tokio
//! tasks and come back through the [`AppEvent`] channel.

pub mod app;
pub mod components;
pub mod events;
pub mod handlers;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::App;
pub use events::AppEvent;
pub use traits::ScreenAction;
