//! In-memory registration state
//!
//! [`RecordStore`] holds committed records and is only changed by submit and
//! delete; [`Draft`] is the transient copy bound to the open form.
//! [`RegistrationManager`] drives both through explicit commands.

pub mod errors;
pub mod store;
pub mod draft;
pub mod manager;

pub use errors::RegistryError;
pub use store::{RecordStore, StoredRecord};
pub use draft::{Draft, FormMode};
pub use manager::{CityLookupTicket, LookupOutcome, PostalLookupTicket, RegistrationManager};
