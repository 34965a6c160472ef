//! cadastro - terminal registration manager
//!
//! Keeps an in-memory list of registered users, edited through a modal form
//! that can auto-fill address fields from ViaCEP and pick state/municipality
//! from the IBGE locality service.

pub mod cli;
pub mod config;
pub mod models;
pub mod reference;
pub mod registry;
pub mod tui;

#[cfg(test)]
pub(crate) mod test_utils;
