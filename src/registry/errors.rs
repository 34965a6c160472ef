//! Registry error types

use thiserror::Error;

use crate::models::RecordId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Record {0} not found")]
    RecordNotFound(RecordId),

    #[error("No form is open")]
    FormClosed,
}
