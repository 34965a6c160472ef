//! Reusable widgets

pub mod form_field;
pub mod record_table;
pub mod status_display;

pub use form_field::{DropdownOption, Form, FormField, FormFieldType};
pub use record_table::{RecordTable, RecordTableConfig};
pub use status_display::{StatusDisplay, StatusMessage, StatusType};
