//! Transient form state

use crate::models::{Record, RecordId};

/// Visibility and purpose of the form modal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Closed,
    OpenCreate,
    OpenEdit(RecordId),
}

impl FormMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormMode::Closed)
    }
}

/// The record bound to the open form, plus which stored record it will overwrite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub record: Record,
    /// `None` while creating
    pub editing: Option<RecordId>,
}

impl Draft {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: RecordId, record: Record) -> Self {
        Self {
            record,
            editing: Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}
