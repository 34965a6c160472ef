//! Traits shared by the screens and their widgets

use crate::models::{RecordField, RecordId};

/// What a screen asks the app to do after handling a key
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    OpenCreateForm,
    OpenEditForm(RecordId),
    /// Confirmed deletion of a stored record
    DeleteRecord(RecordId),
    UpdateField(RecordField, String),
    SelectState(String),
    LookupPostalCode,
    SubmitForm,
    CancelForm,
    Quit,
    SetStatus(String),
    SetError(String),
    /// No action taken
    None,
}

/// Widgets with a selectable row
pub trait Navigable {
    fn navigate_up(&mut self);

    fn navigate_down(&mut self);

    fn get_selected_index(&self) -> Option<usize>;

    fn set_selected_index(&mut self, index: Option<usize>);

    fn get_item_count(&self) -> usize;

    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}

/// Multi-field input forms
pub trait FormHandler {
    fn get_current_field(&self) -> usize;

    fn set_current_field(&mut self, field: usize);

    fn get_field_count(&self) -> usize;

    fn next_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        self.set_current_field((current + 1) % total);
    }

    fn previous_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    fn handle_char_input(&mut self, c: char);

    fn handle_backspace(&mut self);

    fn handle_delete(&mut self);

    /// Action that publishes the focused field's value after an edit
    fn edited_action(&self) -> ScreenAction;

    /// First validation failure, if any
    fn validate(&mut self) -> Result<(), String>;
}
