//! Key handling shared across screens

use crossterm::event::{KeyCode, KeyEvent};

use super::traits::{FormHandler, Navigable, ScreenAction};

pub struct CommonKeyHandler;

impl CommonKeyHandler {
    /// Handle navigation keys for list-based screens
    pub fn handle_navigation_keys<T: Navigable>(
        navigable: &mut T,
        key: KeyEvent,
    ) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                navigable.navigate_up();
                Some(ScreenAction::None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                navigable.navigate_down();
                Some(ScreenAction::None)
            }
            KeyCode::Home => {
                navigable.navigate_to_first();
                Some(ScreenAction::SetStatus("First record".to_string()))
            }
            KeyCode::End => {
                navigable.navigate_to_last();
                Some(ScreenAction::SetStatus("Last record".to_string()))
            }
            _ => None,
        }
    }

    /// Handle form navigation and text input.
    ///
    /// Edits come back as the form's [`FormHandler::edited_action`].
    pub fn handle_form_keys<T: FormHandler>(form: &mut T, key: KeyEvent) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Tab => {
                form.next_field();
                Some(ScreenAction::None)
            }
            KeyCode::BackTab => {
                form.previous_field();
                Some(ScreenAction::None)
            }
            KeyCode::Char(c) => {
                form.handle_char_input(c);
                Some(form.edited_action())
            }
            KeyCode::Backspace => {
                form.handle_backspace();
                Some(form.edited_action())
            }
            KeyCode::Delete => {
                form.handle_delete();
                Some(form.edited_action())
            }
            _ => None,
        }
    }
}
