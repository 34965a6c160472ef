//! Modal form bound to the registration draft

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{CityOption, RecordField, StateOption};
use crate::registry::Draft;
use crate::tui::{
    components::{DropdownOption, Form, FormField, FormFieldType},
    handlers::CommonKeyHandler,
    traits::{FormHandler, ScreenAction},
    ui::{centered_rect, Styles},
};

const LEFT_COLUMN: usize = 5;

pub struct FormScreen {
    pub form: Form,
}

impl Default for FormScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl FormScreen {
    pub fn new() -> Self {
        let fields = RecordField::ALL
            .iter()
            .map(|&binding| {
                let (field_type, placeholder) = match binding {
                    RecordField::Email => (FormFieldType::Text, "name@example.com"),
                    RecordField::Phone => (FormFieldType::Text, "(11) 99999-0000"),
                    RecordField::PostalCode => (FormFieldType::Text, "01001-000 then Ctrl+B"),
                    RecordField::StateCode => (FormFieldType::Dropdown, "Enter to choose"),
                    RecordField::City => (FormFieldType::Dropdown, "Choose a state first"),
                    RecordField::RegistrationDate => (FormFieldType::Date, "YYYY-MM-DD"),
                    _ => (FormFieldType::Text, ""),
                };
                FormField::new(binding, field_type).with_placeholder(placeholder)
            })
            .collect();

        Self {
            form: Form::new(fields),
        }
    }

    /// Focus the first field and drop stale widget errors
    pub fn reset_focus(&mut self) {
        self.form.set_current_field(0);
        self.form.clear_errors();
    }

    /// Mirror the draft and the reference lists into the widgets
    pub fn sync_from(&mut self, draft: &Draft, states: &[StateOption], cities: &[CityOption]) {
        for field in &mut self.form.fields {
            field.set_value(draft.record.get(field.binding));
        }

        if let Some(state) = self.form.field_mut(RecordField::StateCode) {
            let mut options = vec![DropdownOption::new("", "Select a state")];
            options.extend(
                states
                    .iter()
                    .map(|s| DropdownOption::new(s.abbreviation.clone(), s.label())),
            );
            state.set_dropdown_options(options);
        }

        if let Some(city) = self.form.field_mut(RecordField::City) {
            let mut options = vec![DropdownOption::new("", "Select a municipality")];
            options.extend(
                cities
                    .iter()
                    .map(|c| DropdownOption::new(c.name.clone(), c.name.clone())),
            );
            city.set_dropdown_options(options);
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if let Some(action) = self.handle_dropdown_keys(key) {
            return action;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Char('b') if ctrl => ScreenAction::LookupPostalCode,
            KeyCode::F(2) => ScreenAction::LookupPostalCode,
            KeyCode::Esc => ScreenAction::CancelForm,
            KeyCode::Enter => self.handle_enter(),
            KeyCode::Up => {
                self.form.previous_field();
                ScreenAction::None
            }
            KeyCode::Down => {
                self.form.next_field();
                ScreenAction::None
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                if let Some(field) = self.form.get_current_field_mut() {
                    match key.code {
                        KeyCode::Left => field.move_cursor_left(),
                        KeyCode::Right => field.move_cursor_right(),
                        KeyCode::Home => field.move_cursor_to_start(),
                        _ => field.move_cursor_to_end(),
                    }
                }
                ScreenAction::None
            }
            KeyCode::Char(' ') if self.current_is_dropdown() => {
                self.open_current_dropdown();
                ScreenAction::None
            }
            _ if ctrl => ScreenAction::None,
            _ => CommonKeyHandler::handle_form_keys(&mut self.form, key)
                .unwrap_or(ScreenAction::None),
        }
    }

    /// Keys consumed while a dropdown list is open
    fn handle_dropdown_keys(&mut self, key: KeyEvent) -> Option<ScreenAction> {
        let field = self.form.get_current_field_mut()?;
        if !field.show_dropdown {
            return None;
        }

        match key.code {
            KeyCode::Up => field.dropdown_up(),
            KeyCode::Down => field.dropdown_down(),
            KeyCode::Esc => field.close_dropdown(),
            KeyCode::Enter => {
                let binding = field.binding;
                return Some(match field.select_dropdown_value() {
                    Some(value) if binding == RecordField::StateCode => {
                        ScreenAction::SelectState(value)
                    }
                    Some(value) => ScreenAction::UpdateField(binding, value),
                    None => ScreenAction::None,
                });
            }
            KeyCode::Tab | KeyCode::BackTab => {
                field.close_dropdown();
                return None;
            }
            _ => {}
        }
        Some(ScreenAction::None)
    }

    fn current_is_dropdown(&self) -> bool {
        self.form
            .get_current_field()
            .map(|f| f.field_type == FormFieldType::Dropdown)
            .unwrap_or(false)
    }

    fn open_current_dropdown(&mut self) {
        if let Some(field) = self.form.get_current_field_mut() {
            field.open_dropdown();
        }
    }

    fn handle_enter(&mut self) -> ScreenAction {
        if self.current_is_dropdown() {
            self.open_current_dropdown();
            return ScreenAction::None;
        }
        if self.form.current_field + 1 == self.form.get_field_count() {
            return self.submit();
        }
        self.form.next_field();
        ScreenAction::None
    }

    fn submit(&mut self) -> ScreenAction {
        match FormHandler::validate(&mut self.form) {
            Ok(()) => ScreenAction::SubmitForm,
            Err(message) => ScreenAction::SetError(message),
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, draft: &Draft, pending_lookups: usize) {
        let popup_area = centered_rect(90, 90, area);
        f.render_widget(Clear, popup_area);

        let mut title = if draft.is_editing() {
            "Edit registration".to_string()
        } else {
            "New registration".to_string()
        };
        if pending_lookups > 0 {
            title.push_str(" (looking up...)");
        }

        let block = Block::default()
            .title(Span::styled(title, Styles::title()))
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(15), Constraint::Length(3)])
            .split(inner);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let field_constraints = [Constraint::Length(3); LEFT_COLUMN];
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints(field_constraints)
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints(field_constraints)
            .split(columns[1]);

        let mut areas = Vec::with_capacity(self.form.fields.len());
        for (i, field) in self.form.fields.iter().enumerate() {
            let slot = if i < LEFT_COLUMN {
                left[i]
            } else {
                right[i - LEFT_COLUMN]
            };
            field.render(f, slot);
            areas.push(slot);
        }

        let hints = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Styles::title()),
            Span::raw(" Next  "),
            Span::styled("Enter", Styles::title()),
            Span::raw(" Choose  "),
            Span::styled("Ctrl+B/F2", Styles::title()),
            Span::raw(" Look up CEP  "),
            Span::styled("Ctrl+S", Styles::title()),
            Span::raw(" Save  "),
            Span::styled("Esc", Styles::title()),
            Span::raw(" Cancel"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(hints, rows[1]);

        // dropdown list drops below its field, clipped to the form
        let current = self.form.current_field;
        if let (Some(field), Some(slot)) = (self.form.fields.get_mut(current), areas.get(current)) {
            if field.show_dropdown {
                let height = (field.dropdown_options.len() as u16 + 2)
                    .min(inner.bottom().saturating_sub(slot.bottom()))
                    .max(3);
                let list_area = Rect::new(
                    slot.x,
                    slot.bottom().min(inner.bottom().saturating_sub(height)),
                    slot.width,
                    height,
                );
                f.render_widget(Clear, list_area);
                field.render_dropdown(f, list_area);
            }
        }
    }
}
