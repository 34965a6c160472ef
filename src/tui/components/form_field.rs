//! Input widgets bound to record fields

use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::models::RecordField;
use crate::tui::{
    traits::{FormHandler, ScreenAction},
    ui::Styles,
};

/// Type of form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFieldType {
    Text,
    /// Text constrained to `YYYY-MM-DD`
    Date,
    Dropdown,
}

/// One choice in a dropdown: the stored value and what the user sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Individual form field.
///
/// `cursor_position` counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct FormField {
    pub binding: RecordField,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub required: bool,
    pub is_focused: bool,
    pub cursor_position: usize,
    pub dropdown_options: Vec<DropdownOption>,
    pub dropdown_state: ListState,
    pub show_dropdown: bool,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(binding: RecordField, field_type: FormFieldType) -> Self {
        Self {
            binding,
            label: binding.label().to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            required: true,
            is_focused: false,
            cursor_position: 0,
            dropdown_options: Vec::new(),
            dropdown_state: ListState::default(),
            show_dropdown: false,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
        if !focused {
            self.show_dropdown = false;
        }
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Replace the value from outside the widget; the cursor only moves when it changed
    pub fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
            self.cursor_position = self.char_count();
            self.validation_error = None;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        let at = self.byte_index(self.cursor_position);
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        if self.cursor_position < self.char_count() {
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Swap the dropdown choices, keeping the highlighted entry on the current value
    pub fn set_dropdown_options(&mut self, options: Vec<DropdownOption>) {
        if self.dropdown_options == options {
            return;
        }
        self.dropdown_options = options;
        self.highlight_current_value();
    }

    fn highlight_current_value(&mut self) {
        if self.dropdown_options.is_empty() {
            self.dropdown_state.select(None);
            self.show_dropdown = false;
            return;
        }
        let index = self
            .dropdown_options
            .iter()
            .position(|o| o.value == self.value)
            .unwrap_or(0);
        self.dropdown_state.select(Some(index));
    }

    pub fn open_dropdown(&mut self) {
        if self.field_type != FormFieldType::Dropdown || self.dropdown_options.is_empty() {
            return;
        }
        self.highlight_current_value();
        self.show_dropdown = true;
    }

    pub fn close_dropdown(&mut self) {
        self.show_dropdown = false;
    }

    /// Handle dropdown navigation
    pub fn dropdown_up(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let selected = self.dropdown_state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.dropdown_options.len() - 1
        } else {
            selected - 1
        };
        self.dropdown_state.select(Some(new_selected));
    }

    pub fn dropdown_down(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let selected = self.dropdown_state.selected().unwrap_or(0);
        let new_selected = (selected + 1) % self.dropdown_options.len();
        self.dropdown_state.select(Some(new_selected));
    }

    /// Take the highlighted option as the new value and close the list
    pub fn select_dropdown_value(&mut self) -> Option<String> {
        let selected = self.dropdown_state.selected()?;
        let option = self.dropdown_options.get(selected)?;
        self.value = option.value.clone();
        self.cursor_position = self.char_count();
        self.show_dropdown = false;
        self.validation_error = None;
        Some(self.value.clone())
    }

    /// Text shown inside the box: the option label for dropdowns, else the raw value
    pub fn display_text(&self) -> &str {
        if self.value.is_empty() {
            return &self.placeholder;
        }
        if self.field_type == FormFieldType::Dropdown {
            if let Some(option) = self.dropdown_options.iter().find(|o| o.value == self.value) {
                return &option.label;
            }
        }
        &self.value
    }

    fn cursor_offset(&self) -> u16 {
        self.value
            .chars()
            .take(self.cursor_position)
            .map(|c| c.width().unwrap_or(0) as u16)
            .sum()
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let marker = if self.required { " *" } else { "" };
        let title = match self.validation_error {
            Some(ref error) => format!("{}{} - {}", self.label, marker, error),
            None => format!("{}{}", self.label, marker),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if self.value.is_empty() {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let mut text = self.display_text().to_string();
        if self.field_type == FormFieldType::Dropdown {
            text.push_str(if self.show_dropdown { " ▲" } else { " ▼" });
        }

        let paragraph = Paragraph::new(text).style(text_style).block(block);
        f.render_widget(paragraph, area);

        if self.is_focused && self.field_type != FormFieldType::Dropdown {
            let cursor_x = area.x + 1 + self.cursor_offset();
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }

    /// Render dropdown if visible
    pub fn render_dropdown(&mut self, f: &mut Frame, area: Rect) {
        if !self.show_dropdown || self.dropdown_options.is_empty() {
            return;
        }

        let selected = self.dropdown_state.selected();
        let items: Vec<ListItem> = self
            .dropdown_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == selected {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(option.label.clone()).style(style)
            })
            .collect();

        let block = Block::default()
            .title(self.label.as_str())
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        let list = List::new(items).block(block);
        f.render_stateful_widget(list, area, &mut self.dropdown_state);
    }

    /// Check presence and format, recording the failure on the widget
    pub fn validate(&mut self) -> bool {
        self.validation_error = None;

        if self.required && self.is_empty() {
            self.validation_error = Some("required".to_string());
            return false;
        }

        if self.field_type == FormFieldType::Date
            && !self.value.is_empty()
            && NaiveDate::parse_from_str(self.value.trim(), "%Y-%m-%d").is_err()
        {
            self.validation_error = Some("use YYYY-MM-DD".to_string());
            return false;
        }

        true
    }
}

/// Form container that manages multiple fields
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn field(&self, binding: RecordField) -> Option<&FormField> {
        self.fields.iter().find(|f| f.binding == binding)
    }

    pub fn field_mut(&mut self, binding: RecordField) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.binding == binding)
    }

    pub fn get_current_field(&self) -> Option<&FormField> {
        self.fields.get(self.current_field)
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    pub fn focus(&mut self, binding: RecordField) {
        if let Some(index) = self.fields.iter().position(|f| f.binding == binding) {
            self.set_current_field(index);
        }
    }

    /// Validate all fields, leaving each widget's error in place
    pub fn validate_all(&mut self) -> bool {
        let mut all_valid = true;
        for field in &mut self.fields {
            if !field.validate() {
                all_valid = false;
            }
        }
        all_valid
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.validation_error = None;
        }
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }

    fn edited_action(&self) -> ScreenAction {
        match self.get_current_field() {
            Some(field) if field.field_type != FormFieldType::Dropdown => {
                ScreenAction::UpdateField(field.binding, field.value.clone())
            }
            _ => ScreenAction::None,
        }
    }

    fn validate(&mut self) -> Result<(), String> {
        if self.validate_all() {
            return Ok(());
        }
        let failed = self.fields.iter().position(|f| f.validation_error.is_some());
        match failed {
            Some(index) => {
                let field = &self.fields[index];
                let message = format!(
                    "{}: {}",
                    field.label,
                    field.validation_error.clone().unwrap_or_default()
                );
                self.set_current_field(index);
                Err(message)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte_text() {
        let mut field = FormField::new(RecordField::Name, FormFieldType::Text);
        for c in "Joã".chars() {
            field.insert_char(c);
        }
        field.insert_char('o');
        assert_eq!(field.value, "João");
        assert_eq!(field.cursor_position, 4);

        field.move_cursor_left();
        field.delete_char();
        assert_eq!(field.value, "Joo");
        field.delete_char_forward();
        assert_eq!(field.value, "Jo");
    }

    #[test]
    fn test_set_value_moves_cursor_only_on_change() {
        let mut field = FormField::new(RecordField::City, FormFieldType::Text);
        field.set_value("Sé");
        assert_eq!(field.cursor_position, 2);
        field.move_cursor_to_start();
        field.set_value("Sé");
        assert_eq!(field.cursor_position, 0);
    }

    #[test]
    fn test_dropdown_ignores_typing_and_shows_label() {
        let mut field = FormField::new(RecordField::StateCode, FormFieldType::Dropdown);
        field.set_dropdown_options(vec![
            DropdownOption::new("", "Select a state"),
            DropdownOption::new("SP", "SP - São Paulo"),
            DropdownOption::new("RJ", "RJ - Rio de Janeiro"),
        ]);
        field.insert_char('x');
        assert_eq!(field.value, "");

        field.open_dropdown();
        field.dropdown_down();
        field.dropdown_down();
        assert_eq!(field.select_dropdown_value(), Some("RJ".to_string()));
        assert!(!field.show_dropdown);
        assert_eq!(field.display_text(), "RJ - Rio de Janeiro");

        field.dropdown_down();
        field.dropdown_up();
        field.open_dropdown();
        assert_eq!(field.dropdown_state.selected(), Some(2));
    }

    #[test]
    fn test_validate_required_and_date() {
        let mut date = FormField::new(RecordField::RegistrationDate, FormFieldType::Date);
        assert!(!date.validate());
        assert_eq!(date.validation_error.as_deref(), Some("required"));

        date.set_value("2024-02-30");
        assert!(!date.validate());
        date.set_value("2024-02-29");
        assert!(date.validate());
        assert!(date.validation_error.is_none());

        let mut name = FormField::new(RecordField::Name, FormFieldType::Text);
        name.set_value("   ");
        assert!(!name.validate());
    }

    #[test]
    fn test_form_validate_focuses_first_failure() {
        let mut form = Form::new(vec![
            FormField::new(RecordField::Name, FormFieldType::Text),
            FormField::new(RecordField::Email, FormFieldType::Text),
        ]);
        form.fields[0].set_value("Ana");
        form.set_current_field(0);

        let err = FormHandler::validate(&mut form).unwrap_err();
        assert_eq!(err, "Email: required");
        assert_eq!(form.current_field, 1);
        assert!(form.fields[1].is_focused);
    }

    #[test]
    fn test_edited_action_publishes_value() {
        let mut form = Form::new(vec![FormField::new(RecordField::Phone, FormFieldType::Text)]);
        form.handle_char_input('1');
        assert_eq!(
            form.edited_action(),
            ScreenAction::UpdateField(RecordField::Phone, "1".to_string())
        );
    }
}
