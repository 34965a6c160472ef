//! Table of committed records

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::{RecordField, RecordId};
use crate::registry::RecordStore;
use crate::tui::{traits::Navigable, ui::Styles};

/// Columns shown in the table, with their widths
#[derive(Debug, Clone)]
pub struct RecordTableConfig {
    pub title: String,
    pub columns: Vec<(RecordField, u16)>,
}

impl Default for RecordTableConfig {
    fn default() -> Self {
        Self {
            title: "Registered Users".to_string(),
            columns: vec![
                (RecordField::Name, 20),
                (RecordField::Email, 24),
                (RecordField::Phone, 14),
                (RecordField::StreetAddress, 22),
                (RecordField::StateCode, 6),
                (RecordField::City, 16),
                (RecordField::Neighborhood, 14),
                (RecordField::RegistrationDate, 11),
            ],
        }
    }
}

/// Selection over the store's display order
pub struct RecordTable {
    pub state: TableState,
    pub config: RecordTableConfig,
    item_count: usize,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new(RecordTableConfig::default())
    }
}

impl RecordTable {
    pub fn new(config: RecordTableConfig) -> Self {
        Self {
            state: TableState::default(),
            config,
            item_count: 0,
        }
    }

    /// Keep the selection on a real row after the store changed size
    pub fn sync_len(&mut self, len: usize) {
        self.item_count = len;
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            None => self.state.select(Some(0)),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    pub fn selected_id(&self, store: &RecordStore) -> Option<RecordId> {
        self.state.selected().and_then(|i| store.id_at(i))
    }

    pub fn select_id(&mut self, store: &RecordStore, id: RecordId) {
        if let Some(position) = store.position(id) {
            self.state.select(Some(position));
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, store: &RecordStore) {
        let title = format!("{} ({})", self.config.title, store.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        if store.is_empty() {
            let empty = Paragraph::new("No records yet. Press 'n' to register someone.")
                .style(Styles::inactive())
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            self.config
                .columns
                .iter()
                .map(|(field, _)| Cell::from(field.label())),
        )
        .style(Styles::title());

        let rows = store.iter().map(|entry| {
            Row::new(self.config.columns.iter().map(|(field, width)| {
                Cell::from(crate::tui::ui::truncate_string(
                    entry.record.get(*field),
                    *width as usize,
                ))
            }))
        });

        let widths: Vec<Constraint> = self
            .config
            .columns
            .iter()
            .map(|(_, width)| Constraint::Length(*width))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

impl Navigable for RecordTable {
    fn navigate_up(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.item_count - 1
        } else {
            selected - 1
        };
        self.state.select(Some(new_selected));
    }

    fn navigate_down(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        self.state.select(Some((selected + 1) % self.item_count));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.item_count
    }
}
