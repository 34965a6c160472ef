//! Records table with create, edit and delete shortcuts

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::models::RecordId;
use crate::registry::RecordStore;
use crate::tui::{
    components::RecordTable,
    handlers::CommonKeyHandler,
    traits::ScreenAction,
    ui::{centered_rect, Styles},
};

#[derive(Default)]
pub struct RecordsScreen {
    pub table: RecordTable,
    /// Record awaiting a y/n answer
    pub pending_delete: Option<RecordId>,
}

impl RecordsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, store: &RecordStore) -> ScreenAction {
        if let Some(id) = self.pending_delete.take() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => ScreenAction::DeleteRecord(id),
                _ => ScreenAction::SetStatus("Deletion cancelled".to_string()),
            };
        }

        if let Some(action) = CommonKeyHandler::handle_navigation_keys(&mut self.table, key) {
            return action;
        }

        match key.code {
            KeyCode::Char('n') => ScreenAction::OpenCreateForm,
            KeyCode::Char('e') | KeyCode::Enter => match self.table.selected_id(store) {
                Some(id) => ScreenAction::OpenEditForm(id),
                None => ScreenAction::SetError("No record selected".to_string()),
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.table.selected_id(store) {
                Some(id) => {
                    self.pending_delete = Some(id);
                    let name = store.get(id).map(|r| r.name.as_str()).unwrap_or_default();
                    ScreenAction::SetStatus(format!("Delete {}? (y/n)", name))
                }
                None => ScreenAction::SetError("No record selected".to_string()),
            },
            _ => ScreenAction::None,
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, store: &RecordStore) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        self.table.render(f, chunks[0], store);

        let instructions = Paragraph::new(Line::from(vec![
            Span::styled("n", Styles::title()),
            Span::raw(" New  "),
            Span::styled("e/Enter", Styles::title()),
            Span::raw(" Edit  "),
            Span::styled("d", Styles::title()),
            Span::raw(" Delete  "),
            Span::styled("↑/↓", Styles::title()),
            Span::raw(" Select  "),
            Span::styled("q", Styles::title()),
            Span::raw(" Quit"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(instructions, chunks[1]);

        if let Some(id) = self.pending_delete {
            self.draw_delete_confirmation(f, area, store, id);
        }
    }

    fn draw_delete_confirmation(&self, f: &mut Frame, area: Rect, store: &RecordStore, id: RecordId) {
        let popup_area = centered_rect(50, 20, area);
        f.render_widget(Clear, popup_area);

        let name = store.get(id).map(|r| r.name.as_str()).unwrap_or_default();
        let text = vec![
            Line::from(format!("Delete the record for {}?", name)),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Styles::error()),
                Span::raw(" confirm   any other key cancels"),
            ]),
        ];

        let popup = Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .title("Confirm deletion")
                .borders(Borders::ALL)
                .border_style(Styles::error()),
        );
        f.render_widget(popup, popup_area);
    }
}
