//! Status bar messages

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::ui::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Info,
    Success,
    Error,
    Loading,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Latest message plus a short history
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub message_history: Vec<StatusMessage>,
    pub max_history: usize,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 50,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.clear();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Info));
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Success));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Error));
    }

    pub fn set_loading(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Loading));
    }

    /// Move the current message into history
    pub fn clear(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, hint: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => {
                let prefix = match message.status_type {
                    StatusType::Info => "ℹ",
                    StatusType::Success => "✓",
                    StatusType::Error => "✗",
                    StatusType::Loading => "⟳",
                };
                let style = match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Error => Styles::error(),
                    StatusType::Loading => Styles::warning(),
                };
                (
                    format!(
                        "{} [{}] {}",
                        prefix,
                        message.timestamp.format("%H:%M:%S"),
                        message.message
                    ),
                    style,
                )
            }
            None => ("Ready".to_string(), Styles::default()),
        };

        let block = Block::default()
            .title(hint)
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        f.render_widget(Paragraph::new(content).style(style).block(block), area);
    }
}
