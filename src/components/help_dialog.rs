//! Help dialog listing the key bindings

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const BINDINGS: [(&str, &str); 11] = [
    ("Tab / Shift-Tab", "switch tab"),
    ("j / k, ↓ / ↑", "move selection"),
    ("h / l, ← / →", "cycle picker value (Export)"),
    ("s", "switch section (Export)"),
    ("e", "start export"),
    ("r", "refresh settings / themes"),
    ("Space", "toggle plugin"),
    ("Enter", "confirm / open menu"),
    ("f", "follow by email (Invites)"),
    ("?", "this help"),
    ("q", "quit"),
];

#[derive(Default)]
pub struct HelpDialog;

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                Ok(Some(Action::CloseModal))
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup = centered_popup(area, 50, BINDINGS.len() as u16 + 4);

        let mut lines = vec![Line::from("")];
        for (keys, what) in BINDINGS {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<18}", keys), Style::default().fg(Color::Cyan)),
                Span::raw(what),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Esc to close",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help ")
                    .border_style(Style::default().fg(Color::Cyan)),
            ),
            popup,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_any_close_key_dismisses() {
        let mut dialog = HelpDialog;
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('?')] {
            let action = dialog
                .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
                .unwrap();
            assert_eq!(action, Some(Action::CloseModal));
        }
    }
}
