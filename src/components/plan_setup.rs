//! Plan setup dialog
//!
//! Modal that runs the plugin install sequence: shows the planned steps
//! with their live status and drives start/cancel.

use crate::action::Action;
use crate::components::centered_popup;
use crate::i18n;
use crate::model::install::{InstallRun, StepStatus, WorkflowStatus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Plan setup modal; step state lives in the `InstallRun` held by the App
pub struct PlanSetupDialog;

impl PlanSetupDialog {
    pub fn handle_key_event(&mut self, key: KeyEvent, running: bool) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') if !running => Ok(Some(Action::StartInstall)),
            KeyCode::Char('c') if running => Ok(Some(Action::CancelInstall)),
            KeyCode::Esc | KeyCode::Char('q') if !running => Ok(Some(Action::CloseModal)),
            _ => Ok(None),
        }
    }

    pub fn draw(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        plugins: &[String],
        run: Option<&InstallRun>,
    ) -> Result<()> {
        let height = (run.map(|r| r.steps.len()).unwrap_or(plugins.len() * 2) as u16 + 6).min(area.height);
        let popup = centered_popup(area, 60, height);

        let mut lines = Vec::new();
        match run {
            Some(run) => {
                for step in &run.steps {
                    let (icon, style) = match step.status {
                        StepStatus::Pending => ("·", Style::default().fg(Color::DarkGray)),
                        StepStatus::Running => ("▸", Style::default().fg(Color::Yellow)),
                        StepStatus::Succeeded => ("✓", Style::default().fg(Color::Green)),
                        StepStatus::Failed => ("✗", Style::default().fg(Color::Red)),
                    };
                    lines.push(Line::from(vec![
                        Span::styled(format!(" {} ", icon), style),
                        Span::styled(step.step.label.clone(), style),
                    ]));
                }
                lines.push(Line::from(""));
                lines.push(self.status_line(run));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    i18n::translate("Your plan includes the following plugins:"),
                    Style::default().fg(Color::Gray),
                )));
                for plugin in plugins {
                    lines.push(Line::from(format!("  • {}", plugin)));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Enter: install   Esc: close",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", i18n::translate("Setting up your plan")))
            .border_style(Style::default().fg(Color::Cyan));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
        Ok(())
    }

    fn status_line(&self, run: &InstallRun) -> Line<'static> {
        match &run.status {
            WorkflowStatus::Running => Line::from(Span::styled(
                format!("{}   c: cancel", i18n::translate("Installing…")),
                Style::default().fg(Color::Yellow),
            )),
            WorkflowStatus::Succeeded => Line::from(Span::styled(
                i18n::translate("All plugins installed"),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            WorkflowStatus::Failed { step, error } => Line::from(Span::styled(
                format!("{} failed: {}", step, error),
                Style::default().fg(Color::Red),
            )),
            WorkflowStatus::Cancelled => Line::from(Span::styled(
                i18n::translate("Installation cancelled"),
                Style::default().fg(Color::Yellow),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_start_only_when_idle() {
        let mut dialog = PlanSetupDialog;
        let action = dialog.handle_key_event(key(KeyCode::Enter), false).unwrap();
        assert_eq!(action, Some(Action::StartInstall));
        let action = dialog.handle_key_event(key(KeyCode::Enter), true).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_cancel_only_while_running() {
        let mut dialog = PlanSetupDialog;
        let action = dialog.handle_key_event(key(KeyCode::Char('c')), true).unwrap();
        assert_eq!(action, Some(Action::CancelInstall));
        let action = dialog.handle_key_event(key(KeyCode::Char('c')), false).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_close_blocked_while_running() {
        let mut dialog = PlanSetupDialog;
        let action = dialog.handle_key_event(key(KeyCode::Esc), true).unwrap();
        assert_eq!(action, None);
        let action = dialog.handle_key_event(key(KeyCode::Esc), false).unwrap();
        assert_eq!(action, Some(Action::CloseModal));
    }
}
