//! First-run setup wizard
//!
//! Collects the site path and the wp binary before the main screen is
//! usable. The resulting configuration is saved by the App on confirm.

use crate::action::Action;
use crate::config::Config;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::Path;

/// Wizard pages in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardStep {
    Welcome,
    SitePath,
    WpBinary,
    Confirm,
}

/// First-run wizard: one text field per step plus a confirm page
pub struct SetupWizard {
    step: WizardStep,
    site_path: String,
    wp_binary: String,
    error: Option<String>,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Welcome,
            site_path: String::new(),
            wp_binary: "wp".to_string(),
            error: None,
        }
    }

    /// The configuration the wizard has collected; valid once confirmed
    pub fn build_config(&self) -> Config {
        Config {
            site_path: self.site_path.clone(),
            wp_binary_path: self.wp_binary.clone(),
            ..Default::default()
        }
    }

    fn advance(&mut self) -> Option<Action> {
        self.error = None;
        match self.step {
            WizardStep::Welcome => {
                self.step = WizardStep::SitePath;
                None
            }
            WizardStep::SitePath => {
                if self.site_path.trim().is_empty() {
                    self.error = Some("Site path is required".to_string());
                } else if !Path::new(self.site_path.trim()).is_dir() {
                    self.error = Some(format!("No such directory: {}", self.site_path.trim()));
                } else {
                    self.site_path = self.site_path.trim().to_string();
                    self.step = WizardStep::WpBinary;
                }
                None
            }
            WizardStep::WpBinary => {
                if self.wp_binary.trim().is_empty() {
                    self.error = Some("wp binary is required".to_string());
                } else {
                    self.wp_binary = self.wp_binary.trim().to_string();
                    self.step = WizardStep::Confirm;
                }
                None
            }
            WizardStep::Confirm => Some(Action::SetupConfirm),
        }
    }

    fn back(&mut self) {
        self.error = None;
        self.step = match self.step {
            WizardStep::Welcome | WizardStep::SitePath => WizardStep::Welcome,
            WizardStep::WpBinary => WizardStep::SitePath,
            WizardStep::Confirm => WizardStep::WpBinary,
        };
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.step {
            WizardStep::SitePath => Some(&mut self.site_path),
            WizardStep::WpBinary => Some(&mut self.wp_binary),
            WizardStep::Welcome | WizardStep::Confirm => None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Enter => Ok(self.advance()),
            KeyCode::Esc => {
                self.back();
                Ok(None)
            }
            KeyCode::Backspace => {
                if let Some(field) = self.field_mut() {
                    field.pop();
                }
                Ok(None)
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.field_mut() {
                    field.push(c);
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut lines = vec![Line::from("")];

        match self.step {
            WizardStep::Welcome => {
                lines.push(Line::from(Span::styled(
                    " Welcome to wp-tui",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(" Manage exports, plugins, themes and invites"));
                lines.push(Line::from(" for a WordPress site from the terminal."));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    " Press Enter to begin setup",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            WizardStep::SitePath => {
                lines.push(Line::from(" Path to the WordPress installation:"));
                lines.push(Line::from(""));
                lines.push(self.input_line(&self.site_path));
            }
            WizardStep::WpBinary => {
                lines.push(Line::from(" wp-cli binary (name on PATH or full path):"));
                lines.push(Line::from(""));
                lines.push(self.input_line(&self.wp_binary));
            }
            WizardStep::Confirm => {
                lines.push(Line::from(vec![
                    Span::styled(" Site path: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(self.site_path.clone()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled(" wp binary: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(self.wp_binary.clone()),
                ]));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    " Enter: save and continue   Esc: back",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        if let Some(error) = &self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {}", error),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Setup ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
        Ok(())
    }

    fn input_line(&self, value: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(Color::Cyan)),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(wizard: &mut SetupWizard, text: &str) {
        for c in text.chars() {
            wizard.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_wizard_happy_path() {
        let mut wizard = SetupWizard::new();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();

        type_text(&mut wizard, "/tmp");
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(wizard.step, WizardStep::WpBinary);

        // Default binary name is kept as-is
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(wizard.step, WizardStep::Confirm);

        let action = wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::SetupConfirm));

        let config = wizard.build_config();
        assert_eq!(config.site_path, "/tmp");
        assert_eq!(config.wp_binary_path, "wp");
    }

    #[test]
    fn test_missing_site_path_is_rejected() {
        let mut wizard = SetupWizard::new();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(wizard.step, WizardStep::SitePath);
        assert!(wizard.error.is_some());
    }

    #[test]
    fn test_nonexistent_site_path_is_rejected() {
        let mut wizard = SetupWizard::new();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(&mut wizard, "/no/such/directory/anywhere");
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(wizard.step, WizardStep::SitePath);
        assert!(wizard.error.is_some());
    }

    #[test]
    fn test_escape_steps_back() {
        let mut wizard = SetupWizard::new();
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(&mut wizard, "/tmp");
        wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(wizard.step, WizardStep::WpBinary);

        wizard.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(wizard.step, WizardStep::SitePath);
    }
}
