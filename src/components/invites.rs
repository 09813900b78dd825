//! Invites screen component
//!
//! Pending-invite list with the accept form. The submit label follows the
//! invited role and the email-only subscription shortcut appears only when
//! the invite qualifies for it.

use crate::action::Action;
use crate::i18n;
use crate::model::invite::{Invite, InviteFormState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Invites screen: pending invites plus the accept-form state machine
pub struct InvitesComponent {
    pub invites: Vec<Invite>,
    selected: usize,
    pub form: InviteFormState,
    list_state: ListState,
}

impl Default for InvitesComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl InvitesComponent {
    pub fn new() -> Self {
        Self {
            invites: Vec::new(),
            selected: 0,
            form: InviteFormState::default(),
            list_state: ListState::default(),
        }
    }

    pub fn set_invites(&mut self, invites: Vec<Invite>) {
        self.invites = invites;
        self.selected = self.selected.min(self.invites.len().saturating_sub(1));
        self.form = InviteFormState::default();
    }

    pub fn selected_invite(&self) -> Option<&Invite> {
        self.invites.get(self.selected)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_submitting() {
            return Ok(None);
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.invites.is_empty() {
                    self.selected = (self.selected + 1) % self.invites.len();
                    self.form = InviteFormState::default();
                }
                Ok(None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.invites.is_empty() {
                    self.selected = (self.selected + self.invites.len() - 1) % self.invites.len();
                    self.form = InviteFormState::default();
                }
                Ok(None)
            }
            KeyCode::Enter => {
                if self.selected_invite().is_some() && self.form.submit() {
                    Ok(Some(Action::AcceptInvite))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('f') => {
                let qualifies = self
                    .selected_invite()
                    .is_some_and(Invite::offers_email_only_subscription);
                if qualifies && self.form.submit() {
                    Ok(Some(Action::AcceptInviteByEmail))
                } else {
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_list(frame, chunks[0]);
        self.draw_form(frame, chunks[1]);
        Ok(())
    }

    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .invites
            .iter()
            .map(|invite| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" {:<24}", invite.sent_to),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(invite.role.clone(), Style::default().fg(Color::Cyan)),
                ]))
            })
            .collect();

        self.list_state.select(if self.invites.is_empty() {
            None
        } else {
            Some(self.selected)
        });

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Pending Invites ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        match self.selected_invite() {
            Some(invite) => {
                lines.push(Line::from(vec![
                    Span::styled("Site:  ", Style::default().fg(Color::DarkGray)),
                    Span::raw(invite.site_name.clone()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Email: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(invite.sent_to.clone()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Role:  ", Style::default().fg(Color::DarkGray)),
                    Span::raw(invite.role.clone()),
                ]));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("[ Enter: {} ]", invite.submit_button_text()),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                if invite.offers_email_only_subscription() {
                    lines.push(Line::from(Span::styled(
                        format!("f: {}", i18n::translate("Follow by email subscription only.")),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::from(""));
                lines.push(self.form_status_line());
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "No pending invites",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Accept "));
        frame.render_widget(paragraph, area);
    }

    fn form_status_line(&self) -> Line<'static> {
        match &self.form {
            InviteFormState::Editing => Line::from(""),
            InviteFormState::Submitting => Line::from(Span::styled(
                "Accepting…",
                Style::default().fg(Color::Yellow),
            )),
            InviteFormState::Accepted => Line::from(Span::styled(
                "Invite accepted",
                Style::default().fg(Color::Green),
            )),
            InviteFormState::Failed(error) => Line::from(Span::styled(
                format!("Failed: {}", error),
                Style::default().fg(Color::Red),
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

    fn invite(role: &str, activation_key: Option<&str>) -> Invite {
        Invite {
            role: role.to_string(),
            sent_to: "user@example.com".to_string(),
            site_name: "Example".to_string(),
            activation_key: activation_key.map(str::to_string),
        }
    }

    #[test]
    fn test_accept_moves_form_to_submitting() {
        let mut invites = InvitesComponent::new();
        invites.set_invites(vec![invite("editor", None)]);

        let action = invites.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::AcceptInvite));
        assert!(invites.form.is_submitting());

        // Keys are ignored while the accept is in flight
        let action = invites.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_email_only_path_requires_qualifying_invite() {
        let mut invites = InvitesComponent::new();
        invites.set_invites(vec![invite("editor", Some("key"))]);
        let action = invites.handle_key_event(key(KeyCode::Char('f'))).unwrap();
        assert_eq!(action, None);

        invites.set_invites(vec![invite("follower", Some("key"))]);
        let action = invites.handle_key_event(key(KeyCode::Char('f'))).unwrap();
        assert_eq!(action, Some(Action::AcceptInviteByEmail));
    }

    #[test]
    fn test_navigation_resets_form() {
        let mut invites = InvitesComponent::new();
        invites.set_invites(vec![invite("editor", None), invite("viewer", None)]);
        invites.form.submit();
        invites.form.resolve(Ok(()));
        assert_eq!(invites.form, InviteFormState::Accepted);

        invites.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(invites.form, InviteFormState::Editing);
    }

    #[test]
    fn test_accept_with_no_invites_is_noop() {
        let mut invites = InvitesComponent::new();
        let action = invites.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, None);
        assert_eq!(invites.form, InviteFormState::Editing);
    }
}
