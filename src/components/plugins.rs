//! Plugins screen component
//!
//! Catalog of plan plugins with toggleable selection. Confirming the
//! selection opens the plan-setup dialog which runs the install sequence.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Plugins bundled with the business plan
const PLAN_PLUGINS: [&str; 3] = ["wordpress-seo", "jetpack", "akismet"];

/// Plugins screen: selection state over the plan's plugin catalog
pub struct PluginsComponent {
    plugins: Vec<(String, bool)>,
    selected: usize,
    list_state: ListState,
}

impl Default for PluginsComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginsComponent {
    pub fn new() -> Self {
        Self {
            plugins: PLAN_PLUGINS
                .iter()
                .map(|name| (name.to_string(), true))
                .collect(),
            selected: 0,
            list_state: ListState::default(),
        }
    }

    /// Names of the plugins currently ticked for installation
    pub fn selected_plugins(&self) -> Vec<String> {
        self.plugins
            .iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Component for PluginsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % self.plugins.len();
                Ok(None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + self.plugins.len() - 1) % self.plugins.len();
                Ok(None)
            }
            KeyCode::Char(' ') => {
                if let Some(entry) = self.plugins.get_mut(self.selected) {
                    entry.1 = !entry.1;
                }
                Ok(None)
            }
            KeyCode::Enter | KeyCode::Char('i') => {
                if self.selected_plugins().is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Action::OpenPlanSetup))
                }
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let items: Vec<ListItem> = self
            .plugins
            .iter()
            .map(|(name, enabled)| {
                let mark = if *enabled { "[x]" } else { "[ ]" };
                let style = if *enabled {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(Span::styled(
                    format!(" {} {}", mark, name),
                    style,
                )))
            })
            .collect();

        self.list_state.select(Some(self.selected));

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Plan Plugins ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        frame.render_stateful_widget(list, area, &mut self.list_state);
        Ok(())
    }
}
