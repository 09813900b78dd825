//! Themes screen component
//!
//! Installed-theme list with a per-theme popover of contextual options.
//! Option visibility is decided by the model; this component only renders
//! the entries and routes the chosen one.

use crate::action::Action;
use crate::components::{centered_popup, truncate_label};
use crate::model::theme::{
    build_theme_options, Popover, Theme, ThemeAction, ThemeOption, ThemeOptionContext,
};
use crate::services::analytics;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Themes screen: theme list, selection and the options popover
pub struct ThemesComponent {
    pub themes: Vec<Theme>,
    selected: usize,
    popover: Popover,
    context: ThemeOptionContext,
    list_state: ListState,
    /// URL of the last link entry chosen, shown since we cannot open a browser
    last_url: Option<String>,
}

impl ThemesComponent {
    pub fn new(site_url: String) -> Self {
        Self {
            themes: Vec::new(),
            selected: 0,
            popover: Popover::default(),
            context: ThemeOptionContext {
                logged_out: false,
                customizable: true,
                site_url,
            },
            list_state: ListState::default(),
            last_url: None,
        }
    }

    /// Replace the theme list after a refresh
    pub fn set_themes(&mut self, themes: Vec<Theme>) {
        self.themes = themes;
        self.selected = self.selected.min(self.themes.len().saturating_sub(1));
        self.popover.close();
    }

    fn selected_theme(&self) -> Option<&Theme> {
        self.themes.get(self.selected)
    }

    fn current_options(&self) -> Result<Vec<ThemeOption>> {
        match self.selected_theme() {
            Some(theme) => build_theme_options(theme, &self.context),
            None => Ok(Vec::new()),
        }
    }

    /// Resolve the highlighted popover entry into an action
    fn choose(&mut self) -> Result<Option<Action>> {
        let options = self.current_options()?;
        let Some(index) = self.popover.selected() else {
            return Ok(None);
        };
        let Some(option) = options.get(index) else {
            return Ok(None);
        };

        let action = match option {
            ThemeOption::Url { url, .. } => {
                analytics::record_event("theme_link_click");
                self.last_url = Some(url.clone());
                None
            }
            ThemeOption::Action { action, .. } => {
                analytics::record_event(action.event_name());
                match action {
                    ThemeAction::Activate => self
                        .selected_theme()
                        .map(|t| Action::ActivateTheme(t.name.clone())),
                    // Preview, purchase and customize have no terminal
                    // equivalent; the click is still recorded
                    _ => None,
                }
            }
            ThemeOption::Separator => None,
        };

        self.popover.close();
        Ok(action)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.popover.is_open() {
            let options = self.current_options()?;
            return match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    self.popover.select_next(&options);
                    Ok(None)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.popover.select_prev(&options);
                    Ok(None)
                }
                KeyCode::Enter => self.choose(),
                KeyCode::Esc | KeyCode::Char('m') => {
                    self.popover.close();
                    Ok(None)
                }
                _ => Ok(None),
            };
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.themes.is_empty() {
                    self.selected = (self.selected + 1) % self.themes.len();
                }
                Ok(None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.themes.is_empty() {
                    self.selected = (self.selected + self.themes.len() - 1) % self.themes.len();
                }
                Ok(None)
            }
            KeyCode::Enter | KeyCode::Char('m') => {
                if self.selected_theme().is_some() {
                    self.popover.open();
                }
                Ok(None)
            }
            KeyCode::Char('r') => Ok(Some(Action::RefreshThemes)),
            _ => Ok(None),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let items: Vec<ListItem> = self
            .themes
            .iter()
            .map(|theme| {
                let mut spans = vec![Span::styled(
                    format!(" {:<30}", truncate_label(theme.display_name(), 28)),
                    Style::default().fg(Color::White),
                )];
                if theme.is_active() {
                    spans.push(Span::styled("active  ", Style::default().fg(Color::Green)));
                }
                if !theme.price.is_empty() && !theme.purchased {
                    spans.push(Span::styled(
                        theme.price.clone(),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        self.list_state.select(if self.themes.is_empty() {
            None
        } else {
            Some(self.selected)
        });

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Themes ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut self.list_state);

        if let Some(url) = &self.last_url {
            let hint = Paragraph::new(Line::from(Span::styled(
                format!(" → {}", url),
                Style::default().fg(Color::DarkGray),
            )));
            let hint_area = Rect::new(
                area.x + 1,
                area.y + area.height.saturating_sub(2),
                area.width.saturating_sub(2),
                1,
            );
            frame.render_widget(hint, hint_area);
        }

        if self.popover.is_open() {
            self.draw_popover(frame, area)?;
        }
        Ok(())
    }

    fn draw_popover(&self, frame: &mut Frame, area: Rect) -> Result<()> {
        let options = self.current_options()?;
        let selected = self.popover.selected();

        let lines: Vec<Line> = options
            .iter()
            .enumerate()
            .map(|(i, option)| match option {
                ThemeOption::Separator => Line::from(Span::styled(
                    "─".repeat(26),
                    Style::default().fg(Color::DarkGray),
                )),
                _ => {
                    let style = if selected == Some(i) {
                        Style::default().fg(Color::Black).bg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    Line::from(Span::styled(format!(" {:<25}", option.label()), style))
                }
            })
            .collect();

        let title = self
            .selected_theme()
            .map(|t| format!(" {} ", t.display_name()))
            .unwrap_or_default();
        let popup = centered_popup(area, 30, lines.len() as u16 + 2);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Cyan)),
            ),
            popup,
        );
        Ok(())
    }
}
