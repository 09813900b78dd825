//! Export screen component
//!
//! Content-export settings: per-section pickers for author, status,
//! category and date range, all projected from the state tree by the
//! selector layer on every draw, plus the export trigger and its live
//! progress readout.

use crate::action::Action;
use crate::components::truncate_label;
use crate::i18n;
use crate::model::exporter::{ExportFilters, SiteSettings};
use crate::model::run::{CommandOutput, RunStatus};
use crate::model::selectors::{
    get_author_options, get_category_options, get_date_options, get_status_options,
    is_loading_options, should_show_progress, SelectOption,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Picker rows on the export screen, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Author,
    Status,
    Category,
    StartDate,
    EndDate,
}

const FIELDS: [Field; 5] = [
    Field::Author,
    Field::Status,
    Field::Category,
    Field::StartDate,
    Field::EndDate,
];

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Author => "Author",
            Field::Status => "Status",
            Field::Category => "Category",
            Field::StartDate => "Start date",
            Field::EndDate => "End date",
        }
    }
}

/// Export screen: owns picker focus and chosen values; the option lists
/// themselves are derived from state on each read
pub struct ExportComponent {
    /// Section (post type) the pickers apply to
    pub section: String,
    /// Focused picker row
    focused: usize,
    /// Chosen option index per picker; `None` means "all"
    selections: [Option<usize>; FIELDS.len()],
}

impl Default for ExportComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportComponent {
    pub fn new() -> Self {
        Self {
            section: "post".to_string(),
            focused: 0,
            selections: [None; FIELDS.len()],
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, state: &SiteSettings) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.focused = (self.focused + 1) % FIELDS.len();
                Ok(None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focused = (self.focused + FIELDS.len() - 1) % FIELDS.len();
                Ok(None)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cycle_value(state, 1);
                Ok(None)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cycle_value(state, -1);
                Ok(None)
            }
            KeyCode::Char('s') => {
                self.next_section(state);
                Ok(None)
            }
            KeyCode::Char('e') => Ok(Some(Action::StartExport)),
            KeyCode::Char('r') => Ok(Some(Action::RefreshSettings)),
            _ => Ok(None),
        }
    }

    /// Cycle to the next section that has settings loaded
    fn next_section(&mut self, state: &SiteSettings) {
        let Some(settings) = state.exporter.data.advanced_settings.as_ref() else {
            return;
        };
        let sections: Vec<&String> = settings.keys().collect();
        if sections.is_empty() {
            return;
        }

        let current = sections.iter().position(|s| **s == self.section);
        let next = match current {
            Some(i) => (i + 1) % sections.len(),
            None => 0,
        };
        self.section = sections[next].clone();
        self.selections = [None; FIELDS.len()];
    }

    /// Step the focused picker through: All → first … last → All
    fn cycle_value(&mut self, state: &SiteSettings, direction: i32) {
        let options = self.options_for(state, FIELDS[self.focused]);
        if options.is_empty() {
            return;
        }

        let current = self.selections[self.focused];
        self.selections[self.focused] = if direction > 0 {
            match current {
                None => Some(0),
                Some(i) if i + 1 < options.len() => Some(i + 1),
                Some(_) => None,
            }
        } else {
            match current {
                None => Some(options.len() - 1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            }
        };
    }

    fn options_for(&self, state: &SiteSettings, field: Field) -> Vec<SelectOption> {
        match field {
            Field::Author => get_author_options(state, &self.section),
            Field::Status => get_status_options(state, &self.section),
            Field::Category => get_category_options(state, &self.section),
            Field::StartDate => get_date_options(state, &self.section, false),
            Field::EndDate => get_date_options(state, &self.section, true),
        }
    }

    fn chosen(&self, state: &SiteSettings, field: Field) -> Option<SelectOption> {
        let index = self.selections[FIELDS.iter().position(|f| *f == field)?]?;
        self.options_for(state, field).into_iter().nth(index)
    }

    /// The filters the export command runs with
    pub fn filters(&self, state: &SiteSettings) -> ExportFilters {
        ExportFilters {
            post_type: self.section.clone(),
            author: self.chosen(state, Field::Author).map(|o| o.value),
            status: self.chosen(state, Field::Status).map(|o| o.value),
            category: self.chosen(state, Field::Category).map(|o| o.value),
            start_date: self.chosen(state, Field::StartDate).map(|o| o.value),
            end_date: self.chosen(state, Field::EndDate).map(|o| o.value),
        }
    }

    pub fn draw(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &SiteSettings,
        export_output: Option<&CommandOutput>,
    ) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FIELDS.len() as u16 + 3), Constraint::Min(0)])
            .split(area);

        self.draw_pickers(frame, chunks[0], state);
        self.draw_activity(frame, chunks[1], state, export_output);
        Ok(())
    }

    fn draw_pickers(&self, frame: &mut Frame, area: Rect, state: &SiteSettings) {
        let mut lines = vec![Line::from(vec![
            Span::styled("Section: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.section.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (s to switch)", Style::default().fg(Color::DarkGray)),
        ])];

        if is_loading_options(state) {
            lines.push(Line::from(Span::styled(
                i18n::translate("Loading options…"),
                Style::default().fg(Color::Yellow),
            )));
        } else {
            for (index, field) in FIELDS.iter().enumerate() {
                let value = match self.selections[index] {
                    Some(i) => self
                        .options_for(state, *field)
                        .into_iter()
                        .nth(i)
                        .map(|o| o.label)
                        .unwrap_or_else(|| "All".to_string()),
                    None => "All".to_string(),
                };

                let row_style = if index == self.focused {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };

                lines.push(Line::from(vec![
                    Span::styled(format!("{:<12}", field.label()), row_style),
                    Span::styled(
                        format!("◂ {} ▸", truncate_label(&value, 30)),
                        row_style.fg(Color::Cyan),
                    ),
                ]));
            }
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Export Content ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_activity(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &SiteSettings,
        export_output: Option<&CommandOutput>,
    ) {
        let mut lines = Vec::new();

        if should_show_progress(state) {
            lines.push(Line::from(Span::styled(
                i18n::translate("Export in progress…"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }

        if let Some(output) = export_output {
            lines.push(Line::from(Span::styled(
                format!("$ {}", output.command),
                Style::default().fg(Color::DarkGray),
            )));
            for line in output.output.lines().rev().take(10).collect::<Vec<_>>().into_iter().rev() {
                lines.push(Line::from(Span::raw(line.to_string())));
            }
            match output.status {
                RunStatus::Success => lines.push(Line::from(Span::styled(
                    "Export complete",
                    Style::default().fg(Color::Green),
                ))),
                RunStatus::Failed => lines.push(Line::from(Span::styled(
                    "Export failed",
                    Style::default().fg(Color::Red),
                ))),
                RunStatus::Running => {}
            }
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press e to start an export with the filters above",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Activity "));
        frame.render_widget(paragraph, area);
    }
}
