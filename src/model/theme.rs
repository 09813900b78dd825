//! Theme models: the installed-theme record, the validated option sum type
//! behind the per-theme "more" popover, and the popover state machine.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// An installed theme as listed by `wp theme list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme slug, eg "twentysixteen"
    pub name: String,
    /// Display title; falls back to the slug when absent
    #[serde(default)]
    pub title: String,
    /// "active", "inactive" or "parent"
    pub status: String,
    #[serde(default)]
    pub version: String,
    /// Pre-formatted price string; empty means a free theme
    #[serde(default)]
    pub price: String,
    /// Whether the user has purchased this theme
    #[serde(default)]
    pub purchased: bool,
}

impl Theme {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

/// Parse the JSON emitted by `wp theme list --format=json`
pub fn parse_theme_list(json: &str) -> Result<Vec<Theme>> {
    let themes = serde_json::from_str(json)?;
    Ok(themes)
}

/// Semantic action behind an actionable popover entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Preview,
    Purchase,
    Activate,
    Customize,
}

impl ThemeAction {
    /// Event name recorded when the entry is chosen
    pub fn event_name(&self) -> &'static str {
        match self {
            ThemeAction::Preview => "theme_preview_click",
            ThemeAction::Purchase => "theme_purchase_click",
            ThemeAction::Activate => "theme_activate_click",
            ThemeAction::Customize => "theme_customize_click",
        }
    }
}

/// One entry of the theme popover menu.
///
/// Entries are validated at construction rather than at render time; an
/// empty label or URL is a construction error, never a blank menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeOption {
    Url { label: String, url: String },
    Action { label: String, action: ThemeAction },
    Separator,
}

impl ThemeOption {
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let url = url.into();
        if label.is_empty() {
            bail!("theme option label must not be empty");
        }
        if url.is_empty() {
            bail!("theme option URL must not be empty");
        }
        Ok(ThemeOption::Url { label, url })
    }

    pub fn action(label: impl Into<String>, action: ThemeAction) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            bail!("theme option label must not be empty");
        }
        Ok(ThemeOption::Action { label, action })
    }

    /// Separators are not selectable
    pub fn is_selectable(&self) -> bool {
        !matches!(self, ThemeOption::Separator)
    }

    pub fn label(&self) -> &str {
        match self {
            ThemeOption::Url { label, .. } | ThemeOption::Action { label, .. } => label,
            ThemeOption::Separator => "",
        }
    }
}

/// Context the visibility rules are evaluated against
#[derive(Debug, Clone, Default)]
pub struct ThemeOptionContext {
    /// True when browsing without an account (signup flows apply)
    pub logged_out: bool,
    /// Whether the site supports the customizer
    pub customizable: bool,
    /// Base URL used for detail/signup links
    pub site_url: String,
}

/// Build the popover entries for a theme, applying the per-entry
/// visibility rules. The separator splits actions from plain links and is
/// dropped when either side ends up empty.
pub fn build_theme_options(theme: &Theme, ctx: &ThemeOptionContext) -> Result<Vec<ThemeOption>> {
    let mut actions = Vec::new();

    if ctx.logged_out {
        actions.push(ThemeOption::url(
            "Pick this design",
            format!("{}/start?theme={}", ctx.site_url, theme.name),
        )?);
    }
    if !theme.is_active() {
        actions.push(ThemeOption::action("Live demo", ThemeAction::Preview)?);
    }
    if !ctx.logged_out && !theme.is_active() && !theme.purchased && !theme.price.is_empty() {
        actions.push(ThemeOption::action("Purchase", ThemeAction::Purchase)?);
    }
    if !ctx.logged_out && !theme.is_active() && (theme.price.is_empty() || theme.purchased) {
        actions.push(ThemeOption::action("Activate", ThemeAction::Activate)?);
    }
    if theme.is_active() && ctx.customizable {
        actions.push(ThemeOption::action("Customize", ThemeAction::Customize)?);
    }

    let mut links = vec![ThemeOption::url(
        "Details",
        format!("{}/theme/{}", ctx.site_url, theme.name),
    )?];
    // Free themes have no support docs
    if !theme.price.is_empty() {
        links.push(ThemeOption::url(
            "Setup",
            format!("{}/theme/{}/support", ctx.site_url, theme.name),
        )?);
    }

    let mut options = actions;
    if !options.is_empty() && !links.is_empty() {
        options.push(ThemeOption::Separator);
    }
    options.extend(links);
    Ok(options)
}

/// Popover visibility as an explicit state value rather than a mutable flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Popover {
    #[default]
    Closed,
    Open {
        selected: usize,
    },
}

impl Popover {
    pub fn is_open(&self) -> bool {
        matches!(self, Popover::Open { .. })
    }

    pub fn open(&mut self) {
        *self = Popover::Open { selected: 0 };
    }

    pub fn close(&mut self) {
        *self = Popover::Closed;
    }

    pub fn toggle(&mut self) {
        match self {
            Popover::Closed => self.open(),
            Popover::Open { .. } => self.close(),
        }
    }

    /// Move the selection to the next selectable entry, skipping separators
    pub fn select_next(&mut self, options: &[ThemeOption]) {
        if let Popover::Open { selected } = self {
            let mut idx = *selected;
            for _ in 0..options.len() {
                idx = (idx + 1) % options.len().max(1);
                if options.get(idx).is_some_and(ThemeOption::is_selectable) {
                    *selected = idx;
                    return;
                }
            }
        }
    }

    /// Move the selection to the previous selectable entry
    pub fn select_prev(&mut self, options: &[ThemeOption]) {
        if let Popover::Open { selected } = self {
            let len = options.len().max(1);
            let mut idx = *selected;
            for _ in 0..options.len() {
                idx = (idx + len - 1) % len;
                if options.get(idx).is_some_and(ThemeOption::is_selectable) {
                    *selected = idx;
                    return;
                }
            }
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match self {
            Popover::Open { selected } => Some(*selected),
            Popover::Closed => None,
        }
    }
}
