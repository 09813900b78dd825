//! UI state - presentation enums shared across components

/// Tab selection in the main UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Export,
    Plugins,
    Themes,
    Invites,
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        vec![Tab::Export, Tab::Plugins, Tab::Themes, Tab::Invites]
    }

    pub fn name(&self) -> &str {
        match self {
            Tab::Export => "Export",
            Tab::Plugins => "Plugins",
            Tab::Themes => "Themes",
            Tab::Invites => "Invites",
        }
    }
}

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Setup,
    Running,
}
