//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background work
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next tab
    NextTab,
    /// Move to previous tab
    PrevTab,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog
    OpenHelp,
    /// Close the current modal
    CloseModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────
    /// Re-fetch the exporter advanced settings
    RefreshSettings,
    /// Start a content export with the chosen filters
    StartExport,

    // ─────────────────────────────────────────────────────────────────────────
    // Plugin Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the plan-setup dialog for the selected plugins
    OpenPlanSetup,
    /// Begin the install/activate sequence
    StartInstall,
    /// Cancel the running install sequence
    CancelInstall,

    // ─────────────────────────────────────────────────────────────────────────
    // Themes
    // ─────────────────────────────────────────────────────────────────────────
    /// Re-fetch the theme list
    RefreshThemes,
    /// Activate the named theme
    ActivateTheme(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Invites
    // ─────────────────────────────────────────────────────────────────────────
    /// Accept the selected invite
    AcceptInvite,
    /// Accept a follower invite as email-only subscription
    AcceptInviteByEmail,

    // ─────────────────────────────────────────────────────────────────────────
    // Setup Wizard
    // ─────────────────────────────────────────────────────────────────────────
    /// Confirm first-run configuration
    SetupConfirm,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::RefreshSettings => write!(f, "RefreshSettings"),
            Action::StartExport => write!(f, "StartExport"),
            Action::OpenPlanSetup => write!(f, "OpenPlanSetup"),
            Action::StartInstall => write!(f, "StartInstall"),
            Action::CancelInstall => write!(f, "CancelInstall"),
            Action::RefreshThemes => write!(f, "RefreshThemes"),
            Action::ActivateTheme(name) => write!(f, "ActivateTheme({})", name),
            Action::AcceptInvite => write!(f, "AcceptInvite"),
            Action::AcceptInviteByEmail => write!(f, "AcceptInviteByEmail"),
            Action::SetupConfirm => write!(f, "SetupConfirm"),
        }
    }
}
