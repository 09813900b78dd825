//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `SiteSettings` - the nested exporter state tree read by the selectors
//! - `selectors` - pure projections over that tree
//! - `InstallRun` - the plugin setup workflow view model
//! - `ModalStack` - modal overlay management

pub mod exporter;
pub mod install;
pub mod invite;
pub mod modal;
pub mod run;
pub mod selectors;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use exporter::{ExportingState, SiteSettings};
pub use install::{InstallEvent, InstallRun, Step, StepStatus, WorkflowStatus};
pub use invite::{Invite, InviteFormState};
pub use run::{CommandOutput, RunStatus};
pub use theme::{Popover, Theme, ThemeAction, ThemeOption, ThemeOptionContext};
