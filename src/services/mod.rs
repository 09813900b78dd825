//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - wp-cli command builders
//! - Background command execution
//! - The plugin setup workflow sequencer
//! - Analytics event recording

pub mod analytics;
pub mod installer;
pub mod runner;
pub mod wp;

pub use installer::{InstallContext, PluginInstaller, StepExecutor, WpCliExecutor};
pub use runner::CommandRunner;
pub use wp::{
    build_export_command, build_invite_accept_command, build_settings_fetch_command,
    build_theme_activate_command, build_theme_list_command, ensure_settings_script,
};
