//! UI components

pub mod export;
pub mod help_dialog;
pub mod invites;
pub mod layout;
pub mod plan_setup;
pub mod plugins;
pub mod quit_dialog;
pub mod setup;
pub mod themes;

pub use export::ExportComponent;
pub use help_dialog::HelpDialog;
pub use invites::InvitesComponent;
pub use layout::{calculate_main_layout, centered_popup, truncate_label, MainLayout};
pub use plan_setup::PlanSetupDialog;
pub use plugins::PluginsComponent;
pub use quit_dialog::QuitDialog;
pub use setup::SetupWizard;
pub use themes::ThemesComponent;
