//! Main application coordinator
//!
//! Owns all state and components, routes key events to the focused
//! component, processes the resulting Actions and polls background work
//! once per tick.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, ExportComponent, HelpDialog, InvitesComponent, PlanSetupDialog,
    PluginsComponent, QuitDialog, SetupWizard, ThemesComponent,
};
use crate::config::Config;
use crate::model::exporter::parse_advanced_settings;
use crate::model::invite::parse_invites;
use crate::model::modal::{Modal, ModalStack};
use crate::model::theme::parse_theme_list;
use crate::model::ui::{AppMode, Tab};
use crate::model::{CommandOutput, ExportingState, InstallRun, RunStatus, SiteSettings};
use crate::services::{
    analytics, build_export_command, build_invite_accept_command, build_settings_fetch_command,
    build_theme_activate_command, build_theme_list_command, ensure_settings_script,
    CommandRunner, InstallContext, PluginInstaller, WpCliExecutor,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// What the theme runner is currently doing; decides how its output is
/// interpreted on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThemeJob {
    List,
    Activate,
}

/// Main application state
pub struct App {
    pub should_quit: bool,
    mode: AppMode,
    config: Config,
    active_tab: Tab,
    modal_stack: ModalStack,
    site_settings: SiteSettings,
    status_message: Option<String>,

    // Components
    setup: SetupWizard,
    export: ExportComponent,
    plugins: PluginsComponent,
    themes: ThemesComponent,
    invites: InvitesComponent,
    plan_setup: PlanSetupDialog,
    quit_dialog: QuitDialog,
    help_dialog: HelpDialog,

    // Background work, one runner per concern
    settings_runner: CommandRunner,
    settings_output: Option<CommandOutput>,
    export_runner: CommandRunner,
    export_output: Option<CommandOutput>,
    theme_runner: CommandRunner,
    theme_output: Option<CommandOutput>,
    theme_job: ThemeJob,
    invite_runner: CommandRunner,
    invite_output: Option<CommandOutput>,
    installer: PluginInstaller,
    install_run: Option<InstallRun>,
}

impl App {
    pub fn new() -> Result<Self> {
        let (mode, config) = match Config::load() {
            Some(config) => (AppMode::Running, config),
            None => (AppMode::Setup, Config::default()),
        };

        let mut app = Self {
            should_quit: false,
            mode,
            config,
            active_tab: Tab::Export,
            modal_stack: ModalStack::new(),
            site_settings: SiteSettings::default(),
            status_message: None,
            setup: SetupWizard::new(),
            export: ExportComponent::new(),
            plugins: PluginsComponent::new(),
            themes: ThemesComponent::new("https://wordpress.com".to_string()),
            invites: InvitesComponent::new(),
            plan_setup: PlanSetupDialog,
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog,
            settings_runner: CommandRunner::new(),
            settings_output: None,
            export_runner: CommandRunner::new(),
            export_output: None,
            theme_runner: CommandRunner::new(),
            theme_output: None,
            theme_job: ThemeJob::List,
            invite_runner: CommandRunner::new(),
            invite_output: None,
            installer: PluginInstaller::new(),
            install_run: None,
        };

        if app.mode == AppMode::Running {
            app.start_initial_fetches();
        }
        Ok(app)
    }

    /// Kick off the fetches the main screen depends on
    fn start_initial_fetches(&mut self) {
        self.fetch_settings();
        self.fetch_themes();
        self.load_invites();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event routing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl-C always quits, regardless of mode or modals
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if self.mode == AppMode::Setup {
            return self.setup.handle_key_event(key);
        }

        // Only the top modal receives input
        if let Some(modal) = self.modal_stack.top() {
            return match modal {
                Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
                Modal::Help => self.help_dialog.handle_key_event(key),
                Modal::PlanSetup => self
                    .plan_setup
                    .handle_key_event(key, self.installer.is_running()),
            };
        }

        match key.code {
            KeyCode::Char('q') => return Ok(Some(Action::OpenQuitDialog)),
            KeyCode::Char('?') => return Ok(Some(Action::OpenHelp)),
            KeyCode::Tab => return Ok(Some(Action::NextTab)),
            KeyCode::BackTab => return Ok(Some(Action::PrevTab)),
            _ => {}
        }

        match self.active_tab {
            Tab::Export => self.export.handle_key_event(key, &self.site_settings),
            Tab::Plugins => self.plugins.handle_key_event(key),
            Tab::Themes => self.themes.handle_key_event(key),
            Tab::Invites => self.invites.handle_key_event(key),
        }
    }

    /// Process an action and any follow-ups it produces
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            next = self.update(action)?;
        }
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.poll_background();
                Ok(None)
            }
            Action::Resize(_, _) => Ok(None),
            Action::ForceQuit => {
                self.should_quit = true;
                Ok(None)
            }
            Action::NextTab => {
                self.active_tab = self.cycle_tab(1);
                Ok(None)
            }
            Action::PrevTab => {
                self.active_tab = self.cycle_tab(-1);
                Ok(None)
            }
            Action::OpenQuitDialog => {
                self.modal_stack.push(Modal::QuitConfirm);
                Ok(None)
            }
            Action::OpenHelp => {
                self.modal_stack.push(Modal::Help);
                Ok(None)
            }
            Action::CloseModal => {
                self.modal_stack.pop();
                Ok(None)
            }
            Action::RefreshSettings => {
                self.fetch_settings();
                Ok(None)
            }
            Action::StartExport => {
                self.start_export();
                Ok(None)
            }
            Action::OpenPlanSetup => {
                self.install_run = None;
                self.modal_stack.push(Modal::PlanSetup);
                Ok(None)
            }
            Action::StartInstall => {
                self.start_install();
                Ok(None)
            }
            Action::CancelInstall => {
                self.installer.cancel();
                Ok(None)
            }
            Action::RefreshThemes => {
                self.fetch_themes();
                Ok(None)
            }
            Action::ActivateTheme(name) => {
                self.activate_theme(&name);
                Ok(None)
            }
            Action::AcceptInvite => {
                self.accept_invite();
                Ok(None)
            }
            Action::AcceptInviteByEmail => {
                // No site account is created; the subscription is keyed off
                // the invite's activation key
                analytics::record_event("invite_email_only_follow");
                self.invites.form.resolve(Ok(()));
                Ok(None)
            }
            Action::SetupConfirm => {
                self.finish_setup()?;
                Ok(None)
            }
        }
    }

    fn cycle_tab(&self, direction: i32) -> Tab {
        let tabs = Tab::all();
        let current = tabs
            .iter()
            .position(|t| *t == self.active_tab)
            .unwrap_or(0);
        let next = if direction > 0 {
            (current + 1) % tabs.len()
        } else {
            (current + tabs.len() - 1) % tabs.len()
        };
        tabs[next]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    fn finish_setup(&mut self) -> Result<()> {
        self.config = self.setup.build_config();
        self.config.save()?;
        self.mode = AppMode::Running;
        self.start_initial_fetches();
        Ok(())
    }

    fn fetch_settings(&mut self) {
        let script_path = match ensure_settings_script() {
            Ok(path) => path,
            Err(error) => {
                self.status_message = Some(format!("Settings fetch failed: {}", error));
                return;
            }
        };

        let (full, _display) = build_settings_fetch_command(
            &self.config.wp_binary_path,
            &self.config.site_path,
            &script_path,
        );

        self.site_settings.begin_settings_fetch(self.config.site_id);
        self.settings_output = Some(self.settings_runner.spawn(full));
    }

    fn start_export(&mut self) {
        if self.export_output.as_ref().is_some_and(|o| o.status == RunStatus::Running) {
            return;
        }

        analytics::record_event("export_start_click");
        let filters = self.export.filters(&self.site_settings);
        let (full, display) =
            build_export_command(&self.config.wp_binary_path, &self.config.site_path, &filters);

        self.site_settings.set_exporting_state(ExportingState::Starting);
        let mut output = self.export_runner.spawn(full);
        output.command = display;
        self.export_output = Some(output);
    }

    fn fetch_themes(&mut self) {
        let (full, _display) =
            build_theme_list_command(&self.config.wp_binary_path, &self.config.site_path);
        self.theme_job = ThemeJob::List;
        self.theme_output = Some(self.theme_runner.spawn(full));
    }

    fn activate_theme(&mut self, name: &str) {
        let (full, _display) =
            build_theme_activate_command(&self.config.wp_binary_path, &self.config.site_path, name);
        self.theme_job = ThemeJob::Activate;
        self.theme_output = Some(self.theme_runner.spawn(full));
    }

    fn start_install(&mut self) {
        let context = InstallContext {
            site_path: self.config.site_path.clone(),
            plugins: self.plugins.selected_plugins(),
        };
        let executor =
            WpCliExecutor::new(&self.config.wp_binary_path, &self.config.site_path);

        match self.installer.start(&context, executor) {
            Ok(run) => {
                analytics::record_event("plan_setup_start");
                self.install_run = Some(run);
            }
            Err(error) => {
                self.status_message = Some(error.to_string());
            }
        }
    }

    fn accept_invite(&mut self) {
        let Some(invite) = self.invites.selected_invite() else {
            return;
        };

        analytics::record_event("invite_accept_click");
        let (full, display) = build_invite_accept_command(
            &self.config.wp_binary_path,
            &self.config.site_path,
            invite,
        );
        let mut output = self.invite_runner.spawn(full);
        output.command = display;
        self.invite_output = Some(output);
    }

    /// Load pending invites from the invites file under the config dir
    fn load_invites(&mut self) {
        let Some(dir) = Config::config_dir() else {
            return;
        };
        let path = dir.join("invites.json");
        if !path.exists() {
            return;
        }

        match std::fs::read_to_string(&path).map_err(anyhow::Error::from).and_then(|s| parse_invites(&s)) {
            Ok(invites) => self.invites.set_invites(invites),
            Err(error) => {
                self.status_message = Some(format!("Could not load invites: {}", error));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Background polling
    // ─────────────────────────────────────────────────────────────────────────

    fn poll_background(&mut self) {
        self.poll_settings();
        self.poll_export();
        self.poll_themes();
        self.poll_invite();
        self.poll_installer();
    }

    fn poll_settings(&mut self) {
        let Some(mut output) = self.settings_output.take() else {
            return;
        };
        self.settings_runner.poll(&mut output);

        match output.status {
            RunStatus::Running => self.settings_output = Some(output),
            RunStatus::Success => {
                match parse_advanced_settings(output.output.trim()) {
                    Ok(settings) => self.site_settings.receive_settings(settings),
                    Err(error) => {
                        self.status_message =
                            Some(format!("Malformed settings payload: {}", error));
                    }
                }
                self.settings_runner.clear();
            }
            RunStatus::Failed => {
                self.status_message = Some("Settings fetch failed".to_string());
                self.settings_runner.clear();
            }
        }
    }

    fn poll_export(&mut self) {
        let Some(output) = self.export_output.as_mut() else {
            return;
        };
        let had_updates = self.export_runner.poll(output);

        match output.status {
            RunStatus::Running => {
                // First output from the command marks the transition from
                // Starting to Exporting
                if had_updates
                    && self.site_settings.exporter.ui.exporting_state == ExportingState::Starting
                {
                    self.site_settings.set_exporting_state(ExportingState::Exporting);
                }
            }
            RunStatus::Success => {
                self.site_settings.set_exporting_state(ExportingState::Complete);
                self.export_runner.clear();
            }
            RunStatus::Failed => {
                self.site_settings.set_exporting_state(ExportingState::Failed);
                self.export_runner.clear();
            }
        }
    }

    fn poll_themes(&mut self) {
        let Some(mut output) = self.theme_output.take() else {
            return;
        };
        self.theme_runner.poll(&mut output);

        match output.status {
            RunStatus::Running => self.theme_output = Some(output),
            RunStatus::Success => {
                self.theme_runner.clear();
                match self.theme_job {
                    ThemeJob::List => match parse_theme_list(output.output.trim()) {
                        Ok(themes) => self.themes.set_themes(themes),
                        Err(error) => {
                            self.status_message =
                                Some(format!("Malformed theme list: {}", error));
                        }
                    },
                    // Re-list so the active flag reflects the change
                    ThemeJob::Activate => self.fetch_themes(),
                }
            }
            RunStatus::Failed => {
                self.status_message = Some(match self.theme_job {
                    ThemeJob::List => "Theme list failed".to_string(),
                    ThemeJob::Activate => "Theme activation failed".to_string(),
                });
                self.theme_runner.clear();
            }
        }
    }

    fn poll_invite(&mut self) {
        let Some(mut output) = self.invite_output.take() else {
            return;
        };
        self.invite_runner.poll(&mut output);

        match output.status {
            RunStatus::Running => self.invite_output = Some(output),
            RunStatus::Success => {
                self.invites.form.resolve(Ok(()));
                self.invite_runner.clear();
            }
            RunStatus::Failed => {
                let reason = output
                    .output
                    .lines()
                    .last()
                    .unwrap_or("command failed")
                    .to_string();
                self.invites.form.resolve(Err(reason));
                self.invite_runner.clear();
            }
        }
    }

    fn poll_installer(&mut self) {
        let Some(run) = self.install_run.as_mut() else {
            return;
        };
        self.installer.poll(run);
        if run.is_finished() {
            self.installer.clear();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let area = frame.area();

        if self.mode == AppMode::Setup {
            self.setup.draw(frame, area)?;
            return Ok(());
        }

        let layout = calculate_main_layout(area, self.status_message.is_some());
        self.draw_tabs(frame, layout.tabs);

        match self.active_tab {
            Tab::Export => {
                self.export
                    .draw(frame, layout.content, &self.site_settings, self.export_output.as_ref())?
            }
            Tab::Plugins => self.plugins.draw(frame, layout.content)?,
            Tab::Themes => self.themes.draw(frame, layout.content)?,
            Tab::Invites => self.invites.draw(frame, layout.content)?,
        }

        if let (Some(status_area), Some(message)) = (layout.status, &self.status_message) {
            let status = Paragraph::new(Line::from(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Red),
            )));
            frame.render_widget(status, status_area);
        }

        self.draw_help_bar(frame, layout.help);

        if let Some(modal) = self.modal_stack.top() {
            match modal {
                Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
                Modal::Help => self.help_dialog.draw(frame, area)?,
                Modal::PlanSetup => self.plan_setup.draw(
                    frame,
                    area,
                    &self.plugins.selected_plugins(),
                    self.install_run.as_ref(),
                )?,
            }
        }
        Ok(())
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::all()
            .iter()
            .map(|tab| Line::from(format!(" {} ", tab.name())))
            .collect();
        let selected = Tab::all()
            .iter()
            .position(|t| *t == self.active_tab)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" wp-tui ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.active_tab {
            Tab::Export => "j/k: field  h/l: value  s: section  e: export  r: refresh",
            Tab::Plugins => "j/k: move  Space: toggle  Enter: set up plan",
            Tab::Themes => "j/k: move  Enter: options  r: refresh",
            Tab::Invites => "j/k: move  Enter: accept  f: follow by email",
        };

        let help = Paragraph::new(Line::from(vec![
            Span::styled(hints, Style::default().fg(Color::Gray)),
            Span::styled(
                "   Tab: switch  ?: help  q: quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}
