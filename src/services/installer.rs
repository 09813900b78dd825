//! Plugin setup workflow sequencer
//!
//! Runs a fixed, ordered list of install/activate steps to completion or
//! first failure on a background thread, pushing typed progress events over
//! a channel the UI polls. Exactly one step is in flight at any time; step
//! N+1 does not begin until step N has succeeded. A cancellation token is
//! checked between steps, and each step is bounded by a timeout that maps
//! onto its failure path.

use crate::model::install::{InstallEvent, InstallRun, Step};
use crate::services::wp::{plugin_activate_args, plugin_install_args};
use anyhow::{bail, Context, Result};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default bound on a single step; a slow remote install beyond this is
/// treated as that step failing
const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(300);

/// Target site and the plugins to set up
#[derive(Debug, Clone)]
pub struct InstallContext {
    pub site_path: String,
    pub plugins: Vec<String>,
}

/// Opaque capability that performs one step's remote operation
pub trait StepExecutor: Send + Sync + 'static {
    fn execute(&self, step: &Step) -> Result<()>;
}

/// Production executor: shells out to wp-cli for each step
pub struct WpCliExecutor {
    wp_binary_path: String,
    site_path: String,
}

impl WpCliExecutor {
    pub fn new(wp_binary_path: &str, site_path: &str) -> Self {
        Self {
            wp_binary_path: if wp_binary_path.is_empty() {
                "wp".to_string()
            } else {
                wp_binary_path.to_string()
            },
            site_path: site_path.to_string(),
        }
    }
}

impl StepExecutor for WpCliExecutor {
    fn execute(&self, step: &Step) -> Result<()> {
        let output = Command::new(&self.wp_binary_path)
            .args(&step.args)
            .arg(format!("--path={}", self.site_path))
            .output()
            .with_context(|| format!("failed to launch {}", self.wp_binary_path))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{}", stderr.trim())
        }
    }
}

/// Expand the context into the ordered step list: install then configure,
/// per plugin, in the order the plugins were given
pub fn plan_steps(context: &InstallContext) -> Vec<Step> {
    let mut steps = Vec::with_capacity(context.plugins.len() * 2);
    for plugin in &context.plugins {
        steps.push(Step {
            name: format!("install-{}", plugin),
            label: format!("Installing {}", plugin),
            args: plugin_install_args(plugin),
        });
        steps.push(Step {
            name: format!("configure-{}", plugin),
            label: format!("Configuring {}", plugin),
            args: plugin_activate_args(plugin),
        });
    }
    steps
}

/// An in-flight installation owned by the initiating component
struct ActiveInstall {
    receiver: Receiver<InstallEvent>,
    cancel: Arc<AtomicBool>,
    start_instant: Instant,
}

/// The sequencer service. Holds at most one active run; starting while a
/// run is in flight fails fast instead of racing two sequences.
pub struct PluginInstaller {
    active: Option<ActiveInstall>,
    step_timeout: Duration,
}

impl Default for PluginInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginInstaller {
    pub fn new() -> Self {
        Self {
            active: None,
            step_timeout: DEFAULT_STEP_TIMEOUT,
        }
    }

    /// Override the per-step timeout
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start_instant(&self) -> Option<Instant> {
        self.active.as_ref().map(|a| a.start_instant)
    }

    /// Start a run. Fails synchronously on an empty plugin list or when a
    /// run is already in progress. Returns the caller-owned run view; the
    /// caller updates it by polling.
    pub fn start<E: StepExecutor>(
        &mut self,
        context: &InstallContext,
        executor: E,
    ) -> Result<InstallRun> {
        if context.plugins.is_empty() {
            bail!("no plugins to install");
        }
        if self.active.is_some() {
            bail!("an installation is already in progress");
        }

        let steps = plan_steps(context);
        let run = InstallRun::new(steps.clone());

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);
        let executor = Arc::new(executor);
        let step_timeout = self.step_timeout;

        thread::spawn(move || {
            Self::run_steps(&steps, &executor, step_timeout, &worker_cancel, &tx);
        });

        self.active = Some(ActiveInstall {
            receiver: rx,
            cancel,
            start_instant: Instant::now(),
        });

        Ok(run)
    }

    /// Drain any pending progress events
    pub fn poll_events(&self) -> Vec<InstallEvent> {
        let Some(ref active) = self.active else {
            return Vec::new();
        };

        let mut events = Vec::new();
        while let Ok(event) = active.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Fold pending events into the run view, returns true on updates
    pub fn poll(&self, run: &mut InstallRun) -> bool {
        let events = self.poll_events();
        for event in &events {
            run.apply(event);
        }
        !events.is_empty()
    }

    /// Request cancellation; takes effect before the next step starts
    pub fn cancel(&self) {
        if let Some(ref active) = self.active {
            active.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Drop the finished run so a new one may start
    pub fn clear(&mut self) {
        self.active = None;
    }

    fn run_steps<E: StepExecutor>(
        steps: &[Step],
        executor: &Arc<E>,
        step_timeout: Duration,
        cancel: &AtomicBool,
        tx: &mpsc::Sender<InstallEvent>,
    ) {
        for (index, step) in steps.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                let _ = tx.send(InstallEvent::Cancelled);
                return;
            }

            let _ = tx.send(InstallEvent::StepStarted(index));

            match Self::execute_with_timeout(executor, step, step_timeout) {
                Ok(()) => {
                    let _ = tx.send(InstallEvent::StepSucceeded(index));
                }
                Err(error) => {
                    let error = error.to_string();
                    let _ = tx.send(InstallEvent::StepFailed(index, error.clone()));
                    let _ = tx.send(InstallEvent::Failed { step: index, error });
                    return;
                }
            }
        }

        let _ = tx.send(InstallEvent::Completed);
    }

    /// Run one step on its own thread and bound the wait. A timeout or a
    /// panicked executor both land on the step's failure path.
    fn execute_with_timeout<E: StepExecutor>(
        executor: &Arc<E>,
        step: &Step,
        timeout: Duration,
    ) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        let executor = Arc::clone(executor);
        let step = step.clone();

        thread::spawn(move || {
            let _ = tx.send(executor.execute(&step));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                bail!("step timed out after {}s", timeout.as_secs())
            }
            Err(RecvTimeoutError::Disconnected) => bail!("step execution aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::install::{StepStatus, WorkflowStatus};

    /// Executor that fails on a configured step name, with optional delay
    struct MockExecutor {
        fail_on: Option<String>,
        delay: Option<Duration>,
    }

    impl MockExecutor {
        fn succeeding() -> Self {
            Self { fail_on: None, delay: None }
        }

        fn failing_on(name: &str) -> Self {
            Self { fail_on: Some(name.to_string()), delay: None }
        }

        fn slow(delay: Duration) -> Self {
            Self { fail_on: None, delay: Some(delay) }
        }
    }

    impl StepExecutor for MockExecutor {
        fn execute(&self, step: &Step) -> Result<()> {
            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }
            match &self.fail_on {
                Some(name) if *name == step.name => bail!("mock failure"),
                _ => Ok(()),
            }
        }
    }

    fn context(plugins: &[&str]) -> InstallContext {
        InstallContext {
            site_path: "/srv/wp".to_string(),
            plugins: plugins.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Drain events until a terminal one arrives or the deadline passes
    fn collect_events(installer: &PluginInstaller) -> Vec<InstallEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();

        while Instant::now() < deadline {
            events.extend(installer.poll_events());
            if events.iter().any(|e| {
                matches!(
                    e,
                    InstallEvent::Completed
                        | InstallEvent::Failed { .. }
                        | InstallEvent::Cancelled
                )
            }) {
                return events;
            }
            thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn test_plan_steps_orders_install_before_configure() {
        let steps = plan_steps(&context(&["vaultpress", "akismet"]));
        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "install-vaultpress",
                "configure-vaultpress",
                "install-akismet",
                "configure-akismet"
            ]
        );
    }

    #[test]
    fn test_empty_plugin_list_fails_synchronously() {
        let mut installer = PluginInstaller::new();
        let result = installer.start(&context(&[]), MockExecutor::succeeding());
        assert!(result.is_err());
        assert!(!installer.is_running());
    }

    #[test]
    fn test_all_steps_succeed_in_order() {
        let mut installer = PluginInstaller::new();
        let mut run = installer
            .start(&context(&["vaultpress"]), MockExecutor::succeeding())
            .unwrap();

        let events = collect_events(&installer);
        assert_eq!(
            events,
            vec![
                InstallEvent::StepStarted(0),
                InstallEvent::StepSucceeded(0),
                InstallEvent::StepStarted(1),
                InstallEvent::StepSucceeded(1),
                InstallEvent::Completed,
            ]
        );

        for event in &events {
            run.apply(event);
        }
        assert_eq!(run.status, WorkflowStatus::Succeeded);
        assert!(run.steps.iter().all(|s| s.status == StepStatus::Succeeded));
    }

    #[test]
    fn test_failure_halts_before_later_steps() {
        // Three steps; the second fails. The third must never start.
        let mut installer = PluginInstaller::new();
        let mut run = installer
            .start(
                &context(&["vaultpress", "akismet"]),
                MockExecutor::failing_on("configure-vaultpress"),
            )
            .unwrap();

        let events = collect_events(&installer);
        assert_eq!(
            events,
            vec![
                InstallEvent::StepStarted(0),
                InstallEvent::StepSucceeded(0),
                InstallEvent::StepStarted(1),
                InstallEvent::StepFailed(1, "mock failure".to_string()),
                InstallEvent::Failed { step: 1, error: "mock failure".to_string() },
            ]
        );

        for event in &events {
            run.apply(event);
        }
        assert_eq!(
            run.status,
            WorkflowStatus::Failed {
                step: "configure-vaultpress".to_string(),
                error: "mock failure".to_string(),
            }
        );
        // Steps after the failure stay pending
        assert_eq!(run.steps[2].status, StepStatus::Pending);
        assert_eq!(run.steps[3].status, StepStatus::Pending);
    }

    #[test]
    fn test_duplicate_start_fails_fast() {
        let mut installer = PluginInstaller::new();
        installer
            .start(&context(&["vaultpress"]), MockExecutor::slow(Duration::from_secs(2)))
            .unwrap();

        let second = installer.start(&context(&["akismet"]), MockExecutor::succeeding());
        assert!(second.is_err());

        // After clearing, a new run may start
        installer.cancel();
        let _ = collect_events(&installer);
        installer.clear();
        assert!(installer
            .start(&context(&["akismet"]), MockExecutor::succeeding())
            .is_ok());
    }

    #[test]
    fn test_cancellation_between_steps() {
        let mut installer = PluginInstaller::new();
        installer
            .start(
                &context(&["vaultpress"]),
                MockExecutor::slow(Duration::from_millis(100)),
            )
            .unwrap();

        // Cancel while the first step is still running
        installer.cancel();
        let events = collect_events(&installer);

        assert_eq!(events.last(), Some(&InstallEvent::Cancelled));
        // The first step may finish, but no further step starts
        assert!(!events.contains(&InstallEvent::StepStarted(1)));
    }

    #[test]
    fn test_step_timeout_maps_to_failure() {
        let mut installer =
            PluginInstaller::new().with_step_timeout(Duration::from_millis(20));
        let mut run = installer
            .start(&context(&["vaultpress"]), MockExecutor::slow(Duration::from_secs(5)))
            .unwrap();

        let events = collect_events(&installer);
        assert!(matches!(events.last(), Some(InstallEvent::Failed { step: 0, .. })));

        for event in &events {
            run.apply(event);
        }
        assert!(matches!(run.status, WorkflowStatus::Failed { ref step, .. }
            if step == "install-vaultpress"));
    }
}
