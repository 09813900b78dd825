//! Data models for the plugin setup workflow
//!
//! A run is an ordered list of named steps executed strictly one after the
//! other. The installer service pushes `InstallEvent`s as steps start and
//! finish; `InstallRun` is the caller-owned view updated by applying those
//! events. Terminal states are final: retrying means building a new run.

/// One named unit of asynchronous work in the setup sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Stable identifier, eg "install-vaultpress"
    pub name: String,
    /// Display label, eg "Installing vaultpress"
    pub label: String,
    /// wp-cli arguments the executor runs for this step
    pub args: Vec<String>,
}

/// Status of an individual step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Overall status of a workflow run, derived from its step statuses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Running,
    Succeeded,
    Failed {
        step: String,
        error: String,
    },
    Cancelled,
}

/// Progress notification pushed by the installer.
///
/// Steps are referenced by index into the run's step list. Exactly one
/// terminal event (`Completed`, `Failed`, or `Cancelled`) ends a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    StepStarted(usize),
    StepSucceeded(usize),
    StepFailed(usize, String),
    Completed,
    Failed { step: usize, error: String },
    Cancelled,
}

/// A step paired with its current status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepState {
    pub step: Step,
    pub status: StepStatus,
}

/// Caller-owned view of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct InstallRun {
    pub steps: Vec<StepState>,
    pub status: WorkflowStatus,
}

impl InstallRun {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps
                .into_iter()
                .map(|step| StepState { step, status: StepStatus::Pending })
                .collect(),
            status: WorkflowStatus::Running,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status != WorkflowStatus::Running
    }

    /// Fold a progress event into the run view
    pub fn apply(&mut self, event: &InstallEvent) {
        match event {
            InstallEvent::StepStarted(i) => self.set_step_status(*i, StepStatus::Running),
            InstallEvent::StepSucceeded(i) => self.set_step_status(*i, StepStatus::Succeeded),
            InstallEvent::StepFailed(i, _) => self.set_step_status(*i, StepStatus::Failed),
            InstallEvent::Completed => self.status = WorkflowStatus::Succeeded,
            InstallEvent::Failed { step, error } => {
                let name = self
                    .steps
                    .get(*step)
                    .map(|s| s.step.name.clone())
                    .unwrap_or_default();
                self.status = WorkflowStatus::Failed { step: name, error: error.clone() };
            }
            InstallEvent::Cancelled => self.status = WorkflowStatus::Cancelled,
        }
    }

    fn set_step_status(&mut self, index: usize, status: StepStatus) {
        if let Some(state) = self.steps.get_mut(index) {
            state.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str) -> Step {
        Step {
            name: name.to_string(),
            label: name.to_string(),
            args: vec![],
        }
    }

    #[test]
    fn test_new_run_is_pending_and_running() {
        let run = InstallRun::new(vec![step("a"), step("b")]);
        assert_eq!(run.status, WorkflowStatus::Running);
        assert!(run.steps.iter().all(|s| s.status == StepStatus::Pending));
        assert!(!run.is_finished());
    }

    #[test]
    fn test_apply_success_sequence() {
        let mut run = InstallRun::new(vec![step("a"), step("b")]);

        run.apply(&InstallEvent::StepStarted(0));
        assert_eq!(run.steps[0].status, StepStatus::Running);
        run.apply(&InstallEvent::StepSucceeded(0));
        run.apply(&InstallEvent::StepStarted(1));
        run.apply(&InstallEvent::StepSucceeded(1));
        run.apply(&InstallEvent::Completed);

        assert_eq!(run.status, WorkflowStatus::Succeeded);
        assert!(run.steps.iter().all(|s| s.status == StepStatus::Succeeded));
        assert!(run.is_finished());
    }

    #[test]
    fn test_apply_failure_carries_step_identity() {
        let mut run = InstallRun::new(vec![step("install-x"), step("activate-x")]);

        run.apply(&InstallEvent::StepStarted(0));
        run.apply(&InstallEvent::StepFailed(0, "boom".to_string()));
        run.apply(&InstallEvent::Failed { step: 0, error: "boom".to_string() });

        assert_eq!(run.steps[0].status, StepStatus::Failed);
        assert_eq!(run.steps[1].status, StepStatus::Pending);
        assert_eq!(
            run.status,
            WorkflowStatus::Failed { step: "install-x".to_string(), error: "boom".to_string() }
        );
    }

    #[test]
    fn test_apply_cancelled() {
        let mut run = InstallRun::new(vec![step("a")]);
        run.apply(&InstallEvent::Cancelled);
        assert_eq!(run.status, WorkflowStatus::Cancelled);
        assert!(run.is_finished());
    }
}
