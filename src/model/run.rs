//! Data models for background wp-cli command execution

use std::sync::mpsc::Receiver;

/// Status of a background command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Running,
    Success,
    Failed,
}

/// Accumulated output of a background command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub command: String,
    pub status: RunStatus,
    pub output: String,
}

impl CommandOutput {
    pub fn new(command: String) -> Self {
        Self {
            command,
            status: RunStatus::Running,
            output: String::new(),
        }
    }
}

/// Message types sent from background command threads
pub enum JobMessage {
    Output(String),
    Completed(Option<i32>),
    Error(String),
}

/// A command running in the background
pub struct BackgroundJob {
    pub receiver: Receiver<JobMessage>,
    pub start_instant: std::time::Instant,
}
