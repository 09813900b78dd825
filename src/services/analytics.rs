//! Fire-and-forget analytics event recorder
//!
//! Appends one JSON line per user action to an event log under the config
//! directory. Recording is best effort; callers never depend on the result
//! and failures are swallowed.

use crate::config::Config;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

/// Record a named user action. Never errors.
pub fn record_event(name: &str) {
    let Some(dir) = Config::config_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    let entry = serde_json::json!({
        "event": name,
        "timestamp": Local::now().to_rfc3339(),
    });

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("events.log"))
    {
        let _ = writeln!(file, "{}", entry);
    }
}
