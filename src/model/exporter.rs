//! Exporter state tree
//!
//! Nested plain-data mirror of the site-settings slice of the store:
//! `SiteSettings { exporter: { data, ui } }`. The `data` subtree is either
//! entirely absent (not yet fetched) or fully populated per section;
//! partial section population is not a representable state. The `ui`
//! subtree holds the transient exporting-state machine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase of an export activity, driven by dispatched actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportingState {
    #[default]
    Idle,
    Starting,
    Exporting,
    Complete,
    Failed,
}

/// An author record as returned by the settings fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "ID")]
    pub id: u64,
    pub name: String,
}

/// A post status record (machine name plus display label)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStatus {
    pub name: String,
    pub label: String,
}

/// A year/month pair describing a month that has exportable content.
///
/// Months are 1-indexed (Jan = 1). A zero year or month means the content
/// has no publish date; the selector layer maps it to a sentinel option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDate {
    pub year: i32,
    pub month: u32,
}

/// A category record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// Per-section (post type) exportable option sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionSettings {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub statuses: Vec<PostStatus>,
    #[serde(default)]
    pub export_date_options: Vec<ExportDate>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Full advanced-settings dataset, keyed by section name ("post", "page", …).
///
/// BTreeMap so picker ordering is deterministic across fetches.
pub type AdvancedSettings = BTreeMap<String, SectionSettings>;

/// The `data` subtree of the exporter state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExporterData {
    /// Site the settings were requested for; `None` until a fetch is dispatched
    pub for_site_id: Option<u64>,
    /// `None` while the fetch is in flight, `Some` once loaded (even if empty)
    pub advanced_settings: Option<AdvancedSettings>,
}

/// The `ui` subtree of the exporter state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExporterUi {
    pub exporting_state: ExportingState,
}

/// The exporter slice: transient data plus UI state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exporter {
    pub data: ExporterData,
    pub ui: ExporterUi,
}

/// Root of the site-settings state tree read by the selector layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSettings {
    pub exporter: Exporter,
}

impl SiteSettings {
    /// Mark a settings fetch as dispatched for the given site.
    ///
    /// Clears any previously loaded dataset, so `is_loading_options`
    /// reports true until the new dataset arrives.
    pub fn begin_settings_fetch(&mut self, site_id: u64) {
        self.exporter.data.for_site_id = Some(site_id);
        self.exporter.data.advanced_settings = None;
    }

    /// Install a freshly fetched dataset. The dataset arrives whole; there
    /// is no partial-population path.
    pub fn receive_settings(&mut self, settings: AdvancedSettings) {
        self.exporter.data.advanced_settings = Some(settings);
    }

    pub fn set_exporting_state(&mut self, state: ExportingState) {
        self.exporter.ui.exporting_state = state;
    }
}

/// Filter values chosen on the export screen, fed to the export command
/// builder. `None` means "everything"; date values are `YYYY-MM-DD` picker
/// values, with the `"0"` unknown-date sentinel treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilters {
    pub post_type: String,
    pub author: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Parse a fetched advanced-settings payload.
///
/// A malformed payload is an error, not an empty dataset: the selector
/// layer's degrade-to-empty policy only covers absent data, never data
/// that arrived in the wrong shape.
pub fn parse_advanced_settings(json: &str) -> anyhow::Result<AdvancedSettings> {
    let settings = serde_json::from_str(json)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_lifecycle_preserves_absent_vs_empty() {
        let mut state = SiteSettings::default();
        assert!(state.exporter.data.for_site_id.is_none());
        assert!(state.exporter.data.advanced_settings.is_none());

        state.begin_settings_fetch(77);
        assert_eq!(state.exporter.data.for_site_id, Some(77));
        assert!(state.exporter.data.advanced_settings.is_none());

        // An empty dataset is still a loaded dataset
        state.receive_settings(AdvancedSettings::new());
        assert_eq!(state.exporter.data.advanced_settings, Some(AdvancedSettings::new()));
    }

    #[test]
    fn test_refetch_clears_loaded_dataset() {
        let mut state = SiteSettings::default();
        state.begin_settings_fetch(1);
        state.receive_settings(AdvancedSettings::new());

        state.begin_settings_fetch(2);
        assert!(state.exporter.data.advanced_settings.is_none());
    }

    #[test]
    fn test_parse_advanced_settings() {
        let json = r#"{
            "post": {
                "authors": [{"ID": 1, "name": "admin"}],
                "statuses": [{"name": "publish", "label": "Published"}],
                "export_date_options": [{"year": 2015, "month": 12}, {"year": 0, "month": 0}],
                "categories": [{"name": "news"}]
            }
        }"#;

        let settings = parse_advanced_settings(json).unwrap();
        let post = settings.get("post").unwrap();
        assert_eq!(post.authors[0].name, "admin");
        assert_eq!(post.export_date_options.len(), 2);
    }

    #[test]
    fn test_parse_malformed_settings_fails_loudly() {
        // authors must be a list of records, not scalars
        let json = r#"{"post": {"authors": [1, 2, 3]}}"#;
        assert!(parse_advanced_settings(json).is_err());
    }
}
