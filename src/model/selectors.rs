//! Selector layer - pure projections over the exporter state tree
//!
//! Selectors turn the nested state into flat, UI-ready option lists and
//! readiness flags. They are called on every read (no memoization), never
//! mutate state, and never error: absent or empty data degrades to an
//! empty list or a documented boolean so presentation code only ever asks
//! "is this empty".

use crate::i18n;
use crate::model::exporter::{
    ExporterData, ExporterUi, ExportingState, SectionSettings, SiteSettings,
};
use chrono::{Datelike, NaiveDate};

/// A single picker entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Shared projection plumbing: resolve the section's option set and map it.
///
/// Returns empty when the dataset has not loaded, loaded empty, or does not
/// contain the section.
fn map_options<T, F>(
    state: &SiteSettings,
    section: &str,
    pick: impl Fn(&SectionSettings) -> &[T],
    map: F,
) -> Vec<SelectOption>
where
    F: Fn(&T) -> SelectOption,
{
    let Some(raw_data) = state.exporter.data.advanced_settings.as_ref() else {
        return Vec::new();
    };
    if raw_data.is_empty() {
        return Vec::new();
    }

    match raw_data.get(section) {
        Some(settings) => pick(settings).iter().map(map).collect(),
        None => Vec::new(),
    }
}

/// Author picker options: value is the author ID, label the display name
pub fn get_author_options(state: &SiteSettings, section: &str) -> Vec<SelectOption> {
    map_options(state, section, |s| &s.authors, |author| SelectOption {
        value: author.id.to_string(),
        label: author.name.clone(),
    })
}

/// Status picker options from the section's post statuses
pub fn get_status_options(state: &SiteSettings, section: &str) -> Vec<SelectOption> {
    map_options(state, section, |s| &s.statuses, |status| SelectOption {
        value: status.name.clone(),
        label: status.label.clone(),
    })
}

/// Category picker options; value and label are both the category name
pub fn get_category_options(state: &SiteSettings, section: &str) -> Vec<SelectOption> {
    map_options(state, section, |s| &s.categories, |category| SelectOption {
        value: category.name.clone(),
        label: category.name.clone(),
    })
}

/// Date picker options from the section's year/month pairs.
///
/// Source months are 1-indexed. A zero year or month marks content with no
/// publish date and yields the `"0"`/"Unknown" sentinel rather than an
/// error. With `end_of_month` the value lands on the last day of the month,
/// which is what an end-of-range picker wants.
pub fn get_date_options(
    state: &SiteSettings,
    section: &str,
    end_of_month: bool,
) -> Vec<SelectOption> {
    map_options(state, section, |s| &s.export_date_options, |date| {
        if date.year == 0 || date.month == 0 {
            return SelectOption {
                value: "0".to_string(),
                label: i18n::translate("Unknown"),
            };
        }

        let day = match month_start(date.year, date.month) {
            Some(start) if end_of_month => last_day_of_month(start),
            Some(start) => start,
            // Out-of-range month; treat like an unknown date rather than erroring
            None => {
                return SelectOption {
                    value: "0".to_string(),
                    label: i18n::translate("Unknown"),
                }
            }
        };

        SelectOption {
            // eg: 2015-06-30
            value: day.format("%Y-%m-%d").to_string(),
            // eg: Dec 2015
            label: day.format("%b %Y").to_string(),
        }
    })
}

fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn last_day_of_month(start: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if start.month() == 12 {
        (start.year() + 1, 1)
    } else {
        (start.year(), start.month() + 1)
    };

    // First of the following month always exists, as does its predecessor
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(start)
}

/// True while the advanced settings are in flight: a site has been set but
/// the dataset has not arrived. Distinguishes "not requested" (no site)
/// and "loaded empty" (Some with no sections) from "loading".
pub fn is_loading_options(state: &SiteSettings) -> bool {
    let data_state = get_data_state(state);
    data_state.for_site_id.is_some() && data_state.advanced_settings.is_none()
}

/// True while an export activity is in progress
pub fn should_show_progress(state: &SiteSettings) -> bool {
    let exporting_state = get_ui_state(state).exporting_state;

    exporting_state == ExportingState::Starting || exporting_state == ExportingState::Exporting
}

/// Plain-value snapshot of the exporter UI subtree
pub fn get_ui_state(state: &SiteSettings) -> ExporterUi {
    state.exporter.ui
}

/// Plain-value snapshot of the exporter data subtree
pub fn get_data_state(state: &SiteSettings) -> ExporterData {
    state.exporter.data.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::exporter::{
        AdvancedSettings, Author, Category, ExportDate, PostStatus,
    };

    fn loaded_state(sections: AdvancedSettings) -> SiteSettings {
        let mut state = SiteSettings::default();
        state.begin_settings_fetch(1);
        state.receive_settings(sections);
        state
    }

    fn post_section() -> AdvancedSettings {
        let mut sections = AdvancedSettings::new();
        sections.insert(
            "post".to_string(),
            SectionSettings {
                authors: vec![
                    Author { id: 2, name: "Brian".to_string() },
                    Author { id: 7, name: "Harriet".to_string() },
                ],
                statuses: vec![PostStatus {
                    name: "publish".to_string(),
                    label: "Published".to_string(),
                }],
                export_date_options: vec![
                    ExportDate { year: 2015, month: 12 },
                    ExportDate { year: 0, month: 0 },
                ],
                categories: vec![Category { name: "news".to_string() }],
            },
        );
        sections
    }

    #[test]
    fn test_all_option_selectors_empty_when_dataset_absent() {
        let mut state = SiteSettings::default();
        state.begin_settings_fetch(1);

        assert!(get_author_options(&state, "post").is_empty());
        assert!(get_status_options(&state, "post").is_empty());
        assert!(get_category_options(&state, "post").is_empty());
        assert!(get_date_options(&state, "post", false).is_empty());
        assert!(get_date_options(&state, "post", true).is_empty());
    }

    #[test]
    fn test_all_option_selectors_empty_when_dataset_loaded_empty() {
        let state = loaded_state(AdvancedSettings::new());

        assert!(get_author_options(&state, "post").is_empty());
        assert!(get_status_options(&state, "post").is_empty());
        assert!(get_category_options(&state, "post").is_empty());
        assert!(get_date_options(&state, "post", false).is_empty());
    }

    #[test]
    fn test_option_selectors_empty_for_missing_section() {
        let state = loaded_state(post_section());
        assert!(get_author_options(&state, "page").is_empty());
        assert!(get_date_options(&state, "page", true).is_empty());
    }

    #[test]
    fn test_author_options() {
        let state = loaded_state(post_section());
        assert_eq!(
            get_author_options(&state, "post"),
            vec![
                SelectOption { value: "2".to_string(), label: "Brian".to_string() },
                SelectOption { value: "7".to_string(), label: "Harriet".to_string() },
            ]
        );
    }

    #[test]
    fn test_status_options() {
        let state = loaded_state(post_section());
        assert_eq!(
            get_status_options(&state, "post"),
            vec![SelectOption {
                value: "publish".to_string(),
                label: "Published".to_string(),
            }]
        );
    }

    #[test]
    fn test_category_options_identity_mapping() {
        let state = loaded_state(post_section());
        assert_eq!(
            get_category_options(&state, "post"),
            vec![SelectOption { value: "news".to_string(), label: "news".to_string() }]
        );
    }

    #[test]
    fn test_date_options_start_and_end_of_month() {
        let state = loaded_state(post_section());

        let start = get_date_options(&state, "post", false);
        assert_eq!(start[0].value, "2015-12-01");
        assert_eq!(start[0].label, "Dec 2015");

        let end = get_date_options(&state, "post", true);
        assert_eq!(end[0].value, "2015-12-31");
        assert_eq!(end[0].label, "Dec 2015");
    }

    #[test]
    fn test_date_options_unknown_sentinel_ignores_end_of_month() {
        let mut sections = AdvancedSettings::new();
        sections.insert(
            "post".to_string(),
            SectionSettings {
                export_date_options: vec![
                    ExportDate { year: 0, month: 6 },
                    ExportDate { year: 2016, month: 0 },
                ],
                ..Default::default()
            },
        );
        let state = loaded_state(sections);

        for end_of_month in [false, true] {
            let options = get_date_options(&state, "post", end_of_month);
            assert_eq!(options.len(), 2);
            for option in options {
                assert_eq!(option.value, "0");
                assert_eq!(option.label, "Unknown");
            }
        }
    }

    #[test]
    fn test_date_options_february_leap_year() {
        let mut sections = AdvancedSettings::new();
        sections.insert(
            "post".to_string(),
            SectionSettings {
                export_date_options: vec![ExportDate { year: 2016, month: 2 }],
                ..Default::default()
            },
        );
        let state = loaded_state(sections);

        let end = get_date_options(&state, "post", true);
        assert_eq!(end[0].value, "2016-02-29");
        assert_eq!(end[0].label, "Feb 2016");
    }

    #[test]
    fn test_is_loading_options() {
        // No site set: not loading
        let state = SiteSettings::default();
        assert!(!is_loading_options(&state));

        // Site set, dataset absent: loading
        let mut state = SiteSettings::default();
        state.begin_settings_fetch(1);
        assert!(is_loading_options(&state));

        // Dataset arrived (even empty): no longer loading
        state.receive_settings(AdvancedSettings::new());
        assert!(!is_loading_options(&state));
    }

    #[test]
    fn test_should_show_progress() {
        let mut state = SiteSettings::default();

        for (exporting_state, expected) in [
            (ExportingState::Idle, false),
            (ExportingState::Starting, true),
            (ExportingState::Exporting, true),
            (ExportingState::Complete, false),
            (ExportingState::Failed, false),
        ] {
            state.set_exporting_state(exporting_state);
            assert_eq!(should_show_progress(&state), expected, "{exporting_state:?}");
        }
    }

    #[test]
    fn test_snapshots_are_plain_values() {
        let mut state = loaded_state(post_section());
        state.set_exporting_state(ExportingState::Exporting);

        let ui = get_ui_state(&state);
        let data = get_data_state(&state);

        // Mutating the tree afterwards must not change the snapshots
        state.set_exporting_state(ExportingState::Failed);
        state.begin_settings_fetch(9);

        assert_eq!(ui.exporting_state, ExportingState::Exporting);
        assert_eq!(data.for_site_id, Some(1));
        assert!(data.advanced_settings.is_some());
    }
}
