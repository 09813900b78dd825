//! wp-cli interaction services
//!
//! Pure command builders. Every builder returns a `(full_command,
//! display_command)` pair: the full command carries `--path` and quoting for
//! the shell, the display command is what the UI shows.

use crate::config::Config;
use crate::model::exporter::ExportFilters;
use crate::model::invite::Invite;
use std::fs;
use std::path::PathBuf;

/// PHP snippet run through `wp eval-file` to emit the exporter advanced
/// settings as one JSON document keyed by post type. A single invocation
/// keeps the dataset all-or-nothing; there is no partial-load path.
const SETTINGS_SCRIPT: &str = r#"<?php
// Emits exporter advanced settings as JSON, keyed by exportable post type.
global $wpdb;
$settings = array();
foreach ( get_post_types( array( 'can_export' => true ), 'names' ) as $type ) {
    $dates = $wpdb->get_results( $wpdb->prepare(
        "SELECT DISTINCT YEAR(post_date) AS year, MONTH(post_date) AS month
         FROM {$wpdb->posts} WHERE post_type = %s ORDER BY post_date DESC",
        $type
    ) );
    $settings[ $type ] = array(
        'authors' => array_values( array_map( function ( $user ) {
            return array( 'ID' => $user->ID, 'name' => $user->display_name );
        }, get_users( array( 'capability' => 'edit_posts' ) ) ) ),
        'statuses' => array_values( array_map( function ( $status ) {
            return array( 'name' => $status->name, 'label' => $status->label );
        }, get_post_stati( array( 'internal' => false ), 'objects' ) ) ),
        'export_date_options' => array_map( function ( $row ) {
            return array( 'year' => (int) $row->year, 'month' => (int) $row->month );
        }, $dates ),
        'categories' => array_values( array_map( function ( $category ) {
            return array( 'name' => $category->name );
        }, get_categories( array( 'hide_empty' => false ) ) ) ),
    );
}
echo json_encode( $settings );
"#;

fn wp_cmd(wp_binary_path: &str) -> String {
    if wp_binary_path.is_empty() {
        "wp".to_string()
    } else {
        wp_binary_path.to_string()
    }
}

fn path_arg(site_path: &str) -> String {
    format!(" --path=\"{}\"", site_path)
}

/// Write the settings script under the config dir and return its path.
/// Running through `eval-file` sidesteps shell quoting of inline PHP.
pub fn ensure_settings_script() -> anyhow::Result<PathBuf> {
    let dir = Config::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    let script_path = dir.join("export-settings.php");
    fs::write(&script_path, SETTINGS_SCRIPT)?;
    Ok(script_path)
}

/// Build the advanced-settings fetch command
pub fn build_settings_fetch_command(
    wp_binary_path: &str,
    site_path: &str,
    script_path: &PathBuf,
) -> (String, String) {
    let full_command = format!(
        "{} eval-file \"{}\"{}",
        wp_cmd(wp_binary_path),
        script_path.display(),
        path_arg(site_path)
    );
    let display_command = "wp eval-file export-settings.php".to_string();

    (full_command, display_command)
}

/// Build a `wp export` command from the chosen filters.
///
/// Unset filters and the `"0"` unknown-date sentinel are omitted so the
/// export falls back to "everything".
pub fn build_export_command(
    wp_binary_path: &str,
    site_path: &str,
    filters: &ExportFilters,
) -> (String, String) {
    let mut flags = String::new();

    if !filters.post_type.is_empty() {
        flags.push_str(&format!(" --post_type={}", filters.post_type));
    }
    if let Some(author) = filters.author.as_deref().filter(|v| !v.is_empty()) {
        flags.push_str(&format!(" --author={}", author));
    }
    if let Some(status) = filters.status.as_deref().filter(|v| !v.is_empty()) {
        flags.push_str(&format!(" --post_status={}", status));
    }
    if let Some(category) = filters.category.as_deref().filter(|v| !v.is_empty()) {
        flags.push_str(&format!(" --category=\"{}\"", category));
    }
    if let Some(start) = filters.start_date.as_deref().filter(|v| !v.is_empty() && *v != "0") {
        flags.push_str(&format!(" --start_date={}", start));
    }
    if let Some(end) = filters.end_date.as_deref().filter(|v| !v.is_empty() && *v != "0") {
        flags.push_str(&format!(" --end_date={}", end));
    }

    let full_command = format!("{} export{}{}", wp_cmd(wp_binary_path), flags, path_arg(site_path));
    let display_command = format!("wp export{}", flags);

    (full_command, display_command)
}

/// Build the theme listing command (JSON output)
pub fn build_theme_list_command(wp_binary_path: &str, site_path: &str) -> (String, String) {
    let fields = "--fields=name,title,status,version";
    let full_command = format!(
        "{} theme list {} --format=json{}",
        wp_cmd(wp_binary_path),
        fields,
        path_arg(site_path)
    );
    let display_command = format!("wp theme list {} --format=json", fields);

    (full_command, display_command)
}

/// Build a theme activation command
pub fn build_theme_activate_command(
    wp_binary_path: &str,
    site_path: &str,
    theme_name: &str,
) -> (String, String) {
    let full_command = format!(
        "{} theme activate {}{}",
        wp_cmd(wp_binary_path),
        theme_name,
        path_arg(site_path)
    );
    let display_command = format!("wp theme activate {}", theme_name);

    (full_command, display_command)
}

/// Arguments for a plugin install step
pub fn plugin_install_args(plugin: &str) -> Vec<String> {
    vec!["plugin".to_string(), "install".to_string(), plugin.to_string()]
}

/// Arguments for a plugin activate step
pub fn plugin_activate_args(plugin: &str) -> Vec<String> {
    vec!["plugin".to_string(), "activate".to_string(), plugin.to_string()]
}

/// Build the invite acceptance command: create the invited user with the
/// role the invite grants. Follower and viewer invites map onto the
/// subscriber role.
pub fn build_invite_accept_command(
    wp_binary_path: &str,
    site_path: &str,
    invite: &Invite,
) -> (String, String) {
    let role = match invite.role.as_str() {
        "follower" | "viewer" => "subscriber",
        other => other,
    };
    let login = invite.sent_to.split('@').next().unwrap_or("invitee");

    let full_command = format!(
        "{} user create {} {} --role={} --porcelain{}",
        wp_cmd(wp_binary_path),
        login,
        invite.sent_to,
        role,
        path_arg(site_path)
    );
    let display_command = format!("wp user create {} {} --role={}", login, invite.sent_to, role);

    (full_command, display_command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_export_command_all_filters() {
        let filters = ExportFilters {
            post_type: "post".to_string(),
            author: Some("2".to_string()),
            status: Some("publish".to_string()),
            category: Some("news".to_string()),
            start_date: Some("2015-12-01".to_string()),
            end_date: Some("2015-12-31".to_string()),
        };

        let (full, display) = build_export_command("/usr/local/bin/wp", "/var/www/site", &filters);
        assert_eq!(
            full,
            "/usr/local/bin/wp export --post_type=post --author=2 --post_status=publish \
             --category=\"news\" --start_date=2015-12-01 --end_date=2015-12-31 \
             --path=\"/var/www/site\""
        );
        assert_eq!(
            display,
            "wp export --post_type=post --author=2 --post_status=publish \
             --category=\"news\" --start_date=2015-12-01 --end_date=2015-12-31"
        );
    }

    #[test]
    fn test_build_export_command_skips_unset_and_sentinel_dates() {
        let filters = ExportFilters {
            post_type: "post".to_string(),
            start_date: Some("0".to_string()),
            end_date: None,
            ..Default::default()
        };

        let (_, display) = build_export_command("", "/var/www/site", &filters);
        assert_eq!(display, "wp export --post_type=post");
    }

    #[test]
    fn test_build_export_command_defaults_wp_binary() {
        let filters = ExportFilters::default();
        let (full, _) = build_export_command("", "/srv/wp", &filters);
        assert!(full.starts_with("wp export"));
        assert!(full.ends_with("--path=\"/srv/wp\""));
    }

    #[test]
    fn test_build_theme_commands() {
        let (full, display) = build_theme_list_command("wp", "/srv/wp");
        assert!(full.contains("--format=json"));
        assert!(full.contains("--path=\"/srv/wp\""));
        assert!(!display.contains("--path"));

        let (_, display) = build_theme_activate_command("wp", "/srv/wp", "twentysixteen");
        assert_eq!(display, "wp theme activate twentysixteen");
    }

    #[test]
    fn test_plugin_step_args() {
        assert_eq!(plugin_install_args("vaultpress"), ["plugin", "install", "vaultpress"]);
        assert_eq!(plugin_activate_args("vaultpress"), ["plugin", "activate", "vaultpress"]);
    }

    #[test]
    fn test_build_invite_accept_command_maps_roles() {
        let invite = Invite {
            role: "follower".to_string(),
            sent_to: "pat@example.com".to_string(),
            site_name: String::new(),
            activation_key: None,
        };

        let (_, display) = build_invite_accept_command("wp", "/srv/wp", &invite);
        assert_eq!(display, "wp user create pat pat@example.com --role=subscriber");

        let editor = Invite { role: "editor".to_string(), ..invite };
        let (_, display) = build_invite_accept_command("wp", "/srv/wp", &editor);
        assert_eq!(display, "wp user create pat pat@example.com --role=editor");
    }
}
