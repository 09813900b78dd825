//! Invite acceptance models
//!
//! A pending invite plus the explicit submit state machine for the accept
//! form. The submit label depends on the invited role; the email-only
//! subscription path is offered only to follower invites that carry an
//! activation key.

use crate::i18n;
use serde::{Deserialize, Serialize};

/// A pending site invite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub role: String,
    pub sent_to: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub activation_key: Option<String>,
}

impl Invite {
    /// Label for the accept button, localized per role
    pub fn submit_button_text(&self) -> String {
        match self.role.as_str() {
            "follower" => i18n::translate("Sign Up & Follow"),
            "viewer" => i18n::translate("Sign Up & View"),
            _ => i18n::translate("Sign Up & Join"),
        }
    }

    /// Whether the email-only subscription shortcut applies
    pub fn offers_email_only_subscription(&self) -> bool {
        self.role == "follower" && self.activation_key.is_some()
    }
}

/// Parse the JSON payload describing pending invites
pub fn parse_invites(json: &str) -> anyhow::Result<Vec<Invite>> {
    let invites = serde_json::from_str(json)?;
    Ok(invites)
}

/// Accept-form lifecycle; terminal states require starting over
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InviteFormState {
    #[default]
    Editing,
    Submitting,
    Accepted,
    Failed(String),
}

impl InviteFormState {
    pub fn is_submitting(&self) -> bool {
        *self == InviteFormState::Submitting
    }

    /// Begin a submit; only valid while editing
    pub fn submit(&mut self) -> bool {
        if *self == InviteFormState::Editing {
            *self = InviteFormState::Submitting;
            true
        } else {
            false
        }
    }

    pub fn resolve(&mut self, result: Result<(), String>) {
        if *self != InviteFormState::Submitting {
            return;
        }
        *self = match result {
            Ok(()) => InviteFormState::Accepted,
            Err(error) => InviteFormState::Failed(error),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invite(role: &str, activation_key: Option<&str>) -> Invite {
        Invite {
            role: role.to_string(),
            sent_to: "user@example.com".to_string(),
            site_name: "Example".to_string(),
            activation_key: activation_key.map(str::to_string),
        }
    }

    #[test]
    fn test_submit_button_text_per_role() {
        assert_eq!(invite("follower", None).submit_button_text(), "Sign Up & Follow");
        assert_eq!(invite("viewer", None).submit_button_text(), "Sign Up & View");
        assert_eq!(invite("editor", None).submit_button_text(), "Sign Up & Join");
        assert_eq!(invite("administrator", None).submit_button_text(), "Sign Up & Join");
    }

    #[test]
    fn test_email_only_subscription_rules() {
        assert!(invite("follower", Some("key")).offers_email_only_subscription());
        assert!(!invite("follower", None).offers_email_only_subscription());
        assert!(!invite("viewer", Some("key")).offers_email_only_subscription());
    }

    #[test]
    fn test_form_state_machine() {
        let mut form = InviteFormState::default();
        assert!(form.submit());
        assert!(form.is_submitting());

        // Double submit while in flight is rejected
        assert!(!form.submit());

        form.resolve(Err("no such invite".to_string()));
        assert_eq!(form, InviteFormState::Failed("no such invite".to_string()));

        // Terminal states ignore late results and submits
        form.resolve(Ok(()));
        assert_eq!(form, InviteFormState::Failed("no such invite".to_string()));
        assert!(!form.submit());
    }

    #[test]
    fn test_form_accept_path() {
        let mut form = InviteFormState::default();
        form.submit();
        form.resolve(Ok(()));
        assert_eq!(form, InviteFormState::Accepted);
    }

    #[test]
    fn test_parse_invites() {
        let json = r#"[{"role": "follower", "sent_to": "a@b.c", "activation_key": "k1"}]"#;
        let invites = parse_invites(json).unwrap();
        assert_eq!(invites.len(), 1);
        assert!(invites[0].offers_email_only_subscription());
    }
}
