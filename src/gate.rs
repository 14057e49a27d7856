//! Allowlist membership gate and administrator check.

use std::collections::HashSet;

use crate::config::Configuration;

/// Outcome of one gate evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Static authorization source, read-only after process start.
///
/// Membership is keyed on the lowercased email address only: two identities
/// sharing an email are indistinguishable here. Both the sign-in completion
/// path and the authenticated-context re-check consume [`Gate::evaluate`];
/// neither trusts the other's prior decision.
pub struct Gate {
    allowed: HashSet<String>,
    administrators: HashSet<String>,
}

impl Gate {
    /// Build the gate from configuration, lowercasing every entry.
    pub fn new(config: &Configuration) -> Self {
        Self {
            allowed: normalize(&config.allowlist),
            administrators: normalize(&config.administrators),
        }
    }

    /// Evaluate a candidate email against the allowlist.
    ///
    /// A missing or empty email is always denied, with a reason distinct
    /// from plain non-membership.
    pub fn evaluate(&self, email: Option<&str>) -> Decision {
        let decision = match email.map(str::trim).filter(|e| !e.is_empty()) {
            None => Decision::Deny {
                reason: "no email supplied".to_owned(),
            },
            Some(email) if self.allowed.contains(&email.to_lowercase()) => {
                Decision::Allow
            },
            Some(email) => Decision::Deny {
                reason: format!("{email} is not on the allowlist"),
            },
        };

        tracing::info!(
            email = email.unwrap_or_default(),
            allowed = decision.is_allowed(),
            "gate evaluation"
        );

        decision
    }

    /// Strict administrator check, separate from general allowlist
    /// membership. An allowlisted non-administrator is still `false` here.
    pub fn is_administrator(&self, email: &str) -> bool {
        self.administrators.contains(&email.trim().to_lowercase())
    }
}

fn normalize(emails: &[String]) -> HashSet<String> {
    emails
        .iter()
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Gate {
        Gate::new(&Configuration {
            allowlist: vec!["a@x.com".into(), "Admin@X.com".into()],
            administrators: vec!["admin@x.com".into()],
            ..Default::default()
        })
    }

    #[test]
    fn evaluate_is_case_insensitive() {
        let gate = gate();
        assert_eq!(gate.evaluate(Some("a@x.com")), Decision::Allow);
        assert_eq!(gate.evaluate(Some("A@X.com")), Decision::Allow);
        assert_eq!(gate.evaluate(Some("ADMIN@x.COM")), Decision::Allow);
    }

    #[test]
    fn evaluate_denies_non_members() {
        let decision = gate().evaluate(Some("b@x.com"));
        match decision {
            Decision::Deny { reason } => assert!(reason.contains("b@x.com")),
            Decision::Allow => panic!("b@x.com must be denied"),
        }
    }

    #[test]
    fn evaluate_denies_missing_email() {
        for candidate in [None, Some(""), Some("   ")] {
            match gate().evaluate(candidate) {
                Decision::Deny { reason } => {
                    assert_eq!(reason, "no email supplied")
                },
                Decision::Allow => panic!("missing email must be denied"),
            }
        }
    }

    #[test]
    fn administrator_check_is_stricter_than_allowlist() {
        let gate = gate();
        assert!(gate.is_administrator("admin@x.com"));
        assert!(gate.is_administrator("ADMIN@X.com"));
        // allowlisted, but not an administrator.
        assert!(!gate.is_administrator("a@x.com"));
        assert!(!gate.is_administrator("b@x.com"));
    }
}
