use anyhow::{Result, bail};
use std::collections::HashMap;

use crate::rbac::PolicyRule;

/// Validate a Kubernetes-style resource name.
/// Rules: lowercase `[a-z0-9-]`, max 63 chars, no leading/trailing hyphens.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("name must not be empty");
    }
    if name.len() > 63 {
        bail!("name '{}' exceeds 63 characters (got {})", name, name.len());
    }
    if name.starts_with('-') || name.ends_with('-') {
        bail!("name '{}' must not start or end with a hyphen", name);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!(
            "name '{}' must contain only lowercase letters, digits, and hyphens [a-z0-9-]",
            name
        );
    }
    Ok(())
}

/// Reject rule sets where two rules grant verbs on the same
/// `(api group, resource)` pair. Every pair must be declared exactly once so
/// that the rule set maps one-to-one onto its semantic form.
pub fn validate_rules(rules: &[PolicyRule]) -> Result<()> {
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    for (idx, rule) in rules.iter().enumerate() {
        if rule.verbs.is_empty() {
            bail!("rule {} grants no verbs", idx);
        }
        for group in &rule.api_groups {
            for resource in &rule.resources {
                if let Some(first) = seen.insert((group.as_str(), resource.as_str()), idx) {
                    if first != idx {
                        bail!(
                            "rules {} and {} both declare {}/{}",
                            first,
                            idx,
                            group,
                            resource
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_name("external-dns").is_ok());
        assert!(validate_name("external-dns-operator").is_ok());
        assert!(validate_name("app-123").is_ok());
        assert!(validate_name("a").is_ok());
    }

    #[test]
    fn invalid_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("External-DNS").is_err());
        assert!(validate_name("my_app").is_err());
        assert!(validate_name("-leading").is_err());
        assert!(validate_name("trailing-").is_err());
        assert!(validate_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn disjoint_rules_pass() {
        let rules = vec![
            PolicyRule::new(&[""], &["secrets", "serviceaccounts"], &["get"]),
            PolicyRule::new(&["apps"], &["deployments"], &["get"]),
            PolicyRule::new(&[""], &["pods"], &["list"]),
        ];
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn overlapping_rules_rejected() {
        let rules = vec![
            PolicyRule::new(&[""], &["secrets"], &["get"]),
            PolicyRule::new(&["", "apps"], &["secrets"], &["list"]),
        ];
        let err = validate_rules(&rules).unwrap_err().to_string();
        assert!(err.contains("/secrets"), "unexpected error: {}", err);
    }

    #[test]
    fn repeated_entries_within_one_rule_are_fine() {
        let rules = vec![PolicyRule::new(&["", ""], &["pods"], &["get"])];
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn rule_without_verbs_rejected() {
        let rules = vec![PolicyRule::new(&[""], &["pods"], &[])];
        assert!(validate_rules(&rules).is_err());
    }
}
