//! Order-insensitive equivalence of rule sets and binding subjects.

use std::collections::{BTreeMap, BTreeSet};

use pkg_types::rbac::{ClusterRoleBinding, PolicyRule, RoleBinding, Subject, SubjectKind};

/// Semantic form of a rule set: `"<api-group>/<resource>"` → granted verbs.
pub type RuleMap = BTreeMap<String, BTreeSet<String>>;

/// The copy of `current` to write back, and why it differs.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectChange<T> {
    pub updated: T,
    pub reason: String,
}

/// Expand a rule set into its semantic form. Rules naming several groups or
/// resources produce one entry per pair; when two rules name the same pair
/// their verbs are unioned.
pub fn build_rule_map(rules: &[PolicyRule]) -> RuleMap {
    let mut map = RuleMap::new();
    for rule in rules {
        for group in &rule.api_groups {
            for resource in &rule.resources {
                map.entry(format!("{}/{}", group, resource))
                    .or_default()
                    .extend(rule.verbs.iter().cloned());
            }
        }
    }
    map
}

/// Compare two rule sets. Returns the reason if they grant different
/// permissions; the order of groups, resources and verbs is irrelevant.
pub fn rules_changed(current: &[PolicyRule], desired: &[PolicyRule]) -> Option<String> {
    let current = build_rule_map(current);
    let desired = build_rule_map(desired);
    if current == desired {
        return None;
    }
    Some(format!(
        "diff found in the policy rules: {}",
        describe_rule_diff(&current, &desired)
    ))
}

fn describe_rule_diff(current: &RuleMap, desired: &RuleMap) -> String {
    let keys: BTreeSet<&String> = current.keys().chain(desired.keys()).collect();
    keys.into_iter()
        .filter_map(|key| {
            let before = current.get(key);
            let after = desired.get(key);
            if before == after {
                return None;
            }
            Some(format!(
                "{}: {} -> {}",
                key,
                format_verbs(before),
                format_verbs(after)
            ))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_verbs(verbs: Option<&BTreeSet<String>>) -> String {
    match verbs {
        Some(v) => format!("[{}]", v.iter().cloned().collect::<Vec<_>>().join(",")),
        None => "<none>".to_string(),
    }
}

fn changed_fields(what: &[String]) -> String {
    format!("following fields changed: {}", what.join(","))
}

/// Compare a namespaced binding that carries exactly one authoritative
/// subject. Only the fields that differ are overwritten in the returned copy.
pub fn role_binding_changed(
    current: &RoleBinding,
    desired: &RoleBinding,
) -> Option<ObjectChange<RoleBinding>> {
    let mut updated = current.clone();
    let mut what = Vec::new();

    if current.role_ref.name != desired.role_ref.name {
        updated.role_ref.name = desired.role_ref.name.clone();
        what.push("role-name".to_string());
    }

    match (updated.subjects.first_mut(), desired.subjects.first()) {
        (Some(subject), Some(wanted)) => {
            if subject.name != wanted.name {
                subject.name = wanted.name.clone();
                what.push("subject-name".to_string());
            }
            if subject.namespace != wanted.namespace {
                subject.namespace = wanted.namespace.clone();
                what.push("subject-namespace".to_string());
            }
            if subject.kind != wanted.kind {
                subject.kind = wanted.kind;
                what.push("subject-kind".to_string());
            }
        }
        (None, Some(_)) => {
            updated.subjects = desired.subjects.clone();
            what.push("subjects".to_string());
        }
        (_, None) => {}
    }

    if what.is_empty() {
        return None;
    }
    Some(ObjectChange {
        updated,
        reason: changed_fields(&what),
    })
}

/// Compare a cluster binding whose subject list is owned wholesale by the
/// desired state: subjects missing from current are added, subjects no longer
/// desired are revoked and duplicates are dropped. A subject is identified by
/// name, namespace and kind. Order alone is not a change.
pub fn cluster_role_binding_changed(
    current: &ClusterRoleBinding,
    desired: &ClusterRoleBinding,
) -> Option<ObjectChange<ClusterRoleBinding>> {
    let mut updated = current.clone();
    let mut what = Vec::new();

    if current.role_ref.name != desired.role_ref.name {
        updated.role_ref.name = desired.role_ref.name.clone();
        what.push("role-name".to_string());
    }

    if let Some(subject_changes) = subjects_changed(&current.subjects, &desired.subjects) {
        updated.subjects = desired.subjects.clone();
        what.extend(subject_changes);
    }

    if what.is_empty() {
        return None;
    }
    Some(ObjectChange {
        updated,
        reason: changed_fields(&what),
    })
}

type SubjectKey<'a> = (&'a str, &'a str, SubjectKind);

fn subject_key(subject: &Subject) -> SubjectKey<'_> {
    (subject.name.as_str(), subject.namespace.as_str(), subject.kind)
}

fn describe_subject(prefix: &str, (name, ns, kind): &SubjectKey<'_>) -> String {
    match kind {
        SubjectKind::ServiceAccount => format!("{}: {}, Namespace: {}", prefix, name, ns),
        SubjectKind::User => format!("{}: {}, Namespace: {}, Kind: User", prefix, name, ns),
    }
}

fn subjects_changed(current: &[Subject], desired: &[Subject]) -> Option<Vec<String>> {
    let mut current_counts: BTreeMap<SubjectKey<'_>, usize> = BTreeMap::new();
    for subject in current {
        *current_counts.entry(subject_key(subject)).or_default() += 1;
    }
    let desired_keys: BTreeSet<SubjectKey<'_>> = desired.iter().map(subject_key).collect();

    let mut what = Vec::new();
    for key in &desired_keys {
        if !current_counts.contains_key(key) {
            what.push(describe_subject("subject", key));
        }
    }
    for (key, count) in &current_counts {
        if !desired_keys.contains(key) {
            what.push(describe_subject("stale-subject", key));
        } else if *count > 1 {
            what.push(describe_subject("duplicate-subject", key));
        }
    }
    if what.is_empty() && current.len() != desired.len() {
        what.push("subjects".to_string());
    }

    if what.is_empty() { None } else { Some(what) }
}
