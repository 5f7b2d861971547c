//! Property-based tests for the RBAC comparators.
//!
//! - Rule sets compare equal regardless of rule, group, resource and verb order
//! - Splitting a rule into one rule per group/resource pair is not a change
//! - One cluster binding update converges to the desired subjects

use pkg_controllers::rbac::compare::{cluster_role_binding_changed, rules_changed};
use pkg_types::meta::ObjectMeta;
use pkg_types::rbac::{ClusterRoleBinding, PolicyRule, RoleRef, Subject, SubjectKind};
use proptest::prelude::*;

fn words(choices: &[&'static str], max: usize) -> impl Strategy<Value = Vec<String>> + use<> {
    prop::collection::btree_set(prop::sample::select(choices.to_vec()), 1..=max)
        .prop_map(|set| set.into_iter().map(str::to_string).collect())
}

fn rule() -> impl Strategy<Value = PolicyRule> {
    (
        words(&["", "apps", "batch"], 2),
        words(&["pods", "services", "secrets", "deployments"], 3),
        words(&["get", "list", "watch", "create", "delete"], 4),
    )
        .prop_map(|(api_groups, resources, verbs)| PolicyRule {
            api_groups,
            resources,
            verbs,
        })
}

fn shuffled(rule: &PolicyRule) -> impl Strategy<Value = PolicyRule> + use<> {
    (
        Just(rule.api_groups.clone()).prop_shuffle(),
        Just(rule.resources.clone()).prop_shuffle(),
        Just(rule.verbs.clone()).prop_shuffle(),
    )
        .prop_map(|(api_groups, resources, verbs)| PolicyRule {
            api_groups,
            resources,
            verbs,
        })
}

/// A rule set paired with a reordering of it.
fn rules_and_reordering() -> impl Strategy<Value = (Vec<PolicyRule>, Vec<PolicyRule>)> {
    prop::collection::vec(rule(), 0..5).prop_flat_map(|rules| {
        let reordered: Vec<_> = rules.iter().map(shuffled).collect();
        (Just(rules), reordered.prop_shuffle())
    })
}

fn subject() -> impl Strategy<Value = Subject> {
    ("external-dns-[a-c]", "(ns1|ns2)", any::<bool>()).prop_map(|(name, ns, user)| {
        let mut subject = Subject::service_account(name, ns);
        if user {
            subject.kind = SubjectKind::User;
        }
        subject
    })
}

fn binding(subjects: Vec<Subject>) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: ObjectMeta::cluster("external-dns"),
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "ClusterRole".to_string(),
            name: "external-dns".to_string(),
        },
        subjects,
    }
}

/// Unique service account subjects, as the desired-state builder produces.
fn desired_subjects() -> impl Strategy<Value = Vec<Subject>> {
    prop::collection::btree_set(("external-dns-[a-c]", "(ns1|ns2)"), 1..5).prop_map(|keys| {
        keys.into_iter()
            .map(|(name, ns)| Subject::service_account(name, ns))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_rule_order_is_irrelevant((rules, reordered) in rules_and_reordering()) {
        prop_assert_eq!(rules_changed(&rules, &reordered), None);
    }

    #[test]
    fn prop_split_rules_are_equivalent(rules in prop::collection::vec(rule(), 0..5)) {
        let split: Vec<PolicyRule> = rules
            .iter()
            .flat_map(|r| {
                r.api_groups.iter().flat_map(move |g| {
                    r.resources.iter().map(move |res| PolicyRule {
                        api_groups: vec![g.clone()],
                        resources: vec![res.clone()],
                        verbs: r.verbs.clone(),
                    })
                })
            })
            .collect();
        prop_assert_eq!(rules_changed(&rules, &split), None);
    }

    #[test]
    fn prop_cluster_binding_converges_in_one_update(
        current in prop::collection::vec(subject(), 0..6),
        desired in desired_subjects(),
    ) {
        let current = binding(current);
        let desired = binding(desired);
        let converged = match cluster_role_binding_changed(&current, &desired) {
            Some(change) => {
                prop_assert_eq!(&change.updated.subjects, &desired.subjects);
                change.updated
            }
            None => current,
        };
        prop_assert_eq!(cluster_role_binding_changed(&converged, &desired), None);
        prop_assert_eq!(converged.subjects.len(), desired.subjects.len());
    }

    #[test]
    fn prop_subject_order_is_irrelevant(
        (desired, reordered) in desired_subjects()
            .prop_flat_map(|s| (Just(s.clone()), Just(s).prop_shuffle())),
    ) {
        prop_assert_eq!(
            cluster_role_binding_changed(&binding(reordered), &binding(desired)),
            None
        );
    }
}
