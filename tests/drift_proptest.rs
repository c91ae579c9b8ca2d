//! Property-based tests for drift comparison and state transitions.
//!
//! These tests verify invariants that must hold across a wide range of
//! set shapes and transition interleavings, not just the handful of
//! fixtures the scenario tests use.

use std::collections::HashSet;

use serde_json::json;

use ric_supervisor::repository::{Policies, Policy, Ric, RicRegistry, RicState};
use ric_supervisor::supervision::{policy_view_drifted, type_view_drifted};

fn ids(prefix: &str, n: usize) -> HashSet<String> {
    (0..n).map(|i| format!("{prefix}-{i}")).collect()
}

// =========================================================================
// DRIFT COMPARATOR PROPERTIES
// =========================================================================

/// Property: identical views never report drift, at any size
#[test]
fn prop_identical_views_never_drift() {
    for n in 0..40 {
        let view = ids("p", n);
        assert!(
            !policy_view_drifted(&view, &view, &view),
            "false policy drift at size {n}"
        );
        assert!(!type_view_drifted(&view, &view), "false type drift at size {n}");
    }
}

/// Property: one extra remote entry is always drift
#[test]
fn prop_single_addition_is_drift() {
    for n in 0..30 {
        let local = ids("p", n);
        let mut live = local.clone();
        live.insert("p-extra".to_string());

        assert!(policy_view_drifted(&live, &local, &local));
        assert!(type_view_drifted(&live, &local));
    }
}

/// Property: one missing remote entry is always drift
#[test]
fn prop_single_removal_is_drift() {
    for n in 1..30 {
        let local = ids("p", n);
        let mut live = local.clone();
        let victim = format!("p-{}", n / 2);
        live.remove(&victim);

        assert!(policy_view_drifted(&live, &local, &local));
        assert!(type_view_drifted(&live, &local));
    }
}

/// Property: substituting any element for an unknown one is drift even
/// though the counts still agree
#[test]
fn prop_substitution_with_unknown_is_drift() {
    for n in 1..30 {
        for victim in 0..n {
            let local = ids("p", n);
            let mut live = local.clone();
            live.remove(&format!("p-{victim}"));
            live.insert("p-imposter".to_string());

            assert!(policy_view_drifted(&live, &local, &local));
            assert!(type_view_drifted(&live, &local));
        }
    }
}

/// Property: policy membership is store-wide, so a remote id filed
/// locally under a different RIC passes when the counts line up
#[test]
fn prop_policy_membership_is_store_wide() {
    for n in 1..20 {
        let local_for_ric = ids("p", n);
        let foreign = ids("q", n);
        let mut known: HashSet<String> = local_for_ric.clone();
        known.extend(foreign.iter().cloned());

        // remote reports only the foreign ids; same count, all known
        assert!(!policy_view_drifted(&foreign, &local_for_ric, &known));

        // but a single globally unknown id breaks it
        let mut live = foreign.clone();
        live.remove(&format!("q-{}", n - 1));
        live.insert("rogue".to_string());
        assert!(policy_view_drifted(&live, &local_for_ric, &known));
    }
}

// =========================================================================
// REGISTRY TRANSITION PROPERTIES
// =========================================================================

/// Property: a conditional transition applies exactly when the RIC is in
/// the expected state, and no rejected attempt moves it
#[test]
fn prop_cas_applies_iff_expectation_matches() {
    let states = [
        RicState::Undefined,
        RicState::Available,
        RicState::Recovering,
        RicState::Unavailable,
    ];
    for from in states {
        for expected in states {
            let registry = RicRegistry::new();
            registry.register(Ric::new("ric-1", "http://ric-1:8085", vec![]));
            registry.transition("ric-1", None, from);

            let outcome = registry.transition("ric-1", Some(expected), RicState::Recovering);

            if from == expected {
                assert!(outcome.applied(), "expected apply for {from} -> recovering");
                assert_eq!(registry.get("ric-1").unwrap().state, RicState::Recovering);
            } else {
                assert!(!outcome.applied(), "unexpected apply for {from} with {expected}");
                assert_eq!(registry.get("ric-1").unwrap().state, from);
            }
        }
    }
}

/// Property: under concurrent contention exactly one conditional
/// transition wins, whatever the thread interleaving
#[test]
fn prop_contended_cas_has_one_winner() {
    use std::sync::Arc;

    for _ in 0..50 {
        let registry = Arc::new(RicRegistry::new());
        registry.register(Ric::new("ric-1", "http://ric-1:8085", vec![]));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry
                        .transition("ric-1", Some(RicState::Undefined), RicState::Recovering)
                        .applied()
                })
            })
            .collect();

        let wins: usize = handles.into_iter().map(|h| h.join().unwrap() as usize).sum();
        assert_eq!(wins, 1);
    }
}

// =========================================================================
// POLICY STORE INDEX PROPERTIES
// =========================================================================

/// Property: the per-RIC index partitions the store; the id snapshot
/// sees both views consistently
#[test]
fn prop_policy_indexes_partition_the_store() {
    for n in 0..60 {
        let store = Policies::new();
        let rics = ["ric-1", "ric-2", "ric-3"];
        for i in 0..n {
            let ric = rics[i % rics.len()];
            store.put(Policy::new(format!("p-{i}"), ric, "qos-1", "service-a", json!({})));
        }

        let mut union: HashSet<String> = HashSet::new();
        let mut total = 0;
        for ric in rics {
            let snapshot = store.id_snapshot(ric);
            assert_eq!(snapshot.known.len(), n);
            for id in &snapshot.for_ric {
                assert!(union.insert(id.clone()), "id {id} indexed under two rics");
            }
            total += snapshot.for_ric.len();
        }
        assert_eq!(total, n);
        assert_eq!(store.len(), n);
    }
}

/// Property: removing everything bound to one RIC leaves the other
/// indexes untouched
#[test]
fn prop_removal_is_scoped_to_one_ric() {
    for n in 1..30 {
        let store = Policies::new();
        for i in 0..n {
            store.put(Policy::new(format!("a-{i}"), "ric-a", "qos-1", "service-a", json!({})));
            store.put(Policy::new(format!("b-{i}"), "ric-b", "qos-1", "service-a", json!({})));
        }

        for id in store.ids_for_ric("ric-a") {
            store.remove(&id);
        }

        assert!(store.ids_for_ric("ric-a").is_empty());
        assert_eq!(store.ids_for_ric("ric-b").len(), n);
        assert_eq!(store.len(), n);
    }
}
