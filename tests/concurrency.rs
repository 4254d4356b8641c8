// tests/concurrency.rs
// Randomized concurrent interleavings of post/remove/sweep must never
// produce duplicate ids within a subject or break the ordering invariant.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use hintframe::registry::{HintRegistry, HintStore, PooledHintRegistry};
use hintframe::subjects::StaticSubjects;

const SUBJECTS: [&str; 3] = ["alice", "bob", "carol"];

fn hammer(store: Arc<dyn HintStore>) {
    let live = Arc::new(StaticSubjects::new(SUBJECTS));
    let mut workers = Vec::new();

    for worker in 0..4 {
        let store = store.clone();
        workers.push(std::thread::spawn(move || {
            let mut rng = rand::rng();
            for i in 0..200 {
                let subject = SUBJECTS[rng.random_range(0..SUBJECTS.len())];
                match rng.random_range(0..10) {
                    0..=5 => {
                        store.post(
                            subject,
                            &format!("w{worker}-{i}"),
                            rng.random_range(0.005f32..0.5f32),
                            rng.random_range(-5..5),
                            "stress",
                        );
                    }
                    6..=7 => {
                        if let Some(hint) = store.get_active(subject).first() {
                            store.remove(subject, hint.id);
                        }
                    }
                    _ => {
                        store.clear_by_source(subject, "stress-other");
                    }
                }
            }
        }));
    }

    // A sweeper thread interleaves with the producers.
    let sweeper = {
        let store = store.clone();
        let live = live.clone();
        std::thread::spawn(move || {
            for _ in 0..50 {
                store.sweep(live.as_ref());
                std::thread::sleep(Duration::from_millis(1));
            }
        })
    };

    for worker in workers {
        worker.join().unwrap();
    }
    sweeper.join().unwrap();

    for subject in SUBJECTS {
        let active = store.get_active(subject);
        // No duplicate ids within a subject.
        let ids: HashSet<_> = active.iter().map(|h| h.id).collect();
        assert_eq!(ids.len(), active.len(), "duplicate ids for {subject}");
        // Ordering invariant: priority descending, created_at ascending.
        for pair in active.windows(2) {
            assert!(
                pair[0].priority > pair[1].priority
                    || (pair[0].priority == pair[1].priority
                        && pair[0].created_at <= pair[1].created_at),
                "ordering violated for {subject}"
            );
        }
    }
}

#[test]
fn concurrent_churn_preserves_invariants_in_plain_registry() {
    hammer(Arc::new(HintRegistry::new()));
}

#[test]
fn concurrent_churn_preserves_invariants_in_pooled_registry() {
    hammer(Arc::new(PooledHintRegistry::new(32, 8)));
}
