//! Convergence and idempotence over generated trees.

use proptest::prelude::*;
use replica_core::{AuditLog, Reconciler};
use replica_test_utils::SyncFixture;

fn tree() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["a", "b", "c", "d/e", "d/f", "g/h/i"]),
            prop::collection::vec(any::<u8>(), 0..32),
        ),
        0..6,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(path, bytes)| (path.to_string(), bytes))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_one_pass_converges_and_second_is_silent(source in tree(), replica in tree()) {
        let fx = SyncFixture::new();
        for (rel, bytes) in &source {
            fx.write_source(rel, bytes);
        }
        for (rel, bytes) in &replica {
            fx.write_replica(rel, bytes);
        }

        let reconciler = Reconciler::new(fx.source(), fx.replica());
        let mut first = AuditLog::in_memory();
        reconciler.reconcile(&mut first).unwrap();

        fx.assert_converged();

        let mut second = AuditLog::in_memory();
        let report = reconciler.reconcile(&mut second).unwrap();
        prop_assert!(report.is_converged());
        prop_assert_eq!(second.recorded(), 0);
    }
}
