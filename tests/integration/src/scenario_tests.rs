//! End-to-end scenarios through the driver
//!
//! Each scenario runs whole passes via `Driver`, exactly as the binary does,
//! and checks the replica tree and the audit log afterwards.

use replica_core::{Driver, PassReport, ReconcileOptions, SyncConfig};
use replica_test_utils::SyncFixture;

fn driver(fx: &SyncFixture) -> Driver {
    let config = SyncConfig::new(fx.source(), fx.replica(), 0, fx.log_path());
    Driver::new(config, ReconcileOptions::default())
}

fn run(fx: &SyncFixture, passes: usize) -> (Vec<PassReport>, String) {
    let mut out = Vec::new();
    let reports = driver(fx).run_passes(passes, &mut out).unwrap();
    (reports, String::from_utf8(out).unwrap())
}

// =============================================================================
// Concrete scenarios
// =============================================================================

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_into_empty_replica() {
        let fx = SyncFixture::new();
        fx.write_source("a.txt", "hello");

        let (_, stdout) = run(&fx, 1);

        assert_eq!(fx.read_replica("a.txt"), "hello");
        assert_eq!(fx.log_lines(), vec!["Added: a.txt"]);
        assert_eq!(stdout, "Synchronization completed.\n");
    }

    #[test]
    fn test_update_differing_content() {
        let fx = SyncFixture::new();
        fx.write_source("a.txt", "hello");
        fx.write_replica("a.txt", "world");

        run(&fx, 1);

        assert_eq!(fx.read_replica("a.txt"), "hello");
        assert_eq!(fx.log_lines(), vec!["Updated: a.txt"]);
    }

    #[test]
    fn test_remove_from_replica_when_source_empty() {
        let fx = SyncFixture::new();
        fx.write_replica("old.txt", "stale");

        run(&fx, 1);

        assert!(fx.replica_files().is_empty());
        assert_eq!(fx.log_lines(), vec!["Removed: old.txt"]);
    }

    #[test]
    fn test_identical_content_is_untouched() {
        let fx = SyncFixture::new();
        fx.write_source("a.txt", "same");
        fx.write_replica("a.txt", "same");
        fx.set_replica_mtime("a.txt", 1_234_567_890);
        let before = fx.replica_mtime("a.txt");

        run(&fx, 1);

        assert_eq!(fx.replica_mtime("a.txt"), before);
        assert!(fx.log_lines().is_empty());
    }
}

// =============================================================================
// Properties across passes
// =============================================================================

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    fn messy_fixture() -> SyncFixture {
        let fx = SyncFixture::new();
        fx.write_source("docs/readme.md", "# readme");
        fx.write_source("docs/guide/intro.md", "intro");
        fx.write_source("bin/tool", [0u8, 159, 146, 150]);
        fx.write_source("same.txt", "same");
        fx.write_replica("same.txt", "same");
        fx.write_replica("docs/readme.md", "# old readme");
        fx.write_replica("cache/tmp.dat", "junk");
        fx.write_replica("docs/removed.md", "gone");
        fx
    }

    #[test]
    fn test_converges_in_one_pass() {
        let fx = messy_fixture();

        run(&fx, 1);

        fx.assert_converged();
    }

    #[test]
    fn test_converged_replica_is_a_fixed_point() {
        let fx = messy_fixture();

        let (reports, stdout) = run(&fx, 3);
        let lines_after_first = reports[0].actions.len();

        assert!(reports[1].is_converged());
        assert!(reports[2].is_converged());
        assert_eq!(fx.log_lines().len(), lines_after_first);
        assert_eq!(stdout.lines().count(), 3);
    }

    #[test]
    fn test_log_order_is_propagate_then_clean() {
        let fx = messy_fixture();

        run(&fx, 1);

        assert_eq!(
            fx.log_lines(),
            vec![
                "Added: bin/tool",
                "Added: docs/guide/intro.md",
                "Updated: docs/readme.md",
                "Removed: cache/tmp.dat",
                "Removed: docs/removed.md",
            ]
        );
    }

    #[test]
    fn test_source_edits_between_passes_are_picked_up() {
        let fx = messy_fixture();
        let driver = driver(&fx);

        driver.run_pass().unwrap();
        fx.write_source("docs/guide/intro.md", "intro v2");
        fx.remove_source("bin/tool");
        fx.write_source("new/file.txt", "fresh");
        let report = driver.run_pass().unwrap();

        fx.assert_converged();
        assert_eq!(report.added(), 1);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.removed(), 1);
        assert_eq!(report.unchanged, 2);
    }

    #[test]
    fn test_interrupted_copy_is_repaired_next_pass() {
        let fx = SyncFixture::new();
        fx.write_source("big.bin", vec![7u8; 8192]);
        fx.write_replica("big.bin", vec![7u8; 100]);

        run(&fx, 1);

        fx.assert_converged();
        assert_eq!(fx.log_lines(), vec!["Updated: big.bin"]);
    }
}

// =============================================================================
// Failure handling
// =============================================================================

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pass_error_keeps_earlier_log_lines() {
        let fx = SyncFixture::new();
        fx.write_source("a.txt", "first");
        fx.write_source("b.txt", "clash");
        std::fs::create_dir_all(fx.replica().join("b.txt")).unwrap();

        let mut out = Vec::new();
        let result = driver(&fx).run_passes(1, &mut out);

        assert!(result.is_err());
        assert!(out.is_empty(), "no completion message after a failed pass");
        assert_eq!(fx.log_lines(), vec!["Added: a.txt"]);
    }

    #[test]
    fn test_missing_source_fails_before_touching_replica() {
        let fx = SyncFixture::new();
        fx.write_replica("keep.txt", "keep");
        std::fs::remove_dir(fx.source()).unwrap();

        let err = driver(&fx).run_pass().unwrap_err();

        assert!(matches!(err, replica_core::Error::SourceNotFound { .. }));
        assert_eq!(fx.read_replica("keep.txt"), "keep");
    }
}
