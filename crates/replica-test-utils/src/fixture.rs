//! [`SyncFixture`] for reconcile scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A temporary directory holding `source/`, `replica/` and `sync.log`.
///
/// # Example
///
/// ```rust,no_run
/// use replica_test_utils::SyncFixture;
///
/// let fx = SyncFixture::new();
/// fx.write_source("a.txt", "hello");
/// fx.assert_replica_missing("a.txt");
/// ```
pub struct SyncFixture {
    temp_dir: TempDir,
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncFixture {
    /// Create empty source and replica directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("source")).unwrap();
        fs::create_dir(temp_dir.path().join("replica")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn replica(&self) -> PathBuf {
        self.root().join("replica")
    }

    /// Path of the audit log; not created until a pass opens it.
    pub fn log_path(&self) -> PathBuf {
        self.root().join("sync.log")
    }

    /// Write `content` to `rel` under the source, creating parents.
    pub fn write_source(&self, rel: &str, content: impl AsRef<[u8]>) {
        write_file(&self.source().join(rel), content.as_ref());
    }

    /// Write `content` to `rel` under the replica, creating parents.
    pub fn write_replica(&self, rel: &str, content: impl AsRef<[u8]>) {
        write_file(&self.replica().join(rel), content.as_ref());
    }

    pub fn remove_source(&self, rel: &str) {
        fs::remove_file(self.source().join(rel)).unwrap();
    }

    /// Read a replica file as UTF-8.
    ///
    /// # Panics
    /// Panics if the file does not exist.
    pub fn read_replica(&self, rel: &str) -> String {
        let path = self.replica().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read replica file: {}", path.display()))
    }

    /// Sorted `/`-separated relative paths of every file in the source.
    pub fn source_files(&self) -> Vec<String> {
        files_under(&self.source())
    }

    /// Sorted `/`-separated relative paths of every file in the replica.
    pub fn replica_files(&self) -> Vec<String> {
        files_under(&self.replica())
    }

    /// Lines of the audit log, empty if it was never created.
    pub fn log_lines(&self) -> Vec<String> {
        match fs::read_to_string(self.log_path()) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Pin the modification time of a replica file.
    pub fn set_replica_mtime(&self, rel: &str, unix_secs: i64) {
        filetime::set_file_mtime(
            self.replica().join(rel),
            FileTime::from_unix_time(unix_secs, 0),
        )
        .unwrap();
    }

    /// Pin the modification time of a source file.
    pub fn set_source_mtime(&self, rel: &str, unix_secs: i64) {
        filetime::set_file_mtime(
            self.source().join(rel),
            FileTime::from_unix_time(unix_secs, 0),
        )
        .unwrap();
    }

    pub fn replica_mtime(&self, rel: &str) -> FileTime {
        let metadata = fs::metadata(self.replica().join(rel)).unwrap();
        FileTime::from_last_modification_time(&metadata)
    }

    /// Assert the replica holds exactly the source's files with equal bytes.
    ///
    /// # Panics
    /// Panics with the first difference found.
    pub fn assert_converged(&self) {
        let source = self.source_files();
        assert_eq!(source, self.replica_files(), "file sets differ");
        for rel in &source {
            let expected = fs::read(self.source().join(rel)).unwrap();
            let actual = fs::read(self.replica().join(rel)).unwrap();
            assert!(expected == actual, "content differs for {rel}");
        }
    }

    /// Assert that `rel` does **not** exist in the replica.
    ///
    /// # Panics
    /// Panics with a descriptive message if it exists.
    pub fn assert_replica_missing(&self, rel: &str) {
        let path = self.replica().join(rel);
        assert!(!path.exists(), "Expected replica file NOT to exist: {}", path.display());
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}
