use bstr::ByteSlice;
use serde::Serialize;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

pub use testfiles_macros::test_files;

#[path = "rt.rs"]
pub mod __rt;

macro_rules! impl_conversions {
    ($T:ty) => {
        impl<P: Into<PathBuf>> From<P> for $T {
            fn from(path: P) -> Self {
                Self { path: path.into() }
            }
        }

        impl AsRef<Path> for $T {
            fn as_ref(&self) -> &Path {
                &self.path
            }
        }
    };
}

/// A test case input. Must exist.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
}

impl_conversions!(InputFile);

impl InputFile {
    pub fn read_bytes(&self) -> Vec<u8> {
        std::fs::read(self)
            .unwrap_or_else(|e| panic!("Error reading {}: {}", self.path.display(), e))
    }
}

/// A snapshot compared against, and depending on [`SnapshotMode`] written
/// from, the actual output.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
}

impl_conversions!(OutputFile);

impl OutputFile {
    pub fn compare_with_mode<T: Snapshot>(&self, actual: &T, mode: SnapshotMode) {
        self.compare_opt_with_mode(Some(actual), mode);
    }

    pub fn compare<T: Snapshot>(&self, actual: &T) {
        self.compare_with_mode(actual, SnapshotMode::current());
    }

    pub fn compare_json<T: Serialize>(&self, actual: &T) {
        let actual = serde_json::to_value(actual)
            .unwrap_or_else(|e| panic!("Error serializing {}: {}", self.path.display(), e));
        self.compare(&Json(actual));
    }

    pub fn compare_string(&self, actual: &str) {
        self.compare(&actual.to_owned());
    }

    /// Asserts that no snapshot exists, deleting a stale one when snapshots
    /// are being rewritten.
    pub fn remove(&self) {
        self.compare_opt_with_mode::<String>(None, SnapshotMode::current());
    }

    /// `None` means the snapshot must not exist.
    pub fn compare_opt_with_mode<T: Snapshot>(&self, actual: Option<&T>, mode: SnapshotMode) {
        let expected = self.read_bytes_opt();
        match (actual, &expected) {
            (Some(actual), Some(expected)) if actual.compare_with(expected) => {}
            (None, None) => {}
            (Some(actual), Some(expected)) => {
                if mode == SnapshotMode::All {
                    self.write(actual);
                } else {
                    actual.on_diff(expected);
                }
            }
            (Some(actual), None) => {
                if mode >= SnapshotMode::New {
                    self.write(actual);
                } else {
                    panic!(
                        "Snapshot {} not found\n\nUse UPDATE_SNAPSHOTS=true to generate the snapshot",
                        self.path.display()
                    );
                }
            }
            (None, Some(_)) => {
                if mode == SnapshotMode::All {
                    std::fs::remove_file(&self.path).unwrap_or_else(|e| {
                        panic!("Error removing {}: {}", self.path.display(), e)
                    });
                } else {
                    panic!(
                        "Snapshot {} should not exist\n\nUse UPDATE_SNAPSHOTS=true to remove the unnecessary snapshot",
                        self.path.display()
                    );
                }
            }
        }
    }

    fn write<T: Snapshot>(&self, actual: &T) {
        std::fs::write(self, actual.to_snapshot())
            .unwrap_or_else(|e| panic!("Error writing {}: {}", self.path.display(), e));
    }

    fn read_bytes_opt(&self) -> Option<Vec<u8>> {
        match std::fs::read(self) {
            Ok(expected) => Some(expected),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => panic!("Error reading {}: {}", self.path.display(), e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SnapshotMode {
    None,
    New,
    All,
}

impl SnapshotMode {
    /// Read from `UPDATE_SNAPSHOTS`; defaults to `New` except on CI.
    pub fn current() -> SnapshotMode {
        let update_snapshots = env::var("UPDATE_SNAPSHOTS").unwrap_or_default();
        match &update_snapshots[..] {
            "all" | "true" | "1" => return SnapshotMode::All,
            "new" => return SnapshotMode::New,
            "none" | "false" | "0" => return SnapshotMode::None,
            _ => {}
        }
        let ci = env::var("CI").unwrap_or_default();
        if ci == "true" || ci == "1" {
            return SnapshotMode::None;
        }
        SnapshotMode::New
    }
}

pub trait Snapshot {
    fn to_snapshot(&self) -> Vec<u8>;
    fn compare_with(&self, snapshot: &[u8]) -> bool;
    fn on_diff(&self, snapshot: &[u8]) -> !;
}

impl Snapshot for String {
    fn to_snapshot(&self) -> Vec<u8> {
        self.as_bytes().to_owned()
    }
    fn compare_with(&self, snapshot: &[u8]) -> bool {
        self.as_bytes() == snapshot
    }
    fn on_diff(&self, snapshot: &[u8]) -> ! {
        assert_eq!(self, snapshot.as_bstr());
        unreachable!();
    }
}

/// JSON compared by value, so snapshot formatting does not matter.
#[derive(Debug, Clone, PartialEq)]
pub struct Json(pub serde_json::Value);

impl Snapshot for Json {
    fn to_snapshot(&self) -> Vec<u8> {
        let mut snapshot = serde_json::to_vec_pretty(&self.0).unwrap_or_default();
        snapshot.push(b'\n');
        snapshot
    }
    fn compare_with(&self, snapshot: &[u8]) -> bool {
        serde_json::from_slice::<serde_json::Value>(snapshot)
            .map_or(false, |expected| expected == self.0)
    }
    fn on_diff(&self, snapshot: &[u8]) -> ! {
        let expected = serde_json::from_slice::<serde_json::Value>(snapshot)
            .map(|expected| Json(expected).to_snapshot())
            .unwrap_or_else(|_| snapshot.to_owned());
        assert_eq!(self.to_snapshot().as_bstr(), expected.as_bstr());
        unreachable!();
    }
}
