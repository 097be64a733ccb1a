//! Dated-directory holdings store.
//!
//! Downloads are kept as `<root>/<ticker>/<YYYY>/<MM>/<DD>/<file>`. Zero
//! padded components make lexicographic order chronological.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lookthrough_core::{HoldingsStore, LookthroughResult};
use tracing::{debug, info};

use crate::error::{FileError, FileResult};

/// Holdings store backed by a directory tree.
#[derive(Debug, Clone)]
pub struct DatedDirectoryStore {
    root: PathBuf,
}

impl DatedDirectoryStore {
    /// Creates a store rooted at `root`. The directory need not exist.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `ticker`'s downloads for `date`.
    #[must_use]
    pub fn dir_for(&self, ticker: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(ticker)
            .join(date.format("%Y").to_string())
            .join(date.format("%m").to_string())
            .join(date.format("%d").to_string())
    }

    /// Copies a downloaded file into the store under `date`.
    ///
    /// Returns the stored path. An existing file of the same name is
    /// replaced.
    pub fn import(&self, ticker: &str, date: NaiveDate, file: &Path) -> FileResult<PathBuf> {
        if ticker.is_empty() || ticker.contains(['/', '\\']) || ticker.starts_with('.') {
            return Err(FileError::Store(format!("invalid ticker {ticker:?}")));
        }
        let Some(name) = file.file_name() else {
            return Err(FileError::Store(format!(
                "not a file: {}",
                file.display()
            )));
        };

        let dir = self.dir_for(ticker, date);
        fs::create_dir_all(&dir).map_err(|e| FileError::io(&dir, e))?;
        let dest = dir.join(name);
        fs::copy(file, &dest).map_err(|e| FileError::io(file, e))?;

        info!(ticker, path = %dest.display(), "Imported holdings file");
        Ok(dest)
    }

    /// Greatest visible entry of a directory, `None` if absent or empty.
    fn greatest_entry(dir: &Path, want_dir: bool) -> FileResult<Option<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FileError::io(dir, e)),
        };

        let mut best: Option<(String, PathBuf)> = None;
        for entry in entries {
            let entry = entry.map_err(|e| FileError::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            if path.is_dir() != want_dir {
                continue;
            }
            if best.as_ref().map_or(true, |(b, _)| name > *b) {
                best = Some((name, path));
            }
        }
        Ok(best.map(|(_, path)| path))
    }

    fn find_latest(&self, ticker: &str) -> FileResult<Option<PathBuf>> {
        let mut dir = self.root.join(ticker);
        // year, month, day
        for _ in 0..3 {
            match Self::greatest_entry(&dir, true)? {
                Some(next) => dir = next,
                None => return Ok(None),
            }
        }
        Self::greatest_entry(&dir, false)
    }
}

impl HoldingsStore for DatedDirectoryStore {
    fn latest(&self, ticker: &str) -> LookthroughResult<Option<PathBuf>> {
        let found = self.find_latest(ticker)?;
        debug!(ticker, found = ?found, "Store lookup");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_dir_layout() {
        let store = DatedDirectoryStore::new("/db");
        assert_eq!(
            store.dir_for("SPY", date(2024, 3, 7)),
            PathBuf::from("/db/SPY/2024/03/07")
        );
    }

    #[test]
    fn test_latest_walks_greatest_dates() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DatedDirectoryStore::new(tmp.path());
        touch(&store.dir_for("SPY", date(2023, 12, 29)).join("holdings.csv"));
        touch(&store.dir_for("SPY", date(2024, 1, 5)).join("a.csv"));
        touch(&store.dir_for("SPY", date(2024, 1, 5)).join("b.csv"));
        touch(&store.dir_for("SPY", date(2024, 1, 5)).join(".b.csv.swp"));
        touch(&store.dir_for("SPY", date(2024, 1, 31)).join("holdings.csv"));

        let latest = store.latest("SPY").unwrap().unwrap();
        assert_eq!(
            latest,
            store.dir_for("SPY", date(2024, 1, 31)).join("holdings.csv")
        );

        fs::remove_dir_all(store.dir_for("SPY", date(2024, 1, 31))).unwrap();
        let latest = store.latest("SPY").unwrap().unwrap();
        assert!(latest.ends_with("2024/01/05/b.csv"));
    }

    #[test]
    fn test_latest_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DatedDirectoryStore::new(tmp.path());
        assert_eq!(store.latest("QQQ").unwrap(), None);

        fs::create_dir_all(store.dir_for("QQQ", date(2024, 2, 1))).unwrap();
        assert_eq!(store.latest("QQQ").unwrap(), None);
    }

    #[test]
    fn test_import_copies_file() {
        let tmp = tempfile::tempdir().unwrap();
        let download = tmp.path().join("download.csv");
        fs::write(&download, "fraction,asstype,ticker\n1,Equity,AAPL\n").unwrap();

        let store = DatedDirectoryStore::new(tmp.path().join("db"));
        let stored = store.import("SPY", date(2024, 2, 1), &download).unwrap();
        assert_eq!(store.latest("SPY").unwrap(), Some(stored.clone()));
        assert_eq!(
            fs::read_to_string(stored).unwrap(),
            fs::read_to_string(download).unwrap()
        );

        assert!(matches!(
            store.import("../SPY", date(2024, 2, 1), tmp.path()),
            Err(FileError::Store(_))
        ));
    }
}
