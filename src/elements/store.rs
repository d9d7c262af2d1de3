use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::sim::ElementSet;

use super::error::ProviderError;
use super::parsing::{catalog_number, parse_element_sets, RawElementSet};

/// One element set held by the store, with its provenance.
#[derive(Debug, Clone)]
pub struct StoredSet {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    /// When the backing file was last written.
    pub fetched_at: DateTime<Utc>,
    /// Backing file name, for diagnostics.
    pub source: String,
}

impl StoredSet {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// Pair the stored lines with the caller's display name.
    pub fn element_set(&self, display_name: &str) -> ElementSet {
        ElementSet {
            name: display_name.to_string(),
            line1: self.line1.clone(),
            line2: self.line2.clone(),
        }
    }
}

/// Element-set cache over a directory of TLE files.
///
/// Files older than `max_age` are considered stale but still served —
/// a stale set beats no set for visualization purposes. Staleness is
/// surfaced through warnings and the satellite status API.
pub struct ElementStore {
    tle_dir: PathBuf,
    max_age: Duration,
    sets: HashMap<u64, StoredSet>,
}

impl ElementStore {
    pub fn new(tle_dir: PathBuf, max_age: Duration) -> Self {
        Self {
            tle_dir,
            max_age,
            sets: HashMap::new(),
        }
    }

    /// Rescan the directory, replacing the in-memory index.
    pub fn reload(&mut self) -> Result<(), ProviderError> {
        if !self.tle_dir.exists() {
            return Err(ProviderError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        self.sets.clear();

        for entry in fs::read_dir(&self.tle_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            if ext != "tle" && ext != "txt" {
                continue;
            }

            match load_file(&path) {
                Ok(loaded) => {
                    for (catnr, set) in loaded {
                        self.sets.insert(catnr, set);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to load element file {}: {}", path.display(), e);
                }
            }
        }

        log::info!(
            "Loaded {} element sets from {}",
            self.sets.len(),
            self.tle_dir.display()
        );
        Ok(())
    }

    /// Element set for a catalog number, falling back to a stale entry
    /// with a warning rather than failing.
    pub fn lookup(&self, catnr: u64) -> Result<&StoredSet, ProviderError> {
        let set = self.sets.get(&catnr).ok_or(ProviderError::NotFound(catnr))?;

        let age = set.age(Utc::now());
        if age > self.max_age {
            log::warn!(
                "Element set for catalog {} is {}h old (limit {}h); using last known good",
                catnr,
                age.num_hours(),
                self.max_age.num_hours()
            );
        }

        Ok(set)
    }

    /// Like [`lookup`](Self::lookup) but without the staleness warning.
    pub fn peek(&self, catnr: u64) -> Option<&StoredSet> {
        self.sets.get(&catnr)
    }

    pub fn is_stale(&self, set: &StoredSet) -> bool {
        set.age(Utc::now()) > self.max_age
    }

    /// Write an element set to the directory and index it, replacing any
    /// previous entry for the catalog number. This is the hook an
    /// external fetcher uses to refresh the cache.
    pub fn store(&mut self, catnr: u64, raw: &RawElementSet) -> Result<(), ProviderError> {
        let file_name = format!("{}.tle", catnr);
        let path = self.tle_dir.join(&file_name);

        let mut content = String::new();
        if let Some(name) = &raw.name {
            content.push_str(name);
            content.push('\n');
        }
        content.push_str(&raw.line1);
        content.push('\n');
        content.push_str(&raw.line2);
        content.push('\n');
        fs::write(&path, content)?;

        self.sets.insert(
            catnr,
            StoredSet {
                name: raw.name.clone(),
                line1: raw.line1.clone(),
                line2: raw.line2.clone(),
                fetched_at: Utc::now(),
                source: file_name,
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Parse one TLE file, which may hold several element sets.
fn load_file(path: &Path) -> Result<Vec<(u64, StoredSet)>, ProviderError> {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let content = fs::read_to_string(path)?;
    let modified: DateTime<Utc> = fs::metadata(path)?.modified()?.into();

    let parsed = parse_element_sets(&content);
    if parsed.is_empty() {
        return Err(ProviderError::Parse {
            file: file_name,
            message: "no element sets found".to_string(),
        });
    }

    let mut loaded = Vec::with_capacity(parsed.len());
    for raw in parsed {
        let catnr = catalog_number(&raw.line1).ok_or_else(|| ProviderError::Parse {
            file: file_name.clone(),
            message: format!("unreadable catalog number in line: {}", raw.line1),
        })?;
        loaded.push((
            catnr,
            StoredSet {
                name: raw.name,
                line1: raw.line1,
                line2: raw.line2,
                fetched_at: modified,
                source: file_name.clone(),
            },
        ));
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "orbitarium-store-{}-{}",
                tag,
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn write_iss(dir: &Path) {
        fs::write(
            dir.join("25544.tle"),
            format!("ISS (ZARYA)\n{}\n{}\n", LINE1, LINE2),
        )
        .unwrap();
    }

    #[test]
    fn loads_sets_from_directory() {
        let dir = TempDir::new("load");
        write_iss(dir.path());

        let mut store = ElementStore::new(dir.path().to_path_buf(), Duration::hours(24));
        store.reload().unwrap();

        assert_eq!(store.len(), 1);
        let set = store.lookup(25544).unwrap();
        assert_eq!(set.name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(set.line1, LINE1);
        assert_eq!(set.element_set("ISS").name, "ISS");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let mut store = ElementStore::new(
            PathBuf::from("/nonexistent/orbitarium-tles"),
            Duration::hours(24),
        );
        let err = store.reload().unwrap_err();
        assert!(matches!(err, ProviderError::DirectoryNotFound(_)));
    }

    #[test]
    fn unknown_catalog_number_is_not_found() {
        let dir = TempDir::new("notfound");
        write_iss(dir.path());

        let mut store = ElementStore::new(dir.path().to_path_buf(), Duration::hours(24));
        store.reload().unwrap();

        let err = store.lookup(99999).unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(99999)));
        assert!(store.peek(99999).is_none());
    }

    #[test]
    fn bad_file_is_skipped_without_aborting_the_scan() {
        let dir = TempDir::new("badfile");
        write_iss(dir.path());
        fs::write(dir.path().join("junk.tle"), "this is not tle data\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored extension\n").unwrap();

        let mut store = ElementStore::new(dir.path().to_path_buf(), Duration::hours(24));
        store.reload().unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.peek(25544).is_some());
    }

    #[test]
    fn stale_entries_still_serve() {
        let dir = TempDir::new("stale");
        write_iss(dir.path());

        // Zero TTL makes everything on disk stale immediately.
        let mut store = ElementStore::new(dir.path().to_path_buf(), Duration::zero());
        store.reload().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));

        let set = store.lookup(25544).unwrap();
        assert!(store.is_stale(set));
        assert_eq!(set.line2, LINE2);
    }

    #[test]
    fn store_writes_and_indexes() {
        let dir = TempDir::new("write");

        let mut store = ElementStore::new(dir.path().to_path_buf(), Duration::hours(24));
        store.reload().unwrap();
        assert!(store.is_empty());

        let raw = RawElementSet {
            name: Some("ISS (ZARYA)".to_string()),
            line1: LINE1.to_string(),
            line2: LINE2.to_string(),
        };
        store.store(25544, &raw).unwrap();

        assert!(dir.path().join("25544.tle").exists());
        assert!(!store.is_stale(store.lookup(25544).unwrap()));

        // A fresh scan sees the written file.
        let mut rescan = ElementStore::new(dir.path().to_path_buf(), Duration::hours(24));
        rescan.reload().unwrap();
        assert_eq!(rescan.len(), 1);
    }
}
