//! Sample catalog: the challenge images for one game.
//!
//! K_i: Entries are unique by file name.
//! K_i: Every name joins with the root to a path that exists at load time.
//! K_i: The order is shuffled exactly once (`shuffle` consumes the set).

use crate::game::RngState;
use crate::models::{Result, ScavengerError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Swaps performed per catalog entry when shuffling.
pub const SHUFFLE_SWAP_MULT: usize = 3;

/// Ordered set of challenge image names under a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSet {
    root: PathBuf,
    names: Vec<String>,
}

impl SampleSet {
    /// Enumerate the regular files of `dir`.
    ///
    /// Names that are not valid UTF-8 are skipped: a lossy name would point
    /// at a file that does not exist.
    ///
    /// B_i(directory readable) → Result
    /// B_i(directory non-empty) → Result
    pub fn load(dir: &Path) -> Result<Self> {
        let unreadable = |source| ScavengerError::CatalogUnreadable {
            dir: dir.to_owned(),
            source,
        };

        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let file_type = entry.file_type().map_err(unreadable)?;
            if file_type.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => {
                    names.insert(name);
                }
                Err(raw) => warn!(name = ?raw, "Skipping sample with non-UTF-8 file name"),
            }
        }

        let set = Self::from_names(dir, names)?;
        info!(count = set.len(), dir = %dir.display(), "Loaded sample catalog");
        Ok(set)
    }

    /// Build a catalog from explicit names; duplicates collapse to one.
    pub fn from_names<I, S>(root: impl Into<PathBuf>, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = root.into();
        let mut seen = BTreeSet::new();
        let names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| seen.insert(name.clone()))
            .collect();

        if names.is_empty() {
            return Err(ScavengerError::EmptyCatalog { dir: root });
        }
        Ok(Self { root, names })
    }

    /// Randomize the order with `3 × N` swaps of two uniformly drawn indices.
    ///
    /// This is a weak shuffle: random transpositions do not give a uniform
    /// permutation the way Fisher–Yates does. Good enough to vary the game.
    pub fn shuffle(mut self, rng: &mut RngState) -> Self {
        let len = self.names.len();
        for _ in 0..len * SHUFFLE_SWAP_MULT {
            let a = rng.index(len);
            let b = rng.index(len);
            self.names.swap(a, b);
        }
        debug!(seed = rng.seed(), swaps = len * SHUFFLE_SWAP_MULT, "Shuffled catalog");
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; an empty catalog cannot be built.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Full path of the entry at `index`.
    pub fn path_of(&self, index: usize) -> Option<PathBuf> {
        self.names.get(index).map(|name| self.root.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("sample_{i:02}.jpg")).collect()
    }

    #[test]
    fn test_load_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lighthouse.jpg"), b"x").unwrap();
        fs::write(temp_dir.path().join("bridge.png"), b"x").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();

        let set = SampleSet::load(temp_dir.path()).unwrap();
        assert_eq!(set.names(), &["bridge.png", "lighthouse.jpg"]);
        assert_eq!(
            set.path_of(1).unwrap(),
            temp_dir.path().join("lighthouse.jpg")
        );
        assert!(set.path_of(2).is_none());
    }

    #[test]
    fn test_load_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("only_a_dir")).unwrap();

        let err = SampleSet::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ScavengerError::EmptyCatalog { .. }));
        assert_eq!(err.exit_status().code(), 1);
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = SampleSet::load(&temp_dir.path().join("objectSamples")).unwrap_err();
        assert!(matches!(err, ScavengerError::CatalogUnreadable { .. }));
        assert_eq!(err.exit_status().code(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_load_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(OsStr::from_bytes(b"caf\xe9.jpg")), b"x").unwrap();
        fs::write(temp_dir.path().join("tower.jpg"), b"x").unwrap();

        let set = SampleSet::load(temp_dir.path()).unwrap();
        assert_eq!(set.names(), &["tower.jpg"]);
        assert!(set.path_of(0).unwrap().exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_load_only_non_utf8_names_is_empty() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(OsStr::from_bytes(b"\xff\xfe.png")), b"x").unwrap();

        let err = SampleSet::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ScavengerError::EmptyCatalog { .. }));
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let set = SampleSet::from_names("s", ["a.jpg", "b.jpg", "a.jpg"]).unwrap();
        assert_eq!(set.names(), &["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        for count in [1, 2, 5, 17, 64] {
            let original = names(count);
            let set = SampleSet::from_names("s", original.clone()).unwrap();
            let shuffled = set.shuffle(&mut RngState::from_seed(count as u64));

            let mut sorted = shuffled.names().to_vec();
            sorted.sort();
            assert_eq!(sorted, original, "lost or duplicated entries for n={count}");
        }
    }

    #[test]
    fn test_shuffle_deterministic_per_seed() {
        let a = SampleSet::from_names("s", names(20))
            .unwrap()
            .shuffle(&mut RngState::from_seed(99));
        let b = SampleSet::from_names("s", names(20))
            .unwrap()
            .shuffle(&mut RngState::from_seed(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_moves_entries() {
        let original = names(20);
        let shuffled = SampleSet::from_names("s", original.clone())
            .unwrap()
            .shuffle(&mut RngState::from_seed(3));
        assert_ne!(shuffled.names(), original.as_slice());
    }
}
