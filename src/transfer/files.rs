//! The fixed set of save files the engine manages

use std::path::Path;

/// Save slots and profiles written by the host
pub const DEFAULT_SAVE_FILES: [&str; 10] = [
    "sav", "sav2", "sav3", "expCore", "expCore1", "expCore2", "expCore3", "exp1", "exp2", "exp3",
];

/// Ordered, immutable list of save file names
///
/// Every transfer iterates exactly this list; other files in the same
/// directories are never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFileSet {
    names: Vec<String>,
    companions: Vec<(String, Vec<String>)>,
}

impl Default for SaveFileSet {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_FILES).with_companions("exp1", ["exp2", "exp3"])
    }
}

impl SaveFileSet {
    /// Create a set from file names, dropping duplicates but keeping order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self {
            names: unique,
            companions: Vec::new(),
        }
    }

    /// Declare files the host forgets to copy alongside `primary`
    ///
    /// Only names that are part of the set are kept.
    #[must_use]
    pub fn with_companions<I, S>(mut self, primary: impl Into<String>, companions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let primary = primary.into();
        let companions: Vec<String> = companions
            .into_iter()
            .map(Into::into)
            .filter(|name| self.contains(name) && *name != primary)
            .collect();

        self.companions.retain(|(p, _)| *p != primary);
        self.companions.push((primary, companions));
        self
    }

    /// File names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Companion files declared for `name`
    #[must_use]
    pub fn companions_of(&self, name: &str) -> &[String] {
        self.companions
            .iter()
            .find(|(primary, _)| primary == name)
            .map(|(_, companions)| companions.as_slice())
            .unwrap_or(&[])
    }

    /// Tracked files currently present in `dir`
    #[must_use]
    pub fn present_in(&self, dir: &Path) -> Vec<&str> {
        self.iter().filter(|name| dir.join(name).is_file()).collect()
    }

    /// Whether `dir` holds at least one tracked file
    #[must_use]
    pub fn contained_in(&self, dir: &Path) -> bool {
        self.iter().any(|name| dir.join(name).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_set() {
        let set = SaveFileSet::default();
        assert_eq!(set.len(), 10);
        assert_eq!(set.iter().next(), Some("sav"));
        assert_eq!(set.companions_of("exp1"), ["exp2".to_string(), "exp3".to_string()]);
        assert!(set.companions_of("sav").is_empty());
    }

    #[test]
    fn test_duplicates_and_unknown_companions_dropped() {
        let set = SaveFileSet::new(["a", "b", "a"]).with_companions("a", ["b", "zzz", "a"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.companions_of("a"), ["b".to_string()]);
    }

    #[test]
    fn test_present_in_only_sees_tracked_files() {
        let dir = tempdir().unwrap();
        let set = SaveFileSet::default();
        assert!(!set.contained_in(dir.path()));

        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("sav2")).unwrap();
        assert!(!set.contained_in(dir.path()));

        fs::write(dir.path().join("exp1"), "x").unwrap();
        assert!(set.contained_in(dir.path()));
        assert_eq!(set.present_in(dir.path()), vec!["exp1"]);
    }
}
