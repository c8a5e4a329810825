//! Heuristic for whether saves survive a host version change
//!
//! This is a business rule, not a format check. Versions are grouped into
//! families by string prefix; the longest matching prefix decides a version's
//! family. A fragile family only accepts saves from itself. Everything else is
//! compatible as long as the first dotted segment (the major line) matches.

/// A group of host versions sharing a save format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFamily {
    /// Version strings starting with this prefix belong to the family
    pub prefix: String,
    /// Saves never cross into or out of a fragile family
    pub fragile: bool,
}

impl VersionFamily {
    pub fn stable(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            fragile: false,
        }
    }

    pub fn fragile(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            fragile: true,
        }
    }
}

/// Set of known version families
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityRules {
    families: Vec<VersionFamily>,
}

impl Default for CompatibilityRules {
    /// The early `1.9.0x` patch series wrote saves later builds cannot read.
    fn default() -> Self {
        Self::new(vec![
            VersionFamily::fragile("1.9.0"),
            VersionFamily::stable("1.9."),
        ])
    }
}

impl CompatibilityRules {
    #[must_use]
    pub fn new(families: Vec<VersionFamily>) -> Self {
        Self { families }
    }

    /// Rules with no families: only the major line matters
    #[must_use]
    pub fn major_line_only() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn families(&self) -> &[VersionFamily] {
        &self.families
    }

    /// Family with the longest prefix matching `version`
    #[must_use]
    pub fn family_of(&self, version: &str) -> Option<&VersionFamily> {
        self.families
            .iter()
            .filter(|family| version.starts_with(family.prefix.as_str()))
            .max_by_key(|family| family.prefix.len())
    }

    /// Whether carrying saves from `last` to `current` is unsafe
    #[must_use]
    pub fn is_problematic_change(&self, current: &str, last: &str) -> bool {
        if current == last {
            return false;
        }

        let current_family = self.family_of(current);
        let last_family = self.family_of(last);

        let touches_fragile = current_family.is_some_and(|f| f.fragile)
            || last_family.is_some_and(|f| f.fragile);
        if touches_fragile {
            return current_family != last_family;
        }

        major_line(current) != major_line(last)
    }
}

/// [`CompatibilityRules::is_problematic_change`] with the default rules
#[must_use]
pub fn is_problematic_change(current: &str, last: &str) -> bool {
    CompatibilityRules::default().is_problematic_change(current, last)
}

fn major_line(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
