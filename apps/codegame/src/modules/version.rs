//! Dotted version strings.
//!
//! Versions cross every boundary of the module subsystem as strings: manifest
//! keys and values, release tags, user arguments. [`SemanticVersion`] is the
//! transient structured form used to compare them. It is intentionally more
//! lenient than semver: a leading `v` is accepted and missing components
//! default to zero, so `"v1"`, `"1.2"` and `"1.2.3"` all parse.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::CodegameError;

/// A `major.minor.patch` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SemanticVersion {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

impl SemanticVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses `["v"] major["." minor["." patch]]`.
    ///
    /// Components beyond the third are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::MalformedVersion`] if the string is empty or any
    /// of the first three components is not a non-negative integer.
    pub fn parse(input: &str) -> Result<Self, CodegameError> {
        let (version, _) = Self::parse_counted(input)?;
        Ok(version)
    }

    /// Parses a version that must name at least `major.minor`.
    ///
    /// Manifest keys and requested source versions are compared by minor
    /// version, so a bare major is rejected here.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::MalformedVersion`] if parsing fails or the
    /// minor component is missing.
    pub fn parse_prefix(input: &str) -> Result<Self, CodegameError> {
        let (version, components) = Self::parse_counted(input)?;
        if components < 2 {
            return Err(CodegameError::malformed_version(input));
        }
        Ok(version)
    }

    fn parse_counted(input: &str) -> Result<(Self, usize), CodegameError> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let mut components = [0u64; 3];
        let mut count = 0;
        for (slot, part) in components.iter_mut().zip(body.split('.')) {
            *slot = parse_component(part).ok_or_else(|| CodegameError::malformed_version(input))?;
            count += 1;
        }

        let [major, minor, patch] = components;
        Ok((Self::new(major, minor, patch), count))
    }

    /// Returns the `major-minor` form used in installed file names.
    #[must_use]
    pub fn minor_prefix(&self) -> String {
        format!("{}-{}", self.major, self.minor)
    }

    /// Returns whether this version is at least `major.minor`.
    #[must_use]
    pub fn at_least(&self, major: u64, minor: u64) -> bool {
        *self >= Self::new(major, minor, 0)
    }
}

/// Parses one numeric component. Signs and empty strings are rejected.
fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for SemanticVersion {
    type Err = CodegameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
