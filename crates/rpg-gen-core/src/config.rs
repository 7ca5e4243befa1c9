//! Compile policy and sampling bounds

use crate::error::ConfigError;

/// Default lower bound on picks per request.
pub const DEFAULT_MIN_COUNT: usize = 1;
/// Default upper bound on picks per request.
pub const DEFAULT_MAX_COUNT: usize = 50;

/// What to do with a generator whose `type` is neither `weighted` nor `unweighted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKindPolicy {
    /// Fail the whole compile with `CompileError::UnknownKind`.
    #[default]
    Reject,
    /// Compile a one-entry generator whose only pick is a diagnostic string.
    /// Matches the output of older deployments.
    Placeholder,
}

/// What to do when two generators share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    /// The later declaration replaces the earlier one in place.
    LastWins,
}

/// Knobs applied while compiling a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilePolicy {
    pub unknown_kind: UnknownKindPolicy,
    pub duplicates: DuplicatePolicy,
}

impl CompilePolicy {
    /// Strict validation: unknown kinds and duplicate names are errors.
    pub fn strict() -> Self {
        Self::default()
    }
}

/// Inclusive range that requested pick counts are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBounds {
    min: usize,
    max: usize,
}

impl Default for SampleBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_COUNT,
            max: DEFAULT_MAX_COUNT,
        }
    }
}

impl SampleBounds {
    pub fn new(min: usize, max: usize) -> Result<Self, ConfigError> {
        if min == 0 || min > max {
            return Err(ConfigError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Clamp a requested count into `[min, max]`. Zero and negative counts become `min`.
    pub fn clamp(&self, count: i64) -> usize {
        if count < self.min as i64 {
            self.min
        } else if count > self.max as i64 {
            self.max
        } else {
            count as usize
        }
    }

    /// Interpret a raw query value as a count.
    ///
    /// Absent or non-numeric input yields `min`, so the result always clamps to `min`.
    pub fn parse_count(&self, raw: Option<&str>) -> i64 {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(self.min as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let bounds = SampleBounds::default();
        assert_eq!(bounds.min(), 1);
        assert_eq!(bounds.max(), 50);
    }

    #[test]
    fn test_clamp() {
        let bounds = SampleBounds::default();
        assert_eq!(bounds.clamp(-5), 1);
        assert_eq!(bounds.clamp(0), 1);
        assert_eq!(bounds.clamp(1), 1);
        assert_eq!(bounds.clamp(17), 17);
        assert_eq!(bounds.clamp(50), 50);
        assert_eq!(bounds.clamp(51), 50);
        assert_eq!(bounds.clamp(i64::MAX), 50);
        assert_eq!(bounds.clamp(i64::MIN), 1);
    }

    #[test]
    fn test_parse_count() {
        let bounds = SampleBounds::new(2, 10).unwrap();
        assert_eq!(bounds.parse_count(None), 2);
        assert_eq!(bounds.parse_count(Some("")), 2);
        assert_eq!(bounds.parse_count(Some("abc")), 2);
        assert_eq!(bounds.parse_count(Some("3.5")), 2);
        assert_eq!(bounds.parse_count(Some(" 7 ")), 7);
        assert_eq!(bounds.parse_count(Some("-4")), -4);
        assert_eq!(bounds.parse_count(Some("99999999999999999999999")), 2);
    }

    #[test]
    fn test_invalid_bounds() {
        assert_eq!(
            SampleBounds::new(0, 5),
            Err(ConfigError::InvalidBounds { min: 0, max: 5 })
        );
        assert_eq!(
            SampleBounds::new(6, 5),
            Err(ConfigError::InvalidBounds { min: 6, max: 5 })
        );
        assert!(SampleBounds::new(5, 5).is_ok());
    }

    #[test]
    fn test_strict_policy() {
        assert_eq!(CompilePolicy::strict().unknown_kind, UnknownKindPolicy::Reject);
        assert_eq!(CompilePolicy::strict().duplicates, DuplicatePolicy::Reject);
        assert_eq!(CompilePolicy::strict(), CompilePolicy::default());
    }
}
