//! The human-facing certificate identifier, `PREFIX-YYYY-CC-NNN`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayIdError {
    #[error("certificate ID must have four dash-separated parts, got '{0}'")]
    Shape(String),
    #[error("invalid prefix in certificate ID '{0}'")]
    Prefix(String),
    #[error("invalid year in certificate ID '{0}'")]
    Year(String),
    #[error("invalid program code in certificate ID '{0}'")]
    ProgramCode(String),
    #[error("invalid sequence number in certificate ID '{0}'")]
    Sequence(String),
}

/// A parsed certificate display ID, always held in canonical (uppercase) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayId {
    canonical: String,
    year: u16,
    sequence: u32,
}

impl DisplayId {
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn prefix(&self) -> &str {
        self.part(0)
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn program_code(&self) -> &str {
        self.part(2)
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    fn part(&self, index: usize) -> &str {
        self.canonical.split('-').nth(index).unwrap_or_default()
    }
}

impl FromStr for DisplayId {
    type Err = DisplayIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = s.trim().to_uppercase();
        let parts: Vec<&str> = canonical.split('-').collect();
        let &[prefix, year, code, sequence] = parts.as_slice() else {
            return Err(DisplayIdError::Shape(canonical.clone()));
        };

        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DisplayIdError::Prefix(canonical.clone()));
        }
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(DisplayIdError::Year(canonical.clone()));
        }
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DisplayIdError::ProgramCode(canonical.clone()));
        }
        if sequence.len() < 3 || !sequence.chars().all(|c| c.is_ascii_digit()) {
            return Err(DisplayIdError::Sequence(canonical.clone()));
        }

        let year = year
            .parse()
            .map_err(|_| DisplayIdError::Year(canonical.clone()))?;
        let sequence = sequence
            .parse()
            .map_err(|_| DisplayIdError::Sequence(canonical.clone()))?;

        Ok(Self {
            canonical,
            year,
            sequence,
        })
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_id() {
        let id: DisplayId = "EZZCODE-2024-WD-001".parse().unwrap();
        assert_eq!(id.prefix(), "EZZCODE");
        assert_eq!(id.year(), 2024);
        assert_eq!(id.program_code(), "WD");
        assert_eq!(id.sequence(), 1);
        assert_eq!(id.to_string(), "EZZCODE-2024-WD-001");
    }

    #[test]
    fn canonicalizes_case_and_whitespace() {
        let id: DisplayId = "  ezzcode-2024-py-002 ".parse().unwrap();
        assert_eq!(id.as_str(), "EZZCODE-2024-PY-002");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(
            "EZZCODE-2024-WD".parse::<DisplayId>(),
            Err(DisplayIdError::Shape(_))
        ));
        assert!(matches!(
            "EZZCODE-24-WD-001".parse::<DisplayId>(),
            Err(DisplayIdError::Year(_))
        ));
        assert!(matches!(
            "EZZCODE-2024-W1-001".parse::<DisplayId>(),
            Err(DisplayIdError::ProgramCode(_))
        ));
        assert!(matches!(
            "EZZCODE-2024-WD-01".parse::<DisplayId>(),
            Err(DisplayIdError::Sequence(_))
        ));
        assert!(matches!(
            "-2024-WD-001".parse::<DisplayId>(),
            Err(DisplayIdError::Prefix(_))
        ));
    }
}
