//! Validated value types shared across the dashboard crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Concept code cannot be empty")]
    Empty,
}

/// A concept code as configured through global properties.
///
/// This type wraps a `String` and guarantees at least one non-whitespace
/// character, so "feature not configured" is always modelled as the absence
/// of a code rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConceptCode(String);

impl ConceptCode {
    /// Parse a concept code from raw configuration input.
    ///
    /// Surrounding whitespace is stripped before validation; a code that is
    /// blank after stripping yields `TextError::Empty` rather than an empty
    /// `ConceptCode`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let code = input.as_ref().trim();
        if code.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(code.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConceptCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ConceptCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ConceptCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ConceptCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ConceptCode::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let code = ConceptCode::new("  concept.causeOfDeath  ").unwrap();
        assert_eq!(code.as_str(), "concept.causeOfDeath");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(ConceptCode::new("").is_err());
        assert!(ConceptCode::new("   ").is_err());
    }

    #[test]
    fn serialises_as_plain_string() {
        let code = ConceptCode::new("1814").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"1814\"");

        let back: ConceptCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
