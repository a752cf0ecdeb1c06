//! Common types used across CLI modules

/// How the user addressed a document: numeric id or document number
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocRef {
    /// Numeric document id
    Id(i64),
    /// Document number (e.g. "RES-12/2024")
    Number(String),
}

impl DocRef {
    /// Parse a string into a DocRef
    ///
    /// Plain integers are ids; anything else is a document number.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<i64>() {
            Ok(id) => DocRef::Id(id),
            Err(_) => DocRef::Number(input.to_string()),
        }
    }
}

impl std::fmt::Display for DocRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocRef::Id(id) => write!(f, "#{}", id),
            DocRef::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for DocRef {
    fn from(s: &str) -> Self {
        DocRef::parse(s)
    }
}
