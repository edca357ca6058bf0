//! Type-safe wrapper for database names.

use std::borrow::Borrow;
use std::fmt;

/// Type-safe wrapper for database names.
///
/// Names are kept exactly as given: `Default` and `default` are distinct databases.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatabaseName(String);

impl DatabaseName {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DatabaseName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DatabaseName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DatabaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DatabaseName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_name_is_case_sensitive() {
        assert_ne!(DatabaseName::new("Default"), DatabaseName::new("default"));
        assert_eq!(DatabaseName::from("default").as_str(), "default");
    }

    #[test]
    fn test_database_name_orders_lexicographically() {
        let mut names = vec![DatabaseName::new("b"), DatabaseName::new("a")];
        names.sort();
        assert_eq!(names[0].as_str(), "a");
    }
}
