use std::fmt;

use crate::ModelError;

/// Shortest attribute name a protocol may declare.
pub const ATTRIBUTE_NAME_MIN_LEN: usize = 2;

/// Longest attribute name a protocol may declare.
pub const ATTRIBUTE_NAME_MAX_LEN: usize = 10;

/// An attribute identifier: `[A-Za-z_][A-Za-z0-9_]*`, 2 to 10 characters.
///
/// Names compare case-sensitively; uniqueness checks inside an attribute
/// list use [`AttributeName::eq_ignore_case`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct AttributeName(String);

impl AttributeName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        if let Err(reason) = check_identifier(&value) {
            return Err(ModelError::InvalidAttributeName {
                name: value,
                reason,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn check_identifier(value: &str) -> Result<(), &'static str> {
    let len = value.chars().count();
    if len < ATTRIBUTE_NAME_MIN_LEN {
        return Err("must be at least 2 characters");
    }
    if len > ATTRIBUTE_NAME_MAX_LEN {
        return Err("must be at most 10 characters");
    }
    let mut chars = value.chars();
    if let Some(first) = chars.next()
        && !(first.is_ascii_alphabetic() || first == '_')
    {
        return Err("must start with a letter or underscore");
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("may only contain letters, digits and underscores");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers() {
        for name in ["ab", "_x", "Name1", "a_b_c_d_e_"] {
            assert!(AttributeName::new(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_bad_identifiers() {
        for name in ["a", "1abc", "has space", "waytoolongname", "dash-ed", ""] {
            assert!(AttributeName::new(name).is_err(), "{name}");
        }
    }

    #[test]
    fn case_insensitive_comparison() {
        let name = AttributeName::new("One").unwrap();
        assert!(name.eq_ignore_case("one"));
        assert_ne!(name.as_str(), "one");
    }
}
