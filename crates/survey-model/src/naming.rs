//! Names under which protocol entities are stored.
//!
//! Surveys created from a protocol keep these names for their whole life,
//! so the prefixes can never change.

/// Prefix of every attribute column.
pub const ATTRIBUTE_PREFIX: &str = "A_";

/// Prefix of every per-feature observation table.
pub const FEATURE_TABLE_PREFIX: &str = "O_";

/// Storage column (and record key) for an attribute.
pub fn attribute_column(attribute: &str) -> String {
    format!("{ATTRIBUTE_PREFIX}{attribute}")
}

/// Storage table holding observations of a feature.
pub fn feature_table(feature: &str) -> String {
    format!("{FEATURE_TABLE_PREFIX}{feature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(attribute_column("Count"), "A_Count");
        assert_eq!(feature_table("Birds"), "O_Birds");
    }
}
