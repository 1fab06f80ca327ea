use sha2::Digest;

use crate::error::StorageError;
use crate::schema::StorageSchema;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// SHA-256 of the schema's JSON encoding. Equal schemas always produce the
/// same fingerprint.
pub fn fingerprint(schema: &StorageSchema) -> Result<String, StorageError> {
    let bytes = serde_json::to_vec(schema).map_err(|source| StorageError::Encode { source })?;
    Ok(sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;

    #[test]
    fn hex_digest_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_tracks_content() {
        let empty = StorageSchema::default();
        let one = StorageSchema::default().with_table_if_absent(Table::new("O_Birds"));
        assert_eq!(fingerprint(&empty).unwrap(), fingerprint(&empty).unwrap());
        assert_ne!(fingerprint(&empty).unwrap(), fingerprint(&one).unwrap());
    }
}
