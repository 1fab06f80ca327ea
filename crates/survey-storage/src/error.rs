use std::path::PathBuf;

/// Failures of the storage layer. None of them are caused by the protocol
/// document; they describe the environment the compiler runs in.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read baseline schema {path}: {source}")]
    BaselineIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse baseline schema {origin}: {source}")]
    BaselineToml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid baseline schema: {message}")]
    BaselineInvalid { message: String },

    #[error("baseline schema is missing table {name}")]
    BaselineMissingTable { name: String },

    #[error("failed to encode storage schema: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::BaselineIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::BaselineInvalid {
            message: message.into(),
        }
    }
}
