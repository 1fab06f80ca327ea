use survey_model::StorageType;

/// Rejected write-back of user input into a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("element {element} is not bound to an attribute")]
    Unbound { element: String },

    #[error("{control} control cannot take {input} input")]
    InputMismatch {
        control: &'static str,
        input: &'static str,
    },

    #[error("{value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },

    #[error("{value} cannot be stored as {storage_type}")]
    NotStorable {
        value: String,
        storage_type: StorageType,
    },

    #[error("item {index} does not exist; the picker has {count} items")]
    NoSuchItem { index: usize, count: usize },
}
