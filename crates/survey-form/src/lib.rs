//! Interactive data-entry forms derived from protocol dialogs.
//!
//! [`compile_form`] pairs a dialog with its attributes and a live
//! [`Record`], producing a [`FormDescription`] whose elements carry current
//! values, input ranges and a binding back to the record key
//! (`A_<attribute>`). [`FormElement::write`] stores user input through that
//! binding in the attribute's column type.

#![deny(unsafe_code)]

pub mod error;
pub mod form;
pub mod initialize;
pub mod range;
pub mod record;
pub mod value;

pub use error::FormError;
pub use form::{
    Control, FormBinding, FormDescription, FormElement, FormInput, FormSection, MISSING_VALUE,
    compile_form, picker_selection,
};
pub use initialize::initialize_record;
pub use range::{DecimalRange, IntegerRange, decimal_range, integer_range};
pub use record::{MemoryRecord, Record};
pub use value::FieldValue;
