//! Typed representation of a survey protocol document.
//!
//! Every value here is immutable once built by the protocol decoder; the
//! storage and form compilers only read it.

#![deny(unsafe_code)]

pub mod attribute;
pub mod dialog;
pub mod error;
pub mod ids;
pub mod location;
pub mod naming;
pub mod protocol;
pub mod symbology;
pub mod totalizer;

pub use attribute::{Attribute, AttributeType, StorageType, find_attribute};
pub use dialog::{
    Autocorrection, BindKind, Binding, COMMON_ELEMENT_FIELDS, Capitalization, DecimalElement,
    Dialog, DialogElement, DialogSection, ElementHeader, ElementKind, IntegerElement,
    KeyboardType, LabelElement, PickerBinding, PickerElement, SwitchElement, TextElement,
};
pub use error::{ModelError, Result};
pub use ids::AttributeName;
pub use location::{Direction, DistanceUnits, LocationMethod, LocationMethodKind};
pub use naming::{attribute_column, feature_table};
pub use protocol::{
    Feature, Label, Mission, PROTOCOL_META_NAME, ProtocolDocument, ProtocolVersion,
};
pub use symbology::{
    Color, LegacySymbology, LineStyle, LineSymbol, MarkerStyle, MarkerSymbol, Renderer, Symbol,
    SymbolShape, SymbologyRole, TextSymbol, UniqueValueInfo,
};
pub use totalizer::{MissionTotalizer, TotalizerUnits};
