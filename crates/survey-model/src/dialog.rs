//! Data-entry dialogs: sections of typed elements bound to attributes.
//!
//! Element kinds form a closed set. Each kind fixes which bind kinds it
//! accepts, which attribute types it can edit and which optional fields it
//! may carry, so decoding, storage and form derivation all match on
//! [`DialogElement`] exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{AttributeType, ModelError};

/// The value slot of an attribute that an element reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindKind {
    Bool,
    Number,
    /// Picker selection by position.
    Index,
    /// Picker selection by item text.
    Item,
    Text,
    Id,
}

impl BindKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindKind::Bool => "boolValue",
            BindKind::Number => "numberValue",
            BindKind::Index => "selected",
            BindKind::Item => "selectedItem",
            BindKind::Text => "textValue",
            BindKind::Id => "value",
        }
    }
}

impl fmt::Display for BindKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BindKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for BindKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolValue" => Ok(BindKind::Bool),
            "numberValue" => Ok(BindKind::Number),
            "selected" => Ok(BindKind::Index),
            "selectedItem" => Ok(BindKind::Item),
            "textValue" => Ok(BindKind::Text),
            "value" => Ok(BindKind::Id),
            _ => Err(ModelError::UnknownValue {
                kind: "bind kind",
                value: s.to_string(),
            }),
        }
    }
}

/// A parsed `"<bindKind>:<attributeName>"` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub kind: BindKind,
    pub attribute: String,
}

impl Binding {
    pub fn new(kind: BindKind, attribute: impl Into<String>) -> Self {
        Self {
            kind,
            attribute: attribute.into(),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.attribute)
    }
}

impl FromStr for Binding {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, attribute)) = s.split_once(':') else {
            return Err(ModelError::InvalidBind(s.to_string()));
        };
        let attribute = attribute.trim();
        if attribute.is_empty() {
            return Err(ModelError::InvalidBind(s.to_string()));
        }
        Ok(Self {
            kind: kind.trim().parse()?,
            attribute: attribute.to_string(),
        })
    }
}

impl Serialize for Binding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Wire-level element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Switch,
    Decimal,
    Entry,
    Integer,
    Label,
    Multiline,
    Radio,
    Segmented,
}

/// Fields every element may carry regardless of kind.
pub const COMMON_ELEMENT_FIELDS: &[&str] = &["type", "title", "key", "bind"];

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Switch,
        ElementKind::Decimal,
        ElementKind::Entry,
        ElementKind::Integer,
        ElementKind::Label,
        ElementKind::Multiline,
        ElementKind::Radio,
        ElementKind::Segmented,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Switch => "QBooleanElement",
            ElementKind::Decimal => "QDecimalElement",
            ElementKind::Entry => "QEntryElement",
            ElementKind::Integer => "QIntegerElement",
            ElementKind::Label => "QLabelElement",
            ElementKind::Multiline => "QMultilineElement",
            ElementKind::Radio => "QRadioElement",
            ElementKind::Segmented => "QSegmentedElement",
        }
    }

    /// Bind kinds the element accepts.
    pub fn bind_kinds(&self) -> &'static [BindKind] {
        match self {
            ElementKind::Switch => &[BindKind::Bool],
            ElementKind::Decimal | ElementKind::Integer => &[BindKind::Number],
            ElementKind::Entry | ElementKind::Multiline => &[BindKind::Text],
            ElementKind::Label => &[BindKind::Id],
            ElementKind::Radio | ElementKind::Segmented => &[BindKind::Index, BindKind::Item],
        }
    }

    /// Labels are the only elements that may be left unbound.
    pub fn requires_binding(&self) -> bool {
        !matches!(self, ElementKind::Label)
    }

    /// Kind-specific optional fields, beyond [`COMMON_ELEMENT_FIELDS`].
    pub fn optional_fields(&self) -> &'static [&'static str] {
        match self {
            ElementKind::Switch => &["boolValue"],
            ElementKind::Decimal => &[
                "minimumValue",
                "maximumValue",
                "numberValue",
                "fractionDigits",
                "placeholder",
            ],
            ElementKind::Integer => &["minimumValue", "maximumValue", "numberValue"],
            ElementKind::Entry | ElementKind::Multiline => &[
                "placeholder",
                "keyboardType",
                "autocapitalizationType",
                "autocorrectionType",
            ],
            ElementKind::Label => &[],
            ElementKind::Radio | ElementKind::Segmented => &["items", "selected"],
        }
    }

    /// Whether an attribute of `attribute_type` can back this element when
    /// bound through `bind_kind`.
    pub fn accepts(&self, bind_kind: BindKind, attribute_type: AttributeType) -> bool {
        match (self, bind_kind) {
            (ElementKind::Switch, BindKind::Bool) => attribute_type == AttributeType::Boolean,
            (ElementKind::Decimal, BindKind::Number) => attribute_type.is_floating(),
            (ElementKind::Integer, BindKind::Number)
            | (ElementKind::Label, BindKind::Id)
            | (ElementKind::Radio | ElementKind::Segmented, BindKind::Index) => {
                attribute_type.is_integral()
            }
            (ElementKind::Entry | ElementKind::Multiline, BindKind::Text)
            | (ElementKind::Radio | ElementKind::Segmented, BindKind::Item) => {
                attribute_type == AttributeType::String
            }
            _ => false,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownValue {
                kind: "dialog element type",
                value: s.to_string(),
            })
    }
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ModelError::UnknownValue {
                        kind: $label,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// On-screen keyboard hint for text entry.
    KeyboardType, "keyboard type" {
        Default => "Default",
        AsciiCapable => "ASCIICapable",
        NumbersAndPunctuation => "NumbersAndPunctuation",
        Url => "URL",
        NumberPad => "NumberPad",
        PhonePad => "PhonePad",
        NamePhonePad => "NamePhonePad",
        EmailAddress => "EmailAddress",
        DecimalPad => "DecimalPad",
        Twitter => "Twitter",
        WebSearch => "WebSearch",
    }
);

wire_enum!(
    Capitalization, "capitalization type" {
        None => "None",
        Words => "Words",
        Sentences => "Sentences",
        AllCharacters => "AllCharacters",
    }
);

wire_enum!(
    Autocorrection, "autocorrection type" {
        Default => "Default",
        No => "No",
        Yes => "Yes",
    }
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementHeader {
    pub title: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchElement {
    pub header: ElementHeader,
    pub attribute: String,
    pub default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecimalElement {
    pub header: ElementHeader,
    pub attribute: String,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub default: Option<f64>,
    pub fraction_digits: Option<u8>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerElement {
    pub header: ElementHeader,
    pub attribute: String,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub default: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    pub header: ElementHeader,
    pub attribute: String,
    pub placeholder: Option<String>,
    pub keyboard: Option<KeyboardType>,
    pub capitalization: Option<Capitalization>,
    pub autocorrection: Option<Autocorrection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelElement {
    pub header: ElementHeader,
    pub attribute: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerBinding {
    Index(String),
    Item(String),
}

impl PickerBinding {
    pub fn attribute(&self) -> &str {
        match self {
            PickerBinding::Index(name) | PickerBinding::Item(name) => name,
        }
    }

    pub fn kind(&self) -> BindKind {
        match self {
            PickerBinding::Index(_) => BindKind::Index,
            PickerBinding::Item(_) => BindKind::Item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerElement {
    pub header: ElementHeader,
    pub binding: PickerBinding,
    pub items: Vec<String>,
    pub default_index: Option<usize>,
}

/// One entry in a dialog section.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogElement {
    Switch(SwitchElement),
    Decimal(DecimalElement),
    Entry(TextElement),
    Integer(IntegerElement),
    Label(LabelElement),
    Multiline(TextElement),
    Radio(PickerElement),
    Segmented(PickerElement),
}

impl DialogElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            DialogElement::Switch(_) => ElementKind::Switch,
            DialogElement::Decimal(_) => ElementKind::Decimal,
            DialogElement::Entry(_) => ElementKind::Entry,
            DialogElement::Integer(_) => ElementKind::Integer,
            DialogElement::Label(_) => ElementKind::Label,
            DialogElement::Multiline(_) => ElementKind::Multiline,
            DialogElement::Radio(_) => ElementKind::Radio,
            DialogElement::Segmented(_) => ElementKind::Segmented,
        }
    }

    pub fn header(&self) -> &ElementHeader {
        match self {
            DialogElement::Switch(e) => &e.header,
            DialogElement::Decimal(e) => &e.header,
            DialogElement::Entry(e) | DialogElement::Multiline(e) => &e.header,
            DialogElement::Integer(e) => &e.header,
            DialogElement::Label(e) => &e.header,
            DialogElement::Radio(e) | DialogElement::Segmented(e) => &e.header,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.header().title.as_deref()
    }

    pub fn binding(&self) -> Option<Binding> {
        match self {
            DialogElement::Switch(e) => Some(Binding::new(BindKind::Bool, &e.attribute)),
            DialogElement::Decimal(e) => Some(Binding::new(BindKind::Number, &e.attribute)),
            DialogElement::Integer(e) => Some(Binding::new(BindKind::Number, &e.attribute)),
            DialogElement::Entry(e) | DialogElement::Multiline(e) => {
                Some(Binding::new(BindKind::Text, &e.attribute))
            }
            DialogElement::Label(e) => e
                .attribute
                .as_ref()
                .map(|name| Binding::new(BindKind::Id, name)),
            DialogElement::Radio(e) | DialogElement::Segmented(e) => Some(Binding::new(
                e.binding.kind(),
                e.binding.attribute(),
            )),
        }
    }

    pub fn bound_attribute(&self) -> Option<&str> {
        match self {
            DialogElement::Switch(e) => Some(&e.attribute),
            DialogElement::Decimal(e) => Some(&e.attribute),
            DialogElement::Integer(e) => Some(&e.attribute),
            DialogElement::Entry(e) | DialogElement::Multiline(e) => Some(&e.attribute),
            DialogElement::Label(e) => e.attribute.as_deref(),
            DialogElement::Radio(e) | DialogElement::Segmented(e) => Some(e.binding.attribute()),
        }
    }
}

impl Serialize for DialogElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind().as_str())?;
        let header = self.header();
        if let Some(title) = &header.title {
            map.serialize_entry("title", title)?;
        }
        if let Some(key) = &header.key {
            map.serialize_entry("key", key)?;
        }
        if let Some(binding) = self.binding() {
            map.serialize_entry("bind", &binding)?;
        }
        match self {
            DialogElement::Switch(e) => {
                if let Some(value) = e.default {
                    map.serialize_entry("boolValue", &value)?;
                }
            }
            DialogElement::Decimal(e) => {
                serialize_opt(&mut map, "minimumValue", &e.minimum)?;
                serialize_opt(&mut map, "maximumValue", &e.maximum)?;
                serialize_opt(&mut map, "numberValue", &e.default)?;
                serialize_opt(&mut map, "fractionDigits", &e.fraction_digits)?;
                serialize_opt(&mut map, "placeholder", &e.placeholder)?;
            }
            DialogElement::Integer(e) => {
                serialize_opt(&mut map, "minimumValue", &e.minimum)?;
                serialize_opt(&mut map, "maximumValue", &e.maximum)?;
                serialize_opt(&mut map, "numberValue", &e.default)?;
            }
            DialogElement::Entry(e) | DialogElement::Multiline(e) => {
                serialize_opt(&mut map, "placeholder", &e.placeholder)?;
                serialize_opt(&mut map, "keyboardType", &e.keyboard)?;
                serialize_opt(&mut map, "autocapitalizationType", &e.capitalization)?;
                serialize_opt(&mut map, "autocorrectionType", &e.autocorrection)?;
            }
            DialogElement::Label(_) => {}
            DialogElement::Radio(e) | DialogElement::Segmented(e) => {
                map.serialize_entry("items", &e.items)?;
                serialize_opt(&mut map, "selected", &e.default_index)?;
            }
        }
        map.end()
    }
}

fn serialize_opt<M, T>(map: &mut M, key: &str, value: &Option<T>) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize,
{
    match value {
        Some(value) => map.serialize_entry(key, value),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub elements: Vec<DialogElement>,
}

/// The editing dialog for a feature's or the mission's attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dialog {
    pub title: String,
    pub grouped: bool,
    pub sections: Vec<DialogSection>,
}

impl Dialog {
    pub fn elements(&self) -> impl Iterator<Item = &DialogElement> {
        self.sections
            .iter()
            .flat_map(|section| section.elements.iter())
    }

    /// Attribute names referenced by element bindings, in dialog order.
    pub fn bound_attribute_names(&self) -> Vec<&str> {
        self.elements()
            .filter_map(DialogElement::bound_attribute)
            .collect()
    }

    /// Exact-case membership test against bound attribute names.
    pub fn binds(&self, name: &str) -> bool {
        self.elements()
            .any(|element| element.bound_attribute() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_parses() {
        let binding: Binding = "textValue:Name1".parse().unwrap();
        assert_eq!(binding.kind, BindKind::Text);
        assert_eq!(binding.attribute, "Name1");
        assert_eq!(binding.to_string(), "textValue:Name1");
    }

    #[test]
    fn binding_rejects_malformed() {
        assert!("textValue".parse::<Binding>().is_err());
        assert!("textValue:".parse::<Binding>().is_err());
        assert!("stringValue:x".parse::<Binding>().is_err());
    }

    #[test]
    fn switch_accepts_only_bool_binding_to_boolean() {
        let kind = ElementKind::Switch;
        assert!(kind.accepts(BindKind::Bool, AttributeType::Boolean));
        assert!(!kind.accepts(BindKind::Number, AttributeType::Boolean));
        assert!(!kind.accepts(BindKind::Bool, AttributeType::Int16));
    }

    #[test]
    fn picker_binding_kinds() {
        assert!(ElementKind::Radio.accepts(BindKind::Index, AttributeType::Int32));
        assert!(ElementKind::Segmented.accepts(BindKind::Item, AttributeType::String));
        assert!(!ElementKind::Radio.accepts(BindKind::Item, AttributeType::Int32));
    }

    #[test]
    fn element_kinds_round_trip_names() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.as_str().parse::<ElementKind>().unwrap(), kind);
        }
    }

    #[test]
    fn bound_names_in_order() {
        let dialog = Dialog {
            title: "Obs".to_string(),
            grouped: false,
            sections: vec![DialogSection {
                title: None,
                footer: None,
                elements: vec![
                    DialogElement::Label(LabelElement {
                        header: ElementHeader::default(),
                        attribute: None,
                    }),
                    DialogElement::Switch(SwitchElement {
                        header: ElementHeader::default(),
                        attribute: "seen".to_string(),
                        default: None,
                    }),
                ],
            }],
        };
        assert_eq!(dialog.bound_attribute_names(), vec!["seen"]);
        assert!(dialog.binds("seen"));
        assert!(!dialog.binds("Seen"));
    }
}
