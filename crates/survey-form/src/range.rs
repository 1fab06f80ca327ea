//! Inclusive input ranges for number entry and steppers.
//!
//! A declared bound is clamped into the column type. A missing bound is
//! filled from the type's extremes, keeping `max - min` representable: when
//! the span would overflow, the side farther from zero is pulled in.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use survey_model::{ElementKind, StorageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegerRange {
    pub min: i64,
    pub max: i64,
}

impl IntegerRange {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn span(&self) -> i128 {
        i128::from(self.max) - i128::from(self.min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecimalRange {
    pub min: f64,
    pub max: f64,
}

impl DecimalRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Range for an integer-valued element stored as `storage_type`.
pub fn integer_range(min: Option<i64>, max: Option<i64>, storage_type: StorageType) -> IntegerRange {
    let (lo, hi) = storage_type
        .integer_bounds()
        .map(|(lo, hi)| (i128::from(lo), i128::from(hi)))
        .unwrap_or((i128::from(i32::MIN), i128::from(i32::MAX)));
    let clamp = |value: i64| i128::from(value).clamp(lo, hi);

    let (mut min, mut max) = match (min.map(clamp), max.map(clamp)) {
        (None, None) => (lo / 2, hi / 2),
        (Some(min), None) => (min, hi.min(min + hi)),
        (None, Some(max)) => (lo.max(max - hi), max),
        (Some(min), Some(max)) => (min, max.max(min)),
    };
    if max - min > hi {
        if max.abs() >= min.abs() {
            max = min + hi;
        } else {
            min = max - hi;
        }
    }
    // Both ends lie within [lo, hi], which fits in i64.
    IntegerRange {
        min: narrow(min),
        max: narrow(max),
    }
}

fn narrow(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Largest magnitude a decimal-entry element may produce for `storage_type`.
pub fn float_limit(storage_type: StorageType) -> f64 {
    match storage_type {
        StorageType::Decimal => Decimal::MAX.to_f64().unwrap_or(f64::MAX),
        other => other
            .float_limit()
            .or_else(|| other.integer_bounds().map(|(_, hi)| hi as f64))
            .unwrap_or(f64::MAX),
    }
}

/// Range for a decimal-entry element stored as `storage_type`.
pub fn decimal_range(min: Option<f64>, max: Option<f64>, storage_type: StorageType) -> DecimalRange {
    let limit = float_limit(storage_type);
    let clamp = |value: f64| {
        if value.is_nan() {
            None
        } else {
            Some(value.clamp(-limit, limit))
        }
    };

    let (mut min, mut max) = match (min.and_then(clamp), max.and_then(clamp)) {
        (None, None) => (-limit / 2.0, limit / 2.0),
        (Some(min), None) => (min, limit.min(min + limit)),
        (None, Some(max)) => ((-limit).max(max - limit), max),
        (Some(min), Some(max)) => (min, max.max(min)),
    };
    let span = max - min;
    if !span.is_finite() || span > limit {
        if max.abs() >= min.abs() {
            max = min + limit;
        } else {
            min = max - limit;
        }
    }
    DecimalRange { min, max }
}

/// Column type to assume when an element's attribute cannot be found.
pub fn fallback_storage_type(kind: ElementKind) -> StorageType {
    match kind {
        ElementKind::Switch => StorageType::Boolean,
        ElementKind::Decimal => StorageType::Double,
        ElementKind::Entry | ElementKind::Multiline => StorageType::Text,
        // Pickers fall back to index storage.
        ElementKind::Integer
        | ElementKind::Label
        | ElementKind::Radio
        | ElementKind::Segmented => StorageType::Int32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_int16_is_halved() {
        let range = integer_range(None, None, StorageType::Int16);
        assert_eq!(range, IntegerRange { min: -16384, max: 16383 });
    }

    #[test]
    fn only_min_keeps_span_representable() {
        let range = integer_range(Some(-5), None, StorageType::Int16);
        assert_eq!(range, IntegerRange { min: -5, max: 32762 });
        let range = integer_range(Some(100), None, StorageType::Int16);
        assert_eq!(range.max, i64::from(i16::MAX));
    }

    #[test]
    fn only_max_keeps_span_representable() {
        let range = integer_range(None, Some(5), StorageType::Int16);
        assert_eq!(range, IntegerRange { min: -32762, max: 5 });
    }

    #[test]
    fn declared_bounds_clamp_into_type() {
        let range = integer_range(Some(-100_000), Some(10), StorageType::Int16);
        assert_eq!(range.min, -32757);
        assert_eq!(range.max, 10);
        let range = integer_range(Some(1), Some(9), StorageType::Int16);
        assert_eq!(range, IntegerRange { min: 1, max: 9 });
    }

    #[test]
    fn int64_extremes_do_not_overflow() {
        let range = integer_range(Some(i64::MIN), Some(i64::MAX), StorageType::Int64);
        assert!(range.span() <= i128::from(i64::MAX));
        let range = integer_range(Some(i64::MIN), None, StorageType::Int64);
        assert_eq!(range.min, i64::MIN);
        assert_eq!(range.max, -1);
    }

    #[test]
    fn decimal_range_stays_finite() {
        let range = decimal_range(Some(-5.0), None, StorageType::Double);
        assert!(range.min == -5.0 && range.max.is_finite());
        assert!((range.max - range.min).is_finite());
        let range = decimal_range(None, None, StorageType::Float);
        assert_eq!(range.max, f64::from(f32::MAX) / 2.0);
        let range = decimal_range(Some(0.5), Some(2.5), StorageType::Double);
        assert_eq!(range, DecimalRange { min: 0.5, max: 2.5 });
    }

    #[test]
    fn missing_attribute_falls_back_by_kind() {
        assert_eq!(fallback_storage_type(ElementKind::Switch), StorageType::Boolean);
        assert_eq!(fallback_storage_type(ElementKind::Multiline), StorageType::Text);
    }
}
