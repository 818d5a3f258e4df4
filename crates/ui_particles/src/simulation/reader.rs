//! Typed readers over attribute columns
//!
//! A reader resolves its column once when a renderer build starts; per
//! particle it either returns the stored value or the caller's fallback.
//! An unbound column is normal (optional attributes), not an error.

use super::attributes::{AttributeColumn, AttributeName, ParticleAttributeSet, ParticleId};
use crate::foundation::math::{Vec2, Vec3, Vec4};
use std::cmp::Ordering;

/// Rust types that can be read from an [`AttributeColumn`]
pub trait AttributeType: Copy {
    /// Borrow the column's rows if it stores this type
    fn slice(column: &AttributeColumn) -> Option<&[Self]>;
}

macro_rules! impl_attribute_type {
    ($ty:ty, $variant:ident) => {
        impl AttributeType for $ty {
            fn slice(column: &AttributeColumn) -> Option<&[Self]> {
                match column {
                    AttributeColumn::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }
        }
    };
}

impl_attribute_type!(f32, Float);
impl_attribute_type!(i32, Int);
impl_attribute_type!(Vec2, Vec2);
impl_attribute_type!(Vec3, Vec3);
impl_attribute_type!(Vec4, Vec4);
impl_attribute_type!(ParticleId, Id);

/// Read access to one attribute column
#[derive(Debug, Clone, Copy)]
pub struct AttributeReader<'a, T: AttributeType> {
    values: Option<&'a [T]>,
}

impl<'a, T: AttributeType> AttributeReader<'a, T> {
    /// Bind to `name` in `set`. A missing column, or one of another type,
    /// yields an unbound reader.
    pub fn new(set: &'a ParticleAttributeSet, name: &AttributeName) -> Self {
        let values = set.column(name).and_then(T::slice);
        if values.is_none() {
            if let Some(column) = set.column(name) {
                log::debug!(
                    "Attribute '{}' is stored as {} and cannot be read as {}",
                    name,
                    column.type_name(),
                    std::any::type_name::<T>()
                );
            }
        }
        Self { values }
    }

    /// A reader that is never bound
    pub const fn unbound() -> Self {
        Self { values: None }
    }

    /// Whether the emitter writes this attribute
    pub const fn is_bound(&self) -> bool {
        self.values.is_some()
    }

    /// The value for `index`, if bound and in range
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.and_then(|values| values.get(index).copied())
    }

    /// The value for `index`, or `fallback`
    pub fn get_or(&self, index: usize, fallback: T) -> T {
        self.get(index).unwrap_or(fallback)
    }
}

impl ParticleAttributeSet {
    /// Typed reader for `name`
    pub fn reader<T: AttributeType>(&self, name: &AttributeName) -> AttributeReader<'_, T> {
        AttributeReader::new(self, name)
    }
}

/// Ribbon link-order key in either of its two stored representations
#[derive(Debug, Clone, Copy)]
pub enum LinkOrderReader<'a> {
    /// Legacy float key, sorted ascending
    Float(&'a [f32]),
    /// Integer key, sorted descending
    Int(&'a [i32]),
}

impl<'a> LinkOrderReader<'a> {
    /// Bind the link-order column; `None` when the emitter does not write it
    pub fn new(set: &'a ParticleAttributeSet, name: &AttributeName) -> Option<Self> {
        match set.column(name)? {
            AttributeColumn::Float(values) => Some(Self::Float(values)),
            AttributeColumn::Int(values) => Some(Self::Int(values)),
            other => {
                log::debug!("Link order attribute '{}' has unsupported type {}", name, other.type_name());
                None
            }
        }
    }

    /// Ordering of particle `a` relative to `b` along the ribbon.
    ///
    /// Float keys run ascending, integer keys descending.
    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        match self {
            Self::Float(keys) => {
                let key_a = keys.get(a).copied().unwrap_or(0.0);
                let key_b = keys.get(b).copied().unwrap_or(0.0);
                key_a.total_cmp(&key_b)
            }
            Self::Int(keys) => {
                let key_a = keys.get(a).copied().unwrap_or(0);
                let key_b = keys.get(b).copied().unwrap_or(0);
                key_b.cmp(&key_a)
            }
        }
    }

    /// Stable-sort particle indices into ribbon order
    pub fn sort(&self, indices: &mut [usize]) {
        indices.sort_by(|&a, &b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> ParticleAttributeSet {
        ParticleAttributeSet::new(3)
            .with_column(
                AttributeName::POSITION,
                AttributeColumn::Vec3(vec![Vec3::new(1.0, 2.0, 3.0), Vec3::zeros(), Vec3::x()]),
            )
            .with_column(AttributeName::RIBBON_LINK_ORDER, AttributeColumn::Float(vec![0.5, 0.1, 0.5]))
            .with_column(AttributeName::new("Age"), AttributeColumn::Int(vec![3, 7, 5]))
    }

    #[test]
    fn test_bound_reader_returns_values() {
        let set = sample_set();
        let positions = set.reader::<Vec3>(&AttributeName::POSITION);
        assert!(positions.is_bound());
        assert_eq!(positions.get_or(0, Vec3::zeros()), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_missing_column_uses_fallback() {
        let set = sample_set();
        let colors = set.reader::<Vec4>(&AttributeName::COLOR);
        assert!(!colors.is_bound());
        assert_eq!(colors.get_or(1, Vec4::new(1.0, 1.0, 1.0, 1.0)), Vec4::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_type_mismatch_is_unbound() {
        let set = sample_set();
        let wrong = set.reader::<Vec2>(&AttributeName::POSITION);
        assert!(!wrong.is_bound());
        assert_eq!(wrong.get(0), None);
    }

    #[test]
    fn test_out_of_range_index_uses_fallback() {
        let set = sample_set();
        let positions = set.reader::<Vec3>(&AttributeName::POSITION);
        assert_eq!(positions.get_or(10, Vec3::y()), Vec3::y());
    }

    #[test]
    fn test_float_link_order_sorts_ascending_and_stable() {
        let set = sample_set();
        let order = LinkOrderReader::new(&set, &AttributeName::RIBBON_LINK_ORDER).expect("bound");
        let mut indices = vec![0, 1, 2];
        order.sort(&mut indices);
        assert_eq!(indices, vec![1, 0, 2]);
    }

    #[test]
    fn test_int_link_order_sorts_descending() {
        let set = sample_set();
        let order = LinkOrderReader::new(&set, &AttributeName::new("Age")).expect("bound");
        let mut indices = vec![0, 1, 2];
        order.sort(&mut indices);
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_link_order_rejects_vector_columns() {
        let set = sample_set();
        assert!(LinkOrderReader::new(&set, &AttributeName::POSITION).is_none());
    }
}
