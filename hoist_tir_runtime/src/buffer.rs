//! Named integer buffers
//!
//! Every buffer a function touches is a flat `Vec<i64>`. Reads and writes
//! are bounds checked and report the offending buffer by name.

use crate::error::{RuntimeError, RuntimeResult};
use std::collections::BTreeMap;

/// Named, bounds-checked integer storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffers {
    data: BTreeMap<String, Vec<i64>>,
}

impl Buffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zero-filled buffer of `len` elements, replacing any existing one
    pub fn allocate(&mut self, name: impl Into<String>, len: usize) {
        self.data.insert(name.into(), vec![0; len]);
    }

    /// Builder form of [`Buffers::allocate`]
    pub fn with_buffer(mut self, name: impl Into<String>, len: usize) -> Self {
        self.allocate(name, len);
        self
    }

    /// Add a buffer with the given contents
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<i64>) {
        self.data.insert(name.into(), values);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[i64]> {
        self.data.get(name).map(Vec::as_slice)
    }

    /// Read `name[index]`
    pub fn load(&self, name: &str, index: i64) -> RuntimeResult<i64> {
        let values = self
            .data
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownBuffer(name.to_string()))?;
        let slot = checked_slot(name, index, values.len())?;
        Ok(values[slot])
    }

    /// Write `name[index] = value`
    pub fn store(&mut self, name: &str, index: i64, value: i64) -> RuntimeResult<()> {
        let values = self
            .data
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UnknownBuffer(name.to_string()))?;
        let slot = checked_slot(name, index, values.len())?;
        values[slot] = value;
        Ok(())
    }

    /// Sum of all elements of `name`, `None` if absent or on overflow
    pub fn sum(&self, name: &str) -> Option<i64> {
        self.get(name)?.iter().try_fold(0i64, |acc, v| acc.checked_add(*v))
    }
}

fn checked_slot(name: &str, index: i64, length: usize) -> RuntimeResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|slot| *slot < length)
        .ok_or_else(|| RuntimeError::bounds_error(name, index, length))
}
