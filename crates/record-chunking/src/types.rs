//! Core types for record chunking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkingError, Result};

/// An ordered block of records indexed by monotonic time.
///
/// Every data variable holds one value per record, aligned with `time`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Record times in UTC epoch seconds.
    time: Vec<f64>,
    /// Data variables keyed by name.
    #[serde(default)]
    variables: BTreeMap<String, Vec<f64>>,
    /// Free-form attributes carried alongside the data.
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl TimeBlock {
    /// Create a block with only a time coordinate.
    pub fn new(time: Vec<f64>) -> Self {
        Self {
            time,
            variables: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add a data variable, consuming the block.
    pub fn with_variable(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.insert_variable(name, values)?;
        Ok(self)
    }

    /// Add an attribute, consuming the block.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a data variable.
    pub fn insert_variable(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.time.len() {
            return Err(ChunkingError::VariableLength {
                name,
                expected: self.time.len(),
                actual: values.len(),
            });
        }
        self.variables.insert(name, values);
        Ok(())
    }

    /// Check that every variable is aligned with the time coordinate.
    ///
    /// Deserialized blocks bypass `insert_variable`, so callers reading
    /// untrusted input run this first.
    pub fn validate(&self) -> Result<()> {
        for (name, values) in &self.variables {
            if values.len() != self.time.len() {
                return Err(ChunkingError::VariableLength {
                    name: name.clone(),
                    expected: self.time.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Number of records (time length).
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when the block holds no records.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// The time coordinate.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Values of a data variable.
    pub fn variable(&self, name: &str) -> Option<&[f64]> {
        self.variables.get(name).map(Vec::as_slice)
    }

    /// Names of the data variables, sorted.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Attributes of the block.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// First record time.
    pub fn first_time(&self) -> Option<f64> {
        self.time.first().copied()
    }

    /// Last record time.
    pub fn last_time(&self) -> Option<f64> {
        self.time.last().copied()
    }

    /// Minimum record time.
    ///
    /// Equal to `first_time` for monotonic blocks but does not rely on it.
    pub fn min_time(&self) -> Option<f64> {
        self.time
            .iter()
            .copied()
            .filter(|t| !t.is_nan())
            .fold(None, |min: Option<f64>, t| Some(min.map_or(t, |m| m.min(t))))
    }

    /// Copy out the records in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeBlock> {
        if start > end || end > self.len() {
            return Err(ChunkingError::SliceOutOfBounds {
                start,
                end,
                len: self.len(),
            });
        }

        Ok(TimeBlock {
            time: self.time[start..end].to_vec(),
            variables: self
                .variables
                .iter()
                .map(|(name, values)| (name.clone(), values[start..end].to_vec()))
                .collect(),
            attributes: self.attributes.clone(),
        })
    }

    /// Concatenate blocks along time, in the given order.
    ///
    /// All blocks must carry the same set of variables. Attributes are taken
    /// from the first block.
    pub fn concat<'a, I>(blocks: I) -> Result<TimeBlock>
    where
        I: IntoIterator<Item = &'a TimeBlock>,
    {
        let mut iter = blocks.into_iter();
        let Some(first) = iter.next() else {
            return Ok(TimeBlock::default());
        };

        let mut merged = first.clone();
        for block in iter {
            if !merged.variables.keys().eq(block.variables.keys()) {
                return Err(ChunkingError::incompatible(format!(
                    "variables {:?} do not match {:?}",
                    block.variables.keys().collect::<Vec<_>>(),
                    merged.variables.keys().collect::<Vec<_>>()
                )));
            }

            merged.time.extend_from_slice(&block.time);
            for (name, values) in merged.variables.iter_mut() {
                if let Some(other) = block.variables.get(name) {
                    values.extend_from_slice(other);
                }
            }
        }

        Ok(merged)
    }
}

/// True when the optional block exists and holds at least one record.
///
/// Readers hand back `None` for files with no records of the requested kind.
pub fn has_records(block: Option<&TimeBlock>) -> bool {
    block.is_some_and(|b| !b.is_empty())
}
