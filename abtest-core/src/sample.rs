use serde::{Deserialize, Serialize};

use crate::error::{AbTestError, Result};

/// An immutable sequence of binary outcomes, one per experiment subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    values: Vec<bool>,
}

impl Sample {
    /// Build a sample from already-binary outcomes.
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Build a sample from raw 0/1 integers.
    ///
    /// Any value other than 0 or 1 is rejected; nothing is coerced.
    pub fn from_outcomes<I>(outcomes: I) -> Result<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let values = outcomes
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(AbTestError::Validation {
                    row: i + 1,
                    message: format!("outcome must be 0 or 1, got {}", other),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Number of outcomes equal to 1.
    pub fn successes(&self) -> usize {
        self.values.iter().filter(|&&v| v).count()
    }

    /// Fraction of outcomes equal to 1, or `None` for an empty sample.
    pub fn conversion_rate(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.successes() as f64 / self.values.len() as f64)
        }
    }
}
