//! Run-local binding sets.
//!
//! A [`Bindings`] value accumulates the name-to-text pairs a pipeline run
//! renders its templates against: the caller-supplied initial input plus the
//! output of every completed stage, keyed by stage id. Each run owns its own
//! binding set; nothing is shared across concurrent runs.

use crate::errors::ValidationError;
use std::collections::HashMap;

/// An accumulating name-to-text binding set for a single pipeline run.
///
/// Bindings are write-once: inserting a name that already exists is a
/// validation error, never an overwrite.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<String, String>,
}

impl Bindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a binding set from name/value pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Gets the value bound to a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Checks whether a name is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Binds a value to a name.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is already bound.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(ValidationError::new(format!(
                "binding '{name}' already exists"
            )));
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no names are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns all bound names.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

impl From<HashMap<String, String>> for Bindings {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}
