// In: src/archive.rs

//! An ordered, name-unique collection of tensors.
//!
//! Insertion order is preserved and determines the on-disk layout order for
//! both metadata records and data blocks, so the backing store is an ordered
//! `Vec` with a `hashbrown` index for name lookups.

use crate::tensor::Tensor;
use hashbrown::HashMap;

/// A named tensor collection that encodes/decodes as one unit.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<(String, Tensor)>,
    index: HashMap<String, usize>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tensor under `name`.
    ///
    /// Re-insertion under an existing name overwrites the entry in place,
    /// keeping its original position in the layout order.
    pub fn insert(&mut self, name: impl Into<String>, tensor: Tensor) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = tensor,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, tensor));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion (= layout) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Entry names in insertion (= layout) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// Equality compares both contents and order; two archives with the same
/// entries in a different order are different archives on the wire.
impl PartialEq for Archive {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(String, Tensor)> for Archive {
    fn from_iter<I: IntoIterator<Item = (String, Tensor)>>(iter: I) -> Self {
        let mut archive = Archive::new();
        for (name, tensor) in iter {
            archive.insert(name, tensor);
        }
        archive
    }
}
