use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Ordered set of group names. Names are case-sensitive and unique; the
/// first group is the default target for new tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Groups {
    names: IndexSet<String>,
}

// IndexSet equality ignores order; group order is meaningful here.
impl PartialEq for Groups {
    fn eq(&self, other: &Self) -> bool {
        self.names.iter().eq(other.names.iter())
    }
}

impl Eq for Groups {}

impl Groups {
    pub fn new() -> Self {
        Groups::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.names.first().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    /// Append a name. Returns false if it was already present.
    pub fn push(&mut self, name: String) -> bool {
        self.names.insert(name)
    }

    /// Replace `old` with `new` in place, keeping its position.
    /// Returns false if `old` is absent or `new` is already taken.
    pub fn replace(&mut self, old: &str, new: String) -> bool {
        if self.names.contains(new.as_str()) {
            return false;
        }
        let Some(idx) = self.names.get_index_of(old) else {
            return false;
        };
        self.names.shift_remove_index(idx);
        self.names.shift_insert(idx, new);
        true
    }

    /// Remove a name, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }
}

impl<S: Into<String>> FromIterator<S> for Groups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Groups {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
