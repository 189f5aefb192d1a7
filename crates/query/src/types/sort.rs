//! Sort specifications.
//!
//! A [`SortSpec`] is an ordered list of `(field, direction)` pairs.
//! Before planning, the identifier field is appended as a final
//! ascending tiebreaker unless it already appears, which guarantees a
//! strict total order over any result set.

use serde::{Deserialize, Serialize};

/// Sort direction for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order; null and missing values sort last.
    #[default]
    Asc,
    /// Descending order; null and missing values sort first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// A single sort entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// The document field path to sort on.
    pub field: String,
    /// The direction to sort in.
    pub direction: SortDirection,
}

impl SortField {
    /// Creates a sort entry.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Creates an ascending sort entry.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Creates a descending sort entry.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// An ordered sequence of sort entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    /// Creates an empty spec. Planning an empty spec yields the
    /// identifier-ascending default sort.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sort entry.
    pub fn push(&mut self, field: SortField) {
        self.fields.push(field);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, field: SortField) -> Self {
        self.push(field);
        self
    }

    /// The sort entries in order.
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Returns true if no sort entries were supplied.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends `id_field` ascending unless it is already present.
    ///
    /// The returned spec always ends in a field that is unique per
    /// record, so two records never compare equal under it.
    pub fn with_tiebreaker(mut self, id_field: &str) -> Self {
        if !self.fields.iter().any(|f| f.field == id_field) {
            self.fields.push(SortField::asc(id_field));
        }
        self
    }
}

impl FromIterator<SortField> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
