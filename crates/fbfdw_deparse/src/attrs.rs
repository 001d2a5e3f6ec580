use std::collections::BTreeSet;

use crate::{AttrNumber, ROW_IDENTITY_ATTNUM, WHOLE_ROW_ATTNUM};

/// Attribute numbers referenced by a query.
///
/// Besides user columns the set may hold [`WHOLE_ROW_ATTNUM`], meaning every
/// column is wanted, and [`ROW_IDENTITY_ATTNUM`], requesting the remote row
/// identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    attrs: BTreeSet<AttrNumber>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set requesting the whole row.
    pub fn whole_row() -> Self {
        let mut set = Self::new();
        set.insert(WHOLE_ROW_ATTNUM);
        set
    }

    pub fn with_row_identity(mut self) -> Self {
        self.insert(ROW_IDENTITY_ATTNUM);
        self
    }

    /// Returns true if the attribute was not yet present.
    pub fn insert(&mut self, attnum: AttrNumber) -> bool {
        self.attrs.insert(attnum)
    }

    pub fn contains(&self, attnum: AttrNumber) -> bool {
        self.attrs.contains(&attnum)
    }

    pub fn has_whole_row(&self) -> bool {
        self.contains(WHOLE_ROW_ATTNUM)
    }

    pub fn has_row_identity(&self) -> bool {
        self.contains(ROW_IDENTITY_ATTNUM)
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Attribute numbers in ascending order, sentinels included.
    pub fn iter(&self) -> impl Iterator<Item = AttrNumber> + '_ {
        self.attrs.iter().copied()
    }
}

impl FromIterator<AttrNumber> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = AttrNumber>>(iter: T) -> Self {
        AttributeSet {
            attrs: iter.into_iter().collect(),
        }
    }
}

impl Extend<AttrNumber> for AttributeSet {
    fn extend<T: IntoIterator<Item = AttrNumber>>(&mut self, iter: T) {
        self.attrs.extend(iter)
    }
}
