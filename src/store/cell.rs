//! Cells and mutations
//!
//! The store's native result unit is a cell; rows are runs of contiguous
//! cells sharing a row key (rows sorted by key, cells within a row sorted
//! by family then qualifier). Mutations are keyed by a derived row
//! identifier and live for a single batch-writer flush.

/// One scanned cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Byte-ordered row key
    pub row: Vec<u8>,
    /// Column family
    pub family: String,
    /// Qualifier bytes; may carry an encoded value for QUALIFIER-slot
    /// columns
    pub qualifier: Vec<u8>,
    /// Opaque payload bytes
    pub value: Vec<u8>,
    /// Store-assigned write timestamp
    pub timestamp: i64,
}

impl Cell {
    /// Creates a cell with an unset timestamp.
    pub fn new(
        row: impl Into<Vec<u8>>,
        family: impl Into<String>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
            timestamp: 0,
        }
    }
}

/// One (family, qualifier, value) put within a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutCell {
    pub family: String,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
}

/// What a mutation does to its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Write the given cells
    Put(Vec<PutCell>),
    /// Remove every cell belonging to the row
    DeleteRow,
}

/// A mutation against a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// Derived row identifier
    pub row: Vec<u8>,
    pub kind: MutationKind,
}

impl Mutation {
    /// A put mutation writing `cells` under `row`.
    pub fn put(row: impl Into<Vec<u8>>, cells: Vec<PutCell>) -> Self {
        Self {
            row: row.into(),
            kind: MutationKind::Put(cells),
        }
    }

    /// A row-level delete marker.
    pub fn delete_row(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            kind: MutationKind::DeleteRow,
        }
    }
}
