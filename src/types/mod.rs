//! Relational value model
//!
//! A closed tagged union of the relational types the translator supports.
//! Every value carries an explicit type tag; codec and predicate evaluation
//! dispatch on the tag, never on runtime inspection.

mod value;

pub use value::{TypeTag, TypedValue};
