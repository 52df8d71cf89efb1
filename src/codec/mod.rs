//! Type codec
//!
//! Two independent byte representations for typed relational values:
//!
//! - `opaque`: the stored-payload form. Exact inverse contract:
//!   `deserialize(serialize(v), tag(v)) == v`. Null and the empty byte
//!   sequence are equivalent.
//! - `ordered`: the scan-boundary form. Byte-lexicographic order matches
//!   relational order per type. Used only to build key ranges and row keys,
//!   never as a stored payload.

mod errors;
mod opaque;
mod ordered;

pub use errors::{CodecError, CodecResult};
pub use opaque::{deserialize, serialize};
pub use ordered::{decode_key, encode_key, following_row};
