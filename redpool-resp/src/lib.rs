//! # redpool RESP2 Codec
//!
//! Purpose: Provide the RESP2 serialization layer for the redpool client:
//! allocation-frugal request framing and in-place reply parsing.
//!
//! ## Design Principles
//! 1. **Buffer Reuse**: Wire images, scratch space, and the reply arena
//!    all keep their capacity across resets.
//! 2. **Arena Values**: Replies parse into index-linked nodes; a `Value`
//!    is a copyable cursor, not an owning tree.
//! 3. **Binary-Safe**: Bulk strings are raw bytes end to end.
//! 4. **Fail Fast**: Malformed framing surfaces as protocol errors
//!    immediately.

mod arg;
mod buffer;
pub mod codec;
mod error;
mod reply;

pub use arg::{pair, Arg, KV};
pub use buffer::Buffer;
pub use codec::{discard, discard_n, ARRAY, BULK_STRING, ERROR, INTEGER, SIMPLE_STRING};
pub use error::{ProtocolError, RespError, ServerError};
pub use reply::{Reply, Value};
