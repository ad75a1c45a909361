//! Command argument values.
//!
//! Arguments carry an encoding hint but all serialize as bulk strings;
//! the `Key` variant is payload-identical to `String` on the wire and
//! only exists so callers can tell keys and plain values apart (the
//! scripting helpers count a leading run of keys to derive `numkeys`).

/// A tagged command argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    /// A string used as a key.
    Key(&'a str),
    /// A plain string value.
    String(&'a str),
    /// A raw byte slice value.
    Raw(&'a [u8]),
    /// A signed integer, emitted as decimal digits.
    Int(i64),
    /// An unsigned integer, emitted as decimal digits.
    Uint(u64),
    /// A float, emitted in shortest round-trip decimal form.
    Float(f64),
    /// A boolean, emitted as `true`/`false`.
    Bool(bool),
    /// The null bulk string.
    Null,
}

impl<'a> Arg<'a> {
    /// Returns true when the argument is key-tagged.
    pub fn is_key(&self) -> bool {
        matches!(self, Arg::Key(_))
    }
}

/// A key/value pair, used by `MSET`/`HMSET`-style commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KV<'a> {
    pub key: &'a str,
    pub arg: Arg<'a>,
}

/// Creates a key/value pair argument.
pub fn pair<'a>(key: &'a str, arg: Arg<'a>) -> KV<'a> {
    KV { key, arg }
}
