//! # Wire Buffer
//!
//! Purpose: Build RESP2 wire images into a reusable byte buffer with a
//! scratch area for numeric formatting.
//!
//! ## Design Principles
//! 1. **Buffer Reuse**: `reset` keeps capacity; steady-state appends do
//!    not allocate.
//! 2. **Bulk Strings Everywhere**: Command arguments always encode as
//!    bulk strings regardless of their in-memory type; the server never
//!    sees RESP integers in argument positions.

use crate::arg::Arg;
use crate::codec;

/// Append-only RESP2 frame builder.
///
/// At any reset point `bytes` is either empty or a concatenation of
/// complete frames. `scratch` is reused for numeric formatting and is
/// opaque to callers.
#[derive(Debug, Default)]
pub struct Buffer {
    bytes: Vec<u8>,
    scratch: Vec<u8>,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Truncates the wire image, keeping capacity.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    /// Returns the wire image built so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the size of the wire image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn simple_string(&mut self, s: &str) {
        codec::append_simple_string(&mut self.bytes, s);
    }

    pub fn error(&mut self, message: &str) {
        codec::append_error(&mut self.bytes, message);
    }

    pub fn int(&mut self, n: i64) {
        codec::append_int(&mut self.bytes, n);
    }

    /// Appends an array header (`*len\r\n`).
    pub fn array(&mut self, len: usize) {
        codec::append_array(&mut self.bytes, len);
    }

    pub fn null_array(&mut self) {
        codec::append_null_array(&mut self.bytes);
    }

    pub fn null_bulk_string(&mut self) {
        codec::append_null_bulk_string(&mut self.bytes);
    }

    pub fn bulk_string(&mut self, s: &str) {
        codec::append_bulk_string(&mut self.bytes, s);
    }

    pub fn bulk_string_raw(&mut self, raw: &[u8]) {
        codec::append_bulk_string_raw(&mut self.bytes, raw);
    }

    /// Appends an array of bulk strings.
    pub fn bulk_strings(&mut self, values: &[&str]) {
        codec::append_bulk_string_array(&mut self.bytes, values);
    }

    /// Appends an array of integer frames.
    pub fn ints(&mut self, values: &[i64]) {
        codec::append_int_array(&mut self.bytes, values);
    }

    /// Appends one argument as a bulk string.
    ///
    /// Numbers are formatted into the scratch area, which is cleared on
    /// every use so each argument is a self-contained frame.
    pub fn arg(&mut self, a: Arg<'_>) {
        match a {
            Arg::Key(s) | Arg::String(s) => codec::append_bulk_string(&mut self.bytes, s),
            Arg::Raw(raw) => codec::append_bulk_string_raw(&mut self.bytes, raw),
            Arg::Int(n) => {
                self.scratch.clear();
                codec::push_decimal(&mut self.scratch, n);
                codec::append_bulk_string_raw(&mut self.bytes, &self.scratch);
            }
            Arg::Uint(n) => {
                self.scratch.clear();
                codec::push_decimal_unsigned(&mut self.scratch, n);
                codec::append_bulk_string_raw(&mut self.bytes, &self.scratch);
            }
            Arg::Float(f) => {
                self.scratch.clear();
                if f.is_finite() {
                    let mut fmt = ryu::Buffer::new();
                    self.scratch.extend_from_slice(fmt.format_finite(f).as_bytes());
                } else if f.is_nan() {
                    self.scratch.extend_from_slice(b"nan");
                } else if f.is_sign_positive() {
                    self.scratch.extend_from_slice(b"inf");
                } else {
                    self.scratch.extend_from_slice(b"-inf");
                }
                codec::append_bulk_string_raw(&mut self.bytes, &self.scratch);
            }
            Arg::Bool(true) => codec::append_bulk_string(&mut self.bytes, "true"),
            Arg::Bool(false) => codec::append_bulk_string(&mut self.bytes, "false"),
            Arg::Null => codec::append_null_bulk_string(&mut self.bytes),
        }
    }

    /// Appends a sequence of arguments.
    pub fn args(&mut self, args: &[Arg<'_>]) {
        for &a in args {
            self.arg(a);
        }
    }

    /// Appends an array frame containing the given arguments.
    pub fn args_array(&mut self, args: &[Arg<'_>]) {
        self.array(args.len());
        self.args(args);
    }
}
