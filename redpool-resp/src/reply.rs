//! # Reply Arena
//!
//! Purpose: Parse one or more RESP2 replies into a reusable arena of
//! nodes forming a value tree, with zero allocations in steady state.
//!
//! ## Design Principles
//! 1. **Arena + Index**: Nodes reference children by index, never by
//!    pointer; cycles are impossible and `reset` is O(1).
//! 2. **Node Recycling**: The node vector and every node's child list
//!    keep their capacity across resets.
//! 3. **Shared Payload Buffer**: All scalar payloads live in one byte
//!    buffer addressed by `start..end` ranges.

use std::io::BufRead;

use crate::codec::{self, ARRAY, BULK_STRING, ERROR, INTEGER, SIMPLE_STRING};
use crate::error::{ProtocolError, RespError, ServerError};

/// One parsed frame.
///
/// `num` holds the integer payload for `:` frames and the declared size
/// for `$`/`*` frames (-1 denotes RESP null). `start..end` addresses the
/// payload of string-like frames inside the reply's shared buffer.
#[derive(Debug, Default, Clone)]
struct Node {
    typ: u8,
    num: i64,
    start: usize,
    end: usize,
    arr: Vec<usize>,
}

/// A reusable arena holding the value tree of one or more replies.
#[derive(Debug, Default)]
pub struct Reply {
    values: Vec<Node>,
    buffer: Vec<u8>,
    n: usize,
}

impl Reply {
    pub fn new() -> Self {
        Reply::default()
    }

    /// Recycles the arena. Invalidates any `Value` pointing into it.
    pub fn reset(&mut self) {
        self.n = 0;
        self.buffer.clear();
    }

    /// Returns the root value, or the null handle when nothing was read.
    pub fn value(&self) -> Value<'_> {
        if self.n == 0 {
            return Value::null();
        }
        Value {
            id: 0,
            reply: Some(self),
        }
    }

    /// Reads exactly one reply, returning its root value.
    pub fn read_from<R: BufRead>(&mut self, r: &mut R) -> Result<Value<'_>, RespError> {
        let id = self.n as isize;
        self.read_value(r)?;
        Ok(Value {
            id,
            reply: Some(self),
        })
    }

    /// Reads exactly `n` top-level replies under a synthetic array root,
    /// so pipeline results are indexable as `root.get(i)`.
    pub fn read_from_n<R: BufRead>(&mut self, r: &mut R, n: usize) -> Result<Value<'_>, RespError> {
        let id = self.n as isize;
        self.read_array(r, n as i64)?;
        Ok(Value {
            id,
            reply: Some(self),
        })
    }

    /// Claims the next node slot, growing the arena geometrically.
    fn next_id(&mut self) -> usize {
        if self.n == self.values.len() {
            let grown = 2 * self.values.len() + 1;
            self.values.resize_with(grown, Node::default);
        }
        let id = self.n;
        self.n += 1;
        id
    }

    fn read_value<R: BufRead>(&mut self, r: &mut R) -> Result<(), RespError> {
        let mut tag = [0u8; 1];
        r.read_exact(&mut tag)?;
        match tag[0] {
            SIMPLE_STRING | ERROR => {
                let start = self.buffer.len();
                codec::read_line(r, &mut self.buffer)?;
                let end = self.buffer.len();
                let id = self.next_id();
                let node = &mut self.values[id];
                node.typ = tag[0];
                node.num = 0;
                node.start = start;
                node.end = end;
                node.arr.clear();
                Ok(())
            }
            INTEGER => {
                let num = codec::read_int(r)?;
                let id = self.next_id();
                let node = &mut self.values[id];
                node.typ = INTEGER;
                node.num = num;
                node.start = 0;
                node.end = 0;
                node.arr.clear();
                Ok(())
            }
            BULK_STRING => {
                let size = codec::read_int(r)?;
                let start = self.buffer.len();
                codec::read_bulk_string(&mut self.buffer, size, r)?;
                let end = self.buffer.len();
                let id = self.next_id();
                let node = &mut self.values[id];
                node.typ = BULK_STRING;
                node.num = size;
                node.start = start;
                node.end = end;
                node.arr.clear();
                Ok(())
            }
            ARRAY => {
                let size = codec::read_int(r)?;
                self.read_array(r, size)
            }
            tag => Err(ProtocolError::InvalidType(tag).into()),
        }
    }

    fn read_array<R: BufRead>(&mut self, r: &mut R, size: i64) -> Result<(), RespError> {
        if size < -1 {
            return Err(ProtocolError::InvalidArraySize.into());
        }
        let id = self.next_id();
        // Take the node out of the arena so child reads that grow the
        // vector cannot invalidate it; store it back when done.
        let mut node = std::mem::take(&mut self.values[id]);
        node.typ = ARRAY;
        node.num = size;
        node.start = 0;
        node.end = 0;
        node.arr.clear();
        let mut outcome = Ok(());
        let mut remaining = size;
        while remaining > 0 {
            node.arr.push(self.n);
            if let Err(err) = self.read_value(r) {
                outcome = Err(err);
                break;
            }
            remaining -= 1;
        }
        self.values[id] = node;
        outcome
    }

    fn node(&self, id: isize) -> Option<&Node> {
        if id >= 0 && (id as usize) < self.n {
            Some(&self.values[id as usize])
        } else {
            None
        }
    }
}

/// A lightweight handle into a reply's value tree.
///
/// Handles are cheap to copy and resolve against the arena on every
/// access; `Value::null()` is the distinguished null handle.
#[derive(Debug, Clone, Copy)]
pub struct Value<'a> {
    id: isize,
    reply: Option<&'a Reply>,
}

impl<'a> Value<'a> {
    /// Returns the distinguished null handle.
    pub fn null() -> Value<'static> {
        Value {
            id: -1,
            reply: None,
        }
    }

    fn node(&self) -> Option<&'a Node> {
        self.reply?.node(self.id)
    }

    /// Returns the frame type tag, or 0 for the null handle.
    pub fn typ(&self) -> u8 {
        self.node().map(|node| node.typ).unwrap_or(0)
    }

    /// True for the null handle and for RESP null bulk strings/arrays.
    pub fn is_null(&self) -> bool {
        match self.node() {
            Some(node) => node.num == -1 && (node.typ == BULK_STRING || node.typ == ARRAY),
            None => self.id == -1,
        }
    }

    /// Returns the payload of a simple or bulk string frame.
    pub fn bytes(&self) -> Option<&'a [u8]> {
        let reply = self.reply?;
        let node = reply.node(self.id)?;
        if node.typ == SIMPLE_STRING || node.typ == BULK_STRING {
            reply.buffer.get(node.start..node.end)
        } else {
            None
        }
    }

    /// Returns the integer payload of `:` frames, or parses the payload
    /// of string-like frames as decimal.
    pub fn int(&self) -> Option<i64> {
        let node = self.node()?;
        match node.typ {
            INTEGER => Some(node.num),
            SIMPLE_STRING | BULK_STRING => btoi(self.bytes()?),
            _ => None,
        }
    }

    /// Returns the server error carried by a `-` frame.
    pub fn err(&self) -> Option<ServerError> {
        let bytes = {
            let reply = self.reply?;
            let node = reply.node(self.id)?;
            if node.typ != ERROR {
                return None;
            }
            reply.buffer.get(node.start..node.end)?
        };
        Some(ServerError(String::from_utf8_lossy(bytes).into_owned()))
    }

    /// Returns the element count of an array frame; 0 for other types.
    pub fn len(&self) -> usize {
        self.node().map(|node| node.arr.len()).unwrap_or(0)
    }

    /// Resolves the i-th element of an array frame.
    pub fn get(&self, i: usize) -> Value<'a> {
        if let Some(node) = self.node() {
            if node.typ == ARRAY {
                if let Some(&child) = node.arr.get(i) {
                    return Value {
                        id: child as isize,
                        reply: self.reply,
                    };
                }
            }
        }
        Value::null()
    }

    /// Calls `f` for each element of an array frame.
    pub fn for_each<F: FnMut(Value<'a>)>(&self, mut f: F) {
        if let Some(node) = self.node() {
            if node.typ == ARRAY {
                for &child in &node.arr {
                    f(Value {
                        id: child as isize,
                        reply: self.reply,
                    });
                }
            }
        }
    }

    /// Calls `f` for each `(key, value)` pair of an array frame.
    ///
    /// An odd trailing element is paired with the null handle.
    pub fn for_each_kv<F: FnMut(&'a [u8], Value<'a>)>(&self, mut f: F) {
        let node = match self.node() {
            Some(node) if node.typ == ARRAY => node,
            _ => return,
        };
        let mut key: Option<Value<'a>> = None;
        for &child in &node.arr {
            let value = Value {
                id: child as isize,
                reply: self.reply,
            };
            match key.take() {
                None => key = Some(value),
                Some(k) => f(k.bytes().unwrap_or_default(), value),
            }
        }
        if let Some(k) = key {
            f(k.bytes().unwrap_or_default(), Value::null());
        }
    }
}

fn btoi(buf: &[u8]) -> Option<i64> {
    let (negative, digits) = match buf.first() {
        Some(b'-') => (true, &buf[1..]),
        _ => (false, buf),
    };
    let mut n: i64 = 0;
    for &c in digits {
        if !c.is_ascii_digit() {
            return None;
        }
        n = n.wrapping_mul(10).wrapping_add((c - b'0') as i64);
    }
    Some(if negative { -n } else { n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    #[test]
    fn reads_each_scalar_type() {
        let mut reply = Reply::new();

        let mut r: &[u8] = b"+OK\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.typ(), SIMPLE_STRING);
        assert_eq!(v.bytes(), Some(&b"OK"[..]));
        assert_eq!(v.int(), None);

        reply.reset();
        let mut r: &[u8] = b":-42\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.typ(), INTEGER);
        assert_eq!(v.int(), Some(-42));
        assert_eq!(v.bytes(), None);

        reply.reset();
        let mut r: &[u8] = b"$5\r\nhello\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.typ(), BULK_STRING);
        assert_eq!(v.bytes(), Some(&b"hello"[..]));

        reply.reset();
        let mut r: &[u8] = b"-ERR bad\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.typ(), ERROR);
        let err = v.err().expect("error value");
        assert_eq!(err.message(), "ERR bad");
    }

    #[test]
    fn parses_integers_out_of_strings() {
        let mut reply = Reply::new();
        let mut r: &[u8] = b"$2\r\n42\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.int(), Some(42));

        reply.reset();
        let mut r: &[u8] = b"$3\r\nx42\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.int(), None);
    }

    #[test]
    fn null_frames() {
        let mut reply = Reply::new();
        let mut r: &[u8] = b"$-1\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert!(v.is_null());

        reply.reset();
        let mut r: &[u8] = b"*-1\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert!(v.is_null());
        assert_eq!(v.len(), 0);

        assert!(Value::null().is_null());
        assert_eq!(Value::null().typ(), 0);
    }

    #[test]
    fn reads_nested_arrays() {
        let mut reply = Reply::new();
        let mut r: &[u8] = b"*3\r\n$3\r\nfoo\r\n*2\r\n:1\r\n:2\r\n+OK\r\n";
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.typ(), ARRAY);
        assert_eq!(v.len(), 3);
        assert_eq!(v.get(0).bytes(), Some(&b"foo"[..]));
        assert_eq!(v.get(1).len(), 2);
        assert_eq!(v.get(1).get(0).int(), Some(1));
        assert_eq!(v.get(1).get(1).int(), Some(2));
        assert_eq!(v.get(2).bytes(), Some(&b"OK"[..]));
        assert!(v.get(3).is_null());
    }

    #[test]
    fn reads_n_pipelined_replies() {
        let mut reply = Reply::new();
        let mut r: &[u8] = b"+OK\r\n+OK\r\n*1\r\n$3\r\nfoo\r\n+OK\r\n";
        let root = reply.read_from_n(&mut r, 4).unwrap();
        assert_eq!(root.typ(), ARRAY);
        assert_eq!(root.len(), 4);
        assert_eq!(root.get(0).typ(), SIMPLE_STRING);
        assert_eq!(root.get(1).typ(), SIMPLE_STRING);
        assert_eq!(root.get(2).typ(), ARRAY);
        assert_eq!(root.get(3).typ(), SIMPLE_STRING);
        assert_eq!(root.get(2).get(0).bytes(), Some(&b"foo"[..]));
    }

    #[test]
    fn read_from_n_zero_yields_an_empty_root() {
        let mut reply = Reply::new();
        let mut r: &[u8] = b"";
        let root = reply.read_from_n(&mut r, 0).unwrap();
        assert_eq!(root.typ(), ARRAY);
        assert_eq!(root.len(), 0);
    }

    #[test]
    fn reset_then_reread_yields_the_same_tree() {
        let mut reply = Reply::new();
        let frame = b"*2\r\n$3\r\nfoo\r\n:7\r\n";
        for _ in 0..3 {
            reply.reset();
            let mut r: &[u8] = frame;
            let v = reply.read_from(&mut r).unwrap();
            assert_eq!(v.len(), 2);
            assert_eq!(v.get(0).bytes(), Some(&b"foo"[..]));
            assert_eq!(v.get(1).int(), Some(7));
        }
    }

    #[test]
    fn round_trips_encoded_bulk_strings() {
        let payload = b"\x00binary\xffpayload";
        let mut b = Buffer::new();
        b.bulk_string_raw(payload);
        let mut reply = Reply::new();
        let mut r: &[u8] = b.as_bytes();
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.bytes(), Some(&payload[..]));
    }

    #[test]
    fn iterates_elements_and_pairs() {
        let mut b = Buffer::new();
        b.bulk_strings(&["foo", "bar", "answer", "42"]);
        let mut reply = Reply::new();
        let mut r: &[u8] = b.as_bytes();
        let v = reply.read_from(&mut r).unwrap();

        let mut elements = Vec::new();
        v.for_each(|e| elements.push(e.bytes().unwrap().to_vec()));
        assert_eq!(elements, vec![b"foo".to_vec(), b"bar".to_vec(), b"answer".to_vec(), b"42".to_vec()]);

        let mut pairs = Vec::new();
        v.for_each_kv(|k, e| pairs.push((k.to_vec(), e.bytes().unwrap().to_vec())));
        assert_eq!(
            pairs,
            vec![
                (b"foo".to_vec(), b"bar".to_vec()),
                (b"answer".to_vec(), b"42".to_vec()),
            ]
        );
    }

    #[test]
    fn odd_trailing_element_pairs_with_null() {
        let mut b = Buffer::new();
        b.bulk_strings(&["lonely"]);
        let mut reply = Reply::new();
        let mut r: &[u8] = b.as_bytes();
        let v = reply.read_from(&mut r).unwrap();

        let mut seen = Vec::new();
        v.for_each_kv(|k, e| seen.push((k.to_vec(), e.is_null())));
        assert_eq!(seen, vec![(b"lonely".to_vec(), true)]);
    }

    #[test]
    fn stale_handles_resolve_to_nothing_after_reset() {
        let mut reply = Reply::new();
        let mut r: &[u8] = b"*2\r\n+a\r\n+b\r\n";
        reply.read_from(&mut r).unwrap();
        reply.reset();
        assert!(reply.value().is_null());
    }

    #[test]
    fn rejects_malformed_input() {
        let mut reply = Reply::new();
        let mut r: &[u8] = b"?what\r\n";
        assert!(reply.read_from(&mut r).is_err());

        reply.reset();
        let mut r: &[u8] = b"*2\r\n+ok\r\n";
        assert!(reply.read_from(&mut r).is_err());

        reply.reset();
        let mut r: &[u8] = b"$5\r\nhe";
        assert!(reply.read_from(&mut r).is_err());

        // The arena stays usable after a failed parse.
        reply.reset();
        let mut r: &[u8] = b"+OK\r\n";
        assert_eq!(reply.read_from(&mut r).unwrap().bytes(), Some(&b"OK"[..]));
    }

    #[test]
    fn grows_past_the_initial_arena() {
        let mut b = Buffer::new();
        b.array(40);
        for i in 0..40 {
            b.int(i);
        }
        let mut reply = Reply::new();
        let mut r: &[u8] = b.as_bytes();
        let v = reply.read_from(&mut r).unwrap();
        assert_eq!(v.len(), 40);
        for i in 0..40 {
            assert_eq!(v.get(i).int(), Some(i as i64));
        }
    }
}
