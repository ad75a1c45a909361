//! # Scan Iterator
//!
//! Purpose: Drive the `SCAN` command family cursor-by-cursor over a
//! connection, yielding elements without re-parsing pages.
//!
//! The iterator owns its reply arena and resolves element handles by
//! index on every call, so no parsed state outlives a page fetch.

use redpool_resp::Value;

use crate::conn::Conn;
use crate::error::{Error, Result};
use crate::freelist::{blank_pipeline, release_pipeline};
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanKind {
    Keys,
    Set,
    Hash,
    SortedSet,
}

/// A cursor state machine over `SCAN`/`SSCAN`/`HSCAN`/`ZSCAN`.
///
/// Terminates when the server returns cursor `0`; a command or transport
/// failure ends iteration and is reported by [`ScanIterator::err`] and
/// [`ScanIterator::finish`].
pub struct ScanIterator {
    kind: ScanKind,
    key: String,
    pattern: Option<String>,
    count: i64,
    cursor: i64,
    reply: redpool_resp::Reply,
    i: usize,
    n: usize,
    started: bool,
    done: bool,
    err: Option<Error>,
}

/// Starts a keyspace scan.
pub fn scan(pattern: Option<&str>, count: i64) -> ScanIterator {
    ScanIterator::new(ScanKind::Keys, "", pattern, count)
}

/// Starts a set member scan.
pub fn sscan(key: &str, pattern: Option<&str>, count: i64) -> ScanIterator {
    ScanIterator::new(ScanKind::Set, key, pattern, count)
}

/// Starts a hash field scan; elements alternate fields and values.
pub fn hscan(key: &str, pattern: Option<&str>, count: i64) -> ScanIterator {
    ScanIterator::new(ScanKind::Hash, key, pattern, count)
}

/// Starts a sorted set scan; elements alternate members and scores.
pub fn zscan(key: &str, pattern: Option<&str>, count: i64) -> ScanIterator {
    ScanIterator::new(ScanKind::SortedSet, key, pattern, count)
}

impl ScanIterator {
    fn new(kind: ScanKind, key: &str, pattern: Option<&str>, count: i64) -> ScanIterator {
        ScanIterator {
            kind,
            key: key.to_string(),
            pattern: pattern.map(str::to_string),
            count,
            cursor: 0,
            reply: redpool_resp::Reply::new(),
            i: 0,
            n: 0,
            started: false,
            done: false,
            err: None,
        }
    }

    /// Yields the next element, fetching the next page when the current
    /// one is exhausted. Returns `None` once the cursor cycles back to 0
    /// or an error ends the iteration.
    pub fn next(&mut self, conn: &mut Conn) -> Option<Value<'_>> {
        loop {
            if self.done {
                return None;
            }
            if self.i < self.n {
                let at = self.i;
                self.i += 1;
                return Some(self.element(at));
            }
            if self.started && self.cursor == 0 {
                self.done = true;
                return None;
            }
            if let Err(err) = self.fetch(conn) {
                self.err = Some(err);
                self.done = true;
                return None;
            }
        }
    }

    /// Runs the whole scan, calling `f` for every result.
    ///
    /// Hash and sorted set scans deliver `(key, value)` pairs; keyspace
    /// and set scans deliver the member with a null value handle.
    pub fn each<F>(&mut self, conn: &mut Conn, mut f: F) -> Result<()>
    where
        F: FnMut(&[u8], Value<'_>) -> Result<()>,
    {
        match self.kind {
            ScanKind::Hash | ScanKind::SortedSet => {
                let mut field: Vec<u8> = Vec::new();
                let mut have_field = false;
                while let Some(v) = self.next(conn) {
                    if have_field {
                        f(&field, v)?;
                        have_field = false;
                    } else {
                        field.clear();
                        field.extend_from_slice(v.bytes().unwrap_or_default());
                        have_field = true;
                    }
                }
            }
            ScanKind::Keys | ScanKind::Set => {
                while let Some(v) = self.next(conn) {
                    f(v.bytes().unwrap_or_default(), Value::null())?;
                }
            }
        }
        self.finish()
    }

    /// Returns the error that ended the iteration, if any.
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Consumes the iteration outcome: `Ok` on a completed cycle,
    /// the terminating error otherwise.
    pub fn finish(&mut self) -> Result<()> {
        match self.err.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn element(&self, i: usize) -> Value<'_> {
        self.page().get(i)
    }

    /// The elements array of the current page: the first command reply
    /// under the root holds a `[cursor, elements]` pair.
    fn page(&self) -> Value<'_> {
        self.reply.value().get(0).get(1)
    }

    fn fetch(&mut self, conn: &mut Conn) -> Result<()> {
        let mut p = blank_pipeline();
        self.build_command(&mut p);
        self.reply.reset();
        let outcome = conn.exec(&p, Some(&mut self.reply));
        release_pipeline(p);
        outcome?;
        let (cursor, n) = {
            let root = self.reply.value().get(0);
            if let Some(err) = root.err() {
                return Err(err.into());
            }
            let cursor = root.get(0).int().ok_or(Error::UnexpectedResponse)?;
            (cursor, root.get(1).len())
        };
        self.cursor = cursor;
        self.i = 0;
        self.n = n;
        self.started = true;
        Ok(())
    }

    fn build_command(&self, p: &mut Pipeline) {
        let pattern = self.pattern.as_deref();
        match self.kind {
            ScanKind::Keys => p.scan(self.cursor, pattern, self.count),
            ScanKind::Set => p.sscan(&self.key, self.cursor, pattern, self.count),
            ScanKind::Hash => p.hscan(&self.key, self.cursor, pattern, self.count),
            ScanKind::SortedSet => p.zscan(&self.key, self.cursor, pattern, self.count),
        }
    }
}
