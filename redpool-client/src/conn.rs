//! # Connection
//!
//! Purpose: A framed duplex over a TCP socket: write a pipeline, then
//! read back exactly as many replies as it holds (or discard them).
//!
//! ## Design Principles
//! 1. **Buffered Reads, Direct Writes**: One `BufReader` per connection;
//!    writes go straight to the socket.
//! 2. **Sticky Errors**: The first IO or protocol failure degrades the
//!    connection; every later call short-circuits with the same error
//!    and the pool discards it on return.
//! 3. **Server Errors Are Data**: `-ERR` replies travel inside the reply
//!    tree and never tear the connection down.

use std::io::{BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};

use tracing::debug;

use redpool_resp::{discard_n, Arg, Reply, Value};

use crate::error::{Error, Result};
use crate::freelist::{blank_pipeline, blank_reply, release_pipeline, release_reply};
use crate::pipeline::Pipeline;

/// Sockets never get a read buffer smaller than this.
pub(crate) const MIN_BUFFER_SIZE: usize = 4096;

/// Per-connection options.
#[derive(Debug, Clone)]
pub struct ConnOptions {
    /// Buffered-reader size, clamped to at least 4096.
    pub read_buffer_size: usize,
    /// Socket read timeout.
    pub read_timeout: Option<Duration>,
    /// Socket write timeout.
    pub write_timeout: Option<Duration>,
    /// Half-close the read side and drop server responses.
    pub write_only: bool,
}

impl Default for ConnOptions {
    fn default() -> Self {
        ConnOptions {
            read_buffer_size: 8192,
            read_timeout: Some(Duration::from_secs(5)),
            write_timeout: Some(Duration::from_secs(5)),
            write_only: false,
        }
    }
}

/// A connection to a Redis server.
pub struct Conn {
    reader: BufReader<TcpStream>,
    options: ConnOptions,
    err: Option<Error>,
    created_at: Instant,
    last_used_at: Instant,
}

impl Conn {
    /// Opens a connection to `addr`.
    pub fn dial(addr: &str, options: ConnOptions) -> Result<Conn> {
        let stream = TcpStream::connect(addr)?;
        Conn::new(stream, options)
    }

    /// Wraps an already-connected stream.
    pub(crate) fn new(stream: TcpStream, options: ConnOptions) -> Result<Conn> {
        // Small request/reply exchanges; Nagle only adds latency here.
        stream.set_nodelay(true)?;
        stream.set_read_timeout(options.read_timeout)?;
        stream.set_write_timeout(options.write_timeout)?;
        if options.write_only {
            stream.shutdown(Shutdown::Read)?;
        }
        let size = options.read_buffer_size.max(MIN_BUFFER_SIZE);
        let now = Instant::now();
        Ok(Conn {
            reader: BufReader::with_capacity(size, stream),
            options,
            err: None,
            created_at: now,
            last_used_at: now,
        })
    }

    /// Writes the pipeline and reads back exactly `pipeline.len()` replies.
    ///
    /// With a reply, the replies are parsed into it and indexable as
    /// `reply.value().get(0..n)`. Without one they are discarded frame by
    /// frame, unless the connection is write-only, in which case the
    /// server was told to silence responses and nothing is read.
    pub fn exec(&mut self, pipeline: &Pipeline, reply: Option<&mut Reply>) -> Result<()> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        let n = pipeline.len();
        if n == 0 {
            return Ok(());
        }
        self.last_used_at = Instant::now();
        if let Err(err) = self.exchange(pipeline, reply, n) {
            return Err(self.close_with_error(err));
        }
        Ok(())
    }

    fn exchange(&mut self, pipeline: &Pipeline, reply: Option<&mut Reply>, n: usize) -> Result<()> {
        let stream = self.reader.get_mut();
        stream.write_all(pipeline.as_bytes())?;
        stream.flush()?;
        match (reply, self.options.write_only) {
            (Some(reply), false) => {
                reply.read_from_n(&mut self.reader, n)?;
                Ok(())
            }
            (None, false) => {
                discard_n(&mut self.reader, n)?;
                Ok(())
            }
            (None, true) => Ok(()),
            (Some(_), true) => Err(Error::WriteOnly),
        }
    }

    /// Closes the connection. Idempotent.
    pub fn close(&mut self) {
        let _ = self.close_with_error(Error::ConnClosed);
    }

    /// Degrades the connection with a sticky error, shutting the socket
    /// down. Returns the error that stuck first.
    pub(crate) fn close_with_error(&mut self, err: Error) -> Error {
        if self.err.is_none() {
            debug!(error = %err, "closing connection");
            self.err = Some(err);
            let _ = self.reader.get_ref().shutdown(Shutdown::Both);
        }
        self.err.clone().unwrap_or(Error::ConnClosed)
    }

    pub(crate) fn has_error(&self) -> bool {
        self.err.is_some()
    }

    pub(crate) fn created_at(&self) -> Instant {
        self.created_at
    }

    pub(crate) fn last_used_at(&self) -> Instant {
        self.last_used_at
    }

    pub(crate) fn set_last_used(&mut self, at: Instant) {
        self.last_used_at = at;
    }

    /// Pings the server and returns the reply payload.
    pub fn ping(&mut self, message: Option<&str>) -> Result<Vec<u8>> {
        let mut p = blank_pipeline();
        p.ping(message);
        let mut reply = blank_reply();
        let outcome = self.exec(&p, Some(&mut reply));
        release_pipeline(p);
        let result = outcome.and_then(|_| {
            let v = reply.value().get(0);
            if let Some(err) = v.err() {
                return Err(err.into());
            }
            v.bytes().map(|b| b.to_vec()).ok_or(Error::UnexpectedResponse)
        });
        release_reply(reply);
        result
    }

    /// Authenticates the connection.
    pub fn auth(&mut self, password: &str) -> Result<()> {
        let mut p = blank_pipeline();
        p.auth(password);
        let mut reply = blank_reply();
        let outcome = self.exec(&p, Some(&mut reply));
        release_pipeline(p);
        let result = outcome.and_then(|_| match reply.value().get(0).err() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        });
        release_reply(reply);
        result
    }

    /// Issues QUIT and closes the connection.
    pub fn quit(&mut self) -> Result<()> {
        let mut p = blank_pipeline();
        p.quit();
        let outcome = self.exec(&p, None);
        release_pipeline(p);
        self.close();
        outcome
    }

    /// Blocking left pop (`BLPOP`); returns the `(key, element)` pair.
    ///
    /// A server-side timeout surfaces as [`Error::Timeout`] and leaves
    /// the connection healthy.
    pub fn pop_left(&mut self, timeout: Duration, key: &str, keys: &[&str]) -> Result<(Vec<u8>, Vec<u8>)> {
        let (key, element, _) = self.bpop("BLPOP", timeout, key, keys)?;
        Ok((key, element))
    }

    /// Blocking right pop (`BRPOP`); returns the `(key, element)` pair.
    pub fn pop_right(&mut self, timeout: Duration, key: &str, keys: &[&str]) -> Result<(Vec<u8>, Vec<u8>)> {
        let (key, element, _) = self.bpop("BRPOP", timeout, key, keys)?;
        Ok((key, element))
    }

    /// Blocking minimum pop from sorted sets (`BZPOPMIN`).
    pub fn pop_min(&mut self, timeout: Duration, key: &str, keys: &[&str]) -> Result<(Vec<u8>, Vec<u8>, f64)> {
        self.bpop("BZPOPMIN", timeout, key, keys)
    }

    /// Blocking maximum pop from sorted sets (`BZPOPMAX`).
    pub fn pop_max(&mut self, timeout: Duration, key: &str, keys: &[&str]) -> Result<(Vec<u8>, Vec<u8>, f64)> {
        self.bpop("BZPOPMAX", timeout, key, keys)
    }

    /// Blocking `BRPOPLPUSH`; returns the element moved from `src` to `dst`.
    pub fn pop_push(&mut self, src: &str, dst: &str, timeout: Duration) -> Result<Vec<u8>> {
        let mut p = blank_pipeline();
        p.brpoplpush(src, dst, timeout);
        let mut reply = blank_reply();
        let outcome = self.exec(&p, Some(&mut reply));
        release_pipeline(p);
        let result = outcome.and_then(|_| {
            let v = reply.value().get(0);
            if let Some(err) = v.err() {
                return Err(err.into());
            }
            if v.is_null() {
                return Err(Error::Timeout);
            }
            v.bytes().map(|b| b.to_vec()).ok_or(Error::UnexpectedResponse)
        });
        release_reply(reply);
        result
    }

    fn bpop(
        &mut self,
        command: &str,
        timeout: Duration,
        key: &str,
        keys: &[&str],
    ) -> Result<(Vec<u8>, Vec<u8>, f64)> {
        let mut p = blank_pipeline();
        p.command(command, keys.len() + 2);
        p.arg(Arg::Key(key));
        for &k in keys {
            p.arg(Arg::Key(k));
        }
        p.arg(Arg::Int(timeout.as_secs() as i64));
        let mut reply = blank_reply();
        let outcome = self.exec(&p, Some(&mut reply));
        release_pipeline(p);
        let result = outcome.and_then(|_| parse_bpop(command, reply.value().get(0)));
        release_reply(reply);
        result
    }
}

fn parse_bpop(command: &str, v: Value<'_>) -> Result<(Vec<u8>, Vec<u8>, f64)> {
    if let Some(err) = v.err() {
        return Err(err.into());
    }
    if v.is_null() {
        return Err(Error::Timeout);
    }
    let key = v.get(0).bytes().ok_or(Error::UnexpectedResponse)?.to_vec();
    match command {
        "BZPOPMIN" | "BZPOPMAX" => {
            let score = parse_score(v.get(1).bytes().ok_or(Error::UnexpectedResponse)?);
            let member = v.get(2).bytes().ok_or(Error::UnexpectedResponse)?.to_vec();
            Ok((key, member, score))
        }
        _ => {
            let element = v.get(1).bytes().ok_or(Error::UnexpectedResponse)?.to_vec();
            Ok((key, element, f64::NAN))
        }
    }
}

fn parse_score(bytes: &[u8]) -> f64 {
    match bytes {
        b"+inf" | b"inf" => f64::INFINITY,
        b"-inf" => f64::NEG_INFINITY,
        _ => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scores() {
        assert_eq!(parse_score(b"1.5"), 1.5);
        assert_eq!(parse_score(b"+inf"), f64::INFINITY);
        assert_eq!(parse_score(b"-inf"), f64::NEG_INFINITY);
        assert!(parse_score(b"not-a-score").is_nan());
    }
}
