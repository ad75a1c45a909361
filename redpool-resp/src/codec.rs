//! # RESP2 Framing
//!
//! Purpose: Encode and decode raw RESP2 frames over byte buffers and
//! buffered readers, keeping allocations out of the hot path.
//!
//! ## Design Principles
//! 1. **Append-Style Encoding**: Encoders extend a caller-owned `Vec<u8>`.
//! 2. **Buffered Decoding**: Decoders work on any `BufRead` and copy
//!    straight out of the reader's internal buffer when possible.
//! 3. **Fail Fast**: Invalid framing returns protocol errors immediately.

use std::io::BufRead;

use crate::error::{ProtocolError, RespError};

/// Simple string frame tag (`+OK\r\n`).
pub const SIMPLE_STRING: u8 = b'+';
/// Error frame tag (`-ERR ...\r\n`).
pub const ERROR: u8 = b'-';
/// Integer frame tag (`:42\r\n`).
pub const INTEGER: u8 = b':';
/// Bulk string frame tag (`$3\r\nfoo\r\n`, `$-1\r\n` for null).
pub const BULK_STRING: u8 = b'$';
/// Array frame tag (`*2\r\n...`, `*-1\r\n` for null).
pub const ARRAY: u8 = b'*';

const CRLF: &[u8] = b"\r\n";

pub fn append_crlf(buf: &mut Vec<u8>) {
    buf.extend_from_slice(CRLF);
}

pub fn append_simple_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(SIMPLE_STRING);
    buf.extend_from_slice(s.as_bytes());
    append_crlf(buf);
}

pub fn append_error(buf: &mut Vec<u8>, message: &str) {
    buf.push(ERROR);
    buf.extend_from_slice(message.as_bytes());
    append_crlf(buf);
}

pub fn append_int(buf: &mut Vec<u8>, n: i64) {
    buf.push(INTEGER);
    push_decimal(buf, n);
    append_crlf(buf);
}

pub fn append_array(buf: &mut Vec<u8>, len: usize) {
    buf.push(ARRAY);
    push_decimal_unsigned(buf, len as u64);
    append_crlf(buf);
}

pub fn append_null_array(buf: &mut Vec<u8>) {
    buf.extend_from_slice(b"*-1\r\n");
}

pub fn append_null_bulk_string(buf: &mut Vec<u8>) {
    buf.extend_from_slice(b"$-1\r\n");
}

pub fn append_bulk_string(buf: &mut Vec<u8>, s: &str) {
    append_bulk_string_raw(buf, s.as_bytes());
}

pub fn append_bulk_string_raw(buf: &mut Vec<u8>, raw: &[u8]) {
    buf.push(BULK_STRING);
    push_decimal_unsigned(buf, raw.len() as u64);
    append_crlf(buf);
    buf.extend_from_slice(raw);
    append_crlf(buf);
}

pub fn append_bulk_string_array(buf: &mut Vec<u8>, values: &[&str]) {
    append_array(buf, values.len());
    for s in values {
        append_bulk_string(buf, s);
    }
}

pub fn append_int_array(buf: &mut Vec<u8>, values: &[i64]) {
    append_array(buf, values.len());
    for &n in values {
        append_int(buf, n);
    }
}

/// Appends the decimal digits of `value` using a stack buffer.
pub(crate) fn push_decimal(out: &mut Vec<u8>, value: i64) {
    if value < 0 {
        out.push(b'-');
    }
    push_decimal_unsigned(out, value.unsigned_abs());
}

pub(crate) fn push_decimal_unsigned(out: &mut Vec<u8>, mut value: u64) {
    let mut digits = [0u8; 20];
    let mut len = 0;
    if value == 0 {
        digits[0] = b'0';
        len = 1;
    } else {
        while value > 0 {
            digits[len] = b'0' + (value % 10) as u8;
            value /= 10;
            len += 1;
        }
    }
    for idx in (0..len).rev() {
        out.push(digits[idx]);
    }
}

fn unexpected_eof() -> RespError {
    RespError::Io(std::io::ErrorKind::UnexpectedEof.into())
}

/// Reads a CRLF-terminated decimal line, e.g. the `42` of `:42\r\n` after
/// the tag byte has been consumed.
///
/// Accepts one optional leading `-`; any other non-digit byte is a
/// protocol error.
pub fn read_int<R: BufRead>(r: &mut R) -> Result<i64, RespError> {
    let mut n: i64 = 0;
    let mut negative = false;
    let mut pos = 0usize;
    let mut seen_cr = false;
    loop {
        let mut used = 0;
        let mut done = false;
        let mut failed = None;
        {
            let available = r.fill_buf()?;
            if available.is_empty() {
                return Err(unexpected_eof());
            }
            for &c in available {
                used += 1;
                if seen_cr {
                    if c == b'\n' {
                        done = true;
                    } else {
                        failed = Some(ProtocolError::BadLineEnding);
                    }
                    break;
                }
                match c {
                    b'-' if pos == 0 => negative = true,
                    b'0'..=b'9' => n = n.wrapping_mul(10).wrapping_add((c - b'0') as i64),
                    b'\r' => seen_cr = true,
                    _ => {
                        failed = Some(ProtocolError::InvalidInteger);
                        break;
                    }
                }
                pos += 1;
            }
        }
        r.consume(used);
        if let Some(err) = failed {
            return Err(err.into());
        }
        if done {
            return Ok(if negative { -n } else { n });
        }
    }
}

/// Reads one CRLF-terminated line, appending its payload to `out`.
pub fn read_line<R: BufRead>(r: &mut R, out: &mut Vec<u8>) -> Result<(), RespError> {
    let read = r.read_until(b'\n', out)?;
    if read == 0 {
        return Err(unexpected_eof());
    }
    if read < 2 || !out.ends_with(CRLF) {
        return Err(ProtocolError::BadLineEnding.into());
    }
    out.truncate(out.len() - 2);
    Ok(())
}

/// Reads the payload of a bulk string whose size header was already parsed,
/// appending it to `out`.
///
/// A `-1` size (RESP null) leaves `out` unchanged. When the payload is
/// already buffered it is copied out in one step together with its CRLF;
/// larger payloads are read directly into `out`.
pub fn read_bulk_string<R: BufRead>(
    out: &mut Vec<u8>,
    size: i64,
    r: &mut R,
) -> Result<(), RespError> {
    match size {
        -1 => Ok(()),
        0 => consume_crlf(r),
        size if size > 0 => {
            let size = size as usize;
            let available = r.fill_buf()?;
            if available.len() >= size + 2 {
                if &available[size..size + 2] != CRLF {
                    return Err(ProtocolError::BadLineEnding.into());
                }
                out.extend_from_slice(&available[..size]);
                r.consume(size + 2);
                return Ok(());
            }
            let start = out.len();
            out.resize(start + size, 0);
            r.read_exact(&mut out[start..])?;
            consume_crlf(r)
        }
        _ => Err(ProtocolError::InvalidBulkSize.into()),
    }
}

fn consume_crlf<R: BufRead>(r: &mut R) -> Result<(), RespError> {
    let mut crlf = [0u8; 2];
    r.read_exact(&mut crlf)?;
    if crlf != *CRLF {
        return Err(ProtocolError::BadLineEnding.into());
    }
    Ok(())
}

/// Skips one whole frame, recursing through arrays.
pub fn discard<R: BufRead>(r: &mut R) -> Result<(), RespError> {
    let mut tag = [0u8; 1];
    r.read_exact(&mut tag)?;
    match tag[0] {
        SIMPLE_STRING | ERROR | INTEGER => skip_line(r),
        BULK_STRING => {
            let size = read_int(r)?;
            if size < 0 {
                Ok(())
            } else {
                skip_exact(r, size as usize + 2)
            }
        }
        ARRAY => {
            let mut remaining = read_int(r)?;
            while remaining > 0 {
                discard(r)?;
                remaining -= 1;
            }
            Ok(())
        }
        tag => Err(ProtocolError::InvalidType(tag).into()),
    }
}

/// Skips `n` whole frames.
pub fn discard_n<R: BufRead>(r: &mut R, n: usize) -> Result<(), RespError> {
    for _ in 0..n {
        discard(r)?;
    }
    Ok(())
}

fn skip_line<R: BufRead>(r: &mut R) -> Result<(), RespError> {
    loop {
        let (used, done) = {
            let available = r.fill_buf()?;
            if available.is_empty() {
                return Err(unexpected_eof());
            }
            match available.iter().position(|&c| c == b'\n') {
                Some(at) => (at + 1, true),
                None => (available.len(), false),
            }
        };
        r.consume(used);
        if done {
            return Ok(());
        }
    }
}

fn skip_exact<R: BufRead>(r: &mut R, mut n: usize) -> Result<(), RespError> {
    while n > 0 {
        let available = r.fill_buf()?;
        if available.is_empty() {
            return Err(unexpected_eof());
        }
        let take = available.len().min(n);
        r.consume(take);
        n -= take;
    }
    Ok(())
}
