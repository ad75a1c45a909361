//! Server-side script handles.
//!
//! `SCRIPT LOAD` returns the hex SHA1 the server filed the script under;
//! keeping it lets later calls go through `EVALSHA` without resending
//! the script body.

use std::fmt;

use redpool_resp::Arg;

use crate::conn::Conn;
use crate::error::{Error, Result};
use crate::freelist::{blank_pipeline, blank_reply, release_pipeline, release_reply};
use crate::pipeline::Pipeline;

/// A loaded script, identified by its 40-byte hex SHA1 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    sha1: [u8; 40],
}

impl Script {
    /// Returns the hex digest.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.sha1).unwrap_or("")
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Conn {
    /// Loads a Lua script and returns its digest handle.
    pub fn load_script(&mut self, src: &str) -> Result<Script> {
        let mut p = blank_pipeline();
        p.script_load(src);
        let mut reply = blank_reply();
        let outcome = self.exec(&p, Some(&mut reply));
        release_pipeline(p);
        let result = outcome.and_then(|_| {
            let v = reply.value().get(0);
            if let Some(err) = v.err() {
                return Err(err.into());
            }
            let digest = v.bytes().ok_or(Error::UnexpectedResponse)?;
            if digest.len() != 40 {
                return Err(Error::UnexpectedResponse);
            }
            let mut sha1 = [0u8; 40];
            sha1.copy_from_slice(digest);
            Ok(Script { sha1 })
        });
        release_reply(reply);
        result
    }
}

impl Pipeline {
    /// `EVALSHA` against a loaded script handle.
    pub fn eval_script(&mut self, script: &Script, keys_and_args: &[Arg<'_>]) {
        self.evalsha(script.as_str(), keys_and_args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_the_digest() {
        let script = Script {
            sha1: *b"da95252e2c27e41cd53b9114f28b4ba84e7d64d4",
        };
        assert_eq!(script.to_string(), "da95252e2c27e41cd53b9114f28b4ba84e7d64d4");
    }

    #[test]
    fn eval_script_emits_evalsha() {
        let script = Script {
            sha1: *b"da95252e2c27e41cd53b9114f28b4ba84e7d64d4",
        };
        let mut p = Pipeline::new();
        p.eval_script(&script, &[Arg::Key("k"), Arg::String("v")]);
        let wire = p.as_bytes();
        assert!(wire.starts_with(b"*5\r\n$7\r\nEVALSHA\r\n$40\r\n"));
        assert!(wire.ends_with(b"$1\r\n1\r\n$1\r\nk\r\n$1\r\nv\r\n"));
    }
}
