//! # redpool Client
//!
//! Purpose: A synchronous, allocation-frugal Redis client: typed command
//! pipelines over reusable buffers, in-place reply parsing, and a
//! bounded connection pool built for high-concurrency call sites.
//!
//! ## Design Principles
//! 1. **Pipelines First**: Commands accumulate into one wire image and
//!    their replies come back in order, indexable by position.
//! 2. **Object Reuse**: Pipelines, replies, and connection buffers are
//!    recycled; steady-state calls do not allocate.
//! 3. **Sticky Errors**: A failed connection never re-enters the idle
//!    set; the pool discriminates on return.
//!
//! ```no_run
//! use std::time::Duration;
//! use redpool_client::{blank_pipeline, blank_reply, release_pipeline, release_reply};
//! use redpool_client::{parse_url, Arg, Pool};
//!
//! # fn main() -> redpool_client::Result<()> {
//! let pool = Pool::new(parse_url("redis://127.0.0.1:6379?read-timeout=1s")?);
//! let mut p = blank_pipeline();
//! p.set("greeting", Arg::String("hello"), Duration::ZERO);
//! p.get("greeting");
//! let mut reply = blank_reply();
//! pool.exec(&p, Some(&mut reply))?;
//! assert_eq!(reply.value().get(1).bytes(), Some(&b"hello"[..]));
//! release_pipeline(p);
//! release_reply(reply);
//! # Ok(())
//! # }
//! ```

mod commands;
mod conn;
mod error;
mod freelist;
mod pipeline;
mod pool;
mod scan;
mod script;
mod url;

pub use commands::{z, Migrate, SetMode, Sort, ZMember};
pub use conn::{Conn, ConnOptions};
pub use error::{Error, Result};
pub use freelist::{blank_pipeline, blank_reply, release_pipeline, release_reply};
pub use pipeline::Pipeline;
pub use pool::{DialFn, Pool, PoolOptions, PoolStats};
pub use scan::{hscan, scan, sscan, zscan, ScanIterator};
pub use script::Script;
pub use url::parse_url;

pub use redpool_resp::{pair, Arg, Buffer, ProtocolError, Reply, ServerError, Value, KV};
