//! # Connection Pool
//!
//! Purpose: Share a bounded set of connections across caller threads
//! with lazy dialing, LIFO reuse, and deadline-aware acquisition.
//!
//! ## Design Principles
//! 1. **LIFO Reuse**: The most recently returned connection is handed
//!    out first, keeping per-connection buffers and the TCP path warm.
//! 2. **Lock-Free Fast Paths**: `num_idle`/`num_open` are advisory
//!    atomic hints sampled outside the lock; the mutex-guarded state is
//!    authoritative.
//! 3. **Put-Driven Deadlines**: A waiter's deadline is checked against
//!    the timestamp of the most recent `put`. There is no clock thread;
//!    a waiter whose deadline passes with no pool traffic keeps waiting,
//!    so strict wall-clock expiry needs a timer outside the pool.
//! 4. **Error-Discriminated Return**: `put` recycles healthy connections
//!    and discards degraded or over-age ones.

use std::cmp;
use std::net::TcpStream;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use redpool_resp::Reply;

use crate::conn::{Conn, ConnOptions};
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;

/// Custom dial hook: maps an address to a connected stream.
pub type DialFn = Arc<dyn Fn(&str) -> std::io::Result<TcpStream> + Send + Sync>;

/// Pool configuration.
#[derive(Clone)]
pub struct PoolOptions {
    /// Options applied to every dialed connection.
    pub conn: ConnOptions,
    /// Server address, e.g. "127.0.0.1:6379".
    pub address: String,
    /// Maximum open connections; zero or negative means unbounded.
    pub max_connections: i32,
    /// Idle connections older than this are reaped. Zero disables reaping.
    pub max_idle_time: Duration,
    /// Connections older than this are discarded on `put`. Zero disables
    /// the age check.
    pub max_connection_age: Duration,
    /// Reaper cadence, clamped to at least one second.
    pub check_idle_interval: Duration,
    /// Replaces `TcpStream::connect` when set.
    pub dial: Option<DialFn>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        PoolOptions {
            conn: ConnOptions::default(),
            address: "127.0.0.1:6379".to_string(),
            max_connections: 8,
            max_idle_time: Duration::from_secs(60),
            max_connection_age: Duration::from_secs(600),
            check_idle_interval: Duration::from_secs(10),
            dial: None,
        }
    }
}

/// Point-in-time pool statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquisitions served without waiting for an idle connection.
    pub hits: u32,
    /// Acquisitions that had to wait.
    pub misses: u32,
    /// Acquisitions abandoned because their deadline passed.
    pub timeouts: u32,
}

struct PoolState {
    idle: Vec<Conn>,
    closed: bool,
    /// Stamp of the most recent `put`; waiters compare deadlines to it.
    ts: Option<Instant>,
    reaper_started: bool,
}

struct PoolInner {
    options: PoolOptions,
    // Advisory hints for the unlocked fast paths in `get`; pinned to
    // i32::MIN once the pool closes so CAS loops observe it locklessly.
    num_open: AtomicI32,
    num_idle: AtomicI32,
    state: Mutex<PoolState>,
    available: Condvar,
    reaper: Condvar,
    hits: AtomicU32,
    misses: AtomicU32,
    timeouts: AtomicU32,
}

/// A bounded pool of lazily dialed connections. Cheap to clone.
#[derive(Clone)]
pub struct Pool {
    inner: Arc<PoolInner>,
}

impl Pool {
    pub fn new(options: PoolOptions) -> Pool {
        Pool {
            inner: Arc::new(PoolInner {
                options,
                num_open: AtomicI32::new(0),
                num_idle: AtomicI32::new(0),
                state: Mutex::new(PoolState {
                    idle: Vec::new(),
                    closed: false,
                    ts: None,
                    reaper_started: false,
                }),
                available: Condvar::new(),
                reaper: Condvar::new(),
                hits: AtomicU32::new(0),
                misses: AtomicU32::new(0),
                timeouts: AtomicU32::new(0),
            }),
        }
    }

    /// Acquires a connection, dialing lazily up to `max_connections`.
    ///
    /// `deadline` is interpreted against the most recent `put` stamp:
    /// the call fails with [`Error::DeadlineExceeded`] once the pool
    /// observes traffic past the deadline while this waiter still has no
    /// connection.
    pub fn get(&self, deadline: Option<Instant>) -> Result<Conn> {
        let mut claimed_idle = false;
        loop {
            let n = self.inner.num_idle.load(Ordering::Relaxed);
            if n > 0 {
                if self
                    .inner
                    .num_idle
                    .compare_exchange(n, n - 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
                {
                    claimed_idle = true;
                    break;
                }
            } else if n < 0 {
                return Err(Error::PoolClosed);
            } else {
                break;
            }
        }
        if !claimed_idle {
            let max = self.max_connections();
            loop {
                let n = self.inner.num_open.load(Ordering::Relaxed);
                if (0..max).contains(&n) {
                    if self
                        .inner
                        .num_open
                        .compare_exchange(n, n + 1, Ordering::Relaxed, Ordering::Relaxed)
                        .is_ok()
                    {
                        self.spawn_dial();
                        break;
                    }
                } else if n < 0 {
                    return Err(Error::PoolClosed);
                } else {
                    break;
                }
            }
        }
        self.wait_for_idle(deadline, claimed_idle)
    }

    fn wait_for_idle(&self, deadline: Option<Instant>, claimed_idle: bool) -> Result<Conn> {
        let mut miss = false;
        let conn;
        {
            let mut state = self.inner.state.lock();
            loop {
                if let Some(ready) = state.idle.pop() {
                    // Fast-path callers already gave up their claim on the
                    // idle hint; everyone else settles it here so the hint
                    // tracks the idle list.
                    if !claimed_idle {
                        self.release_idle_hint();
                    }
                    conn = ready;
                    break;
                }
                miss = true;
                if state.closed {
                    return Err(Error::PoolClosed);
                }
                if let (Some(deadline), Some(ts)) = (deadline, state.ts) {
                    if deadline < ts {
                        self.inner.timeouts.fetch_add(1, Ordering::Relaxed);
                        return Err(Error::DeadlineExceeded);
                    }
                }
                self.inner.available.wait(&mut state);
            }
        }
        if miss {
            self.inner.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(conn)
    }

    /// Returns a connection to the pool.
    ///
    /// Degraded and over-age connections are closed instead of pooled.
    pub fn put(&self, mut conn: Conn) {
        if conn.has_error() {
            self.discard(conn);
            return;
        }
        let age_limit = self.inner.options.max_connection_age;
        if age_limit > Duration::ZERO && conn.created_at().elapsed() > age_limit {
            debug!("discarding connection past its age limit");
            self.discard(conn);
            return;
        }
        let now = Instant::now();
        conn.set_last_used(now);
        let mut state = self.inner.state.lock();
        if state.closed {
            drop(state);
            self.discard(conn);
            return;
        }
        state.idle.push(conn);
        state.ts = Some(now);
        if !state.reaper_started {
            state.reaper_started = true;
            self.spawn_reaper();
        }
        self.inner.available.notify_one();
        drop(state);
        self.inner.num_idle.fetch_add(1, Ordering::Relaxed);
    }

    /// Acquires a connection, runs the pipeline, and returns it.
    pub fn exec(&self, pipeline: &Pipeline, reply: Option<&mut Reply>) -> Result<()> {
        let mut conn = self.get(None)?;
        let result = conn.exec(pipeline, reply);
        self.put(conn);
        result
    }

    /// Closes the pool: pending and future acquisitions fail with
    /// [`Error::PoolClosed`] and idle connections are torn down.
    pub fn close(&self) {
        let idle: Vec<Conn>;
        {
            let mut state = self.inner.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            self.inner.num_idle.store(i32::MIN, Ordering::Relaxed);
            self.inner.num_open.store(i32::MIN, Ordering::Relaxed);
            idle = std::mem::take(&mut state.idle);
            self.inner.available.notify_all();
            self.inner.reaper.notify_all();
        }
        for mut conn in idle {
            let _ = conn.close_with_error(Error::PoolClosed);
        }
        debug!("pool closed");
    }

    /// Returns acquisition statistics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            timeouts: self.inner.timeouts.load(Ordering::Relaxed),
        }
    }

    /// Number of open connections (dialing, leased, or idle).
    pub fn open(&self) -> usize {
        cmp::max(self.inner.num_open.load(Ordering::Relaxed), 0) as usize
    }

    /// Number of idle connections.
    pub fn idle(&self) -> usize {
        cmp::max(self.inner.num_idle.load(Ordering::Relaxed), 0) as usize
    }

    fn max_connections(&self) -> i32 {
        let max = self.inner.options.max_connections;
        if max <= 0 {
            i32::MAX
        } else {
            max
        }
    }

    /// Closes a connection and releases its open slot.
    fn discard(&self, mut conn: Conn) {
        conn.close();
        self.release_open_slot();
    }

    // The guards against non-positive values keep the close sentinel
    // pinned at i32::MIN instead of wrapping.
    fn release_open_slot(&self) {
        loop {
            let n = self.inner.num_open.load(Ordering::Relaxed);
            if n <= 0
                || self
                    .inner
                    .num_open
                    .compare_exchange(n, n - 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
            {
                return;
            }
        }
    }

    fn release_idle_hint(&self) {
        loop {
            let n = self.inner.num_idle.load(Ordering::Relaxed);
            if n <= 0
                || self
                    .inner
                    .num_idle
                    .compare_exchange(n, n - 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
            {
                return;
            }
        }
    }

    /// Dials in the background; `put` publishes the connection.
    ///
    /// A failed dial only releases the open slot. Waiters are not
    /// notified; they fail through their deadline.
    fn spawn_dial(&self) {
        let pool = self.clone();
        thread::spawn(move || {
            let options = &pool.inner.options;
            let dialed = match &options.dial {
                Some(dial) => dial(&options.address),
                None => TcpStream::connect(&options.address),
            };
            let stream = match dialed {
                Ok(stream) => stream,
                Err(err) => {
                    debug!(error = %err, address = %options.address, "dial failed");
                    pool.release_open_slot();
                    return;
                }
            };
            match Conn::new(stream, options.conn.clone()) {
                Ok(conn) => {
                    debug!(address = %options.address, "dialed connection");
                    pool.put(conn);
                }
                Err(err) => {
                    debug!(error = %err, address = %options.address, "connection setup failed");
                    pool.release_open_slot();
                }
            }
        });
    }

    fn spawn_reaper(&self) {
        let pool = self.clone();
        thread::spawn(move || pool.run_reaper());
    }

    fn run_reaper(&self) {
        let interval = cmp::max(
            self.inner.options.check_idle_interval,
            Duration::from_secs(1),
        );
        loop {
            let stale = {
                let mut state = self.inner.state.lock();
                if state.closed {
                    return;
                }
                let _ = self.inner.reaper.wait_for(&mut state, interval);
                if state.closed {
                    return;
                }
                self.collect_stale(&mut state)
            };
            if stale.is_empty() {
                continue;
            }
            debug!(count = stale.len(), "reaping idle connections");
            for conn in stale {
                self.discard(conn);
            }
        }
    }

    /// Splits off the prefix of `idle` that has sat unused longer than
    /// `max_idle_time`. The front of the LIFO stack is its oldest entry.
    fn collect_stale(&self, state: &mut PoolState) -> Vec<Conn> {
        let max_idle = self.inner.options.max_idle_time;
        if max_idle == Duration::ZERO || state.idle.is_empty() {
            return Vec::new();
        }
        let now = Instant::now();
        let mut expired = 0;
        while expired < state.idle.len()
            && now.duration_since(state.idle[expired].last_used_at()) > max_idle
        {
            expired += 1;
        }
        if expired == 0 {
            return Vec::new();
        }
        let stale: Vec<Conn> = state.idle.drain(..expired).collect();
        self.inner
            .num_idle
            .store(state.idle.len() as i32, Ordering::Relaxed);
        stale
    }
}
