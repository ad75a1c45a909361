//! Typed command builders.
//!
//! Every helper is a thin wrapper over [`Pipeline::command`] plus
//! [`Pipeline::arg`]; none of them talk to the network. Durations for
//! expirations are sent in milliseconds via `PEXPIRE`/`PX`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use redpool_resp::{Arg, KV};

use crate::pipeline::Pipeline;

const DEFAULT_SCAN_COUNT: i64 = 10;

fn millis(ttl: Duration) -> i64 {
    ttl.as_millis() as i64
}

fn seconds(timeout: Duration) -> i64 {
    timeout.as_secs() as i64
}

fn limit_argc(offset: i64, count: i64) -> usize {
    if offset == 0 && count == 0 {
        0
    } else {
        3
    }
}

/// Options for `MIGRATE`. The multi-key form is always used, so keys go
/// after the `KEYS` token and the key slot stays empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Migrate<'a> {
    pub host: &'a str,
    pub port: u16,
    pub db: i64,
    pub timeout: Duration,
    pub copy: bool,
    pub replace: bool,
}

/// Options for `SORT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sort<'a> {
    /// External weight pattern (`BY`).
    pub by: Option<&'a str>,
    /// `LIMIT` offset; emitted when either `offset` or `count` is set.
    pub offset: i64,
    /// `LIMIT` count.
    pub count: i64,
    /// `GET` patterns, in order.
    pub get: &'a [&'a str],
    /// Sort lexicographically instead of numerically.
    pub alpha: bool,
    /// Descending order.
    pub desc: bool,
    /// Store the result under this key instead of returning it.
    pub store: Option<&'a str>,
}

/// A score/member pair for sorted set insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZMember<'a> {
    pub score: f64,
    pub member: &'a str,
}

/// Creates a score/member pair.
pub fn z(score: f64, member: &str) -> ZMember<'_> {
    ZMember { score, member }
}

/// Update mode for `ZADD`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetMode {
    /// Add new members and update existing ones.
    #[default]
    Always,
    /// Only add new members (`NX`).
    Nx,
    /// Only update existing members (`XX`).
    Xx,
}

/// Connection commands.
impl Pipeline {
    pub fn auth(&mut self, password: &str) {
        self.command("AUTH", 1);
        self.arg(Arg::String(password));
    }

    pub fn echo(&mut self, message: &str) {
        self.command("ECHO", 1);
        self.arg(Arg::String(message));
    }

    pub fn ping(&mut self, message: Option<&str>) {
        match message {
            Some(message) => {
                self.command("PING", 1);
                self.arg(Arg::String(message));
            }
            None => self.command("PING", 0),
        }
    }

    pub fn quit(&mut self) {
        self.command("QUIT", 0);
    }

    pub fn select(&mut self, db: i64) {
        self.command("SELECT", 1);
        self.arg(Arg::Int(db));
    }

    pub fn swap_db(&mut self, i: i64, j: i64) {
        self.command("SWAPDB", 2);
        self.arg(Arg::Int(i));
        self.arg(Arg::Int(j));
    }
}

/// String commands.
impl Pipeline {
    pub fn append(&mut self, key: &str, value: Arg<'_>) {
        self.command("APPEND", 2);
        self.arg(Arg::Key(key));
        self.arg(value);
    }

    pub fn decr(&mut self, key: &str) {
        self.command("DECR", 1);
        self.arg(Arg::Key(key));
    }

    pub fn decr_by(&mut self, key: &str, n: i64) {
        self.command("DECRBY", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(n));
    }

    pub fn get(&mut self, key: &str) {
        self.command("GET", 1);
        self.arg(Arg::Key(key));
    }

    pub fn get_range(&mut self, key: &str, start: i64, end: i64) {
        self.command("GETRANGE", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(start));
        self.arg(Arg::Int(end));
    }

    pub fn get_set(&mut self, key: &str, value: Arg<'_>) {
        self.command("GETSET", 2);
        self.arg(Arg::Key(key));
        self.arg(value);
    }

    pub fn incr(&mut self, key: &str) {
        self.command("INCR", 1);
        self.arg(Arg::Key(key));
    }

    pub fn incr_by(&mut self, key: &str, n: i64) {
        self.command("INCRBY", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(n));
    }

    pub fn incr_by_float(&mut self, key: &str, f: f64) {
        self.command("INCRBYFLOAT", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Float(f));
    }

    pub fn mget(&mut self, keys: &[&str]) {
        self.command("MGET", keys.len());
        for &key in keys {
            self.arg(Arg::Key(key));
        }
    }

    pub fn mset(&mut self, pairs: &[KV<'_>]) {
        self.interleaved_pairs("MSET", pairs);
    }

    /// `MSETNX`: set all keys only if none of them exist.
    pub fn mset_nx(&mut self, pairs: &[KV<'_>]) {
        self.interleaved_pairs("MSETNX", pairs);
    }

    fn interleaved_pairs(&mut self, name: &str, pairs: &[KV<'_>]) {
        self.command(name, pairs.len() * 2);
        for pair in pairs {
            self.arg(Arg::Key(pair.key));
            self.arg(pair.arg);
        }
    }

    /// `SET`, with a `PX` expiration when `ttl` is non-zero.
    pub fn set(&mut self, key: &str, value: Arg<'_>, ttl: Duration) {
        if ttl > Duration::ZERO {
            self.command("SET", 4);
            self.arg(Arg::Key(key));
            self.arg(value);
            self.arg(Arg::String("PX"));
            self.arg(Arg::Int(millis(ttl)));
        } else {
            self.command("SET", 2);
            self.arg(Arg::Key(key));
            self.arg(value);
        }
    }

    /// `SET ... NX`: only set if the key does not exist.
    pub fn set_nx(&mut self, key: &str, value: Arg<'_>, ttl: Duration) {
        self.set_flagged(key, value, ttl, "NX");
    }

    /// `SET ... XX`: only set if the key already exists.
    pub fn set_xx(&mut self, key: &str, value: Arg<'_>, ttl: Duration) {
        self.set_flagged(key, value, ttl, "XX");
    }

    fn set_flagged(&mut self, key: &str, value: Arg<'_>, ttl: Duration, flag: &str) {
        if ttl > Duration::ZERO {
            self.command("SET", 5);
            self.arg(Arg::Key(key));
            self.arg(value);
            self.arg(Arg::String("PX"));
            self.arg(Arg::Int(millis(ttl)));
            self.arg(Arg::String(flag));
        } else {
            self.command("SET", 3);
            self.arg(Arg::Key(key));
            self.arg(value);
            self.arg(Arg::String(flag));
        }
    }

    pub fn set_range(&mut self, key: &str, offset: i64, value: Arg<'_>) {
        self.command("SETRANGE", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(offset));
        self.arg(value);
    }

    pub fn strlen(&mut self, key: &str) {
        self.command("STRLEN", 1);
        self.arg(Arg::Key(key));
    }
}

/// Bit operations.
impl Pipeline {
    pub fn bitcount(&mut self, key: &str, start: i64, end: i64) {
        self.command("BITCOUNT", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(start));
        self.arg(Arg::Int(end));
    }

    pub fn bit_and(&mut self, dst: &str, src: &[&str]) {
        self.bitop("AND", dst, src);
    }

    pub fn bit_or(&mut self, dst: &str, src: &[&str]) {
        self.bitop("OR", dst, src);
    }

    pub fn bit_xor(&mut self, dst: &str, src: &[&str]) {
        self.bitop("XOR", dst, src);
    }

    pub fn bit_not(&mut self, dst: &str, src: &str) {
        self.bitop("NOT", dst, &[src]);
    }

    fn bitop(&mut self, op: &str, dst: &str, src: &[&str]) {
        self.command("BITOP", src.len() + 2);
        self.arg(Arg::String(op));
        self.arg(Arg::Key(dst));
        for &key in src {
            self.arg(Arg::Key(key));
        }
    }

    /// `BITPOS`; `range` takes up to two bounds (start, then end).
    pub fn bit_pos(&mut self, key: &str, bit: bool, range: &[i64]) {
        let bounds = range.len().min(2);
        self.command("BITPOS", bounds + 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(bit as i64));
        for &bound in range.iter().take(2) {
            self.arg(Arg::Int(bound));
        }
    }

    pub fn getbit(&mut self, key: &str, offset: i64) {
        self.command("GETBIT", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(offset));
    }
}

/// Generic key commands.
impl Pipeline {
    pub fn del(&mut self, keys: &[&str]) {
        self.key_list("DEL", keys);
    }

    /// `DUMP`: serialize the value stored at a key.
    pub fn dump(&mut self, key: &str) {
        self.command("DUMP", 1);
        self.arg(Arg::Key(key));
    }

    pub fn exists(&mut self, keys: &[&str]) {
        self.key_list("EXISTS", keys);
    }

    /// Expiration in milliseconds via `PEXPIRE`.
    pub fn expire(&mut self, key: &str, ttl: Duration) {
        self.command("PEXPIRE", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(millis(ttl)));
    }

    /// Absolute expiration via `PEXPIREAT` (milliseconds since the epoch).
    pub fn expire_at(&mut self, key: &str, at: SystemTime) {
        let ms = at
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_millis() as i64)
            .unwrap_or(0);
        self.command("PEXPIREAT", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(ms));
    }

    pub fn keys(&mut self, pattern: &str) {
        self.command("KEYS", 1);
        self.arg(Arg::String(pattern));
    }

    /// `MIGRATE`: atomically transfer keys to another instance.
    pub fn migrate(&mut self, options: &Migrate<'_>, keys: &[&str]) {
        let mut argc = 6 + keys.len();
        if options.copy {
            argc += 1;
        }
        if options.replace {
            argc += 1;
        }
        self.command("MIGRATE", argc);
        self.arg(Arg::String(options.host));
        self.arg(Arg::Uint(options.port as u64));
        self.arg(Arg::String(""));
        self.arg(Arg::Int(options.db));
        self.arg(Arg::Int(seconds(options.timeout)));
        if options.copy {
            self.arg(Arg::String("COPY"));
        }
        if options.replace {
            self.arg(Arg::String("REPLACE"));
        }
        self.arg(Arg::String("KEYS"));
        for &key in keys {
            self.arg(Arg::Key(key));
        }
    }

    /// `MOVE`: move a key to another database.
    pub fn move_key(&mut self, key: &str, db: i64) {
        self.command("MOVE", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(db));
    }

    pub fn persist(&mut self, key: &str) {
        self.command("PERSIST", 1);
        self.arg(Arg::Key(key));
    }

    pub fn pttl(&mut self, key: &str) {
        self.command("PTTL", 1);
        self.arg(Arg::Key(key));
    }

    pub fn random_key(&mut self) {
        self.command("RANDOMKEY", 0);
    }

    pub fn rename(&mut self, key: &str, new_key: &str) {
        self.command("RENAME", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Key(new_key));
    }

    pub fn rename_nx(&mut self, key: &str, new_key: &str) {
        self.command("RENAMENX", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Key(new_key));
    }

    /// `RESTORE` from a `DUMP` payload; the ttl is sent in milliseconds.
    /// A negative `frequency` omits the `FREQ` clause, zero `idletime`
    /// omits `IDLETIME`.
    pub fn restore(
        &mut self,
        key: &str,
        ttl: Duration,
        data: &[u8],
        replace: bool,
        idletime: i64,
        frequency: i64,
    ) {
        let mut argc = 3;
        if replace {
            argc += 1;
        }
        if idletime > 0 {
            argc += 2;
        }
        if frequency >= 0 {
            argc += 2;
        }
        self.command("RESTORE", argc);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(millis(ttl)));
        self.arg(Arg::Raw(data));
        if replace {
            self.arg(Arg::String("REPLACE"));
        }
        if idletime > 0 {
            self.arg(Arg::String("IDLETIME"));
            self.arg(Arg::Int(idletime));
        }
        if frequency >= 0 {
            self.arg(Arg::String("FREQ"));
            self.arg(Arg::Int(frequency));
        }
    }

    /// `SORT` with the full option set.
    pub fn sort(&mut self, key: &str, options: &Sort<'_>) {
        let mut argc = 1 + 2 * options.get.len() + limit_argc(options.offset, options.count);
        if options.by.is_some() {
            argc += 2;
        }
        if options.desc {
            argc += 1;
        }
        if options.alpha {
            argc += 1;
        }
        if options.store.is_some() {
            argc += 2;
        }
        self.command("SORT", argc);
        self.arg(Arg::Key(key));
        if let Some(by) = options.by {
            self.arg(Arg::String("BY"));
            self.arg(Arg::String(by));
        }
        self.limit(options.offset, options.count);
        for &pattern in options.get {
            self.arg(Arg::String("GET"));
            self.arg(Arg::String(pattern));
        }
        if options.desc {
            self.arg(Arg::String("DESC"));
        }
        if options.alpha {
            self.arg(Arg::String("ALPHA"));
        }
        if let Some(store) = options.store {
            self.arg(Arg::String("STORE"));
            self.arg(Arg::Key(store));
        }
    }

    pub fn touch(&mut self, keys: &[&str]) {
        self.key_list("TOUCH", keys);
    }

    pub fn ttl(&mut self, key: &str) {
        self.command("TTL", 1);
        self.arg(Arg::Key(key));
    }

    /// `TYPE key`.
    pub fn key_type(&mut self, key: &str) {
        self.command("TYPE", 1);
        self.arg(Arg::Key(key));
    }

    pub fn unlink(&mut self, keys: &[&str]) {
        self.key_list("UNLINK", keys);
    }

    /// `WAIT` for synchronous replication; the timeout is sent in seconds.
    pub fn wait(&mut self, replicas: i64, timeout: Duration) {
        self.command("WAIT", 2);
        self.arg(Arg::Int(replicas));
        self.arg(Arg::Int(seconds(timeout)));
    }

    fn key_list(&mut self, name: &str, keys: &[&str]) {
        self.command(name, keys.len());
        for &key in keys {
            self.arg(Arg::Key(key));
        }
    }

    fn limit(&mut self, offset: i64, count: i64) {
        if offset != 0 || count != 0 {
            self.arg(Arg::String("LIMIT"));
            self.arg(Arg::Int(offset));
            self.arg(Arg::Int(count));
        }
    }
}

/// Hash commands.
impl Pipeline {
    pub fn hdel(&mut self, key: &str, fields: &[&str]) {
        self.command("HDEL", fields.len() + 1);
        self.arg(Arg::Key(key));
        for &field in fields {
            self.arg(Arg::String(field));
        }
    }

    pub fn hexists(&mut self, key: &str, field: &str) {
        self.command("HEXISTS", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(field));
    }

    pub fn hget(&mut self, key: &str, field: &str) {
        self.command("HGET", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(field));
    }

    pub fn hgetall(&mut self, key: &str) {
        self.command("HGETALL", 1);
        self.arg(Arg::Key(key));
    }

    pub fn hincr_by(&mut self, key: &str, field: &str, n: i64) {
        self.command("HINCRBY", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(field));
        self.arg(Arg::Int(n));
    }

    pub fn hincr_by_float(&mut self, key: &str, field: &str, f: f64) {
        self.command("HINCRBYFLOAT", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(field));
        self.arg(Arg::Float(f));
    }

    pub fn hkeys(&mut self, key: &str) {
        self.command("HKEYS", 1);
        self.arg(Arg::Key(key));
    }

    pub fn hlen(&mut self, key: &str) {
        self.command("HLEN", 1);
        self.arg(Arg::Key(key));
    }

    pub fn hmget(&mut self, key: &str, fields: &[&str]) {
        self.command("HMGET", fields.len() + 1);
        self.arg(Arg::Key(key));
        for &field in fields {
            self.arg(Arg::String(field));
        }
    }

    pub fn hmset(&mut self, key: &str, pairs: &[KV<'_>]) {
        self.command("HMSET", pairs.len() * 2 + 1);
        self.arg(Arg::Key(key));
        for pair in pairs {
            self.arg(Arg::String(pair.key));
            self.arg(pair.arg);
        }
    }

    pub fn hset(&mut self, key: &str, field: &str, value: Arg<'_>) {
        self.command("HSET", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(field));
        self.arg(value);
    }

    pub fn hset_nx(&mut self, key: &str, field: &str, value: Arg<'_>) {
        self.command("HSETNX", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(field));
        self.arg(value);
    }

    pub fn hstrlen(&mut self, key: &str, field: &str) {
        self.command("HSTRLEN", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(field));
    }

    pub fn hvals(&mut self, key: &str) {
        self.command("HVALS", 1);
        self.arg(Arg::Key(key));
    }
}

/// List commands. The blocking variants are normally issued through the
/// connection helpers, which translate null replies into timeouts.
impl Pipeline {
    pub fn blpop(&mut self, timeout: Duration, keys: &[&str]) {
        self.blocking_pop("BLPOP", timeout, keys);
    }

    pub fn brpop(&mut self, timeout: Duration, keys: &[&str]) {
        self.blocking_pop("BRPOP", timeout, keys);
    }

    pub fn brpoplpush(&mut self, src: &str, dst: &str, timeout: Duration) {
        self.command("BRPOPLPUSH", 3);
        self.arg(Arg::Key(src));
        self.arg(Arg::Key(dst));
        self.arg(Arg::Int(seconds(timeout)));
    }

    fn blocking_pop(&mut self, name: &str, timeout: Duration, keys: &[&str]) {
        self.command(name, keys.len() + 1);
        for &key in keys {
            self.arg(Arg::Key(key));
        }
        self.arg(Arg::Int(seconds(timeout)));
    }

    pub fn lindex(&mut self, key: &str, index: i64) {
        self.command("LINDEX", 2);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(index));
    }

    pub fn linsert_before(&mut self, key: &str, pivot: Arg<'_>, value: Arg<'_>) {
        self.linsert("BEFORE", key, pivot, value);
    }

    pub fn linsert_after(&mut self, key: &str, pivot: Arg<'_>, value: Arg<'_>) {
        self.linsert("AFTER", key, pivot, value);
    }

    fn linsert(&mut self, position: &str, key: &str, pivot: Arg<'_>, value: Arg<'_>) {
        self.command("LINSERT", 4);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(position));
        self.arg(pivot);
        self.arg(value);
    }

    pub fn llen(&mut self, key: &str) {
        self.command("LLEN", 1);
        self.arg(Arg::Key(key));
    }

    pub fn lpop(&mut self, key: &str) {
        self.command("LPOP", 1);
        self.arg(Arg::Key(key));
    }

    pub fn lpush(&mut self, key: &str, values: &[Arg<'_>]) {
        self.command("LPUSH", values.len() + 1);
        self.arg(Arg::Key(key));
        for &value in values {
            self.arg(value);
        }
    }

    pub fn lpush_x(&mut self, key: &str, value: Arg<'_>) {
        self.command("LPUSHX", 2);
        self.arg(Arg::Key(key));
        self.arg(value);
    }

    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) {
        self.command("LRANGE", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(start));
        self.arg(Arg::Int(stop));
    }

    pub fn lrem(&mut self, key: &str, count: i64, value: Arg<'_>) {
        self.command("LREM", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(count));
        self.arg(value);
    }

    pub fn lset(&mut self, key: &str, index: i64, value: Arg<'_>) {
        self.command("LSET", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(index));
        self.arg(value);
    }

    pub fn ltrim(&mut self, key: &str, start: i64, stop: i64) {
        self.command("LTRIM", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(start));
        self.arg(Arg::Int(stop));
    }

    pub fn rpop(&mut self, key: &str) {
        self.command("RPOP", 1);
        self.arg(Arg::Key(key));
    }

    pub fn rpoplpush(&mut self, src: &str, dst: &str) {
        self.command("RPOPLPUSH", 2);
        self.arg(Arg::Key(src));
        self.arg(Arg::Key(dst));
    }

    pub fn rpush(&mut self, key: &str, values: &[Arg<'_>]) {
        self.command("RPUSH", values.len() + 1);
        self.arg(Arg::Key(key));
        for &value in values {
            self.arg(value);
        }
    }

    pub fn rpush_x(&mut self, key: &str, value: Arg<'_>) {
        self.command("RPUSHX", 2);
        self.arg(Arg::Key(key));
        self.arg(value);
    }
}

/// Set commands.
impl Pipeline {
    pub fn sadd(&mut self, key: &str, members: &[Arg<'_>]) {
        self.member_list("SADD", key, members);
    }

    pub fn scard(&mut self, key: &str) {
        self.command("SCARD", 1);
        self.arg(Arg::Key(key));
    }

    pub fn sdiff(&mut self, keys: &[&str]) {
        self.key_list("SDIFF", keys);
    }

    pub fn sdiff_store(&mut self, dst: &str, keys: &[&str]) {
        self.store_key_list("SDIFFSTORE", dst, keys);
    }

    pub fn sinter(&mut self, keys: &[&str]) {
        self.key_list("SINTER", keys);
    }

    pub fn sinter_store(&mut self, dst: &str, keys: &[&str]) {
        self.store_key_list("SINTERSTORE", dst, keys);
    }

    pub fn sismember(&mut self, key: &str, member: Arg<'_>) {
        self.command("SISMEMBER", 2);
        self.arg(Arg::Key(key));
        self.arg(member);
    }

    pub fn smembers(&mut self, key: &str) {
        self.command("SMEMBERS", 1);
        self.arg(Arg::Key(key));
    }

    /// `SMOVE` a member from one set to another.
    pub fn smove(&mut self, src: &str, dst: &str, member: Arg<'_>) {
        self.command("SMOVE", 3);
        self.arg(Arg::Key(src));
        self.arg(Arg::Key(dst));
        self.arg(member);
    }

    /// `SPOP`; a positive `count` pops that many members.
    pub fn spop(&mut self, key: &str, count: i64) {
        self.keyed_count("SPOP", key, count);
    }

    /// `SRANDMEMBER`; a positive `count` samples that many members.
    pub fn srand_member(&mut self, key: &str, count: i64) {
        self.keyed_count("SRANDMEMBER", key, count);
    }

    fn keyed_count(&mut self, name: &str, key: &str, count: i64) {
        if count > 0 {
            self.command(name, 2);
            self.arg(Arg::Key(key));
            self.arg(Arg::Int(count));
        } else {
            self.command(name, 1);
            self.arg(Arg::Key(key));
        }
    }

    pub fn srem(&mut self, key: &str, members: &[Arg<'_>]) {
        self.member_list("SREM", key, members);
    }

    pub fn sunion(&mut self, keys: &[&str]) {
        self.key_list("SUNION", keys);
    }

    pub fn sunion_store(&mut self, dst: &str, keys: &[&str]) {
        self.store_key_list("SUNIONSTORE", dst, keys);
    }

    fn member_list(&mut self, name: &str, key: &str, members: &[Arg<'_>]) {
        self.command(name, members.len() + 1);
        self.arg(Arg::Key(key));
        for &member in members {
            self.arg(member);
        }
    }

    fn store_key_list(&mut self, name: &str, dst: &str, keys: &[&str]) {
        self.command(name, keys.len() + 1);
        self.arg(Arg::Key(dst));
        for &key in keys {
            self.arg(Arg::Key(key));
        }
    }
}

/// Sorted set commands.
impl Pipeline {
    /// `ZADD` with an update mode and the `CH` (report changed) flag.
    pub fn zadd(&mut self, key: &str, mode: SetMode, changed: bool, members: &[ZMember<'_>]) {
        let mut argc = 1 + 2 * members.len();
        if mode != SetMode::Always {
            argc += 1;
        }
        if changed {
            argc += 1;
        }
        self.command("ZADD", argc);
        self.arg(Arg::Key(key));
        match mode {
            SetMode::Always => {}
            SetMode::Nx => self.arg(Arg::String("NX")),
            SetMode::Xx => self.arg(Arg::String("XX")),
        }
        if changed {
            self.arg(Arg::String("CH"));
        }
        for m in members {
            self.arg(Arg::Float(m.score));
            self.arg(Arg::String(m.member));
        }
    }

    pub fn zcard(&mut self, key: &str) {
        self.command("ZCARD", 1);
        self.arg(Arg::Key(key));
    }

    pub fn zcount(&mut self, key: &str, min: f64, max: f64) {
        self.command("ZCOUNT", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Float(min));
        self.arg(Arg::Float(max));
    }

    pub fn zincr_by(&mut self, key: &str, delta: f64, member: Arg<'_>) {
        self.command("ZINCRBY", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Float(delta));
        self.arg(member);
    }

    /// `ZADD NX INCR`: increment only if the member does not exist yet.
    pub fn zincr_by_nx(&mut self, key: &str, delta: f64, member: Arg<'_>) {
        self.zincr_flagged("NX", key, delta, member);
    }

    /// `ZADD XX INCR`: increment only if the member already exists.
    pub fn zincr_by_xx(&mut self, key: &str, delta: f64, member: Arg<'_>) {
        self.zincr_flagged("XX", key, delta, member);
    }

    fn zincr_flagged(&mut self, flag: &str, key: &str, delta: f64, member: Arg<'_>) {
        self.command("ZADD", 4);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(flag));
        self.arg(Arg::String("INCR"));
        self.arg(Arg::Float(delta));
        self.arg(member);
    }

    /// `ZINTERSTORE`. The leading run of [`Arg::Key`]-tagged values
    /// names the source sets; any remaining values become `WEIGHTS`.
    pub fn zinter_store(&mut self, dst: &str, keys_and_weights: &[Arg<'_>]) {
        self.zstore("ZINTERSTORE", dst, keys_and_weights);
    }

    /// `ZUNIONSTORE`; same key/weight split as [`zinter_store`].
    ///
    /// [`zinter_store`]: Pipeline::zinter_store
    pub fn zunion_store(&mut self, dst: &str, keys_and_weights: &[Arg<'_>]) {
        self.zstore("ZUNIONSTORE", dst, keys_and_weights);
    }

    fn zstore(&mut self, name: &str, dst: &str, keys_and_weights: &[Arg<'_>]) {
        let numkeys = keys_and_weights.iter().take_while(|a| a.is_key()).count();
        let weights = &keys_and_weights[numkeys..];
        let mut argc = 2 + keys_and_weights.len();
        if !weights.is_empty() {
            argc += 1;
        }
        self.command(name, argc);
        self.arg(Arg::Key(dst));
        self.arg(Arg::Int(numkeys as i64));
        for &key in &keys_and_weights[..numkeys] {
            self.arg(key);
        }
        if !weights.is_empty() {
            self.arg(Arg::String("WEIGHTS"));
            for &weight in weights {
                self.arg(weight);
            }
        }
    }

    pub fn zlex_count(&mut self, key: &str, min: &str, max: &str) {
        self.command("ZLEXCOUNT", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(min));
        self.arg(Arg::String(max));
    }

    /// `ZPOPMAX`; a positive `count` pops that many members.
    pub fn zpop_max(&mut self, key: &str, count: i64) {
        self.keyed_count("ZPOPMAX", key, count);
    }

    /// `ZPOPMIN`; a positive `count` pops that many members.
    pub fn zpop_min(&mut self, key: &str, count: i64) {
        self.keyed_count("ZPOPMIN", key, count);
    }

    pub fn zrange(&mut self, key: &str, start: i64, stop: i64, with_scores: bool) {
        self.command("ZRANGE", if with_scores { 4 } else { 3 });
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(start));
        self.arg(Arg::Int(stop));
        if with_scores {
            self.arg(Arg::String("WITHSCORES"));
        }
    }

    /// `ZRANGEBYLEX` with an optional `LIMIT` clause.
    pub fn zrange_by_lex(&mut self, key: &str, min: &str, max: &str, offset: i64, count: i64) {
        self.command("ZRANGEBYLEX", 3 + limit_argc(offset, count));
        self.arg(Arg::Key(key));
        self.arg(Arg::String(min));
        self.arg(Arg::String(max));
        self.limit(offset, count);
    }

    /// `ZRANGEBYSCORE` with optional scores and `LIMIT` clause.
    pub fn zrange_by_score(
        &mut self,
        key: &str,
        min: f64,
        max: f64,
        with_scores: bool,
        offset: i64,
        count: i64,
    ) {
        let mut argc = 3 + limit_argc(offset, count);
        if with_scores {
            argc += 1;
        }
        self.command("ZRANGEBYSCORE", argc);
        self.arg(Arg::Key(key));
        self.arg(Arg::Float(min));
        self.arg(Arg::Float(max));
        if with_scores {
            self.arg(Arg::String("WITHSCORES"));
        }
        self.limit(offset, count);
    }

    pub fn zrank(&mut self, key: &str, member: Arg<'_>) {
        self.command("ZRANK", 2);
        self.arg(Arg::Key(key));
        self.arg(member);
    }

    pub fn zrem(&mut self, key: &str, members: &[Arg<'_>]) {
        self.member_list("ZREM", key, members);
    }

    pub fn zrem_range_by_lex(&mut self, key: &str, min: &str, max: &str) {
        self.command("ZREMRANGEBYLEX", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::String(min));
        self.arg(Arg::String(max));
    }

    pub fn zrem_range_by_rank(&mut self, key: &str, start: i64, stop: i64) {
        self.command("ZREMRANGEBYRANK", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Int(start));
        self.arg(Arg::Int(stop));
    }

    pub fn zrem_range_by_score(&mut self, key: &str, min: f64, max: f64) {
        self.command("ZREMRANGEBYSCORE", 3);
        self.arg(Arg::Key(key));
        self.arg(Arg::Float(min));
        self.arg(Arg::Float(max));
    }

    pub fn zrev_rank(&mut self, key: &str, member: Arg<'_>) {
        self.command("ZREVRANK", 2);
        self.arg(Arg::Key(key));
        self.arg(member);
    }

    pub fn zscore(&mut self, key: &str, member: Arg<'_>) {
        self.command("ZSCORE", 2);
        self.arg(Arg::Key(key));
        self.arg(member);
    }

    pub fn bzpop_min(&mut self, timeout: Duration, keys: &[&str]) {
        self.blocking_pop("BZPOPMIN", timeout, keys);
    }

    pub fn bzpop_max(&mut self, timeout: Duration, keys: &[&str]) {
        self.blocking_pop("BZPOPMAX", timeout, keys);
    }
}

/// HyperLogLog commands.
impl Pipeline {
    pub fn pfadd(&mut self, key: &str, elements: &[&str]) {
        self.command("PFADD", elements.len() + 1);
        self.arg(Arg::Key(key));
        for &element in elements {
            self.arg(Arg::String(element));
        }
    }

    pub fn pfcount(&mut self, keys: &[&str]) {
        self.key_list("PFCOUNT", keys);
    }

    pub fn pfmerge(&mut self, dst: &str, src: &[&str]) {
        self.store_key_list("PFMERGE", dst, src);
    }
}

/// Scan-family commands. A non-positive `count` falls back to the
/// server's default page size.
impl Pipeline {
    pub fn scan(&mut self, cursor: i64, pattern: Option<&str>, count: i64) {
        let count = if count > 0 { count } else { DEFAULT_SCAN_COUNT };
        match pattern {
            Some(pattern) => {
                self.command("SCAN", 5);
                self.arg(Arg::Int(cursor));
                self.arg(Arg::String("MATCH"));
                self.arg(Arg::String(pattern));
                self.arg(Arg::String("COUNT"));
                self.arg(Arg::Int(count));
            }
            None => {
                self.command("SCAN", 3);
                self.arg(Arg::Int(cursor));
                self.arg(Arg::String("COUNT"));
                self.arg(Arg::Int(count));
            }
        }
    }

    pub fn sscan(&mut self, key: &str, cursor: i64, pattern: Option<&str>, count: i64) {
        self.keyed_scan("SSCAN", key, cursor, pattern, count);
    }

    pub fn hscan(&mut self, key: &str, cursor: i64, pattern: Option<&str>, count: i64) {
        self.keyed_scan("HSCAN", key, cursor, pattern, count);
    }

    pub fn zscan(&mut self, key: &str, cursor: i64, pattern: Option<&str>, count: i64) {
        self.keyed_scan("ZSCAN", key, cursor, pattern, count);
    }

    fn keyed_scan(&mut self, name: &str, key: &str, cursor: i64, pattern: Option<&str>, count: i64) {
        let count = if count > 0 { count } else { DEFAULT_SCAN_COUNT };
        match pattern {
            Some(pattern) => {
                self.command(name, 6);
                self.arg(Arg::Key(key));
                self.arg(Arg::Int(cursor));
                self.arg(Arg::String("MATCH"));
                self.arg(Arg::String(pattern));
                self.arg(Arg::String("COUNT"));
                self.arg(Arg::Int(count));
            }
            None => {
                self.command(name, 4);
                self.arg(Arg::Key(key));
                self.arg(Arg::Int(cursor));
                self.arg(Arg::String("COUNT"));
                self.arg(Arg::Int(count));
            }
        }
    }
}

/// Transaction commands.
impl Pipeline {
    /// `MULTI`: start a transaction block.
    pub fn multi(&mut self) {
        self.command("MULTI", 0);
    }

    /// `EXEC`: run all commands queued since `MULTI`.
    pub fn exec(&mut self) {
        self.command("EXEC", 0);
    }

    /// `DISCARD`: drop all commands queued since `MULTI`.
    pub fn discard(&mut self) {
        self.command("DISCARD", 0);
    }

    /// `WATCH` keys to condition the next transaction on.
    pub fn watch(&mut self, keys: &[&str]) {
        self.key_list("WATCH", keys);
    }

    /// `UNWATCH`: forget all watched keys.
    pub fn unwatch(&mut self) {
        self.command("UNWATCH", 0);
    }
}

/// Scripting commands.
impl Pipeline {
    /// `EVAL`. The number of keys is the length of the leading run of
    /// [`Arg::Key`]-tagged arguments.
    pub fn eval(&mut self, script: &str, keys_and_args: &[Arg<'_>]) {
        self.scripted("EVAL", script, keys_and_args);
    }

    /// `EVALSHA` against a previously loaded script digest.
    pub fn evalsha(&mut self, sha1: &str, keys_and_args: &[Arg<'_>]) {
        self.scripted("EVALSHA", sha1, keys_and_args);
    }

    fn scripted(&mut self, name: &str, body: &str, keys_and_args: &[Arg<'_>]) {
        let numkeys = keys_and_args.iter().take_while(|a| a.is_key()).count();
        self.command(name, keys_and_args.len() + 2);
        self.arg(Arg::String(body));
        self.arg(Arg::Int(numkeys as i64));
        for &a in keys_and_args {
            self.arg(a);
        }
    }

    pub fn script_load(&mut self, script: &str) {
        self.command("SCRIPT", 2);
        self.arg(Arg::String("LOAD"));
        self.arg(Arg::String(script));
    }

    pub fn script_exists(&mut self, sha1s: &[&str]) {
        self.command("SCRIPT", sha1s.len() + 1);
        self.arg(Arg::String("EXISTS"));
        for &sha1 in sha1s {
            self.arg(Arg::String(sha1));
        }
    }

    pub fn script_debug(&mut self, debug: bool) {
        self.command("SCRIPT", 2);
        self.arg(Arg::String("DEBUG"));
        self.arg(Arg::String(if debug { "YES" } else { "NO" }));
    }

    pub fn script_debug_sync(&mut self) {
        self.command("SCRIPT", 2);
        self.arg(Arg::String("DEBUG"));
        self.arg(Arg::String("SYNC"));
    }

    pub fn script_flush(&mut self) {
        self.command("SCRIPT", 1);
        self.arg(Arg::String("FLUSH"));
    }

    pub fn script_kill(&mut self) {
        self.command("SCRIPT", 1);
        self.arg(Arg::String("KILL"));
    }
}

/// Server commands.
impl Pipeline {
    pub fn bgrewriteaof(&mut self) {
        self.command("BGREWRITEAOF", 0);
    }

    pub fn bgsave(&mut self) {
        self.command("BGSAVE", 0);
    }

    pub fn dbsize(&mut self) {
        self.command("DBSIZE", 0);
    }

    pub fn flushdb(&mut self) {
        self.command("FLUSHDB", 0);
    }

    pub fn flushall(&mut self) {
        self.command("FLUSHALL", 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redpool_resp::pair;

    #[test]
    fn hget_reads_rather_than_writes() {
        let mut p = Pipeline::new();
        p.hget("h", "f");
        assert_eq!(p.as_bytes(), b"*3\r\n$4\r\nHGET\r\n$1\r\nh\r\n$1\r\nf\r\n");
    }

    #[test]
    fn set_with_ttl_uses_px() {
        let mut p = Pipeline::new();
        p.set("k", Arg::String("v"), Duration::from_secs(1));
        assert_eq!(
            p.as_bytes(),
            b"*5\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nPX\r\n$4\r\n1000\r\n"
        );

        p.reset();
        p.set("k", Arg::String("v"), Duration::ZERO);
        assert_eq!(p.as_bytes(), b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n");
    }

    #[test]
    fn set_nx_appends_the_flag() {
        let mut p = Pipeline::new();
        p.set_nx("k", Arg::String("v"), Duration::ZERO);
        assert_eq!(
            p.as_bytes(),
            b"*4\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nNX\r\n"
        );
    }

    #[test]
    fn mset_interleaves_pairs() {
        let mut p = Pipeline::new();
        p.mset(&[pair("a", Arg::Int(1)), pair("b", Arg::Int(2))]);
        assert_eq!(
            p.as_bytes(),
            b"*5\r\n$4\r\nMSET\r\n$1\r\na\r\n$1\r\n1\r\n$1\r\nb\r\n$1\r\n2\r\n"
        );
    }

    #[test]
    fn keyed_scans_order_key_before_cursor() {
        let mut p = Pipeline::new();
        p.sscan("s", 7, None, 0);
        assert_eq!(
            p.as_bytes(),
            b"*5\r\n$5\r\nSSCAN\r\n$1\r\ns\r\n$1\r\n7\r\n$5\r\nCOUNT\r\n$2\r\n10\r\n"
        );

        p.reset();
        p.hscan("h", 0, Some("f*"), 5);
        assert_eq!(
            p.as_bytes(),
            b"*7\r\n$5\r\nHSCAN\r\n$1\r\nh\r\n$1\r\n0\r\n$5\r\nMATCH\r\n$2\r\nf*\r\n$5\r\nCOUNT\r\n$1\r\n5\r\n"
        );
    }

    #[test]
    fn eval_counts_the_leading_key_run() {
        let mut p = Pipeline::new();
        p.evalsha(
            "abc",
            &[
                Arg::Key("k1"),
                Arg::Key("k2"),
                Arg::String("a1"),
                Arg::String("a2"),
            ],
        );
        assert_eq!(
            p.as_bytes(),
            b"*7\r\n$7\r\nEVALSHA\r\n$3\r\nabc\r\n$1\r\n2\r\n\
$2\r\nk1\r\n$2\r\nk2\r\n$2\r\na1\r\n$2\r\na2\r\n"
        );
    }

    #[test]
    fn keys_after_a_value_do_not_count_for_eval() {
        let mut p = Pipeline::new();
        p.eval(
            "return 1",
            &[Arg::Key("k1"), Arg::String("a1"), Arg::Key("k2")],
        );
        let wire = p.as_bytes();
        let numkeys_at = b"$8\r\nreturn 1\r\n".len() + b"*6\r\n$4\r\nEVAL\r\n".len();
        assert_eq!(&wire[numkeys_at..numkeys_at + 7], b"$1\r\n1\r\n");
    }

    #[test]
    fn blocking_pops_put_the_timeout_last() {
        let mut p = Pipeline::new();
        p.blpop(Duration::from_secs(3), &["a", "b"]);
        assert_eq!(
            p.as_bytes(),
            b"*4\r\n$5\r\nBLPOP\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\n3\r\n"
        );
    }

    #[test]
    fn zadd_emits_mode_and_changed_flags() {
        let mut p = Pipeline::new();
        p.zadd("z", SetMode::Nx, true, &[z(1.5, "a"), z(2.0, "b")]);
        assert_eq!(
            p.as_bytes(),
            b"*8\r\n$4\r\nZADD\r\n$1\r\nz\r\n$2\r\nNX\r\n$2\r\nCH\r\n\
$3\r\n1.5\r\n$1\r\na\r\n$3\r\n2.0\r\n$1\r\nb\r\n"
        );

        p.reset();
        p.zadd("z", SetMode::Always, false, &[z(1.0, "a")]);
        assert_eq!(
            p.as_bytes(),
            b"*4\r\n$4\r\nZADD\r\n$1\r\nz\r\n$3\r\n1.0\r\n$1\r\na\r\n"
        );
    }

    #[test]
    fn zstore_derives_numkeys_from_the_key_run() {
        let mut p = Pipeline::new();
        p.zinter_store("dst", &[Arg::Key("a"), Arg::Key("b"), Arg::Int(2), Arg::Int(3)]);
        assert_eq!(
            p.as_bytes(),
            b"*8\r\n$11\r\nZINTERSTORE\r\n$3\r\ndst\r\n$1\r\n2\r\n$1\r\na\r\n$1\r\nb\r\n\
$7\r\nWEIGHTS\r\n$1\r\n2\r\n$1\r\n3\r\n"
        );

        p.reset();
        p.zunion_store("dst", &[Arg::Key("a"), Arg::Key("b")]);
        assert_eq!(
            p.as_bytes(),
            b"*5\r\n$11\r\nZUNIONSTORE\r\n$3\r\ndst\r\n$1\r\n2\r\n$1\r\na\r\n$1\r\nb\r\n"
        );
    }

    #[test]
    fn zrange_by_score_appends_scores_and_limit() {
        let mut p = Pipeline::new();
        p.zrange_by_score("z", 1.0, 2.5, true, 0, 10);
        assert_eq!(
            p.as_bytes(),
            b"*8\r\n$13\r\nZRANGEBYSCORE\r\n$1\r\nz\r\n$3\r\n1.0\r\n$3\r\n2.5\r\n\
$10\r\nWITHSCORES\r\n$5\r\nLIMIT\r\n$1\r\n0\r\n$2\r\n10\r\n"
        );

        p.reset();
        p.zrange_by_lex("z", "[a", "(c", 0, 0);
        assert_eq!(
            p.as_bytes(),
            b"*4\r\n$11\r\nZRANGEBYLEX\r\n$1\r\nz\r\n$2\r\n[a\r\n$2\r\n(c\r\n"
        );
    }

    #[test]
    fn pops_take_an_optional_count() {
        let mut p = Pipeline::new();
        p.spop("s", 0);
        p.spop("s", 3);
        p.zpop_min("z", 2);
        assert_eq!(
            p.as_bytes(),
            b"*2\r\n$4\r\nSPOP\r\n$1\r\ns\r\n\
*3\r\n$4\r\nSPOP\r\n$1\r\ns\r\n$1\r\n3\r\n\
*3\r\n$7\r\nZPOPMIN\r\n$1\r\nz\r\n$1\r\n2\r\n"
        );
    }

    #[test]
    fn bit_operations_name_the_destination_first() {
        let mut p = Pipeline::new();
        p.bit_and("d", &["a", "b"]);
        assert_eq!(
            p.as_bytes(),
            b"*5\r\n$5\r\nBITOP\r\n$3\r\nAND\r\n$1\r\nd\r\n$1\r\na\r\n$1\r\nb\r\n"
        );

        p.reset();
        p.bit_not("d", "s");
        assert_eq!(
            p.as_bytes(),
            b"*4\r\n$5\r\nBITOP\r\n$3\r\nNOT\r\n$1\r\nd\r\n$1\r\ns\r\n"
        );

        p.reset();
        p.bit_pos("k", true, &[2]);
        assert_eq!(
            p.as_bytes(),
            b"*4\r\n$6\r\nBITPOS\r\n$1\r\nk\r\n$1\r\n1\r\n$1\r\n2\r\n"
        );
    }

    #[test]
    fn transactions_wrap_queued_commands() {
        let mut p = Pipeline::new();
        p.watch(&["a"]);
        p.multi();
        p.incr("a");
        p.exec();
        assert_eq!(p.len(), 4);
        assert_eq!(
            p.as_bytes(),
            b"*2\r\n$5\r\nWATCH\r\n$1\r\na\r\n\
*1\r\n$5\r\nMULTI\r\n\
*2\r\n$4\r\nINCR\r\n$1\r\na\r\n\
*1\r\n$4\r\nEXEC\r\n"
        );
    }

    #[test]
    fn sort_emits_options_in_order() {
        let mut p = Pipeline::new();
        p.sort(
            "k",
            &Sort {
                by: Some("w_*"),
                offset: 0,
                count: 10,
                get: &["#"],
                alpha: true,
                desc: false,
                store: Some("out"),
            },
        );
        assert_eq!(
            p.as_bytes(),
            b"*12\r\n$4\r\nSORT\r\n$1\r\nk\r\n$2\r\nBY\r\n$3\r\nw_*\r\n\
$5\r\nLIMIT\r\n$1\r\n0\r\n$2\r\n10\r\n$3\r\nGET\r\n$1\r\n#\r\n\
$5\r\nALPHA\r\n$5\r\nSTORE\r\n$3\r\nout\r\n"
        );
    }

    #[test]
    fn restore_skips_absent_clauses() {
        let mut p = Pipeline::new();
        p.restore("k", Duration::from_secs(1), b"blob", true, 0, -1);
        assert_eq!(
            p.as_bytes(),
            b"*5\r\n$7\r\nRESTORE\r\n$1\r\nk\r\n$4\r\n1000\r\n$4\r\nblob\r\n$7\r\nREPLACE\r\n"
        );
    }

    #[test]
    fn migrate_uses_the_multi_key_form() {
        let mut p = Pipeline::new();
        p.migrate(
            &Migrate {
                host: "h",
                port: 6380,
                db: 0,
                timeout: Duration::from_secs(1),
                copy: false,
                replace: true,
            },
            &["a"],
        );
        assert_eq!(
            p.as_bytes(),
            b"*9\r\n$7\r\nMIGRATE\r\n$1\r\nh\r\n$4\r\n6380\r\n$0\r\n\r\n$1\r\n0\r\n$1\r\n1\r\n\
$7\r\nREPLACE\r\n$4\r\nKEYS\r\n$1\r\na\r\n"
        );
    }

    #[test]
    fn expire_at_sends_epoch_milliseconds() {
        let mut p = Pipeline::new();
        p.expire_at("k", UNIX_EPOCH + Duration::from_secs(1));
        assert_eq!(
            p.as_bytes(),
            b"*3\r\n$9\r\nPEXPIREAT\r\n$1\r\nk\r\n$4\r\n1000\r\n"
        );
    }

    #[test]
    fn linsert_places_the_pivot_before_the_value() {
        let mut p = Pipeline::new();
        p.linsert_before("l", Arg::String("p"), Arg::String("v"));
        assert_eq!(
            p.as_bytes(),
            b"*5\r\n$7\r\nLINSERT\r\n$1\r\nl\r\n$6\r\nBEFORE\r\n$1\r\np\r\n$1\r\nv\r\n"
        );
    }
}
