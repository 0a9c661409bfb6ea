//! Fresh-symbol generation.
//!
//! Generated code frequently needs identifiers that cannot collide with
//! anything in user source, and two independent engine instances must not
//! hand out the same name. Each generator therefore carries an instance seed
//! combining a wall-clock sample with an OS-entropy sample, stirred through
//! the same PRNG the rest of the crate uses, plus a per-instance counter.
//! A symbol looks like `gensym_1kf2xq9_5`.

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::time::{SystemTime, UNIX_EPOCH};

/// A stateful source of unique identifier strings.
#[derive(Debug)]
pub struct SymbolGenerator {
    prefix: String,
    seed: String,
    counter: u64,
}

impl SymbolGenerator {
    /// Creates a generator with the default `gensym` prefix.
    pub fn new() -> Self {
        Self::with_prefix("gensym")
    }

    /// Creates a generator whose symbols begin with `prefix`.
    ///
    /// The prefix must be a valid identifier start; everything after it is
    /// underscores, digits, and lowercase letters.
    pub fn with_prefix(prefix: &str) -> Self {
        let clock = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let mut rng = Xoshiro256StarStar::seed_from_u64(clock ^ OsRng.next_u64());
        Self {
            prefix: prefix.to_string(),
            seed: to_base36(rng.next_u64()),
            counter: 0,
        }
    }

    /// Returns a new unique identifier string.
    pub fn fresh(&mut self) -> String {
        self.counter += 1;
        format!("{}_{}_{}", self.prefix, self.seed, to_base36(self.counter))
    }
}

impl Default for SymbolGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders `n` in base 36 using digits and lowercase letters.
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
