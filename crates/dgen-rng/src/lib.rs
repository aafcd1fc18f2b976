//! dgen-rng: random source for dungeon generation
//!
//! Every stochastic decision of the generator goes through a [`RandomSource`]
//! value that is passed explicitly into each stage. There is no global RNG:
//! two runs that own two `DungeonRng` values never influence each other.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Abstraction over the random stream consumed by the generator.
///
/// Implementors only provide the two primitive draws; the helpers are
/// derived from them so every implementation consumes the stream the same way.
pub trait RandomSource {
    /// Returns a value in `[lo, hi)`, or `lo` when the range is empty.
    fn range(&mut self, lo: i32, hi: i32) -> i32;

    /// Returns a value in `[0.0, 1.0)`.
    fn unit_f32(&mut self) -> f32;

    /// Returns a value in `[lo, hi]`, or `lo` when `hi < lo`.
    fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi < lo {
            return lo;
        }
        self.range(lo, hi.saturating_add(1))
    }

    /// Equivalent to `rn2(n)`: returns `0..n`, 0 when `n` is 0.
    fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        let bound = n.min(i32::MAX as u32) as i32;
        self.range(0, bound) as u32
    }

    /// Fair coin flip.
    fn coin(&mut self) -> bool {
        self.rn2(2) == 0
    }

    /// Returns a value in `[0.0, max)`.
    fn range_f32(&mut self, max: f32) -> f32 {
        self.unit_f32() * max
    }
}

/// An RNG call trace entry for debugging divergences between runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RngTraceEntry {
    /// Sequence number (0-indexed)
    pub seq: u64,
    /// Draw kind ("range" or "unit_f32")
    pub func: &'static str,
    /// Lower bound of the draw, 0 when not applicable
    pub lo: i64,
    /// Upper bound of the draw, 0 when not applicable
    pub hi: i64,
    /// Result bits (floats are stored via `to_bits`)
    pub result: u64,
}

/// Dungeon random number generator
///
/// Wraps ChaCha8Rng for reproducible generation.
/// Only the seed is serialized: a restored generator restarts its stream.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
    call_count: u64,
    tracing: bool,
    trace: Vec<RngTraceEntry>,
}

impl Serialize for DungeonRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DungeonRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(DungeonRng::new(seed))
    }
}

impl DungeonRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            call_count: 0,
            tracing: false,
            trace: Vec::new(),
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(random_seed())
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws taken from the stream so far
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Start recording every draw
    pub fn enable_tracing(&mut self) {
        self.tracing = true;
        self.trace.clear();
    }

    /// Stop recording; the recorded trace is kept
    pub fn disable_tracing(&mut self) {
        self.tracing = false;
    }

    /// Draws recorded since tracing was enabled
    pub fn trace(&self) -> &[RngTraceEntry] {
        &self.trace
    }

    fn record(&mut self, func: &'static str, lo: i64, hi: i64, result: u64) {
        self.call_count += 1;
        if self.tracing {
            self.trace.push(RngTraceEntry {
                seq: self.call_count - 1,
                func,
                lo,
                hi,
                result,
            });
        }
    }
}

impl RandomSource for DungeonRng {
    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let res = self.rng.gen_range(lo..hi);
        self.record("range", lo as i64, hi as i64, res as i64 as u64);
        res
    }

    fn unit_f32(&mut self) -> f32 {
        let res: f32 = self.rng.gen_range(0.0..1.0);
        self.record("unit_f32", 0, 1, res.to_bits() as u64);
        res
    }
}

impl Default for DungeonRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Fresh seed for callers that want a random dungeon.
///
/// Kept below `i32::MAX` so seeds stay interchangeable with hosts that store
/// them as 32-bit integers.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..i32::MAX as u64)
}
