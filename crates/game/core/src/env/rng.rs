//! RNG oracle for deterministic random number generation.
//!
//! Every roll in the reducer is derived from the run seed, the intent nonce,
//! a stream id and a per-intent draw counter. Replaying the same intents on
//! the same seed therefore reproduces the same run.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute a deterministic seed from run components.
///
/// * `game_seed` - Base seed of the run
/// * `nonce` - Intent sequence number
/// * `stream` - Subsystem drawing the roll (see [`RngStream`])
/// * `draw` - Counter for multiple rolls inside one intent
pub fn compute_seed(game_seed: u64, nonce: u64, stream: u32, draw: u32) -> u64 {
    // SplitMix64 / FxHash style combiners
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (draw as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Subsystems with independent roll sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RngStream {
    Resolve = 1,
    Director = 2,
    Spawn = 3,
    Scheduler = 4,
    Lifecycle = 5,
    Trap = 6,
    StickyNote = 7,
    Reset = 8,
}

/// Sequential roller bound to one intent.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    seed: u64,
    nonce: u64,
    stream: RngStream,
    draws: u32,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, seed: u64, nonce: u64, stream: RngStream) -> Self {
        Self {
            rng,
            seed,
            nonce,
            stream,
            draws: 0,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let seed = compute_seed(self.seed, self.nonce, self.stream as u32, self.draws);
        self.draws = self.draws.wrapping_add(1);
        self.rng.next_u32(seed)
    }

    /// True with probability `permille / 1000`.
    pub fn chance(&mut self, permille: u32) -> bool {
        permille > 0 && self.next_u32() % 1000 < permille
    }

    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.next_u32() as usize % len)
    }

    pub fn pick<'s, T>(&mut self, items: &'s [T]) -> Option<&'s T> {
        self.index(items.len()).map(|index| &items[index])
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_u32() as usize % (i + 1);
            items.swap(i, j);
        }
    }
}
