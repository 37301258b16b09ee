//! The random source behind the `random` opcode.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Random number generation for a running game, in one of two modes.
///
/// Games seed the generator explicitly through the `random` opcode: a seed
/// of 1000 or more selects a reproducible pseudo-random stream, while a
/// small seed (1..=999) selects the predictable 1, 2, ..seed ramp that
/// games use as a test hook. An unseeded generator draws its seed from
/// system entropy. Re-seeding with 0 (returning to the unseeded mode) is
/// policy of the host, handled by constructing a fresh [`ZRand`].
pub enum ZRand {
    Seeded(StdRng),
    Predictable { last: u16, top: u16 },
}

impl ZRand {
    /// An unseeded generator for normal gameplay.
    pub fn new() -> ZRand {
        ZRand::Seeded(StdRng::from_entropy())
    }

    /// A generator for a game-supplied seed.
    pub fn from_seed(seed: u16) -> ZRand {
        if seed < 1000 {
            ZRand::Predictable { last: 0, top: seed }
        } else {
            ZRand::Seeded(StdRng::seed_from_u64(seed as u64))
        }
    }

    /// The next random value, always in the range `[1, 32767]`.
    pub fn next(&mut self) -> u16 {
        match self {
            ZRand::Seeded(rng) => rng.gen_range(1..=32767),
            ZRand::Predictable { last, top } => {
                if *last >= *top {
                    *last = 1;
                } else {
                    *last += 1;
                }
                *last
            }
        }
    }
}

impl Default for ZRand {
    fn default() -> Self {
        ZRand::new()
    }
}
