//! The simulation's pseudo-random number generator.
//!
//! Every stochastic choice in a run (service sizes, interarrival gaps,
//! routing draws) consumes this generator, so a run is a pure function of
//! its seed. SplitMix64 doubles as the seed-derivation function for
//! replications: the per-replication seeds produced by
//! [`replication_seed`] are bit-identical across any implementation of the
//! algorithm, which keeps replication outputs comparable across ports of
//! this simulator.

use rand::{RngCore, SeedableRng};

/// Weyl-sequence increment from Steele et al., "Fast Splittable
/// Pseudorandom Number Generators".
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64: a 64-bit state, 64-bit output generator.
///
/// Small, fast, and equidistributed enough for Monte-Carlo event
/// simulation; not cryptographic.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RngCore for SplitMix64 {
    fn next_u32(&mut self) -> u32 {
        self.next() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u64::from_le_bytes(seed),
        }
    }

    fn seed_from_u64(state: u64) -> Self {
        // The default implementation scrambles the seed through an
        // intermediate generator; replication seeding needs the state
        // installed verbatim.
        Self { state }
    }
}

/// Derives the seed for replication `index` from a base seed.
///
/// The derived seed is one SplitMix64 output step of
/// `base_seed + index * GOLDEN_GAMMA`, so consecutive indices land on
/// decorrelated streams while remaining reproducible from `(base_seed,
/// index)` alone: replication `i` draws the same numbers no matter which
/// worker thread runs it.
pub fn replication_seed(base_seed: u64, index: u64) -> u64 {
    SplitMix64::seed_from_u64(base_seed.wrapping_add(index.wrapping_mul(GOLDEN_GAMMA))).next()
}
