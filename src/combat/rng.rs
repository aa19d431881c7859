//! Fast PRNG for round simulation. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Source of uniform die results. Every roll the resolvers make goes through this.
pub trait DieRoller {
    /// Uniform draw in `[1, sides]`. `sides` is never zero.
    fn roll_die(&mut self, sides: u32) -> u32;
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed pulled from the operating system. Falls back to a fixed seed if the OS source is unavailable.
    pub fn entropy_seed() -> u64 {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(err) => {
                tracing::warn!("os entropy unavailable ({err}), using fixed seed");
                SPLITMIX64_GOLDEN
            }
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

impl DieRoller for Rng {
    #[inline]
    fn roll_die(&mut self, sides: u32) -> u32 {
        // Widening multiply maps the 64-bit draw onto [0, sides).
        let scaled = (u128::from(self.next_u64()) * u128::from(sides)) >> 64;
        scaled as u32 + 1
    }
}

/// Mix a run seed with a stream id (e.g. the armor class of a sweep step) into an independent seed.
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut mixer = Rng::new(seed ^ stream.wrapping_mul(SPLITMIX64_M2));
    mixer.next_u64()
}

/// Replays a fixed list of die results, in order, ignoring the requested sides.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedRolls {
    rolls: std::collections::VecDeque<u32>,
}

#[cfg(test)]
impl ScriptedRolls {
    pub(crate) fn new(rolls: &[u32]) -> Self {
        Self {
            rolls: rolls.iter().copied().collect(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

#[cfg(test)]
impl DieRoller for ScriptedRolls {
    fn roll_die(&mut self, _sides: u32) -> u32 {
        self.rolls.pop_front().expect("scripted rolls exhausted")
    }
}
