//! Opaque record identifiers.
//!
//! Ids are random hex strings with no structure. The strong tier draws four
//! 32-bit words from the OS CSPRNG and hex encodes each without padding, so
//! an id carries 128 bits. When the OS source fails (or the generator is
//! built with [`IdGenerator::fallback_only`]) ids are the hex digits of a
//! pseudo-random fraction followed by the current Unix time in milliseconds,
//! also in hex. Fallback ids come from a timestamp-seeded PRNG and have far
//! weaker collision resistance.
//!
//! No uniqueness check is made against stored records.

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// OS randomness, falling back to the PRNG if it is unavailable.
    Strong,
    /// Timestamp-seeded PRNG only.
    Fallback,
}

pub struct IdGenerator {
    strategy: IdStrategy,
    fallback: Mutex<SmallRng>,
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::with_strategy(IdStrategy::Strong)
    }

    pub fn fallback_only() -> Self {
        Self::with_strategy(IdStrategy::Fallback)
    }

    pub fn with_strategy(strategy: IdStrategy) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self {
            strategy,
            fallback: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    pub fn next_id(&self) -> String {
        if self.strategy == IdStrategy::Strong {
            match strong_id() {
                Ok(id) => return id,
                Err(e) => warn!("OS randomness unavailable, using fallback ids: {e}"),
            }
        }
        self.fallback_id()
    }

    fn fallback_id(&self) -> String {
        // 52 bits, the mantissa width of the fraction the id format mimics.
        let fraction = {
            let mut rng = self.fallback.lock().unwrap_or_else(PoisonError::into_inner);
            rng.random::<u64>() >> 12
        };
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("{:013x}{:x}", fraction, millis)
    }
}

fn strong_id() -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|word| format!("{:x}", u32::from_le_bytes([word[0], word[1], word[2], word[3]])))
        .collect())
}
