//! Shared random stream

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::MachineConfig;
use crate::engine;
use crate::error::SpinError;
use crate::money::Money;
use crate::spin::SpinResult;

/// Random stream shared between callers
///
/// Each spin holds the lock for its whole duration, so concurrent spins
/// see disjoint parts of the stream. Callers that want to avoid contention
/// take a [`fork`](SharedRng::fork) instead.
#[derive(Debug)]
pub struct SharedRng {
    inner: Mutex<ChaCha8Rng>,
}

impl SharedRng {
    /// Deterministic stream
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Stream seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            inner: Mutex::new(ChaCha8Rng::from_os_rng()),
        }
    }

    /// Spin under the lock
    pub fn spin(&self, config: &MachineConfig, wager: Money) -> Result<SpinResult, SpinError> {
        let mut rng = self.inner.lock();
        engine::spin(config, wager, &mut *rng)
    }

    /// Independent generator seeded from the shared stream
    pub fn fork(&self) -> ChaCha8Rng {
        let mut rng = self.inner.lock();
        ChaCha8Rng::from_rng(&mut *rng)
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
