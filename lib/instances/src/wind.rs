//! Reproducible wind parameters derived from an instance's file name.
//!
//! Every draw builds its own generator from an explicit [`InstanceSeed`], so the value returned
//! for a name never depends on what else the process has sampled.
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand::distributions::Uniform;

pub const UNIFORM_WIND_MIN_MS: f64 = 3.0;
pub const UNIFORM_WIND_MAX_MS: f64 = 8.0;

/// Rayleigh scale of the reference wind climate (Barcelona).
pub const RAYLEIGH_SIGMA: f64 = 2.79;

/// Offset between the uniform and the Rayleigh seed of the same instance.
pub const RAYLEIGH_SEED_OFFSET: u64 = 1000;

/// Replaces a uniform draw of exactly zero before taking its logarithm.
pub const MIN_UNIFORM_DRAW: f64 = 1e-9;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InstanceSeed(u64);

impl InstanceSeed {
  /// BLAKE3 digest of the UTF-8 bytes of `name`, reduced to its first 8 bytes (little endian).
  pub fn from_name(name: &str) -> Self {
    let digest = blake3::hash(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    InstanceSeed(u64::from_le_bytes(bytes))
  }

  #[inline]
  pub fn offset(self, k: u64) -> Self {
    InstanceSeed(self.0.wrapping_add(k))
  }

  #[inline]
  pub fn raw(self) -> u64 { self.0 }

  fn rng(self) -> StdRng {
    StdRng::seed_from_u64(self.0)
  }
}

impl From<u64> for InstanceSeed {
  fn from(raw: u64) -> Self { InstanceSeed(raw) }
}

/// Wind speed (m/s) drawn uniformly from `[UNIFORM_WIND_MIN_MS, UNIFORM_WIND_MAX_MS]`.
pub fn uniform_wind(seed: InstanceSeed) -> f64 {
  seed.rng().sample(Uniform::new_inclusive(UNIFORM_WIND_MIN_MS, UNIFORM_WIND_MAX_MS))
}

/// Wind speed (m/s) drawn from a Rayleigh distribution with scale `sigma` by inverse transform.
pub fn rayleigh_wind(seed: InstanceSeed, sigma: f64) -> f64 {
  let u: f64 = seed.rng().gen();
  let u = if u <= 0.0 { MIN_UNIFORM_DRAW } else { u };
  rayleigh_quantile(u, sigma)
}

/// Inverse CDF of the Rayleigh distribution, `u` in `(0, 1)`.
#[inline]
pub fn rayleigh_quantile(u: f64, sigma: f64) -> f64 {
  sigma * (-2.0 * u.ln()).sqrt()
}

/// Both wind draws of one instance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindSample {
  pub seed: InstanceSeed,
  pub uniform: f64,
  pub rayleigh: f64,
}

impl WindSample {
  pub fn for_instance(name: &str) -> Self {
    let seed = InstanceSeed::from_name(name);
    WindSample {
      seed,
      uniform: uniform_wind(seed),
      rayleigh: rayleigh_wind(seed.offset(RAYLEIGH_SEED_OFFSET), RAYLEIGH_SIGMA),
    }
  }
}
