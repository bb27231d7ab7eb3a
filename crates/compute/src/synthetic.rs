//! Synthetic ECU telemetry.
//!
//! Produces plausible periodic readings for the five default metrics. Used
//! when no live source is configured and as the fallback when a live fetch
//! fails or returns nothing.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use ecu_core::Reading;

/// Spacing between generated samples.
pub const SAMPLE_SPACING_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    fn eval(self, x: f64) -> f64 {
        match self {
            Wave::Sin => x.sin(),
            Wave::Cos => x.cos(),
        }
    }
}

/// `baseline + amplitude * wave(phase * i) + uniform(0, noise)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalProfile {
    pub baseline: f64,
    pub amplitude: f64,
    pub phase: f64,
    pub noise: f64,
    pub wave: Wave,
}

impl SignalProfile {
    pub const fn new(baseline: f64, amplitude: f64, phase: f64, noise: f64, wave: Wave) -> Self {
        Self {
            baseline,
            amplitude,
            phase,
            noise,
            wave,
        }
    }

    fn sample<R: Rng>(&self, i: usize, rng: &mut R) -> f64 {
        let jitter = if self.noise > 0.0 {
            rng.gen::<f64>() * self.noise
        } else {
            0.0
        };
        self.baseline + self.amplitude * self.wave.eval(self.phase * i as f64) + jitter
    }
}

/// Profiles for the built-in metrics.
pub fn default_profiles() -> IndexMap<String, SignalProfile> {
    [
        ("rightTempPV", SignalProfile::new(55.0, 2.0, 0.1, 1.0, Wave::Sin)),
        ("rightRoomTemp", SignalProfile::new(51.0, 1.5, 0.1, 0.8, Wave::Sin)),
        ("leftOutletTemp", SignalProfile::new(52.0, 1.8, 0.1, 0.7, Wave::Cos)),
        ("egrCoolerTemp", SignalProfile::new(48.0, 2.0, 0.15, 0.9, Wave::Sin)),
        ("hepaEfficiency", SignalProfile::new(95.0, 3.0, 0.08, 1.2, Wave::Sin)),
    ]
    .into_iter()
    .map(|(k, p)| (k.to_string(), p))
    .collect()
}

/// Seedable generator of reading sequences.
pub struct SyntheticGenerator {
    profiles: IndexMap<String, SignalProfile>,
    rng: StdRng,
}

impl SyntheticGenerator {
    /// Deterministic generator for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            profiles: default_profiles(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            profiles: default_profiles(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_profiles(mut self, profiles: IndexMap<String, SignalProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn profiles(&self) -> &IndexMap<String, SignalProfile> {
        &self.profiles
    }

    /// `n` readings one minute apart, oldest first, the last one at `now`.
    pub fn generate(&mut self, n: usize, now: DateTime<Utc>) -> Vec<Reading> {
        (0..n)
            .map(|i| {
                let back = (n - 1 - i) as i64 * SAMPLE_SPACING_SECS;
                let ts = now - Duration::seconds(back);
                self.profiles
                    .iter()
                    .fold(Reading::new(ts), |r, (key, profile)| {
                        let v = profile.sample(i, &mut self.rng);
                        r.with(key.as_str(), v)
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    #[test]
    fn sixty_samples_one_minute_apart() {
        let readings = SyntheticGenerator::seeded(7).generate(60, now());

        assert_eq!(readings.len(), 60);
        assert_eq!(readings.last().unwrap().timestamp, now());
        for pair in readings.windows(2) {
            assert_eq!((pair[1].timestamp - pair[0].timestamp).num_seconds(), 60);
        }
        for r in &readings {
            assert_eq!(r.values.len(), 5);
            assert!(r.values.values().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn zero_length_is_empty() {
        assert!(SyntheticGenerator::seeded(1).generate(0, now()).is_empty());
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SyntheticGenerator::seeded(42).generate(10, now());
        let b = SyntheticGenerator::seeded(42).generate(10, now());
        assert_eq!(a, b);
    }

    #[test]
    fn values_stay_within_profile_envelope() {
        let mut gen = SyntheticGenerator::seeded(3);
        let profiles = gen.profiles().clone();
        for r in gen.generate(200, now()) {
            for (key, p) in &profiles {
                let v = r.values[key];
                assert!(v >= p.baseline - p.amplitude, "{} = {}", key, v);
                assert!(v < p.baseline + p.amplitude + p.noise, "{} = {}", key, v);
            }
        }
    }

    #[test]
    fn noiseless_profile_is_exact() {
        let mut profiles = IndexMap::new();
        profiles.insert("x".to_string(), SignalProfile::new(10.0, 1.0, 0.5, 0.0, Wave::Cos));
        let readings = SyntheticGenerator::seeded(0)
            .with_profiles(profiles)
            .generate(3, now());
        assert_eq!(readings[0].values["x"], 11.0);
        assert!((readings[2].values["x"] - (10.0 + 1.0_f64.cos())).abs() < 1e-12);
    }
}
