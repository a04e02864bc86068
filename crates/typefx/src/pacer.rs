use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Produces the jittered delay charged after each animation step.
#[derive(Debug)]
pub(crate) struct Pacer {
	rng: SmallRng,
}

impl Pacer {
	pub fn new(seed: Option<u64>) -> Self {
		let rng = match seed {
			Some(seed) => SmallRng::seed_from_u64(seed),
			None => SmallRng::from_os_rng(),
		};
		Self { rng }
	}

	/// `speed + random(0, range) - range / 2`, clamped at zero.
	pub fn delay(&mut self, speed: Duration, range: Duration) -> Duration {
		let range_ms = millis(range);
		if range_ms == 0 {
			return speed;
		}
		let jitter = self.rng.random_range(0..range_ms);
		Duration::from_millis(millis(speed).saturating_add(jitter).saturating_sub(range_ms / 2))
	}
}

fn millis(d: Duration) -> u64 {
	u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
