/// A free-running countdown measured in seconds.
/// Used for jump buffering and coyote time.
///
/// The value is allowed to go negative; downstream checks only care about
/// the sign, so `tick` never bothers to clamp.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct CountdownTimer(f32);

impl CountdownTimer {
	/// Start (or restart) the countdown from the given duration
	pub fn set(&mut self, duration: f32) {
		self.0 = duration;
	}

	/// Advance the countdown by the elapsed time
	pub fn tick(&mut self, dt: f32) {
		self.0 -= dt;
	}

	/// Force the countdown into its expired state, e.g. when the buffered
	/// action it gates has been consumed
	pub fn expire(&mut self) {
		self.0 = 0.0;
	}

	/// Check whether there is still time left on the countdown
	pub fn is_active(&self) -> bool {
		self.0 > 0.0
	}

	pub fn remaining(&self) -> f32 {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expires_after_its_duration() {
		let mut timer = CountdownTimer::default();
		timer.set(0.1);
		assert!(timer.is_active());
		timer.tick(0.06);
		assert!(timer.is_active());
		timer.tick(0.06);
		assert!(!timer.is_active());
		// keeps counting into the negatives without complaint
		timer.tick(0.06);
		assert!(timer.remaining() < 0.0);
	}

	#[test]
	fn expire_consumes_remaining_time() {
		let mut timer = CountdownTimer::default();
		timer.set(1.0);
		timer.expire();
		assert!(!timer.is_active());
	}
}
