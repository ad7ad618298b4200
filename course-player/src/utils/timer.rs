use crate::utils::aborting_join_handle::AbortingJoinHandle;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Leading-edge throttle: fires on the first call and suppresses every further
/// call until `window` has elapsed since the last time it fired.
#[derive(Debug)]
pub struct Throttle {
	window: Duration,
	last_fired: Option<Instant>,
}

impl Throttle {
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			last_fired: None,
		}
	}

	/// Returns `true` if this call fired.
	pub fn try_fire(&mut self) -> bool {
		let now = Instant::now();
		match self.last_fired {
			Some(last_fired) if now.duration_since(last_fired) < self.window => return false,
			_ => {}
		}

		self.last_fired = Some(now);
		true
	}
}

/// Trailing debounce: runs an action once `delay` has passed without another call to
/// [`Debounce::schedule`]. At most one action is pending at any time.
///
/// The pending action is owned by an [`AbortingJoinHandle`], so rescheduling or dropping
/// the `Debounce` aborts it.
#[derive(Debug)]
pub struct Debounce {
	delay: Duration,
	pending: Option<AbortingJoinHandle<()>>,
}

impl Debounce {
	pub fn new(delay: Duration) -> Self {
		Self { delay, pending: None }
	}

	/// Must be called from within a tokio runtime.
	pub fn schedule(&mut self, action: impl FnOnce() + Send + 'static) {
		// The deadline is taken now, not when the task is first polled.
		let deadline = Instant::now() + self.delay;
		let task = tokio::spawn(async move {
			sleep_until(deadline).await;
			action();
		});
		self.pending = Some(task.into());
	}

	pub fn is_pending(&self) -> bool {
		self.pending.as_ref().is_some_and(|pending| !pending.is_finished())
	}
}
