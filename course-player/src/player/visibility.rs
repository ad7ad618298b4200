use crate::player::action::{Action, PlaybackPatch};
use crate::player::store::PlaybackStore;
use crate::utils::timer::{Debounce, Throttle};
use std::time::Duration;
use tracing::trace;

pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(3500);

/// Shows and hides the control overlay depending on pointer activity over the player.
///
/// Showing is throttled on the leading edge, hiding is debounced. Both run independently on
/// every pointer move, so the controls appear right away and disappear once the pointer has
/// been still for the quiet interval. Dropping the timer cancels a pending hide.
pub struct VisibilityTimer {
	store: PlaybackStore,
	show: Throttle,
	hide: Debounce,
}

impl VisibilityTimer {
	pub fn new(store: PlaybackStore, quiet_interval: Duration) -> Self {
		Self {
			store,
			show: Throttle::new(quiet_interval),
			hide: Debounce::new(quiet_interval),
		}
	}

	/// Must be called from within a tokio runtime.
	pub fn pointer_moved(&mut self) {
		if self.show.try_fire() {
			trace!("Pointer activity, showing controls.");
			self.store.dispatch(hide_controls(false));
		}

		let store = self.store.clone();
		self.hide.schedule(move || {
			trace!("Pointer idle, hiding controls.");
			store.dispatch(hide_controls(true));
		});
	}

	pub fn pointer_entered(&self) {
		self.store.dispatch(hide_controls(false));
	}

	pub fn pointer_left(&self) {
		self.store.dispatch(hide_controls(true));
	}

	/// A click on the player surface toggles playback. It is not pointer activity.
	pub fn clicked(&self) {
		self.store.dispatch(Action::TogglePlay);
	}

	#[cfg(test)]
	pub fn has_pending_hide(&self) -> bool {
		self.hide.is_pending()
	}
}

fn hide_controls(hide: bool) -> PlaybackPatch {
	PlaybackPatch::builder().hide_controls(hide).build()
}
