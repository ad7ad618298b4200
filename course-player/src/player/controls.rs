//! Stateless widgets of the player overlay. Each one reads the current [`PlaybackState`] and
//! issues intents against the store or the media binding.

use crate::course::model::{Curriculum, Video, VideoId};
use crate::player::action::{Action, PlaybackPatch};
use crate::player::media_source::MediaBinding;
use crate::player::state::{PlaybackState, Quality};
use crate::player::store::PlaybackStore;
use crate::player::time_display;
use static_assertions::assert_obj_safe;
use tracing::debug;

pub struct PlayPauseControl;

impl PlayPauseControl {
	pub fn label(state: &PlaybackState) -> &'static str {
		if state.playing { "pause" } else { "play" }
	}

	/// The media source follows `playing`, nothing is called on it directly.
	pub fn press(store: &PlaybackStore) {
		store.dispatch(Action::TogglePlay);
	}
}

pub struct SeekControl;

impl SeekControl {
	pub const STEP: f64 = 0.001;
	const WIDTH: usize = 40;

	/// A text progress bar: `=` played, `-` buffered, `.` remaining.
	pub fn render(state: &PlaybackState) -> String {
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
		let cells = |fraction: f64| ((fraction * Self::WIDTH as f64).round() as usize).min(Self::WIDTH);
		let played = cells(state.progress);
		let loaded = cells(state.loaded).max(played);

		format!(
			"[{}{}{}]",
			"=".repeat(played),
			"-".repeat(loaded - played),
			".".repeat(Self::WIDTH - loaded)
		)
	}

	/// Snaps `value` to the input's step and seeks there. The displayed position only changes
	/// once the media source reports the new progress.
	pub fn change(binding: &MediaBinding, value: f64) {
		let fraction = (value / Self::STEP).round() * Self::STEP;
		binding.seek_to(fraction);
	}
}

pub struct VolumeControl;

impl VolumeControl {
	pub fn render(state: &PlaybackState) -> String {
		if state.volume == 0.0 {
			"muted".to_string()
		} else {
			format!("vol {:.0}%", state.volume * 100.0)
		}
	}

	pub fn change(store: &PlaybackStore, volume: f64) {
		store.dispatch(PlaybackPatch::builder().volume(volume.clamp(0.0, 1.0)).build());
	}

	pub fn toggle_mute(state: &PlaybackState, store: &PlaybackStore) {
		let volume = if state.volume > 0.0 { 0.0 } else { 1.0 };
		Self::change(store, volume);
	}
}

pub struct SettingsControl;

impl SettingsControl {
	pub const SPEEDS: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

	pub fn render(state: &PlaybackState) -> String {
		format!("{}x {}", state.speed, state.quality)
	}

	/// Only the offered speeds are accepted.
	pub fn select_speed(store: &PlaybackStore, speed: f64) -> bool {
		if !Self::SPEEDS.contains(&speed) {
			debug!("Ignoring unsupported speed {speed}.");
			return false;
		}

		store.dispatch(PlaybackPatch::builder().speed(speed).build());
		true
	}

	/// The media binding reloads the source and resumes at the current progress.
	pub fn select_quality(store: &PlaybackStore, quality: Quality) {
		store.dispatch(PlaybackPatch::builder().quality(quality).build());
	}
}

pub struct TimeDisplay;

impl TimeDisplay {
	pub fn render(state: &PlaybackState) -> String {
		time_display::render(state)
	}
}

/// The element hosting the player, able to go fullscreen.
pub trait Fullscreen: Send {
	fn is_fullscreen(&self) -> bool;
	fn request_fullscreen(&mut self);
	fn exit_fullscreen(&mut self);
}

assert_obj_safe!(Fullscreen);

pub struct FullscreenControl;

impl FullscreenControl {
	pub fn toggle(container: &mut dyn Fullscreen) {
		if container.is_fullscreen() {
			container.exit_fullscreen();
		} else {
			container.request_fullscreen();
		}
	}
}

pub struct NextControl;

impl NextControl {
	pub fn target<'curriculum>(curriculum: &'curriculum Curriculum, current: &VideoId) -> Option<&'curriculum Video> {
		curriculum.next_video(current)
	}
}

/// One line rendering of all widgets. Empty while the controls are hidden.
pub fn render_overlay(state: &PlaybackState) -> String {
	if state.hide_controls {
		return String::new();
	}

	format!(
		"{} {} {} {} | {}",
		PlayPauseControl::label(state),
		SeekControl::render(state),
		TimeDisplay::render(state),
		VolumeControl::render(state),
		SettingsControl::render(state),
	)
}
