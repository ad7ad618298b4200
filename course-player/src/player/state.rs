use crate::player::action::{Action, PlaybackPatch};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Selectable resolution of the video source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
	#[serde(rename = "240p")]
	Sd240,
	#[default]
	#[serde(rename = "360p")]
	Sd360,
	#[serde(rename = "480p")]
	Sd480,
	#[serde(rename = "720p")]
	Hd720,
	#[serde(rename = "1080p")]
	Hd1080,
}

impl Quality {
	pub const ALL: [Quality; 5] = [
		Quality::Sd240,
		Quality::Sd360,
		Quality::Sd480,
		Quality::Hd720,
		Quality::Hd1080,
	];

	pub fn label(self) -> &'static str {
		match self {
			Quality::Sd240 => "240p",
			Quality::Sd360 => "360p",
			Quality::Sd480 => "480p",
			Quality::Hd720 => "720p",
			Quality::Hd1080 => "1080p",
		}
	}
}

impl Display for Quality {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		formatter.write_str(self.label())
	}
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown quality '{0}'. Expected one of 240p, 360p, 480p, 720p or 1080p.")]
pub struct UnknownQualityError(String);

impl FromStr for Quality {
	type Err = UnknownQualityError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		Quality::ALL
			.into_iter()
			.find(|quality| quality.label().eq_ignore_ascii_case(text.trim()))
			.ok_or_else(|| UnknownQualityError(text.to_string()))
	}
}

/// Canonical state of one player view.
///
/// Always satisfies `0 <= progress <= loaded <= 1`, `duration >= 0`, `0 <= volume <= 1`
/// and `speed > 0`, as long as it is only changed through [`PlaybackState::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
	pub playing: bool,
	pub volume: f64,
	pub quality: Quality,
	/// Playback rate multiplier.
	pub speed: f64,
	/// Played fraction of the total duration.
	pub progress: f64,
	/// Buffered fraction of the total duration.
	pub loaded: f64,
	/// Seconds, 0 until the media source reported it.
	pub duration: f64,
	pub hide_controls: bool,
}

impl Default for PlaybackState {
	fn default() -> Self {
		Self {
			playing: false,
			volume: 1.0,
			quality: Quality::default(),
			speed: 1.0,
			progress: 0.0,
			loaded: 0.0,
			duration: 0.0,
			hide_controls: false,
		}
	}
}

impl PlaybackState {
	pub fn with_quality(quality: Quality) -> Self {
		Self {
			quality,
			..Self::default()
		}
	}

	#[must_use = "returns the new state"]
	pub fn apply(mut self, action: Action) -> Self {
		match action {
			Action::TogglePlay => self.playing = !self.playing,
			Action::Merge(patch) => self.merge(patch),
		}
		self
	}

	/// Whether the media source has reported a usable duration yet.
	pub fn has_metadata(&self) -> bool {
		self.duration.is_finite() && self.duration > 0.0
	}

	pub fn elapsed_seconds(&self) -> f64 {
		self.duration * self.progress
	}

	fn merge(&mut self, patch: PlaybackPatch) {
		let PlaybackPatch {
			playing,
			volume,
			quality,
			speed,
			progress,
			loaded,
			duration,
			hide_controls,
		} = patch;

		if let Some(playing) = playing {
			self.playing = playing;
		}
		if let Some(volume) = volume.and_then(clamp_fraction) {
			self.volume = volume;
		}
		if let Some(quality) = quality {
			self.quality = quality;
		}
		if let Some(speed) = speed.filter(|speed| speed.is_finite() && *speed > 0.0) {
			self.speed = speed;
		}
		if let Some(progress) = progress.and_then(clamp_fraction) {
			self.progress = progress;
		}
		if let Some(loaded) = loaded.and_then(clamp_fraction) {
			self.loaded = loaded;
		}
		if let Some(duration) = duration {
			self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
		}
		if let Some(hide_controls) = hide_controls {
			self.hide_controls = hide_controls;
		}

		// nothing can be played that isn't buffered
		self.loaded = self.loaded.max(self.progress);
	}
}

/// Clamps into `[0, 1]`, NaN is dropped.
fn clamp_fraction(value: f64) -> Option<f64> {
	(!value.is_nan()).then(|| value.clamp(0.0, 1.0))
}
