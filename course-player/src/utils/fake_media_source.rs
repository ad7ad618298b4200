use crate::player::media_source::{Generation, MediaSource};
use parking_lot::Mutex;
use std::sync::Arc;
use url::Url;

#[derive(Clone, Debug, PartialEq)]
pub enum MediaCall {
	Load { url: String, generation: Generation },
	SetPlaying(bool),
	SeekTo(f64),
	SetVolume(f64),
	SetPlaybackRate(f64),
}

/// Records every call it receives. Clones share the recording.
#[derive(Clone, Default)]
pub struct FakeMediaSource {
	calls: Arc<Mutex<Vec<MediaCall>>>,
}

impl FakeMediaSource {
	pub fn calls(&self) -> Vec<MediaCall> {
		self.calls.lock().clone()
	}

	pub fn clear_calls(&self) {
		self.calls.lock().clear();
	}

	fn record(&self, call: MediaCall) {
		self.calls.lock().push(call);
	}
}

impl MediaSource for FakeMediaSource {
	fn load(&mut self, source: &Url, generation: Generation) {
		self.record(MediaCall::Load {
			url: source.to_string(),
			generation,
		});
	}

	fn set_playing(&mut self, playing: bool) {
		self.record(MediaCall::SetPlaying(playing));
	}

	fn seek_to(&mut self, fraction: f64) {
		self.record(MediaCall::SeekTo(fraction));
	}

	fn set_volume(&mut self, volume: f64) {
		self.record(MediaCall::SetVolume(volume));
	}

	fn set_playback_rate(&mut self, rate: f64) {
		self.record(MediaCall::SetPlaybackRate(rate));
	}
}
