use crate::player::media_source::{Generation, MediaEvent, MediaSource, TaggedMediaEvent};
use crate::utils::aborting_join_handle::AbortingJoinHandle;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, trace};
use url::Url;

/// How far ahead of the playhead the simulated buffer reaches.
const BUFFER_AHEAD: Duration = Duration::from_secs(10);

/// A media source without any actual media: a playhead that advances in real time while
/// playing and reports its position every `progress_interval`.
pub struct SimulatedMediaSource {
	duration: Duration,
	progress_interval: Duration,
	events: mpsc::UnboundedSender<TaggedMediaEvent>,
	playhead: Arc<Mutex<Playhead>>,
	_ticker: Option<AbortingJoinHandle<()>>,
}

struct Playhead {
	position: Duration,
	playing: bool,
	rate: f64,
}

impl SimulatedMediaSource {
	pub fn new(
		duration: Duration,
		progress_interval: Duration,
		events: mpsc::UnboundedSender<TaggedMediaEvent>,
	) -> Self {
		Self {
			duration,
			progress_interval,
			events,
			playhead: Arc::new(Mutex::new(Playhead {
				position: Duration::ZERO,
				playing: false,
				rate: 1.0,
			})),
			_ticker: None,
		}
	}
}

impl MediaSource for SimulatedMediaSource {
	/// Must be called from within a tokio runtime.
	fn load(&mut self, source: &Url, generation: Generation) {
		debug!("Simulating {source} (generation {generation}).");
		self.playhead.lock().position = Duration::ZERO;

		let duration = self.duration;
		let progress_interval = self.progress_interval;
		let events = self.events.clone();
		let playhead = self.playhead.clone();
		let task = tokio::spawn(async move {
			let send = |event| events.send(TaggedMediaEvent { generation, event }).is_ok();
			if !send(MediaEvent::Duration {
				seconds: duration.as_secs_f64(),
			}) {
				return;
			}

			let mut ticker = interval(progress_interval);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
			ticker.tick().await;
			loop {
				ticker.tick().await;
				let position = playhead.lock().advance(progress_interval, duration);
				if !send(progress_event(position, duration)) {
					break;
				}
			}
		});
		// replacing the handle aborts the previous ticker
		self._ticker = Some(task.into());
	}

	fn set_playing(&mut self, playing: bool) {
		self.playhead.lock().playing = playing;
	}

	fn seek_to(&mut self, fraction: f64) {
		let position = self.duration.mul_f64(fraction.clamp(0.0, 1.0));
		trace!("Seeking to {position:?}.");
		self.playhead.lock().position = position;
	}

	fn set_volume(&mut self, volume: f64) {
		// nothing audible to adjust
		trace!("Volume set to {volume}.");
	}

	fn set_playback_rate(&mut self, rate: f64) {
		self.playhead.lock().rate = rate;
	}
}

impl Playhead {
	fn advance(&mut self, elapsed: Duration, duration: Duration) -> Duration {
		if self.playing {
			self.position = (self.position + elapsed.mul_f64(self.rate)).min(duration);
		}
		self.position
	}
}

fn progress_event(position: Duration, duration: Duration) -> MediaEvent {
	if duration.is_zero() {
		return MediaEvent::Progress {
			played: 0.0,
			loaded: 0.0,
		};
	}

	let played = position.as_secs_f64() / duration.as_secs_f64();
	let loaded = ((position + BUFFER_AHEAD).as_secs_f64() / duration.as_secs_f64()).min(1.0);
	MediaEvent::Progress { played, loaded }
}
