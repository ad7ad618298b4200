use crate::course::model::VideoId;
use crate::player::action::PlaybackPatch;
use crate::player::state::{PlaybackState, Quality};
use crate::player::store::{PlaybackStore, Subscription};
use parking_lot::Mutex;
use static_assertions::assert_obj_safe;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Identifies one initialisation of a media source. Every reload gets a new generation,
/// callbacks carrying an older one are stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct Generation(u64);

impl Generation {
	#[must_use]
	pub fn next(self) -> Self {
		Self(self.0 + 1)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MediaEvent {
	/// Periodic report of the played and buffered fractions.
	Progress { played: f64, loaded: f64 },
	/// Fired once the metadata of the source resolved.
	Duration { seconds: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaggedMediaEvent {
	pub generation: Generation,
	pub event: MediaEvent,
}

/// The external video widget. Implementations report [`TaggedMediaEvent`]s through
/// whatever channel they were constructed with.
pub trait MediaSource: Send {
	/// (Re-)initialises the widget with `source`. Events emitted afterwards carry `generation`.
	fn load(&mut self, source: &Url, generation: Generation);
	fn set_playing(&mut self, playing: bool);
	/// `fraction` is in `[0, 1]`.
	fn seek_to(&mut self, fraction: f64);
	fn set_volume(&mut self, volume: f64);
	fn set_playback_rate(&mut self, rate: f64);
}

assert_obj_safe!(MediaSource);

/// Resolves the URL of a video at a given quality from a template containing
/// `{video}` and `{quality}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoSource {
	template: String,
	video_id: VideoId,
}

impl VideoSource {
	pub fn new(template: impl Into<String>, video_id: VideoId) -> Self {
		Self {
			template: template.into(),
			video_id,
		}
	}

	pub fn url(&self, quality: Quality) -> Result<Url, url::ParseError> {
		let url = self
			.template
			.replace("{video}", &self.video_id)
			.replace("{quality}", quality.label());
		Url::parse(&url)
	}
}

/// Drives a [`MediaSource`] from the store and feeds its callbacks back into the store.
///
/// `playing`, `volume` and `speed` are applied declaratively whenever they change. A quality
/// change reloads the source under a new [`Generation`] and resumes at the previous progress
/// once the new source reported its duration.
pub struct MediaBinding {
	store: PlaybackStore,
	shared: Arc<Mutex<Shared>>,
	_subscription: Subscription,
}

struct Shared {
	media_source: Box<dyn MediaSource>,
	video_source: VideoSource,
	generation: Generation,
	applied: PlaybackState,
	resume_at: Option<f64>,
	/// Quality whose URL failed to resolve, logged once.
	unavailable: Option<Quality>,
}

impl MediaBinding {
	pub fn new(
		store: PlaybackStore,
		mut media_source: Box<dyn MediaSource>,
		video_source: VideoSource,
	) -> Result<Self, url::ParseError> {
		let state = store.state();
		let generation = Generation::default();
		let url = video_source.url(state.quality)?;
		info!("Loading {url} (generation {generation}).");
		media_source.load(&url, generation);
		apply_all(media_source.as_mut(), &state);

		let shared = Arc::new(Mutex::new(Shared {
			media_source,
			video_source,
			generation,
			applied: state,
			resume_at: None,
			unavailable: None,
		}));
		let subscription = store.subscribe({
			let shared = shared.clone();
			move |state| shared.lock().sync(state)
		});

		Ok(Self {
			store,
			shared,
			_subscription: subscription,
		})
	}

	#[cfg(test)]
	pub fn generation(&self) -> Generation {
		self.shared.lock().generation
	}

	/// Applies a callback of the media source to the store, unless it is stale.
	pub fn handle_event(&self, TaggedMediaEvent { generation, event }: TaggedMediaEvent) {
		let resume_at = {
			let mut shared = self.shared.lock();
			if generation != shared.generation {
				debug!(
					"Dropping {event:?} from generation {generation}, current is {}.",
					shared.generation
				);
				return;
			}

			match event {
				MediaEvent::Duration { .. } => shared.resume_at.take(),
				MediaEvent::Progress { .. } if shared.resume_at.is_some() => {
					// reports before the resume seek would rewind the store
					debug!("Dropping {event:?} while waiting to resume.");
					return;
				}
				MediaEvent::Progress { .. } => None,
			}
		};

		let patch = match event {
			MediaEvent::Progress { played, loaded } => PlaybackPatch::builder().progress(played).loaded(loaded).build(),
			MediaEvent::Duration { seconds } => PlaybackPatch::builder().duration(seconds).build(),
		};
		self.store.dispatch(patch);

		if let Some(fraction) = resume_at {
			debug!("Resuming at {fraction} after reload.");
			self.shared.lock().media_source.seek_to(fraction);
		}
	}

	/// Seeks the media source to `fraction`. The store is only updated by the next progress
	/// callback. Before the metadata is known, this is a no-op.
	pub fn seek_to(&self, fraction: f64) {
		let state = self.store.state();
		if !state.has_metadata() {
			debug!("Ignoring seek to {fraction}, metadata not loaded yet.");
			return;
		}
		if fraction.is_nan() {
			debug!("Ignoring seek to NaN.");
			return;
		}

		self.shared.lock().media_source.seek_to(fraction.clamp(0.0, 1.0));
	}
}

impl Shared {
	fn sync(&mut self, state: &PlaybackState) {
		if state.quality != self.applied.quality && self.reload(state) {
			self.applied = *state;
			return;
		}

		let media_source = self.media_source.as_mut();
		if state.playing != self.applied.playing {
			media_source.set_playing(state.playing);
		}
		if state.volume != self.applied.volume {
			media_source.set_volume(state.volume);
		}
		if state.speed != self.applied.speed {
			media_source.set_playback_rate(state.speed);
		}
		// the source keeps playing at the quality it was loaded with
		self.applied = PlaybackState {
			quality: self.applied.quality,
			..*state
		};
	}

	/// Returns `false` if no URL could be resolved for the new quality.
	fn reload(&mut self, state: &PlaybackState) -> bool {
		let url = match self.video_source.url(state.quality) {
			Ok(url) => url,
			Err(error) => {
				if self.unavailable != Some(state.quality) {
					tracing::error!(
						"Can't switch to {}, staying at {}: {error}",
						state.quality, self.applied.quality
					);
					self.unavailable = Some(state.quality);
				}
				return false;
			}
		};
		self.unavailable = None;

		self.generation = self.generation.next();
		self.resume_at = Some(state.progress);
		info!(
			"Switching to {} at {:.3}, loading {url} (generation {}).",
			state.quality, state.progress, self.generation
		);
		self.media_source.load(&url, self.generation);
		apply_all(self.media_source.as_mut(), state);
		true
	}
}

fn apply_all(media_source: &mut dyn MediaSource, state: &PlaybackState) {
	media_source.set_volume(state.volume);
	media_source.set_playback_rate(state.speed);
	media_source.set_playing(state.playing);
}
