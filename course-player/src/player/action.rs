use crate::player::state::Quality;
use typed_builder::TypedBuilder;

/// The closed set of transitions accepted by [`crate::player::store::PlaybackStore::dispatch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
	TogglePlay,
	Merge(PlaybackPatch),
}

/// Partial update of a [`crate::player::state::PlaybackState`]. Fields that are `None`
/// are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option)))]
pub struct PlaybackPatch {
	pub playing: Option<bool>,
	pub volume: Option<f64>,
	pub quality: Option<Quality>,
	pub speed: Option<f64>,
	pub progress: Option<f64>,
	pub loaded: Option<f64>,
	pub duration: Option<f64>,
	pub hide_controls: Option<bool>,
}

impl From<PlaybackPatch> for Action {
	fn from(patch: PlaybackPatch) -> Self {
		Action::Merge(patch)
	}
}
