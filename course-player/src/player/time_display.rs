use crate::player::state::PlaybackState;

const PLACEHOLDER: &str = "00:00";

/// Formats a millisecond count as `mm:ss`, truncated to whole seconds.
///
/// Minutes are not wrapped into hours. Anything that isn't a positive finite number renders
/// as `00:00`.
pub fn format_clock(milliseconds: f64) -> String {
	if !milliseconds.is_finite() || milliseconds <= 0.0 {
		return PLACEHOLDER.to_string();
	}

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let total_seconds = (milliseconds / 1000.0).floor() as u64;
	let minutes = total_seconds / 60;
	let seconds = total_seconds % 60;
	format!("{minutes:02}:{seconds:02}")
}

/// `elapsed / total`, e.g. `01:02 / 02:05`.
pub fn render(state: &PlaybackState) -> String {
	if !state.has_metadata() {
		return format!("{PLACEHOLDER} / {PLACEHOLDER}");
	}

	format!(
		"{} / {}",
		format_clock(state.elapsed_seconds() * 1000.0),
		format_clock(state.duration * 1000.0)
	)
}
