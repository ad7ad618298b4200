use crate::context::ApplicationContext;
use crate::course::model::{CourseId, Curriculum, VideoId};
use crate::course::navigation::Navigation;
use crate::error::CoursePlayerError;
use crate::lifecycle::watch_command::{HELP, WatchCommand};
use crate::lifecycle::write_line;
use crate::player::controls::{
	Fullscreen, FullscreenControl, NextControl, PlayPauseControl, SeekControl, SettingsControl, VolumeControl,
	render_overlay,
};
use crate::player::media_source::{MediaBinding, VideoSource};
use crate::player::simulated::SimulatedMediaSource;
use crate::player::state::PlaybackState;
use crate::player::store::PlaybackStore;
use crate::player::visibility::VisibilityTimer;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

enum Outcome {
	Quit,
	Next(VideoId),
}

/// The terminal can't go fullscreen, the mode is only tracked.
#[derive(Debug, Default)]
struct TerminalFullscreen {
	fullscreen: bool,
}

impl Fullscreen for TerminalFullscreen {
	fn is_fullscreen(&self) -> bool {
		self.fullscreen
	}

	fn request_fullscreen(&mut self) {
		debug!("Entering fullscreen.");
		self.fullscreen = true;
	}

	fn exit_fullscreen(&mut self) {
		debug!("Leaving fullscreen.");
		self.fullscreen = false;
	}
}

/// Plays `video_id` of a course with a simulated media source, taking [`WatchCommand`]s from
/// `input` line by line and writing the control overlay to `output` whenever it changes.
///
/// Ends at the end of `input` or on `quit`. `next` moves on to the following video of the
/// curriculum.
pub async fn run_watch_session<Input, Output>(
	context: &ApplicationContext,
	course_id: &CourseId,
	video_id: VideoId,
	duration: Duration,
	input: Input,
	output: &mut Output,
) -> Result<(), CoursePlayerError>
where
	Input: AsyncBufRead + Unpin,
	Output: AsyncWrite + Unpin,
{
	let curriculum = match context.api.sections(course_id).await {
		Ok(sections) => Curriculum::from(sections),
		Err(error) => {
			warn!("Failed to load the curriculum of {course_id}, 'next' is unavailable: {error}");
			Curriculum::default()
		}
	};

	let mut lines = input.lines();
	let mut video_id = video_id;
	loop {
		let title = curriculum
			.video(&video_id)
			.map_or_else(|| video_id.to_string(), |video| video.name.clone());
		info!("Watching {video_id} of {course_id}.");
		write_line(output, &format!("Playing '{title}' ({})", Navigation::Watch(course_id.clone()))).await?;

		match play(context, &curriculum, &video_id, duration, &mut lines, output).await? {
			Outcome::Quit => return Ok(()),
			Outcome::Next(next) => video_id = next,
		}
	}
}

async fn play<Input, Output>(
	context: &ApplicationContext,
	curriculum: &Curriculum,
	video_id: &VideoId,
	duration: Duration,
	lines: &mut Lines<Input>,
	output: &mut Output,
) -> Result<Outcome, CoursePlayerError>
where
	Input: AsyncBufRead + Unpin,
	Output: AsyncWrite + Unpin,
{
	let configuration = &context.configuration;
	let store = PlaybackStore::new(PlaybackState::with_quality(configuration.default_quality));
	let (event_sender, mut events) = mpsc::unbounded_channel();
	let media_source = SimulatedMediaSource::new(duration, configuration.progress_interval, event_sender);
	let binding = MediaBinding::new(
		store.clone(),
		Box::new(media_source),
		VideoSource::new(configuration.video_url_template.clone(), video_id.clone()),
	)?;
	let mut visibility = VisibilityTimer::new(store.clone(), configuration.controls_hide_delay);
	let mut fullscreen = TerminalFullscreen::default();

	let mut changes = store.watch();
	let mut overlay = render_overlay(&changes.borrow_and_update());
	write_line(output, &overlay).await?;

	loop {
		tokio::select! {
			line = lines.next_line() => {
				let Some(line) = line? else {
					return Ok(Outcome::Quit);
				};
				let command = match line.parse::<WatchCommand>() {
					Ok(command) => command,
					Err(error) => {
						write_line(output, &error.to_string()).await?;
						continue;
					}
				};

				match command {
					WatchCommand::Quit => return Ok(Outcome::Quit),
					WatchCommand::Next => match NextControl::target(curriculum, video_id) {
						Some(next) => return Ok(Outcome::Next(next.id.clone())),
						None => write_line(output, "This is the last video of the course.").await?,
					},
					command => {
						let controls = Controls {
							store: &store,
							binding: &binding,
							visibility: &mut visibility,
							fullscreen: &mut fullscreen,
						};
						if let Some(message) = controls.execute(command) {
							write_line(output, &message).await?;
						}
					}
				}
			}
			Some(event) = events.recv() => binding.handle_event(event),
			Ok(()) = changes.changed() => {
				let rendered = render_overlay(&changes.borrow_and_update());
				if rendered != overlay {
					if !rendered.is_empty() {
						write_line(output, &rendered).await?;
					}
					overlay = rendered;
				}
			}
		}
	}
}

struct Controls<'session> {
	store: &'session PlaybackStore,
	binding: &'session MediaBinding,
	visibility: &'session mut VisibilityTimer,
	fullscreen: &'session mut TerminalFullscreen,
}

impl Controls<'_> {
	/// Returns a message for the user, if any.
	fn execute(self, command: WatchCommand) -> Option<String> {
		match command {
			WatchCommand::Move => self.visibility.pointer_moved(),
			WatchCommand::Enter => self.visibility.pointer_entered(),
			WatchCommand::Leave => self.visibility.pointer_left(),
			WatchCommand::Click => self.visibility.clicked(),
			WatchCommand::Toggle => PlayPauseControl::press(self.store),
			WatchCommand::Seek(fraction) => SeekControl::change(self.binding, fraction),
			WatchCommand::Volume(volume) => VolumeControl::change(self.store, volume),
			WatchCommand::Mute => VolumeControl::toggle_mute(&self.store.state(), self.store),
			WatchCommand::Speed(speed) => {
				if !SettingsControl::select_speed(self.store, speed) {
					let speeds = SettingsControl::SPEEDS.map(|speed| format!("{speed}x")).join(", ");
					return Some(format!("Unsupported speed {speed}x, choose one of {speeds}."));
				}
			}
			WatchCommand::Quality(quality) => SettingsControl::select_quality(self.store, quality),
			WatchCommand::Fullscreen => {
				FullscreenControl::toggle(self.fullscreen);
				let mode = if self.fullscreen.is_fullscreen() { "on" } else { "off" };
				return Some(format!("fullscreen {mode}"));
			}
			WatchCommand::Status => {
				let state = PlaybackState {
					hide_controls: false,
					..self.store.state()
				};
				return Some(render_overlay(&state));
			}
			WatchCommand::Help => return Some(HELP.to_string()),
			WatchCommand::Next | WatchCommand::Quit => {}
		}
		None
	}
}
