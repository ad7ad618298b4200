use crate::player::state::{Quality, UnknownQualityError};
use std::num::ParseFloatError;
use std::str::FromStr;
use thiserror::Error;

/// One line of input while watching a video.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WatchCommand {
	/// Pointer activity over the player.
	Move,
	Enter,
	Leave,
	/// Click on the player surface.
	Click,
	/// The play/pause button.
	Toggle,
	Seek(f64),
	Volume(f64),
	Mute,
	Speed(f64),
	Quality(Quality),
	Fullscreen,
	Next,
	Status,
	Help,
	Quit,
}

pub const HELP: &str = "commands: move, enter, leave, click, toggle, seek <0..1>, volume <0..1>, mute, \
	speed <0.25..2>, quality <240p|360p|480p|720p|1080p>, fullscreen, next, status, help, quit";

#[derive(Error, Debug, PartialEq)]
pub enum WatchCommandError {
	#[error("Unknown command '{0}', type 'help' for a list of commands.")]
	Unknown(String),
	#[error("'{0}' needs an argument.")]
	MissingArgument(&'static str),
	#[error("Invalid number: {0}")]
	InvalidNumber(#[from] ParseFloatError),
	#[error("{0}")]
	InvalidQuality(#[from] UnknownQualityError),
}

impl FromStr for WatchCommand {
	type Err = WatchCommandError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let mut words = line.split_whitespace();
		let Some(command) = words.next() else {
			return Ok(WatchCommand::Status);
		};
		let mut argument = |name: &'static str| words.next().ok_or(WatchCommandError::MissingArgument(name));

		Ok(match command.to_lowercase().as_str() {
			"move" | "m" => WatchCommand::Move,
			"enter" => WatchCommand::Enter,
			"leave" => WatchCommand::Leave,
			"click" => WatchCommand::Click,
			"toggle" | "play" | "pause" | "p" => WatchCommand::Toggle,
			"seek" => WatchCommand::Seek(argument("seek")?.parse()?),
			"volume" | "vol" => WatchCommand::Volume(argument("volume")?.parse()?),
			"mute" => WatchCommand::Mute,
			"speed" => WatchCommand::Speed(argument("speed")?.trim_end_matches('x').parse()?),
			"quality" => WatchCommand::Quality(argument("quality")?.parse()?),
			"fullscreen" | "f" => WatchCommand::Fullscreen,
			"next" | "n" => WatchCommand::Next,
			"status" => WatchCommand::Status,
			"help" | "?" => WatchCommand::Help,
			"quit" | "q" | "exit" => WatchCommand::Quit,
			_ => return Err(WatchCommandError::Unknown(command.to_string())),
		})
	}
}
