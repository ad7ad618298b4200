use crate::course::session::Session;
use crate::player::state::Quality;
use crate::player::visibility::DEFAULT_QUIET_INTERVAL;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Configuration {
	/// Base of the REST API, e.g. `https://example.org/api/v1`.
	#[serde(with = "url_deserializer")]
	pub api_base_url: Url,
	/// URL of a video with `{video}` and `{quality}` placeholders.
	pub video_url_template: String,
	pub log_filters: String,
	#[serde(with = "humantime_serde", default = "default_controls_hide_delay")]
	pub controls_hide_delay: Duration,
	#[serde(deserialize_with = "non_zero_duration::deserialize")]
	pub progress_interval: Duration,
	#[serde(default)]
	pub default_quality: Quality,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub token: Option<String>,
}

impl Configuration {
	pub fn from_file(path: impl AsRef<Path>) -> Result<Configuration, ConfigurationError> {
		let text = read_to_string(path)?;

		Ok(Configuration::try_from(text.as_str())?)
	}

	/// Signed in as soon as a token is configured.
	pub fn session(&self) -> Session {
		match &self.token {
			Some(token) => Session::signed_in(self.username.clone().unwrap_or_default(), token.clone()),
			None => Session::anonymous(),
		}
	}
}

fn default_controls_hide_delay() -> Duration {
	DEFAULT_QUIET_INTERVAL
}

impl TryFrom<&str> for Configuration {
	type Error = toml::de::Error;

	fn try_from(text: &str) -> Result<Self, Self::Error> {
		toml::from_str(text)
	}
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
	#[error("Failed to deserialize with error: {0}")]
	DeserializationError(#[from] toml::de::Error),
	#[error("IO operation failed: {0}")]
	IoError(#[from] std::io::Error),
}

mod url_deserializer {
	use serde::{self, Deserialize, Deserializer};
	use url::Url;

	pub fn deserialize<'deserializer, D>(deserializer: D) -> Result<Url, D::Error>
	where
		D: Deserializer<'deserializer>,
	{
		let string = String::deserialize(deserializer)?;
		Url::parse(&string).map_err(serde::de::Error::custom)
	}
}

mod non_zero_duration {
	use serde::{self, Deserializer};
	use std::time::Duration;

	pub fn deserialize<'deserializer, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'deserializer>,
	{
		let duration: Duration = humantime_serde::deserialize(deserializer)?;
		if duration.is_zero() {
			return Err(serde::de::Error::custom("duration must be greater than zero"));
		}
		Ok(duration)
	}
}
