use crate::configuration::ConfigurationError;
use crate::course::api::ApiError;
use crate::course::purchase::PurchaseError;
use crate::course::rating::RatingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoursePlayerError {
	#[error("Failed to load configuration: {0}")]
	Configuration(#[from] ConfigurationError),
	#[error("Failed to create application context: {0}")]
	Context(#[from] anyhow::Error),
	#[error("{0}")]
	Api(#[from] ApiError),
	#[error("{0}")]
	Purchase(#[from] PurchaseError),
	#[error("{0}")]
	Rating(#[from] RatingError),
	#[error("Invalid video URL: {0}")]
	VideoUrl(#[from] url::ParseError),
	#[error("IO error while talking to the terminal: {0}")]
	Io(#[from] std::io::Error),
}
