use crate::course::model::{CourseContext, CourseId, Section};
use crate::course::rating::Rate;
use async_trait::async_trait;
use static_assertions::assert_obj_safe;
use thiserror::Error;

/// The backend REST resources used by the client.
#[async_trait]
pub trait CourseApi: Send + Sync + 'static {
	/// `GET /courses/{id}`
	async fn course(&self, id: &CourseId) -> Result<CourseContext, ApiError>;
	/// `GET /courses/{id}/sections`
	async fn sections(&self, id: &CourseId) -> Result<Vec<Section>, ApiError>;
	/// `POST /courses/{id}/buy`
	async fn buy(&self, id: &CourseId) -> Result<(), ApiError>;
	/// `POST /courses/{id}/evaluate`
	async fn evaluate(&self, id: &CourseId, rate: Rate) -> Result<(), ApiError>;
}

assert_obj_safe!(CourseApi);

#[derive(Error, Debug)]
pub enum ApiError {
	#[error("Not signed in or the session expired.")]
	Unauthorized,
	#[error("Request was rejected with status {status}: {}", .messages.join(" "))]
	Rejected { status: u16, messages: Vec<String> },
	#[error("Request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("Invalid endpoint URL: {0}")]
	Url(#[from] url::ParseError),
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn rejected_error_should_list_all_messages() {
		let error = ApiError::Rejected {
			status: 422,
			messages: vec!["Rate is invalid.".to_string(), "Try again.".to_string()],
		};

		assert_eq!(
			error.to_string(),
			"Request was rejected with status 422: Rate is invalid. Try again."
		);
	}
}
