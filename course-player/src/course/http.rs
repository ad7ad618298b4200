use crate::course::api::{ApiError, CourseApi};
use crate::course::model::{CourseContext, CourseId, Section};
use crate::course::rating::Rate;
use crate::course::session::Session;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// [`CourseApi`] talking JSON to the backend over HTTP.
///
/// Successful responses wrap their payload in `{"data": …}`, failures carry
/// `{"errors": [{"message": …}]}`.
#[derive(Clone, Debug)]
pub struct HttpCourseApi {
	client: reqwest::Client,
	base_url: Url,
	session: Session,
}

#[derive(Deserialize)]
struct Envelope<Data> {
	data: Data,
}

#[derive(Deserialize)]
struct CourseData {
	course: CourseContext,
}

#[derive(Deserialize)]
struct SectionsData {
	sections: Vec<Section>,
}

#[derive(Default, Deserialize)]
struct ErrorBody {
	#[serde(default)]
	errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
	message: String,
}

#[derive(Serialize)]
struct EvaluateRequest {
	rate: f64,
}

impl HttpCourseApi {
	pub fn new(base_url: Url, session: Session) -> Result<Self, ApiError> {
		let client = reqwest::Client::builder()
			.connect_timeout(Duration::from_secs(10))
			.timeout(Duration::from_secs(30))
			.build()?;

		Ok(Self {
			client,
			base_url: with_trailing_slash(base_url),
			session,
		})
	}

	fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
		let url = self.base_url.join(path)?;
		debug!("{method} {url}");

		let request = self.client.request(method, url);
		Ok(match self.session.token() {
			Some(token) => request.bearer_auth(token),
			None => request,
		})
	}

	async fn get<Data: DeserializeOwned>(&self, path: &str) -> Result<Data, ApiError> {
		let response = send(self.request(Method::GET, path)?).await?;
		let Envelope { data } = response.json::<Envelope<Data>>().await?;
		Ok(data)
	}
}

#[async_trait]
impl CourseApi for HttpCourseApi {
	async fn course(&self, id: &CourseId) -> Result<CourseContext, ApiError> {
		let CourseData { course } = self.get::<CourseData>(&format!("courses/{id}")).await?;
		Ok(course)
	}

	async fn sections(&self, id: &CourseId) -> Result<Vec<Section>, ApiError> {
		let SectionsData { sections } = self.get::<SectionsData>(&format!("courses/{id}/sections")).await?;
		Ok(sections)
	}

	async fn buy(&self, id: &CourseId) -> Result<(), ApiError> {
		send(self.request(Method::POST, &format!("courses/{id}/buy"))?).await?;
		Ok(())
	}

	async fn evaluate(&self, id: &CourseId, rate: Rate) -> Result<(), ApiError> {
		let request = self
			.request(Method::POST, &format!("courses/{id}/evaluate"))?
			.json(&EvaluateRequest { rate: rate.value() });
		send(request).await?;
		Ok(())
	}
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
	let response = request.send().await?;
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	if status == StatusCode::UNAUTHORIZED {
		return Err(ApiError::Unauthorized);
	}

	// a body that isn't the expected error format still yields the status
	let ErrorBody { errors } = response.json::<ErrorBody>().await.unwrap_or_default();
	Err(ApiError::Rejected {
		status: status.as_u16(),
		messages: errors.into_iter().map(|ErrorEntry { message }| message).collect(),
	})
}

/// [`Url::join`] replaces the last path segment unless the base ends with a slash.
fn with_trailing_slash(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());
		url.set_path(&path);
	}
	url
}
