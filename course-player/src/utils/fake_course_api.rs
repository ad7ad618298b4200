use crate::course::api::{ApiError, CourseApi};
use crate::course::model::{CourseContext, CourseId, Section};
use crate::course::rating::Rate;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
	Course(CourseId),
	Sections(CourseId),
	Buy(CourseId),
	Evaluate(CourseId, f64),
}

impl ApiCall {
	fn endpoint(&self) -> Endpoint {
		match self {
			ApiCall::Course(_) => Endpoint::Course,
			ApiCall::Sections(_) => Endpoint::Sections,
			ApiCall::Buy(_) => Endpoint::Buy,
			ApiCall::Evaluate(..) => Endpoint::Evaluate,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	Course,
	Sections,
	Buy,
	Evaluate,
}

/// In-memory backend. Queued failures are returned by the next calls of their endpoint, in order.
#[derive(Clone, Default)]
pub struct FakeCourseApi {
	course: Option<CourseContext>,
	sections: Vec<Section>,
	hanging: bool,
	failures: Arc<Mutex<HashMap<Endpoint, VecDeque<ApiError>>>>,
	calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl FakeCourseApi {
	pub fn with_course(mut self, course: CourseContext) -> Self {
		self.course = Some(course);
		self
	}

	pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
		self.sections = sections;
		self
	}

	/// Every call waits forever.
	pub fn hanging(mut self) -> Self {
		self.hanging = true;
		self
	}

	pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
		self.failures.lock().entry(endpoint).or_default().push_back(error);
	}

	pub fn calls(&self) -> Vec<ApiCall> {
		self.calls.lock().clone()
	}

	async fn respond(&self, call: ApiCall) -> Result<(), ApiError> {
		let endpoint = call.endpoint();
		self.calls.lock().push(call);
		if self.hanging {
			std::future::pending::<()>().await;
		}

		let failure = self
			.failures
			.lock()
			.get_mut(&endpoint)
			.and_then(VecDeque::pop_front);
		match failure {
			Some(error) => Err(error),
			None => Ok(()),
		}
	}
}

pub fn rejection(message: &str) -> ApiError {
	ApiError::Rejected {
		status: 400,
		messages: vec![message.to_string()],
	}
}

#[async_trait]
impl CourseApi for FakeCourseApi {
	async fn course(&self, id: &CourseId) -> Result<CourseContext, ApiError> {
		self.respond(ApiCall::Course(id.clone())).await?;
		self.course.clone().ok_or_else(|| ApiError::Rejected {
			status: 404,
			messages: vec!["course not found".to_string()],
		})
	}

	async fn sections(&self, id: &CourseId) -> Result<Vec<Section>, ApiError> {
		self.respond(ApiCall::Sections(id.clone())).await?;
		Ok(self.sections.clone())
	}

	async fn buy(&self, id: &CourseId) -> Result<(), ApiError> {
		self.respond(ApiCall::Buy(id.clone())).await
	}

	async fn evaluate(&self, id: &CourseId, rate: Rate) -> Result<(), ApiError> {
		self.respond(ApiCall::Evaluate(id.clone(), rate.value())).await
	}
}
