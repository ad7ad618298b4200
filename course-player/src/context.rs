use crate::configuration::Configuration;
use crate::course::api::CourseApi;
use crate::course::http::HttpCourseApi;
use crate::course::session::Session;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApplicationContext {
	pub configuration: Configuration,
	pub session: Session,
	pub api: Arc<dyn CourseApi>,
}

impl ApplicationContext {
	pub fn new(configuration: Configuration) -> anyhow::Result<ApplicationContext> {
		let session = configuration.session();
		let api = HttpCourseApi::new(configuration.api_base_url.clone(), session.clone())
			.context("Failed to create the HTTP client")?;

		Ok(Self {
			configuration,
			session,
			api: Arc::new(api),
		})
	}

	#[cfg(test)]
	pub fn with_api(configuration: Configuration, api: impl CourseApi) -> ApplicationContext {
		Self {
			session: configuration.session(),
			configuration,
			api: Arc::new(api),
		}
	}
}
