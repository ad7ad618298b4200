use crate::course::api::{ApiError, CourseApi};
use crate::course::model::{CourseContext, CourseId};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing::{info, warn};

/// A course rating between 0 and 5 in half steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Rate(f64);

impl Rate {
	pub const ZERO: Rate = Rate(0.0);
	pub const MAXIMUM: f64 = 5.0;

	pub fn value(self) -> f64 {
		self.0
	}
}

impl TryFrom<f64> for Rate {
	type Error = RatingError;

	fn try_from(value: f64) -> Result<Self, Self::Error> {
		let in_range = (0.0..=Self::MAXIMUM).contains(&value);
		if !in_range || (value * 2.0).fract() != 0.0 {
			return Err(RatingError::InvalidRate(value));
		}
		Ok(Self(value))
	}
}

impl Display for Rate {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(formatter, "{}", self.0)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RatingState {
	#[default]
	Closed,
	Open {
		rate: Rate,
	},
	Submitted {
		rate: Rate,
	},
}

#[derive(Error, Debug)]
pub enum RatingError {
	#[error("Only students of a course can rate it.")]
	NotStudent,
	#[error("{0} is not a valid rate, use 0 to 5 in steps of 0.5.")]
	InvalidRate(f64),
	#[error("The rating dialog is not open.")]
	NotOpen,
	#[error("Failed to submit the rating: {0}")]
	Rejected(ApiError),
}

#[derive(Debug)]
pub struct RatingFlow {
	course_id: CourseId,
	is_student: bool,
	state: RatingState,
}

impl RatingFlow {
	pub fn new(course: &CourseContext) -> Self {
		Self {
			course_id: course.id.clone(),
			is_student: course.is_student,
			state: RatingState::default(),
		}
	}

	#[cfg(test)]
	pub fn state(&self) -> RatingState {
		self.state
	}

	/// Reopening after a submission starts from the submitted rate.
	pub fn open(&mut self) -> Result<(), RatingError> {
		if !self.is_student {
			return Err(RatingError::NotStudent);
		}

		self.state = match self.state {
			RatingState::Closed => RatingState::Open { rate: Rate::ZERO },
			RatingState::Submitted { rate } | RatingState::Open { rate } => RatingState::Open { rate },
		};
		Ok(())
	}

	pub fn set_rate(&mut self, rate: Rate) -> Result<(), RatingError> {
		match &mut self.state {
			RatingState::Open { rate: current } => {
				*current = rate;
				Ok(())
			}
			_ => Err(RatingError::NotOpen),
		}
	}

	pub fn cancel(&mut self) {
		if let RatingState::Open { .. } = self.state {
			self.state = RatingState::Closed;
		}
	}

	/// On failure the dialog stays open so the user can retry.
	pub async fn submit(&mut self, api: &dyn CourseApi) -> Result<Rate, RatingError> {
		let RatingState::Open { rate } = self.state else {
			return Err(RatingError::NotOpen);
		};

		if rate == Rate::ZERO {
			warn!("Submitting a rate of 0 for {}.", self.course_id);
		}

		api.evaluate(&self.course_id, rate).await.map_err(|error| {
			warn!("Rating {} failed: {error}", self.course_id);
			RatingError::Rejected(error)
		})?;

		info!("Rated {} with {rate}.", self.course_id);
		self.state = RatingState::Submitted { rate };
		Ok(rate)
	}
}
