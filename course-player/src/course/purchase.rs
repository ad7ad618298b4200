use crate::course::api::{ApiError, CourseApi};
use crate::course::model::{CourseContext, CourseId};
use crate::course::navigation::Navigation;
use crate::course::session::Session;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PurchaseState {
	#[default]
	Idle,
	/// The confirmation modal is shown.
	Confirming,
	Submitting,
	Settled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PurchaseStep {
	Redirect(Navigation),
	Confirming,
}

#[derive(Error, Debug)]
pub enum PurchaseError {
	#[error("Owners and students of a course can't buy it.")]
	NotPurchasable,
	#[error("There is no purchase to confirm.")]
	NotConfirming,
	#[error("The purchase is already being submitted.")]
	Submitting,
	#[error("Purchase failed, check your balance and try again later.")]
	Rejected(#[source] ApiError),
}

/// Confirmation driven purchase of a single course.
#[derive(Debug)]
pub struct PurchaseFlow {
	course_id: CourseId,
	course_name: String,
	price: String,
	purchasable: bool,
	state: PurchaseState,
}

impl PurchaseFlow {
	pub fn new(course: &CourseContext) -> Self {
		Self {
			course_id: course.id.clone(),
			course_name: course.name.clone(),
			price: course.formatted_price(),
			purchasable: course.is_purchasable(),
			state: PurchaseState::default(),
		}
	}

	#[cfg(test)]
	pub fn state(&self) -> PurchaseState {
		self.state
	}

	pub fn confirmation_message(&self) -> String {
		format!("Buy \"{}\" for {}?", self.course_name, self.price)
	}

	/// Anonymous users are sent to sign in and come back to `current_path` afterwards.
	pub fn request_purchase(&mut self, session: &Session, current_path: &str) -> Result<PurchaseStep, PurchaseError> {
		if !session.is_authenticated() {
			info!("Sign in required to buy {}.", self.course_id);
			return Ok(PurchaseStep::Redirect(Navigation::SignIn {
				redirect: current_path.to_string(),
			}));
		}

		match self.state {
			PurchaseState::Submitting => Err(PurchaseError::Submitting),
			PurchaseState::Settled => Err(PurchaseError::NotPurchasable),
			PurchaseState::Idle | PurchaseState::Confirming if !self.purchasable => Err(PurchaseError::NotPurchasable),
			PurchaseState::Idle | PurchaseState::Confirming => {
				self.state = PurchaseState::Confirming;
				Ok(PurchaseStep::Confirming)
			}
		}
	}

	pub fn cancel(&mut self) {
		if self.state == PurchaseState::Confirming {
			self.state = PurchaseState::Idle;
		}
	}

	/// Submits the purchase. If the returned future is dropped before it completes,
	/// the flow falls back to [`PurchaseState::Idle`].
	pub async fn confirm(&mut self, api: &dyn CourseApi) -> Result<Navigation, PurchaseError> {
		if self.state != PurchaseState::Confirming {
			return Err(PurchaseError::NotConfirming);
		}

		let submission = Submission::start(&mut self.state);
		match api.buy(&self.course_id).await {
			Ok(()) => {
				submission.settle();
				info!("Bought {}.", self.course_id);
				Ok(Navigation::UserCourses)
			}
			Err(error) => {
				warn!("Buying {} failed: {error}", self.course_id);
				Err(PurchaseError::Rejected(error))
			}
		}
	}
}

/// Resets the state to idle unless settled.
struct Submission<'flow> {
	state: &'flow mut PurchaseState,
}

impl<'flow> Submission<'flow> {
	fn start(state: &'flow mut PurchaseState) -> Self {
		*state = PurchaseState::Submitting;
		Self { state }
	}

	fn settle(self) {
		*self.state = PurchaseState::Settled;
	}
}

impl Drop for Submission<'_> {
	fn drop(&mut self) {
		if *self.state == PurchaseState::Submitting {
			*self.state = PurchaseState::Idle;
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::course::model::test::course;
	use crate::utils::fake_course_api::{ApiCall, Endpoint, FakeCourseApi, rejection};
	use std::time::Duration;

	fn signed_in() -> Session {
		Session::signed_in("alice", "token")
	}

	#[test]
	fn anonymous_users_should_be_redirected_to_sign_in() {
		let mut flow = PurchaseFlow::new(&course(false, false));

		let step = flow
			.request_purchase(&Session::anonymous(), "/c/V1StGXR8_Z5jdHi6B-myT")
			.expect("Request failed");

		assert_eq!(
			step,
			PurchaseStep::Redirect(Navigation::SignIn {
				redirect: "/c/V1StGXR8_Z5jdHi6B-myT".to_string()
			})
		);
		assert_eq!(flow.state(), PurchaseState::Idle);
	}

	#[test]
	fn signed_in_users_should_be_asked_for_confirmation() {
		let mut flow = PurchaseFlow::new(&course(false, false));

		let step = flow.request_purchase(&signed_in(), "/").expect("Request failed");

		assert_eq!(step, PurchaseStep::Confirming);
		assert_eq!(flow.state(), PurchaseState::Confirming);
		assert_eq!(flow.confirmation_message(), "Buy \"Rust for Rustaceans\" for $12.50?");
	}

	#[test]
	fn owners_and_students_should_not_be_able_to_buy() {
		for course in [course(true, false), course(false, true)] {
			let mut flow = PurchaseFlow::new(&course);

			let result = flow.request_purchase(&signed_in(), "/");

			assert!(matches!(result, Err(PurchaseError::NotPurchasable)));
			assert_eq!(flow.state(), PurchaseState::Idle);
		}
	}

	#[test]
	fn cancel_should_close_the_confirmation() {
		let mut flow = PurchaseFlow::new(&course(false, false));
		flow.request_purchase(&signed_in(), "/").expect("Request failed");

		flow.cancel();

		assert_eq!(flow.state(), PurchaseState::Idle);
	}

	#[tokio::test]
	async fn confirming_should_buy_and_navigate_to_the_users_courses() {
		let api = FakeCourseApi::default();
		let mut flow = PurchaseFlow::new(&course(false, false));
		flow.request_purchase(&signed_in(), "/").expect("Request failed");

		let navigation = flow.confirm(&api).await.expect("Purchase failed");

		assert_eq!(navigation, Navigation::UserCourses);
		assert_eq!(flow.state(), PurchaseState::Settled);
		assert_eq!(api.calls(), vec![ApiCall::Buy(CourseId::from("V1StGXR8_Z5jdHi6B-myT"))]);
	}

	#[tokio::test]
	async fn confirming_without_request_should_fail() {
		let api = FakeCourseApi::default();
		let mut flow = PurchaseFlow::new(&course(false, false));

		let result = flow.confirm(&api).await;

		assert!(matches!(result, Err(PurchaseError::NotConfirming)));
		assert!(api.calls().is_empty());
	}

	#[tokio::test]
	async fn a_failed_purchase_should_allow_a_retry() {
		let api = FakeCourseApi::default();
		api.fail_next(Endpoint::Buy, rejection("insufficient balance"));
		let mut flow = PurchaseFlow::new(&course(false, false));
		flow.request_purchase(&signed_in(), "/").expect("Request failed");

		let error = flow.confirm(&api).await.expect_err("Purchase succeeded");
		assert_eq!(error.to_string(), "Purchase failed, check your balance and try again later.");
		assert_eq!(flow.state(), PurchaseState::Idle);

		let step = flow.request_purchase(&signed_in(), "/").expect("Retry failed");
		assert_eq!(step, PurchaseStep::Confirming);
		flow.confirm(&api).await.expect("Retried purchase failed");
		assert_eq!(flow.state(), PurchaseState::Settled);
	}

	#[tokio::test(start_paused = true)]
	async fn abandoning_a_submission_should_return_to_idle() {
		let api = FakeCourseApi::default().hanging();
		let mut flow = PurchaseFlow::new(&course(false, false));
		flow.request_purchase(&signed_in(), "/").expect("Request failed");

		let result = tokio::time::timeout(Duration::from_secs(30), flow.confirm(&api)).await;

		assert!(result.is_err(), "Purchase completed");
		assert_eq!(flow.state(), PurchaseState::Idle);
	}

	#[tokio::test]
	async fn a_settled_purchase_cannot_be_repeated() {
		let api = FakeCourseApi::default();
		let mut flow = PurchaseFlow::new(&course(false, false));
		flow.request_purchase(&signed_in(), "/").expect("Request failed");
		flow.confirm(&api).await.expect("Purchase failed");

		let result = flow.request_purchase(&signed_in(), "/");

		assert!(matches!(result, Err(PurchaseError::NotPurchasable)));
	}
}
