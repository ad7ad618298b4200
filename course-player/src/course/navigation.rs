use crate::course::model::CourseId;
use std::fmt::{Display, Formatter};

/// Client side routes the flows can send the user to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
	/// Sign in first, then come back to `redirect`.
	SignIn { redirect: String },
	/// The courses the signed in user attends.
	UserCourses,
	Watch(CourseId),
}

impl Display for Navigation {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Navigation::SignIn { redirect } => write!(formatter, "/auth/signin?redirect={redirect}"),
			Navigation::UserCourses => formatter.write_str("/u/courses"),
			Navigation::Watch(course_id) => write!(formatter, "/watch/{course_id}"),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn should_render_paths() {
		assert_eq!(
			Navigation::SignIn {
				redirect: "/c/abc".to_string()
			}
			.to_string(),
			"/auth/signin?redirect=/c/abc"
		);
		assert_eq!(Navigation::UserCourses.to_string(), "/u/courses");
		assert_eq!(Navigation::Watch(CourseId::from("abc")).to_string(), "/watch/abc");
	}
}
