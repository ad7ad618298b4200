/// Who is using the client. Issuing tokens happens elsewhere, this only carries one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
	user: Option<SignedInUser>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedInUser {
	pub username: String,
	pub token: String,
}

impl Session {
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn signed_in(username: impl Into<String>, token: impl Into<String>) -> Self {
		Self {
			user: Some(SignedInUser {
				username: username.into(),
				token: token.into(),
			}),
		}
	}

	pub fn user(&self) -> Option<&SignedInUser> {
		self.user.as_ref()
	}

	pub fn is_authenticated(&self) -> bool {
		self.user.is_some()
	}

	pub fn token(&self) -> Option<&str> {
		self.user.as_ref().map(|user| user.token.as_str())
	}
}
