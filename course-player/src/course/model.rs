use serde::{Deserialize, Serialize};

#[derive(
	derive_more::From,
	derive_more::Into,
	derive_more::Deref,
	derive_more::Display,
	Debug,
	Clone,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
)]
#[serde(transparent)]
pub struct CourseId(String);

impl From<&str> for CourseId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

#[derive(
	derive_more::From,
	derive_more::Into,
	derive_more::Deref,
	derive_more::Display,
	Debug,
	Clone,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
)]
#[serde(transparent)]
pub struct VideoId(String);

impl From<&str> for VideoId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

/// Read-only projection of a course as returned by `GET /courses/{id}`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseContext {
	pub id: CourseId,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	pub price: f64,
	/// Number of enrolled students.
	#[serde(default)]
	pub students: u64,
	#[serde(default)]
	pub rating: Option<RatingSummary>,
	pub owner: Owner,
	#[serde(default)]
	pub is_owner: bool,
	#[serde(default)]
	pub is_student: bool,
	#[serde(default)]
	pub banner_url: Option<String>,
	#[serde(default)]
	pub will_learn: Vec<String>,
}

impl CourseContext {
	/// Only visitors that neither own nor attend the course get to buy it.
	pub fn is_purchasable(&self) -> bool {
		!self.is_owner && !self.is_student
	}

	pub fn formatted_price(&self) -> String {
		format!("${:.2}", self.price)
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RatingSummary {
	pub rate: f64,
	pub count: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Owner {
	pub username: String,
	#[serde(default)]
	pub name: Option<String>,
}

impl Owner {
	pub fn display_name(&self) -> &str {
		self.name.as_deref().unwrap_or(&self.username)
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Video {
	pub id: VideoId,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
}

/// Videos are ordered by their position within the section.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Section {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub videos: Vec<Video>,
}

/// All sections of a course, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Curriculum {
	pub sections: Vec<Section>,
}

impl Curriculum {
	pub fn videos(&self) -> impl Iterator<Item = &Video> {
		self.sections.iter().flat_map(|section| section.videos.iter())
	}

	pub fn video(&self, id: &VideoId) -> Option<&Video> {
		self.videos().find(|video| &video.id == id)
	}

	/// The video following `current`, crossing section boundaries.
	pub fn next_video(&self, current: &VideoId) -> Option<&Video> {
		let mut videos = self.videos();
		videos.find(|video| &video.id == current)?;
		videos.next()
	}
}

impl From<Vec<Section>> for Curriculum {
	fn from(sections: Vec<Section>) -> Self {
		Self { sections }
	}
}
