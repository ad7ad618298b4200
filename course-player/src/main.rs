use crate::commandline::Commandline;
use crate::error::CoursePlayerError;
use clap::Parser;

mod commandline;
mod configuration;
mod context;
mod course;
mod error;
mod lifecycle;
mod player;
mod utils;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CoursePlayerError> {
	Commandline::parse().run().await
}
