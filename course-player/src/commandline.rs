use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::course::model::{CourseId, VideoId};
use crate::error::CoursePlayerError;
use crate::lifecycle::watch_session::run_watch_session;
use crate::lifecycle::{buy_course, evaluate_course, show_course};
use std::time::Duration;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[command(version, about)]
pub struct Commandline {
	#[clap(short = 'c', long = "config-file", default_value = "configuration.toml")]
	pub configuration_file_path: String,
	#[clap(subcommand)]
	pub command: BaseCommand,
}

#[derive(clap::Subcommand)]
pub enum BaseCommand {
	/// Print the configuration
	Configuration,
	/// Show a course with its curriculum
	Course { course_id: String },
	/// Buy a course
	Buy {
		course_id: String,
		/// Don't ask for confirmation
		#[clap(long)]
		yes: bool,
	},
	/// Rate a course you attend, from 0 to 5 in steps of 0.5
	Evaluate {
		course_id: String,
		/// Asked for if missing
		rate: Option<f64>,
	},
	/// Watch a video with a simulated player, controlled by commands on stdin
	Watch {
		course_id: String,
		video_id: String,
		/// Length of the simulated video
		#[clap(long, default_value = "10m", value_parser = humantime::parse_duration)]
		duration: Duration,
	},
}

impl Commandline {
	pub async fn run(self) -> Result<(), CoursePlayerError> {
		let configuration = Configuration::from_file(&self.configuration_file_path)?;
		let application_context = ApplicationContext::new(configuration)?;

		tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::new(&application_context.configuration.log_filters))
			.with_writer(std::io::stderr)
			.init();
		match application_context.session.user() {
			Some(user) => info!("Signed in as '{}'.", user.username),
			None => info!("Not signed in."),
		}

		let mut stdout = tokio::io::stdout();
		let stdin = BufReader::new(tokio::io::stdin());
		match self.command {
			BaseCommand::Configuration => println!("{:#?}", application_context.configuration),
			BaseCommand::Course { course_id } => {
				show_course(&application_context, &CourseId::from(course_id), &mut stdout).await?;
			}
			BaseCommand::Buy { course_id, yes } => {
				buy_course(&application_context, &CourseId::from(course_id), yes, stdin, &mut stdout).await?;
			}
			BaseCommand::Evaluate { course_id, rate } => {
				evaluate_course(&application_context, &CourseId::from(course_id), rate, stdin, &mut stdout).await?;
			}
			BaseCommand::Watch {
				course_id,
				video_id,
				duration,
			} => {
				info!("Starting watch session, type 'help' for a list of commands.");
				run_watch_session(
					&application_context,
					&CourseId::from(course_id),
					VideoId::from(video_id),
					duration,
					stdin,
					&mut stdout,
				)
				.await?;
			}
		}
		Ok(())
	}
}
