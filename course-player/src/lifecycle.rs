use crate::context::ApplicationContext;
use crate::course::model::{CourseContext, CourseId, Curriculum};
use crate::course::navigation::Navigation;
use crate::course::purchase::{PurchaseFlow, PurchaseStep};
use crate::course::rating::{Rate, RatingFlow};
use crate::error::CoursePlayerError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

pub mod watch_command;
pub mod watch_session;

pub(crate) async fn write_line(output: &mut (impl AsyncWrite + Unpin), text: &str) -> std::io::Result<()> {
	output.write_all(text.as_bytes()).await?;
	output.write_all(b"\n").await?;
	output.flush().await
}

fn course_path(course_id: &CourseId) -> String {
	format!("/c/{course_id}")
}

/// Prints the course page. The curriculum is left out if it can't be loaded.
pub async fn show_course(
	context: &ApplicationContext,
	course_id: &CourseId,
	output: &mut (impl AsyncWrite + Unpin),
) -> Result<(), CoursePlayerError> {
	let course = context.api.course(course_id).await?;
	let curriculum = match context.api.sections(course_id).await {
		Ok(sections) => Some(Curriculum::from(sections)),
		Err(error) => {
			warn!("Failed to load the curriculum of {course_id}: {error}");
			None
		}
	};

	write_line(output, &render_course(&course, curriculum.as_ref())).await?;
	Ok(())
}

fn render_course(course: &CourseContext, curriculum: Option<&Curriculum>) -> String {
	let mut lines = vec![course.name.clone(), format!("by {}", course.owner.display_name())];
	lines.push(match &course.rating {
		Some(rating) => format!("rated {} ({} ratings), {} students", rating.rate, rating.count, course.students),
		None => format!("not rated yet, {} students", course.students),
	});
	if let Some(description) = &course.description {
		lines.extend([String::new(), description.clone()]);
	}

	if !course.will_learn.is_empty() {
		lines.extend([String::new(), "You will learn:".to_string()]);
		lines.extend(course.will_learn.iter().map(|topic| format!("  - {topic}")));
	}

	if let Some(curriculum) = curriculum {
		lines.extend([String::new(), "Curriculum:".to_string()]);
		for section in &curriculum.sections {
			lines.push(format!("  {}", section.name));
			lines.extend(section.videos.iter().map(|video| format!("    {}  {}", video.id, video.name)));
		}
	}

	lines.push(String::new());
	lines.push(if course.is_owner {
		"You own this course.".to_string()
	} else if course.is_student {
		format!("You attend this course, watch it at {}", Navigation::Watch(course.id.clone()))
	} else {
		format!("{}, buy it with 'buy {}'", course.formatted_price(), course.id)
	});
	lines.join("\n")
}

/// Asks for confirmation on `input` unless already `confirmed`.
pub async fn buy_course(
	context: &ApplicationContext,
	course_id: &CourseId,
	confirmed: bool,
	input: impl AsyncBufRead + Unpin,
	output: &mut (impl AsyncWrite + Unpin),
) -> Result<(), CoursePlayerError> {
	let course = context.api.course(course_id).await?;
	let mut flow = PurchaseFlow::new(&course);

	match flow.request_purchase(&context.session, &course_path(course_id))? {
		PurchaseStep::Redirect(navigation) => {
			write_line(output, &format!("Sign in first, then continue at {navigation}")).await?;
			return Ok(());
		}
		PurchaseStep::Confirming => {}
	}

	if !confirmed {
		write_line(output, &format!("{} A purchase can't be returned. [y/N]", flow.confirmation_message())).await?;
		let answer = input.lines().next_line().await?.unwrap_or_default();
		if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
			debug!("Purchase of {course_id} cancelled.");
			flow.cancel();
			write_line(output, "Cancelled.").await?;
			return Ok(());
		}
	}

	let navigation = flow.confirm(context.api.as_ref()).await?;
	write_line(output, &format!("Bought '{}', find it at {navigation}", course.name)).await?;
	Ok(())
}

/// Asks for the rate on `input` unless given.
pub async fn evaluate_course(
	context: &ApplicationContext,
	course_id: &CourseId,
	rate: Option<f64>,
	input: impl AsyncBufRead + Unpin,
	output: &mut (impl AsyncWrite + Unpin),
) -> Result<(), CoursePlayerError> {
	let rate = rate.map(Rate::try_from).transpose()?;
	let course = context.api.course(course_id).await?;
	let mut flow = RatingFlow::new(&course);
	flow.open()?;

	let rate = match rate {
		Some(rate) => Some(rate),
		None => ask_for_rate(&course, input, output).await?,
	};
	let Some(rate) = rate else {
		flow.cancel();
		write_line(output, "Cancelled.").await?;
		return Ok(());
	};

	flow.set_rate(rate)?;
	let rate = flow.submit(context.api.as_ref()).await?;
	write_line(output, &format!("Rated '{}' with {rate} of {}.", course.name, Rate::MAXIMUM)).await?;
	Ok(())
}

/// `None` if the user gave up.
async fn ask_for_rate(
	course: &CourseContext,
	input: impl AsyncBufRead + Unpin,
	output: &mut (impl AsyncWrite + Unpin),
) -> Result<Option<Rate>, CoursePlayerError> {
	let mut lines = input.lines();
	loop {
		let prompt = format!(
			"Rate '{}' from 0 to {} in steps of 0.5, leave empty to cancel:",
			course.name,
			Rate::MAXIMUM
		);
		write_line(output, &prompt).await?;

		let Some(line) = lines.next_line().await? else {
			return Ok(None);
		};
		let line = line.trim();
		if line.is_empty() {
			return Ok(None);
		}

		let Ok(value) = line.parse::<f64>() else {
			write_line(output, &format!("'{line}' is not a number.")).await?;
			continue;
		};
		match Rate::try_from(value) {
			Ok(rate) => return Ok(Some(rate)),
			Err(error) => write_line(output, &error.to_string()).await?,
		}
	}
}
