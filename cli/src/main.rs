use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use coursekit::error::{AppError, AppResult, run_with_error_handler};
use coursekit::form::PreviewState;
use coursekit::{Config, Course, CourseForm, CourseImage, LessonDraft};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for composing a course and printing it as JSON", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose a course from arguments
    Compose {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Cover image file
        #[arg(long)]
        image: Option<PathBuf>,
        /// `title|video_url[|description[|duration]]`, repeatable
        #[arg(long = "lesson", value_parser = parse_lesson)]
        lessons: Vec<LessonDraft>,
    },

    /// Compose a course from a TOML manifest
    Manifest {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct Manifest {
    title: String,
    #[serde(default)]
    description: String,
    /// Relative to the manifest file
    image: Option<PathBuf>,
    #[serde(default)]
    lessons: Vec<LessonDraft>,
}

fn parse_lesson(arg: &str) -> Result<LessonDraft, String> {
    let mut parts = arg.split('|').map(str::trim);
    let (Some(title), Some(video_url)) = (parts.next(), parts.next()) else {
        return Err(format!("expected `title|video_url[|description[|duration]]`, got `{arg}`"));
    };

    let mut draft = LessonDraft::new(title, video_url);
    if let Some(description) = parts.next() {
        draft = draft.with_description(description);
    }
    if let Some(duration) = parts.next().filter(|d| !d.is_empty()) {
        draft = draft.with_duration(duration);
    }
    if parts.next().is_some() {
        return Err(format!("too many fields in `{arg}`"));
    }

    let missing = draft.missing_fields();
    if !missing.is_empty() {
        return Err(format!("lesson is missing: {}", missing.join(", ")));
    }
    Ok(draft)
}

/// Applies the `--lesson` required-field check to manifest lessons.
fn check_lessons(lessons: &[LessonDraft]) -> AppResult<()> {
    for (index, draft) in lessons.iter().enumerate() {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::InvalidLesson {
                index,
                missing: missing.join(", "),
            });
        }
    }
    Ok(())
}

async fn compose(
    config: &Config,
    title: String,
    description: String,
    image: Option<&Path>,
    lessons: Vec<LessonDraft>,
) -> AppResult<Course> {
    let mut submitted: Option<Course> = None;
    let mut form = CourseForm::with_config(config, |course: Course| submitted = Some(course));

    form.set_title(title);
    form.set_description(description);

    if let Some(path) = image {
        let image = CourseImage::from_path(path)?;
        if let Some(ticket) = form.attach_image(Some(image)) {
            let event = ticket.load().await;
            form.apply_preview(event);
        }
        if let PreviewState::Failed(reason) = form.preview_state() {
            tracing::warn!("cover preview unavailable: {}", reason);
        }
    }

    for draft in lessons {
        form.open_lesson_creator();
        let id = form.add_lesson(draft);
        tracing::debug!("lesson {} added", id);
    }

    for issue in form.field_issues() {
        tracing::warn!("{}", issue);
    }

    if !form.submit() {
        let reason = if form.course().title().is_empty() {
            "title is empty"
        } else {
            "course has no lessons"
        };
        return Err(AppError::NotSubmittable {
            reason: reason.to_string(),
        });
    }
    drop(form);

    submitted.ok_or_else(|| AppError::NotSubmittable {
        reason: "course was not handed over".to_string(),
    })
}

async fn run() -> AppResult<()> {
    coursekit::setup_trace();
    let args = Cli::parse();
    let config = Config::get_or_init(false).await;

    let course = match args.command {
        Commands::Compose {
            title,
            description,
            image,
            lessons,
        } => compose(config, title, description, image.as_deref(), lessons).await?,

        Commands::Manifest { file } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let manifest: Manifest = toml::from_str(&text)?;
            check_lessons(&manifest.lessons)?;
            let base = file.parent().unwrap_or(Path::new("."));
            let image = manifest.image.map(|p| base.join(p));

            compose(
                config,
                manifest.title,
                manifest.description,
                image.as_deref(),
                manifest.lessons,
            )
            .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&course)?);
    tracing::info!(
        "course '{}' composed, total duration {}s",
        course.title(),
        course.total_duration().num_seconds()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    run_with_error_handler(run).await;
}
