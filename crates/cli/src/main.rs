//! Pathwise CLI - AI learning-path companion.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pathwise_core::{
    Goal, LearnerProfile, MilestoneStatus, Preference, SkillLevel, UserContext, UserId,
};
use pathwise_genai::GeminiClient;
use pathwise_progress::ProgressionEngine;
use pathwise_quiz::QuizEvaluator;
use pathwise_roadmap::RoadmapService;
use pathwise_storage::{JsonStorage, Storage};
use pathwise_suggest::SuggestionService;
use tokio::sync::Mutex;
use tracing::Level;

#[derive(Parser)]
#[command(name = "pathwise")]
#[command(about = "AI learning-path companion", long_about = None)]
struct Cli {
    /// Acting user id (or set PATHWISE_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Display name printed on certificates
    #[arg(long, global = true)]
    name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a course roadmap from a learning goal
    Generate {
        /// What to learn, e.g. "Web Development"
        topic: String,
        /// Available time, e.g. "1 week", "2 weeks", "4 weeks"
        #[arg(long, default_value = "2 weeks")]
        duration: String,
        /// Skill level: beginner | intermediate | advanced
        #[arg(long, default_value = "beginner")]
        skill: String,
        /// Learning style: videos | notes | interactive
        #[arg(long, default_value = "videos")]
        preference: String,
        /// Learning goal: exam | project | placement | other
        #[arg(long, default_value = "project")]
        goal: String,
    },
    /// List courses
    Courses,
    /// Show a course roadmap with per-milestone status
    Show {
        /// Course ID
        course: String,
    },
    /// Open a milestone to study its resources and quiz
    Open {
        /// Course ID
        course: String,
        /// Milestone ID
        milestone: String,
    },
    /// Submit quiz answers for a milestone
    Submit {
        /// Course ID
        course: String,
        /// Milestone ID
        milestone: String,
        /// Comma-separated option indices, one per question (e.g. 0,2,1)
        #[arg(long)]
        answers: String,
    },
    /// Suggest what to learn after a completed course
    Suggest {
        /// Course ID
        course: String,
        /// Free-text preferences to bias the suggestions
        #[arg(long, default_value = "advanced learning")]
        preferences: String,
    },
    /// Export the completion certificate as an HTML document
    Certificate {
        /// Course ID
        course: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let ctx = build_context(&cli)?;

    // Open storage
    let storage_path = std::path::PathBuf::from(".pathwise");
    let storage = Arc::new(Mutex::new(JsonStorage::new(&storage_path).await?));

    match cli.command {
        Commands::Generate {
            topic,
            duration,
            skill,
            preference,
            goal,
        } => {
            let profile = LearnerProfile {
                topic,
                duration,
                skill_level: parse_skill(&skill)?,
                preference: parse_preference(&preference)?,
                goal: parse_goal(&goal)?,
            };

            let client = GeminiClient::from_env()?;
            let service = RoadmapService::new(storage, client);
            let generated = service.generate(&ctx, &profile).await?;

            println!("Created course: {} - {}", generated.course.id, generated.course.name);
            println!("  Duration: {}", generated.course.duration);
            for milestone in &generated.milestones {
                println!("  {}. {} ({})", milestone.order_index, milestone.title, milestone.id);
            }
        }
        Commands::Courses => {
            let courses = storage.lock().await.list_courses(ctx.user_id).await?;
            let engine = ProgressionEngine::new(storage);

            println!("Courses ({})", courses.len());
            for course in courses {
                let view = engine.course_view(&ctx, course.id).await?;
                println!(
                    "  {} | {:9} | {:3}% - {}",
                    course.id,
                    format_course_status(course.status),
                    view.progress.percentage(),
                    course.name,
                );
            }
        }
        Commands::Show { course } => {
            let course_id = course.parse().map_err(|_| anyhow::anyhow!("Invalid course ID"))?;
            let engine = ProgressionEngine::new(storage);
            let view = engine.course_view(&ctx, course_id).await?;

            println!("Course: {}", view.course.name);
            println!("  Duration: {}", view.course.duration);
            println!("  Status: {}", format_course_status(view.course.status));
            println!(
                "  Progress: {}/{} milestones ({}%)",
                view.progress.completed,
                view.progress.total,
                view.progress.percentage(),
            );
            for item in &view.milestones {
                println!(
                    "  {}. [{}] {} ({})",
                    item.milestone.order_index,
                    format_milestone_status(item.status),
                    item.milestone.title,
                    item.milestone.id,
                );
            }
        }
        Commands::Open { course, milestone } => {
            let course_id = course.parse().map_err(|_| anyhow::anyhow!("Invalid course ID"))?;
            let milestone_id =
                milestone.parse().map_err(|_| anyhow::anyhow!("Invalid milestone ID"))?;
            let engine = ProgressionEngine::new(storage);
            let view = engine.open_milestone(&ctx, course_id, milestone_id).await?;

            println!("Milestone {}: {}", view.milestone.order_index, view.milestone.title);
            println!("  Status: {}", format_milestone_status(view.status));

            if let Some(website) = &view.milestone.resources.website {
                println!("  Website: {}", website);
            }
            for video in &view.milestone.resources.youtube {
                println!("  Video: {} ({}) - {}", video.title, video.channel, video.url);
            }
            for resource in &view.milestone.resources.additional {
                println!("  {}: {} - {}", resource.kind, resource.title, resource.url);
            }

            println!("  Quiz ({} questions):", view.milestone.quiz.len());
            for (index, question) in view.milestone.quiz.iter().enumerate() {
                println!("    {}. {}", index + 1, question.question);
                for (option_index, option) in question.options.iter().enumerate() {
                    println!("       {}) {}", option_index, option);
                }
            }
        }
        Commands::Submit {
            course,
            milestone,
            answers,
        } => {
            let course_id = course.parse().map_err(|_| anyhow::anyhow!("Invalid course ID"))?;
            let milestone_id =
                milestone.parse().map_err(|_| anyhow::anyhow!("Invalid milestone ID"))?;
            let answers = parse_answers(&answers)?;

            let evaluator = QuizEvaluator::new(storage);
            let outcome = evaluator.submit(&ctx, course_id, milestone_id, &answers).await?;

            if outcome.passed {
                println!("Quiz passed! Score: {}%", outcome.score);
                if outcome.course_completed {
                    println!("Course completed! Certificate generated.");
                }
            } else {
                println!("Score: {}%. You need 100% to pass. Try again!", outcome.score);
            }
        }
        Commands::Suggest { course, preferences } => {
            let course_id = course.parse().map_err(|_| anyhow::anyhow!("Invalid course ID"))?;
            let engine = ProgressionEngine::new(storage);
            let view = engine.course_view(&ctx, course_id).await?;
            if view.course.status != pathwise_core::CourseStatus::Completed {
                anyhow::bail!("Course is not completed yet - suggestions unlock with the certificate");
            }

            let client = GeminiClient::from_env()?;
            let service = SuggestionService::new(client);
            let suggestions = service.suggest(&view.course.name, &preferences).await?;

            println!("{}", suggestions.current_opportunities.title);
            for item in &suggestions.current_opportunities.items {
                println!("  - {}", item);
            }
            println!("{}", suggestions.next_steps.title);
            for step in &suggestions.next_steps.items {
                println!("  - {}: {} ({})", step.name, step.description, step.impact);
            }
            println!("{}", suggestions.career_paths.title);
            for item in &suggestions.career_paths.items {
                println!("  - {}", item);
            }
        }
        Commands::Certificate { course } => {
            let course_id = course.parse().map_err(|_| anyhow::anyhow!("Invalid course ID"))?;
            let certificate = storage
                .lock()
                .await
                .load_certificate(ctx.user_id, course_id)
                .await?;

            let Some(certificate) = certificate else {
                println!("No certificate yet - complete every milestone first.");
                return Ok(());
            };

            let file_name = certificate.data.file_name();
            std::fs::write(&file_name, certificate.data.render_html())?;
            println!("Certificate written to {}", file_name);
        }
    }

    Ok(())
}

fn build_context(cli: &Cli) -> Result<UserContext> {
    let user_id: Option<UserId> = cli
        .user
        .clone()
        .or_else(|| std::env::var("PATHWISE_USER").ok())
        .map(|s| s.parse())
        .transpose()
        .map_err(|_| anyhow::anyhow!("Invalid user ID"))?;

    let mut ctx = UserContext::require(user_id)?;
    if let Some(name) = &cli.name {
        ctx = ctx.with_name(name.clone());
    }
    Ok(ctx)
}

fn parse_skill(s: &str) -> Result<SkillLevel> {
    match s.to_lowercase().as_str() {
        "beginner" => Ok(SkillLevel::Beginner),
        "intermediate" => Ok(SkillLevel::Intermediate),
        "advanced" => Ok(SkillLevel::Advanced),
        _ => anyhow::bail!("Unknown skill level: {}", s),
    }
}

fn parse_preference(s: &str) -> Result<Preference> {
    match s.to_lowercase().as_str() {
        "videos" => Ok(Preference::Videos),
        "notes" => Ok(Preference::Notes),
        "interactive" => Ok(Preference::Interactive),
        _ => anyhow::bail!("Unknown preference: {}", s),
    }
}

fn parse_goal(s: &str) -> Result<Goal> {
    match s.to_lowercase().as_str() {
        "exam" => Ok(Goal::Exam),
        "project" => Ok(Goal::Project),
        "placement" => Ok(Goal::Placement),
        "other" => Ok(Goal::Other),
        _ => anyhow::bail!("Unknown goal: {}", s),
    }
}

fn parse_answers(s: &str) -> Result<Vec<i32>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| anyhow::anyhow!("Invalid answer index: {}", part))
        })
        .collect()
}

fn format_course_status(status: pathwise_core::CourseStatus) -> &'static str {
    match status {
        pathwise_core::CourseStatus::Active => "ACTIVE",
        pathwise_core::CourseStatus::Completed => "COMPLETED",
    }
}

fn format_milestone_status(status: MilestoneStatus) -> &'static str {
    match status {
        MilestoneStatus::Locked => "LOCKED",
        MilestoneStatus::Active => "ACTIVE",
        MilestoneStatus::Completed => "DONE",
    }
}
