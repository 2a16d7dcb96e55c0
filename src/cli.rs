//! CLI argument parsing for the workflow tracker.
//!
//! The CLI is intentionally thin: every subcommand maps directly onto one
//! store or editor operation, with no policy of its own.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the phase tracker.
#[derive(Parser, Debug)]
#[command(
    name = "ptk",
    version,
    about = "Track epics, stories, and workflow phases for a project",
    after_help = "Examples:\n  ptk story init\n  ptk story update 1-1-add-login in-progress --assignee sam\n  ptk story next\n  ptk status init --name Demo --type web-app --level 2\n  ptk status phase Planning\n  ptk status complete Planning\n  ptk status artifact docs/prd.md \"Product requirements\"",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level command groups: structured story status vs narrative document.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the structured story/epic status file
    #[command(subcommand)]
    Story(StoryCommand),
    /// Manage the narrative workflow status document
    #[command(subcommand)]
    Status(StatusCommand),
}

#[derive(Subcommand, Debug)]
pub enum StoryCommand {
    /// Build the status file from the epics outline
    Init(ProjectArgs),
    /// Set a story's state (and optionally its assignee)
    Update(StoryUpdateArgs),
    /// Show the first story still in the backlog
    Next(ProjectArgs),
    /// Show one story's record
    Show(StoryShowArgs),
    /// List stories in a given state
    List(StoryListArgs),
}

#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// Create the narrative status document from its template
    Init(StatusInitArgs),
    /// Move the project to a workflow phase
    Phase(StatusPhaseArgs),
    /// Mark a phase's checklist complete
    Complete(StatusCompleteArgs),
    /// Record a created artifact
    Artifact(StatusArtifactArgs),
    /// Show the current phase and project level
    Show(ProjectArgs),
}

/// Arguments for commands that only need the project root.
#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StoryUpdateArgs {
    /// Story identifier, e.g. 1-2-add-logout
    pub id: String,

    /// New state: backlog, drafted, ready, in-progress, review, or done
    #[arg(value_name = "STATE")]
    pub state: String,

    /// Assign the story; omitting this keeps the current assignee
    #[arg(long, value_name = "NAME")]
    pub assignee: Option<String>,

    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StoryShowArgs {
    /// Story identifier, e.g. 1-2-add-logout
    pub id: String,

    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StoryListArgs {
    /// State to filter by
    #[arg(long, value_name = "STATE")]
    pub state: String,

    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StatusInitArgs {
    /// Project name written into the document header
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Project type, e.g. web-app or library
    #[arg(long = "type", value_name = "TYPE")]
    pub project_type: String,

    /// Project complexity level (0-4)
    #[arg(long, value_name = "LEVEL")]
    pub level: u32,

    /// Project owner
    #[arg(long, value_name = "NAME", default_value = "unassigned")]
    pub owner: String,

    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StatusPhaseArgs {
    /// Phase name: Analysis, Planning, Solutioning, or Implementation
    pub phase: String,

    /// Status label written next to the phase
    #[arg(long, value_name = "LABEL", default_value = "In Progress")]
    pub label: String,

    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StatusCompleteArgs {
    /// Phase name: Analysis, Planning, Solutioning, or Implementation
    pub phase: String,

    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StatusArtifactArgs {
    /// Path of the created artifact, relative to the project
    pub path: String,

    /// One-line description of the artifact
    pub description: String,

    /// Project directory holding the docs/ artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}
