//! Thin command dispatch for the `ptk` workflow tracker.
//!
//! Each subcommand maps onto exactly one store or editor operation. Errors
//! propagate unmodified to the error stream with a non-zero exit.
use anyhow::Result;
use clap::Parser;

mod cli;
mod error;
mod narrative;
mod outline;
mod paths;
mod phase;
mod recommend;
mod store;
mod templates;

use cli::{Command, RootArgs, StatusCommand, StoryCommand};
use narrative::NarrativeDoc;
use paths::ProjectPaths;
use std::path::Path;
use store::{StatusStore, StoryState};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Story(cmd) => run_story(cmd),
        Command::Status(cmd) => run_status(cmd),
    }
}

fn run_story(cmd: StoryCommand) -> Result<()> {
    match cmd {
        StoryCommand::Init(args) => {
            let summary = store_for(&args.project_dir).init()?;
            println!(
                "Initialized development status: {} epics, {} stories.",
                summary.epics, summary.stories
            );
        }
        StoryCommand::Update(args) => {
            let state: StoryState = args.state.parse()?;
            store_for(&args.project_dir).update_story(&args.id, state, args.assignee.as_deref())?;
            println!("Updated {} to {state}.", args.id);
        }
        StoryCommand::Next(args) => match store_for(&args.project_dir).next_backlog_story()? {
            Some((id, story)) => println!("{id} - {}", story.title),
            None => println!("No backlog stories."),
        },
        StoryCommand::Show(args) => match store_for(&args.project_dir).get_story(&args.id)? {
            Some(story) => {
                println!("{}: {}", args.id, story.title);
                println!("status: {}", story.status);
                println!("assigned: {}", story.assigned_to.as_deref().unwrap_or("-"));
                println!("started: {}", story.started.as_deref().unwrap_or("-"));
                println!("completed: {}", story.completed.as_deref().unwrap_or("-"));
            }
            None => println!("Story not found: {}", args.id),
        },
        StoryCommand::List(args) => {
            let state: StoryState = args.state.parse()?;
            let stories = store_for(&args.project_dir).stories_by_state(state)?;
            if stories.is_empty() {
                println!("No stories with state {state}.");
            }
            for (id, story) in stories {
                println!("{id} - {}", story.title);
            }
        }
    }
    Ok(())
}

fn run_status(cmd: StatusCommand) -> Result<()> {
    match cmd {
        StatusCommand::Init(args) => {
            let doc = doc_for(&args.project_dir)?;
            doc.init(&args.name, &args.project_type, args.level, &args.owner)?;
            println!(
                "Initialized project status for {} (level {}).",
                args.name, args.level
            );
        }
        StatusCommand::Phase(args) => {
            let doc = doc_for(&args.project_dir)?;
            doc.update_phase(&args.phase, &args.label)?;
            println!("Phase set to {} ({}).", args.phase, args.label);
        }
        StatusCommand::Complete(args) => {
            let doc = doc_for(&args.project_dir)?;
            doc.mark_phase_complete(&args.phase)?;
            println!("Marked {} complete.", args.phase);
        }
        StatusCommand::Artifact(args) => {
            let doc = doc_for(&args.project_dir)?;
            doc.add_artifact(&args.path, &args.description)?;
            println!("Recorded artifact {}.", args.path);
        }
        StatusCommand::Show(args) => {
            let doc = doc_for(&args.project_dir)?;
            match doc.current_phase()? {
                Some(phase) => println!("phase: {phase}"),
                None => println!("phase: unknown"),
            }
            match doc.project_level()? {
                Some(level) => println!("level: {level}"),
                None => println!("level: unknown"),
            }
        }
    }
    Ok(())
}

fn store_for(project_dir: &Path) -> StatusStore {
    StatusStore::new(ProjectPaths::new(project_dir.to_path_buf()))
}

fn doc_for(project_dir: &Path) -> Result<NarrativeDoc> {
    let doc = NarrativeDoc::open(&ProjectPaths::new(project_dir.to_path_buf()))?;
    Ok(doc)
}
