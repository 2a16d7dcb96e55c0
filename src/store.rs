//! Structured story/epic status persisted as a JSON mapping-of-mappings.
//!
//! The file has three fixed top-level keys: `project_metadata`, `epic_status`,
//! and `development_status`. Maps are `IndexMap`s so the file round-trips in
//! insertion order across load/modify/save cycles. Every operation is a whole
//! read-transform-write cycle; nothing is written when an operation fails.
use crate::error::TrackError;
use crate::outline::{parse_outline, OutlineStory};
use crate::paths::ProjectPaths;
use chrono::Local;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;

/// Lifecycle state of a single story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryState {
    Backlog,
    Drafted,
    Ready,
    InProgress,
    Review,
    Done,
}

impl StoryState {
    pub fn as_str(self) -> &'static str {
        match self {
            StoryState::Backlog => "backlog",
            StoryState::Drafted => "drafted",
            StoryState::Ready => "ready",
            StoryState::InProgress => "in-progress",
            StoryState::Review => "review",
            StoryState::Done => "done",
        }
    }
}

impl fmt::Display for StoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryState {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backlog" => Ok(StoryState::Backlog),
            "drafted" => Ok(StoryState::Drafted),
            "ready" => Ok(StoryState::Ready),
            "in-progress" => Ok(StoryState::InProgress),
            "review" => Ok(StoryState::Review),
            "done" => Ok(StoryState::Done),
            other => Err(TrackError::InvalidArgument(format!(
                "unknown story state: {other}"
            ))),
        }
    }
}

/// Aggregate state of an epic, derived from its member stories.
///
/// Story-level `review` counts toward `in-progress` here and never surfaces
/// as its own epic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EpicState {
    Backlog,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub created: String,
    pub last_updated: String,
    pub total_epics: usize,
    pub total_stories: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicStatus {
    pub title: String,
    pub total_stories: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub status: EpicState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryStatus {
    pub title: String,
    pub status: StoryState,
    pub assigned_to: Option<String>,
    pub started: Option<String>,
    pub completed: Option<String>,
}

/// Full on-disk structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusFile {
    pub project_metadata: ProjectMetadata,
    pub epic_status: IndexMap<String, EpicStatus>,
    pub development_status: IndexMap<String, StoryStatus>,
}

/// Counts reported after initialization.
#[derive(Debug, Clone, Copy)]
pub struct InitSummary {
    pub epics: usize,
    pub stories: usize,
}

/// Owns the status file for one project directory.
pub struct StatusStore {
    paths: ProjectPaths,
}

impl StatusStore {
    pub fn new(paths: ProjectPaths) -> Self {
        Self { paths }
    }

    /// Build a fresh status file from the epics outline, overwriting any
    /// existing store. Fails with [`TrackError::NotFound`] if the outline
    /// document is missing.
    pub fn init(&self) -> Result<InitSummary, TrackError> {
        let outline_path = self.paths.outline_path();
        if !outline_path.is_file() {
            return Err(TrackError::NotFound(outline_path.display().to_string()));
        }
        let content = fs::read_to_string(&outline_path)?;
        let stories = parse_outline(&content);
        let file = build_status_file(&stories, &today());
        let summary = InitSummary {
            epics: file.epic_status.len(),
            stories: file.development_status.len(),
        };
        self.save(&file)?;
        tracing::info!(
            epics = summary.epics,
            stories = summary.stories,
            "initialized status store"
        );
        Ok(summary)
    }

    /// Set a story's state, stamping `started`/`completed` on the first
    /// transition into in-progress/done and recomputing the owning epic's
    /// rollup. An `assignee` of `None` leaves the current assignee in place.
    pub fn update_story(
        &self,
        id: &str,
        state: StoryState,
        assignee: Option<&str>,
    ) -> Result<(), TrackError> {
        let mut file = self.load()?;
        let date = today();
        {
            let story = file
                .development_status
                .get_mut(id)
                .ok_or_else(|| TrackError::NotFound(format!("story: {id}")))?;
            story.status = state;
            if let Some(name) = assignee {
                story.assigned_to = Some(name.to_string());
            }
            if state == StoryState::InProgress && story.started.is_none() {
                story.started = Some(date.clone());
            }
            if state == StoryState::Done && story.completed.is_none() {
                story.completed = Some(date.clone());
            }
        }
        if let Some(epic) = epic_number(id) {
            recompute_rollup(&mut file, epic);
        }
        file.project_metadata.last_updated = date;
        self.save(&file)?;
        tracing::info!(id, state = %state, "updated story");
        Ok(())
    }

    /// First story (in store order) still in the backlog.
    pub fn next_backlog_story(&self) -> Result<Option<(String, StoryStatus)>, TrackError> {
        let Some(file) = self.load_optional()? else {
            return Ok(None);
        };
        Ok(file
            .development_status
            .into_iter()
            .find(|(_, story)| story.status == StoryState::Backlog))
    }

    pub fn get_story(&self, id: &str) -> Result<Option<StoryStatus>, TrackError> {
        let Some(file) = self.load_optional()? else {
            return Ok(None);
        };
        Ok(file.development_status.get(id).cloned())
    }

    /// All `(id, story)` pairs in the given state, in store order.
    pub fn stories_by_state(
        &self,
        state: StoryState,
    ) -> Result<Vec<(String, StoryStatus)>, TrackError> {
        let Some(file) = self.load_optional()? else {
            return Ok(Vec::new());
        };
        Ok(file
            .development_status
            .into_iter()
            .filter(|(_, story)| story.status == state)
            .collect())
    }

    fn load(&self) -> Result<StatusFile, TrackError> {
        self.load_optional()?.ok_or_else(|| {
            TrackError::NotFound(self.paths.store_path().display().to_string())
        })
    }

    fn load_optional(&self) -> Result<Option<StatusFile>, TrackError> {
        let path = self.paths.store_path();
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, file: &StatusFile) -> Result<(), TrackError> {
        let path = self.paths.store_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&path, json)?;
        Ok(())
    }
}

fn build_status_file(stories: &[OutlineStory], date: &str) -> StatusFile {
    let mut epic_status: IndexMap<String, EpicStatus> = IndexMap::new();
    let mut development_status: IndexMap<String, StoryStatus> = IndexMap::new();

    for story in stories {
        let rollup = epic_status
            .entry(story.epic_key())
            .or_insert_with(|| EpicStatus {
                title: story.epic_title.clone(),
                total_stories: 0,
                completed: 0,
                in_progress: 0,
                status: EpicState::Backlog,
            });
        rollup.total_stories += 1;
        development_status.insert(
            story.story_id(),
            StoryStatus {
                title: story.title.clone(),
                status: StoryState::Backlog,
                assigned_to: None,
                started: None,
                completed: None,
            },
        );
    }

    StatusFile {
        project_metadata: ProjectMetadata {
            created: date.to_string(),
            last_updated: date.to_string(),
            total_epics: epic_status.len(),
            total_stories: development_status.len(),
        },
        epic_status,
        development_status,
    }
}

/// Leading epic number of a `{epic}-{story}-{slug}` identifier.
fn epic_number(id: &str) -> Option<u32> {
    id.split('-').next()?.parse().ok()
}

fn recompute_rollup(file: &mut StatusFile, epic: u32) {
    let prefix = format!("{epic}-");
    let mut total = 0;
    let mut completed = 0;
    let mut in_progress = 0;
    for (id, story) in &file.development_status {
        if !id.starts_with(&prefix) {
            continue;
        }
        total += 1;
        match story.status {
            StoryState::Done => completed += 1,
            StoryState::InProgress | StoryState::Review => in_progress += 1,
            StoryState::Backlog | StoryState::Drafted | StoryState::Ready => {}
        }
    }
    let status = if total > 0 && completed == total {
        EpicState::Done
    } else if in_progress > 0 || completed > 0 {
        EpicState::InProgress
    } else {
        EpicState::Backlog
    };
    if let Some(rollup) = file.epic_status.get_mut(&format!("epic-{epic}")) {
        rollup.total_stories = total;
        rollup.completed = completed;
        rollup.in_progress = in_progress;
        rollup.status = status;
    }
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const OUTLINE: &str = "\
## Epic 1: Auth
#### Story 1.1: Add login
#### Story 1.2: Add logout
#### Story 1.3: Add sessions
";

    fn store_with_outline(root: &Path, outline: &str) -> StatusStore {
        let paths = ProjectPaths::new(root.to_path_buf());
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(paths.outline_path(), outline).unwrap();
        StatusStore::new(paths)
    }

    #[test]
    fn init_builds_backlog_records_and_rollups() {
        let dir = TempDir::new().unwrap();
        let store = store_with_outline(
            dir.path(),
            "## Epic 1: Auth\n#### Story 1.1: Add login\n#### Story 1.2: Add logout\n",
        );
        let summary = store.init().unwrap();
        assert_eq!(summary.epics, 1);
        assert_eq!(summary.stories, 2);

        let file = store.load().unwrap();
        assert_eq!(file.project_metadata.total_stories, 2);
        assert!(file
            .development_status
            .values()
            .all(|s| s.status == StoryState::Backlog));
        let rollup = &file.epic_status["epic-1"];
        assert_eq!(rollup.title, "Auth");
        assert_eq!(rollup.total_stories, 2);
        assert_eq!(rollup.completed, 0);
        assert_eq!(rollup.status, EpicState::Backlog);
    }

    #[test]
    fn init_fails_without_outline() {
        let dir = TempDir::new().unwrap();
        let store = StatusStore::new(ProjectPaths::new(dir.path().to_path_buf()));
        let err = store.init().unwrap_err();
        assert!(matches!(err, TrackError::NotFound(_)));
    }

    #[test]
    fn update_stamps_started_only_once() {
        let dir = TempDir::new().unwrap();
        let store = store_with_outline(dir.path(), OUTLINE);
        store.init().unwrap();

        // Backdate the started stamp, then update again: it must survive.
        let mut file = store.load().unwrap();
        file.development_status["1-1-add-login"].status = StoryState::InProgress;
        file.development_status["1-1-add-login"].started = Some("2020-01-01".to_string());
        store.save(&file).unwrap();

        store
            .update_story("1-1-add-login", StoryState::InProgress, None)
            .unwrap();
        let story = store.get_story("1-1-add-login").unwrap().unwrap();
        assert_eq!(story.started.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn update_sets_assignee_without_clearing_it_later() {
        let dir = TempDir::new().unwrap();
        let store = store_with_outline(dir.path(), OUTLINE);
        store.init().unwrap();

        store
            .update_story("1-1-add-login", StoryState::InProgress, Some("sam"))
            .unwrap();
        store
            .update_story("1-1-add-login", StoryState::Review, None)
            .unwrap();
        let story = store.get_story("1-1-add-login").unwrap().unwrap();
        assert_eq!(story.assigned_to.as_deref(), Some("sam"));
        assert_eq!(story.status, StoryState::Review);
    }

    #[test]
    fn rollup_tracks_partial_then_total_completion() {
        let dir = TempDir::new().unwrap();
        let store = store_with_outline(dir.path(), OUTLINE);
        store.init().unwrap();

        store
            .update_story("1-1-add-login", StoryState::Done, None)
            .unwrap();
        store
            .update_story("1-2-add-logout", StoryState::Done, None)
            .unwrap();
        store
            .update_story("1-3-add-sessions", StoryState::InProgress, None)
            .unwrap();

        let file = store.load().unwrap();
        let rollup = &file.epic_status["epic-1"];
        assert_eq!(rollup.completed, 2);
        assert_eq!(rollup.in_progress, 1);
        assert_eq!(rollup.status, EpicState::InProgress);

        store
            .update_story("1-3-add-sessions", StoryState::Done, None)
            .unwrap();
        let file = store.load().unwrap();
        assert_eq!(file.epic_status["epic-1"].status, EpicState::Done);
        let story = store.get_story("1-3-add-sessions").unwrap().unwrap();
        assert!(story.completed.is_some());
    }

    #[test]
    fn review_counts_toward_in_progress_rollup() {
        let dir = TempDir::new().unwrap();
        let store = store_with_outline(dir.path(), OUTLINE);
        store.init().unwrap();

        store
            .update_story("1-1-add-login", StoryState::Review, None)
            .unwrap();
        let file = store.load().unwrap();
        let rollup = &file.epic_status["epic-1"];
        assert_eq!(rollup.in_progress, 1);
        assert_eq!(rollup.status, EpicState::InProgress);
    }

    #[test]
    fn unknown_story_fails_and_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_with_outline(dir.path(), OUTLINE);
        store.init().unwrap();

        let before = fs::read_to_string(store.paths.store_path()).unwrap();
        let err = store
            .update_story("9-9-missing", StoryState::Done, None)
            .unwrap_err();
        assert!(matches!(err, TrackError::NotFound(_)));
        let after = fs::read_to_string(store.paths.store_path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn update_without_store_fails_not_found() {
        let dir = TempDir::new().unwrap();
        let store = StatusStore::new(ProjectPaths::new(dir.path().to_path_buf()));
        let err = store
            .update_story("1-1-add-login", StoryState::Done, None)
            .unwrap_err();
        assert!(matches!(err, TrackError::NotFound(_)));
    }

    #[test]
    fn queries_are_empty_when_store_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = StatusStore::new(ProjectPaths::new(dir.path().to_path_buf()));
        assert!(store.next_backlog_story().unwrap().is_none());
        assert!(store.get_story("1-1-x").unwrap().is_none());
        assert!(store.stories_by_state(StoryState::Done).unwrap().is_empty());
    }

    #[test]
    fn next_backlog_story_follows_store_order() {
        let dir = TempDir::new().unwrap();
        let store = store_with_outline(dir.path(), OUTLINE);
        store.init().unwrap();

        let (id, _) = store.next_backlog_story().unwrap().unwrap();
        assert_eq!(id, "1-1-add-login");

        store
            .update_story("1-1-add-login", StoryState::InProgress, None)
            .unwrap();
        let (id, _) = store.next_backlog_story().unwrap().unwrap();
        assert_eq!(id, "1-2-add-logout");
    }

    #[test]
    fn store_round_trips_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let mut outline = String::new();
        for epic in [2, 10, 1] {
            outline.push_str(&format!("## Epic {epic}: E{epic}\n"));
            outline.push_str(&format!("#### Story {epic}.1: Work\n"));
        }
        let store = store_with_outline(dir.path(), &outline);
        store.init().unwrap();

        store.update_story("10-1-work", StoryState::Done, None).unwrap();
        let file = store.load().unwrap();
        let keys: Vec<&str> = file.epic_status.keys().map(String::as_str).collect();
        assert_eq!(keys, ["epic-2", "epic-10", "epic-1"]);
    }
}
