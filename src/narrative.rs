//! Narrative workflow status document and its in-place line edits.
//!
//! The document is markdown with fixed markers: header fields, a Current
//! Status block, one checklist block per phase, a single next-action line,
//! and an append-only artifacts list. Each operation is a pure lines->lines
//! transform wrapped in a whole-file read-transform-write cycle, so every
//! line the operation does not target survives byte-for-byte.
use crate::error::TrackError;
use crate::paths::ProjectPaths;
use crate::phase::Phase;
use crate::recommend::{recommendation, FALLBACK_RECOMMENDATION};
use crate::templates::PROJECT_STATUS_MD;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

const FIELD_PHASE: &str = "**Phase**:";
const FIELD_STATUS: &str = "**Status**:";
const FIELD_UPDATED: &str = "**Last Updated**:";
const FIELD_LEVEL: &str = "**Level**:";
const NEXT_ACTION_HEADING: &str = "## Next Recommended Action";
const ARTIFACTS_HEADING: &str = "## Artifacts Created";
const ARTIFACTS_PLACEHOLDER: &str = "None yet.";
const PHASE_STATUS_PREFIX: &str = "Status:";
const UNCHECKED_BOX: &str = "- [ ]";

/// Editor for one project's narrative status document.
pub struct NarrativeDoc {
    path: PathBuf,
}

impl NarrativeDoc {
    /// Open the document for a project, migrating the deprecated filename to
    /// the canonical one if only the old file exists.
    pub fn open(paths: &ProjectPaths) -> Result<Self, TrackError> {
        let path = paths.narrative_path();
        let legacy = paths.legacy_narrative_path();
        if !path.is_file() && legacy.is_file() {
            fs::rename(&legacy, &path)?;
            tracing::info!(
                from = %legacy.display(),
                to = %path.display(),
                "migrated legacy status document"
            );
        }
        Ok(Self { path })
    }

    /// Create the document from the template, overwriting any existing one.
    pub fn init(
        &self,
        project_name: &str,
        project_type: &str,
        level: u32,
        owner: &str,
    ) -> Result<(), TrackError> {
        let content = PROJECT_STATUS_MD
            .replace("{{project_name}}", project_name)
            .replace("{{project_type}}", project_type)
            .replace("{{level}}", &level.to_string())
            .replace("{{owner}}", owner)
            .replace("{{date}}", &today())
            .replace(
                "{{recommendation}}",
                recommendation(Phase::Analysis, level),
            );
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        tracing::info!(project = project_name, level, "initialized status document");
        Ok(())
    }

    /// Rewrite the Current Status block for `phase_name` and refresh the next
    /// recommended action from the header's project level. An unparsable level
    /// (or an unrecognized phase name) yields the generic fallback line.
    pub fn update_phase(&self, phase_name: &str, status_label: &str) -> Result<(), TrackError> {
        let mut lines = self.read_lines()?;
        set_field(&mut lines, FIELD_PHASE, phase_name);
        set_field(&mut lines, FIELD_STATUS, status_label);
        set_field(&mut lines, FIELD_UPDATED, &today());

        let next = match (phase_name.parse::<Phase>(), parsed_level(&lines)) {
            (Ok(phase), Some(level)) => recommendation(phase, level),
            _ => FALLBACK_RECOMMENDATION,
        };
        set_next_action(&mut lines, next);
        self.write_lines(&lines)
    }

    /// Check every open box in the named phase's block and mark its trailing
    /// status line complete. Fails with [`TrackError::InvalidArgument`] before
    /// touching the file if `phase_name` is not one of the four phases.
    pub fn mark_phase_complete(&self, phase_name: &str) -> Result<(), TrackError> {
        let phase: Phase = phase_name.parse()?;
        let mut lines = self.read_lines()?;
        complete_phase_block(&mut lines, phase);
        self.write_lines(&lines)
    }

    /// Append an artifact entry, dropping the placeholder before the first
    /// real entry. Fails with [`TrackError::NotFound`] if the artifacts
    /// section heading is missing.
    pub fn add_artifact(&self, artifact_path: &str, description: &str) -> Result<(), TrackError> {
        let mut lines = self.read_lines()?;
        let entry = format!("- `{artifact_path}` - {description} ({})", today());
        insert_artifact(&mut lines, entry)?;
        self.write_lines(&lines)
    }

    /// Value of the `**Phase**:` field, or `None` if the document or field
    /// is absent.
    pub fn current_phase(&self) -> Result<Option<String>, TrackError> {
        let Some(lines) = self.read_lines_optional()? else {
            return Ok(None);
        };
        Ok(field_value(&lines, FIELD_PHASE))
    }

    /// Project level parsed from the header, or `None` if absent.
    pub fn project_level(&self) -> Result<Option<u32>, TrackError> {
        let Some(lines) = self.read_lines_optional()? else {
            return Ok(None);
        };
        Ok(parsed_level(&lines))
    }

    fn read_lines(&self) -> Result<Vec<String>, TrackError> {
        self.read_lines_optional()?
            .ok_or_else(|| TrackError::NotFound(self.path.display().to_string()))
    }

    fn read_lines_optional(&self) -> Result<Option<Vec<String>>, TrackError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(content.lines().map(String::from).collect()))
    }

    fn write_lines(&self, lines: &[String]) -> Result<(), TrackError> {
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Rewrite the first line carrying `prefix` to `prefix value`.
fn set_field(lines: &mut [String], prefix: &str, value: &str) -> bool {
    for line in lines.iter_mut() {
        if line.starts_with(prefix) {
            *line = format!("{prefix} {value}");
            return true;
        }
    }
    false
}

fn field_value(lines: &[String], prefix: &str) -> Option<String> {
    lines
        .iter()
        .find(|line| line.starts_with(prefix))
        .map(|line| line[prefix.len()..].trim().to_string())
}

fn parsed_level(lines: &[String]) -> Option<u32> {
    field_value(lines, FIELD_LEVEL)?.parse().ok()
}

/// Replace the single content line under the next-action heading.
fn set_next_action(lines: &mut [String], text: &str) -> bool {
    let Some(start) = lines.iter().position(|l| l.trim_end() == NEXT_ACTION_HEADING) else {
        return false;
    };
    for line in lines.iter_mut().skip(start + 1) {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with("##") {
            return false;
        }
        *line = text.to_string();
        return true;
    }
    false
}

/// Check every `- [ ]` between the phase heading and its `Status:` line,
/// rewrite that line to `Status: Complete`, and stop there so later blocks
/// are never touched.
fn complete_phase_block(lines: &mut [String], phase: Phase) -> bool {
    let heading = phase.block_heading();
    let Some(start) = lines.iter().position(|l| l.trim_end() == heading) else {
        return false;
    };
    for line in lines.iter_mut().skip(start + 1) {
        let trimmed = line.trim_start();
        if trimmed.starts_with(UNCHECKED_BOX) {
            *line = line.replacen("[ ]", "[x]", 1);
        } else if trimmed.starts_with(PHASE_STATUS_PREFIX) {
            *line = format!("{PHASE_STATUS_PREFIX} Complete");
            return true;
        }
    }
    true
}

/// Drop the placeholder if it still sits under the heading, then insert the
/// entry above the first blank line (or section end) after existing entries.
fn insert_artifact(lines: &mut Vec<String>, entry: String) -> Result<(), TrackError> {
    let heading = lines
        .iter()
        .position(|l| l.trim_end() == ARTIFACTS_HEADING)
        .ok_or_else(|| TrackError::NotFound("artifacts section".to_string()))?;
    let mut i = heading + 1;
    if i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    if i < lines.len() && lines[i].trim_end() == ARTIFACTS_PLACEHOLDER {
        lines.remove(i);
    }
    while i < lines.len() && !lines[i].trim().is_empty() && !lines[i].starts_with('#') {
        i += 1;
    }
    lines.insert(i, entry);
    Ok(())
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
