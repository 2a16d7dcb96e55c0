//! Parser for the epics outline document.
//!
//! The outline is semi-free-form markdown: `## Epic N: Title` headings open an
//! epic, `#### Story N.M: Title` headings beneath them declare stories. Parsing
//! is best-effort and never fails; lines that match neither pattern are skipped,
//! and a story heading outside any epic block is ignored.
use regex::{Regex, RegexBuilder};

/// One story extracted from the outline, carrying its enclosing epic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineStory {
    pub epic: u32,
    pub story: u32,
    pub epic_title: String,
    pub title: String,
    pub slug: String,
}

impl OutlineStory {
    /// Store identifier: `{epic}-{story}-{slug}`.
    pub fn story_id(&self) -> String {
        format!("{}-{}-{}", self.epic, self.story, self.slug)
    }

    /// Store key for the enclosing epic's rollup.
    pub fn epic_key(&self) -> String {
        format!("epic-{}", self.epic)
    }
}

/// Scan the outline text and extract stories in document order.
pub fn parse_outline(content: &str) -> Vec<OutlineStory> {
    let epic_re = heading_regex(r"^##\s+Epic\s+(\d+)(?:\s*[:\-–]\s*(.*?))?\s*$");
    let story_re = heading_regex(r"^####\s+Story\s+(\d+)\.(\d+)(?:\s*[:\-–]\s*(.*?))?\s*$");

    let mut stories = Vec::new();
    let mut current_epic: Option<(u32, String)> = None;

    for line in content.lines() {
        if let Some(caps) = epic_re.captures(line) {
            let Ok(number) = caps[1].parse::<u32>() else {
                continue;
            };
            let title = match caps.get(2).map(|m| m.as_str().trim()) {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => format!("Epic {number}"),
            };
            current_epic = Some((number, title));
            continue;
        }

        let Some(caps) = story_re.captures(line) else {
            continue;
        };
        // Stories only count inside their own epic's block.
        let Some((epic_number, epic_title)) = current_epic.as_ref() else {
            continue;
        };
        let (Ok(epic), Ok(story)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        if epic != *epic_number {
            continue;
        }
        let title = match caps.get(3).map(|m| m.as_str().trim()) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("Story {epic}.{story}"),
        };
        let slug = match slugify(&title) {
            s if s.is_empty() => format!("story-{epic}-{story}"),
            s => s,
        };
        stories.push(OutlineStory {
            epic,
            story,
            epic_title: epic_title.clone(),
            title,
            slug,
        });
    }

    stories
}

/// Lowercase, spaces to hyphens, everything outside `[a-z0-9-]` stripped.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            'a'..='z' | '0'..='9' | '-' => Some(c),
            _ => None,
        })
        .collect()
}

fn heading_regex(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("hard-coded heading pattern compiles")
}
