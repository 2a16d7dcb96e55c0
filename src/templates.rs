pub const PROJECT_STATUS_MD: &str = include_str!("../templates/project-status.md");
