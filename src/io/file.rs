use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{CalendarDate, Project, Settings, Task};

/// Shape of a document as read from disk, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    project_name: Option<String>,
    project_start: Option<String>,
    project_end: Option<String>,
    creation_date: Option<String>,
    creator_name: Option<String>,
    tasks: Option<Vec<Task>>,
    settings: Option<Settings>,
}

/// Serialize a project to pretty-printed JSON.
pub fn to_json(project: &Project) -> Result<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Parse and validate a project document.
///
/// `projectName`, `projectStart`, `projectEnd` and `tasks` are required;
/// everything else falls back to defaults.
pub fn from_json(json: &str) -> Result<Project> {
    let raw: RawProject = serde_json::from_str(json)?;

    let project_name = raw.project_name.ok_or(Error::MissingField("projectName"))?;
    let project_start = required_date("projectStart", raw.project_start)?;
    let project_end = required_date("projectEnd", raw.project_end)?;
    let mut tasks = raw.tasks.ok_or(Error::MissingField("tasks"))?;
    for task in &mut tasks {
        if let Some((start, end)) = task.dates() {
            task.set_dates(start, end);
        }
    }

    let creation_date = match raw.creation_date.as_deref() {
        Some(text) => CalendarDate::parse(text).unwrap_or_else(|| {
            tracing::warn!(value = text, "malformed creationDate, using today");
            CalendarDate::today()
        }),
        None => CalendarDate::today(),
    };

    Ok(Project {
        project_name,
        project_start,
        project_end,
        creation_date,
        creator_name: raw.creator_name.unwrap_or_default(),
        tasks,
        settings: raw.settings.unwrap_or_default(),
    })
}

fn required_date(field: &'static str, value: Option<String>) -> Result<CalendarDate> {
    let text = value.ok_or(Error::MissingField(field))?;
    CalendarDate::parse(&text).ok_or(Error::InvalidDate { field, value: text })
}

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let json = to_json(project)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), tasks = project.tasks.len(), "project saved");
    Ok(())
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path)?;
    let project = from_json(&json)?;
    tracing::info!(path = %path.display(), tasks = project.tasks.len(), "project loaded");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_field_is_reported() {
        let json = r#"{ "projectName": "x", "projectStart": "2024/01/01", "tasks": [] }"#;
        match from_json(json) {
            Err(Error::MissingField(field)) => assert_eq!(field, "projectEnd"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_window_date_is_reported() {
        let json = r#"{
            "projectName": "x",
            "projectStart": "2024/02/30",
            "projectEnd": "2024/03/01",
            "tasks": []
        }"#;
        assert!(matches!(
            from_json(json),
            Err(Error::InvalidDate { field: "projectStart", .. })
        ));
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "projectName": "Kitchen",
            "projectStart": "2024/01/01",
            "projectEnd": "2024/02/01",
            "tasks": [{ "name": "Demolition" }]
        }"#;
        let project = from_json(json).unwrap();
        assert_eq!(project.creator_name, "");
        assert_eq!(project.settings, Settings::default());
        assert_eq!(project.tasks.len(), 1);
        assert!(project.tasks[0].is_unscheduled());
    }

    #[test]
    fn not_json_is_an_error() {
        assert!(matches!(from_json("not json"), Err(Error::Json(_))));
    }
}
