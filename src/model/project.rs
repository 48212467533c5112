use serde::{Deserialize, Serialize};

use super::calendar::NonWorkingDays;
use super::date::CalendarDate;
use super::task::Task;
use super::timeline::ProjectWindow;

/// Which table columns are shown. Missing keys in a stored document fall
/// back to their defaults individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnVisibility {
    pub assignee: bool,
    pub start_date: bool,
    pub end_date: bool,
    pub duration: bool,
    pub progress: bool,
    pub man_hours: bool,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            assignee: true,
            start_date: true,
            end_date: true,
            duration: true,
            progress: true,
            man_hours: true,
        }
    }
}

/// Per-document display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub non_working_days: NonWorkingDays,
    pub column_visibility: ColumnVisibility,
    /// Colors as `#rrggbb`.
    pub bar_color: String,
    pub progress_color: String,
    pub non_working_color: String,
    pub baseline_color: String,
    /// Row height in pixels.
    pub row_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            non_working_days: NonWorkingDays::WEEKENDS,
            column_visibility: ColumnVisibility::default(),
            bar_color: "#4285f4".to_string(),
            progress_color: "#1a5fb4".to_string(),
            non_working_color: "#2c2e3a".to_string(),
            baseline_color: "#f04b4b".to_string(),
            row_height: 32.0,
        }
    }
}

/// The whole editable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_name: String,
    pub project_start: CalendarDate,
    pub project_end: CalendarDate,
    pub creation_date: CalendarDate,
    pub creator_name: String,
    pub tasks: Vec<Task>,
    pub settings: Settings,
}

impl Default for Project {
    fn default() -> Self {
        let today = CalendarDate::today();
        Self::new("Untitled Project", today, today.add_days(90))
    }
}

impl Project {
    pub fn new(name: impl Into<String>, start: CalendarDate, end: CalendarDate) -> Self {
        Self {
            project_name: name.into(),
            project_start: start,
            project_end: end,
            creation_date: CalendarDate::today(),
            creator_name: String::new(),
            tasks: Vec::new(),
            settings: Settings::default(),
        }
    }

    pub fn window(&self) -> ProjectWindow {
        ProjectWindow::new(self.project_start, self.project_end)
    }

    pub fn mask(&self) -> NonWorkingDays {
        self.settings.non_working_days
    }

    /// Replace the task list wholesale.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Change the window bounds; given in reverse order they are swapped.
    pub fn set_window(&mut self, start: CalendarDate, end: CalendarDate) {
        self.project_start = start.min(end);
        self.project_end = start.max(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_merge_over_defaults() {
        let json = r#"{
            "nonWorkingDays": [0],
            "columnVisibility": { "assignee": false }
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.non_working_days, NonWorkingDays::from_weekdays([0]));
        assert!(!settings.column_visibility.assignee);
        assert!(settings.column_visibility.man_hours);
        assert!(settings.column_visibility.duration);
        assert_eq!(settings.row_height, 32.0);
        assert_eq!(settings.bar_color, Settings::default().bar_color);
    }

    #[test]
    fn set_window_orders_bounds() {
        let a = CalendarDate::parse("2024/05/01").unwrap();
        let b = CalendarDate::parse("2024/02/01").unwrap();
        let mut project = Project::new("p", a, a);
        project.set_window(a, b);
        assert_eq!(project.window(), ProjectWindow::new(b, a));
    }
}
