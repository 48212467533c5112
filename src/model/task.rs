use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::CalendarDate;

/// A single row in the chart.
///
/// A task with neither date set is unscheduled: it draws no bar and is the
/// only kind of task a create-by-drag gesture may start on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient_id::deserialize")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<CalendarDate>,
    #[serde(default, with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<CalendarDate>,
    /// Percent complete, 0 to 100.
    #[serde(default, deserialize_with = "progress_serde::deserialize")]
    pub progress: u8,
    /// Estimated labor hours, never negative.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "man_hours_serde::deserialize")]
    pub man_hours: Option<f64>,
}

impl Task {
    /// Create an unscheduled task.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            assignee: None,
            start_date: None,
            end_date: None,
            progress: 0,
            man_hours: None,
        }
    }

    /// Builder-style variant of [`Task::set_dates`].
    pub fn with_dates(mut self, start: CalendarDate, end: CalendarDate) -> Self {
        self.set_dates(start, end);
        self
    }

    /// Write both dates, swapping them when given in reverse order.
    pub fn set_dates(&mut self, start: CalendarDate, end: CalendarDate) {
        self.start_date = Some(start.min(end));
        self.end_date = Some(start.max(end));
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    pub fn is_unscheduled(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// Both dates, when both are set.
    pub fn dates(&self) -> Option<(CalendarDate, CalendarDate)> {
        Some((self.start_date?, self.end_date?))
    }
}

/// Append an unscheduled task.
pub fn add_task(tasks: &[Task], name: impl Into<String>) -> Vec<Task> {
    let mut next = tasks.to_vec();
    next.push(Task::new(name));
    next
}

/// Insert a copy of `id` with a fresh id right after the original.
pub fn duplicate_task(tasks: &[Task], id: Uuid) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if let Some(pos) = next.iter().position(|t| t.id == id) {
        let mut copy = next[pos].clone();
        copy.id = Uuid::new_v4();
        next.insert(pos + 1, copy);
    }
    next
}

pub fn remove_task(tasks: &[Task], id: Uuid) -> Vec<Task> {
    tasks.iter().filter(|t| t.id != id).cloned().collect()
}

/// Swap in `task` over the entry with the same id.
pub fn replace_task(tasks: &[Task], task: Task) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| if t.id == task.id { task.clone() } else { t.clone() })
        .collect()
}

/// Move the task at `from` so it lands where `drop_index` pointed before removal.
///
/// `drop_index` is an insertion point in the original list (0..=len). When it
/// lies after `from` the removal shifts it down by one.
pub fn move_task(tasks: &[Task], from: usize, drop_index: usize) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if from >= next.len() {
        return next;
    }
    let item = next.remove(from);
    let mut target = drop_index.min(tasks.len());
    if target > from {
        target -= 1;
    }
    next.insert(target, item);
    next
}

/// Date fields read from documents: text that does not parse as `YYYY/MM/DD`
/// is dropped to unset instead of failing the whole import.
mod lenient_date {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::model::date::CalendarDate;

    pub fn serialize<S>(date: &Option<CalendarDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CalendarDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| {
            if s.is_empty() {
                return None;
            }
            let parsed = CalendarDate::parse(&s);
            if parsed.is_none() {
                tracing::warn!(value = %s, "ignoring malformed task date");
            }
            parsed
        }))
    }
}

/// Ids from other tools may be numbers or arbitrary strings. Anything that is
/// not a UUID gets a fresh one; ids are not referenced elsewhere in a document.
mod lenient_id {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};
    use uuid::Uuid;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Other(IgnoredAny),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Uuid::parse_str(text.trim()).ok(),
            RawId::Other(_) => None,
        };
        Ok(id.unwrap_or_else(|| {
            let fresh = Uuid::new_v4();
            tracing::warn!(%fresh, "task id is not a UUID, assigning a new one");
            fresh
        }))
    }
}

mod progress_serde {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        if !raw.is_finite() {
            return Ok(0);
        }
        Ok(raw.round().clamp(0.0, 100.0) as u8)
    }
}

mod man_hours_serde {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<f64> = Option::deserialize(deserializer)?;
        Ok(raw.filter(|h| h.is_finite() && *h >= 0.0))
    }
}
