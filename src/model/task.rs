use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four standard precedence relations between a predecessor and a
/// successor task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::FinishToStart,
        DependencyKind::StartToStart,
        DependencyKind::FinishToFinish,
        DependencyKind::StartToFinish,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
            DependencyKind::StartToFinish => "SF",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "Finish → Start",
            DependencyKind::StartToStart => "Start → Start",
            DependencyKind::FinishToFinish => "Finish → Finish",
            DependencyKind::StartToFinish => "Start → Finish",
        }
    }
}

/// A typed link to a predecessor task. Stored on the successor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub predecessor: Uuid,
    pub kind: DependencyKind,
}

/// A single task inside a work package.
///
/// Dates are optional: a task without both dates still shows up in the
/// precedence network but is left alone by schedule recalculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Task {
    pub fn new(title: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            start: Some(start),
            end: Some(end),
            dependencies: Vec::new(),
        }
    }

    /// Create a task that has not been scheduled yet.
    pub fn unscheduled(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            start: None,
            end: None,
            dependencies: Vec::new(),
        }
    }

    /// Whole-day duration between start and end, or 0 when either date is
    /// missing.
    pub fn duration_days(&self) -> i64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => (end - start).num_days().max(0),
            _ => 0,
        }
    }

    pub fn depends_on(&self, predecessor: Uuid) -> bool {
        self.dependencies.iter().any(|d| d.predecessor == predecessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_is_whole_days() {
        let task = Task::new("Kickoff", date(2026, 1, 1), date(2026, 1, 5));
        assert_eq!(task.duration_days(), 4);
    }

    #[test]
    fn duration_without_dates_is_zero() {
        let mut task = Task::unscheduled("Draft");
        assert_eq!(task.duration_days(), 0);
        task.start = Some(date(2026, 1, 1));
        assert_eq!(task.duration_days(), 0);
    }

    #[test]
    fn dependency_kind_round_trips_as_short_code() {
        let json = serde_json::to_string(&DependencyKind::StartToFinish).unwrap();
        assert_eq!(json, "\"SF\"");
        let kind: DependencyKind = serde_json::from_str("\"FS\"").unwrap();
        assert_eq!(kind, DependencyKind::FinishToStart);
    }
}
