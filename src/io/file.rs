use crate::model::Project;
use std::path::Path;

/// Save a work plan to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(project).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())
}

/// Load a work plan from a JSON file.
pub fn load_project(path: &Path) -> Result<Project, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Dependency, DependencyKind, Task};
    use crate::model::WorkPackage;
    use chrono::NaiveDate;

    #[test]
    fn project_round_trips_through_json() {
        let mut project = Project::new("Horizon Pilot");
        let mut wp = WorkPackage::new("Research");
        let a = Task::new(
            "Survey",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        );
        let mut b = Task::unscheduled("Analysis");
        b.dependencies.push(Dependency {
            predecessor: a.id,
            kind: DependencyKind::FinishToFinish,
        });
        wp.tasks = vec![a, b];
        project.add_work_package(wp);

        let json = serde_json::to_string_pretty(&project).unwrap();
        let loaded: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.title, "Horizon Pilot");
        assert_eq!(loaded.work_packages[0].label, "WP1");
        assert_eq!(
            loaded.work_packages[0].tasks[1].dependencies[0].kind,
            DependencyKind::FinishToFinish
        );
    }
}
