use crate::model::Project;
use std::path::Path;

/// Export the work plan as a semicolon-delimited CSV for spreadsheet
/// hand-off.
///
/// Columns: Work Package ; Task ; Start ; End ; Duration (days) ; Depends On
/// Dates use ISO format; the dependency column lists `Title (FS)` entries.
/// Returns the number of task rows written.
pub fn export_csv(project: &Project, path: &Path) -> Result<usize, String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create CSV file: {}", e))?;

    wtr.write_record([
        "Work Package",
        "Task",
        "Start",
        "End",
        "Duration (days)",
        "Depends On",
    ])
    .map_err(|e| format!("Failed to write header: {}", e))?;

    let mut rows = 0;
    for wp in &project.work_packages {
        for task in &wp.tasks {
            let depends_on = task
                .dependencies
                .iter()
                .map(|dep| {
                    let title = project
                        .find_task(dep.predecessor)
                        .map(|t| t.title.as_str())
                        .unwrap_or("?");
                    format!("{} ({})", title, dep.kind.label())
                })
                .collect::<Vec<_>>()
                .join(", ");
            wtr.write_record([
                format!("{} {}", wp.label, wp.title),
                task.title.clone(),
                task.start.map(|d| d.to_string()).unwrap_or_default(),
                task.end.map(|d| d.to_string()).unwrap_or_default(),
                task.duration_days().to_string(),
                depends_on,
            ])
            .map_err(|e| format!("Failed to write task '{}': {}", task.title, e))?;
            rows += 1;
        }
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {}", e))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Dependency, DependencyKind, Task};
    use crate::model::{Project, WorkPackage};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn export_writes_one_row_per_task_with_dependency_cells() {
        let mut project = Project::new("Pilot");
        let mut wp = WorkPackage::new("Research");
        let survey = Task::new("Survey", date(2026, 1, 1), date(2026, 2, 1));
        let mut analysis = Task::new("Analysis", date(2026, 2, 2), date(2026, 3, 1));
        analysis.dependencies.push(Dependency {
            predecessor: survey.id,
            kind: DependencyKind::FinishToStart,
        });
        wp.tasks = vec![survey, analysis];
        project.add_work_package(wp);

        let path = std::env::temp_dir().join(format!(
            "workplan-export-{}.csv",
            uuid::Uuid::new_v4()
        ));
        let rows = export_csv(&project, &path).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Work Package;Task;Start;End;Duration (days);Depends On"
        );
        assert_eq!(lines[1], "WP1 Research;Survey;2026-01-01;2026-02-01;31;");
        assert_eq!(
            lines[2],
            "WP1 Research;Analysis;2026-02-02;2026-03-01;27;Survey (FS)"
        );
    }
}
