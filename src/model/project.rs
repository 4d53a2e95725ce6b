use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;

/// A dated point inside a work package, rendered on the timeline but not
/// part of the precedence network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub description: String,
    pub date: NaiveDate,
}

impl Milestone {
    pub fn new(description: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            date,
        }
    }
}

/// A concrete output promised by a work package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: Uuid,
    pub title: String,
    pub due: Option<NaiveDate>,
}

impl Deliverable {
    pub fn new(title: impl Into<String>, due: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            due,
        }
    }
}

/// A top-level grouping of tasks, milestones and deliverables.
///
/// The `label` (WP1, WP2, …) is positional and reassigned whenever packages
/// are inserted, removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPackage {
    pub label: String,
    pub title: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
}

impl WorkPackage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            label: String::new(),
            title: title.into(),
            tasks: Vec::new(),
            milestones: Vec::new(),
            deliverables: Vec::new(),
        }
    }
}

/// A proposal work plan: an ordered list of work packages plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub work_packages: Vec<WorkPackage>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            title: "Untitled Proposal".to_string(),
            work_packages: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Reassign positional WP labels after any insert, remove or reorder.
    pub fn renumber_work_packages(&mut self) {
        for (i, wp) in self.work_packages.iter_mut().enumerate() {
            wp.label = format!("WP{}", i + 1);
        }
    }

    pub fn add_work_package(&mut self, mut wp: WorkPackage) {
        wp.label = String::new();
        self.work_packages.push(wp);
        self.renumber_work_packages();
    }

    pub fn remove_work_package(&mut self, index: usize) {
        if index >= self.work_packages.len() {
            return;
        }
        let removed: Vec<Uuid> = self.work_packages[index]
            .tasks
            .iter()
            .map(|t| t.id)
            .collect();
        self.work_packages.remove(index);
        for id in removed {
            self.strip_dependencies_on(id);
        }
        self.renumber_work_packages();
    }

    /// Swap a work package with its neighbor. `delta` is -1 or +1.
    pub fn move_work_package(&mut self, index: usize, delta: i32) {
        let target = index as i64 + delta as i64;
        if target < 0 || target as usize >= self.work_packages.len() {
            return;
        }
        self.work_packages.swap(index, target as usize);
        self.renumber_work_packages();
    }

    pub fn find_task(&self, id: Uuid) -> Option<&Task> {
        self.work_packages
            .iter()
            .flat_map(|wp| wp.tasks.iter())
            .find(|t| t.id == id)
    }

    pub fn find_task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.work_packages
            .iter_mut()
            .flat_map(|wp| wp.tasks.iter_mut())
            .find(|t| t.id == id)
    }

    /// Index of the work package that owns the given task.
    pub fn work_package_of(&self, id: Uuid) -> Option<usize> {
        self.work_packages
            .iter()
            .position(|wp| wp.tasks.iter().any(|t| t.id == id))
    }

    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.work_packages.iter().flat_map(|wp| wp.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.work_packages.iter().map(|wp| wp.tasks.len()).sum()
    }

    /// Delete a task and every dependency that pointed at it.
    pub fn remove_task(&mut self, id: Uuid) {
        for wp in &mut self.work_packages {
            wp.tasks.retain(|t| t.id != id);
        }
        self.strip_dependencies_on(id);
    }

    fn strip_dependencies_on(&mut self, id: Uuid) {
        for wp in &mut self.work_packages {
            for task in &mut wp.tasks {
                task.dependencies.retain(|d| d.predecessor != id);
            }
        }
    }

    /// Earliest start and latest end across all dated tasks, milestones and
    /// deliverables.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut min: Option<NaiveDate> = None;
        let mut max: Option<NaiveDate> = None;
        let mut observe = |d: NaiveDate| {
            min = Some(min.map_or(d, |m| m.min(d)));
            max = Some(max.map_or(d, |m| m.max(d)));
        };
        for wp in &self.work_packages {
            for task in &wp.tasks {
                if let Some(s) = task.start {
                    observe(s);
                }
                if let Some(e) = task.end {
                    observe(e);
                }
            }
            for ms in &wp.milestones {
                observe(ms.date);
            }
            for deliverable in &wp.deliverables {
                if let Some(due) = deliverable.due {
                    observe(due);
                }
            }
        }
        min.zip(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Dependency, DependencyKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn work_packages_are_renumbered_on_remove() {
        let mut project = Project::new("Test");
        project.add_work_package(WorkPackage::new("Management"));
        project.add_work_package(WorkPackage::new("Research"));
        project.add_work_package(WorkPackage::new("Dissemination"));
        assert_eq!(project.work_packages[2].label, "WP3");

        project.remove_work_package(1);
        assert_eq!(project.work_packages[0].label, "WP1");
        assert_eq!(project.work_packages[1].label, "WP2");
        assert_eq!(project.work_packages[1].title, "Dissemination");
    }

    #[test]
    fn work_packages_are_renumbered_on_reorder() {
        let mut project = Project::new("Test");
        project.add_work_package(WorkPackage::new("A"));
        project.add_work_package(WorkPackage::new("B"));
        project.move_work_package(1, -1);
        assert_eq!(project.work_packages[0].title, "B");
        assert_eq!(project.work_packages[0].label, "WP1");
        assert_eq!(project.work_packages[1].label, "WP2");
    }

    #[test]
    fn deleting_a_task_strips_dependencies_on_it() {
        let mut project = Project::new("Test");
        let a = Task::new("A", date(2026, 1, 1), date(2026, 1, 5));
        let mut b = Task::new("B", date(2026, 1, 6), date(2026, 1, 10));
        let a_id = a.id;
        b.dependencies.push(Dependency {
            predecessor: a_id,
            kind: DependencyKind::FinishToStart,
        });
        let mut wp = WorkPackage::new("Research");
        wp.tasks = vec![a, b];
        project.add_work_package(wp);

        project.remove_task(a_id);
        assert_eq!(project.task_count(), 1);
        assert!(project.all_tasks().all(|t| t.dependencies.is_empty()));
    }

    #[test]
    fn date_range_spans_tasks_milestones_and_deliverables() {
        let mut wp = WorkPackage::new("Research");
        wp.tasks.push(Task::new("A", date(2026, 2, 1), date(2026, 3, 1)));
        wp.milestones.push(Milestone::new("Review", date(2026, 6, 1)));
        wp.deliverables
            .push(Deliverable::new("Final report", Some(date(2026, 9, 1))));
        wp.deliverables.push(Deliverable::new("Data plan", None));
        let mut project = Project::new("Test");
        project.add_work_package(wp);
        assert_eq!(
            project.date_range(),
            Some((date(2026, 2, 1), date(2026, 9, 1)))
        );
    }
}
