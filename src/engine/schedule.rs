use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use super::graph::TaskGraph;
use super::levels::assign_levels;
use crate::model::task::DependencyKind;
use crate::model::Project;

/// Forward pass that settles every task's dates against its dependencies.
///
/// Tasks are visited in level order, so each one is recomputed only after
/// all of its predecessors. For every dependency the floor required by its
/// precedence type is computed; with several dependencies the latest floor
/// wins. Task durations are preserved: when a constraint pushes one
/// endpoint, the other moves with it.
///
/// Never fails. Anything that cannot be satisfied (cyclic chains, unknown
/// or unscheduled predecessors) becomes a warning string and the affected
/// task keeps its last valid dates.
pub fn recalculate(project: &mut Project) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut graph = TaskGraph::build(project);
    if graph.is_empty() {
        return warnings;
    }
    let leveling = assign_levels(&mut graph);

    // Stable processing order: level first, input order within a level.
    let mut order: Vec<(usize, Uuid)> = graph.nodes.iter().map(|n| (n.level, n.id)).collect();
    order.sort_by_key(|&(level, _)| level);

    let mut dates: HashMap<Uuid, (NaiveDate, NaiveDate)> = HashMap::new();
    let mut titles: HashMap<Uuid, String> = HashMap::new();
    for task in project.all_tasks() {
        titles.insert(task.id, task.title.clone());
        if let (Some(start), Some(end)) = (task.start, task.end) {
            dates.insert(task.id, (start, end));
        }
    }

    let mut edits: Vec<(Uuid, NaiveDate, NaiveDate)> = Vec::new();
    for &(_, id) in &order {
        if leveling.cyclic.contains(&id) {
            warnings.push(format!(
                "'{}' is part of a cyclic dependency chain; its dates were left unchanged",
                titles[&id]
            ));
            continue;
        }
        let Some(&(start, end)) = dates.get(&id) else {
            // Unscheduled tasks carry no dates to correct.
            continue;
        };

        let task = match project.find_task(id) {
            Some(t) => t,
            None => continue,
        };

        let mut start_floor: Option<NaiveDate> = None;
        let mut end_floor: Option<NaiveDate> = None;
        for dep in &task.dependencies {
            let pred_title = match titles.get(&dep.predecessor) {
                Some(t) => t,
                None => {
                    warnings.push(format!(
                        "'{}' depends on a task that no longer exists; constraint ignored",
                        task.title
                    ));
                    continue;
                }
            };
            let Some(&(pred_start, pred_end)) = dates.get(&dep.predecessor) else {
                warnings.push(format!(
                    "'{}' depends on '{}', which has no dates; constraint skipped",
                    task.title, pred_title
                ));
                continue;
            };
            match dep.kind {
                // At day granularity the successor starts the day after the
                // predecessor ends.
                DependencyKind::FinishToStart => {
                    raise(&mut start_floor, pred_end + Duration::days(1));
                }
                DependencyKind::StartToStart => {
                    raise(&mut start_floor, pred_start);
                }
                DependencyKind::FinishToFinish => {
                    raise(&mut end_floor, pred_end);
                }
                DependencyKind::StartToFinish => {
                    raise(&mut end_floor, pred_start);
                }
            }
        }

        let duration = end - start;
        let mut new_start = start;
        if let Some(floor) = start_floor {
            new_start = new_start.max(floor);
        }
        let mut new_end = new_start + duration;
        if let Some(floor) = end_floor {
            if floor > new_end {
                // Shift the whole task later; the start floor stays
                // satisfied because the start only moves forward.
                new_end = floor;
                new_start = new_end - duration;
            }
        }

        if new_start != start || new_end != end {
            dates.insert(id, (new_start, new_end));
            edits.push((id, new_start, new_end));
        }
    }

    for (id, start, end) in edits {
        if let Some(task) = project.find_task_mut(id) {
            task.start = Some(start);
            task.end = Some(end);
        }
    }

    tracing::debug!(
        tasks = order.len(),
        levels = leveling.max_level + 1,
        warnings = warnings.len(),
        "schedule recalculated"
    );
    warnings
}

fn raise(floor: &mut Option<NaiveDate>, candidate: NaiveDate) {
    *floor = Some(floor.map_or(candidate, |f| f.max(candidate)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::tests::{date, project_with};

    const FS: DependencyKind = DependencyKind::FinishToStart;
    const SS: DependencyKind = DependencyKind::StartToStart;
    const FF: DependencyKind = DependencyKind::FinishToFinish;
    const SF: DependencyKind = DependencyKind::StartToFinish;

    fn task_dates(project: &Project, index: usize) -> (NaiveDate, NaiveDate) {
        let task = &project.work_packages[0].tasks[index];
        (task.start.unwrap(), task.end.unwrap())
    }

    #[test]
    fn consistent_chain_is_untouched() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 10))),
                ("C", Some((2026, 1, 11)), Some((2026, 1, 15))),
            ],
            &[(1, 0, FS), (2, 1, FS)],
        );
        let warnings = recalculate(&mut project);
        assert!(warnings.is_empty());
        assert_eq!(task_dates(&project, 1), (date(2026, 1, 6), date(2026, 1, 10)));
        assert_eq!(task_dates(&project, 2), (date(2026, 1, 11), date(2026, 1, 15)));
    }

    #[test]
    fn late_finish_pushes_dependents_and_preserves_durations() {
        // Editing A's end to Jan 8 must push B to start Jan 9 and C to
        // start Jan 14, both keeping their 4-day spans.
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 8))),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 10))),
                ("C", Some((2026, 1, 11)), Some((2026, 1, 15))),
            ],
            &[(1, 0, FS), (2, 1, FS)],
        );
        let warnings = recalculate(&mut project);
        assert!(warnings.is_empty());
        assert_eq!(task_dates(&project, 1), (date(2026, 1, 9), date(2026, 1, 13)));
        assert_eq!(task_dates(&project, 2), (date(2026, 1, 14), date(2026, 1, 18)));
    }

    #[test]
    fn start_to_start_binds_to_predecessor_start() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 10)), Some((2026, 3, 1))),
                ("D", Some((2026, 1, 1)), Some((2026, 1, 5))),
            ],
            &[(1, 0, SS)],
        );
        recalculate(&mut project);
        let (start, end) = task_dates(&project, 1);
        assert_eq!(start, date(2026, 1, 10));
        assert_eq!(end, date(2026, 1, 14));
    }

    #[test]
    fn finish_to_finish_shifts_task_later_keeping_duration() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 2, 1))),
                ("B", Some((2026, 1, 1)), Some((2026, 1, 10))),
            ],
            &[(1, 0, FF)],
        );
        recalculate(&mut project);
        assert_eq!(task_dates(&project, 1), (date(2026, 1, 23), date(2026, 2, 1)));
    }

    #[test]
    fn start_to_finish_binds_end_to_predecessor_start() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 2, 1)), Some((2026, 3, 1))),
                ("B", Some((2026, 1, 1)), Some((2026, 1, 5))),
            ],
            &[(1, 0, SF)],
        );
        recalculate(&mut project);
        assert_eq!(task_dates(&project, 1), (date(2026, 1, 28), date(2026, 2, 1)));
    }

    #[test]
    fn tightest_of_multiple_constraints_wins() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("B", Some((2026, 1, 1)), Some((2026, 1, 20))),
                ("C", Some((2026, 1, 2)), Some((2026, 1, 8))),
            ],
            &[(2, 0, FS), (2, 1, FS)],
        );
        recalculate(&mut project);
        // B finishes later than A, so B's constraint binds.
        assert_eq!(task_dates(&project, 2).0, date(2026, 1, 21));
    }

    #[test]
    fn recalculation_is_idempotent() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 8))),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 10))),
                ("C", Some((2026, 1, 11)), Some((2026, 1, 15))),
            ],
            &[(1, 0, FS), (2, 1, FS)],
        );
        recalculate(&mut project);
        let snapshot = serde_json::to_string(&project.work_packages).unwrap();
        recalculate(&mut project);
        let again = serde_json::to_string(&project.work_packages).unwrap();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn cycle_produces_warning_and_leaves_dates() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 10))),
            ],
            &[(1, 0, FS), (0, 1, FS)],
        );
        let warnings = recalculate(&mut project);
        assert!(!warnings.is_empty());
        assert_eq!(task_dates(&project, 0), (date(2026, 1, 1), date(2026, 1, 5)));
    }

    #[test]
    fn unscheduled_predecessor_warns_and_skips_constraint() {
        let mut project = project_with(
            &[
                ("A", None, None),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 10))),
            ],
            &[(1, 0, FS)],
        );
        let warnings = recalculate(&mut project);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("has no dates"));
        assert_eq!(task_dates(&project, 1), (date(2026, 1, 6), date(2026, 1, 10)));
    }

    #[test]
    fn satisfied_graph_meets_all_four_constraint_kinds() {
        let mut project = project_with(
            &[
                ("A", Some((2026, 1, 5)), Some((2026, 1, 12))),
                ("B", Some((2026, 1, 1)), Some((2026, 1, 3))),
                ("C", Some((2026, 1, 1)), Some((2026, 1, 2))),
                ("D", Some((2026, 1, 1)), Some((2026, 1, 2))),
                ("E", Some((2026, 1, 1)), Some((2026, 1, 2))),
            ],
            &[(1, 0, FS), (2, 0, SS), (3, 0, FF), (4, 0, SF)],
        );
        let warnings = recalculate(&mut project);
        assert!(warnings.is_empty());

        let (a_start, a_end) = task_dates(&project, 0);
        assert!(task_dates(&project, 1).0 > a_end);
        assert!(task_dates(&project, 2).0 >= a_start);
        assert!(task_dates(&project, 3).1 >= a_end);
        assert!(task_dates(&project, 4).1 >= a_start);
    }
}
