use std::collections::{HashMap, HashSet};

use chrono::Duration;
use uuid::Uuid;

use super::graph::TaskGraph;

/// Node and edge sets that determine the project's end date.
#[derive(Debug, Default)]
pub struct CriticalPath {
    pub nodes: HashSet<Uuid>,
    pub edges: HashSet<(Uuid, Uuid)>,
}

/// Identify the chain of tasks driving the project end date and flag the
/// corresponding graph nodes and edges.
///
/// Heuristic, not a full CPM slack computation: tasks finishing within one
/// calendar day of the latest end date are seeded as critical, then each is
/// traced backward through the dependency whose predecessor finishes
/// latest. Ties can leave a genuinely parallel critical branch unmarked;
/// that is the documented behavior, not a defect to patch quietly.
pub fn mark_critical(graph: &mut TaskGraph) -> CriticalPath {
    let mut path = CriticalPath::default();

    let Some(max_end) = graph.nodes.iter().filter_map(|n| n.end).max() else {
        return path;
    };

    // Incoming edges per node, in input order.
    let mut incoming: HashMap<Uuid, Vec<usize>> = HashMap::new();
    for (i, edge) in graph.edges.iter().enumerate() {
        incoming.entry(edge.to).or_default().push(i);
    }

    let seeds: Vec<Uuid> = graph
        .nodes
        .iter()
        .filter(|n| {
            n.end
                .map(|end| max_end - end <= Duration::days(1))
                .unwrap_or(false)
        })
        .map(|n| n.id)
        .collect();

    for seed in seeds {
        let mut current = seed;
        loop {
            // Already traced from here; stops both duplicates and loops on
            // malformed cycles.
            if !path.nodes.insert(current) {
                break;
            }
            let driving = incoming
                .get(&current)
                .into_iter()
                .flatten()
                .filter_map(|&i| {
                    let from = graph.edges[i].from;
                    graph.node(from).and_then(|n| n.end).map(|end| (end, from))
                })
                .max_by_key(|&(end, _)| end);
            match driving {
                Some((_, predecessor)) => {
                    path.edges.insert((predecessor, current));
                    current = predecessor;
                }
                None => break,
            }
        }
    }

    for node in &mut graph.nodes {
        node.critical = path.nodes.contains(&node.id);
    }
    for edge in &mut graph.edges {
        edge.critical = path.edges.contains(&(edge.from, edge.to));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::tests::project_with;
    use crate::model::task::DependencyKind;

    const FS: DependencyKind = DependencyKind::FinishToStart;

    #[test]
    fn chain_is_fully_critical() {
        let project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 10))),
                ("C", Some((2026, 1, 11)), Some((2026, 1, 15))),
            ],
            &[(1, 0, FS), (2, 1, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        let path = mark_critical(&mut graph);

        assert_eq!(path.nodes.len(), 3);
        assert_eq!(path.edges.len(), 2);
        assert!(graph.nodes.iter().all(|n| n.critical));
        assert!(graph.edges.iter().all(|e| e.critical));
    }

    #[test]
    fn short_side_branch_is_not_critical() {
        let project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 20))),
                ("Side", Some((2026, 1, 6)), Some((2026, 1, 8))),
            ],
            &[(1, 0, FS), (2, 0, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        let path = mark_critical(&mut graph);

        let side = graph.nodes.iter().find(|n| n.title == "Side").unwrap();
        assert!(!side.critical);
        assert_eq!(path.nodes.len(), 2);
    }

    #[test]
    fn parallel_finishers_within_a_day_are_both_seeded() {
        let project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 20))),
                ("B", Some((2026, 1, 1)), Some((2026, 1, 19))),
            ],
            &[],
        );
        let mut graph = TaskGraph::build(&project);
        let path = mark_critical(&mut graph);
        assert_eq!(path.nodes.len(), 2);
    }

    #[test]
    fn trace_follows_latest_finishing_predecessor() {
        let project = project_with(
            &[
                ("Early", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("Late", Some((2026, 1, 1)), Some((2026, 1, 12))),
                ("End", Some((2026, 1, 13)), Some((2026, 1, 20))),
            ],
            &[(2, 0, FS), (2, 1, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        let path = mark_critical(&mut graph);

        let late = graph.nodes.iter().find(|n| n.title == "Late").unwrap();
        let early = graph.nodes.iter().find(|n| n.title == "Early").unwrap();
        assert!(late.critical);
        assert!(!early.critical);
        assert!(path.edges.contains(&(late.id, graph.nodes[2].id)));
    }

    #[test]
    fn cycle_terminates() {
        let project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("B", Some((2026, 1, 1)), Some((2026, 1, 5))),
            ],
            &[(1, 0, FS), (0, 1, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        let path = mark_critical(&mut graph);
        assert!(!path.nodes.is_empty());
    }

    #[test]
    fn undated_graph_has_no_critical_path() {
        let project = project_with(&[("A", None, None)], &[]);
        let mut graph = TaskGraph::build(&project);
        let path = mark_critical(&mut graph);
        assert!(path.nodes.is_empty());
    }
}
