use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::graph::TaskGraph;

/// Outcome of a leveling pass.
#[derive(Debug, Default)]
pub struct Leveling {
    pub max_level: usize,
    /// Nodes at which a dependency chain closed back on itself. Their level
    /// is neutralized to 0 rather than treated as an error.
    pub cyclic: HashSet<Uuid>,
}

/// Assign each node its longest-path-from-source level: sourceless nodes sit
/// at level 0, every other node one above its highest predecessor.
///
/// Levels are computed once per node and memoized. Each recursion branch
/// carries its own copy of the ancestor set, so sibling branches cannot
/// suppress each other's cycle detection. Terminates on any input.
pub fn assign_levels(graph: &mut TaskGraph) -> Leveling {
    let preds = graph.predecessors();
    let mut memo: HashMap<Uuid, usize> = HashMap::new();
    let mut cyclic: HashSet<Uuid> = HashSet::new();

    let order: Vec<Uuid> = graph.nodes.iter().map(|n| n.id).collect();
    for id in &order {
        level_of(*id, &preds, &mut memo, &mut cyclic, &HashSet::new());
    }

    let mut max_level = 0;
    for node in &mut graph.nodes {
        node.level = memo.get(&node.id).copied().unwrap_or(0);
        max_level = max_level.max(node.level);
    }
    Leveling { max_level, cyclic }
}

fn level_of(
    id: Uuid,
    preds: &HashMap<Uuid, Vec<Uuid>>,
    memo: &mut HashMap<Uuid, usize>,
    cyclic: &mut HashSet<Uuid>,
    visiting: &HashSet<Uuid>,
) -> usize {
    if let Some(&level) = memo.get(&id) {
        return level;
    }
    if visiting.contains(&id) {
        // Revisited within our own ancestor chain: neutralize the cycle.
        cyclic.insert(id);
        return 0;
    }

    let mut branch = visiting.clone();
    branch.insert(id);

    let level = match preds.get(&id) {
        Some(list) if !list.is_empty() => {
            list.iter()
                .map(|p| level_of(*p, preds, memo, cyclic, &branch))
                .max()
                .unwrap_or(0)
                + 1
        }
        _ => 0,
    };

    memo.insert(id, level);
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::tests::project_with;
    use crate::model::task::DependencyKind;
    use proptest::prelude::*;

    const FS: DependencyKind = DependencyKind::FinishToStart;

    #[test]
    fn chain_levels_increase_along_edges() {
        let project = project_with(
            &[
                ("A", Some((2026, 1, 1)), Some((2026, 1, 5))),
                ("B", Some((2026, 1, 6)), Some((2026, 1, 10))),
                ("C", Some((2026, 1, 11)), Some((2026, 1, 15))),
            ],
            &[(1, 0, FS), (2, 1, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        let leveling = assign_levels(&mut graph);

        assert_eq!(graph.nodes[0].level, 0);
        assert_eq!(graph.nodes[1].level, 1);
        assert_eq!(graph.nodes[2].level, 2);
        assert_eq!(leveling.max_level, 2);
        assert!(leveling.cyclic.is_empty());
    }

    #[test]
    fn diamond_takes_longest_path() {
        // A → B → D and A → D: D must sit above B, not directly above A.
        let project = project_with(
            &[("A", None, None), ("B", None, None), ("D", None, None)],
            &[(1, 0, FS), (2, 1, FS), (2, 0, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        assign_levels(&mut graph);
        assert_eq!(graph.nodes[2].level, 2);
    }

    #[test]
    fn cycle_terminates_and_is_reported() {
        let project = project_with(
            &[("A", None, None), ("B", None, None)],
            &[(1, 0, FS), (0, 1, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        let leveling = assign_levels(&mut graph);
        assert!(!leveling.cyclic.is_empty());
        // Every node still got a bounded level; nothing hung or panicked.
        assert!(graph.nodes.iter().all(|n| n.level <= graph.nodes.len()));
    }

    #[test]
    fn sibling_branches_do_not_share_ancestor_state() {
        // Two separate paths from A to D; visiting D through one branch must
        // not make the other branch think it found a cycle.
        let project = project_with(
            &[
                ("A", None, None),
                ("B", None, None),
                ("C", None, None),
                ("D", None, None),
            ],
            &[(1, 0, FS), (2, 0, FS), (3, 1, FS), (3, 2, FS)],
        );
        let mut graph = TaskGraph::build(&project);
        let leveling = assign_levels(&mut graph);
        assert!(leveling.cyclic.is_empty());
        assert_eq!(graph.nodes[3].level, 2);
    }

    proptest! {
        /// For random acyclic graphs every edge goes strictly upward in
        /// level. Edges are only generated from lower to higher task index,
        /// which guarantees acyclicity by construction.
        #[test]
        fn leveling_is_a_topological_order(
            n in 2usize..12,
            edge_seed in proptest::collection::vec((0usize..12, 0usize..12), 0..24),
        ) {
            let tasks: Vec<(String, _, _)> = (0..n)
                .map(|i| (format!("T{i}"), None::<(i32, u32, u32)>, None::<(i32, u32, u32)>))
                .collect();
            let task_refs: Vec<(&str, _, _)> = tasks
                .iter()
                .map(|(t, s, e)| (t.as_str(), *s, *e))
                .collect();
            let links: Vec<(usize, usize, DependencyKind)> = edge_seed
                .iter()
                .filter(|(a, b)| a < b && *b < n)
                .map(|(a, b)| (*b, *a, FS))
                .collect();

            let project = project_with(&task_refs, &links);
            let mut graph = TaskGraph::build(&project);
            let leveling = assign_levels(&mut graph);

            prop_assert!(leveling.cyclic.is_empty());
            for edge in &graph.edges {
                let from = graph.node(edge.from).unwrap().level;
                let to = graph.node(edge.to).unwrap().level;
                prop_assert!(from < to, "edge {from} -> {to} not strictly upward");
            }
        }
    }
}
