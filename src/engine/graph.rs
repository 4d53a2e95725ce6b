use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::task::DependencyKind;
use crate::model::Project;

/// Derived graph node for one task. Rebuilt on every pass, never persisted.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: Uuid,
    pub title: String,
    /// Index of the owning work package, used for grouping and coloring.
    pub wp_index: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub duration_days: i64,
    pub level: usize,
    pub x: f32,
    pub y: f32,
    pub critical: bool,
}

/// Derived edge for one resolved dependency.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub from: Uuid,
    pub to: Uuid,
    pub kind: DependencyKind,
    pub critical: bool,
}

/// Flat node/edge view of the project's work packages, with a task-id
/// lookup. Dependencies whose predecessor does not resolve to a known task
/// are dropped from the edge list.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index: HashMap<Uuid, usize>,
}

impl TaskGraph {
    pub fn build(project: &Project) -> Self {
        let mut nodes = Vec::new();
        let mut index = HashMap::new();

        for (wp_index, wp) in project.work_packages.iter().enumerate() {
            for task in &wp.tasks {
                index.insert(task.id, nodes.len());
                nodes.push(GraphNode {
                    id: task.id,
                    title: task.title.clone(),
                    wp_index,
                    start: task.start,
                    end: task.end,
                    duration_days: task.duration_days(),
                    level: 0,
                    x: 0.0,
                    y: 0.0,
                    critical: false,
                });
            }
        }

        let mut edges = Vec::new();
        for wp in &project.work_packages {
            for task in &wp.tasks {
                for dep in &task.dependencies {
                    if index.contains_key(&dep.predecessor) {
                        edges.push(GraphEdge {
                            from: dep.predecessor,
                            to: task.id,
                            kind: dep.kind,
                            critical: false,
                        });
                    } else {
                        tracing::warn!(
                            task = %task.title,
                            predecessor = %dep.predecessor,
                            "dropping dependency on unknown predecessor"
                        );
                    }
                }
            }
        }

        Self { nodes, edges, index }
    }

    pub fn node(&self, id: Uuid) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Predecessor ids per node, in the order the edges were produced.
    pub fn predecessors(&self) -> HashMap<Uuid, Vec<Uuid>> {
        let mut preds: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for node in &self.nodes {
            preds.insert(node.id, Vec::new());
        }
        for edge in &self.edges {
            if let Some(list) = preds.get_mut(&edge.to) {
                list.push(edge.from);
            }
        }
        preds
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_level(&self) -> usize {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }
}
