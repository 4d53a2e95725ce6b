use egui::{Pos2, Vec2};

use super::graph::{GraphNode, TaskGraph};

/// Spacing for the precedence diagram. Kept as data so the same engine can
/// serve the interactive view and image export at different densities.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub margin: f32,
    pub min_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 58.0,
            horizontal_gap: 70.0,
            vertical_gap: 26.0,
            margin: 24.0,
            min_height: 220.0,
        }
    }
}

/// Assign diagram coordinates from levels and intra-level input order, and
/// return the diagram's bounding box.
///
/// Columns follow the level; each column's stack is vertically centered
/// against the tallest column. Identical graphs always yield identical
/// coordinates: placement depends only on level and node input order.
pub fn layout(graph: &mut TaskGraph, cfg: &LayoutConfig) -> Vec2 {
    let levels = graph.max_level() + 1;
    let mut counts = vec![0usize; levels];
    for node in &graph.nodes {
        counts[node.level] += 1;
    }
    let max_in_level = counts.iter().copied().max().unwrap_or(0);
    let row_pitch = cfg.node_height + cfg.vertical_gap;
    let tallest = max_in_level as f32 * row_pitch;

    let mut placed = vec![0usize; levels];
    for node in &mut graph.nodes {
        let column_height = counts[node.level] as f32 * row_pitch;
        let offset = (tallest - column_height) / 2.0;
        node.x = node.level as f32 * (cfg.node_width + cfg.horizontal_gap) + cfg.margin;
        node.y = cfg.margin + offset + placed[node.level] as f32 * row_pitch;
        placed[node.level] += 1;
    }

    Vec2::new(
        levels as f32 * (cfg.node_width + cfg.horizontal_gap) + cfg.margin,
        (tallest + cfg.margin).max(cfg.min_height),
    )
}

/// Control points of the smooth S-curve between two node boxes: out of the
/// predecessor's right edge, into the successor's left edge, with both
/// control points at the horizontal midpoint.
pub fn connector(from: &GraphNode, to: &GraphNode, cfg: &LayoutConfig) -> [Pos2; 4] {
    let p0 = Pos2::new(from.x + cfg.node_width, from.y + cfg.node_height / 2.0);
    let p3 = Pos2::new(to.x, to.y + cfg.node_height / 2.0);
    let mid_x = (p0.x + p3.x) / 2.0;
    [p0, Pos2::new(mid_x, p0.y), Pos2::new(mid_x, p3.y), p3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::tests::project_with;
    use crate::engine::levels::assign_levels;
    use crate::model::task::DependencyKind;

    const FS: DependencyKind = DependencyKind::FinishToStart;

    fn laid_out(
        links: &[(usize, usize, DependencyKind)],
        count: usize,
    ) -> (TaskGraph, Vec2, LayoutConfig) {
        let tasks: Vec<(String, _, _)> = (0..count)
            .map(|i| {
                (
                    format!("T{i}"),
                    None::<(i32, u32, u32)>,
                    None::<(i32, u32, u32)>,
                )
            })
            .collect();
        let refs: Vec<(&str, _, _)> = tasks.iter().map(|(t, s, e)| (t.as_str(), *s, *e)).collect();
        let project = project_with(&refs, links);
        let mut graph = TaskGraph::build(&project);
        assign_levels(&mut graph);
        let cfg = LayoutConfig::default();
        let size = layout(&mut graph, &cfg);
        (graph, size, cfg)
    }

    #[test]
    fn columns_follow_levels() {
        let (graph, _, cfg) = laid_out(&[(1, 0, FS), (2, 1, FS)], 3);
        assert_eq!(graph.nodes[0].x, cfg.margin);
        assert_eq!(
            graph.nodes[1].x,
            cfg.node_width + cfg.horizontal_gap + cfg.margin
        );
        assert_eq!(
            graph.nodes[2].x,
            2.0 * (cfg.node_width + cfg.horizontal_gap) + cfg.margin
        );
    }

    #[test]
    fn short_columns_are_vertically_centered() {
        // Level 0: three sources. Level 1: one sink. The sink must sit at
        // the middle of the three-row column, not at its top.
        let (graph, _, _) = laid_out(&[(3, 0, FS), (3, 1, FS), (3, 2, FS)], 4);
        let sink = &graph.nodes[3];
        let middle_source = &graph.nodes[1];
        assert_eq!(sink.y, middle_source.y);
    }

    #[test]
    fn bounding_box_matches_grid() {
        let (_, size, cfg) = laid_out(&[(1, 0, FS)], 2);
        assert_eq!(size.x, 2.0 * (cfg.node_width + cfg.horizontal_gap) + cfg.margin);
        assert_eq!(
            size.y,
            (cfg.node_height + cfg.vertical_gap + cfg.margin).max(cfg.min_height)
        );
    }

    #[test]
    fn layout_is_deterministic() {
        let coords = |(graph, _, _): &(TaskGraph, Vec2, LayoutConfig)| -> Vec<(f32, f32)> {
            graph.nodes.iter().map(|n| (n.x, n.y)).collect()
        };
        let first = laid_out(&[(1, 0, FS), (2, 0, FS), (3, 1, FS)], 4);
        let second = laid_out(&[(1, 0, FS), (2, 0, FS), (3, 1, FS)], 4);
        assert_eq!(coords(&first), coords(&second));
    }

    #[test]
    fn connector_control_points_sit_at_midpoint() {
        let (graph, _, cfg) = laid_out(&[(1, 0, FS)], 2);
        let [p0, c1, c2, p3] = connector(&graph.nodes[0], &graph.nodes[1], &cfg);
        assert_eq!(p0.x, graph.nodes[0].x + cfg.node_width);
        assert_eq!(p3.x, graph.nodes[1].x);
        let mid = (p0.x + p3.x) / 2.0;
        assert_eq!(c1.x, mid);
        assert_eq!(c2.x, mid);
        assert_eq!(c1.y, p0.y);
        assert_eq!(c2.y, p3.y);
    }
}
