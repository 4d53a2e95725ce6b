use crate::engine::{critical, layout, levels, LayoutConfig, NetworkViewport, TaskGraph};
use crate::model::Project;
use crate::ui::theme;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

/// Render the precedence network: tasks as cards placed by the layout
/// engine, dependencies as S-curves, the critical path in red.
///
/// The whole pipeline (graph → levels → critical path → coordinates) is
/// rebuilt from the project on every frame; the graph is disposable and
/// cheap at work-plan sizes.
pub fn show_network(
    project: &Project,
    selected_task: &mut Option<Uuid>,
    viewport: &mut NetworkViewport,
    ui: &mut Ui,
) {
    let cfg = LayoutConfig::default();
    let mut graph = TaskGraph::build(project);
    if graph.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("Add tasks to see the precedence network")
                    .color(theme::TEXT_DIM),
            );
        });
        return;
    }
    levels::assign_levels(&mut graph);
    critical::mark_critical(&mut graph);
    let diagram = layout::layout(&mut graph, &cfg);

    let available = ui.available_size();
    viewport.update_fit(available, diagram);

    // Ctrl+scroll switches to manual zoom
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            viewport.zoom_in();
        } else if scroll_delta.y < 0.0 {
            viewport.zoom_out();
        }
    }
    let scale = viewport.scale;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let canvas = (diagram * scale).max(available);
            let (response, painter) = ui.allocate_painter(canvas, Sense::click());
            let origin = response.rect.min;
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            let place = |p: Pos2| Pos2::new(origin.x + p.x * scale, origin.y + p.y * scale);

            // Edges under nodes
            for edge in &graph.edges {
                let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) else {
                    continue;
                };
                let [p0, c1, c2, p3] = layout::connector(from, to, &cfg);
                let stroke = if edge.critical {
                    Stroke::new(2.5 * scale, theme::CRITICAL)
                } else {
                    Stroke::new(1.5 * scale, theme::EDGE_COLOR)
                };
                painter.add(egui::epaint::CubicBezierShape::from_points_stroke(
                    [place(p0), place(c1), place(c2), place(p3)],
                    false,
                    Color32::TRANSPARENT,
                    stroke,
                ));

                // Arrowhead at the successor's edge
                let tip = place(p3);
                let size = 5.0 * scale;
                painter.add(egui::Shape::convex_polygon(
                    vec![
                        tip,
                        Pos2::new(tip.x - size, tip.y - size * 0.7),
                        Pos2::new(tip.x - size, tip.y + size * 0.7),
                    ],
                    stroke.color,
                    Stroke::NONE,
                ));

                // Precedence type at the curve midpoint
                let mid = Pos2::new((p0.x + p3.x) / 2.0, (p0.y + p3.y) / 2.0);
                painter.text(
                    place(mid),
                    egui::Align2::CENTER_CENTER,
                    edge.kind.label(),
                    theme::font_small(),
                    if edge.critical {
                        theme::CRITICAL
                    } else {
                        theme::TEXT_DIM
                    },
                );
            }

            for node in &graph.nodes {
                let rect = Rect::from_min_size(
                    place(Pos2::new(node.x, node.y)),
                    Vec2::new(cfg.node_width * scale, cfg.node_height * scale),
                );
                let is_selected = *selected_task == Some(node.id);
                let wp_color = theme::wp_color(node.wp_index);
                let rounding = Rounding::same(5.0 * scale);

                painter.rect_filled(rect, rounding, theme::NODE_FILL);
                // Package color strip along the left edge
                painter.rect_filled(
                    Rect::from_min_size(rect.min, Vec2::new(4.0 * scale, rect.height())),
                    Rounding {
                        nw: 5.0 * scale,
                        sw: 5.0 * scale,
                        ne: 0.0,
                        se: 0.0,
                    },
                    wp_color,
                );

                let border = if is_selected {
                    Stroke::new(2.0, theme::BORDER_ACCENT)
                } else if node.critical {
                    Stroke::new(2.0, theme::CRITICAL)
                } else {
                    Stroke::new(1.0, theme::BORDER_SUBTLE)
                };
                painter.rect_stroke(rect, rounding, border);

                let clipped = painter.with_clip_rect(rect.shrink(4.0));
                clipped.text(
                    Pos2::new(rect.left() + 10.0 * scale, rect.top() + 14.0 * scale),
                    egui::Align2::LEFT_CENTER,
                    &node.title,
                    theme::font_node_title(),
                    theme::TEXT_PRIMARY,
                );
                let detail = match (node.start, node.end) {
                    (Some(start), Some(end)) => {
                        format!(
                            "{} → {}  ·  {} d",
                            start.format("%d %b"),
                            end.format("%d %b"),
                            node.duration_days
                        )
                    }
                    _ => "unscheduled".to_string(),
                };
                clipped.text(
                    Pos2::new(rect.left() + 10.0 * scale, rect.top() + 34.0 * scale),
                    egui::Align2::LEFT_CENTER,
                    detail,
                    theme::font_sub(),
                    theme::TEXT_SECONDARY,
                );

                let node_response = ui.interact(
                    rect,
                    ui.make_persistent_id(("network-node", node.id)),
                    Sense::click(),
                );
                if node_response.clicked() {
                    *selected_task = Some(node.id);
                    consumed_click = true;
                }
                if node_response.hovered() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("network-tip", node.id)),
                        |ui| {
                            ui.strong(&node.title);
                            ui.label(format!("Level {}", node.level));
                            if node.critical {
                                ui.colored_label(theme::CRITICAL, "On critical path");
                            }
                        },
                    );
                }
            }

            // Zoom readout, bottom-left
            painter.text(
                Pos2::new(response.rect.left() + 10.0, response.rect.bottom() - 12.0),
                egui::Align2::LEFT_CENTER,
                format!("{:.0} %", scale * 100.0),
                theme::font_small(),
                theme::TEXT_DIM,
            );

            if response.clicked() && !consumed_click {
                *selected_task = None;
            }
        });
}
