use crate::model::Project;
use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use uuid::Uuid;

/// Actions the work-plan panel can request.
pub enum PlanPanelAction {
    None,
    Select(Uuid),
    DeleteTask(Uuid),
    AddTask(usize),
    AddWorkPackage,
    DeleteWorkPackage(usize),
    MoveWorkPackage(usize, i32),
}

/// Render the left-side work-plan panel: work packages with their tasks and
/// milestones.
pub fn show_plan_panel(
    project: &Project,
    selected_task: Option<Uuid>,
    ui: &mut Ui,
) -> PlanPanelAction {
    let mut action = PlanPanelAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Work Plan")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!(
                "({} packages, {} tasks)",
                project.work_packages.len(),
                project.task_count()
            ))
            .size(11.0)
            .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new("＋  Add Work Package")
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = PlanPanelAction::AddWorkPackage;
    }

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let last = project.work_packages.len().saturating_sub(1);
            for (wp_index, wp) in project.work_packages.iter().enumerate() {
                let color = theme::wp_color(wp_index);

                // Package header row
                ui.horizontal(|ui| {
                    let (dot_rect, _) =
                        ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                    ui.painter().circle_filled(dot_rect.center(), 4.0, color);
                    ui.label(
                        RichText::new(format!("{}  {}", wp.label, wp.title))
                            .strong()
                            .size(12.5)
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.spacing_mut().item_spacing.x = 2.0;
                        let small = |text: &str| {
                            egui::Button::new(
                                RichText::new(text).size(10.0).color(theme::TEXT_DIM),
                            )
                            .frame(false)
                        };
                        if ui.add(small("✕")).on_hover_text("Delete work package").clicked() {
                            action = PlanPanelAction::DeleteWorkPackage(wp_index);
                        }
                        if wp_index < last
                            && ui.add(small("▼")).on_hover_text("Move down").clicked()
                        {
                            action = PlanPanelAction::MoveWorkPackage(wp_index, 1);
                        }
                        if wp_index > 0 && ui.add(small("▲")).on_hover_text("Move up").clicked() {
                            action = PlanPanelAction::MoveWorkPackage(wp_index, -1);
                        }
                        if ui.add(small("＋")).on_hover_text("Add task").clicked() {
                            action = PlanPanelAction::AddTask(wp_index);
                        }
                    });
                });

                // Task rows
                for (i, task) in wp.tasks.iter().enumerate() {
                    let is_selected = selected_task == Some(task.id);
                    let row_bg = if is_selected {
                        theme::BG_SELECTED
                    } else if i % 2 == 0 {
                        theme::BG_PANEL
                    } else {
                        theme::BG_DARK
                    };

                    let frame = egui::Frame {
                        fill: row_bg,
                        rounding: egui::Rounding::same(4.0),
                        inner_margin: egui::Margin::symmetric(6.0, 4.0),
                        outer_margin: egui::Margin {
                            left: 12.0,
                            ..egui::Margin::ZERO
                        },
                        stroke: egui::Stroke::NONE,
                        shadow: egui::epaint::Shadow::NONE,
                    };

                    let frame_resp = frame.show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 6.0;
                            let title_text =
                                RichText::new(&task.title).size(12.0).color(if is_selected {
                                    Color32::WHITE
                                } else {
                                    theme::TEXT_PRIMARY
                                });
                            ui.add(egui::Label::new(title_text).truncate());

                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    ui.spacing_mut().item_spacing.x = 4.0;
                                    let del_btn = ui.add(
                                        egui::Button::new(
                                            RichText::new("✕")
                                                .size(10.0)
                                                .color(theme::TEXT_DIM),
                                        )
                                        .frame(false),
                                    );
                                    if del_btn.on_hover_text("Delete task").clicked() {
                                        action = PlanPanelAction::DeleteTask(task.id);
                                    }

                                    match (task.start, task.end) {
                                        (Some(start), Some(end)) => {
                                            ui.label(
                                                RichText::new(end.format("%m/%d").to_string())
                                                    .size(10.0)
                                                    .color(theme::TEXT_SECONDARY),
                                            );
                                            ui.label(
                                                RichText::new("→")
                                                    .size(9.0)
                                                    .color(theme::TEXT_DIM),
                                            );
                                            ui.label(
                                                RichText::new(start.format("%m/%d").to_string())
                                                    .size(10.0)
                                                    .color(theme::TEXT_SECONDARY),
                                            );
                                        }
                                        _ => {
                                            ui.label(
                                                RichText::new("unscheduled")
                                                    .size(10.0)
                                                    .italics()
                                                    .color(theme::TEXT_DIM),
                                            );
                                        }
                                    }

                                    if !task.dependencies.is_empty() {
                                        ui.label(
                                            RichText::new(format!(
                                                "{}⇠",
                                                task.dependencies.len()
                                            ))
                                            .size(10.0)
                                            .color(theme::TEXT_DIM),
                                        )
                                        .on_hover_text("Dependencies");
                                    }
                                },
                            );
                        });
                    });

                    let row_rect = frame_resp.response.rect;
                    let row_click = ui.interact(
                        row_rect,
                        egui::Id::new(("plan-row", task.id)),
                        egui::Sense::click(),
                    );
                    if row_click.clicked() {
                        action = PlanPanelAction::Select(task.id);
                    }
                    ui.add_space(1.0);
                }

                // Milestones and deliverables, read-only summary line each
                for ms in &wp.milestones {
                    ui.horizontal(|ui| {
                        ui.add_space(14.0);
                        ui.label(
                            RichText::new(format!(
                                "◆ {}  {}",
                                ms.date.format("%Y-%m-%d"),
                                ms.description
                            ))
                            .size(10.5)
                            .color(theme::MILESTONE_COLOR),
                        );
                    });
                }
                for deliverable in &wp.deliverables {
                    let due = deliverable
                        .due
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "no due date".to_string());
                    ui.horizontal(|ui| {
                        ui.add_space(14.0);
                        ui.label(
                            RichText::new(format!("▣ {}  {}", due, deliverable.title))
                                .size(10.5)
                                .color(theme::ACCENT),
                        );
                    });
                }

                ui.add_space(6.0);
            }
        });

    action
}
