use crate::model::task::{Dependency, DependencyKind, Task};
use crate::ui::theme;
use chrono::Duration;
use egui::{Id, RichText, Ui};
use uuid::Uuid;

/// Actions the editor can request.
pub enum EditorAction {
    None,
    /// Title or description changed; no rescheduling needed.
    Changed,
    /// Dates changed; the caller must recalculate the schedule.
    ScheduleChanged,
    RemoveDependency(Uuid),
    AddDependency(Dependency),
}

/// State for the "add dependency" picker, kept in egui temp memory.
#[derive(Clone)]
struct DepPickerState {
    predecessor: Option<Uuid>,
    kind: DependencyKind,
}

impl Default for DepPickerState {
    fn default() -> Self {
        Self {
            predecessor: None,
            kind: DependencyKind::FinishToStart,
        }
    }
}

fn section_label(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .size(10.0)
            .color(theme::TEXT_DIM)
            .strong(),
    );
}

/// Inline editor for the selected task: title, description, schedule and
/// dependencies. `all_tasks` is a flat (id, title) snapshot used for the
/// dependency picker and for naming predecessors.
pub fn show_task_editor(
    task: &mut Task,
    all_tasks: &[(Uuid, String)],
    ui: &mut Ui,
) -> EditorAction {
    let mut action = EditorAction::None;
    let picker_id = Id::new(("dep-picker", task.id));

    ui.add_space(6.0);
    ui.label(
        RichText::new("Edit Task")
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(5.0),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;

        section_label(ui, "Title");
        let title_edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut task.title)
                .font(egui::FontId::proportional(12.0))
                .text_color(theme::TEXT_PRIMARY),
        );
        if title_edit.changed() {
            action = EditorAction::Changed;
        }

        ui.add_space(2.0);

        section_label(ui, "Description");
        let desc_resp = ui.add_sized(
            [ui.available_width(), 60.0],
            egui::TextEdit::multiline(&mut task.description)
                .font(egui::FontId::proportional(11.0))
                .text_color(theme::TEXT_SECONDARY)
                .hint_text("What this task covers..."),
        );
        if desc_resp.changed() {
            action = EditorAction::Changed;
        }

        ui.add_space(2.0);

        // ── Schedule ──────────────────────────────────────────────────
        let mut scheduled = task.start.is_some() && task.end.is_some();
        if ui.checkbox(&mut scheduled, "Scheduled").changed() {
            if scheduled {
                let today = chrono::Local::now().date_naive();
                task.start = Some(today);
                task.end = Some(today + Duration::days(7));
            } else {
                task.start = None;
                task.end = None;
            }
            action = EditorAction::ScheduleChanged;
        }

        if let (Some(mut start), Some(mut end)) = (task.start, task.end) {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    section_label(ui, "Start");
                    let resp = ui.add(
                        egui_extras::DatePickerButton::new(&mut start).id_salt("dp_start"),
                    );
                    if resp.changed() {
                        if end < start {
                            end = start;
                        }
                        task.start = Some(start);
                        task.end = Some(end);
                        action = EditorAction::ScheduleChanged;
                    }
                });

                ui.add_space(8.0);

                ui.vertical(|ui| {
                    section_label(ui, "End");
                    let resp =
                        ui.add(egui_extras::DatePickerButton::new(&mut end).id_salt("dp_end"));
                    if resp.changed() {
                        if end < start {
                            start = end;
                        }
                        task.start = Some(start);
                        task.end = Some(end);
                        action = EditorAction::ScheduleChanged;
                    }
                });
            });
            ui.label(
                RichText::new(format!("{} days", task.duration_days()))
                    .size(10.0)
                    .color(theme::TEXT_DIM),
            );
        }

        ui.add_space(2.0);

        // ── Dependencies ──────────────────────────────────────────────
        section_label(ui, "Depends On");
        if task.dependencies.is_empty() {
            ui.label(
                RichText::new("No dependencies")
                    .size(10.5)
                    .italics()
                    .color(theme::TEXT_DIM),
            );
        }
        for dep in &task.dependencies {
            let title = all_tasks
                .iter()
                .find(|(id, _)| *id == dep.predecessor)
                .map(|(_, t)| t.as_str())
                .unwrap_or("(missing task)");
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("[{}]", dep.kind.label()))
                        .size(10.5)
                        .color(theme::ACCENT),
                );
                ui.add(
                    egui::Label::new(
                        RichText::new(title).size(11.0).color(theme::TEXT_SECONDARY),
                    )
                    .truncate(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let del = ui.add(
                        egui::Button::new(
                            RichText::new("✕").size(10.0).color(theme::TEXT_DIM),
                        )
                        .frame(false),
                    );
                    if del.on_hover_text("Remove dependency").clicked() {
                        action = EditorAction::RemoveDependency(dep.predecessor);
                    }
                });
            });
        }

        ui.add_space(2.0);

        let mut picker: DepPickerState = ui
            .ctx()
            .data_mut(|data| data.get_temp(picker_id))
            .unwrap_or_default();

        ui.horizontal(|ui| {
            let selected_title = picker
                .predecessor
                .and_then(|id| all_tasks.iter().find(|(tid, _)| *tid == id))
                .map(|(_, t)| t.clone())
                .unwrap_or_else(|| "Select task...".to_string());
            egui::ComboBox::from_id_salt(("dep_target", task.id))
                .selected_text(RichText::new(selected_title).size(11.0))
                .width(140.0)
                .show_ui(ui, |ui| {
                    for (id, title) in all_tasks {
                        if *id == task.id || task.depends_on(*id) {
                            continue;
                        }
                        ui.selectable_value(&mut picker.predecessor, Some(*id), title);
                    }
                });

            egui::ComboBox::from_id_salt(("dep_kind", task.id))
                .selected_text(RichText::new(picker.kind.label()).size(11.0))
                .width(52.0)
                .show_ui(ui, |ui| {
                    for kind in DependencyKind::ALL {
                        ui.selectable_value(&mut picker.kind, kind, kind.describe());
                    }
                });

            if ui.button("Link").clicked() {
                if let Some(predecessor) = picker.predecessor {
                    action = EditorAction::AddDependency(Dependency {
                        predecessor,
                        kind: picker.kind,
                    });
                    picker.predecessor = None;
                }
            }
        });

        ui.ctx().data_mut(|data| data.insert_temp(picker_id, picker));
    });

    action
}
