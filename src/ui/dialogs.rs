use crate::app::WorkplanApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Render the "Add Task" dialog.
pub fn show_add_task_dialog(app: &mut WorkplanApp, ctx: &Context) {
    let mut should_close = false;
    Window::new(RichText::new("Add Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);

            egui::Grid::new("add_task_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Package").color(theme::TEXT_SECONDARY));
                    let wp_label = app
                        .project
                        .work_packages
                        .get(app.new_task_wp)
                        .map(|wp| format!("{} {}", wp.label, wp.title))
                        .unwrap_or_else(|| "—".to_string());
                    egui::ComboBox::from_id_salt("add_task_wp")
                        .selected_text(wp_label)
                        .show_ui(ui, |ui| {
                            for (i, wp) in app.project.work_packages.iter().enumerate() {
                                ui.selectable_value(
                                    &mut app.new_task_wp,
                                    i,
                                    format!("{} {}", wp.label, wp.title),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut app.new_task_title)
                            .hint_text("Task title...")
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    ui.end_row();

                    ui.label("");
                    ui.checkbox(&mut app.new_task_scheduled, "Scheduled");
                    ui.end_row();

                    if app.new_task_scheduled {
                        ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut app.new_task_start)
                                .id_salt("dlg_dp_start"),
                        );
                        ui.end_row();

                        ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut app.new_task_end)
                                .id_salt("dlg_dp_end"),
                        );
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    app.create_task_from_dialog();
                    should_close = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_task = false;
    }
}

/// Render the "Add Work Package" dialog.
pub fn show_add_work_package_dialog(app: &mut WorkplanApp, ctx: &Context) {
    let mut should_close = false;
    Window::new(RichText::new("Add Work Package").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                ui.add_sized(
                    [220.0, 24.0],
                    egui::TextEdit::singleline(&mut app.new_wp_title)
                        .hint_text("e.g. Dissemination & Exploitation")
                        .text_color(theme::TEXT_PRIMARY),
                );
            });
            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    app.create_work_package_from_dialog();
                    should_close = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_work_package = false;
    }
}

/// Render the schedule warnings dialog.
pub fn show_warnings_dialog(app: &mut WorkplanApp, ctx: &Context) {
    let mut should_close = false;
    Window::new(RichText::new("Schedule Warnings").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([460.0, 300.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(
                RichText::new(
                    "These constraints could not be satisfied. The affected tasks \
                     keep their last valid dates; editing can continue.",
                )
                .size(11.0)
                .color(theme::TEXT_SECONDARY),
            );
            ui.add_space(6.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                for warning in &app.warnings {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("⚠").color(theme::WARNING_COLOR));
                        ui.label(RichText::new(warning).size(11.5));
                    });
                }
            });
            ui.add_space(6.0);
            ui.separator();
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_warnings = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut WorkplanApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Workplan Editor").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Work-plan scheduling and precedence");
                ui.label("networks for grant proposals.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
