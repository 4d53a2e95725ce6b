use crate::app::{ViewMode, WorkplanApp};
use crate::ui::theme;
use crate::ui::timeline_view::TimelineScale;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

const PORTAL_URL: &str = "https://ec.europa.eu/info/funding-tenders/opportunities/portal/";

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut WorkplanApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_header()), |ui| {
            if ui.button(format!("{}  New Proposal", icons::FILE_PLUS)).clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.open_project();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save_project();
                ui.close_menu();
            }
            if ui.button(format!("{}  Save As...", icons::FLOPPY_DISK_BACK)).clicked() {
                app.save_project_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Export CSV...", icons::EXPORT)).clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_header()), |ui| {
            if ui
                .radio_value(&mut app.view, ViewMode::Timeline, "Timeline")
                .clicked()
            {
                ui.close_menu();
            }
            if ui
                .radio_value(&mut app.view, ViewMode::Network, "Precedence Network")
                .clicked()
            {
                ui.close_menu();
            }
            ui.separator();
            match app.view {
                ViewMode::Timeline => {
                    if ui.button(format!("{}  Zoom In        Ctrl+Scroll ↑", icons::MAGNIFYING_GLASS_PLUS)).clicked() {
                        app.timeline.zoom_in();
                        ui.close_menu();
                    }
                    if ui.button(format!("{}  Zoom Out      Ctrl+Scroll ↓", icons::MAGNIFYING_GLASS_MINUS)).clicked() {
                        app.timeline.zoom_out();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.label(RichText::new("Timeline Scale").small().weak());
                    for (scale, label) in [
                        (TimelineScale::Days, "Days"),
                        (TimelineScale::Weeks, "Weeks"),
                        (TimelineScale::Months, "Months"),
                    ] {
                        if ui.radio_value(&mut app.timeline.scale, scale, label).clicked() {
                            ui.close_menu();
                        }
                    }
                }
                ViewMode::Network => {
                    if ui.button(format!("{}  Zoom In        Ctrl+Scroll ↑", icons::MAGNIFYING_GLASS_PLUS)).clicked() {
                        app.network_viewport.zoom_in();
                        ui.close_menu();
                    }
                    if ui.button(format!("{}  Zoom Out      Ctrl+Scroll ↓", icons::MAGNIFYING_GLASS_MINUS)).clicked() {
                        app.network_viewport.zoom_out();
                        ui.close_menu();
                    }
                    if ui.button(format!("{}  Actual Size (100%)", icons::FRAME_CORNERS)).clicked() {
                        app.network_viewport.reset();
                        ui.close_menu();
                    }
                    if ui.button(format!("{}  Fit to Window", icons::ARROWS_IN)).clicked() {
                        app.network_viewport.fit();
                        ui.close_menu();
                    }
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_header()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
            if ui.button("Funding & Tenders Portal").clicked() {
                let _ = open::that(PORTAL_URL);
                ui.close_menu();
            }
        });

        // Right-aligned project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.project.title, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
