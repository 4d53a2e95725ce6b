use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{self, NetworkViewport, TaskGraph};
use crate::io::settings::AppSettings;
use crate::model::task::{Dependency, DependencyKind, Task};
use crate::model::{Milestone, Project, WorkPackage};
use crate::ui;
use crate::ui::plan_panel::PlanPanelAction;
use crate::ui::task_editor::EditorAction;
use crate::ui::timeline_view::{TimelineInteraction, TimelineState};

/// Which central view is active. Persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Timeline,
    Network,
}

/// Main application state.
pub struct WorkplanApp {
    pub project: Project,
    pub file_path: Option<PathBuf>,
    pub selected_task: Option<Uuid>,
    pub view: ViewMode,
    pub timeline: TimelineState,
    pub network_viewport: NetworkViewport,

    /// Tasks on the critical path, refreshed with every recalculation.
    pub critical_tasks: HashSet<Uuid>,
    /// Warnings from the last schedule recalculation. Advisory only.
    pub warnings: Vec<String>,

    // Dialog state
    pub show_add_task: bool,
    pub show_add_work_package: bool,
    pub show_about: bool,
    pub show_warnings: bool,
    pub new_task_wp: usize,
    pub new_task_title: String,
    pub new_task_scheduled: bool,
    pub new_task_start: NaiveDate,
    pub new_task_end: NaiveDate,
    pub new_wp_title: String,

    pub status_message: String,
    settings: AppSettings,
}

impl WorkplanApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings = AppSettings::load();
        let (project, file_path) = match settings
            .last_file
            .as_deref()
            .map(|path| crate::io::load_project(path).map(|p| (p, path.to_path_buf())))
        {
            Some(Ok((project, path))) => (project, Some(path)),
            _ => (Self::sample_project(), None),
        };

        let today = chrono::Local::now().date_naive();
        let mut app = Self {
            timeline: TimelineState::around_project(&project),
            project,
            file_path,
            selected_task: None,
            view: settings.view,
            network_viewport: NetworkViewport::default(),
            critical_tasks: HashSet::new(),
            warnings: Vec::new(),
            show_add_task: false,
            show_add_work_package: false,
            show_about: false,
            show_warnings: false,
            new_task_wp: 0,
            new_task_title: String::new(),
            new_task_scheduled: true,
            new_task_start: today,
            new_task_end: today + Duration::days(7),
            new_wp_title: String::new(),
            status_message: "Ready".to_string(),
            settings,
        };
        app.refresh_schedule();
        app
    }

    /// Generate a small proposal work plan for first launch.
    fn sample_project() -> Project {
        let today = chrono::Local::now().date_naive();
        let day = |offset: i64| today + Duration::days(offset);
        let mut project = Project::new("Sample Proposal");

        // ── WP1: Project Management ─────────────────────────────────
        let mut wp1 = WorkPackage::new("Project Management");
        let kickoff = Task::new("Kickoff & consortium agreement", day(0), day(14));
        let mut coordination = Task::new("Coordination & reporting", day(0), day(180));
        coordination.dependencies.push(Dependency {
            predecessor: kickoff.id,
            kind: DependencyKind::StartToStart,
        });
        wp1.milestones.push(Milestone::new("Project start", day(0)));
        let kickoff_id = kickoff.id;
        wp1.tasks = vec![kickoff, coordination];

        // ── WP2: Requirements & Design ──────────────────────────────
        let mut wp2 = WorkPackage::new("Requirements & Design");
        let mut requirements = Task::new("User requirements survey", day(15), day(45));
        requirements.dependencies.push(Dependency {
            predecessor: kickoff_id,
            kind: DependencyKind::FinishToStart,
        });
        let mut architecture = Task::new("System architecture", day(46), day(75));
        architecture.dependencies.push(Dependency {
            predecessor: requirements.id,
            kind: DependencyKind::FinishToStart,
        });
        let requirements_id = requirements.id;
        let architecture_id = architecture.id;
        wp2.tasks = vec![requirements, architecture];

        // ── WP3: Pilot Implementation ───────────────────────────────
        let mut wp3 = WorkPackage::new("Pilot Implementation");
        let mut prototype = Task::new("Prototype development", day(60), day(130));
        prototype.dependencies.push(Dependency {
            predecessor: architecture_id,
            kind: DependencyKind::StartToStart,
        });
        let mut evaluation = Task::new("Pilot evaluation", day(131), day(165));
        evaluation.dependencies.push(Dependency {
            predecessor: prototype.id,
            kind: DependencyKind::FinishToStart,
        });
        wp3.milestones.push(Milestone::new("Pilot ready", day(130)));
        let evaluation_id = evaluation.id;
        wp3.tasks = vec![prototype, evaluation];

        // ── WP4: Dissemination ──────────────────────────────────────
        let mut wp4 = WorkPackage::new("Dissemination & Exploitation");
        let mut dissemination = Task::new("Dissemination activities", day(30), day(175));
        dissemination.dependencies.push(Dependency {
            predecessor: requirements_id,
            kind: DependencyKind::StartToStart,
        });
        let mut final_report = Task::new("Final report", day(166), day(180));
        final_report.dependencies.push(Dependency {
            predecessor: evaluation_id,
            kind: DependencyKind::FinishToStart,
        });
        wp4.deliverables
            .push(crate::model::Deliverable::new("Final public report", Some(day(180))));
        wp4.tasks = vec![dissemination, final_report];

        project.add_work_package(wp1);
        project.add_work_package(wp2);
        project.add_work_package(wp3);
        project.add_work_package(wp4);
        project
    }

    // --- Scheduling ---

    /// Recalculate the schedule and the critical path. Called after every
    /// edit that can affect dates or dependencies, so each edit always sees
    /// the settled result of the previous one.
    pub fn refresh_schedule(&mut self) {
        self.warnings = engine::schedule::recalculate(&mut self.project);

        let mut graph = TaskGraph::build(&self.project);
        engine::levels::assign_levels(&mut graph);
        let path = engine::critical::mark_critical(&mut graph);
        self.critical_tasks = path.nodes;

        if !self.warnings.is_empty() {
            self.status_message = format!(
                "Schedule updated with {} warning(s)",
                self.warnings.len()
            );
        }
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.project = Project::default();
        self.file_path = None;
        self.selected_task = None;
        self.timeline = TimelineState::around_project(&self.project);
        self.warnings.clear();
        self.critical_tasks.clear();
        self.status_message = "New proposal created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Work Plan", &["json"])
            .pick_file()
        {
            match crate::io::load_project(&path) {
                Ok(project) => {
                    self.project = project;
                    self.file_path = Some(path.clone());
                    self.selected_task = None;
                    self.timeline.refit(&self.project);
                    self.refresh_schedule();
                    self.settings.last_file = Some(path);
                    self.settings.save();
                    self.status_message = "Proposal loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.project.touch();
            match crate::io::save_project(&self.project, &path) {
                Ok(()) => self.status_message = "Proposal saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_project_as();
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Work Plan", &["json"])
            .set_file_name(format!("{}.workplan.json", self.project.title))
            .save_file()
        {
            self.file_path = Some(path.clone());
            self.project.touch();
            match crate::io::save_project(&self.project, &path) {
                Ok(()) => {
                    self.settings.last_file = Some(path);
                    self.settings.save();
                    self.status_message = "Proposal saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.project.task_count() == 0 {
            self.status_message = "Nothing to export — the work plan has no tasks".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.project.title))
            .save_file()
        {
            match crate::io::csv_export::export_csv(&self.project, &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    // --- Work plan edits ---

    pub fn create_task_from_dialog(&mut self) {
        if self.project.work_packages.is_empty() {
            self.status_message = "Add a work package first".to_string();
            return;
        }
        let wp_index = self.new_task_wp.min(self.project.work_packages.len() - 1);
        let title = if self.new_task_title.is_empty() {
            "New Task".to_string()
        } else {
            self.new_task_title.clone()
        };
        let task = if self.new_task_scheduled {
            let start = self.new_task_start;
            let end = self.new_task_end.max(start);
            Task::new(title, start, end)
        } else {
            Task::unscheduled(title)
        };
        self.selected_task = Some(task.id);
        self.project.work_packages[wp_index].tasks.push(task);
        self.project.touch();
        self.refresh_schedule();
        self.reset_dialog_fields();
        self.status_message = "Task added".to_string();
    }

    pub fn create_work_package_from_dialog(&mut self) {
        let title = if self.new_wp_title.is_empty() {
            "New Work Package".to_string()
        } else {
            self.new_wp_title.clone()
        };
        self.project.add_work_package(WorkPackage::new(title));
        self.project.touch();
        self.new_wp_title.clear();
        self.status_message = "Work package added".to_string();
    }

    pub fn delete_task(&mut self, id: Uuid) {
        self.project.remove_task(id);
        if self.selected_task == Some(id) {
            self.selected_task = None;
        }
        self.project.touch();
        self.refresh_schedule();
        self.status_message = "Task deleted".to_string();
    }

    pub fn delete_work_package(&mut self, index: usize) {
        let Some(wp) = self.project.work_packages.get(index) else {
            return;
        };
        if !wp.tasks.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Delete Work Package")
                .set_description(format!(
                    "Delete '{} {}' and its {} task(s)?",
                    wp.label,
                    wp.title,
                    wp.tasks.len()
                ))
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }
        if let Some(sel) = self.selected_task {
            if self.project.work_package_of(sel) == Some(index) {
                self.selected_task = None;
            }
        }
        self.project.remove_work_package(index);
        self.project.touch();
        self.refresh_schedule();
        self.status_message = "Work package deleted".to_string();
    }

    fn reset_dialog_fields(&mut self) {
        let today = chrono::Local::now().date_naive();
        self.new_task_title = String::new();
        self.new_task_scheduled = true;
        self.new_task_start = today;
        self.new_task_end = today + Duration::days(7);
    }
}

impl eframe::App for WorkplanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_project();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });
        if self.view != self.settings.view {
            self.settings.view = self.view;
            self.settings.save();
        }

        // Bottom panel: status bar
        let mut open_warnings = false;
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    if !self.warnings.is_empty() {
                        let warn_btn = ui.add(
                            egui::Button::new(
                                egui::RichText::new(format!("⚠ {}", self.warnings.len()))
                                    .size(10.5)
                                    .color(ui::theme::WARNING_COLOR),
                            )
                            .frame(false),
                        );
                        if warn_btn.on_hover_text("Show schedule warnings").clicked() {
                            open_warnings = true;
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {}  ·  Critical: {}",
                                self.project.task_count(),
                                self.critical_tasks.len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });
        if open_warnings {
            self.show_warnings = true;
        }

        // Left panel: task editor + work plan tree
        let mut panel_action = PlanPanelAction::None;
        let mut editor_action = EditorAction::None;
        egui::SidePanel::left("plan_panel")
            .default_width(300.0)
            .min_width(240.0)
            .max_width(480.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if let Some(sel_id) = self.selected_task {
                    let all_tasks: Vec<(Uuid, String)> = self
                        .project
                        .all_tasks()
                        .map(|t| (t.id, t.title.clone()))
                        .collect();
                    if let Some(task) = self.project.find_task_mut(sel_id) {
                        editor_action = ui::task_editor::show_task_editor(task, &all_tasks, ui);
                    }
                    ui.add_space(4.0);
                    ui.separator();
                    ui.add_space(2.0);
                }

                panel_action =
                    ui::plan_panel::show_plan_panel(&self.project, self.selected_task, ui);
            });

        match editor_action {
            EditorAction::Changed => {
                self.project.touch();
                self.status_message = "Task updated".to_string();
            }
            EditorAction::ScheduleChanged => {
                self.project.touch();
                self.refresh_schedule();
                self.status_message = "Task rescheduled".to_string();
            }
            EditorAction::RemoveDependency(predecessor) => {
                if let Some(sel) = self.selected_task {
                    if let Some(task) = self.project.find_task_mut(sel) {
                        task.dependencies.retain(|d| d.predecessor != predecessor);
                    }
                    self.project.touch();
                    self.refresh_schedule();
                    self.status_message = "Dependency removed".to_string();
                }
            }
            EditorAction::AddDependency(dep) => {
                if let Some(sel) = self.selected_task {
                    let duplicate = self
                        .project
                        .find_task(sel)
                        .map(|t| t.depends_on(dep.predecessor))
                        .unwrap_or(true);
                    if !duplicate {
                        let pred_title = self
                            .project
                            .find_task(dep.predecessor)
                            .map(|t| t.title.clone())
                            .unwrap_or_default();
                        if let Some(task) = self.project.find_task_mut(sel) {
                            task.dependencies.push(dep);
                        }
                        self.project.touch();
                        self.refresh_schedule();
                        self.status_message = format!("Linked after '{}'", pred_title);
                    }
                }
            }
            EditorAction::None => {}
        }

        match panel_action {
            PlanPanelAction::Select(id) => {
                self.selected_task = Some(id);
            }
            PlanPanelAction::DeleteTask(id) => {
                self.delete_task(id);
            }
            PlanPanelAction::AddTask(wp_index) => {
                self.new_task_wp = wp_index;
                self.show_add_task = true;
            }
            PlanPanelAction::AddWorkPackage => {
                self.show_add_work_package = true;
            }
            PlanPanelAction::DeleteWorkPackage(index) => {
                self.delete_work_package(index);
            }
            PlanPanelAction::MoveWorkPackage(index, delta) => {
                self.project.move_work_package(index, delta);
                self.project.touch();
            }
            PlanPanelAction::None => {}
        }

        // Central panel: timeline or precedence network
        let frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| match self.view {
            ViewMode::Timeline => {
                let TimelineInteraction { changed } = ui::timeline_view::show_timeline(
                    &mut self.project,
                    &self.critical_tasks,
                    &mut self.timeline,
                    &mut self.selected_task,
                    ui,
                );
                if changed {
                    self.project.touch();
                    self.refresh_schedule();
                    if let Some(task) = self.selected_task.and_then(|id| self.project.find_task(id))
                    {
                        if let (Some(start), Some(end)) = (task.start, task.end) {
                            self.status_message =
                                format!("Updated '{}' ({} → {})", task.title, start, end);
                        }
                    }
                }
            }
            ViewMode::Network => {
                ui::network_view::show_network(
                    &self.project,
                    &mut self.selected_task,
                    &mut self.network_viewport,
                    ui,
                );
            }
        });

        // Dialogs
        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_add_work_package {
            ui::dialogs::show_add_work_package_dialog(self, ctx);
        }
        if self.show_warnings {
            ui::dialogs::show_warnings_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
