use std::collections::HashSet;

use crate::model::Project;
use crate::ui::theme;
use chrono::{Datelike, Duration, NaiveDate};
use egui::{Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const WP_HEADER_HEIGHT: f32 = theme::WP_HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Granularity of the date header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineScale {
    Days,
    Weeks,
    Months,
}

/// Visible date range and zoom of the timeline.
#[derive(Debug, Clone)]
pub struct TimelineState {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub scale: TimelineScale,
    pub pixels_per_day: f32,
}

impl TimelineState {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            scale: TimelineScale::Weeks,
            pixels_per_day: 18.0,
        }
    }

    pub fn around_project(project: &Project) -> Self {
        let today = chrono::Local::now().date_naive();
        let (min, max) = project.date_range().unwrap_or((today, today));
        Self::new(min - Duration::days(7), max + Duration::days(30))
    }

    /// Refit the visible range to the project without losing zoom.
    pub fn refit(&mut self, project: &Project) {
        if let Some((min, max)) = project.date_range() {
            self.start = min - Duration::days(7);
            self.end = max + Duration::days(30);
        }
    }

    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        (date - self.start).num_days() as f32 * self.pixels_per_day
    }

    pub fn total_width(&self) -> f32 {
        self.date_to_x(self.end)
    }

    pub fn zoom_in(&mut self) {
        self.pixels_per_day = (self.pixels_per_day * 1.2).min(80.0);
    }

    pub fn zoom_out(&mut self) {
        self.pixels_per_day = (self.pixels_per_day / 1.2).max(2.0);
    }
}

#[derive(Debug, Clone)]
struct DragSnapshot {
    start: NaiveDate,
    end: NaiveDate,
    start_pointer_x: f32,
}

/// Result of interactions with the timeline.
#[derive(Default)]
pub struct TimelineInteraction {
    /// A task's dates changed; the schedule must be recalculated.
    pub changed: bool,
}

/// Render the timeline: one band per work package, one bar row per task,
/// milestone diamonds below the tasks. Bars can be dragged to move and
/// resized at either edge; critical tasks carry a red outline.
pub fn show_timeline(
    project: &mut Project,
    critical: &HashSet<Uuid>,
    state: &mut TimelineState,
    selected_task: &mut Option<Uuid>,
    ui: &mut Ui,
) -> TimelineInteraction {
    let mut interaction = TimelineInteraction::default();
    let available = ui.available_size();
    let chart_width = state.total_width().max(available.x);

    let row_count: usize = project
        .work_packages
        .iter()
        .map(|wp| wp.tasks.len() + wp.milestones.len())
        .sum();
    let band_count = project.work_packages.len();
    let chart_height = HEADER_HEIGHT
        + band_count as f32 * WP_HEADER_HEIGHT
        + row_count as f32 * (ROW_HEIGHT + ROW_PADDING)
        + 40.0;

    // Ctrl+scroll zooms
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            state.zoom_in();
        } else if scroll_delta.y < 0.0 {
            state.zoom_out();
        }
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_date_header(&painter, origin, state, chart_width);
            draw_today_line(&painter, origin, state, chart_height);

            let mut y = origin.y + HEADER_HEIGHT;
            for (wp_index, wp) in project.work_packages.iter_mut().enumerate() {
                let wp_color = theme::wp_color(wp_index);

                // Package band header
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(origin.x, y),
                        Vec2::new(chart_width, WP_HEADER_HEIGHT),
                    ),
                    0.0,
                    theme::BG_HEADER,
                );
                painter.line_segment(
                    [
                        Pos2::new(origin.x, y + WP_HEADER_HEIGHT),
                        Pos2::new(origin.x + chart_width, y + WP_HEADER_HEIGHT),
                    ],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
                painter.rect_filled(
                    Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(3.0, WP_HEADER_HEIGHT)),
                    0.0,
                    wp_color,
                );
                painter.text(
                    Pos2::new(origin.x + 10.0, y + WP_HEADER_HEIGHT / 2.0),
                    egui::Align2::LEFT_CENTER,
                    format!("{}  {}", wp.label, wp.title),
                    theme::font_header(),
                    theme::TEXT_PRIMARY,
                );
                y += WP_HEADER_HEIGHT;

                for task in &mut wp.tasks {
                    let row_top = y;
                    y += ROW_HEIGHT + ROW_PADDING;

                    painter.line_segment(
                        [
                            Pos2::new(origin.x, row_top + ROW_HEIGHT + ROW_PADDING),
                            Pos2::new(origin.x + chart_width, row_top + ROW_HEIGHT + ROW_PADDING),
                        ],
                        Stroke::new(0.5, theme::BORDER_SUBTLE),
                    );

                    let (Some(task_start), Some(task_end)) = (task.start, task.end) else {
                        painter.text(
                            Pos2::new(origin.x + 12.0, row_top + ROW_HEIGHT / 2.0),
                            egui::Align2::LEFT_CENTER,
                            format!("{} (unscheduled)", task.title),
                            theme::font_sub(),
                            theme::TEXT_DIM,
                        );
                        continue;
                    };

                    let is_selected = *selected_task == Some(task.id);
                    let is_critical = critical.contains(&task.id);
                    let bar_rect = draw_task_bar(
                        &painter,
                        origin,
                        state,
                        &task.title,
                        task_start,
                        task_end,
                        wp_color,
                        row_top + ROW_PADDING,
                        is_selected,
                        is_critical,
                    );

                    let bar_response = ui.interact(
                        bar_rect,
                        ui.make_persistent_id(("timeline-bar", task.id)),
                        Sense::click_and_drag(),
                    );
                    let left_handle = Rect::from_min_max(
                        Pos2::new(bar_rect.left() - HANDLE_WIDTH * 0.5, bar_rect.top()),
                        Pos2::new(bar_rect.left() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
                    );
                    let right_handle = Rect::from_min_max(
                        Pos2::new(bar_rect.right() - HANDLE_WIDTH * 0.5, bar_rect.top()),
                        Pos2::new(bar_rect.right() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
                    );
                    let left_response = ui.interact(
                        left_handle.expand(4.0),
                        ui.make_persistent_id(("timeline-resize-left", task.id)),
                        Sense::drag(),
                    );
                    let right_response = ui.interact(
                        right_handle.expand(4.0),
                        ui.make_persistent_id(("timeline-resize-right", task.id)),
                        Sense::drag(),
                    );

                    if bar_response.clicked() {
                        *selected_task = Some(task.id);
                        consumed_click = true;
                    }

                    for (response, mode) in [
                        (&bar_response, "move"),
                        (&left_response, "left"),
                        (&right_response, "right"),
                    ] {
                        if response.drag_started() {
                            let ptr_x =
                                response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
                            ui.ctx().data_mut(|data| {
                                data.insert_persisted(
                                    drag_id(task.id, mode),
                                    DragSnapshot {
                                        start: task_start,
                                        end: task_end,
                                        start_pointer_x: ptr_x,
                                    },
                                );
                            });
                            *selected_task = Some(task.id);
                            consumed_click = true;
                        }
                        if response.drag_stopped() {
                            ui.ctx().data_mut(|data| {
                                data.remove::<DragSnapshot>(drag_id(task.id, mode));
                            });
                        }
                    }

                    if left_response.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                        if let Some(snap) = drag_snapshot(ui, task.id, "left") {
                            let delta = drag_days(&left_response, &snap, state);
                            let new_start = snap.start + Duration::days(delta);
                            task.start = Some(new_start.min(snap.end));
                            task.end = Some(snap.end);
                            interaction.changed = true;
                        }
                    } else if right_response.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                        if let Some(snap) = drag_snapshot(ui, task.id, "right") {
                            let delta = drag_days(&right_response, &snap, state);
                            let new_end = snap.end + Duration::days(delta);
                            task.start = Some(snap.start);
                            task.end = Some(new_end.max(snap.start));
                            interaction.changed = true;
                        }
                    } else if bar_response.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                        if let Some(snap) = drag_snapshot(ui, task.id, "move") {
                            let delta = drag_days(&bar_response, &snap, state);
                            task.start = Some(snap.start + Duration::days(delta));
                            task.end = Some(snap.end + Duration::days(delta));
                            interaction.changed = true;
                        }
                    }

                    if bar_response.hovered()
                        || left_response.hovered()
                        || right_response.hovered()
                    {
                        egui::show_tooltip_at_pointer(
                            ui.ctx(),
                            ui.layer_id(),
                            Id::new(("timeline-tip", task.id)),
                            |ui| {
                                ui.strong(&task.title);
                                ui.label(format!("{} → {}", task_start, task_end));
                                ui.label(format!("{} days", task.duration_days()));
                                if is_critical {
                                    ui.colored_label(theme::CRITICAL, "On critical path");
                                }
                            },
                        );
                    }
                }

                for ms in &wp.milestones {
                    let row_top = y;
                    y += ROW_HEIGHT + ROW_PADDING;
                    draw_milestone(&painter, origin, state, &ms.description, ms.date, row_top);
                }
            }

            if response.clicked() && !consumed_click {
                *selected_task = None;
            }
        });

    interaction
}

fn drag_id(task_id: Uuid, mode: &'static str) -> Id {
    Id::new(("timeline-drag", task_id, mode))
}

fn drag_snapshot(ui: &Ui, task_id: Uuid, mode: &'static str) -> Option<DragSnapshot> {
    ui.ctx()
        .data_mut(|data| data.get_persisted::<DragSnapshot>(drag_id(task_id, mode)))
}

fn drag_days(response: &egui::Response, snap: &DragSnapshot, state: &TimelineState) -> i64 {
    let ptr_x = response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
    ((ptr_x - snap.start_pointer_x) / state.pixels_per_day).round() as i64
}

fn draw_date_header(painter: &egui::Painter, origin: Pos2, state: &TimelineState, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let grid_line = |x: f32| {
        painter.line_segment(
            [
                Pos2::new(x, origin.y + HEADER_HEIGHT),
                Pos2::new(x, origin.y + 2000.0),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    };

    let mut date = state.start;
    let end = state.end;
    match state.scale {
        TimelineScale::Days => {
            while date <= end {
                let x = origin.x + state.date_to_x(date);
                grid_line(x);
                if state.pixels_per_day >= 20.0 {
                    let is_weekend = date.weekday().num_days_from_monday() >= 5;
                    painter.text(
                        Pos2::new(x + 3.0, origin.y + 28.0),
                        egui::Align2::LEFT_CENTER,
                        date.format("%d").to_string(),
                        theme::font_sub(),
                        if is_weekend {
                            theme::TEXT_DIM
                        } else {
                            theme::TEXT_SECONDARY
                        },
                    );
                }
                if date.day() == 1 {
                    painter.text(
                        Pos2::new(x + 3.0, origin.y + 12.0),
                        egui::Align2::LEFT_CENTER,
                        date.format("%b %Y").to_string(),
                        theme::font_header(),
                        theme::TEXT_PRIMARY,
                    );
                }
                date += Duration::days(1);
            }
        }
        TimelineScale::Weeks => {
            let weekday = date.weekday().num_days_from_monday();
            date -= Duration::days(weekday as i64);
            while date <= end {
                let x = origin.x + state.date_to_x(date);
                grid_line(x);
                painter.text(
                    Pos2::new(x + 3.0, origin.y + 28.0),
                    egui::Align2::LEFT_CENTER,
                    date.format("W%V").to_string(),
                    theme::font_sub(),
                    theme::TEXT_SECONDARY,
                );
                if date.day() <= 7 {
                    painter.text(
                        Pos2::new(x + 3.0, origin.y + 12.0),
                        egui::Align2::LEFT_CENTER,
                        date.format("%b %Y").to_string(),
                        theme::font_header(),
                        theme::TEXT_PRIMARY,
                    );
                }
                date += Duration::days(7);
            }
        }
        TimelineScale::Months => {
            date = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
            while date <= end {
                let x = origin.x + state.date_to_x(date);
                grid_line(x);
                painter.text(
                    Pos2::new(x + 5.0, origin.y + 18.0),
                    egui::Align2::LEFT_CENTER,
                    date.format("%b %Y").to_string(),
                    theme::font_header(),
                    theme::TEXT_PRIMARY,
                );
                let (y, m) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                date = NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date + Duration::days(30));
            }
        }
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, state: &TimelineState, height: f32) {
    let today = chrono::Local::now().date_naive();
    let x = origin.x + state.date_to_x(today);
    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );
    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    state: &TimelineState,
    title: &str,
    start: NaiveDate,
    end: NaiveDate,
    color: Color32,
    y: f32,
    is_selected: bool,
    is_critical: bool,
) -> Rect {
    let x_start = origin.x + state.date_to_x(start);
    let x_end = origin.x + state.date_to_x(end);
    let bar_width = (x_end - x_start).max(6.0);
    let inset = theme::BAR_INSET;

    let bar_rect = Rect::from_min_size(
        Pos2::new(x_start, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    let shadow_rect = bar_rect.translate(Vec2::new(1.0, 2.0));
    painter.rect_filled(shadow_rect, rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color);

    // Lighter top highlight
    let highlight_rect = Rect::from_min_size(
        bar_rect.min,
        Vec2::new(bar_width, (bar_rect.height() * 0.45).max(4.0)),
    );
    painter.rect_filled(
        highlight_rect,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    if is_critical {
        painter.rect_stroke(
            bar_rect.expand(1.0),
            Rounding::same(theme::BAR_ROUNDING + 1.0),
            Stroke::new(2.0, theme::CRITICAL),
        );
    }
    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(2.5),
            Rounding::same(theme::BAR_ROUNDING + 2.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
        // Resize handle notches at both edges
        for x in [bar_rect.left() + 2.0, bar_rect.right() - 2.0] {
            painter.line_segment(
                [
                    Pos2::new(x, bar_rect.top() + 5.0),
                    Pos2::new(x, bar_rect.bottom() - 5.0),
                ],
                Stroke::new(2.0, theme::HANDLE_COLOR),
            );
        }
    }

    if bar_width > 30.0 {
        let galley = painter.layout_no_wrap(title.to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }

    bar_rect
}

fn draw_milestone(
    painter: &egui::Painter,
    origin: Pos2,
    state: &TimelineState,
    description: &str,
    date: NaiveDate,
    y: f32,
) {
    let x = origin.x + state.date_to_x(date);
    let center = Pos2::new(x, y + ROW_HEIGHT / 2.0);
    let size = (ROW_HEIGHT / 2.0 - 3.0).max(6.0);

    let points = vec![
        Pos2::new(center.x, center.y - size),
        Pos2::new(center.x + size, center.y),
        Pos2::new(center.x, center.y + size),
        Pos2::new(center.x - size, center.y),
    ];
    painter.add(egui::Shape::convex_polygon(
        points,
        theme::MILESTONE_COLOR,
        Stroke::NONE,
    ));
    painter.text(
        Pos2::new(x + size + 6.0, center.y),
        egui::Align2::LEFT_CENTER,
        description,
        theme::font_bar(),
        theme::TEXT_SECONDARY,
    );
}
