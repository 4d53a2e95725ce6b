use egui::Vec2;

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 2.0;
const ZOOM_STEP: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomMode {
    /// Scale recomputed automatically from container and diagram size.
    Fit,
    /// User-driven zoom; automatic fitting suspended.
    Manual,
}

/// Uniform scale factor for the precedence diagram.
#[derive(Debug, Clone)]
pub struct NetworkViewport {
    pub scale: f32,
    pub mode: ZoomMode,
}

impl Default for NetworkViewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            mode: ZoomMode::Fit,
        }
    }
}

/// The scale at which `diagram` fits inside `available` without distortion
/// or upscaling past native size.
pub fn fit_scale(available: Vec2, diagram: Vec2) -> f32 {
    // A zero-size container can happen on the first frame before the panel
    // has a measured size; treat it like a degenerate diagram.
    if available.x <= 0.0 || available.y <= 0.0 || diagram.x <= 0.0 || diagram.y <= 0.0 {
        return 1.0;
    }
    (available.x / diagram.x)
        .min(available.y / diagram.y)
        .min(1.0)
}

impl NetworkViewport {
    /// Recompute the fit scale. No-op while the user is zooming manually.
    pub fn update_fit(&mut self, available: Vec2, diagram: Vec2) {
        if self.mode == ZoomMode::Fit {
            self.scale = fit_scale(available, diagram);
        }
    }

    pub fn zoom_in(&mut self) {
        self.mode = ZoomMode::Manual;
        self.scale = (self.scale * ZOOM_STEP).min(MAX_SCALE);
    }

    pub fn zoom_out(&mut self) {
        self.mode = ZoomMode::Manual;
        self.scale = (self.scale / ZOOM_STEP).max(MIN_SCALE);
    }

    pub fn reset(&mut self) {
        self.mode = ZoomMode::Manual;
        self.scale = 1.0;
    }

    /// Return to automatic fitting.
    pub fn fit(&mut self) {
        self.mode = ZoomMode::Fit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_never_upscales_past_native() {
        let scale = fit_scale(Vec2::new(2000.0, 2000.0), Vec2::new(400.0, 300.0));
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn fit_shrinks_to_the_tighter_axis() {
        let scale = fit_scale(Vec2::new(500.0, 1000.0), Vec2::new(1000.0, 1000.0));
        assert_eq!(scale, 0.5);
    }

    #[test]
    fn fit_is_positive_for_non_degenerate_diagrams() {
        let scale = fit_scale(Vec2::new(10.0, 10.0), Vec2::new(10000.0, 10000.0));
        assert!(scale > 0.0 && scale <= 1.0);
    }

    #[test]
    fn degenerate_diagram_falls_back_to_native() {
        assert_eq!(fit_scale(Vec2::new(800.0, 600.0), Vec2::ZERO), 1.0);
    }

    #[test]
    fn unmeasured_container_falls_back_to_native() {
        // First-frame containers can report zero size; the scale must stay
        // positive rather than collapsing the diagram.
        assert_eq!(fit_scale(Vec2::ZERO, Vec2::new(400.0, 300.0)), 1.0);
        assert_eq!(fit_scale(Vec2::new(0.0, 600.0), Vec2::new(400.0, 300.0)), 1.0);
    }

    #[test]
    fn manual_zoom_suspends_fitting_until_fit_is_requested() {
        let mut viewport = NetworkViewport::default();
        viewport.update_fit(Vec2::new(500.0, 500.0), Vec2::new(1000.0, 1000.0));
        assert_eq!(viewport.scale, 0.5);

        viewport.zoom_in();
        let manual = viewport.scale;
        viewport.update_fit(Vec2::new(500.0, 500.0), Vec2::new(2000.0, 2000.0));
        assert_eq!(viewport.scale, manual);

        viewport.fit();
        viewport.update_fit(Vec2::new(500.0, 500.0), Vec2::new(2000.0, 2000.0));
        assert_eq!(viewport.scale, 0.25);
    }

    #[test]
    fn manual_zoom_is_clamped() {
        let mut viewport = NetworkViewport::default();
        for _ in 0..50 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.scale, MAX_SCALE);
        for _ in 0..50 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.scale, MIN_SCALE);
        viewport.reset();
        assert_eq!(viewport.scale, 1.0);
    }
}
