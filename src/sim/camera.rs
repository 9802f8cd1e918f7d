//! Camera follow with world clamping and smoothed zoom

use glam::Vec2;

use super::state::WorldConfig;
use crate::consts::{CAMERA_ZOOM, ZOOM_LERP};

pub struct Camera {
    /// World-space position of the viewport's top-left corner
    pub pos: Vec2,
    pub zoom: f32,
    zoom_target: f32,
    /// Viewport size in CSS pixels; updated by the host on resize
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            zoom: CAMERA_ZOOM,
            zoom_target: CAMERA_ZOOM,
            viewport,
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Request a zoom level; the camera eases toward it over following ticks
    pub fn set_zoom_target(&mut self, zoom: f32) {
        self.zoom_target = zoom;
    }

    /// Center on the target immediately, skipping the zoom ease (session start)
    pub fn snap_to(&mut self, target: Vec2, world: &WorldConfig) {
        self.zoom = self.zoom_target;
        self.pos = self.clamped_center(target, world);
    }

    /// Advance one tick: ease zoom toward its target, then center the camera
    /// on the player and clamp so the viewport never leaves the world
    pub fn update(&mut self, target: Vec2, world: &WorldConfig) {
        self.zoom += (self.zoom_target - self.zoom) * ZOOM_LERP;
        self.pos = self.clamped_center(target, world);
    }

    fn clamped_center(&self, target: Vec2, world: &WorldConfig) -> Vec2 {
        let centered = target - self.viewport / (2.0 * self.zoom);
        let max = Vec2::new(
            (world.width - self.viewport.x / self.zoom).max(0.0),
            (world.height - self.viewport.y / self.zoom).max(0.0),
        );
        centered.clamp(Vec2::ZERO, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldConfig {
        WorldConfig {
            width: 1200.0,
            height: 1200.0,
        }
    }

    #[test]
    fn test_camera_centers_player() {
        let mut camera = Camera::new(Vec2::new(700.0, 700.0));
        let w = world();
        camera.update(w.center(), &w);
        let visible_half = camera.viewport / (2.0 * camera.zoom);
        assert!((camera.pos + visible_half - w.center()).length() < 1e-3);
    }

    #[test]
    fn test_camera_clamps_to_world_edges() {
        let mut camera = Camera::new(Vec2::new(700.0, 700.0));
        let w = world();

        camera.update(Vec2::ZERO, &w);
        assert_eq!(camera.pos, Vec2::ZERO);

        camera.update(Vec2::new(w.width, w.height), &w);
        let max = Vec2::new(
            w.width - camera.viewport.x / camera.zoom,
            w.height - camera.viewport.y / camera.zoom,
        );
        assert!((camera.pos - max).length() < 1e-3);
    }

    #[test]
    fn test_zoom_eases_toward_target() {
        let mut camera = Camera::new(Vec2::new(700.0, 700.0));
        let w = world();
        camera.set_zoom_target(1.0);
        let mut last = camera.zoom;
        for _ in 0..60 {
            camera.update(w.center(), &w);
            assert!(camera.zoom >= last);
            last = camera.zoom;
        }
        assert!((camera.zoom - 1.0).abs() < 0.01);
    }
}
