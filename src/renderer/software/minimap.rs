//! Top-down minimap overlay.
//!
//! Drawn last, straight into the frame's top-left corner at
//! `minimap_scale`. Besides the scene geometry and the camera FOV wedge
//! it can visualize the marcher itself: the per-column ray paths
//! (`debug_rays`) and the per-step SDF query circles (`debug_sdf`).

use glam::Vec2;

use crate::{
    renderer::software::Software,
    renderer::{BLACK, GREEN, WHITE, rgb},
    world::camera::Camera,
    world::primitive::Primitive,
    world::scene::Scene,
};

const FOV_WEDGE_LENGTH: f32 = 50.0;

impl Software {
    pub(crate) fn draw_minimap(&mut self, scene: &Scene, camera: &Camera) {
        let scale = camera.options().minimap_scale;
        if scale <= 0.0 {
            return;
        }

        let map_w = (scene.width() * scale) as i32;
        let map_h = (scene.height() * scale) as i32;
        self.fill_rect(0, 0, map_w, map_h, BLACK);

        for object in scene.objects() {
            match object {
                Primitive::Box(b) => {
                    self.fill_rect(
                        (b.pos.x * scale) as i32,
                        (b.pos.y * scale) as i32,
                        (b.size.x * scale) as i32,
                        (b.size.y * scale) as i32,
                        b.color,
                    );
                }
                Primitive::Circle(c) => {
                    self.draw_circle(
                        (c.center.x * scale) as i32,
                        (c.center.y * scale) as i32,
                        (c.radius * scale) as i32,
                        c.color,
                    );
                }
                Primitive::Wedge(w) => {
                    for (v0, v1) in [(w.a, w.b), (w.b, w.c), (w.c, w.a)] {
                        self.scaled_line(v0, v1, scale, w.color);
                    }
                }
            }
        }

        if camera.options().debug_rays {
            self.draw_debug_rays(scene, camera, scale);
        }
        if camera.options().debug_sdf {
            // snapshot; draw_circle needs &mut self
            let steps = std::mem::take(&mut self.debug_steps);
            let dim_green = rgb(0, 96, 0);
            for &(point, dist) in &steps {
                self.draw_circle(
                    (point.x * scale) as i32,
                    (point.y * scale) as i32,
                    (dist * scale) as i32,
                    dim_green,
                );
            }
            self.debug_steps = steps;
        }

        // camera dot and FOV wedge
        let pos = camera.pos();
        let dir = camera.dir().normalize_or_zero();
        let plane = camera.plane();
        for edge in [dir + plane, dir - plane] {
            self.scaled_line(pos, pos + edge * FOV_WEDGE_LENGTH, scale, GREEN);
        }
        self.draw_circle((pos.x * scale) as i32, (pos.y * scale) as i32, 3, WHITE);

        // border
        self.draw_line(0, 0, map_w, 0, GREEN);
        self.draw_line(map_w, 0, map_w, map_h, GREEN);
        self.draw_line(map_w, map_h, 0, map_h, GREEN);
        self.draw_line(0, map_h, 0, 0, GREEN);
    }

    fn draw_debug_rays(&mut self, scene: &Scene, camera: &Camera, scale: f32) {
        let (vw, _) = camera.viewport();
        let pos = camera.pos();
        let dir = camera.dir();
        let plane = camera.plane();
        let dim_red = rgb(96, 0, 0);

        for col in 0..vw.min(self.collisions.len()) {
            let camera_x = 2.0 * col as f32 / vw as f32 - 1.0;
            let ray = (dir + plane * camera_x).normalize_or_zero();
            let distance = self.collisions[col].distance;
            let reach = if distance.is_finite() {
                distance
            } else {
                scene.width()
            };
            self.scaled_line(pos, pos + ray * reach, scale, dim_red);
        }
    }

    fn scaled_line(&mut self, from: Vec2, to: Vec2, scale: f32, color: crate::renderer::Rgba) {
        self.draw_line(
            (from.x * scale) as i32,
            (from.y * scale) as i32,
            (to.x * scale) as i32,
            (to.y * scale) as i32,
            color,
        );
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RendererExt;
    use crate::world::camera::CameraOptions;
    use crate::world::level::LevelData;
    use crate::world::texture::TextureBank;

    fn fixture(opts: CameraOptions) -> (Scene, Camera, TextureBank) {
        let bank = TextureBank::with_builtin_textures(16);
        let level = LevelData::from_codes(
            &[
                &[11, 11, 11, 11],
                &[11, 0, 2, 11],
                &[11, 0, 30, 11],
                &[11, 11, 11, 11],
            ],
            Vec::new(),
        )
        .unwrap();
        let scene = Scene::new(0, &level, 400.0, 400.0, &bank).unwrap();
        let camera = Camera::new(&scene, opts);
        (scene, camera, bank)
    }

    #[test]
    fn minimap_draws_camera_dot() {
        let (scene, mut camera, bank) = fixture(CameraOptions {
            show_minimap: true,
            show_textures: false,
            ..CameraOptions::default()
        });
        let mut sw = Software::default();
        sw.render_frame(&scene, &mut camera, &bank, |_, _, _| {});

        let scale = camera.options().minimap_scale;
        let cx = (camera.pos().x * scale) as usize;
        let cy = (camera.pos().y * scale) as usize;
        assert_eq!(sw.scratch[cy * sw.width + cx + 3], WHITE);
    }

    #[test]
    fn debug_overlays_do_not_disturb_step_log() {
        let (scene, mut camera, bank) = fixture(CameraOptions {
            show_minimap: true,
            minimap_scale: 0.25,
            debug_rays: true,
            debug_sdf: true,
            ..CameraOptions::default()
        });
        let mut sw = Software::default();
        sw.render_frame(&scene, &mut camera, &bank, |_, _, _| {});
        // the sdf circle pass borrows the log and must hand it back
        assert!(!sw.debug_steps.is_empty());
    }

    #[test]
    fn minimap_off_leaves_corner_untouched() {
        let (scene, mut camera, bank) = fixture(CameraOptions {
            show_minimap: false,
            show_textures: false,
            debug_rays: false,
            ..CameraOptions::default()
        });
        let mut sw = Software::default();
        sw.render_frame(&scene, &mut camera, &bank, |_, _, _| {});
        // top-left pixel is ceiling fill, not the minimap border
        assert_ne!(sw.scratch[0], GREEN);
    }
}
