//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer over SDF ray marching
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * One marched ray per screen column feeds the wall rasterizer; the
//!   floor/ceiling caster and sprite compositor share the same buffer.
//! * All per-frame scratch (collision records, debug step log) lives here
//!   and is reused across frames — nothing allocates in the hot loops.
//! ---------------------------------------------------------------------------

use glam::Vec2;

use crate::{
    renderer::{Renderer, Rgba},
    world::camera::Camera,
    world::scene::Scene,
    world::texture::TextureBank,
};

pub use marcher::RayHit;

/// SDF-marching column renderer.
pub struct Software {
    pub(crate) scratch: Vec<Rgba>,
    /// One collision record per viewport column, rebuilt every frame.
    pub(crate) collisions: Vec<RayHit>,
    /// `(query point, nearest distance)` per marching step, recorded only
    /// when `debug_sdf` is on; consumed by the minimap overlay.
    pub(crate) debug_steps: Vec<(Vec2, f32)>,

    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            collisions: Vec::new(),
            debug_steps: Vec::new(),
            width: 0,
            height: 0,
        }
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }

        /* dark-grey clear */
        self.scratch.fill(0xFF_202020);

        self.collisions.clear();
        self.debug_steps.clear();
    }

    fn draw_scene(&mut self, scene: &Scene, camera: &mut Camera, bank: &TextureBank) {
        camera.update_projection();
        camera.sort_sprites(scene.sprites());
        camera.reset_z_buffer();

        self.march(scene, camera);

        self.draw_planes(scene, camera, bank);
        self.draw_walls(scene, camera, bank);
        if camera.options().show_sprites {
            self.draw_sprites(scene, camera, bank);
        }
        if camera.options().show_minimap {
            self.draw_minimap(scene, camera);
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── raster helpers ─────────────────────────────*/
impl Software {
    /// Collision records of the last marched frame, one per column.
    pub fn collisions(&self) -> &[RayHit] {
        &self.collisions
    }

    #[inline]
    pub(crate) fn plot(&mut self, x: i32, y: i32, col: Rgba) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.scratch[y as usize * self.width + x as usize] = col;
        }
    }

    /// Integer Bresenham line, clipped per pixel.
    pub(crate) fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: Rgba) {
        let mut x0 = x0;
        let mut y0 = y0;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x0, y0, col);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Midpoint circle outline.
    pub(crate) fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, col: Rgba) {
        if r <= 0 {
            self.plot(cx, cy, col);
            return;
        }
        let mut x = r;
        let mut y = 0;
        let mut err = 1 - r;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.plot(px, py, col);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    pub(crate) fn fill_rect(&mut self, x0: i32, y0: i32, w: i32, h: i32, col: Rgba) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                self.plot(x, y, col);
            }
        }
    }
}

pub mod marcher;
pub mod minimap;
pub mod planes;
pub mod sprites;
pub mod walls;

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RendererExt, rgb};
    use crate::world::camera::{CameraOptions, Shading};
    use crate::world::level::LevelData;

    fn fixture() -> (Scene, Camera, TextureBank) {
        let bank = TextureBank::with_builtin_textures(16);
        let level = LevelData::from_codes(
            &[
                &[0, 0, 0, 0, 0, 0, 0],
                &[0, 0, 0, 11, 0, 0, 0],
                &[0, 0, 0, 0, 0, 0, 0],
                &[0, 0, 0, 0, 0, 0, 0],
                &[0, 0, 0, 0, 0, 0, 0],
                &[0, 0, 0, 0, 0, 0, 0],
            ],
            Vec::new(),
        )
        .unwrap();
        let mut scene = Scene::new(0, &level, 700.0, 600.0, &bank).unwrap();
        scene.set_surface_textures(2, 3, 1, &bank).unwrap();
        let camera = Camera::new(&scene, CameraOptions::default());
        (scene, camera, bank)
    }

    #[test]
    fn frame_pipeline_produces_wall_and_depth() {
        let (scene, mut camera, bank) = fixture();
        let mut sw = Software::default();

        let mut submitted = (0usize, 0usize);
        sw.render_frame(&scene, &mut camera, &bank, |fb, w, h| {
            submitted = (w, h);
            assert_eq!(fb.len(), w * h);
        });
        assert_eq!(submitted, (700, 600));

        // center column looks straight at the box 100 units away
        let (vw, vh) = camera.viewport();
        let z = camera.z_buffer()[vw / 2];
        assert!((z - 100.0).abs() < 1.0, "center depth was {z}");

        // a wall texel, not the clear color, sits at the screen center
        let center = sw.scratch[(vh / 2) * vw + vw / 2];
        assert_ne!(center, 0xFF_202020);
    }

    #[test]
    fn flat_shading_paths_do_not_panic() {
        let (scene, mut camera, bank) = fixture();
        camera.options_mut().show_textures = false;
        for shading in [Shading::None, Shading::Side, Shading::Distance] {
            camera.options_mut().shading = shading;
            let mut sw = Software::default();
            sw.render_frame(&scene, &mut camera, &bank, |_, _, _| {});
        }
    }

    #[test]
    fn empty_scene_renders_background_only() {
        let bank = TextureBank::with_builtin_textures(16);
        let level = LevelData::from_codes(&[&[0, 0], &[0, 0]], Vec::new()).unwrap();
        let scene = Scene::new(0, &level, 64.0, 64.0, &bank).unwrap();
        let mut camera = Camera::new(&scene, CameraOptions::default());
        let mut sw = Software::default();
        sw.render_frame(&scene, &mut camera, &bank, |_, _, _| {});
        assert!(camera.z_buffer().iter().all(|z| z.is_infinite()));
        assert!(sw.collisions().iter().all(|c| !c.distance.is_finite()));
    }

    #[test]
    fn line_stays_in_bounds() {
        let mut sw = Software::default();
        sw.begin_frame(32, 32);
        // endpoints far outside the buffer must clip, not panic
        sw.draw_line(-100, -50, 200, 90, rgb(1, 2, 3));
        sw.draw_circle(0, 0, 40, rgb(4, 5, 6));
        sw.fill_rect(-4, -4, 10, 10, rgb(7, 8, 9));
    }
}
