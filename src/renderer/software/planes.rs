//! Affine floor and ceiling caster.
//!
//! For every row below the horizon the world-space footprint is a
//! straight line between the leftmost and rightmost ray directions, so
//! one step vector per row walks the whole scanline without per-pixel
//! projection. The ceiling reuses the same walk mirrored above the
//! horizon. Two floor textures checkerboard by world cell parity; both
//! planes sample the half-brightness tables.

use crate::{
    renderer::software::Software,
    renderer::{CEILING_COLOR, FLOOR_COLOR},
    world::camera::Camera,
    world::scene::Scene,
    world::texture::{NO_TEXTURE, TextureBank},
};

impl Software {
    pub(crate) fn draw_planes(&mut self, scene: &Scene, camera: &Camera, bank: &TextureBank) {
        let (vw, vh) = camera.viewport();

        let surfaces_set = scene.floor_tex() != NO_TEXTURE
            && scene.floor_tex2() != NO_TEXTURE
            && scene.ceiling_tex() != NO_TEXTURE;
        let textures = if camera.options().show_textures && surfaces_set {
            match (
                bank.texture(scene.floor_tex()),
                bank.texture(scene.floor_tex2()),
                bank.texture(scene.ceiling_tex()),
            ) {
                (Ok(f), Ok(f2), Ok(c)) => Some((f, f2, c)),
                _ => None,
            }
        } else {
            None
        };

        let Some((floor, floor2, ceiling)) = textures else {
            // untextured fallback: flat split at the horizon
            for y in vh / 2..vh {
                let ceiling_y = vh - 1 - y;
                for x in 0..vw {
                    self.scratch[y * self.width + x] = FLOOR_COLOR;
                    self.scratch[ceiling_y * self.width + x] = CEILING_COLOR;
                }
            }
            return;
        };

        let dir = camera.dir();
        let plane = camera.plane();
        // column 0 carries camera_x = -1
        let start_dir = dir - plane;
        let end_dir = dir + plane;

        let start_x = camera.pos().x / floor.w as f32;
        let start_y = camera.pos().y / floor.h as f32;

        let z_pos = vh as f32 / 2.0;

        for y in vh / 2..vh {
            let ceiling_y = vh - 1 - y;

            // row height over the horizon; +0.5 samples the row center and
            // keeps the first row off a division by zero
            let horizon_height = y as f32 + 0.5 - z_pos;
            let row_dist = z_pos / horizon_height;

            let step_x = row_dist * (end_dir.x - start_dir.x) / vw as f32;
            let step_y = row_dist * (end_dir.y - start_dir.y) / vw as f32;

            let mut x_pos = start_x + row_dist * start_dir.x;
            let mut y_pos = start_y + row_dist * start_dir.y;

            for x in 0..vw {
                let cell_x = x_pos.floor();
                let cell_y = y_pos.floor();

                let tex_x = ((floor.w as f32 * (x_pos - cell_x)) as usize).min(floor.w - 1);
                let tex_y = ((floor.h as f32 * (y_pos - cell_y)) as usize).min(floor.h - 1);

                x_pos += step_x;
                y_pos += step_y;

                let even = (cell_x as i64 + cell_y as i64).rem_euclid(2) == 0;
                let floor_color = if even {
                    floor.half_pixels[floor.w * tex_y + tex_x]
                } else {
                    floor2.half_pixels[floor2.w * tex_y.min(floor2.h - 1) + tex_x.min(floor2.w - 1)]
                };
                let ceiling_color =
                    ceiling.half_pixels[ceiling.w * tex_y.min(ceiling.h - 1) + tex_x.min(ceiling.w - 1)];

                self.scratch[y * self.width + x] = floor_color;
                self.scratch[ceiling_y * self.width + x] = ceiling_color;
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
