//! Wall slice rasterizer.
//!
//! Turns each column's collision record into a vertical slice. Wall
//! height comes from the perpendicular distance when fisheye correction
//! is on, raw radial distance otherwise. Hit columns also publish their
//! depth to the camera z-buffer; miss columns leave the frame-wide
//! infinity reset untouched so sprites behind them stay visible.

use crate::{
    renderer::software::Software,
    renderer::{BLACK, lerp_color},
    world::camera::{Camera, Shading},
    world::scene::Scene,
    world::texture::TextureBank,
};

impl Software {
    pub(crate) fn draw_walls(&mut self, scene: &Scene, camera: &mut Camera, bank: &TextureBank) {
        let (vw, vh) = camera.viewport();
        let opts = *camera.options();

        for col in 0..vw.min(self.collisions.len()) {
            let line = self.collisions[col];
            let distance = if opts.fisheye_correction {
                line.perp_distance
            } else {
                line.distance
            };
            if !distance.is_finite() {
                continue;
            }

            // world-space slice height, then mapped into viewport rows
            let world_line_height = (scene.height() / distance) * scene.tile_h();
            let line_height = world_line_height * vh as f32 / scene.height();

            let draw_start = ((vh as f32 - line_height) / 2.0).max(0.0) as usize;
            let draw_end = (draw_start + line_height as usize).min(vh);

            let textured = opts.show_textures && line.texture.is_some() && line.tex_u.is_some();
            if textured {
                let texture = bank.texture_or_missing(line.texture.unwrap_or_default());
                let dark = opts.shading == Shading::Side && line.is_side_hit;
                let pixels = if dark {
                    &texture.half_pixels
                } else {
                    &texture.pixels
                };

                let tex_x = ((line.tex_u.unwrap_or(0.0) * texture.w as f32) as usize)
                    .min(texture.w - 1);
                let step = texture.h as f32 / line_height;
                let mut tex_pos =
                    (draw_start as f32 - vh as f32 / 2.0 + line_height / 2.0) * step;

                for y in draw_start..draw_end {
                    let tex_y = (tex_pos.max(0.0) as usize) % texture.h;
                    tex_pos += step;
                    self.scratch[y * self.width + col] = pixels[texture.w * tex_y + tex_x];
                }
            } else {
                let color = match opts.shading {
                    Shading::Side if line.is_side_hit => line.half_color,
                    // darken toward black as the hit recedes
                    Shading::Distance => {
                        lerp_color(line.color, BLACK, line.distance / scene.width())
                    }
                    _ => line.color,
                };
                for y in draw_start..draw_end {
                    self.scratch[y * self.width + col] = color;
                }
            }

            camera.z_buffer_mut()[col] = line.perp_distance;
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
