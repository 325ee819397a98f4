//! Billboard sprite compositor.
//!
//! Sprites draw back-to-front after the wall pass, occlusion-tested per
//! column against the wall z-buffer. The camera-space transform is the
//! inverse of the `[plane, dir]` 2x2 matrix; `transform.y` is the depth
//! the z-buffer test uses. Source textures encode transparency as pure
//! black or zero alpha; translucent sprites blend 50/50 with whatever is
//! already in the frame.

use crate::{
    renderer::average_color,
    renderer::software::Software,
    world::camera::Camera,
    world::scene::Scene,
    world::texture::TextureBank,
};

impl Software {
    pub(crate) fn draw_sprites(&mut self, scene: &Scene, camera: &Camera, bank: &TextureBank) {
        let (vw, vh) = camera.viewport();
        let dir = camera.dir();
        let plane = camera.plane();

        let det = plane.x * dir.y - dir.x * plane.y;
        if det.abs() <= f32::EPSILON {
            return;
        }
        let inv_det = 1.0 / det;

        for &idx in camera.sprite_order() {
            let sprite = &scene.sprites()[idx];
            let rel = sprite.pos - camera.pos();

            let transform_x = inv_det * (dir.y * rel.x - dir.x * rel.y);
            let transform_y = inv_det * (plane.x * rel.y - plane.y * rel.x);
            // behind the camera plane
            if transform_y <= 0.0 {
                continue;
            }

            let screen_x = vw as f32 / 2.0 * (1.0 + transform_x / transform_y);

            let world_w = (scene.height() / transform_y).abs() * scene.tile_w();
            let world_h = (scene.height() / transform_y).abs() * scene.tile_h();
            let sprite_w = world_w * vw as f32 / scene.width();
            let sprite_h = world_h * vh as f32 / scene.height();
            if sprite_w < 1.0 || sprite_h < 1.0 {
                continue;
            }

            let left = screen_x - sprite_w / 2.0;
            let draw_start_x = (left.max(0.0)) as usize;
            let draw_end_x = ((screen_x + sprite_w / 2.0) as usize).min(vw);
            let top = vh as f32 / 2.0 - sprite_h / 2.0;
            let draw_start_y = (top.max(0.0)) as usize;
            let draw_end_y = ((vh as f32 / 2.0 + sprite_h / 2.0) as usize).min(vh);

            let texture = bank.texture_or_missing(sprite.texture);
            let z_buffer = camera.z_buffer();

            for stripe in draw_start_x..draw_end_x {
                if transform_y >= z_buffer[stripe] {
                    continue;
                }
                let tex_x = (((stripe as f32 - left) * texture.w as f32 / sprite_w) as usize)
                    .min(texture.w - 1);

                for y in draw_start_y..draw_end_y {
                    let tex_y = (((y as f32 - top) * texture.h as f32 / sprite_h) as usize)
                        .min(texture.h - 1);
                    let texel = texture.pixels[texture.w * tex_y + tex_x];

                    // pure black and zero alpha both mean transparent
                    if texel & 0x00FF_FFFF == 0 || texel >> 24 == 0 {
                        continue;
                    }

                    let dst = y * self.width + stripe;
                    self.scratch[dst] = if sprite.translucent {
                        average_color(self.scratch[dst], texel)
                    } else {
                        texel
                    };
                }
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
