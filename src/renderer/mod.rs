//! Rendering abstraction layer.
//!
//! *The rest of the crate never touches a pixel buffer directly.*
//! The world produces a [`Scene`] + [`Camera`]; a type implementing
//! [`Renderer`] turns them into pixels once per frame.
//!
//! * You can plug multiple back-ends (`renderer::software`, a GPU pass, …)
//!   without changing scene or camera logic.
//! * A helper blanket-impl [`RendererExt`] adds `render_frame` so call-sites
//!   stay short.

use crate::world::camera::Camera;
use crate::world::scene::Scene;
use crate::world::texture::TextureBank;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

pub const BLACK: Rgba = 0xFF_000000;
pub const WHITE: Rgba = 0xFF_FFFFFF;
pub const RED: Rgba = 0xFF_FF0000;
pub const GREEN: Rgba = 0xFF_00FF00;

/// Flat fallbacks used when texture mapping is disabled.
pub const FLOOR_COLOR: Rgba = 0xFF_C8C8C8;
pub const CEILING_COLOR: Rgba = 0xFF_646464;

/// Pack 8-bit channels into an [`Rgba`] pixel (alpha forced opaque).
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF_000000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Half-brightness copy of a pixel, alpha preserved.
///
/// Side-shaded walls and the floor/ceiling use precomputed half tables
/// instead of multiplying per pixel; this is the table builder.
#[inline]
pub const fn half_bright(c: Rgba) -> Rgba {
    (c & 0xFF_000000) | ((c >> 1) & 0x00_7F7F7F)
}

/// Linear blend from `a` to `b`; `t` is clamped to `[0, 1]`.
pub fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let ch = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        (((ca + (cb - ca) * t) as u32) & 0xFF) << shift
    };
    0xFF_000000 | ch(16) | ch(8) | ch(0)
}

/// 50/50 average of two pixels; used for translucent sprite texels.
#[inline]
pub fn average_color(a: Rgba, b: Rgba) -> Rgba {
    let ch = |shift: u32| ((((a >> shift) & 0xFF) + ((b >> shift) & 0xFF)) / 2) << shift;
    0xFF_000000 | ch(16) | ch(8) | ch(0)
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// GPU back-ends can ignore the slice because they never allocate it.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// March the scene and rasterise walls, floor/ceiling and sprites into
    /// the internal buffer. Mutates only the camera's per-frame state
    /// (projection plane, z-buffer, sprite order).
    fn draw_scene(&mut self, scene: &Scene, camera: &mut Camera, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `render_frame` adaptor.
pub trait RendererExt: Renderer {
    fn render_frame<F>(&mut self, scene: &Scene, camera: &mut Camera, bank: &TextureBank, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let (w, h) = camera.viewport();
        self.begin_frame(w, h);
        self.draw_scene(scene, camera, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_bright_halves_channels() {
        assert_eq!(half_bright(rgb(200, 100, 50)), rgb(100, 50, 25));
        // alpha stays opaque
        assert_eq!(half_bright(WHITE) >> 24, 0xFF);
    }

    #[test]
    fn lerp_endpoints_and_clamp() {
        assert_eq!(lerp_color(WHITE, BLACK, 0.0), WHITE);
        assert_eq!(lerp_color(WHITE, BLACK, 1.0), BLACK);
        assert_eq!(lerp_color(WHITE, BLACK, 7.5), BLACK);
        assert_eq!(lerp_color(rgb(100, 100, 100), BLACK, 0.5), rgb(50, 50, 50));
    }

    #[test]
    fn average_is_midpoint() {
        assert_eq!(average_color(rgb(0, 0, 0), rgb(200, 100, 50)), rgb(100, 50, 25));
    }
}
