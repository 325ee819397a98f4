//! Sphere tracing: one marched ray per viewport column.
//!
//! Every primitive answers a nearest-distance query; the ray advances by
//! the scene-wide minimum until it converges under `accuracy`, exhausts
//! the step budget, or leaves the scene bounds. The latter two are
//! *misses* and render as background — a stuck ray is bounded purely by
//! `max_steps`.

use glam::Vec2;

use crate::{
    renderer::software::Software,
    world::camera::Camera,
    world::primitive::Hit,
    world::scene::Scene,
    world::texture::TextureId,
};

/// Per-column collision record: the marcher's output, the rasterizer's
/// input. `distance == f32::INFINITY` marks a miss; `NaN` never appears.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Radial distance along the ray.
    pub distance: f32,
    /// Distance to the camera plane; what the z-buffer stores.
    pub perp_distance: f32,
    pub is_side_hit: bool,
    pub color: crate::renderer::Rgba,
    pub half_color: crate::renderer::Rgba,
    pub tex_u: Option<f32>,
    pub texture: Option<TextureId>,
}

impl RayHit {
    pub fn miss() -> Self {
        let hit = Hit::none();
        RayHit {
            distance: f32::INFINITY,
            perp_distance: f32::INFINITY,
            is_side_hit: hit.is_side_hit,
            color: hit.color,
            half_color: hit.half_color,
            tex_u: None,
            texture: None,
        }
    }

    pub fn is_miss(&self) -> bool {
        !self.distance.is_finite()
    }

    fn from_hit(hit: Hit, distance: f32, perp_distance: f32) -> Self {
        RayHit {
            distance,
            perp_distance,
            is_side_hit: hit.is_side_hit,
            color: hit.color,
            half_color: hit.half_color,
            tex_u: hit.tex_u,
            texture: hit.texture,
        }
    }
}

impl Software {
    /// March every viewport column and rebuild `self.collisions`.
    ///
    /// Camera state is read-only here; the z-buffer is written later by
    /// the wall pass so flat and textured paths share one code path.
    pub fn march(&mut self, scene: &Scene, camera: &Camera) {
        let (vw, _) = camera.viewport();
        let opts = camera.options();
        let pos = camera.pos();
        let dir = camera.dir();
        let plane = camera.plane();

        self.collisions.clear();
        self.debug_steps.clear();

        for col in 0..vw {
            // normalized device x in [-1, 1): the classic camera-plane sweep
            let camera_x = 2.0 * col as f32 / vw as f32 - 1.0;
            let ray_dir = dir + plane * camera_x;
            let ray_unit = ray_dir.normalize_or_zero();

            let mut point = pos;
            let mut total = 0.0_f32;
            let mut nearest = Hit::none();
            let mut converged = false;

            for _ in 0..opts.max_steps {
                let mut min_d = f32::INFINITY;
                for object in scene.objects() {
                    let hit = object.probe(point);
                    if hit.distance < min_d {
                        min_d = hit.distance;
                        nearest = hit;
                    }
                    if min_d <= opts.accuracy {
                        break;
                    }
                }

                if opts.debug_sdf && min_d.is_finite() {
                    self.debug_steps.push((point, min_d));
                }

                // advance by the scene-wide nearest distance
                total += min_d;
                point = pos + ray_unit * total;

                // left the scene (or empty scene: min_d stays infinite)
                if total > scene.width() || total > scene.height() {
                    total = f32::INFINITY;
                    break;
                }
                if min_d <= opts.accuracy {
                    converged = true;
                    break;
                }
            }

            let record = if converged {
                RayHit::from_hit(nearest, total, perp_distance(total, ray_dir, plane))
            } else {
                // budget exhausted or out of bounds: render as background
                RayHit::miss()
            };
            self.collisions.push(record);
        }
    }
}

/// Convert radial ray distance into distance-to-camera-plane, the
/// fisheye-free measure wall heights use. Trig-free:
/// `sin(angle(ray, plane)) = |ray × plane| / (|ray||plane|)`.
fn perp_distance(total: f32, ray_dir: Vec2, plane: Vec2) -> f32 {
    if !total.is_finite() {
        return f32::INFINITY;
    }
    let denom = ray_dir.length() * plane.length();
    if denom <= f32::EPSILON {
        return total;
    }
    let sin = (ray_dir.perp_dot(plane) / denom).abs();
    (total * sin).abs()
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
