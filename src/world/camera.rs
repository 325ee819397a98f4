//! Ray-marching camera: view-point state plus the per-frame projection
//! and occlusion scratch the renderer reads.
//!
//! * `pos`/`dir` live in scene pixel-space; `dir` stays unit length.
//! * `plane` spans the projection plane; its magnitude `tan(fov/2)`
//!   encodes the field of view and is refreshed whenever `dir` turns.
//! * The per-column z-buffer (perpendicular wall distances) is owned
//!   here so sprite compositing can occlusion-test against it.

use glam::{Vec2, vec2};

use crate::world::scene::{Scene, Sprite};

/// How wall slices are shaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shading {
    #[default]
    None,
    /// Half-brightness color/texture on "side" (vertical-edge) hits.
    Side,
    /// Blend toward black with distance.
    Distance,
}

/// Tunables read by the marcher and rasterizer every frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraOptions {
    /// Marching stops when the nearest SDF falls under this.
    pub accuracy: f32,
    /// Step budget per ray; the only liveness bound.
    pub max_steps: u32,
    /// Viewport size as a percentage of the scene dimensions.
    pub resolution: f32,
    /// Horizontal field of view, degrees.
    pub fov: f32,
    pub fisheye_correction: bool,
    pub shading: Shading,
    pub show_textures: bool,
    pub show_sprites: bool,
    pub show_minimap: bool,
    pub debug_rays: bool,
    pub debug_sdf: bool,
    pub minimap_scale: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        CameraOptions {
            accuracy: 0.01,
            max_steps: 100,
            resolution: 100.0,
            fov: 90.0,
            fisheye_correction: true,
            shading: Shading::Side,
            show_textures: true,
            show_sprites: true,
            show_minimap: false,
            debug_rays: false,
            debug_sdf: false,
            minimap_scale: 0.3,
        }
    }
}

/// Dynamically-typed option value for the string-keyed accessors the
/// host UI layer uses. Library code reads the typed struct directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Float(f32),
    Int(u32),
    Shading(Shading),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CameraError {
    /// Unknown names are an error, not a silent no-op: the silent form
    /// masked typo'd option wiring for too long.
    #[error("unknown camera option `{0}`")]
    UnknownOption(String),

    #[error("camera option `{name}` expects a {expected} value")]
    BadValue { name: String, expected: &'static str },
}

pub struct Camera {
    pos: Vec2,
    dir: Vec2,
    plane: Vec2,
    plane_len: f32,
    scene_w: f32,
    scene_h: f32,
    viewport_w: usize,
    viewport_h: usize,
    opts: CameraOptions,
    z_buffer: Vec<f32>,
    sprite_order: Vec<usize>,
    sprite_dist: Vec<f32>,
}

impl Camera {
    /// Camera spawned at the scene center, facing "north" (−y).
    pub fn new(scene: &Scene, opts: CameraOptions) -> Self {
        let mut cam = Camera {
            pos: scene.center(),
            dir: vec2(0.0, -1.0),
            plane: Vec2::ZERO,
            plane_len: 0.0,
            scene_w: scene.width(),
            scene_h: scene.height(),
            viewport_w: 0,
            viewport_h: 0,
            opts,
            z_buffer: Vec::new(),
            sprite_order: Vec::new(),
            sprite_dist: Vec::new(),
        };
        cam.calc_viewport();
        cam
    }

    /// Recompute viewport dimensions, plane magnitude and the z-buffer.
    /// Must run whenever `resolution`, `fov` or the scene dims change.
    pub fn calc_viewport(&mut self) {
        let frac = self.opts.resolution / 100.0;
        self.viewport_w = ((self.scene_w * frac) as usize).max(1);
        self.viewport_h = ((self.scene_h * frac) as usize).max(1);
        self.plane_len = (self.opts.fov.to_radians() / 2.0).tan();
        self.z_buffer.clear();
        self.z_buffer.resize(self.viewport_w, f32::INFINITY);
        self.update_projection();
    }

    /// Re-derive the camera plane from the current facing: perpendicular
    /// to `dir`, magnitude `tan(fov/2)`. Runs once per frame because
    /// rotation changes `dir`.
    pub fn update_projection(&mut self) {
        self.plane = self.dir.normalize_or_zero().perp() * self.plane_len;
    }

    /// Rebind to a (re)loaded scene: adopt its dimensions, rebuild the
    /// viewport. Position is left for the caller (`set_pos`).
    pub fn set_scene_dims(&mut self, scene: &Scene) {
        self.scene_w = scene.width();
        self.scene_h = scene.height();
        self.calc_viewport();
    }

    /*──────────────────────── movement contract ─────────────────────*/

    /// Translate along the facing direction (negative = backpedal).
    pub fn advance(&mut self, amount: f32) {
        self.pos += self.dir.normalize_or_zero() * amount;
    }

    /// Rotate the facing (positive = clockwise in screen terms).
    pub fn rotate(&mut self, angle: f32) {
        self.dir = Vec2::from_angle(angle).rotate(self.dir);
        self.update_projection();
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /*──────────────────────── accessors ─────────────────────────────*/

    pub fn pos(&self) -> Vec2 {
        self.pos
    }
    pub fn dir(&self) -> Vec2 {
        self.dir
    }
    pub fn plane(&self) -> Vec2 {
        self.plane
    }
    pub fn viewport(&self) -> (usize, usize) {
        (self.viewport_w, self.viewport_h)
    }
    pub fn options(&self) -> &CameraOptions {
        &self.opts
    }
    pub fn options_mut(&mut self) -> &mut CameraOptions {
        &mut self.opts
    }

    /*──────────────────────── z-buffer ──────────────────────────────*/

    /// Invariant: length == viewport width. Reset every frame so miss
    /// columns never keep last frame's depth.
    pub fn reset_z_buffer(&mut self) {
        self.z_buffer.fill(f32::INFINITY);
    }
    pub fn z_buffer(&self) -> &[f32] {
        &self.z_buffer
    }
    pub fn z_buffer_mut(&mut self) -> &mut [f32] {
        &mut self.z_buffer
    }

    /*──────────────────────── sprite ordering ───────────────────────*/

    /// Sort sprite indices back-to-front by squared distance to the
    /// camera. Cheap for the sprite counts involved, so callers may run
    /// it every frame rather than tracking camera/sprite dirtiness.
    pub fn sort_sprites(&mut self, sprites: &[Sprite]) {
        self.sprite_dist.clear();
        self.sprite_dist
            .extend(sprites.iter().map(|s| self.pos.distance_squared(s.pos)));

        self.sprite_order.clear();
        self.sprite_order.extend(0..sprites.len());
        let dist = &self.sprite_dist;
        self.sprite_order
            .sort_by(|&a, &b| dist[b].total_cmp(&dist[a]));
    }

    /// Indices into the scene's sprite list, farthest first.
    pub fn sprite_order(&self) -> &[usize] {
        &self.sprite_order
    }

    /*──────────────────────── string-keyed options ──────────────────*/

    pub fn get_option(&self, name: &str) -> Result<OptionValue, CameraError> {
        let o = &self.opts;
        Ok(match name {
            "accuracy" => OptionValue::Float(o.accuracy),
            "steps" => OptionValue::Int(o.max_steps),
            "resolution" => OptionValue::Float(o.resolution),
            "fov" => OptionValue::Float(o.fov),
            "fisheye_correction" => OptionValue::Bool(o.fisheye_correction),
            "shading_type" => OptionValue::Shading(o.shading),
            "show_textures" => OptionValue::Bool(o.show_textures),
            "show_sprites" => OptionValue::Bool(o.show_sprites),
            "show_minimap" => OptionValue::Bool(o.show_minimap),
            "debug_rays" => OptionValue::Bool(o.debug_rays),
            "debug_sdf" => OptionValue::Bool(o.debug_sdf),
            "minimap_scale" => OptionValue::Float(o.minimap_scale),
            _ => return Err(CameraError::UnknownOption(name.into())),
        })
    }

    /// Set one option by name. `resolution` and `fov` re-derive the
    /// viewport immediately; unknown names and wrong value types error.
    pub fn set_option(&mut self, name: &str, value: OptionValue) -> Result<(), CameraError> {
        match name {
            "accuracy" => self.opts.accuracy = expect_float(name, value)?,
            "steps" => self.opts.max_steps = expect_int(name, value)?,
            "resolution" => {
                self.opts.resolution = expect_float(name, value)?;
                self.calc_viewport();
            }
            "fov" => {
                self.opts.fov = expect_float(name, value)?;
                self.calc_viewport();
            }
            "fisheye_correction" => self.opts.fisheye_correction = expect_bool(name, value)?,
            "shading_type" => match value {
                OptionValue::Shading(s) => self.opts.shading = s,
                _ => {
                    return Err(CameraError::BadValue {
                        name: name.into(),
                        expected: "shading",
                    });
                }
            },
            "show_textures" => self.opts.show_textures = expect_bool(name, value)?,
            "show_sprites" => self.opts.show_sprites = expect_bool(name, value)?,
            "show_minimap" => self.opts.show_minimap = expect_bool(name, value)?,
            "debug_rays" => self.opts.debug_rays = expect_bool(name, value)?,
            "debug_sdf" => self.opts.debug_sdf = expect_bool(name, value)?,
            "minimap_scale" => self.opts.minimap_scale = expect_float(name, value)?,
            _ => return Err(CameraError::UnknownOption(name.into())),
        }
        Ok(())
    }
}

fn expect_float(name: &str, value: OptionValue) -> Result<f32, CameraError> {
    match value {
        OptionValue::Float(f) => Ok(f),
        _ => Err(CameraError::BadValue {
            name: name.into(),
            expected: "float",
        }),
    }
}

fn expect_int(name: &str, value: OptionValue) -> Result<u32, CameraError> {
    match value {
        OptionValue::Int(i) => Ok(i),
        _ => Err(CameraError::BadValue {
            name: name.into(),
            expected: "integer",
        }),
    }
}

fn expect_bool(name: &str, value: OptionValue) -> Result<bool, CameraError> {
    match value {
        OptionValue::Bool(b) => Ok(b),
        _ => Err(CameraError::BadValue {
            name: name.into(),
            expected: "bool",
        }),
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::level::LevelData;
    use crate::world::scene::Scene;
    use crate::world::texture::TextureBank;

    fn test_scene() -> Scene {
        let level = LevelData::from_codes(&[&[0, 0], &[0, 0]], Vec::new()).unwrap();
        Scene::new(0, &level, 800.0, 600.0, &TextureBank::default_with_checker()).unwrap()
    }

    #[test]
    fn viewport_follows_resolution() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        assert_eq!(cam.viewport(), (800, 600));
        assert_eq!(cam.z_buffer().len(), 800);

        cam.set_option("resolution", OptionValue::Float(50.0)).unwrap();
        assert_eq!(cam.viewport(), (400, 300));
        assert_eq!(cam.z_buffer().len(), 400);
    }

    #[test]
    fn plane_perpendicular_with_fov_magnitude() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        cam.rotate(0.7);
        cam.update_projection();
        assert!(cam.dir().dot(cam.plane()).abs() < 1e-5);
        // fov 90° → |plane| = tan(45°) = 1
        assert!((cam.plane().length() - 1.0).abs() < 1e-5);

        cam.set_option("fov", OptionValue::Float(60.0)).unwrap();
        assert!((cam.plane().length() - (30_f32.to_radians()).tan()).abs() < 1e-5);
    }

    #[test]
    fn advance_moves_along_facing() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        let start = cam.pos();
        cam.advance(10.0);
        assert!((cam.pos() - (start + vec2(0.0, -10.0))).length() < 1e-5);
        cam.advance(-10.0);
        assert!((cam.pos() - start).length() < 1e-5);
    }

    #[test]
    fn rotation_preserves_heading_length() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        for _ in 0..100 {
            cam.rotate(0.04);
        }
        assert!((cam.dir().length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn sprite_order_is_back_to_front() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        cam.set_pos(vec2(0.0, 0.0));
        let sprites = vec![
            Sprite { pos: vec2(10.0, 0.0), texture: 0, translucent: false, name: "near" },
            Sprite { pos: vec2(90.0, 0.0), texture: 0, translucent: false, name: "far" },
            Sprite { pos: vec2(40.0, 0.0), texture: 0, translucent: false, name: "mid" },
        ];
        cam.sort_sprites(&sprites);
        assert_eq!(cam.sprite_order(), &[1, 2, 0]);
    }

    #[test]
    fn unknown_option_errors() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        let err = cam.set_option("sading_type", OptionValue::Bool(true)).unwrap_err();
        assert_eq!(err, CameraError::UnknownOption("sading_type".into()));
        assert!(cam.get_option("nope").is_err());
    }

    #[test]
    fn wrong_value_type_errors() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        let err = cam.set_option("accuracy", OptionValue::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            CameraError::BadValue {
                name: "accuracy".into(),
                expected: "float"
            }
        );
    }

    #[test]
    fn option_round_trip() {
        let scene = test_scene();
        let mut cam = Camera::new(&scene, CameraOptions::default());
        cam.set_option("show_minimap", OptionValue::Bool(true)).unwrap();
        assert_eq!(cam.get_option("show_minimap").unwrap(), OptionValue::Bool(true));
        cam.set_option("shading_type", OptionValue::Shading(Shading::Distance)).unwrap();
        assert_eq!(cam.options().shading, Shading::Distance);
    }
}
