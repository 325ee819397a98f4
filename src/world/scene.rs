//! Scene: the tile grid instantiated as world-space primitives plus the
//! sprite entities that live between them.
//!
//! A scene is immutable between level loads; `change_level` rebuilds the
//! object and sprite lists wholesale so no state leaks across levels.

use glam::{Vec2, vec2};

use crate::renderer::{Rgba, WHITE, rgb};
use crate::world::level::{LevelData, Tile, WedgeOrient};
use crate::world::primitive::{BoxShape, CircleShape, Primitive, WedgeShape};
use crate::world::texture::{TextureBank, TextureId};

/// Deterministic colors handed out to flat-shaded pillars.
const PILLAR_PALETTE: [Rgba; 4] = [
    rgb(208, 70, 72),
    rgb(89, 125, 206),
    rgb(109, 170, 44),
    rgb(218, 212, 94),
];

/// A billboard in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub texture: TextureId,
    pub translucent: bool,
    pub name: &'static str,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("level grid is empty")]
    EmptyGrid,

    #[error("level grid is ragged: row {row} has {got} columns, expected {expected}")]
    RaggedGrid { row: usize, got: usize, expected: usize },

    #[error("scene pixel dimensions must be positive, got {width}x{height}")]
    ZeroScene { width: f32, height: f32 },

    #[error("texture id {id} referenced by {what} is not in the bank ({len} loaded)")]
    MissingTexture { id: TextureId, what: &'static str, len: usize },
}

#[derive(Debug)]
pub struct Scene {
    id: usize,
    width: f32,
    height: f32,
    grid_w: usize,
    grid_h: usize,
    tile_w: f32,
    tile_h: f32,
    objects: Vec<Primitive>,
    sprites: Vec<Sprite>,
    floor_tex: TextureId,
    floor_tex2: TextureId,
    ceiling_tex: TextureId,
}

impl Scene {
    /// Build a scene from decoded level data.
    ///
    /// `width`/`height` are the scene's pixel-space dimensions; tile
    /// dimensions derive from them and stay fixed for the scene's life.
    /// Fails fast on malformed grids or texture ids the bank cannot
    /// serve; configuration errors surface here, never mid-frame.
    pub fn new(
        id: usize,
        level: &LevelData,
        width: f32,
        height: f32,
        bank: &TextureBank,
    ) -> Result<Self, SceneError> {
        let mut scene = Scene {
            id,
            width: 0.0,
            height: 0.0,
            grid_w: 0,
            grid_h: 0,
            tile_w: 0.0,
            tile_h: 0.0,
            objects: Vec::new(),
            sprites: Vec::new(),
            floor_tex: 0,
            floor_tex2: 0,
            ceiling_tex: 0,
        };
        scene.init(id, level, width, height, bank)?;
        Ok(scene)
    }

    /// Swap in a different level, dropping every primitive and sprite of
    /// the old one. Surface textures survive the swap.
    pub fn change_level(
        &mut self,
        id: usize,
        level: &LevelData,
        width: f32,
        height: f32,
        bank: &TextureBank,
    ) -> Result<(), SceneError> {
        self.init(id, level, width, height, bank)
    }

    fn init(
        &mut self,
        id: usize,
        level: &LevelData,
        width: f32,
        height: f32,
        bank: &TextureBank,
    ) -> Result<(), SceneError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(SceneError::ZeroScene { width, height });
        }
        let grid_h = level.tiles.len();
        let grid_w = level.tiles.first().map_or(0, |r| r.len());
        if grid_w == 0 || grid_h == 0 {
            return Err(SceneError::EmptyGrid);
        }
        for (row, line) in level.tiles.iter().enumerate() {
            if line.len() != grid_w {
                return Err(SceneError::RaggedGrid {
                    row,
                    got: line.len(),
                    expected: grid_w,
                });
            }
        }

        self.id = id;
        self.width = width;
        self.height = height;
        self.grid_w = grid_w;
        self.grid_h = grid_h;
        self.tile_w = width / grid_w as f32;
        self.tile_h = height / grid_h as f32;

        self.spawn_objects(level, bank)?;
        self.spawn_sprites(level, bank)?;
        Ok(())
    }

    fn spawn_objects(&mut self, level: &LevelData, bank: &TextureBank) -> Result<(), SceneError> {
        let (tw, th) = (self.tile_w, self.tile_h);
        self.objects.clear();

        for (row, line) in level.tiles.iter().enumerate() {
            for (col, &tile) in line.iter().enumerate() {
                let origin = vec2(col as f32 * tw, row as f32 * th);
                match tile {
                    Tile::Empty => {}
                    Tile::Wall { texture } => {
                        check_texture(bank, texture, "wall tile")?;
                        self.objects.push(Primitive::Box(BoxShape {
                            pos: origin,
                            size: vec2(tw, th),
                            color: WHITE,
                            texture: Some(texture),
                        }));
                    }
                    Tile::Pillar => {
                        let color = PILLAR_PALETTE[self.objects.len() % PILLAR_PALETTE.len()];
                        self.objects.push(Primitive::Circle(CircleShape {
                            center: origin + vec2(tw / 2.0, th / 2.0),
                            radius: (tw + th) / 10.0,
                            color,
                        }));
                    }
                    Tile::Wedge(orient) => {
                        let (anchor, legs) = match orient {
                            WedgeOrient::TopLeft => (origin, vec2(tw, th)),
                            WedgeOrient::TopRight => (origin + vec2(tw, 0.0), vec2(-tw, th)),
                            WedgeOrient::BottomLeft => (origin + vec2(0.0, th), vec2(tw, -th)),
                            WedgeOrient::BottomRight => (origin + vec2(tw, th), vec2(-tw, -th)),
                        };
                        self.objects
                            .push(Primitive::Wedge(WedgeShape::new(anchor, legs, WHITE, None)));
                    }
                }
            }
        }
        Ok(())
    }

    fn spawn_sprites(&mut self, level: &LevelData, bank: &TextureBank) -> Result<(), SceneError> {
        self.sprites.clear();
        for ent in &level.entities {
            check_texture(bank, ent.texture, "entity")?;
            // 1-based grid cell → center of that cell in world units
            self.sprites.push(Sprite {
                pos: vec2(
                    (ent.grid_x - 1.0) * self.tile_w + self.tile_w / 2.0,
                    (ent.grid_y - 1.0) * self.tile_h + self.tile_h / 2.0,
                ),
                texture: ent.texture,
                translucent: ent.translucent,
                name: ent.name,
            });
        }
        Ok(())
    }

    /// Floor checkerboard pair + ceiling texture used by the plane caster.
    pub fn set_surface_textures(
        &mut self,
        floor: TextureId,
        floor_alt: TextureId,
        ceiling: TextureId,
        bank: &TextureBank,
    ) -> Result<(), SceneError> {
        check_texture(bank, floor, "floor surface")?;
        check_texture(bank, floor_alt, "floor surface")?;
        check_texture(bank, ceiling, "ceiling surface")?;
        self.floor_tex = floor;
        self.floor_tex2 = floor_alt;
        self.ceiling_tex = ceiling;
        Ok(())
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn width(&self) -> f32 {
        self.width
    }
    pub fn height(&self) -> f32 {
        self.height
    }
    pub fn grid_dims(&self) -> (usize, usize) {
        (self.grid_w, self.grid_h)
    }
    pub fn tile_w(&self) -> f32 {
        self.tile_w
    }
    pub fn tile_h(&self) -> f32 {
        self.tile_h
    }
    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }
    pub fn floor_tex(&self) -> TextureId {
        self.floor_tex
    }
    pub fn floor_tex2(&self) -> TextureId {
        self.floor_tex2
    }
    pub fn ceiling_tex(&self) -> TextureId {
        self.ceiling_tex
    }

    /// World-space center, the default camera spawn.
    pub fn center(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }
}

fn check_texture(bank: &TextureBank, id: TextureId, what: &'static str) -> Result<(), SceneError> {
    if (id as usize) < bank.len() {
        Ok(())
    } else {
        Err(SceneError::MissingTexture {
            id,
            what,
            len: bank.len(),
        })
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::level::{Entity, builtin_levels};

    fn bank() -> TextureBank {
        TextureBank::with_builtin_textures(16)
    }

    fn level_one_box() -> LevelData {
        LevelData::from_codes(
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
        .unwrap()
    }

    #[test]
    fn tiles_derive_from_pixel_dims() {
        let scene = Scene::new(0, &level_one_box(), 700.0, 600.0, &bank()).unwrap();
        assert_eq!(scene.grid_dims(), (7, 6));
        assert_eq!(scene.tile_w(), 100.0);
        assert_eq!(scene.tile_h(), 100.0);
        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.center(), vec2(350.0, 300.0));
    }

    #[test]
    fn box_placed_at_grid_world_coords() {
        let scene = Scene::new(0, &level_one_box(), 700.0, 600.0, &bank()).unwrap();
        match scene.objects()[0] {
            Primitive::Box(b) => {
                assert_eq!(b.pos, vec2(300.0, 100.0));
                assert_eq!(b.size, vec2(100.0, 100.0));
            }
            ref other => panic!("expected a box, got {other:?}"),
        }
    }

    #[test]
    fn entities_land_on_cell_centers() {
        let level = LevelData::from_codes(
            &[&[0, 0], &[0, 0]],
            vec![Entity::new(2.0, 1.0, 1, "thing")],
        )
        .unwrap();
        let scene = Scene::new(0, &level, 200.0, 200.0, &bank()).unwrap();
        assert_eq!(scene.sprites()[0].pos, vec2(150.0, 50.0));
    }

    #[test]
    fn zero_scene_rejected() {
        let err = Scene::new(0, &level_one_box(), 0.0, 600.0, &bank()).unwrap_err();
        assert!(matches!(err, SceneError::ZeroScene { .. }));
    }

    #[test]
    fn ragged_grid_rejected() {
        let level = LevelData::from_codes(&[&[0, 0, 0], &[0, 0]], Vec::new()).unwrap();
        let err = Scene::new(0, &level, 100.0, 100.0, &bank()).unwrap_err();
        assert_eq!(
            err,
            SceneError::RaggedGrid {
                row: 1,
                got: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn unknown_wall_texture_fails_fast() {
        let level = LevelData::from_codes(&[&[19, 0], &[0, 0]], Vec::new()).unwrap();
        let err = Scene::new(0, &level, 100.0, 100.0, &bank()).unwrap_err();
        assert!(matches!(err, SceneError::MissingTexture { id: 9, .. }));
    }

    #[test]
    fn change_level_round_trips() {
        let levels = builtin_levels();
        let bank = bank();
        let mut scene = Scene::new(0, &levels[0], 700.0, 600.0, &bank).unwrap();
        let probes = [
            vec2(10.0, 10.0),
            vec2(350.0, 300.0),
            vec2(600.0, 120.0),
            vec2(333.0, 90.0),
        ];
        let before: Vec<Vec<f32>> = probes
            .iter()
            .map(|&p| scene.objects().iter().map(|o| o.probe(p).distance).collect())
            .collect();
        let count = scene.objects().len();

        scene.change_level(2, &levels[2], 700.0, 600.0, &bank).unwrap();
        assert_ne!(scene.objects().len(), count);
        assert!(!scene.sprites().is_empty());

        scene.change_level(0, &levels[0], 700.0, 600.0, &bank).unwrap();
        assert_eq!(scene.objects().len(), count);
        assert!(scene.sprites().is_empty());
        let after: Vec<Vec<f32>> = probes
            .iter()
            .map(|&p| scene.objects().iter().map(|o| o.probe(p).distance).collect())
            .collect();
        assert_eq!(before, after);
    }
}
