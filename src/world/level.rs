//! Typed level data.
//!
//! Grids are authored as numeric tile codes (the historical map format)
//! and decoded **once** into a [`Tile`] table when a level is built; the
//! scene never parses codes per cell.
//!
//! Code scheme:
//! * `0` — empty
//! * `1`, `1x`, `1xx` — wall box; the digits after the leading `1` pick
//!   the texture id (`1` → 0, `11` → 1, `130` → 30)
//! * `2` — circular pillar
//! * `30`/`31`/`32`/`33` — wedge in one of four mirrored orientations
//!   (top-left, top-right, bottom-left, bottom-right right angle)

use crate::world::texture::TextureId;

pub type TileCode = u16;

/// Which corner of its cell holds the wedge's right angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WedgeOrient {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall { texture: TextureId },
    Pillar,
    Wedge(WedgeOrient),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("unrecognized tile code {code} at row {row}, col {col}")]
    UnknownCode { code: TileCode, row: usize, col: usize },
}

impl Tile {
    /// Decode one numeric tile code; `row`/`col` only feed the error.
    pub fn from_code(code: TileCode, row: usize, col: usize) -> Result<Tile, LevelError> {
        match code {
            0 => Ok(Tile::Empty),
            1 => Ok(Tile::Wall { texture: 0 }),
            10..=19 => Ok(Tile::Wall {
                texture: code - 10,
            }),
            100..=199 => Ok(Tile::Wall {
                texture: code - 100,
            }),
            2 => Ok(Tile::Pillar),
            30 => Ok(Tile::Wedge(WedgeOrient::TopLeft)),
            31 => Ok(Tile::Wedge(WedgeOrient::TopRight)),
            32 => Ok(Tile::Wedge(WedgeOrient::BottomLeft)),
            33 => Ok(Tile::Wedge(WedgeOrient::BottomRight)),
            code => Err(LevelError::UnknownCode { code, row, col }),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }
}

/// A billboard placed on the grid (1-based cell coordinates, matching the
/// historical level tables; the scene converts to world units).
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub grid_x: f32,
    pub grid_y: f32,
    pub texture: TextureId,
    pub translucent: bool,
    pub name: &'static str,
}

impl Entity {
    pub const fn new(grid_x: f32, grid_y: f32, texture: TextureId, name: &'static str) -> Self {
        Entity {
            grid_x,
            grid_y,
            texture,
            translucent: false,
            name,
        }
    }

    pub const fn translucent(mut self) -> Self {
        self.translucent = true;
        self
    }
}

/// One decoded level: tile table plus entity list.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelData {
    pub tiles: Vec<Vec<Tile>>,
    pub entities: Vec<Entity>,
}

impl LevelData {
    /// Decode a numeric grid. Rows may not be ragged; that is caught by
    /// scene construction, not here.
    pub fn from_codes(codes: &[&[TileCode]], entities: Vec<Entity>) -> Result<Self, LevelError> {
        let mut tiles = Vec::with_capacity(codes.len());
        for (row, line) in codes.iter().enumerate() {
            let mut out = Vec::with_capacity(line.len());
            for (col, &code) in line.iter().enumerate() {
                out.push(Tile::from_code(code, row, col)?);
            }
            tiles.push(out);
        }
        Ok(LevelData { tiles, entities })
    }
}

/// The built-in test levels (texture ids 1..=3 match
/// `TextureBank::with_builtin_textures`).
pub fn builtin_levels() -> Vec<LevelData> {
    vec![sparse_boxes(), wedge_room(), arena(), pillar_hall()]
}

/// Three lone boxes in an open field.
fn sparse_boxes() -> LevelData {
    LevelData::from_codes(
        &[
            &[0, 0, 0, 0, 0, 0, 0],
            &[0, 0, 0, 11, 0, 0, 0],
            &[0, 0, 0, 0, 0, 0, 0],
            &[0, 11, 0, 0, 0, 11, 0],
            &[0, 0, 0, 0, 0, 0, 0],
            &[0, 0, 0, 0, 0, 0, 0],
        ],
        Vec::new(),
    )
    .expect("static level data decodes")
}

/// Four mirrored wedges forming a diamond.
fn wedge_room() -> LevelData {
    LevelData::from_codes(
        &[
            &[0, 0, 0, 0, 0, 0, 0],
            &[0, 0, 0, 0, 0, 0, 0],
            &[0, 0, 30, 31, 0, 0, 0],
            &[0, 0, 32, 33, 0, 0, 0],
            &[0, 0, 0, 0, 0, 0, 0],
            &[0, 0, 0, 0, 0, 0, 0],
        ],
        Vec::new(),
    )
    .expect("static level data decodes")
}

/// Walled arena with columns, barrels and lights.
fn arena() -> LevelData {
    LevelData::from_codes(
        &[
            &[11, 11, 12, 11, 11, 12, 11],
            &[11, 0, 0, 0, 0, 0, 11],
            &[12, 0, 0, 0, 0, 0, 12],
            &[11, 0, 0, 0, 0, 0, 11],
            &[11, 0, 0, 0, 0, 0, 11],
            &[12, 0, 0, 0, 0, 0, 12],
            &[11, 11, 12, 11, 11, 12, 11],
        ],
        vec![
            Entity::new(3.0, 2.0, 1, "column"),
            Entity::new(4.0, 2.0, 1, "column"),
            Entity::new(5.0, 2.0, 1, "column"),
            Entity::new(3.0, 6.0, 2, "barrel"),
            Entity::new(4.0, 6.0, 2, "barrel"),
            Entity::new(5.0, 6.0, 2, "barrel"),
            Entity::new(3.0, 3.0, 3, "light").translucent(),
            Entity::new(5.0, 3.0, 3, "light").translucent(),
            Entity::new(3.0, 5.0, 3, "light").translucent(),
            Entity::new(5.0, 5.0, 3, "light").translucent(),
        ],
    )
    .expect("static level data decodes")
}

/// Arena with two rows of wall pillars and round obstacles.
fn pillar_hall() -> LevelData {
    LevelData::from_codes(
        &[
            &[11, 11, 12, 11, 11, 12, 11],
            &[11, 0, 0, 0, 0, 0, 11],
            &[12, 0, 11, 0, 11, 0, 12],
            &[11, 0, 11, 2, 11, 0, 11],
            &[11, 0, 11, 0, 11, 0, 11],
            &[12, 0, 0, 2, 0, 0, 12],
            &[11, 11, 12, 11, 11, 12, 11],
        ],
        vec![
            Entity::new(2.0, 2.0, 3, "light").translucent(),
            Entity::new(6.0, 2.0, 3, "light").translucent(),
            Entity::new(2.0, 6.0, 2, "barrel"),
            Entity::new(6.0, 6.0, 2, "barrel"),
        ],
    )
    .expect("static level data decodes")
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_decode_walls() {
        assert_eq!(
            Tile::from_code(1, 0, 0).unwrap(),
            Tile::Wall { texture: 0 }
        );
        assert_eq!(
            Tile::from_code(11, 0, 0).unwrap(),
            Tile::Wall { texture: 1 }
        );
        assert_eq!(
            Tile::from_code(130, 0, 0).unwrap(),
            Tile::Wall { texture: 30 }
        );
    }

    #[test]
    fn code_decode_shapes() {
        assert_eq!(Tile::from_code(2, 0, 0).unwrap(), Tile::Pillar);
        assert_eq!(
            Tile::from_code(31, 0, 0).unwrap(),
            Tile::Wedge(WedgeOrient::TopRight)
        );
    }

    #[test]
    fn unknown_code_is_an_error() {
        let err = Tile::from_code(42, 3, 5).unwrap_err();
        assert_eq!(
            err,
            LevelError::UnknownCode {
                code: 42,
                row: 3,
                col: 5
            }
        );
    }

    #[test]
    fn builtin_levels_decode() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 4);
        // arena is fully walled: first and last rows have no empty tile
        let arena = &levels[2];
        assert!(arena.tiles[0].iter().all(|t| !t.is_empty()));
        assert!(arena.tiles.last().unwrap().iter().all(|t| !t.is_empty()));
        assert_eq!(arena.entities.len(), 10);
    }
}
