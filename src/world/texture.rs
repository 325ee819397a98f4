// Format-agnostic repository of pre-decoded textures.
// The renderer and scene interact through `TextureId` only; no image
// format ever reaches this module.

use std::collections::HashMap;

use crate::renderer::{Rgba, half_bright, rgb};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the "missing texture" checkerboard.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 0xAARRGGBB in row-major order, plus a precomputed
/// half-brightness copy used for side shading and floor/ceiling dimming.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
    pub half_pixels: Vec<Rgba>,
}

impl Texture {
    /// Wrap pre-decoded pixels; the half-brightness table is derived here.
    pub fn new<S: Into<String>>(name: S, w: usize, h: usize, pixels: Vec<Rgba>) -> Self {
        debug_assert_eq!(pixels.len(), w * h);
        let half_pixels = pixels.iter().map(|&c| half_bright(c)).collect();
        Texture {
            name: name.into(),
            w,
            h,
            pixels,
            half_pixels,
        }
    }

    /// Build a texture procedurally from a per-texel function.
    pub fn from_fn<S, F>(name: S, w: usize, h: usize, f: F) -> Self
    where
        S: Into<String>,
        F: Fn(usize, usize) -> Rgba,
    {
        let mut pixels = vec![0; w * h];
        for y in 0..h {
            for x in 0..w {
                pixels[y * w + x] = f(x, y);
            }
        }
        Self::new(name, w, h, pixels)
    }

    /// Red diagonal cross on black.
    pub fn red_cross(size: usize) -> Self {
        Self::from_fn("CROSS", size, size, |x, y| {
            if x != y && x != size.saturating_sub(y) {
                rgb(255, 0, 0)
            } else {
                rgb(0, 0, 0)
            }
        })
    }

    /// Green XOR pattern.
    pub fn xor_green(size: usize) -> Self {
        Self::from_fn("XOR", size, size, |x, y| {
            let v = ((x * 256 / size) ^ (y * 256 / size)).min(255) as u8;
            rgb(0, v, 0)
        })
    }

    /// Yellow diagonal gradient.
    pub fn yellow_gradient(size: usize) -> Self {
        Self::from_fn("GRAD", size, size, |x, y| {
            let v = (y * 128 / size + x * 128 / size).min(255) as u8;
            rgb(v, v, 0)
        })
    }
}

/// Magenta/black 8×8 checkerboard: the conventional "texture went missing"
/// marker, loud enough to spot in a frame.
impl Default for Texture {
    fn default() -> Self {
        Self::from_fn("MISSING", 8, 8, |x, y| {
            if (x ^ y) & 1 == 0 {
                rgb(255, 0, 255)
            } else {
                rgb(0, 0, 0)
            }
        })
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about PNG, WAD, OpenGL — that's the loader's job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
///
/// **Thread-safety:** access `TextureBank` from a single thread or wrap it
/// in `RwLock`; the struct itself is not `Sync`.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback. The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Bank preloaded with the three procedural demo textures
    /// (ids 1 = CROSS, 2 = XOR, 3 = GRAD).
    pub fn with_builtin_textures(size: usize) -> Self {
        let mut bank = Self::default_with_checker();
        for tex in [
            Texture::red_cross(size),
            Texture::xor_green(size),
            Texture::yellow_gradient(size),
        ] {
            let name = tex.name.clone();
            bank.insert(name, tex).expect("builtin names are unique");
        }
        bank
    }

    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Render-time query: a bad id degrades to the checkerboard and logs,
    /// so one stale id never kills a frame.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        match self.data.get(id as usize) {
            Some(tex) => tex,
            None => {
                log::warn!("texture id {id} out of range, using fallback");
                &self.data[NO_TEXTURE as usize]
            }
        }
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::half_bright;

    fn dummy_tex(color: Rgba) -> Texture {
        Texture::new("Dummy", 2, 2, vec![color; 4])
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(rgb(255, 0, 0))).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(rgb(0, 0, 255))).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().pixels[0], rgb(255, 0, 0));
        assert_eq!(bank.texture(blue).unwrap().pixels[0], rgb(0, 0, 255));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(rgb(1, 1, 1))).unwrap();
        let err = bank.insert("WOOD", dummy_tex(rgb(2, 2, 2))).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        // render-time path degrades instead of failing
        assert_eq!(bank.texture_or_missing(bad).name, "MISSING");
    }

    #[test]
    fn half_table_matches_pixels() {
        let tex = Texture::yellow_gradient(16);
        for (p, h) in tex.pixels.iter().zip(&tex.half_pixels) {
            assert_eq!(*h, half_bright(*p));
        }
    }

    #[test]
    fn builtin_bank_ids_are_stable() {
        let bank = TextureBank::with_builtin_textures(32);
        assert_eq!(bank.id("CROSS"), Some(1));
        assert_eq!(bank.id("XOR"), Some(2));
        assert_eq!(bank.id("GRAD"), Some(3));
        assert_eq!(bank.id_or_missing("nope"), NO_TEXTURE);
    }
}
