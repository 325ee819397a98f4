pub mod camera;
pub mod level;
pub mod primitive;
pub mod scene;
pub mod texture;

pub use camera::{Camera, CameraError, CameraOptions, OptionValue, Shading};
pub use level::{Entity, LevelData, LevelError, Tile, TileCode, WedgeOrient, builtin_levels};
pub use primitive::{BoxShape, CircleShape, Hit, Primitive, WedgeShape};
pub use scene::{Scene, SceneError, Sprite};
pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
