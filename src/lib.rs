//! 2.5D pseudo-3D renderer: SDF sphere tracing + raycaster column projection.
//!
//! The scene is a tile grid of distance-field primitives (boxes, circles,
//! wedges). One ray is marched per screen column; the resulting collision
//! records drive a classic column rasterizer (walls, floor/ceiling casting,
//! depth-sorted sprite billboards against a per-column z-buffer).
//!
//! The crate is a library invoked by a host frame loop; `src/main.rs` is a
//! minimal `minifb` demo of that loop.

pub mod renderer;
pub mod world;
