//! Distance-field primitives.
//!
//! Each shape answers one query: given a world point, how far is the
//! nearest surface, and how should the hit be shaded/textured. The query
//! is the marcher's hot path (`columns × steps × objects` calls per
//! frame), so it is a closed enum dispatch with no per-call allocation.

use glam::Vec2;

use crate::renderer::{Rgba, half_bright};
use crate::world::texture::TextureId;

/// Result of probing one primitive at one world point.
///
/// `distance` is unsigned and clamped to ≥ 0: points inside a shape read
/// as 0. `tex_u` is the normalized `[0, 1]` coordinate along the struck
/// edge; the rasterizer scales it by the texture width.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub distance: f32,
    pub is_side_hit: bool,
    pub color: Rgba,
    pub half_color: Rgba,
    pub tex_u: Option<f32>,
    pub texture: Option<TextureId>,
}

impl Hit {
    /// Sentinel for "nothing probed yet": infinitely far away.
    pub fn none() -> Self {
        Hit {
            distance: f32::INFINITY,
            is_side_hit: false,
            color: crate::renderer::GREEN,
            half_color: crate::renderer::RED,
            tex_u: None,
            texture: None,
        }
    }
}

/// Axis-aligned box occupying `[pos, pos + size]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Rgba,
    pub texture: Option<TextureId>,
}

/// Circle, rendered flat-colored (no texture metadata).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

/// Right triangle anchored at `a` with axis-aligned legs.
///
/// `legs` is signed, which mirrors the wedge into any of the four
/// quadrant orientations: vertices are `a`, `a + (legs.x, 0)` and
/// `a + (0, legs.y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WedgeShape {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
    pub color: Rgba,
    pub texture: Option<TextureId>,
}

impl WedgeShape {
    pub fn new(anchor: Vec2, legs: Vec2, color: Rgba, texture: Option<TextureId>) -> Self {
        WedgeShape {
            a: anchor,
            b: anchor + Vec2::new(legs.x, 0.0),
            c: anchor + Vec2::new(0.0, legs.y),
            color,
            texture,
        }
    }
}

/// Closed set of shapes the marcher knows how to trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Box(BoxShape),
    Circle(CircleShape),
    Wedge(WedgeShape),
}

impl Primitive {
    /// Unsigned clamped distance from `p` to this primitive's boundary,
    /// plus shading metadata. Pure; never panics for finite input.
    pub fn probe(&self, p: Vec2) -> Hit {
        match self {
            Primitive::Box(b) => probe_box(b, p),
            Primitive::Circle(c) => probe_circle(c, p),
            Primitive::Wedge(w) => probe_wedge(w, p),
        }
    }
}

fn probe_box(b: &BoxShape, p: Vec2) -> Hit {
    // Outside-only rectangle distance: per-axis overshoot, zero inside.
    let dx = (b.pos.x - p.x).max(p.x - (b.pos.x + b.size.x)).max(0.0);
    let dy = (b.pos.y - p.y).max(p.y - (b.pos.y + b.size.y)).max(0.0);
    let distance = (dx * dx + dy * dy).sqrt();

    // dx dominating means the ray approaches a vertical edge.
    let is_side_hit = dx >= dy;

    let tex_u = if is_side_hit {
        ((b.pos.y - p.y).abs() / b.size.y).clamp(0.0, 1.0)
    } else {
        ((b.pos.x - p.x).abs() / b.size.x).clamp(0.0, 1.0)
    };

    Hit {
        distance,
        is_side_hit,
        color: b.color,
        half_color: half_bright(b.color),
        tex_u: Some(tex_u),
        texture: b.texture,
    }
}

fn probe_circle(c: &CircleShape, p: Vec2) -> Hit {
    let distance = (p.distance(c.center) - c.radius).max(0.0);
    Hit {
        distance,
        is_side_hit: false,
        color: c.color,
        half_color: half_bright(c.color),
        tex_u: None,
        texture: None,
    }
}

/// Distance from `p` to segment `v0..v1` plus the clamped edge parameter.
fn segment_distance(p: Vec2, v0: Vec2, v1: Vec2) -> (f32, f32) {
    let edge = v1 - v0;
    let len_sq = edge.length_squared();
    let t = if len_sq > 0.0 {
        ((p - v0).dot(edge) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p.distance(v0 + edge * t), t)
}

fn probe_wedge(w: &WedgeShape, p: Vec2) -> Hit {
    // Convex interior test: p on the same side of every edge as the
    // opposite vertex. Works for either winding.
    let side = |v0: Vec2, v1: Vec2, q: Vec2| (v1 - v0).perp_dot(q - v0);
    let d_ab = side(w.a, w.b, p) * side(w.a, w.b, w.c);
    let d_bc = side(w.b, w.c, p) * side(w.b, w.c, w.a);
    let d_ca = side(w.c, w.a, p) * side(w.c, w.a, w.b);
    let inside = d_ab >= 0.0 && d_bc >= 0.0 && d_ca >= 0.0;

    // Edges in fixed order: AB (horizontal leg), BC (hypotenuse),
    // CA (vertical leg).
    let (ab, u_ab) = segment_distance(p, w.a, w.b);
    let (bc, u_bc) = segment_distance(p, w.b, w.c);
    let (ca, u_ca) = segment_distance(p, w.c, w.a);

    let (distance, is_side_hit, tex_u) = if ab <= bc && ab <= ca {
        (ab, false, u_ab)
    } else if bc <= ca {
        (bc, false, u_bc)
    } else {
        // vertical leg dominates, same shading cue as a box side hit
        (ca, true, u_ca)
    };

    Hit {
        distance: if inside { 0.0 } else { distance },
        is_side_hit,
        color: w.color,
        half_color: half_bright(w.color),
        tex_u: Some(tex_u),
        texture: w.texture,
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
