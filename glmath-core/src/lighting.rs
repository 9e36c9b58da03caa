/// Per-vertex Lambert shading and linear fog
use crate::vector::Vec3;

/// Light arriving from a fixed direction, like sunlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction pointing from the surface towards the light
    pub direction: Vec3,
    pub color: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            color,
        }
    }

    /// Diffuse reflection of `base` for a surface with normal `normal`.
    pub fn diffuse(&self, normal: Vec3, base: Vec3) -> Vec3 {
        diffuse(self.direction, self.color, normal, base)
    }
}

/// Light radiating from a point in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }

    pub fn diffuse(&self, position: Vec3, normal: Vec3, base: Vec3) -> Vec3 {
        let to_light = (self.position - position).normalize();
        diffuse(to_light, self.color, normal, base)
    }
}

/// `light * base * max(dot(to_light, n), 0)`.
///
/// `normal` need not be unit length.
pub fn diffuse(to_light: Vec3, light: Vec3, normal: Vec3, base: Vec3) -> Vec3 {
    let cos = to_light.dot(normal.normalize()).max(0.0);
    light.mul_elem(base) * cos
}

pub fn ambient(ambient: Vec3, base: Vec3) -> Vec3 {
    ambient.mul_elem(base)
}

/// Point-light diffuse plus ambient.
pub fn shade_point(
    light: &PointLight,
    ambient_color: Vec3,
    position: Vec3,
    normal: Vec3,
    base: Vec3,
) -> Vec3 {
    light.diffuse(position, normal, base) + ambient(ambient_color, base)
}

/// Linear fog range in eye-distance units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Vec3,
    pub start: f32,
    pub end: f32,
}

impl Fog {
    pub fn new(color: Vec3, start: f32, end: f32) -> Self {
        Self { color, start, end }
    }

    /// Visibility in `[0, 1]`: 1 before `start`, 0 past `end`.
    pub fn factor(&self, distance: f32) -> f32 {
        fog_factor(distance, self.start, self.end)
    }

    pub fn apply(&self, color: Vec3, distance: f32) -> Vec3 {
        mix_fog(color, self.color, self.factor(distance))
    }
}

/// `(end - d) / (end - start)` clamped to `[0, 1]`.
///
/// A zero-width range degrades to a hard cut at `end`.
pub fn fog_factor(distance: f32, start: f32, end: f32) -> f32 {
    let range = end - start;
    if range == 0.0 {
        return if distance < end { 1.0 } else { 0.0 };
    }
    ((end - distance) / range).clamp(0.0, 1.0)
}

/// `color * factor + fog * (1 - factor)`.
pub fn mix_fog(color: Vec3, fog: Vec3, factor: f32) -> Vec3 {
    color * factor + fog * (1.0 - factor)
}
