//! Parametric cutter geometry.
//!
//! A tool lives in its own local frame: `+z` is the cutter axis pointing
//! from the tip into the shank, with the tip at `z = 0`. The cutter family
//! is a closed set, so it is a sum type with exhaustive matching rather
//! than an open trait.
//!
//! ```text
//!      z = length ─┬──────┬─
//!                  │      │   shank (cylinder, radius r)
//!                  │      │
//!      Flat        │      │      BallEnd          BullNose
//!      z = 0 ──────┴──────┴─      `.____.´         │`.__.´│
//! ```

use glam::{Quat, Vec2, Vec3};

use crate::error::{MillError, Result};
use crate::geometry::Aabb;

/// Parametric cutter shape. Immutable value object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tool {
  /// Cylindrical end mill with a flat bottom at `z = 0`.
  Flat { diameter: f32, length: f32 },
  /// Hemispherical tip of radius `d/2` fused with a shank cylinder.
  BallEnd { diameter: f32, length: f32 },
  /// Flat mill with a rounded bottom rim of radius `corner_radius`.
  BullNose {
    diameter: f32,
    length: f32,
    corner_radius: f32,
  },
}

impl Tool {
  pub fn flat(diameter: f32, length: f32) -> Self {
    Tool::Flat { diameter, length }
  }

  pub fn ball_end(diameter: f32, length: f32) -> Self {
    Tool::BallEnd { diameter, length }
  }

  pub fn bull_nose(diameter: f32, length: f32, corner_radius: f32) -> Self {
    Tool::BullNose {
      diameter,
      length,
      corner_radius,
    }
  }

  #[inline]
  pub fn diameter(&self) -> f32 {
    match *self {
      Tool::Flat { diameter, .. }
      | Tool::BallEnd { diameter, .. }
      | Tool::BullNose { diameter, .. } => diameter,
    }
  }

  #[inline]
  pub fn radius(&self) -> f32 {
    self.diameter() * 0.5
  }

  #[inline]
  pub fn length(&self) -> f32 {
    match *self {
      Tool::Flat { length, .. } | Tool::BallEnd { length, .. } | Tool::BullNose { length, .. } => {
        length
      }
    }
  }

  /// Validate cutter dimensions. Cutting entry points call this before
  /// touching the grid, so a bad tool fails fast with `InvalidTool`.
  pub fn validate(&self) -> Result<()> {
    let r = self.radius();
    let len = self.length();
    if !(r > 0.0) || !r.is_finite() {
      return Err(MillError::InvalidTool(format!("radius {r} mm")));
    }
    if !(len > 0.0) || !len.is_finite() {
      return Err(MillError::InvalidTool(format!("length {len} mm")));
    }
    if let Tool::BullNose { corner_radius, .. } = *self {
      if !(corner_radius > 0.0) || corner_radius > r || corner_radius > len {
        return Err(MillError::InvalidTool(format!(
          "corner radius {corner_radius} mm on a {r} mm radius cutter"
        )));
      }
    }
    Ok(())
  }

  /// Signed distance from `p` (tool-local) to the cutter surface.
  /// Negative inside the cutter, positive outside.
  pub fn signed_distance(&self, p: Vec3) -> f32 {
    let r = self.radius();
    let len = self.length();
    match *self {
      Tool::Flat { .. } => capped_cylinder(p, r, len),
      Tool::BallEnd { .. } => {
        if p.z < r {
          // Tip sphere centered at (0, 0, r).
          Vec3::new(p.x, p.y, p.z - r).length() - r
        } else {
          capped_cylinder(p, r, len)
        }
      }
      Tool::BullNose { corner_radius, .. } => {
        let radial = p.truncate().length();
        if p.z < corner_radius && radial > r - corner_radius {
          // Rounded rim: torus section centered at (r - rc, rc) in the
          // radial half-plane.
          Vec2::new(radial - (r - corner_radius), p.z - corner_radius).length() - corner_radius
        } else {
          capped_cylinder(p, r, len)
        }
      }
    }
  }

  /// Tight local-frame AABB of the cutter.
  #[inline]
  pub fn local_aabb(&self) -> Aabb {
    let r = self.radius();
    Aabb::new(Vec3::new(-r, -r, 0.0), Vec3::new(r, r, self.length()))
  }
}

/// Signed distance to a capped cylinder of radius `r` spanning `z in
/// [0, length]`.
#[inline]
fn capped_cylinder(p: Vec3, r: f32, length: f32) -> f32 {
  let dr = p.truncate().length() - r;
  let dz = (-p.z).max(p.z - length);
  dr.max(dz).min(0.0) + Vec2::new(dr.max(0.0), dz.max(0.0)).length()
}

/// Spherically interpolate between two tool-axis directions.
///
/// Both inputs are normalized defensively; `t` sweeps the shortest arc
/// (antiparallel axes rotate through an arbitrary perpendicular, per
/// `Quat::from_rotation_arc`).
pub fn slerp_axis(a: Vec3, b: Vec3, t: f32) -> Vec3 {
  let a = a.try_normalize().unwrap_or(Vec3::Z);
  let b = b.try_normalize().unwrap_or(Vec3::Z);
  let arc = Quat::from_rotation_arc(a, b);
  (Quat::IDENTITY.slerp(arc, t) * a).normalize()
}

/// One instantaneous cutter placement: tip position plus axis orientation.
///
/// Caches the world-to-local rotation so the per-cell containment test in
/// the stamp kernels is a subtract and a quaternion rotate.
#[derive(Clone, Copy, Debug)]
pub struct ToolPose {
  tip: Vec3,
  axis: Vec3,
  world_to_local: Quat,
}

impl ToolPose {
  pub fn new(tip: Vec3, axis: Vec3) -> Self {
    let axis = axis.try_normalize().unwrap_or(Vec3::Z);
    Self {
      tip,
      axis,
      world_to_local: Quat::from_rotation_arc(axis, Vec3::Z),
    }
  }

  #[inline]
  pub fn tip(&self) -> Vec3 {
    self.tip
  }

  #[inline]
  pub fn axis(&self) -> Vec3 {
    self.axis
  }

  /// Transform a world point into the tool's local frame.
  #[inline]
  pub fn to_local(&self, p: Vec3) -> Vec3 {
    self.world_to_local * (p - self.tip)
  }

  /// World-space AABB of the cutter at this pose.
  pub fn world_aabb(&self, tool: &Tool) -> Aabb {
    let local = tool.local_aabb();
    let local_to_world = self.world_to_local.inverse();
    let mut world = Aabb::empty();
    for corner in 0..8u32 {
      let c = Vec3::new(
        if corner & 1 == 0 { local.min.x } else { local.max.x },
        if corner & 2 == 0 { local.min.y } else { local.max.y },
        if corner & 4 == 0 { local.min.z } else { local.max.z },
      );
      world.encapsulate(local_to_world * c + self.tip);
    }
    world
  }
}

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;
