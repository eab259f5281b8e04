//! Kinematic stand-in for the player's rigid body
//!
//! Gravity, one-shot impulses and box resolution against solid tiles. Depth
//! (Z) is frozen and the body never rotates physically; the visible spin is
//! tracked by the player controller alone.

use glam::Vec3;

use super::collision::{self, Aabb};
use super::tile::TileId;

#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Always zero while rotation is frozen; cleared on death and respawn
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub half_extents: Vec3,
    /// Tile currently carrying the body
    pub attached_to: Option<TileId>,
}

impl Body {
    pub fn new(position: Vec3, mass: f32, half_extents: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            half_extents,
            attached_to: None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Instantaneous change in momentum
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.mass;
        self.velocity.z = 0.0;
    }

    /// Stop all motion
    pub fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Move to `position` at rest, detached from any tile
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.halt();
        self.attached_to = None;
    }

    /// Semi-implicit Euler step under gravity
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.velocity.y -= gravity * dt;
        self.velocity.z = 0.0;
        self.position += self.velocity * dt;
    }

    /// Push the body out of every solid it overlaps, cancelling the velocity
    /// component that drove it in. Standing on a solid stops sliding.
    ///
    /// Returns `true` if something supports the body from below.
    pub fn resolve<'a>(&mut self, solids: impl IntoIterator<Item = &'a Aabb>) -> bool {
        let mut supported = false;
        for solid in solids {
            let Some(mtv) = collision::penetration(&self.aabb(), solid) else {
                continue;
            };
            self.position += mtv;
            if mtv.y != 0.0 && self.velocity.y * mtv.y < 0.0 {
                self.velocity.y = 0.0;
            }
            if mtv.x != 0.0 && self.velocity.x * mtv.x < 0.0 {
                self.velocity.x = 0.0;
            }
            if mtv.y > 0.0 {
                supported = true;
                self.velocity.x = 0.0;
            }
        }
        supported
    }
}
