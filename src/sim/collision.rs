//! Axis-aligned collision primitives
//!
//! Tiles, kill volumes and the player body are all boxes. The body only moves
//! in the XY plane, so penetration is resolved along X or Y, never Z.

use glam::Vec3;

/// Distance within which touching boxes still count as in contact
pub const CONTACT_SKIN: f32 = 0.02;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Point at the middle of the top face
    pub fn top_center(&self) -> Vec3 {
        self.center + Vec3::Y * self.half_extents.y
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(self.center, self.half_extents + Vec3::splat(margin))
    }

    /// Strict overlap (touching faces do not overlap)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x < reach.x && d.y < reach.y && d.z < reach.z
    }

    /// Overlap that also accepts boxes within `CONTACT_SKIN` of each other
    pub fn touches(&self, other: &Aabb) -> bool {
        self.expanded(CONTACT_SKIN).overlaps(other)
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min(), self.max())
    }
}

/// Sphere vs box overlap (ground probe test)
pub fn sphere_overlaps_aabb(center: Vec3, radius: f32, aabb: &Aabb) -> bool {
    let closest = aabb.closest_point(center);
    closest.distance_squared(center) <= radius * radius
}

/// Minimal translation that pushes `moving` out of `solid` along X or Y.
///
/// Returns `None` when the boxes do not overlap.
pub fn penetration(moving: &Aabb, solid: &Aabb) -> Option<Vec3> {
    if !moving.overlaps(solid) {
        return None;
    }
    let delta = moving.center - solid.center;
    let reach = moving.half_extents + solid.half_extents;
    let overlap_x = reach.x - delta.x.abs();
    let overlap_y = reach.y - delta.y.abs();

    if overlap_y <= overlap_x {
        let sign = if delta.y >= 0.0 { 1.0 } else { -1.0 };
        Some(Vec3::new(0.0, overlap_y * sign, 0.0))
    } else {
        let sign = if delta.x >= 0.0 { 1.0 } else { -1.0 };
        Some(Vec3::new(overlap_x * sign, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(center: Vec3) -> Aabb {
        Aabb::new(center, Vec3::splat(0.5))
    }

    #[test]
    fn test_touching_faces_do_not_overlap() {
        let a = unit_box(Vec3::ZERO);
        let b = unit_box(Vec3::new(1.0, 0.0, 0.0));
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
    }

    #[test]
    fn test_separated_boxes_do_not_touch() {
        let a = unit_box(Vec3::ZERO);
        let b = unit_box(Vec3::new(1.5, 0.0, 0.0));
        assert!(!a.touches(&b));
    }

    #[test]
    fn test_sphere_probe_under_body() {
        // Ground slab with top face at y = 0
        let ground = Aabb::new(Vec3::new(0.0, -0.25, 0.0), Vec3::new(2.0, 0.25, 1.0));
        assert!(sphere_overlaps_aabb(Vec3::new(0.0, 0.0, 0.0), 0.2, &ground));
        assert!(sphere_overlaps_aabb(Vec3::new(0.0, 0.15, 0.0), 0.2, &ground));
        assert!(!sphere_overlaps_aabb(Vec3::new(0.0, 0.3, 0.0), 0.2, &ground));
        assert!(!sphere_overlaps_aabb(Vec3::new(3.0, 0.0, 0.0), 0.2, &ground));
    }

    #[test]
    fn test_penetration_pushes_up_from_shallow_landing() {
        let ground = Aabb::new(Vec3::new(0.0, -0.25, 0.0), Vec3::new(2.0, 0.25, 1.0));
        let body = unit_box(Vec3::new(0.0, 0.45, 0.0));
        let mtv = penetration(&body, &ground).unwrap();
        assert!(mtv.x.abs() < 1e-6);
        assert!((mtv.y - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_penetration_pushes_sideways_into_wall() {
        let wall = Aabb::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.5, 3.0, 1.0));
        let body = unit_box(Vec3::new(1.1, 0.0, 0.0));
        let mtv = penetration(&body, &wall).unwrap();
        assert!((mtv.x + 0.1).abs() < 1e-5);
        assert_eq!(mtv.y, 0.0);
    }

    #[test]
    fn test_no_penetration_when_apart() {
        let a = unit_box(Vec3::ZERO);
        let b = unit_box(Vec3::new(0.0, 3.0, 0.0));
        assert!(penetration(&a, &b).is_none());
    }
}
