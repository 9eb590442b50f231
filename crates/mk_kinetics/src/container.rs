use glam::DVec3;

/// Separation below which two bodies are in contact (world units).
pub const CONTACT_DISTANCE: f64 = 0.6;

/// World-space speed per m/s of physical relative velocity.
pub const WORLD_SPEED_PER_MPS: f64 = 0.01;

/// World-space trajectory offset per Angstrom of impact parameter.
pub const WORLD_OFFSET_PER_ANGSTROM: f64 = 0.3;

/// Impact parameter (Angstrom) beyond which a single-collision run
/// misses the target entirely: the offset trajectory never comes within
/// [`CONTACT_DISTANCE`].
pub const MISS_IMPACT_PARAMETER: f64 = CONTACT_DISTANCE / WORLD_OFFSET_PER_ANGSTROM;

/// Axis-aligned cuboid bounding the simulation volume.
///
/// Fixed for the lifetime of a rate-mode run; bodies bounce elastically
/// off its faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerBounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for ContainerBounds {
    fn default() -> Self {
        Self {
            min: DVec3::splat(-5.0),
            max: DVec3::splat(5.0),
        }
    }
}

impl ContainerBounds {
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Reflect a body at the container walls: clamp the position inside
    /// and flip the velocity component along each violated axis.
    /// Returns `None` when no wall was hit.
    pub fn reflect(&self, position: DVec3, velocity: DVec3) -> Option<(DVec3, DVec3)> {
        let mut p = position;
        let mut v = velocity;
        let mut bounced = false;

        for axis in 0..3 {
            if p[axis] < self.min[axis] {
                p[axis] = self.min[axis];
                v[axis] = v[axis].abs();
                bounced = true;
            } else if p[axis] > self.max[axis] {
                p[axis] = self.max[axis];
                v[axis] = -v[axis].abs();
                bounced = true;
            }
        }
        bounced.then_some((p, v))
    }

    /// Extent along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let bounds = ContainerBounds::default();
        assert!(bounds.contains(DVec3::ZERO));
        assert!(bounds.contains(DVec3::splat(5.0)));
        assert!(!bounds.contains(DVec3::new(5.1, 0.0, 0.0)));
    }

    #[test]
    fn test_no_reflection_inside() {
        let bounds = ContainerBounds::default();
        assert!(bounds.reflect(DVec3::ZERO, DVec3::X).is_none());
    }

    #[test]
    fn test_reflection_flips_velocity() {
        let bounds = ContainerBounds::default();
        let (p, v) = bounds
            .reflect(DVec3::new(5.2, 0.0, 0.0), DVec3::new(1.0, 0.5, 0.0))
            .unwrap();
        assert_eq!(p.x, 5.0);
        assert_eq!(v, DVec3::new(-1.0, 0.5, 0.0));

        let (p, v) = bounds
            .reflect(DVec3::new(0.0, -5.3, 0.0), DVec3::new(0.0, -2.0, 0.0))
            .unwrap();
        assert_eq!(p.y, -5.0);
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn test_corner_reflection() {
        let bounds = ContainerBounds::default();
        let (p, v) = bounds
            .reflect(DVec3::new(5.5, 5.5, 0.0), DVec3::new(1.0, 1.0, 1.0))
            .unwrap();
        assert_eq!(p, DVec3::new(5.0, 5.0, 0.0));
        assert_eq!(v, DVec3::new(-1.0, -1.0, 1.0));
    }
}
