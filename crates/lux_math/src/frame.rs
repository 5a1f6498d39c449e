use crate::DVec3;

/// Orthonormal tangent frame around a surface normal.
///
/// Local shading space is Z-up: `normal` is +Z, `tangent_x` and `tangent_y`
/// span the tangent plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadingFrame {
    pub tangent_x: DVec3,
    pub tangent_y: DVec3,
    pub normal: DVec3,
}

impl Default for ShadingFrame {
    fn default() -> Self {
        Self {
            tangent_x: DVec3::X,
            tangent_y: DVec3::Y,
            normal: DVec3::Z,
        }
    }
}

impl ShadingFrame {
    /// Build a frame from a unit normal.
    ///
    /// The first tangent is taken perpendicular to the normal in the plane that
    /// drops the normal's smaller of |x| and |y|, which keeps it well conditioned.
    pub fn from_normal(normal: DVec3) -> Self {
        let tangent_y = if normal.x.abs() > normal.y.abs() {
            let inv_len = 1.0 / (normal.x * normal.x + normal.z * normal.z).sqrt();
            DVec3::new(normal.z * inv_len, 0.0, -normal.x * inv_len)
        } else {
            let inv_len = 1.0 / (normal.y * normal.y + normal.z * normal.z).sqrt();
            DVec3::new(0.0, normal.z * inv_len, -normal.y * inv_len)
        };
        let tangent_x = tangent_y.cross(normal).normalize();

        Self {
            tangent_x,
            tangent_y,
            normal,
        }
    }

    /// Transform a world-space direction into local shading space.
    #[inline]
    pub fn to_local(&self, v: DVec3) -> DVec3 {
        DVec3::new(v.dot(self.tangent_x), v.dot(self.tangent_y), v.dot(self.normal))
    }

    /// Transform a local shading-space direction into world space.
    #[inline]
    pub fn to_world(&self, v: DVec3) -> DVec3 {
        self.tangent_x * v.x + self.tangent_y * v.y + self.normal * v.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(frame: &ShadingFrame) {
        assert!((frame.tangent_x.length() - 1.0).abs() < 1e-9);
        assert!((frame.tangent_y.length() - 1.0).abs() < 1e-9);
        assert!(frame.tangent_x.dot(frame.tangent_y).abs() < 1e-9);
        assert!(frame.tangent_x.dot(frame.normal).abs() < 1e-9);
        assert!(frame.tangent_y.dot(frame.normal).abs() < 1e-9);
    }

    #[test]
    fn test_frame_is_orthonormal() {
        for n in [
            DVec3::X,
            DVec3::NEG_Y,
            DVec3::Z,
            DVec3::new(1.0, 2.0, 3.0).normalize(),
            DVec3::new(-0.7, 0.1, -0.2).normalize(),
        ] {
            assert_orthonormal(&ShadingFrame::from_normal(n));
        }
    }

    #[test]
    fn test_local_z_maps_to_normal() {
        let n = DVec3::new(0.3, -0.4, 0.8).normalize();
        let frame = ShadingFrame::from_normal(n);
        assert!((frame.to_world(DVec3::Z) - n).length() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let frame = ShadingFrame::from_normal(DVec3::new(-1.0, 0.5, 0.25).normalize());
        let v = DVec3::new(0.2, -0.9, 0.4);
        let back = frame.to_world(frame.to_local(v));
        assert!((back - v).length() < 1e-12);
    }
}
