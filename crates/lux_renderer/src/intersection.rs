//! Intersection record for ray-object queries.

use lux_math::{DVec3, ShadingFrame};

use crate::{Color, Material};

/// Record of a ray-object intersection.
///
/// A fresh record has `distance == f64::INFINITY`, meaning "nothing hit yet".
/// Objects only overwrite it with closer hits, so threading one record
/// through several queries leaves it holding the closest one.
#[derive(Clone)]
pub struct Intersection<'a> {
    /// World-space hit point
    pub coordinate: DVec3,
    /// Unit geometric normal (outward for closed shapes)
    pub normal: DVec3,
    /// Tangent frame around `normal`
    pub shading: ShadingFrame,
    /// Material of the surface that was hit
    pub material: Option<&'a dyn Material>,
    /// Ray parameter of the hit
    pub distance: f64,
}

impl Default for Intersection<'_> {
    fn default() -> Self {
        Self {
            coordinate: DVec3::ZERO,
            normal: DVec3::Z,
            shading: ShadingFrame::default(),
            material: None,
            distance: f64::INFINITY,
        }
    }
}

impl std::fmt::Debug for Intersection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intersection")
            .field("coordinate", &self.coordinate)
            .field("normal", &self.normal)
            .field("distance", &self.distance)
            .field("material", &self.material.map(|m| m.attribute()))
            .finish()
    }
}

impl<'a> Intersection<'a> {
    /// Fill in a hit. The shading frame is rebuilt from `normal`.
    pub fn record(&mut self, distance: f64, coordinate: DVec3, normal: DVec3, material: &'a dyn Material) {
        self.distance = distance;
        self.coordinate = coordinate;
        self.normal = normal;
        self.shading = ShadingFrame::from_normal(normal);
        self.material = Some(material);
    }

    /// True once some object has written a hit.
    pub fn is_hit(&self) -> bool {
        self.distance.is_finite()
    }

    pub fn has_emission(&self) -> bool {
        self.material.is_some_and(|m| m.has_emission())
    }

    pub fn emission(&self) -> Color {
        self.material.map_or(Color::ZERO, |m| m.emission())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Diffuse;

    #[test]
    fn test_default_is_no_hit() {
        let rec = Intersection::default();
        assert!(!rec.is_hit());
        assert!(rec.material.is_none());
        assert!(!rec.has_emission());
        assert_eq!(rec.emission(), Color::ZERO);
    }

    #[test]
    fn test_record_sets_frame() {
        let light = Diffuse::new(Color::ONE).with_emission(Color::splat(4.0));
        let mut rec = Intersection::default();
        let n = DVec3::new(0.0, 1.0, 1.0).normalize();
        rec.record(2.5, DVec3::new(1.0, 2.0, 3.0), n, &light);

        assert!(rec.is_hit());
        assert_eq!(rec.distance, 2.5);
        assert_eq!(rec.shading.normal, n);
        assert!(rec.has_emission());
        assert_eq!(rec.emission(), Color::splat(4.0));
    }
}
