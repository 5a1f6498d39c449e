//! Cook-Torrance microfacet material with a GGX distribution.
//!
//! Metallic/roughness parameterization: `metallic` blends the normal-incidence
//! reflectance from 0.04 (dielectric) to `kd` (metal) and fades out the
//! Lambertian base.

use std::f64::consts::FRAC_1_PI;

use lux_math::{DVec3, ShadingFrame};
use rand::RngCore;

use crate::bsdf::{distribution_ggx, fresnel_schlick, geometry_smith};
use crate::material::{Attribute, Color, Material};
use crate::sampling::{gen_f64, uniform_hemisphere, UNIFORM_HEMISPHERE_PDF};

/// Normal-incidence reflectance of non-metals.
const DIELECTRIC_F0: f64 = 0.04;

/// Added to the specular denominator to keep grazing configurations finite.
const SPECULAR_DENOM_BIAS: f64 = 1e-2;

#[derive(Debug, Clone)]
pub struct Microfacet {
    /// Base color: albedo for dielectrics, reflectance for metals
    pub kd: Color,
    /// 0 = mirror-like, 1 = very rough
    pub roughness: f64,
    /// 0 = dielectric, 1 = metal
    pub metallic: f64,
    pub emission: Color,
}

impl Default for Microfacet {
    fn default() -> Self {
        Self {
            kd: Color::splat(0.5),
            roughness: 0.6,
            metallic: 1.0,
            emission: Color::ZERO,
        }
    }
}

impl Microfacet {
    pub fn new(kd: Color, roughness: f64, metallic: f64) -> Self {
        Self {
            kd,
            roughness: roughness.clamp(0.0, 1.0),
            metallic: metallic.clamp(0.0, 1.0),
            emission: Color::ZERO,
        }
    }

    /// Builder method to make this material an emitter.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }
}

impl Material for Microfacet {
    fn evaluate(&self, wi: DVec3, wo: DVec3, n: DVec3, _rng: &mut dyn RngCore) -> Color {
        if n.dot(wo) <= 0.0 {
            return Color::ZERO;
        }

        let v = -wi.normalize_or_zero();
        let l = wo;
        let h = (v + l).normalize_or_zero();

        let f0 = Color::splat(DIELECTRIC_F0).lerp(self.kd, self.metallic);
        let alpha = self.roughness * self.roughness;
        let k = (self.roughness + 1.0).powi(2) / 8.0;

        let n_dot_l = n.dot(l).max(0.0);
        let n_dot_v = n.dot(v).max(0.0);
        let h_dot_v = h.dot(v).clamp(0.0, 1.0);

        let f = fresnel_schlick(h_dot_v, f0);
        let g = geometry_smith(n, v, l, k);
        let d = distribution_ggx(n, h, alpha);

        let specular = f * g * d / (4.0 * n_dot_l * n_dot_v + SPECULAR_DENOM_BIAS);
        let diffuse_weight = (Color::ONE - f) * (1.0 - self.metallic);

        specular + diffuse_weight * self.kd * FRAC_1_PI
    }

    fn sample(&self, _wi: DVec3, frame: &ShadingFrame, rng: &mut dyn RngCore) -> DVec3 {
        // TODO: importance-sample the GGX lobe; pdf() must change with it
        let local = uniform_hemisphere(gen_f64(rng), gen_f64(rng));
        frame.to_world(local)
    }

    fn pdf(&self, _wi: DVec3, wo: DVec3, n: DVec3) -> f64 {
        if wo.dot(n) > 0.0 {
            UNIFORM_HEMISPHERE_PDF
        } else {
            0.0
        }
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn attribute(&self) -> Attribute {
        Attribute::Microfacet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_microfacet_default() {
        let mat = Microfacet::default();
        assert!((mat.roughness - 0.6).abs() < 1e-12);
        assert!((mat.metallic - 1.0).abs() < 1e-12);
        assert!(!mat.has_emission());
        assert_eq!(mat.attribute(), Attribute::Microfacet);
    }

    #[test]
    fn test_parameters_are_clamped() {
        let mat = Microfacet::new(Color::ONE, 3.0, -1.0);
        assert_eq!(mat.roughness, 1.0);
        assert_eq!(mat.metallic, 0.0);
    }

    #[test]
    fn test_zero_below_surface() {
        let mut rng = StdRng::seed_from_u64(0);
        let mat = Microfacet::new(Color::splat(0.8), 0.4, 0.0);
        let n = DVec3::Y;
        let wi = DVec3::new(0.3, -1.0, 0.0);
        assert_eq!(mat.evaluate(wi, DVec3::new(0.0, -1.0, 0.2), n, &mut rng), Color::ZERO);
        assert_eq!(mat.pdf(wi, DVec3::new(0.0, -1.0, 0.2), n), 0.0);
    }

    #[test]
    fn test_specular_peak_in_mirror_direction() {
        let mut rng = StdRng::seed_from_u64(0);
        let mat = Microfacet::new(Color::splat(0.9), 0.2, 1.0);
        let n = DVec3::Y;
        let wi = DVec3::new(1.0, -1.0, 0.0).normalize();
        let mirror = DVec3::new(1.0, 1.0, 0.0).normalize();
        let off = DVec3::new(-0.5, 1.0, 0.3).normalize();
        let peak = mat.evaluate(wi, mirror, n, &mut rng);
        let side = mat.evaluate(wi, off, n, &mut rng);
        assert!(peak.x > side.x * 5.0);
    }

    #[test]
    fn test_dielectric_base_keeps_diffuse_lobe() {
        let mut rng = StdRng::seed_from_u64(0);
        let metal = Microfacet::new(Color::splat(0.8), 1.0, 1.0);
        let plastic = Microfacet::new(Color::splat(0.8), 1.0, 0.0);
        let n = DVec3::Z;
        let wi = DVec3::new(0.0, 0.7, -1.0).normalize();
        let wo = DVec3::new(0.6, 0.0, 0.8);
        // Off-specular, a rough plastic keeps its Lambertian base
        let p = plastic.evaluate(wi, wo, n, &mut rng);
        assert!(p.x > 0.8 * FRAC_1_PI * 0.5);
        assert!(metal.evaluate(wi, wo, n, &mut rng).x > 0.0);
    }

    #[test]
    fn test_energy_does_not_explode() {
        // Albedo estimate of a rough dielectric stays below one
        let mut rng = StdRng::seed_from_u64(21);
        let mat = Microfacet::new(Color::splat(0.8), 0.8, 0.0);
        let n = DVec3::Z;
        let frame = ShadingFrame::from_normal(n);
        let wi = DVec3::new(0.3, 0.0, -1.0).normalize();

        let samples = 20_000;
        let mut sum = Color::ZERO;
        for _ in 0..samples {
            let wo = mat.sample(wi, &frame, &mut rng);
            let pdf = mat.pdf(wi, wo, n);
            if pdf > 0.0 {
                sum += mat.evaluate(wi, wo, n, &mut rng) * wo.dot(n) / pdf;
            }
        }
        let albedo = sum / samples as f64;
        assert!(albedo.x > 0.3 && albedo.x < 1.05, "albedo = {:?}", albedo);
    }
}
