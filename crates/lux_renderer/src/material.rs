//! Material trait and the basic BSDFs.
//!
//! Every material answers three questions about a pair of directions around
//! a surface normal: how much light it scatters (`evaluate`), which outgoing
//! direction to explore next (`sample`), and how likely `sample` was to pick
//! a given direction (`pdf`). The integrator relies on `sample` and `pdf`
//! agreeing for the estimate to be unbiased.

use std::f64::consts::FRAC_1_PI;

use lux_math::{DVec3, ShadingFrame, EPSILON};
use rand::RngCore;

use crate::bsdf::{cook_torrance, fresnel, reflect, refract};
use crate::sampling::{gen_f64, uniform_hemisphere, UNIFORM_HEMISPHERE_PDF};

/// Color type alias (linear RGB radiance or reflectance)
pub type Color = DVec3;

/// Coarse classification of a BSDF, for introspection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Diffuse,
    Glossy,
    Reflective,
    Refractive,
    Microfacet,
    Dielectric,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// `wi` is the incoming ray direction (towards the surface), `wo` the
/// outgoing one (away from it), `n` the geometric normal.
pub trait Material: Send + Sync {
    /// BSDF value for the pair of directions. Not divided by the pdf.
    fn evaluate(&self, wi: DVec3, wo: DVec3, n: DVec3, rng: &mut dyn RngCore) -> Color;

    /// Draw an outgoing direction for an incoming one.
    fn sample(&self, wi: DVec3, frame: &ShadingFrame, rng: &mut dyn RngCore) -> DVec3;

    /// Solid-angle density of `sample` producing `wo`.
    fn pdf(&self, wi: DVec3, wo: DVec3, n: DVec3) -> f64;

    /// Emitted radiance. Black for non-emitters.
    fn emission(&self) -> Color {
        Color::ZERO
    }

    fn has_emission(&self) -> bool {
        self.emission().length_squared() > EPSILON
    }

    fn attribute(&self) -> Attribute;
}

/// Lambertian (diffuse) material, optionally emissive.
#[derive(Debug, Clone)]
pub struct Diffuse {
    kd: Color,
    emission: Color,
}

impl Diffuse {
    /// Create a new diffuse material with the given reflectance.
    pub fn new(kd: Color) -> Self {
        Self {
            kd,
            emission: Color::ZERO,
        }
    }

    /// Builder method to make this material an emitter.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn kd(&self) -> Color {
        self.kd
    }
}

impl Material for Diffuse {
    fn evaluate(&self, _wi: DVec3, wo: DVec3, n: DVec3, _rng: &mut dyn RngCore) -> Color {
        if n.dot(wo) > 0.0 {
            self.kd * FRAC_1_PI
        } else {
            Color::ZERO
        }
    }

    fn sample(&self, _wi: DVec3, frame: &ShadingFrame, rng: &mut dyn RngCore) -> DVec3 {
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
        Attribute::Diffuse
    }
}

/// Mirror reflection over a diffuse base.
///
/// Always samples the perfect mirror direction with pdf 1. The value blends
/// a Cook-Torrance lobe weighted by `ks` with a Lambertian term scaled by
/// the transmitted Fresnel fraction.
#[derive(Debug, Clone)]
pub struct Reflective {
    kd: Color,
    ks: Color,
    ior: f64,
    emission: Color,
}

/// Roughness of the specular lobe of [`Reflective`].
const REFLECTIVE_ROUGHNESS: f64 = 2.0;

impl Reflective {
    pub fn new(kd: Color, ks: Color, ior: f64) -> Self {
        Self {
            kd,
            ks,
            ior,
            emission: Color::ZERO,
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }
}

impl Material for Reflective {
    fn evaluate(&self, wi: DVec3, wo: DVec3, n: DVec3, _rng: &mut dyn RngCore) -> Color {
        if n.dot(wo) <= 0.0 {
            return Color::ZERO;
        }
        let k_d = 1.0 - fresnel(wi.normalize_or_zero(), n, 1.0, self.ior);
        let k_s = cook_torrance(wi, wo, n, REFLECTIVE_ROUGHNESS, 1.0, self.ior);
        self.ks * k_s + k_d * self.kd * FRAC_1_PI
    }

    fn sample(&self, wi: DVec3, frame: &ShadingFrame, _rng: &mut dyn RngCore) -> DVec3 {
        reflect(wi.normalize_or_zero(), frame.normal)
    }

    fn pdf(&self, _wi: DVec3, _wo: DVec3, _n: DVec3) -> f64 {
        1.0
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn attribute(&self) -> Attribute {
        Attribute::Reflective
    }
}

/// Smooth glass.
///
/// `evaluate` and `sample` each flip their own Fresnel coin between the
/// reflected and refracted event, so the value returned by one call is not
/// tied to the direction returned by the other. `pdf` is always 1.
#[derive(Debug, Clone)]
pub struct Dielectric {
    kd: Color,
    ior: f64,
    emission: Color,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(kd: Color, ior: f64) -> Self {
        Self {
            kd,
            ior,
            emission: Color::ZERO,
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }
}

impl Material for Dielectric {
    fn evaluate(&self, wi: DVec3, _wo: DVec3, n: DVec3, rng: &mut dyn RngCore) -> Color {
        let eta = if wi.dot(n) < 0.0 { 1.0 / self.ior } else { self.ior };
        let eta = eta.clamp(0.0, 1.0);
        let f = fresnel(wi.normalize_or_zero(), n, 1.0, self.ior);
        if gen_f64(rng) > f {
            Color::splat(eta * eta)
        } else {
            self.kd
        }
    }

    fn sample(&self, wi: DVec3, frame: &ShadingFrame, rng: &mut dyn RngCore) -> DVec3 {
        let wi = wi.normalize_or_zero();
        let f = fresnel(wi, frame.normal, 1.0, self.ior);
        if gen_f64(rng) > f {
            refract(wi, frame.normal, 1.0, self.ior)
        } else {
            reflect(wi, frame.normal)
        }
    }

    fn pdf(&self, _wi: DVec3, _wo: DVec3, _n: DVec3) -> f64 {
        1.0
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn attribute(&self) -> Attribute {
        Attribute::Dielectric
    }
}
