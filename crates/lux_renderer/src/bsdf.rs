//! Shared BSDF geometry: reflection, refraction, Fresnel and the GGX
//! microfacet terms.
//!
//! Direction conventions: `wi` points *towards* the surface (the incoming
//! ray direction), `wo` points away from it.

use std::f64::consts::PI;

use lux_math::{DVec3, EPSILON};

use crate::Color;

/// Mirror `wi` about `n`.
#[inline]
pub fn reflect(wi: DVec3, n: DVec3) -> DVec3 {
    wi - 2.0 * wi.dot(n) * n
}

/// Refract `wi` through a surface with normal `n`.
///
/// `ior_in` is the index on the side `n` points to. A ray arriving from the
/// other side swaps the indices. Returns the zero vector on total internal
/// reflection.
pub fn refract(wi: DVec3, n: DVec3, ior_in: f64, ior_out: f64) -> DVec3 {
    let mut cos_i = wi.dot(n).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (ior_in, ior_out);
    let mut normal = n;
    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut eta_i, &mut eta_t);
        normal = -n;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return DVec3::ZERO;
    }
    eta * wi + (eta * cos_i - k.sqrt()) * normal
}

/// Unpolarized dielectric Fresnel reflectance.
///
/// Returns 1 on total internal reflection.
pub fn fresnel(wi: DVec3, n: DVec3, ior_in: f64, ior_out: f64) -> f64 {
    let cos_i = wi.dot(n).clamp(-1.0, 1.0);
    let (eta_i, eta_t) = if cos_i > 0.0 {
        (ior_out, ior_in)
    } else {
        (ior_in, ior_out)
    };

    let sin_t = eta_i / eta_t * (1.0 - cos_i * cos_i).max(0.0).sqrt();
    if sin_t >= 1.0 {
        return 1.0;
    }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    let cos_i = cos_i.abs();
    let rs = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let rp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    (rs * rs + rp * rp) / 2.0
}

/// Schlick's approximation with a per-channel normal-incidence reflectance.
#[inline]
pub fn fresnel_schlick(cos_theta: f64, f0: Color) -> Color {
    f0 + (Color::ONE - f0) * (1.0 - cos_theta).clamp(0.0, 1.0).powi(5)
}

/// GGX / Trowbridge-Reitz normal distribution.
pub fn distribution_ggx(n: DVec3, h: DVec3, alpha: f64) -> f64 {
    let a2 = alpha * alpha;
    let n_dot_h = n.dot(h).max(0.0);
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (PI * denom * denom)
}

#[inline]
fn geometry_schlick_ggx(n_dot_v: f64, k: f64) -> f64 {
    n_dot_v / (n_dot_v * (1.0 - k) + k)
}

/// Smith shadowing-masking with the Schlick-GGX term for both directions.
pub fn geometry_smith(n: DVec3, v: DVec3, l: DVec3, k: f64) -> f64 {
    let n_dot_v = n.dot(v).max(0.0);
    let n_dot_l = n.dot(l).max(0.0);
    geometry_schlick_ggx(n_dot_v, k) * geometry_schlick_ggx(n_dot_l, k)
}

/// Scalar Cook-Torrance specular term with exact dielectric Fresnel.
pub fn cook_torrance(wi: DVec3, wo: DVec3, n: DVec3, roughness: f64, ior_in: f64, ior_out: f64) -> f64 {
    let wi = wi.normalize_or_zero();
    let v = -wi;
    let l = wo;
    let h = (v + l).normalize_or_zero();

    let n_dot_l = n.dot(l);
    let n_dot_v = n.dot(v);

    let f = fresnel(wi, n, ior_in, ior_out);
    let k = (roughness + 1.0).powi(2) * 0.125;
    let g = geometry_smith(n, v, l, k);
    let d = distribution_ggx(n, h, roughness * roughness);

    let denom = 4.0 * n_dot_l * n_dot_v;
    if denom.abs() < EPSILON {
        return 0.0;
    }
    f * g * d / denom
}
