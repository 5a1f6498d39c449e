//! Radiance estimators.
//!
//! [`PathIntegrator`] is a unidirectional path tracer with next-event
//! estimation at every vertex and Russian roulette termination.
//! [`NormalIntegrator`] visualizes first-hit normals for debugging.

use lux_math::{DVec3, Ray, EPSILON, HIT_EPSILON};
use rand::RngCore;

use crate::sampling::gen_f64;
use crate::scene::Scene;
use crate::{Color, Intersection, Material};

/// Shadow rays count as unoccluded if their closest hit lands this close
/// to the sampled light point.
const SHADOW_TOLERANCE: f64 = 1e-2;

/// Estimates incident radiance along a camera ray.
pub trait Integrator: Send + Sync {
    fn li(&self, ray: &Ray, scene: &Scene, rng: &mut dyn RngCore) -> Color;
}

/// Shades the first hit with the absolute value of its normal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalIntegrator;

impl Integrator for NormalIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, _rng: &mut dyn RngCore) -> Color {
        scene.hit(ray).map_or(Color::ZERO, |hit| hit.normal.abs())
    }
}

/// Monte Carlo path tracer.
#[derive(Debug, Clone, Copy)]
pub struct PathIntegrator {
    /// Bounces before Russian roulette kicks in
    pub rr_start_depth: u32,
    /// Hard cap on path length
    pub max_depth: u32,
}

impl Default for PathIntegrator {
    fn default() -> Self {
        Self {
            rr_start_depth: 3,
            max_depth: 64,
        }
    }
}

/// Russian roulette on the red channel of `throughput`.
///
/// Survival probability is `min(throughput.x, 0.9)`. Returns the
/// compensated throughput if the path survives the draw `u`, `None` if it is
/// killed. The expected value of the result equals `throughput`.
pub fn russian_roulette(throughput: Color, u: f64) -> Option<Color> {
    let survival = throughput.x.min(0.9);
    if survival <= 0.0 || u > survival {
        return None;
    }
    Some(throughput / survival)
}

impl PathIntegrator {
    /// Light arriving at `hit` straight from one sampled emitter point.
    fn direct_light(
        &self,
        scene: &Scene,
        hit: &Intersection<'_>,
        material: &dyn Material,
        wi: DVec3,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Ok(light) = scene.sample_light(rng) else {
            return Color::ZERO;
        };
        let light_point = light.intersection.coordinate;

        let to_light = light_point - hit.coordinate;
        let dist2 = to_light.length_squared();
        let Some(ws) = to_light.try_normalize() else {
            return Color::ZERO;
        };
        if light.pdf <= 0.0 || dist2 < EPSILON {
            return Color::ZERO;
        }

        let shadow = Ray::spawn(hit.coordinate, hit.normal, ws, HIT_EPSILON);
        let reached = scene
            .hit(&shadow)
            .is_some_and(|blocker| (blocker.coordinate - light_point).length() < SHADOW_TOLERANCE);
        if !reached {
            return Color::ZERO;
        }

        let cos = (hit.normal.dot(ws) * light.intersection.normal.dot(-ws)).abs();
        light.intersection.emission() * material.evaluate(wi, ws, hit.normal, rng) * cos / (dist2 * light.pdf)
    }
}

impl Integrator for PathIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, rng: &mut dyn RngCore) -> Color {
        let mut color = Color::ZERO;
        let mut throughput = Color::ONE;
        let mut ray = *ray;
        let mut current = scene.hit(&ray);
        let mut depth = 0;

        while let Some(hit) = current {
            if depth >= self.max_depth {
                break;
            }
            let Some(material) = hit.material else {
                break;
            };
            let wi = ray.direction();

            if material.has_emission() {
                color += material.emission() * throughput;
            }
            color += throughput * self.direct_light(scene, &hit, material, wi, rng);

            depth += 1;
            if depth > self.rr_start_depth {
                match russian_roulette(throughput, gen_f64(rng)) {
                    Some(t) => throughput = t,
                    None => break,
                }
            }

            let wo = material.sample(wi, &hit.shading, rng).normalize_or_zero();
            if wo == DVec3::ZERO {
                break;
            }
            let next_ray = Ray::spawn(hit.coordinate, hit.normal, wo, HIT_EPSILON);
            let next = scene.hit(&next_ray);

            // Emitters reached by the bounce are added unweighted next iteration
            if next.as_ref().is_some_and(|n| !n.has_emission()) {
                let pdf = material.pdf(wi, wo, hit.normal);
                if pdf < EPSILON {
                    break;
                }
                throughput *= material.evaluate(wi, wo, hit.normal, rng) * wo.dot(hit.normal).abs() / pdf;
            }

            if !throughput.is_finite() {
                break;
            }
            ray = next_ray;
            current = next;
        }

        color.clamp(Color::ZERO, Color::ONE)
    }
}
