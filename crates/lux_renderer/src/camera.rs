//! Cameras for ray generation.

use lux_math::{DVec3, Ray};
use rand::RngCore;

use crate::error::{BuildError, BuildResult};
use crate::sampling::{gen_f64, uniform_disk};

/// Maps normalized image-plane coordinates to primary rays.
pub trait Camera: Send + Sync {
    /// Generate a ray through `(u, v)` in [0,1]², with (0,0) the top-left corner.
    fn generate_ray(&self, u: f64, v: f64, rng: &mut dyn RngCore) -> Ray;
}

/// Placement and lens parameters shared by all cameras.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub look_from: DVec3,
    pub look_at: DVec3,
    pub up: DVec3,
    /// Vertical field of view in degrees
    pub fov: f64,
    /// Width over height
    pub aspect_ratio: f64,
    /// Lens diameter; zero is a pinhole
    pub aperture: f64,
    /// Distance from camera to plane of perfect focus
    pub focal_distance: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: DVec3::ZERO,
            look_at: DVec3::NEG_Z,
            up: DVec3::Y,
            fov: 40.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focal_distance: 1.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: DVec3, look_at: DVec3, up: DVec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.up = up;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, fov: f64, aperture: f64, focal_distance: f64) -> Self {
        self.fov = fov;
        self.aperture = aperture;
        self.focal_distance = focal_distance;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    fn validate(&self) -> BuildResult<()> {
        if self.fov <= 0.0 || self.fov >= 180.0 || self.fov.is_nan() {
            return Err(BuildError::DegenerateCamera(format!("fov must be in (0, 180), got {}", self.fov)));
        }
        if self.aspect_ratio <= 0.0 || !self.aspect_ratio.is_finite() {
            return Err(BuildError::DegenerateCamera(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if self.focal_distance <= 0.0 || !self.focal_distance.is_finite() || self.aperture < 0.0 {
            return Err(BuildError::DegenerateCamera(format!(
                "invalid lens: aperture {}, focal distance {}",
                self.aperture, self.focal_distance
            )));
        }
        Ok(())
    }
}

/// Orthonormal camera basis. `w` points backwards, away from the view direction.
#[derive(Debug, Clone, Copy)]
struct Basis {
    u: DVec3,
    v: DVec3,
    w: DVec3,
}

impl Basis {
    fn new(settings: &CameraSettings) -> BuildResult<Self> {
        let w = (settings.look_from - settings.look_at).try_normalize().ok_or_else(|| {
            BuildError::DegenerateCamera("look_from and look_at coincide".to_string())
        })?;
        let u = settings
            .up
            .cross(w)
            .try_normalize()
            .ok_or_else(|| BuildError::DegenerateCamera("up vector is parallel to the view direction".to_string()))?;
        let v = w.cross(u);
        Ok(Self { u, v, w })
    }
}

/// Pinhole or thin-lens perspective camera.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    center: DVec3,
    top_left: DVec3,
    horizontal: DVec3,
    vertical: DVec3,
    basis: Basis,
    lens_radius: f64,
}

impl PerspectiveCamera {
    pub fn new(settings: &CameraSettings) -> BuildResult<Self> {
        settings.validate()?;
        let basis = Basis::new(settings)?;

        // Calculate viewport dimensions on the focal plane
        let viewport_height = 2.0 * (settings.fov.to_radians() / 2.0).tan();
        let viewport_width = settings.aspect_ratio * viewport_height;
        let focal = settings.focal_distance;

        let horizontal = viewport_width * focal * basis.u;
        let vertical = -viewport_height * focal * basis.v;
        let center = settings.look_from;
        let top_left = center - horizontal / 2.0 - vertical / 2.0 - basis.w * focal;

        Ok(Self {
            center,
            top_left,
            horizontal,
            vertical,
            basis,
            lens_radius: settings.aperture / 2.0,
        })
    }
}

impl Camera for PerspectiveCamera {
    fn generate_ray(&self, u: f64, v: f64, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let d = uniform_disk(gen_f64(rng), gen_f64(rng)) * self.lens_radius;
            self.basis.u * d.x + self.basis.v * d.y
        } else {
            DVec3::ZERO
        };

        let target = self.top_left + u * self.horizontal + v * self.vertical;
        let origin = self.center + offset;
        Ray::new(origin, (target - origin).normalize())
    }
}

/// Parallel-projection camera. All rays share the view direction.
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    top_left: DVec3,
    horizontal: DVec3,
    vertical: DVec3,
    direction: DVec3,
}

impl OrthographicCamera {
    pub fn new(settings: &CameraSettings) -> BuildResult<Self> {
        settings.validate()?;
        let basis = Basis::new(settings)?;

        let viewport_height = 2.0 * (settings.fov.to_radians() / 2.0).tan() * settings.focal_distance;
        let viewport_width = settings.aspect_ratio * viewport_height;

        let horizontal = viewport_width * basis.u;
        let vertical = -viewport_height * basis.v;

        Ok(Self {
            top_left: settings.look_from - horizontal / 2.0 - vertical / 2.0,
            horizontal,
            vertical,
            direction: -basis.w,
        })
    }
}

impl Camera for OrthographicCamera {
    fn generate_ray(&self, u: f64, v: f64, _rng: &mut dyn RngCore) -> Ray {
        Ray::new(self.top_left + u * self.horizontal + v * self.vertical, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings() -> CameraSettings {
        CameraSettings::default()
            .with_position(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    #[test]
    fn test_center_ray_looks_at_target() {
        let camera = PerspectiveCamera::new(&settings()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let ray = camera.generate_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin(), DVec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction() - DVec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_corners_are_oriented() {
        let camera = PerspectiveCamera::new(&settings()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        // u=0, v=0 is top-left: left is -X, top is +Y
        let top_left = camera.generate_ray(0.0, 0.0, &mut rng).direction();
        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        // 90° fov at unit focal distance puts the corner at 45° on each axis
        let expected = DVec3::new(-1.0, 1.0, -1.0).normalize();
        assert!((top_left - expected).length() < 1e-12);

        let bottom_right = camera.generate_ray(1.0, 1.0, &mut rng).direction();
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
    }

    #[test]
    fn test_aspect_ratio_widens_viewport() {
        let camera = PerspectiveCamera::new(&settings().with_aspect_ratio(2.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let right = camera.generate_ray(1.0, 0.5, &mut rng).direction();
        assert!((right - DVec3::new(2.0, 0.0, -1.0).normalize()).length() < 1e-12);
    }

    #[test]
    fn test_thin_lens_focuses() {
        let camera = PerspectiveCamera::new(&settings().with_lens(60.0, 0.5, 5.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let ray = camera.generate_ray(0.5, 0.5, &mut rng);
            // Origins spread over the lens, every ray converges on the focal point
            assert!((ray.origin() - DVec3::new(0.0, 0.0, 5.0)).length() <= 0.25 + 1e-12);
            let t = -ray.origin().z / ray.direction().z;
            assert!(ray.at(t).length() < 1e-9);
        }
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let camera = OrthographicCamera::new(&settings()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let a = camera.generate_ray(0.0, 0.0, &mut rng);
        let b = camera.generate_ray(1.0, 1.0, &mut rng);
        assert_eq!(a.direction(), DVec3::NEG_Z);
        assert_eq!(b.direction(), DVec3::NEG_Z);
        assert!((a.origin() - DVec3::new(-1.0, 1.0, 5.0)).length() < 1e-12);
        assert!((b.origin() - DVec3::new(1.0, -1.0, 5.0)).length() < 1e-12);
    }

    #[test]
    fn test_degenerate_settings() {
        let same_point = settings().with_position(DVec3::ONE, DVec3::ONE, DVec3::Y);
        assert!(PerspectiveCamera::new(&same_point).is_err());

        let up_along_view = settings().with_position(DVec3::new(0.0, 5.0, 0.0), DVec3::ZERO, DVec3::Y);
        assert!(OrthographicCamera::new(&up_along_view).is_err());

        assert!(PerspectiveCamera::new(&settings().with_lens(0.0, 0.0, 1.0)).is_err());
    }
}
