// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod aabb;
mod frame;
mod numeric;
mod ray;

pub use aabb::Aabb;
pub use frame::ShadingFrame;
pub use numeric::{solve_quadratic, EPSILON, HIT_EPSILON};
pub use ray::Ray;
