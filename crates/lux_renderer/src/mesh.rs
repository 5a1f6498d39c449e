//! Triangle meshes, optionally loaded from Wavefront OBJ files.

use std::path::Path;
use std::sync::Arc;

use lux_math::{Aabb, DVec3, Ray};
use rand::RngCore;

use crate::bvh::Bvh;
use crate::error::{BuildError, BuildResult};
use crate::object::{Object, SurfaceSample};
use crate::sampling::{gen_f64, Distribution1D};
use crate::triangle::Triangle;
use crate::{Intersection, Material};

/// A triangle soup sharing one material, with its own BVH.
///
/// Acts as a single object towards the scene: one bounding box, one
/// surface area, and area-weighted sampling across its triangles.
pub struct Mesh {
    triangles: Vec<Arc<dyn Object>>,
    bvh: Bvh,
    areas: Distribution1D,
    material: Arc<dyn Material>,
}

impl Mesh {
    /// Build a mesh from vertex positions and triangle indices.
    ///
    /// Zero-area triangles are skipped. Fails if an index is out of range or
    /// nothing with area remains.
    pub fn new(positions: &[DVec3], indices: &[[usize; 3]], material: Arc<dyn Material>) -> BuildResult<Self> {
        let mut triangles: Vec<Arc<dyn Object>> = Vec::with_capacity(indices.len());
        let mut skipped = 0;

        for face in indices {
            let [a, b, c] = *face;
            let (Some(&v0), Some(&v1), Some(&v2)) = (positions.get(a), positions.get(b), positions.get(c)) else {
                return Err(BuildError::DegenerateGeometry(format!(
                    "mesh face {:?} indexes past {} vertices",
                    face,
                    positions.len()
                )));
            };
            match Triangle::new(v0, v1, v2, Arc::clone(&material)) {
                Ok(tri) => triangles.push(Arc::new(tri)),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} degenerate triangles", skipped);
        }
        if triangles.is_empty() {
            return Err(BuildError::DegenerateGeometry("mesh has no triangles with area".to_string()));
        }

        let areas = Distribution1D::new(triangles.iter().map(|t| t.surface_area()).collect());
        let bvh = Bvh::new(&triangles);

        Ok(Self {
            triangles,
            bvh,
            areas,
            material,
        })
    }

    /// Load every model in an OBJ file into one mesh.
    pub fn from_obj<P: AsRef<Path>>(path: P, material: Arc<dyn Material>) -> BuildResult<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )
        .map_err(|source| BuildError::MeshLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for model in &models {
            let base = positions.len();
            let mesh = &model.mesh;
            positions.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
            );
            indices.extend(
                mesh.indices
                    .chunks_exact(3)
                    .map(|f| [base + f[0] as usize, base + f[1] as usize, base + f[2] as usize]),
            );
        }

        log::info!(
            "Loaded {}: {} models, {} vertices, {} triangles",
            path.display(),
            models.len(),
            positions.len(),
            indices.len()
        );

        Self::new(&positions, &indices, material)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Object for Mesh {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        self.bvh.intersect(ray, rec)
    }

    fn bounds(&self) -> Aabb {
        self.bvh.bounds()
    }

    fn surface_area(&self) -> f64 {
        self.areas.total()
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> SurfaceSample<'a> {
        let (index, _) = self.areas.sample_discrete(gen_f64(rng));
        let mut sample = self.triangles[index].sample(rng);
        // Area-proportional choice times uniform-in-triangle is uniform over the mesh
        sample.pdf = 1.0 / self.areas.total();
        sample
    }
}
