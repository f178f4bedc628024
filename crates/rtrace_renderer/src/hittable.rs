//! Hittable trait and scene-wide hit queries.

use rtrace_core::{Mesh, Scene, Shape};
use rtrace_math::{Interval, Point3, Ray, Vec3};

use crate::triangle::{Triangle, TriangleHit};

/// Record of the nearest ray/scene intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Face normal at the hit, not normalized
    pub normal: Vec3,
    /// Shape that owns the hit triangle
    pub shape: &'a Shape,
}

/// Geometry that can be intersected by rays.
///
/// Shapes index into the scene's vertex arena, so the arena is passed in.
pub trait Hittable {
    /// Nearest hit strictly inside `ray_t`.
    fn hit(&self, vertices: &[Point3], ray: &Ray, ray_t: Interval) -> Option<TriangleHit>;

    /// Whether any hit lies strictly inside `ray_t`. May stop at the first one.
    fn occludes(&self, vertices: &[Point3], ray: &Ray, ray_t: Interval) -> bool;
}

impl Hittable for Mesh {
    fn hit(&self, vertices: &[Point3], ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        let mut closest: Option<TriangleHit> = None;

        for triangle in self.triangles(vertices).map(Triangle::from) {
            let interval = closest.map_or(ray_t, |c| ray_t.with_max(c.t));
            if let Some(hit) = triangle.hit(ray, interval) {
                closest = Some(hit);
            }
        }

        closest
    }

    fn occludes(&self, vertices: &[Point3], ray: &Ray, ray_t: Interval) -> bool {
        self.triangles(vertices)
            .map(Triangle::from)
            .any(|triangle| triangle.hit(ray, ray_t).is_some())
    }
}

impl Hittable for Shape {
    fn hit(&self, vertices: &[Point3], ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        match self {
            Shape::Mesh(mesh) => mesh.hit(vertices, ray, ray_t),
        }
    }

    fn occludes(&self, vertices: &[Point3], ray: &Ray, ray_t: Interval) -> bool {
        match self {
            Shape::Mesh(mesh) => mesh.occludes(vertices, ray, ray_t),
        }
    }
}

/// Find the nearest hit over every triangle of every shape.
pub fn closest_hit<'a>(scene: &'a Scene, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
    let mut closest: Option<HitRecord<'a>> = None;

    for shape in &scene.shapes {
        let interval = closest.map_or(ray_t, |c| ray_t.with_max(c.t));
        if let Some(hit) = shape.hit(&scene.vertices, ray, interval) {
            closest = Some(HitRecord {
                t: hit.t,
                normal: hit.normal,
                shape,
            });
        }
    }

    closest
}

/// Whether anything in the scene blocks `ray` inside `ray_t`.
pub fn occluded(scene: &Scene, ray: &Ray, ray_t: Interval) -> bool {
    scene
        .shapes
        .iter()
        .any(|shape| shape.occludes(&scene.vertices, ray, ray_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrace_core::{Camera, Material, NearPlane};
    use rtrace_math::Color;

    fn facing_quad(z: f64) -> [Point3; 3] {
        [
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(0.0, 1.0, z),
        ]
    }

    fn layered_scene(near_first: bool) -> Scene {
        let camera = Camera::look(
            Point3::ZERO,
            Vec3::NEG_Z,
            Vec3::Y,
            NearPlane::new(-1.0, 1.0, -1.0, 1.0),
            1.0,
            (2, 2),
        );
        let mut scene = Scene::new(camera);
        scene.add_material("near", Material::new(Color::X, Color::ZERO, Color::ZERO, 1.0));
        scene.add_material("far", Material::new(Color::Y, Color::ZERO, Color::ZERO, 1.0));

        let near = scene.add_vertices(facing_quad(-2.0));
        let far = scene.add_vertices(facing_quad(-4.0));
        let near_mesh = Mesh::new("near", vec![[near, near + 1, near + 2]]);
        let far_mesh = Mesh::new("far", vec![[far, far + 1, far + 2]]);

        if near_first {
            scene.add_mesh(near_mesh);
            scene.add_mesh(far_mesh);
        } else {
            scene.add_mesh(far_mesh);
            scene.add_mesh(near_mesh);
        }
        scene
    }

    #[test]
    fn test_closest_hit_picks_smaller_t() {
        let ray = Ray::new(Point3::ZERO, Vec3::NEG_Z);

        for near_first in [true, false] {
            let scene = layered_scene(near_first);
            let hit = closest_hit(&scene, &ray, Interval::POSITIVE).unwrap();

            assert_eq!(hit.shape.material_id(), "near");
            assert!((hit.t - 2.0).abs() < 1e-12);
            assert_eq!(hit.normal, Vec3::new(0.0, 0.0, 4.0));
        }
    }

    #[test]
    fn test_closest_hit_within_one_mesh() {
        let mut scene = layered_scene(true);
        let far = scene.add_vertices(facing_quad(-6.0));
        let near = scene.add_vertices(facing_quad(-1.0));
        scene.add_mesh(Mesh::new("far", vec![[far, far + 1, far + 2], [near, near + 1, near + 2]]));

        let ray = Ray::new(Point3::ZERO, Vec3::NEG_Z);
        let hit = closest_hit(&scene, &ray, Interval::POSITIVE).unwrap();

        assert_eq!(hit.shape.material_id(), "far");
        assert!((hit.t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_hit_miss() {
        let scene = layered_scene(true);
        let ray = Ray::new(Point3::ZERO, Vec3::Z);

        assert!(closest_hit(&scene, &ray, Interval::POSITIVE).is_none());
    }

    #[test]
    fn test_occluded_respects_max_distance() {
        let scene = layered_scene(true);
        let ray = Ray::new(Point3::ZERO, Vec3::NEG_Z);

        assert!(occluded(&scene, &ray, Interval::new(0.0, 3.0)));
        assert!(!occluded(&scene, &ray, Interval::new(0.0, 1.5)));
        assert!(!occluded(&scene, &ray, Interval::new(0.0, 2.0)));
    }
}
