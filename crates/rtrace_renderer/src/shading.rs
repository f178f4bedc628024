//! Whitted shading: ambient, Blinn-Phong direct light with hard shadows,
//! and recursive mirror reflection.

use rtrace_core::{Material, PointLight, Scene};
use rtrace_math::{unit_vec, Color, Interval, Point3, Ray, Vec3};

use crate::hittable::{closest_hit, occluded};
use crate::renderer::RenderConfig;

/// Compute the color seen along `ray`.
///
/// `depth` is the number of mirror bounces still allowed; at zero the
/// reflection branch is skipped. Channels are left unclamped.
///
/// The scene must have passed [`Scene::validate`]. A shape whose material is
/// missing trips a debug assertion; release builds shade it with
/// [`Material::default`] (black, non-reflective).
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, config: &RenderConfig) -> Color {
    let Some(rec) = closest_hit(scene, ray, Interval::POSITIVE) else {
        return scene.background;
    };

    let x = ray.at(rec.t);
    let normal = unit_vec(rec.normal);
    let material_id = rec.shape.material_id();
    let material = scene.material(material_id).copied();
    debug_assert!(
        material.is_some(),
        "shape references unknown material {:?}; validate the scene before rendering",
        material_id
    );
    let material = material.unwrap_or_default();

    // Highlights and reflections are taken relative to the camera
    let w_o = unit_vec(scene.camera.position - x);

    let mut color = material.ambient * scene.ambient_light;
    for light in &scene.lights {
        color += direct_light(scene, light, &material, x, normal, w_o, config);
    }

    if depth > 0 && material.is_reflective() {
        let w_r = -w_o + 2.0 * normal * normal.dot(w_o);
        let reflected = Ray::offset(x, w_r, config.ray_epsilon);
        color += material.mirror_reflectance * ray_color(&reflected, scene, depth - 1, config);
    }

    color
}

/// Diffuse plus specular contribution of one point light, zero when shadowed.
fn direct_light(
    scene: &Scene,
    light: &PointLight,
    material: &Material,
    x: Point3,
    normal: Vec3,
    w_o: Vec3,
    config: &RenderConfig,
) -> Color {
    let to_light = light.position - x;
    let dist_l = to_light.length();
    let w_i = to_light / dist_l;

    let shadow_ray = Ray::offset(x, w_i, config.ray_epsilon);
    if occluded(scene, &shadow_ray, Interval::new(0.0, dist_l)) {
        return Color::ZERO;
    }

    let irradiance = light.irradiance(dist_l);
    let diffuse = material.diffuse * normal.dot(w_i).max(0.0) * irradiance;

    let h = unit_vec(w_i + w_o);
    let specular =
        material.specular * normal.dot(h).max(0.0).powf(material.phong_exponent) * irradiance;

    diffuse + specular
}
