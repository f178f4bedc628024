//! Conversion from the XML element tree to a [`Scene`].
//!
//! Face indices in the file are 1-based; they are rebased to the 0-based
//! vertex arena here.

use std::str::FromStr;

use rtrace_math::Vec3;

use super::xml::{parse_xml, XmlElement};
use crate::camera::{Camera, NearPlane};
use crate::error::{SceneError, SceneResult};
use crate::light::PointLight;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::scene::Scene;

/// Build a scene from XML text. The result is not validated.
pub fn scene_from_xml(content: &str) -> SceneResult<Scene> {
    let root = parse_xml(content)?;
    if root.name != "scene" {
        return Err(SceneError::MissingField("scene".to_string()));
    }

    let camera = parse_camera(required(&root, "camera")?)?;
    let mut scene = Scene::new(camera);
    scene.max_depth = scalar(required(&root, "maxraytracedepth")?)?;
    scene.background = vec3(required(&root, "background")?)?;

    if let Some(lights) = root.child("lights") {
        if let Some(ambient) = lights.child("ambientlight") {
            scene.ambient_light = vec3(ambient)?;
        }
        for light in lights.children_named("pointlight") {
            scene.add_light(PointLight::new(
                vec3(required(light, "position")?)?,
                vec3(required(light, "intensity")?)?,
            ));
        }
    }

    if let Some(materials) = root.child("materials") {
        for element in materials.children_named("material") {
            let id = element
                .attribute("id")
                .ok_or_else(|| SceneError::MissingField("material id".to_string()))?;
            if scene.materials.contains_key(id) {
                log::warn!("Material {:?} defined twice, keeping the last one", id);
            }
            scene.add_material(id, parse_material(element)?);
        }
    }

    if let Some(vertexdata) = root.child("vertexdata") {
        let positions = triples::<f64>(vertexdata)?;
        scene.add_vertices(positions.into_iter().map(|[x, y, z]| Vec3::new(x, y, z)));
    }

    if let Some(objects) = root.child("objects") {
        let count = scene.vertices.len();
        for (index, element) in objects.children_named("mesh").enumerate() {
            let material_id = required(element, "materialid")?.text.clone();
            let faces = triples::<u32>(required(element, "faces")?)?
                .into_iter()
                .map(|face| rebase_face(face, index, count))
                .collect::<SceneResult<Vec<_>>>()?;
            scene.add_mesh(Mesh::new(material_id, faces));
        }
    }

    Ok(scene)
}

fn parse_camera(element: &XmlElement) -> SceneResult<Camera> {
    let [left, right, bottom, top] = exact::<f64, 4>(required(element, "nearplane")?)?;
    let [nx, ny] = exact::<u32, 2>(required(element, "imageresolution")?)?;

    Ok(Camera::look(
        vec3(required(element, "position")?)?,
        vec3(required(element, "gaze")?)?,
        vec3(required(element, "up")?)?,
        NearPlane::new(left, right, bottom, top),
        scalar(required(element, "neardistance")?)?,
        (nx, ny),
    ))
}

fn parse_material(element: &XmlElement) -> SceneResult<Material> {
    let mirror = match element.child("mirrorreflectance") {
        Some(m) => vec3(m)?,
        None => Vec3::ZERO,
    };

    Ok(Material::new(
        vec3(required(element, "ambient")?)?,
        vec3(required(element, "diffuse")?)?,
        vec3(required(element, "specular")?)?,
        scalar(required(element, "phongexponent")?)?,
    )
    .with_mirror(mirror))
}

/// Convert a 1-based face to 0-based arena indices.
fn rebase_face(face: [u32; 3], mesh: usize, count: usize) -> SceneResult<[u32; 3]> {
    let mut rebased = [0; 3];
    for (slot, index) in rebased.iter_mut().zip(face) {
        if index == 0 || index as usize > count {
            return Err(SceneError::VertexOutOfRange {
                mesh,
                index: index as usize,
                count,
            });
        }
        *slot = index - 1;
    }
    Ok(rebased)
}

fn required<'a>(parent: &'a XmlElement, name: &str) -> SceneResult<&'a XmlElement> {
    parent
        .child(name)
        .ok_or_else(|| SceneError::MissingField(format!("{}/{}", parent.name, name)))
}

fn numbers<T: FromStr>(element: &XmlElement) -> SceneResult<Vec<T>> {
    element
        .text
        .split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| SceneError::InvalidNumber {
                field: element.name.clone(),
                value: token.to_string(),
            })
        })
        .collect()
}

fn exact<T: FromStr, const N: usize>(element: &XmlElement) -> SceneResult<[T; N]> {
    let values = numbers::<T>(element)?;
    let found = values.len();
    values.try_into().map_err(|_| SceneError::WrongArity {
        field: element.name.clone(),
        expected: N,
        found,
    })
}

fn triples<T: FromStr + Copy>(element: &XmlElement) -> SceneResult<Vec<[T; 3]>> {
    let values = numbers::<T>(element)?;
    if values.len() % 3 != 0 {
        return Err(SceneError::WrongArity {
            field: element.name.clone(),
            expected: (values.len() / 3 + 1) * 3,
            found: values.len(),
        });
    }
    Ok(values.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

fn scalar<T: FromStr>(element: &XmlElement) -> SceneResult<T> {
    let [value] = exact::<T, 1>(element)?;
    Ok(value)
}

fn vec3(element: &XmlElement) -> SceneResult<Vec3> {
    let [x, y, z] = exact::<f64, 3>(element)?;
    Ok(Vec3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MESH_SCENE: &str = r#"<scene>
    <maxraytracedepth>6</maxraytracedepth>
    <background>0 0 10</background>
    <camera>
        <position>0 0 0</position>
        <gaze>0 0 -1</gaze>
        <up>0 1 0</up>
        <nearplane>-1 1 -1 1</nearplane>
        <neardistance>1</neardistance>
        <imageresolution>16 9</imageresolution>
    </camera>
    <lights>
        <ambientlight>25 25 25</ambientlight>
        <pointlight id="1">
            <position>0 4 0</position>
            <intensity>1000 1000 1000</intensity>
        </pointlight>
    </lights>
    <materials>
        <material id="1">
            <ambient>1 1 1</ambient>
            <diffuse>1 1 1</diffuse>
            <specular>0.5 0.5 0.5</specular>
            <phongexponent>1</phongexponent>
        </material>
        <material id="2">
            <ambient>1 1 1</ambient>
            <diffuse>0 0 1</diffuse>
            <specular>0 0 1</specular>
            <mirrorreflectance>0.5 0.5 0.5</mirrorreflectance>
            <phongexponent>8</phongexponent>
        </material>
    </materials>
    <vertexdata>
        -1 -1 -2
         1 -1 -2
         0  1 -2
        -1 -1 -3
    </vertexdata>
    <objects>
        <mesh id="1">
            <materialid>1</materialid>
            <faces>1 2 3</faces>
        </mesh>
        <mesh id="2">
            <materialid>2</materialid>
            <faces>1 2 4 2 3 4</faces>
        </mesh>
    </objects>
</scene>"#;

    #[test]
    fn test_scene_from_xml() {
        let scene = scene_from_xml(TWO_MESH_SCENE).unwrap();

        assert_eq!(scene.max_depth, 6);
        assert_eq!(scene.background, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(scene.ambient_light, Vec3::splat(25.0));
        assert_eq!(scene.camera.nx, 16);
        assert_eq!(scene.camera.ny, 9);
        assert_eq!(scene.camera.w, Vec3::Z);
        assert_eq!(scene.camera.u, Vec3::X);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.vertices.len(), 4);
        assert_eq!(scene.shapes.len(), 2);
        assert_eq!(scene.triangle_count(), 3);

        let mirror = scene.material("2").unwrap();
        assert!(mirror.is_reflective());
        assert_eq!(mirror.phong_exponent, 8.0);
        assert!(!scene.material("1").unwrap().is_reflective());

        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_faces_are_rebased() {
        let scene = scene_from_xml(TWO_MESH_SCENE).unwrap();
        match &scene.shapes[1] {
            crate::mesh::Shape::Mesh(mesh) => {
                assert_eq!(mesh.faces, vec![[0, 1, 3], [1, 2, 3]]);
            }
        }
    }

    #[test]
    fn test_missing_camera_field() {
        let doc = TWO_MESH_SCENE.replace("<neardistance>1</neardistance>", "");
        match scene_from_xml(&doc) {
            Err(SceneError::MissingField(field)) => assert_eq!(field, "camera/neardistance"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_number() {
        let doc = TWO_MESH_SCENE.replace("<background>0 0 10</background>", "<background>0 zero 10</background>");
        assert!(matches!(
            scene_from_xml(&doc),
            Err(SceneError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_wrong_arity() {
        let doc = TWO_MESH_SCENE.replace("<up>0 1 0</up>", "<up>0 1</up>");
        assert!(matches!(
            scene_from_xml(&doc),
            Err(SceneError::WrongArity {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_face_index_rejected() {
        let doc = TWO_MESH_SCENE.replace("<faces>1 2 3</faces>", "<faces>0 1 2</faces>");
        assert!(matches!(
            scene_from_xml(&doc),
            Err(SceneError::VertexOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_face_index_past_end_rejected() {
        let doc = TWO_MESH_SCENE.replace("<faces>1 2 3</faces>", "<faces>1 2 5</faces>");
        assert!(matches!(
            scene_from_xml(&doc),
            Err(SceneError::VertexOutOfRange {
                mesh: 0,
                index: 5,
                count: 4
            })
        ));
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(
            scene_from_xml("<world/>"),
            Err(SceneError::MissingField(_))
        ));
    }
}
