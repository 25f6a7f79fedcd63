//! Built-in object classes
//!
//! The default class set: graph objects (scene, groups, meshes, cameras,
//! lights), geometries and materials. Construction arguments follow the
//! positional order of each class; missing or `null` arguments take their
//! defaults.

use std::rc::Rc;

use crate::error::{ReconcileError, Result};
use crate::foundation::math::Color;
use crate::object::{MathValue, ObjectKind, SceneObject, Value};

use super::Constructor;

/// Every built-in class, keyed by class name
pub fn classes() -> Vec<(&'static str, Constructor)> {
    fn entry(
        name: &'static str,
        constructor: fn(&[Value]) -> Result<SceneObject>,
    ) -> (&'static str, Constructor) {
        (name, Rc::new(constructor) as Constructor)
    }

    vec![
        entry("Scene", scene),
        entry("Group", |_| Ok(object3d("Group"))),
        entry("Mesh", |args| drawable("Mesh", args)),
        entry("Points", |args| drawable("Points", args)),
        entry("Line", |args| drawable("Line", args)),
        entry("PerspectiveCamera", perspective_camera),
        entry("OrthographicCamera", orthographic_camera),
        entry("AmbientLight", |args| light("AmbientLight", args)),
        entry("DirectionalLight", |args| light("DirectionalLight", args)),
        entry("PointLight", point_light),
        entry("BufferGeometry", |_| Ok(geometry("BufferGeometry"))),
        entry("BoxGeometry", box_geometry),
        entry("SphereGeometry", sphere_geometry),
        entry("PlaneGeometry", plane_geometry),
        entry("MeshBasicMaterial", |_| Ok(material("MeshBasicMaterial"))),
        entry("MeshStandardMaterial", standard_material),
        entry("PointsMaterial", points_material),
        entry("LineBasicMaterial", |_| {
            Ok(material("LineBasicMaterial").with_field("linewidth", 1.0))
        }),
    ]
}

/// Fields shared by every graph object
pub fn object3d(class: &str) -> SceneObject {
    SceneObject::new(class, ObjectKind::Graph)
        .with_field("name", "")
        .with_field("position", Value::vector3(0.0, 0.0, 0.0))
        .with_field("rotation", Value::euler(0.0, 0.0, 0.0))
        .with_field("quaternion", Value::quaternion_identity())
        .with_field("scale", Value::vector3(1.0, 1.0, 1.0))
        .with_field("up", Value::vector3(0.0, 1.0, 0.0))
        .with_field("layers", MathValue::Layers(1))
        .with_field("visible", true)
        .with_field("castShadow", false)
        .with_field("receiveShadow", false)
        .with_field("frustumCulled", true)
        .with_field("renderOrder", 0)
}

fn scene(_args: &[Value]) -> Result<SceneObject> {
    Ok(object3d("Scene")
        .with_field("background", Value::Null)
        .with_field("fog", Value::Null))
}

fn drawable(class: &str, args: &[Value]) -> Result<SceneObject> {
    Ok(object3d(class)
        .with_field("geometry", object_arg(class, args, 0)?)
        .with_field("material", object_arg(class, args, 1)?))
}

fn perspective_camera(args: &[Value]) -> Result<SceneObject> {
    const CLASS: &str = "PerspectiveCamera";
    Ok(object3d(CLASS)
        .with_field("fov", number_arg(CLASS, args, 0, 50.0)?)
        .with_field("aspect", number_arg(CLASS, args, 1, 1.0)?)
        .with_field("near", number_arg(CLASS, args, 2, 0.1)?)
        .with_field("far", number_arg(CLASS, args, 3, 2000.0)?)
        .with_field("zoom", 1.0))
}

fn orthographic_camera(args: &[Value]) -> Result<SceneObject> {
    const CLASS: &str = "OrthographicCamera";
    Ok(object3d(CLASS)
        .with_field("left", number_arg(CLASS, args, 0, -1.0)?)
        .with_field("right", number_arg(CLASS, args, 1, 1.0)?)
        .with_field("top", number_arg(CLASS, args, 2, 1.0)?)
        .with_field("bottom", number_arg(CLASS, args, 3, -1.0)?)
        .with_field("near", number_arg(CLASS, args, 4, 0.1)?)
        .with_field("far", number_arg(CLASS, args, 5, 2000.0)?)
        .with_field("zoom", 1.0))
}

fn light(class: &str, args: &[Value]) -> Result<SceneObject> {
    Ok(object3d(class)
        .with_field("color", color_arg(class, args, 0, 0xffffff)?)
        .with_field("intensity", number_arg(class, args, 1, 1.0)?))
}

fn point_light(args: &[Value]) -> Result<SceneObject> {
    const CLASS: &str = "PointLight";
    Ok(light(CLASS, args)?
        .with_field("distance", number_arg(CLASS, args, 2, 0.0)?)
        .with_field("decay", number_arg(CLASS, args, 3, 2.0)?))
}

fn geometry(class: &str) -> SceneObject {
    SceneObject::new(class, ObjectKind::Geometry).with_field("name", "")
}

fn box_geometry(args: &[Value]) -> Result<SceneObject> {
    const CLASS: &str = "BoxGeometry";
    Ok(geometry(CLASS)
        .with_field("width", number_arg(CLASS, args, 0, 1.0)?)
        .with_field("height", number_arg(CLASS, args, 1, 1.0)?)
        .with_field("depth", number_arg(CLASS, args, 2, 1.0)?))
}

fn sphere_geometry(args: &[Value]) -> Result<SceneObject> {
    const CLASS: &str = "SphereGeometry";
    Ok(geometry(CLASS)
        .with_field("radius", number_arg(CLASS, args, 0, 1.0)?)
        .with_field("widthSegments", number_arg(CLASS, args, 1, 32.0)?)
        .with_field("heightSegments", number_arg(CLASS, args, 2, 16.0)?))
}

fn plane_geometry(args: &[Value]) -> Result<SceneObject> {
    const CLASS: &str = "PlaneGeometry";
    Ok(geometry(CLASS)
        .with_field("width", number_arg(CLASS, args, 0, 1.0)?)
        .with_field("height", number_arg(CLASS, args, 1, 1.0)?))
}

fn material(class: &str) -> SceneObject {
    SceneObject::new(class, ObjectKind::Material)
        .with_field("name", "")
        .with_field("color", Value::color(0xffffff))
        .with_field("opacity", 1.0)
        .with_field("transparent", false)
        .with_field("visible", true)
        .with_field("wireframe", false)
        .with_field("side", 0)
        .with_field("map", Value::Null)
}

fn standard_material(_args: &[Value]) -> Result<SceneObject> {
    Ok(material("MeshStandardMaterial")
        .with_field("roughness", 1.0)
        .with_field("metalness", 0.0)
        .with_field("emissive", Value::color(0x000000))
        .with_field("emissiveIntensity", 1.0))
}

fn points_material(_args: &[Value]) -> Result<SceneObject> {
    Ok(material("PointsMaterial")
        .with_field("size", 1.0)
        .with_field("sizeAttenuation", true))
}

fn number_arg(class: &str, args: &[Value], index: usize, default: f64) -> Result<Value> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(Value::Number(default)),
        Some(Value::Number(n)) => Ok(Value::Number(*n)),
        Some(other) => Err(bad_arg(class, index, "a number", other)),
    }
}

fn color_arg(class: &str, args: &[Value], index: usize, default: u32) -> Result<Value> {
    let color = match args.get(index) {
        None | Some(Value::Null) => Color::from_hex(default),
        Some(arg) => {
            let mut color = MathValue::Color(Color::from_hex(default));
            color
                .set(std::slice::from_ref(arg))
                .map_err(|_| bad_arg(class, index, "a colour", arg))?;
            return Ok(Value::math(color));
        }
    };
    Ok(Value::math(MathValue::Color(color)))
}

fn object_arg(class: &str, args: &[Value], index: usize) -> Result<Value> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(Value::Null),
        Some(Value::Object(id)) => Ok(Value::Object(*id)),
        Some(other) => Err(bad_arg(class, index, "an object", other)),
    }
}

fn bad_arg(class: &str, index: usize, expected: &str, found: &Value) -> ReconcileError {
    ReconcileError::invalid_value(
        format!("{class} argument {index}"),
        format!("expected {expected}, got {}", found.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_classified() {
        for (name, constructor) in classes() {
            let object = constructor(&[]).unwrap();
            assert_eq!(object.class(), name);
            let expected = if name.ends_with("Geometry") {
                ObjectKind::Geometry
            } else if name.ends_with("Material") {
                ObjectKind::Material
            } else {
                ObjectKind::Graph
            };
            assert_eq!(object.kind(), expected, "{name}");
        }
    }

    #[test]
    fn test_constructor_args_and_defaults() {
        let geometry = box_geometry(&[Value::from(2), Value::Null]).unwrap();
        assert_eq!(geometry.field("width"), Value::Number(2.0));
        assert_eq!(geometry.field("height"), Value::Number(1.0));
        assert_eq!(geometry.field("depth"), Value::Number(1.0));

        let camera = perspective_camera(&[Value::from(75)]).unwrap();
        assert_eq!(camera.field("fov"), Value::Number(75.0));
        assert_eq!(camera.field("far"), Value::Number(2000.0));
    }

    #[test]
    fn test_light_colour_argument() {
        let light = point_light(&[Value::from("red"), Value::from(2)]).unwrap();
        assert_eq!(light.field("color"), Value::color(0xff0000));
        assert_eq!(light.field("intensity"), Value::Number(2.0));

        let err = point_light(&[Value::from(true)]).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidValue { .. }));
    }

    #[test]
    fn test_bad_argument_rejected() {
        assert!(box_geometry(&[Value::from("wide")]).is_err());
        assert!(drawable("Mesh", &[Value::from(1)]).is_err());
    }
}
