//! YAML scene description loading, in the teacher's own `render_settings.yaml`
//! convention (`yaml-rust`) -- a scene file describes the camera, materials, lights
//! and geometry; render settings (thread count, shading/shadow mode, GI) live
//! alongside them under a `render:` key.

use yaml_rust::{Yaml, YamlLoader};

use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::geometry::{CullMode, Plane, Sphere};
use crate::light::Light;
use crate::material::Material;
use crate::math::{ColorRGB, Vector3};
use crate::mesh::TriangleMesh;
use crate::obj;
use crate::renderer::{RenderSettings, ShadingMode, ShadowMode};
use crate::world::World;

pub struct SceneFile {
    pub world: World,
    pub settings: RenderSettings,
}

pub fn load(path: &str) -> Result<SceneFile> {
    let contents = std::fs::read_to_string(path)?;
    let docs = YamlLoader::load_from_str(&contents)
        .map_err(|err| RenderError::AssetError(format!("malformed scene yaml: {err}")))?;
    let doc = docs.first().ok_or_else(|| RenderError::AssetError("empty scene yaml".to_string()))?;

    let camera = parse_camera(&doc["camera"]);
    let mut world = World::new(camera);

    for material_yaml in doc["materials"].as_vec().unwrap_or(&Vec::new()) {
        world.add_material(parse_material(material_yaml)?);
    }

    for light_yaml in doc["lights"].as_vec().unwrap_or(&Vec::new()) {
        world.lights.push(parse_light(light_yaml)?);
    }

    for sphere_yaml in doc["spheres"].as_vec().unwrap_or(&Vec::new()) {
        world.spheres.push(Sphere::new(
            yaml_vector3(&sphere_yaml["origin"]),
            yaml_f64(&sphere_yaml["radius"], 1.0),
            yaml_usize(&sphere_yaml["material"], 0),
        ));
    }

    for plane_yaml in doc["planes"].as_vec().unwrap_or(&Vec::new()) {
        world.planes.push(Plane::new(
            yaml_vector3(&plane_yaml["origin"]),
            yaml_vector3(&plane_yaml["normal"]),
            yaml_usize(&plane_yaml["material"], 0),
        ));
    }

    for mesh_yaml in doc["meshes"].as_vec().unwrap_or(&Vec::new()) {
        world.meshes.push(parse_mesh(mesh_yaml)?);
    }

    let settings = parse_render_settings(&doc["render"]);

    Ok(SceneFile { world, settings })
}

fn parse_camera(yaml: &Yaml) -> Camera {
    let origin = yaml_vector3(&yaml["origin"]);
    let fov = yaml_f64(&yaml["fov"], 45.0);
    Camera::new(origin, fov)
}

fn parse_material(yaml: &Yaml) -> Result<Material> {
    let kind = yaml["type"].as_str().unwrap_or("solid_color");
    Ok(match kind {
        "solid_color" => Material::SolidColor { color: yaml_color(&yaml["color"]) },
        "lambert" => Material::Lambert {
            diffuse_color: yaml_color(&yaml["diffuse_color"]),
            diffuse_reflectance: yaml_f64(&yaml["diffuse_reflectance"], 1.0),
        },
        "lambert_phong" => Material::LambertPhong {
            diffuse_color: yaml_color(&yaml["diffuse_color"]),
            kd: yaml_f64(&yaml["kd"], 0.5),
            ks: yaml_f64(&yaml["ks"], 0.5),
            phong_exponent: yaml_f64(&yaml["phong_exponent"], 1.0),
        },
        "cook_torrance" => Material::CookTorrance {
            albedo: yaml_color(&yaml["albedo"]),
            metalness: yaml_f64(&yaml["metalness"], 0.0),
            roughness: yaml_f64(&yaml["roughness"], 0.5),
        },
        other => return Err(RenderError::AssetError(format!("unknown material type: {other}"))),
    })
}

fn parse_light(yaml: &Yaml) -> Result<Light> {
    let kind = yaml["type"].as_str().unwrap_or("point");
    Ok(match kind {
        "point" => Light::Point {
            origin: yaml_vector3(&yaml["origin"]),
            color: yaml_color(&yaml["color"]),
            intensity: yaml_f64(&yaml["intensity"], 1.0),
        },
        "directional" => Light::Directional {
            direction: yaml_vector3(&yaml["direction"]).normalized(),
            color: yaml_color(&yaml["color"]),
            intensity: yaml_f64(&yaml["intensity"], 1.0),
        },
        other => return Err(RenderError::AssetError(format!("unknown light type: {other}"))),
    })
}

fn parse_mesh(yaml: &Yaml) -> Result<TriangleMesh> {
    let path = yaml["obj"].as_str().ok_or_else(|| RenderError::AssetError("mesh entry missing 'obj'".to_string()))?;
    let obj_mesh = obj::load(path)?;

    let cull_mode = match yaml["cull_mode"].as_str().unwrap_or("back_face") {
        "front_face" => CullMode::FrontFace,
        "no_culling" => CullMode::NoCulling,
        _ => CullMode::BackFace,
    };
    let material_index = yaml_usize(&yaml["material"], 0);

    let mut mesh =
        TriangleMesh::with_normals(obj_mesh.positions, obj_mesh.indices, obj_mesh.normals, cull_mode, material_index);

    if !yaml["translate"].is_badvalue() {
        mesh.translate(yaml_vector3(&yaml["translate"]));
    }
    if let Some(yaw) = yaml["rotate_y"].as_f64() {
        mesh.rotate_y(yaw);
    }
    if !yaml["scale"].is_badvalue() {
        mesh.set_scale(yaml_vector3(&yaml["scale"]));
    }

    Ok(mesh)
}

fn parse_render_settings(yaml: &Yaml) -> RenderSettings {
    let defaults = RenderSettings::default();
    RenderSettings {
        width: yaml["width"].as_i64().map(|v| v as u32).unwrap_or(defaults.width),
        height: yaml["height"].as_i64().map(|v| v as u32).unwrap_or(defaults.height),
        thread_count: yaml["threads"].as_i64().map(|v| v as u32).unwrap_or(defaults.thread_count),
        rows_per_chunk: yaml["rows_per_chunk"].as_i64().map(|v| v as u32).unwrap_or(defaults.rows_per_chunk),
        shading_mode: parse_shading_mode(yaml["shading_mode"].as_str()).unwrap_or(defaults.shading_mode),
        shadow_mode: parse_shadow_mode(yaml["shadow_mode"].as_str()).unwrap_or(defaults.shadow_mode),
        global_illumination: yaml["global_illumination"].as_bool().unwrap_or(defaults.global_illumination),
        show_progress: defaults.show_progress,
    }
}

fn parse_shading_mode(value: Option<&str>) -> Option<ShadingMode> {
    match value? {
        "observed_area" => Some(ShadingMode::ObservedArea),
        "radiance" => Some(ShadingMode::Radiance),
        "brdf" => Some(ShadingMode::Brdf),
        "combined" => Some(ShadingMode::Combined),
        _ => None,
    }
}

fn parse_shadow_mode(value: Option<&str>) -> Option<ShadowMode> {
    match value? {
        "none" => Some(ShadowMode::None),
        "hard" => Some(ShadowMode::Hard),
        "soft" => Some(ShadowMode::Soft),
        _ => None,
    }
}

fn yaml_f64(yaml: &Yaml, default: f64) -> f64 {
    yaml.as_f64().or_else(|| yaml.as_i64().map(|v| v as f64)).unwrap_or(default)
}

fn yaml_usize(yaml: &Yaml, default: usize) -> usize {
    yaml.as_i64().map(|v| v as usize).unwrap_or(default)
}

fn yaml_vector3(yaml: &Yaml) -> Vector3 {
    let values = yaml.as_vec();
    let get = |i: usize| values.and_then(|v| v.get(i)).and_then(Yaml::as_f64).unwrap_or(0.0);
    Vector3::new(get(0), get(1), get(2))
}

fn yaml_color(yaml: &Yaml) -> ColorRGB {
    let v = yaml_vector3(yaml);
    ColorRGB::new(v.x, v.y, v.z)
}
