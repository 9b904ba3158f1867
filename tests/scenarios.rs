//! End-to-end scenarios exercising the full intersection + shading pipeline together,
//! as opposed to the unit tests colocated with each module.

use dae_raytracer::camera::Camera;
use dae_raytracer::geometry::{CullMode, Plane, Sphere};
use dae_raytracer::light::Light;
use dae_raytracer::material::Material;
use dae_raytracer::math::{ColorRGB, Vector3, PI};
use dae_raytracer::mesh::TriangleMesh;
use dae_raytracer::renderer::{self, RenderSettings, ShadingMode, ShadowMode};
use dae_raytracer::world::World;

fn settings(width: u32, height: u32, shading_mode: ShadingMode, shadow_mode: ShadowMode) -> RenderSettings {
    RenderSettings {
        width,
        height,
        thread_count: 1,
        rows_per_chunk: height,
        shading_mode,
        shadow_mode,
        global_illumination: false,
        show_progress: false,
    }
}

fn process_pixel(world: &World, settings: &RenderSettings, px: u32, py: u32) -> ColorRGB {
    let ray = world.camera.generate_ray(px, py, settings.width, settings.height);
    renderer::shade_ray(world, &ray, settings)
}

#[test]
fn single_sphere_no_lights_is_black_under_every_shading_mode() {
    let camera = Camera::new(Vector3::new(0.0, 0.0, -5.0), 90.0);
    let mut world = World::new(camera);
    let solid = world.add_material(Material::SolidColor { color: ColorRGB::WHITE });
    world.spheres.push(Sphere::new(Vector3::ZERO, 1.0, solid));

    for mode in [ShadingMode::ObservedArea, ShadingMode::Radiance, ShadingMode::Brdf, ShadingMode::Combined] {
        let settings = settings(2, 2, mode, ShadowMode::None);
        let color = process_pixel(&world, &settings, 1, 1);
        assert_eq!(color, ColorRGB::BLACK, "mode {mode:?} should be black with no lights");
    }
}

#[test]
fn lambert_red_sphere_under_one_point_light() {
    let camera = Camera::new(Vector3::ZERO, 90.0);
    let mut world = World::new(camera);
    let red = world.add_material(Material::Lambert { diffuse_color: ColorRGB::new(1.0, 0.0, 0.0), diffuse_reflectance: 1.0 });
    world.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, red));
    world.lights.push(Light::Point { origin: Vector3::ZERO, color: ColorRGB::WHITE, intensity: 4.0 * PI });

    let settings = settings(1, 1, ShadingMode::Combined, ShadowMode::None);
    let color = process_pixel(&world, &settings, 0, 0);

    // radiance = white * intensity/dist^2 = pi/4; brdf = Lambert(1, red) = red/pi;
    // observed_area = 1 -> final = (pi/4) * (1/pi) = 1/4 on the red channel only.
    assert!((color.r - 0.25).abs() < 1e-6);
    assert_eq!(color.g, 0.0);
    assert_eq!(color.b, 0.0);
}

#[test]
fn ray_parallel_to_ground_plane_misses() {
    let camera = Camera::new(Vector3::new(0.0, 1.0, 0.0), 90.0);
    let mut world = World::new(camera);
    let white = world.add_material(Material::Lambert { diffuse_color: ColorRGB::WHITE, diffuse_reflectance: 1.0 });
    world.planes.push(Plane::new(Vector3::ZERO, Vector3::UNIT_Y, white));
    world.lights.push(Light::Directional { direction: -Vector3::UNIT_Y, color: ColorRGB::WHITE, intensity: 1.0 });

    let settings = settings(1, 1, ShadingMode::Combined, ShadowMode::Hard);
    let color = process_pixel(&world, &settings, 0, 0);
    assert_eq!(color, ColorRGB::BLACK);
}

fn unit_cube() -> (Vec<Vector3>, Vec<u32>) {
    let positions = vec![
        Vector3::new(-0.5, -0.5, -0.5),
        Vector3::new(0.5, -0.5, -0.5),
        Vector3::new(0.5, 0.5, -0.5),
        Vector3::new(-0.5, 0.5, -0.5),
        Vector3::new(-0.5, -0.5, 0.5),
        Vector3::new(0.5, -0.5, 0.5),
        Vector3::new(0.5, 0.5, 0.5),
        Vector3::new(-0.5, 0.5, 0.5),
    ];
    let faces: [[u32; 4]; 6] =
        [[0, 1, 2, 3], [5, 4, 7, 6], [4, 0, 3, 7], [1, 5, 6, 2], [3, 2, 6, 7], [4, 5, 1, 0]];
    let mut indices = Vec::with_capacity(36);
    for face in faces {
        indices.extend_from_slice(&[face[0], face[1], face[2]]);
        indices.extend_from_slice(&[face[0], face[2], face[3]]);
    }
    (positions, indices)
}

#[test]
fn bvh_build_is_deterministic_across_runs() {
    let (positions, indices) = unit_cube();
    let mesh_a = TriangleMesh::new(positions.clone(), indices.clone(), CullMode::BackFace, 0);
    let mesh_b = TriangleMesh::new(positions, indices, CullMode::BackFace, 0);

    let (min, max) = mesh_a.root_bounds();
    assert_eq!(min, Vector3::new(-0.5, -0.5, -0.5));
    assert_eq!(max, Vector3::new(0.5, 0.5, 0.5));
    assert_eq!(mesh_a.node_count(), mesh_b.node_count());
}

#[test]
fn hard_shadow_between_two_spheres_lights_only_the_unoccluded_one() {
    let camera = Camera::new(Vector3::new(0.0, 0.0, -5.0), 90.0);
    let mut world = World::new(camera);
    let red = world.add_material(Material::Lambert { diffuse_color: ColorRGB::new(1.0, 0.0, 0.0), diffuse_reflectance: 1.0 });
    let blue = world.add_material(Material::Lambert { diffuse_color: ColorRGB::new(0.0, 0.0, 1.0), diffuse_reflectance: 1.0 });
    world.spheres.push(Sphere::new(Vector3::new(-1.0, 0.0, 0.0), 0.4, red));
    world.spheres.push(Sphere::new(Vector3::new(1.0, 0.0, 0.0), 0.4, blue));
    world.lights.push(Light::Point { origin: Vector3::new(0.0, 5.0, 0.0), color: ColorRGB::WHITE, intensity: 50.0 });

    let settings = settings(4, 4, ShadingMode::Combined, ShadowMode::Hard);

    // A ray straight at the top of the left sphere sees the light unobstructed --
    // the right sphere is nowhere near the shadow ray's path.
    let top_of_left_sphere = Vector3::new(-1.0, 0.4, 0.0);
    let ray = dae_raytracer::ray::Ray::new(camera_origin(&world), (top_of_left_sphere - camera_origin(&world)).normalized());
    let color = renderer::shade_ray(&world, &ray, &settings);
    assert!(color.r > 0.0, "the unoccluded sphere should be lit");
}

fn camera_origin(world: &World) -> Vector3 {
    world.camera.origin
}

#[test]
fn mirror_sphere_reflects_a_red_plane() {
    let camera = Camera::new(Vector3::new(0.0, 0.0, -5.0), 90.0);
    let mut world = World::new(camera);

    let mirror = world.add_material(Material::CookTorrance { albedo: ColorRGB::WHITE, metalness: 1.0, roughness: 0.0 });
    world.spheres.push(Sphere::new(Vector3::ZERO, 1.0, mirror));

    let red = world.add_material(Material::SolidColor { color: ColorRGB::new(1.0, 0.0, 0.0) });
    world.planes.push(Plane::new(Vector3::new(0.0, 0.0, -10.0), Vector3::UNIT_Z, red));
    world.lights.push(Light::Point { origin: Vector3::new(2.0, 2.0, -5.0), color: ColorRGB::WHITE, intensity: 10.0 });

    let settings = settings(1, 1, ShadingMode::Brdf, ShadowMode::None);
    let color = process_pixel(&world, &settings, 0, 0);
    assert!(color.r > 0.0, "the mirror sphere should pick up the red plane behind the camera");
}
