//! Simple path tracer example.
//!
//! Renders three spheres on a checkered ground under a sky gradient and
//! saves the result as `simple_render.png`.

use ember_tracer::{
    write_png, Background, Camera, Color, HittableList, MaterialLibrary, Scene, Sphere, Texture,
    ToneMap, Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = build_scene();

    let mut camera = Camera::new()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(32, 10)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Background::sky())
        .with_tone_map(ToneMap::Gamma2);

    let image = camera.render(&scene);
    write_png("simple_render.png", &image, camera.tone_map)?;
    Ok(())
}

fn build_scene() -> Scene {
    let mut lib = MaterialLibrary::new();
    let checker = lib.add_texture(Texture::checker(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::splat(0.9),
    ));
    let ground = lib.lambertian_textured(checker);
    let glass = lib.dielectric(1.5);
    let clay = lib.lambertian(Color::new(0.4, 0.2, 0.1));
    let mirror = lib.metal(Color::new(0.7, 0.6, 0.5), 0.0);

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));
    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));
    world.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, clay));
    world.add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, mirror));

    Scene::with_bvh(&world, lib)
}
