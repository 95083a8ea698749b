//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ember_math::{Color, Vec3};
use ember_tracer::{
    make_box, Background, BvhNode, Camera, Hittable, HittableList, MaterialId, MaterialLibrary,
    Quad, RotateY, Scene, Sphere, Texture, TextureId, TextureImage, Translate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cli::SceneKind;

/// Daylight fill used by the outdoor scenes.
const SKY: Color = Color::new(0.70, 0.80, 1.00);

/// A scene together with the camera framing it.
pub struct Setup {
    pub scene: Scene,
    pub camera: Camera,
}

/// Build the requested scene. `seed` drives any random placement.
pub fn build(kind: SceneKind, texture: Option<&Path>, seed: u64) -> Result<Setup> {
    let setup = match kind {
        SceneKind::BouncingSpheres => bouncing_spheres(seed),
        SceneKind::CheckeredSpheres => checkered_spheres(),
        SceneKind::TexturedSphere => textured_sphere(required_texture(kind, texture)?)?,
        SceneKind::Quads => quads(),
        SceneKind::Transparency => transparency(),
        SceneKind::Mix => mix(),
        SceneKind::AlphaCutout => alpha_cutout(required_texture(kind, texture)?)?,
        SceneKind::SimpleLight => simple_light(),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellNormals => cornell_normals(),
        SceneKind::SimpleShadows => simple_shadows(),
    };
    Ok(setup)
}

fn required_texture(kind: SceneKind, texture: Option<&Path>) -> Result<&Path> {
    texture.with_context(|| format!("scene {kind:?} needs an image, pass one with --texture"))
}

fn load_texture(library: &mut MaterialLibrary, path: &Path) -> Result<TextureId> {
    let image = TextureImage::from_file(path)
        .with_context(|| format!("failed to load texture {}", path.display()))?;
    Ok(library.add_texture(Texture::Image(image)))
}

/// Wide 16:9 camera looking at the origin from (13, 2, 3).
fn outdoor_camera() -> Camera {
    Camera::new()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_background(Background::Solid(SKY))
}

/// Square camera framing the 555-unit Cornell room.
fn cornell_camera(background: Color) -> Camera {
    Camera::new()
        .with_resolution(300, 1.0)
        .with_quality(200, 50)
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Background::Solid(background))
}

fn checker_ground(library: &mut MaterialLibrary, even: Color, odd: Color) -> Sphere {
    let checker = library.add_texture(Texture::checker(0.32, even, odd));
    let ground = library.lambertian_textured(checker);
    Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)
}

fn bouncing_spheres(seed: u64) -> Setup {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lib = MaterialLibrary::new();
    let mut small = HittableList::new();

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_color(&mut rng, 0.0, 1.0) * random_color(&mut rng, 0.0, 1.0);
                let material = lib.lambertian(albedo);
                let bounce = Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                small.add(Sphere::moving(center, center + bounce, 0.2, material));
            } else if choose_mat < 0.95 {
                let albedo = random_color(&mut rng, 0.5, 1.0);
                let material = lib.metal(albedo, rng.gen_range(0.0..0.5));
                small.add(Sphere::new(center, 0.2, material));
            } else {
                let material = lib.dielectric(1.5);
                small.add(Sphere::new(center, 0.2, material));
            }
        }
    }

    let mut world = HittableList::new();
    world.add(checker_ground(&mut lib, Color::new(0.2, 0.3, 0.1), Color::splat(0.9)));
    world.add(BvhNode::from_list(&small));

    let glass = lib.dielectric(1.5);
    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));
    let brown = lib.lambertian(Color::new(0.4, 0.2, 0.1));
    world.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown));
    let mirror = lib.metal(Color::new(0.7, 0.6, 0.5), 0.0);
    world.add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, mirror));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: outdoor_camera().with_lens(20.0, 0.6, 10.0),
    }
}

fn random_color(rng: &mut StdRng, min: f32, max: f32) -> Color {
    Color::new(rng.gen_range(min..max), rng.gen_range(min..max), rng.gen_range(min..max))
}

fn checkered_spheres() -> Setup {
    let mut lib = MaterialLibrary::new();
    let checker = lib.add_texture(Texture::checker(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::splat(0.9),
    ));
    let surface = lib.lambertian_textured(checker);

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, surface));
    world.add(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, surface));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: outdoor_camera(),
    }
}

fn textured_sphere(texture: &Path) -> Result<Setup> {
    let mut lib = MaterialLibrary::new();
    let image = load_texture(&mut lib, texture)?;
    let surface = lib.lambertian_textured(image);

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::ZERO, 2.0, surface));

    Ok(Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: outdoor_camera().with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y),
    })
}

fn quads() -> Setup {
    let mut lib = MaterialLibrary::new();
    let left_red = lib.lambertian(Color::new(1.0, 0.2, 0.2));
    let back_green = lib.lambertian(Color::new(0.2, 1.0, 0.2));
    let right_blue = lib.lambertian(Color::new(0.2, 0.2, 1.0));
    let upper_orange = lib.lambertian(Color::new(1.0, 0.5, 0.0));
    let lower_teal = lib.lambertian(Color::new(0.2, 0.8, 0.8));

    let mut world = HittableList::new();
    world.add(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    ));
    world.add(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    ));
    world.add(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    ));
    world.add(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    ));
    world.add(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    ));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: Camera::new()
            .with_resolution(400, 1.0)
            .with_quality(100, 50)
            .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
            .with_lens(80.0, 0.0, 10.0)
            .with_background(Background::Solid(SKY)),
    }
}

fn transparency() -> Setup {
    let mut lib = MaterialLibrary::new();
    let clear = lib.transparent();

    let mut world = HittableList::new();
    world.add(checker_ground(&mut lib, Color::splat(0.1), Color::splat(0.5)));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, clear));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: outdoor_camera(),
    }
}

fn mix() -> Setup {
    let mut lib = MaterialLibrary::new();
    let cyan = lib.lambertian(Color::new(0.0, 1.0, 1.0));
    let magenta = lib.lambertian(Color::new(1.0, 0.0, 1.0));
    let blend = lib.mix(cyan, magenta, 0.5);

    let mut world = HittableList::new();
    world.add(checker_ground(&mut lib, Color::splat(0.1), Color::splat(0.5)));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, blend));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: outdoor_camera(),
    }
}

fn alpha_cutout(texture: &Path) -> Result<Setup> {
    let mut lib = MaterialLibrary::new();
    let mask = load_texture(&mut lib, texture)?;
    let clear = lib.transparent();
    let lilac = lib.lambertian(Color::new(0.8, 0.7, 1.0));
    let cutout = lib.mix_by_alpha(clear, lilac, mask);
    let cyan = lib.lambertian(Color::new(0.0, 1.0, 1.0));

    let mut world = HittableList::new();
    world.add(checker_ground(&mut lib, Color::splat(0.1), Color::splat(0.5)));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, cyan));
    world.add(Quad::new(
        Vec3::new(3.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 2.0),
        Vec3::new(0.0, 2.0, 0.0),
        cutout,
    ));

    Ok(Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: outdoor_camera(),
    })
}

fn simple_light() -> Setup {
    let mut lib = MaterialLibrary::new();
    let white = lib.lambertian(Color::ONE);
    let light = lib.diffuse_light(Color::splat(4.0));

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, white));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, white));
    world.add(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    ));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: outdoor_camera()
            .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
            .with_background(Background::Solid(Color::ZERO)),
    }
}

/// The five walls and the ceiling light of the Cornell room.
fn cornell_room(world: &mut HittableList, walls: [MaterialId; 3], light: MaterialId) {
    let [red, white, green] = walls;
    world.add(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    ));
    world.add(Quad::new(Vec3::ZERO, Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), red));
    world.add(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    ));
    world.add(Quad::new(Vec3::ZERO, Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white));
    world.add(Quad::new(
        Vec3::splat(555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white,
    ));
    world.add(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white,
    ));
}

/// Box with a corner at the origin, turned about Y and moved into place.
fn placed_box(size: Vec3, angle: f32, offset: Vec3, material: MaterialId) -> Translate {
    let cube: Arc<dyn Hittable> = Arc::new(make_box(Vec3::ZERO, size, material));
    let rotated: Arc<dyn Hittable> = Arc::new(RotateY::new(cube, angle));
    Translate::new(rotated, offset)
}

fn cornell_box() -> Setup {
    let mut lib = MaterialLibrary::new();
    let red = lib.lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lib.lambertian(Color::splat(0.73));
    let green = lib.lambertian(Color::new(0.12, 0.45, 0.15));
    let light = lib.diffuse_light(Color::splat(15.0));
    let mirror = lib.metal(Color::ONE, 0.0);

    let mut world = HittableList::new();
    cornell_room(&mut world, [red, white, green], light);
    world.add(Sphere::new(Vec3::new(130.0, 50.0, 65.0), 50.0, white));
    world.add(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        mirror,
    ));
    world.add(placed_box(Vec3::splat(165.0), -18.0, Vec3::new(130.0, 0.0, 65.0), white));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: cornell_camera(Color::ZERO),
    }
}

fn cornell_normals() -> Setup {
    let mut lib = MaterialLibrary::new();
    let normals = lib.normal();

    let mut world = HittableList::new();
    cornell_room(&mut world, [normals; 3], normals);
    world.add(Sphere::new(Vec3::new(130.0, 50.0, 65.0), 50.0, normals));
    world.add(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        normals,
    ));
    world.add(placed_box(Vec3::splat(165.0), -18.0, Vec3::new(130.0, 0.0, 65.0), normals));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: cornell_camera(Color::splat(0.1)),
    }
}

fn simple_shadows() -> Setup {
    let mut lib = MaterialLibrary::new();
    let red = lib.lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lib.lambertian(Color::splat(0.73));
    let green = lib.lambertian(Color::new(0.12, 0.45, 0.15));
    let light = lib.diffuse_light(Color::splat(15.0));

    let mut world = HittableList::new();
    cornell_room(&mut world, [red, white, green], light);
    world.add(Sphere::new(Vec3::new(278.0, 278.0, 400.0), 70.0, white));

    Setup {
        scene: Scene::with_bvh(&world, lib),
        camera: cornell_camera(Color::ZERO),
    }
}
