//! Random spheres example.
//!
//! Renders the classic cover scene and saves it to PNG.
//!
//! ```text
//! cargo run --release --example random_spheres -- [config.json] [output.png]
//! ```

use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtw_renderer::{
    Camera, Color, Dielectric, Lambertian, Material, Metal, RenderConfig, Renderer, Scene, Sphere, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RenderConfig::from_json_file(&path).with_context(|| format!("loading {path}"))?,
        None => RenderConfig::default().with_resolution(400, 300),
    };
    let output_path = args.next().unwrap_or_else(|| "random_spheres.png".to_string());

    let start = std::time::Instant::now();
    let mut scene = build_scene(&mut StdRng::seed_from_u64(config.seed));
    scene.build_acceleration_structure_seeded(config.seed);
    log::info!("scene with {} spheres built in {:?}", scene.len(), start.elapsed());

    let mut camera = Camera::new()
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect_ratio(config.aspect_ratio());
    camera.initialize();

    let renderer = Renderer::new(config)?;
    let output = renderer.render(&scene, &camera)?;

    output
        .image
        .to_rgba8()
        .save(&output_path)
        .with_context(|| format!("saving {output_path}"))?;
    log::info!("saved {output_path}");

    Ok(())
}

fn build_scene(rng: &mut StdRng) -> Scene {
    let mut scene = Scene::new();

    // Ground
    scene.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    ));

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

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                // diffuse
                let albedo = Color::new(rng.gen(), rng.gen(), rng.gen());
                Arc::new(Lambertian::new(albedo * albedo))
            } else if choose_mat < 0.95 {
                // metal
                let albedo = Color::new(rng.gen(), rng.gen(), rng.gen());
                Arc::new(Metal::new(albedo, rng.gen_range(0.0..0.5)))
            } else {
                // glass
                Arc::new(Dielectric::new(1.5))
            };
            scene.add(Sphere::new(center, 0.2, material));
        }
    }

    // Three main spheres
    scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5))));
    scene.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    ));
    scene.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    scene
}
