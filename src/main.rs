use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::{Duration, Instant};

use sdfcaster::{
    renderer::{Renderer, RendererExt, software::Software},
    world::{Camera, CameraOptions, Scene, Shading, TextureBank, builtin_levels},
};

const PLAYER_SPEED: f32 = 300.0; // world units per second
const ROTATE_SPEED: f32 = 2.4; // radians per second
const TEXTURE_SIZE: usize = 128;

#[derive(Parser, Debug)]
#[command(about = "SDF-marched pseudo-3D viewer")]
struct Args {
    /// Scene width in world units (also the window width)
    #[arg(long, default_value_t = 1024.0)]
    width: f32,

    /// Scene height in world units (also the window height)
    #[arg(long, default_value_t = 768.0)]
    height: f32,

    /// Builtin level to start in
    #[arg(long, default_value_t = 0)]
    level: usize,

    /// Viewport resolution as a percentage of the scene dimensions
    #[arg(long, default_value_t = 50.0)]
    resolution: f32,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let levels = builtin_levels();
    let mut level_idx = args.level % levels.len();

    let bank = TextureBank::with_builtin_textures(TEXTURE_SIZE);

    let mut scene = Scene::new(level_idx, &levels[level_idx], args.width, args.height, &bank)?;
    scene.set_surface_textures(
        bank.id_or_missing("XOR"),
        bank.id_or_missing("GRAD"),
        bank.id_or_missing("CROSS"),
        &bank,
    )?;

    let mut camera = Camera::new(
        &scene,
        CameraOptions {
            resolution: args.resolution,
            fov: args.fov,
            ..CameraOptions::default()
        },
    );

    let mut renderer = Software::default();

    let mut win = Window::new(
        "sdfcaster",
        args.width as usize,
        args.height as usize,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    log::info!(
        "level {} of {}, viewport {:?}",
        level_idx,
        levels.len(),
        camera.viewport()
    );

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_frame = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let dt = last_frame.elapsed().as_secs_f32().min(0.1);
        last_frame = Instant::now();

        /* movement --------------------------------------------------------- */
        if win.is_key_down(Key::W) || win.is_key_down(Key::Up) {
            camera.advance(PLAYER_SPEED * dt);
        }
        if win.is_key_down(Key::S) || win.is_key_down(Key::Down) {
            camera.advance(-PLAYER_SPEED * dt);
        }
        if win.is_key_down(Key::A) || win.is_key_down(Key::Left) {
            camera.rotate(-ROTATE_SPEED * dt);
        }
        if win.is_key_down(Key::D) || win.is_key_down(Key::Right) {
            camera.rotate(ROTATE_SPEED * dt);
        }

        /* toggles ---------------------------------------------------------- */
        let opts = camera.options_mut();
        if win.is_key_pressed(Key::T, KeyRepeat::No) {
            opts.show_textures = !opts.show_textures;
        }
        if win.is_key_pressed(Key::P, KeyRepeat::No) {
            opts.show_sprites = !opts.show_sprites;
        }
        if win.is_key_pressed(Key::F, KeyRepeat::No) {
            opts.fisheye_correction = !opts.fisheye_correction;
        }
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            opts.show_minimap = !opts.show_minimap;
        }
        if win.is_key_pressed(Key::R, KeyRepeat::No) {
            opts.debug_rays = !opts.debug_rays;
        }
        if win.is_key_pressed(Key::G, KeyRepeat::No) {
            opts.debug_sdf = !opts.debug_sdf;
        }
        if win.is_key_pressed(Key::H, KeyRepeat::No) {
            opts.shading = match opts.shading {
                Shading::None => Shading::Side,
                Shading::Side => Shading::Distance,
                Shading::Distance => Shading::None,
            };
            log::info!("shading: {:?}", opts.shading);
        }

        /* level cycling ---------------------------------------------------- */
        if win.is_key_pressed(Key::N, KeyRepeat::No) {
            level_idx = (level_idx + 1) % levels.len();
            scene.change_level(level_idx, &levels[level_idx], args.width, args.height, &bank)?;
            camera.set_scene_dims(&scene);
            camera.set_pos(scene.center());
            log::info!("switched to level {level_idx}");
        }

        /* draw ------------------------------------------------------------- */
        renderer.render_frame(&scene, &mut camera, &bank, |fb, w, h| {
            // accumulate & report every ~3 s
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(fb, w, h).unwrap()
        });

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            let fps = 1000.0 / avg_ms;
            println!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, fps);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
