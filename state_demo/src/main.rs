//! Render state demo
//!
//! Brings up a headless render context, draws a spinning textured quad for a
//! few frames and reports how many GPU commands the state cache let through.
//!
//! Usage: `state_demo [config.toml|config.ron]`

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{UnitQuaternion, Vector3};
use render_core::config::ConfigError;
use render_core::foundation::logging;
use render_core::prelude::*;
use render_core::render::api::{ApiCall, CallLog, ProgramId, TextureName};
use render_core::render::context::HeadlessMonitor;
use thiserror::Error;

const FRAMES: u32 = 5;

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn load_config() -> Result<CoreConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::load_from_file(&path)?,
        None => CoreConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn report(calls: &CallLog, monitor: &HeadlessMonitor, frames: u64) {
    let count = |name: &str, predicate: fn(&ApiCall) -> bool| {
        log::info!("  {:<16} {}", name, calls.count(predicate));
    };

    log::info!("Presented {} frames ({} swaps), {} GPU calls:", frames, monitor.swap_count(), calls.len());
    count("use_program", |c| matches!(c, ApiCall::UseProgram(_)));
    count("enable/disable", |c| matches!(c, ApiCall::Enable(_) | ApiCall::Disable(_)));
    count("bind_texture", |c| matches!(c, ApiCall::BindTexture(_)));
    count("active_texture", |c| matches!(c, ApiCall::ActiveTexture(_)));
    count("uniforms", |c| {
        matches!(c, ApiCall::UniformMatrix4(..) | ApiCall::Uniform4f(..) | ApiCall::Uniform1i(..))
    });
    count("draw_arrays", |c| matches!(c, ApiCall::DrawArrays { .. }));
}

fn run(config: CoreConfig) -> Result<(), DemoError> {
    let window = HeadlessWindow::new(800, 600);
    let platform = HeadlessPlatform::new();
    let monitor = platform.monitor();
    let api = TraceApi::new();
    let calls = api.log();

    let mut context = RenderContext::new(config.context, Box::new(platform), Box::new(api))?;
    context.bind_to_window(&window)?;
    context.initialise()?;

    let resources = context.resources_mut();
    let texture = resources.add_texture(Texture::new(TextureName(1), 256, 256));
    let shader = resources.add_shader(
        Shader::new(ProgramId(1))
            .with_attribute("a_position", 0)
            .with_attribute("a_texCoord0", 1)
            .with_uniform("u_mvp", 0)
            .with_uniform("u_color", 1)
            .with_uniform("u_texture0", 2),
    );
    let mut camera = Camera::perspective(45.0, 800.0 / 600.0, 0.1, 100.0);
    camera.look_at(Point3::new(0.0, 1.0, 4.0), Point3::origin(), Vec3::y());
    let camera = resources.add_camera(camera);

    let quad = Mesh::new(
        Some(shader),
        Material::new()
            .with_texture(texture)
            .with_colour([1.0, 0.8, 0.6, 1.0])
            .with_alpha_blending(true),
        6,
    );

    let renderer = Rc::new(RefCell::new(ForwardRenderer::new()));
    context.set_renderer(&renderer);

    let (state, resources) = context.state_and_resources();
    state.set_camera(resources, camera)?;

    for frame in 0..FRAMES {
        let height = 1.0 + frame as f32 * 0.1;
        context.update_camera(camera, |camera| {
            camera.look_at(Point3::new(0.0, height, 4.0), Point3::origin(), Vec3::y());
        })?;

        let angle = frame as f32 * 0.25;
        let transform = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle).to_homogeneous();
        context.draw_mesh(&quad, &transform)?;
        context.refresh()?;
    }

    report(&calls, &monitor, context.frame_count());
    context.shutdown()?;
    log::info!("Native handles released: {}", monitor.is_idle());
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Failed to load configuration: {}", error);
            std::process::exit(1);
        }
    };
    logging::init_with(&config.logging);
    log::info!("Starting render state demo ({} pipeline)", config.context.pipeline);

    if let Err(error) = run(config) {
        log::error!("Demo failed: {}", error);
        std::process::exit(1);
    }
}
