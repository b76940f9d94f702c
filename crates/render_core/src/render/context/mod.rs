//! Render context
//!
//! A [`RenderContext`] owns the native display, surface and context for one
//! window, together with the [`RenderState`] and [`ResourceStore`] every draw
//! goes through. It observes a [`Renderer`] without owning it.

pub mod headless;
pub mod lifecycle;
pub mod platform;

pub use headless::{HeadlessMonitor, HeadlessPlatform, PlatformEvent};
pub use lifecycle::LifecycleState;
pub use platform::{
    ConfigHandle, ConfigRequest, ContextHandle, DisplayHandle, NativeHandles, NativePlatform,
    PlatformError, PlatformResult, PlatformStep, RenderableType, SurfaceHandle,
};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::RenderContextConfig;
use crate::foundation::math::Mat4;
use crate::render::api::{Capability, ClearMask, GraphicsApi};
use crate::render::primitives::{Camera, Mesh};
use crate::render::renderer::Renderer;
use crate::render::resources::{CameraId, MatrixId, ResourceId, ResourceStore};
use crate::render::state::RenderState;
use crate::render::target::{self, RenderTarget, RenderTargetOptions, RenderTargetType};
use crate::render::window::RenderWindow;
use crate::render::{RenderError, RenderResult};

/// Native context, render state and resources for one window
pub struct RenderContext<'w> {
    config: RenderContextConfig,
    platform: Box<dyn NativePlatform>,
    state: RenderState,
    resources: ResourceStore,
    renderer: Option<Weak<RefCell<dyn Renderer>>>,
    window: Option<&'w dyn RenderWindow>,
    lifecycle: LifecycleState,
    handles: Option<NativeHandles>,
    frame_count: u64,
}

impl<'w> RenderContext<'w> {
    /// Create a context driving `gpu` through the pipeline `config` names
    pub fn new(
        config: RenderContextConfig,
        platform: Box<dyn NativePlatform>,
        gpu: Box<dyn GraphicsApi>,
    ) -> RenderResult<Self> {
        config.validate()?;
        let state = RenderState::new(config.pipeline, gpu);

        Ok(Self {
            config,
            platform,
            state,
            resources: ResourceStore::new(),
            renderer: None,
            window: None,
            lifecycle: LifecycleState::Created,
            handles: None,
            frame_count: 0,
        })
    }

    /// Attach the window the context will present to
    pub fn bind_to_window(&mut self, window: &'w dyn RenderWindow) -> RenderResult<()> {
        self.expect_state("bind_to_window", LifecycleState::Created)?;
        self.window = Some(window);
        self.lifecycle = LifecycleState::Bound;
        log::debug!("Render context bound to a {}x{} window", window.size().0, window.size().1);
        Ok(())
    }

    /// Acquire the native display, surface and context and make them current
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidLifecycle`] unless a window is bound and the
    /// context is not already initialised. [`RenderError::Platform`] when a
    /// native step fails; anything acquired before it is released again and
    /// the context stays where it was.
    pub fn initialise(&mut self) -> RenderResult<()> {
        if !self.lifecycle.can_initialise() {
            return Err(self.lifecycle_error("initialise"));
        }
        let window = self.window.ok_or_else(|| self.lifecycle_error("initialise"))?;

        let handles = acquire(self.platform.as_mut(), window, &self.config).map_err(|error| {
            log::error!("Render context initialisation failed: {}", error);
            RenderError::Platform(error)
        })?;

        let (width, height) = window.size();
        self.state.reset();
        let gpu = self.state.gpu();
        gpu.viewport(0, 0, width, height);
        gpu.clear_colour(self.config.clear_colour);

        self.handles = Some(handles);
        self.lifecycle = LifecycleState::Initialised;
        log::info!(
            "Render context initialised ({} pipeline, {}x{})",
            self.config.pipeline,
            width,
            height
        );
        Ok(())
    }

    /// Release the native context, surface and display
    pub fn shutdown(&mut self) -> RenderResult<()> {
        let handles = self.native_handles("shutdown")?;
        release(
            self.platform.as_mut(),
            handles.display,
            Some(handles.surface),
            Some(handles.context),
        );
        self.handles = None;
        self.lifecycle = LifecycleState::ShutDown;
        log::info!("Render context shut down after {} frames", self.frame_count);
        Ok(())
    }

    /// Present the current frame and clear for the next one
    ///
    /// The scissor test is off while presenting and clearing. When the swap
    /// fails the clear is skipped, the scissor test is still restored and the
    /// failure is returned.
    pub fn refresh(&mut self) -> RenderResult<()> {
        let handles = self.native_handles("refresh")?;

        self.state.gpu().disable(Capability::ScissorTest);
        let swapped = self.platform.swap_buffers(handles.display, handles.surface);
        if swapped.is_ok() {
            self.state.gpu().clear(ClearMask::COLOUR | ClearMask::DEPTH);
            self.frame_count += 1;
        }
        self.state.gpu().enable(Capability::ScissorTest);

        swapped.map_err(|error| {
            log::error!("Presenting frame {} failed: {}", self.frame_count, error);
            RenderError::Platform(error)
        })
    }

    /// Hand `mesh` to the observed renderer; without a live renderer nothing
    /// happens
    pub fn draw_mesh(&mut self, mesh: &Mesh, transform: &Mat4) -> RenderResult<()> {
        self.native_handles("draw_mesh")?;

        let Some(renderer) = self.renderer.as_ref().and_then(Weak::upgrade) else {
            return Ok(());
        };
        let mut renderer = renderer
            .try_borrow_mut()
            .map_err(|_| RenderError::RenderingFailed("renderer is already in use".to_string()))?;
        renderer.draw_mesh(&mut self.state, &self.resources, mesh, transform)
    }

    /// Observe `renderer`; the context never keeps it alive
    pub fn set_renderer<R: Renderer + 'static>(&mut self, renderer: &Rc<RefCell<R>>) {
        let renderer: Rc<RefCell<dyn Renderer>> = renderer.clone();
        self.renderer = Some(Rc::downgrade(&renderer));
    }

    /// Stop observing the renderer
    pub fn clear_renderer(&mut self) {
        self.renderer = None;
    }

    /// Whether a renderer is attached and still alive
    pub fn has_renderer(&self) -> bool {
        self.renderer
            .as_ref()
            .map_or(false, |renderer| renderer.strong_count() > 0)
    }

    /// Build a render target
    pub fn create_render_target(
        &self,
        kind: RenderTargetType,
        options: &RenderTargetOptions,
    ) -> RenderResult<RenderTarget> {
        target::create_render_target(kind, options)
    }

    /// Build a render target from a raw numeric tag
    ///
    /// Unknown tags fail with [`RenderError::UnsupportedTargetType`].
    pub fn create_render_target_from_tag(
        &self,
        tag: u32,
        options: &RenderTargetOptions,
    ) -> RenderResult<RenderTarget> {
        target::create_render_target_from_tag(tag, options)
    }

    /// Update the viewport after the window changed size
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.native_handles("resize")?;
        self.state.gpu().viewport(0, 0, width, height);
        log::debug!("Viewport resized to {}x{}", width, height);
        Ok(())
    }

    /// Modify a camera
    ///
    /// When the camera is current it is uploaded again, so the fixed-function
    /// matrix stacks never keep the old matrices.
    pub fn update_camera(
        &mut self,
        camera: CameraId,
        update: impl FnOnce(&mut Camera),
    ) -> RenderResult<()> {
        update(self.resources.camera_mut(camera)?);
        if self.state.current_camera() == Some(camera) {
            self.state.release(camera);
            self.state.set_camera(&self.resources, camera)?;
        }
        Ok(())
    }

    /// Modify a texture matrix, uploading it again when it is current
    pub fn update_texture_matrix(
        &mut self,
        matrix: MatrixId,
        update: impl FnOnce(&mut Mat4),
    ) -> RenderResult<()> {
        update(self.resources.texture_matrix_mut(matrix)?);
        if self.state.current_texture_matrix() == Some(matrix) {
            self.state.release(matrix);
            self.state.set_texture_matrix(&self.resources, matrix)?;
        }
        Ok(())
    }

    /// Destroy a resource and drop every cached reference to it
    pub fn destroy_resource(&mut self, resource: impl Into<ResourceId>) -> bool {
        let resource = resource.into();
        self.state.release(resource);
        self.resources.remove(resource)
    }

    /// Render state
    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    /// Mutable render state
    pub fn render_state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    /// Resources
    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    /// Mutable resources
    pub fn resources_mut(&mut self) -> &mut ResourceStore {
        &mut self.resources
    }

    /// Render state together with the resources it reads from
    pub fn state_and_resources(&mut self) -> (&mut RenderState, &ResourceStore) {
        (&mut self.state, &self.resources)
    }

    /// Configuration the context was built with
    pub fn config(&self) -> &RenderContextConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// Live native handles, if initialised
    pub fn handles(&self) -> Option<NativeHandles> {
        self.handles
    }

    /// Frames presented since creation
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn expect_state(&self, operation: &'static str, expected: LifecycleState) -> RenderResult<()> {
        if self.lifecycle == expected {
            Ok(())
        } else {
            Err(self.lifecycle_error(operation))
        }
    }

    fn native_handles(&self, operation: &'static str) -> RenderResult<NativeHandles> {
        match (self.lifecycle, self.handles) {
            (LifecycleState::Initialised, Some(handles)) => Ok(handles),
            _ => Err(self.lifecycle_error(operation)),
        }
    }

    fn lifecycle_error(&self, operation: &'static str) -> RenderError {
        log::warn!("{} rejected while the render context is {}", operation, self.lifecycle);
        RenderError::InvalidLifecycle {
            operation,
            state: self.lifecycle,
        }
    }
}

impl Drop for RenderContext<'_> {
    fn drop(&mut self) {
        if self.lifecycle.is_initialised() {
            if let Err(error) = self.shutdown() {
                log::error!("Render context shutdown on drop failed: {}", error);
            }
        }
    }
}

fn acquire(
    platform: &mut dyn NativePlatform,
    window: &dyn RenderWindow,
    config: &RenderContextConfig,
) -> PlatformResult<NativeHandles> {
    let display = platform.get_display(window.raw_display_handle())?;
    let mut surface = None;
    let mut context = None;

    match bring_up(platform, window, config, display, &mut surface, &mut context) {
        Ok(handles) => Ok(handles),
        Err(error) => {
            release(platform, display, surface, context);
            Err(error)
        }
    }
}

fn bring_up(
    platform: &mut dyn NativePlatform,
    window: &dyn RenderWindow,
    config: &RenderContextConfig,
    display: DisplayHandle,
    surface: &mut Option<SurfaceHandle>,
    context: &mut Option<ContextHandle>,
) -> PlatformResult<NativeHandles> {
    platform.initialize(display)?;

    let request = ConfigRequest {
        min_buffer_bits: config.min_colour_buffer_bits,
        renderable_type: config.pipeline.renderable_type(),
    };
    let chosen = platform.choose_config(display, &request)?;

    let surface = *surface.insert(platform.create_window_surface(
        display,
        chosen,
        window.raw_window_handle(),
    )?);
    let context = *context.insert(platform.create_context(
        display,
        chosen,
        config.pipeline.client_version(),
    )?);
    platform.make_current(display, surface, context)?;

    Ok(NativeHandles {
        display,
        surface,
        context,
    })
}

fn release(
    platform: &mut dyn NativePlatform,
    display: DisplayHandle,
    surface: Option<SurfaceHandle>,
    context: Option<ContextHandle>,
) {
    if let Some(context) = context {
        platform.destroy_context(display, context);
    }
    if let Some(surface) = surface {
        platform.destroy_surface(display, surface);
    }
    platform.terminate(display);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::render::api::{ApiCall, CallLog, ProgramId, TraceApi};
    use crate::render::renderer::ForwardRenderer;
    use crate::render::resources::{Material, Shader};
    use crate::render::state::PipelineKind;
    use crate::render::window::HeadlessWindow;

    fn context<'w>(kind: PipelineKind, platform: HeadlessPlatform) -> (RenderContext<'w>, CallLog) {
        let api = TraceApi::new();
        let log = api.log();
        let context = RenderContext::new(RenderContextConfig::new(kind), Box::new(platform), Box::new(api))
            .unwrap();
        (context, log)
    }

    #[test]
    fn test_initialise_then_shutdown_releases_everything() {
        let window = HeadlessWindow::new(640, 480);
        let platform = HeadlessPlatform::new();
        let monitor = platform.monitor();
        let (mut context, log) = context(PipelineKind::Programmable, platform);

        context.bind_to_window(&window).unwrap();
        context.initialise().unwrap();

        assert_eq!(context.lifecycle(), LifecycleState::Initialised);
        assert_eq!(monitor.live_contexts(), 1);
        assert!(monitor.current().is_some());
        assert_eq!(
            log.snapshot(),
            vec![
                ApiCall::Viewport {
                    x: 0,
                    y: 0,
                    width: 640,
                    height: 480
                },
                ApiCall::ClearColour([0.4, 0.4, 0.4, 1.0]),
            ]
        );

        context.shutdown().unwrap();

        assert!(monitor.is_idle());
        assert_eq!(monitor.initialised_displays(), 0);
        let events = monitor.events();
        assert!(matches!(
            &events[events.len() - 3..],
            [
                PlatformEvent::DestroyContext(_),
                PlatformEvent::DestroySurface(_),
                PlatformEvent::Terminate(_)
            ]
        ));
        assert!(matches!(
            context.refresh(),
            Err(RenderError::InvalidLifecycle {
                operation: "refresh",
                state: LifecycleState::ShutDown
            })
        ));
        assert!(matches!(context.shutdown(), Err(RenderError::InvalidLifecycle { .. })));
    }

    #[test]
    fn test_out_of_order_calls_are_rejected() {
        let window = HeadlessWindow::new(32, 32);
        let (mut context, log) = context(PipelineKind::FixedFunction, HeadlessPlatform::new());

        assert!(matches!(
            context.initialise(),
            Err(RenderError::InvalidLifecycle {
                operation: "initialise",
                state: LifecycleState::Created
            })
        ));
        assert!(matches!(context.refresh(), Err(RenderError::InvalidLifecycle { .. })));
        assert!(matches!(context.shutdown(), Err(RenderError::InvalidLifecycle { .. })));

        context.bind_to_window(&window).unwrap();
        assert!(matches!(
            context.bind_to_window(&window),
            Err(RenderError::InvalidLifecycle { .. })
        ));

        context.initialise().unwrap();
        assert!(matches!(context.initialise(), Err(RenderError::InvalidLifecycle { .. })));
        assert_eq!(log.count(|c| matches!(c, ApiCall::Viewport { .. })), 1);
    }

    #[test]
    fn test_failed_step_rolls_back() {
        let window = HeadlessWindow::new(100, 100);
        let platform = HeadlessPlatform::failing_at(PlatformStep::CreateContext);
        let monitor = platform.monitor();
        let (mut context, log) = context(PipelineKind::Programmable, platform);
        context.bind_to_window(&window).unwrap();

        match context.initialise() {
            Err(RenderError::Platform(error)) => assert_eq!(error.step, PlatformStep::CreateContext),
            other => panic!("expected platform error, got {:?}", other),
        }
        assert!(monitor.is_idle());
        assert_eq!(context.lifecycle(), LifecycleState::Bound);
        assert!(log.is_empty());

        monitor.set_failure(None);
        context.initialise().unwrap();
        assert_eq!(monitor.live_surfaces(), 1);
    }

    #[test]
    fn test_make_current_failure_releases_context_and_surface() {
        let window = HeadlessWindow::new(100, 100);
        let platform = HeadlessPlatform::failing_at(PlatformStep::MakeCurrent);
        let monitor = platform.monitor();
        let (mut context, _log) = context(PipelineKind::FixedFunction, platform);
        context.bind_to_window(&window).unwrap();

        assert!(context.initialise().is_err());
        assert!(monitor.is_idle());
        assert_eq!(context.handles(), None);
    }

    #[test]
    fn test_context_version_follows_pipeline() {
        let window = HeadlessWindow::new(8, 8);
        for (kind, version) in [(PipelineKind::FixedFunction, 1), (PipelineKind::Programmable, 2)] {
            let platform = HeadlessPlatform::new();
            let monitor = platform.monitor();
            let (mut context, _log) = context(kind, platform);
            context.bind_to_window(&window).unwrap();
            context.initialise().unwrap();

            assert!(monitor.events().iter().any(|event| matches!(
                event,
                PlatformEvent::CreateContext { client_version, .. } if *client_version == version
            )));
            assert!(monitor.events().iter().any(|event| matches!(
                event,
                PlatformEvent::ChooseConfig(request) if request.renderable_type == kind.renderable_type()
            )));
        }
    }

    #[test]
    fn test_refresh_order() {
        let window = HeadlessWindow::new(8, 8);
        let platform = HeadlessPlatform::new();
        let monitor = platform.monitor();
        let (mut context, log) = context(PipelineKind::Programmable, platform);
        context.bind_to_window(&window).unwrap();
        context.initialise().unwrap();
        log.clear();

        context.refresh().unwrap();

        assert_eq!(
            log.snapshot(),
            vec![
                ApiCall::Disable(Capability::ScissorTest),
                ApiCall::Clear(ClearMask::COLOUR | ClearMask::DEPTH),
                ApiCall::Enable(Capability::ScissorTest),
            ]
        );
        assert_eq!(monitor.swap_count(), 1);
        assert_eq!(context.frame_count(), 1);
    }

    #[test]
    fn test_refresh_swap_failure_restores_scissor() {
        let window = HeadlessWindow::new(8, 8);
        let platform = HeadlessPlatform::new();
        let monitor = platform.monitor();
        let (mut context, log) = context(PipelineKind::Programmable, platform);
        context.bind_to_window(&window).unwrap();
        context.initialise().unwrap();
        log.clear();
        monitor.set_failure(Some(PlatformStep::SwapBuffers));

        assert!(matches!(context.refresh(), Err(RenderError::Platform(_))));
        assert_eq!(
            log.snapshot(),
            vec![
                ApiCall::Disable(Capability::ScissorTest),
                ApiCall::Enable(Capability::ScissorTest),
            ]
        );
        assert_eq!(context.frame_count(), 0);
    }

    #[test]
    fn test_draw_mesh_follows_renderer_lifetime() {
        let window = HeadlessWindow::new(8, 8);
        let (mut context, log) = context(PipelineKind::Programmable, HeadlessPlatform::new());
        context.bind_to_window(&window).unwrap();
        context.initialise().unwrap();
        let shader = context
            .resources_mut()
            .add_shader(Shader::new(ProgramId(1)).with_uniform("u_mvp", 0));
        let mesh = Mesh::new(Some(shader), Material::new(), 6);
        log.clear();

        context.draw_mesh(&mesh, &Mat4::identity()).unwrap();
        assert!(log.is_empty());

        let renderer = Rc::new(RefCell::new(ForwardRenderer::new()));
        context.set_renderer(&renderer);
        context.draw_mesh(&mesh, &Mat4::identity()).unwrap();
        assert_eq!(renderer.borrow().draw_count(), 1);
        assert!(context.has_renderer());

        drop(renderer);
        log.clear();
        assert!(!context.has_renderer());
        context.draw_mesh(&mesh, &Mat4::identity()).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_destroy_resource_releases_cached_shader() {
        let (mut context, _log) = context(PipelineKind::Programmable, HeadlessPlatform::new());
        let shader = context.resources_mut().add_shader(Shader::new(ProgramId(3)));
        let (state, resources) = context.state_and_resources();
        state.bind_shader(resources, shader).unwrap();

        assert!(context.destroy_resource(shader));
        assert_eq!(context.render_state().current_shader(), None);
        assert!(!context.resources().contains(shader));
        assert!(!context.destroy_resource(shader));
    }

    #[test]
    fn test_moved_camera_is_uploaded_again() {
        let window = HeadlessWindow::new(8, 8);
        let (mut context, log) = context(PipelineKind::FixedFunction, HeadlessPlatform::new());
        context.bind_to_window(&window).unwrap();
        context.initialise().unwrap();
        let camera = context.resources_mut().add_camera(Camera::default());
        let (state, resources) = context.state_and_resources();
        state.set_camera(resources, camera).unwrap();
        log.clear();

        let moved = Mat4::new_translation(&Vec3::new(0.0, 0.0, -9.0));
        context
            .update_camera(camera, |camera| camera.set_view(moved))
            .unwrap();

        assert_eq!(
            log.snapshot().last(),
            Some(&ApiCall::LoadMatrix(moved.to_native_handedness()))
        );
        assert_eq!(context.render_state().current_camera(), Some(camera));

        log.clear();
        let (state, resources) = context.state_and_resources();
        state.set_camera(resources, camera).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_moved_texture_matrix_is_uploaded_again() {
        let (mut context, log) = context(PipelineKind::FixedFunction, HeadlessPlatform::new());
        let matrix = context.resources_mut().add_texture_matrix(Mat4::identity());
        let (state, resources) = context.state_and_resources();
        state.set_texture_matrix(resources, matrix).unwrap();
        log.clear();

        context
            .update_texture_matrix(matrix, |m| *m = Mat4::new_scaling(4.0))
            .unwrap();

        assert!(log.snapshot().contains(&ApiCall::LoadMatrix(Mat4::new_scaling(4.0))));
    }

    #[test]
    fn test_updating_inactive_camera_issues_nothing() {
        let (mut context, log) = context(PipelineKind::FixedFunction, HeadlessPlatform::new());
        let camera = context.resources_mut().add_camera(Camera::default());

        context
            .update_camera(camera, |camera| camera.set_projection(Mat4::new_scaling(2.0)))
            .unwrap();

        assert!(log.is_empty());
        assert_eq!(
            *context.resources().camera(camera).unwrap().projection_matrix(),
            Mat4::new_scaling(2.0)
        );
    }

    #[test]
    fn test_render_target_tags() {
        let (context, _log) = context(PipelineKind::Programmable, HeadlessPlatform::new());

        assert!(matches!(
            context.create_render_target_from_tag(99, &RenderTargetOptions::default()),
            Err(RenderError::UnsupportedTargetType(99))
        ));
        let texture = context
            .create_render_target_from_tag(2, &RenderTargetOptions::sized(256, 256))
            .unwrap();
        assert_eq!(texture.kind(), RenderTargetType::Texture);
        assert_eq!(texture.size(), Some((256, 256)));
    }

    #[test]
    fn test_drop_shuts_down() {
        let window = HeadlessWindow::new(8, 8);
        let platform = HeadlessPlatform::new();
        let monitor = platform.monitor();
        {
            let (mut context, _log) = context(PipelineKind::FixedFunction, platform);
            context.bind_to_window(&window).unwrap();
            context.initialise().unwrap();
            assert!(!monitor.is_idle());
        }
        assert!(monitor.is_idle());
    }

    #[test]
    fn test_reinitialise_after_shutdown() {
        let window = HeadlessWindow::new(8, 8);
        let (mut context, _log) = context(PipelineKind::Programmable, HeadlessPlatform::new());
        context.bind_to_window(&window).unwrap();
        context.initialise().unwrap();
        context.shutdown().unwrap();

        context.initialise().unwrap();
        assert_eq!(context.lifecycle(), LifecycleState::Initialised);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RenderContextConfig::default().with_min_colour_buffer_bits(0);
        let result = RenderContext::new(config, Box::new(HeadlessPlatform::new()), Box::new(TraceApi::new()));
        assert!(matches!(result, Err(RenderError::Config(_))));
    }
}
