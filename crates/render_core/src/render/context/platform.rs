//! Native display/context platform interface
//!
//! [`NativePlatform`] is shaped after EGL: a display is obtained from the
//! windowing system, initialised, asked for a framebuffer config, and then
//! used to create a window surface and a rendering context. Handles are
//! opaque integers owned by the platform.

use std::fmt;

use bitflags::bitflags;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use thiserror::Error;

/// Opaque native display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(pub u64);

/// Opaque native window surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Opaque native rendering context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(pub u64);

/// Opaque framebuffer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigHandle(pub u64);

bitflags! {
    /// Client APIs a framebuffer config must be renderable with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderableType: u32 {
        /// OpenGL ES 1.x
        const OPENGL_ES = 0x0001;
        /// OpenVG
        const OPENVG = 0x0002;
        /// OpenGL ES 2.x
        const OPENGL_ES2 = 0x0004;
        /// Desktop OpenGL
        const OPENGL = 0x0008;
    }
}

/// Framebuffer requirements passed to [`NativePlatform::choose_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRequest {
    /// Minimum colour buffer depth: red, green, blue and alpha bits combined
    pub min_buffer_bits: u32,
    /// Required renderable bits; empty means any
    pub renderable_type: RenderableType,
}

/// Native acquisition steps, in the order a context is brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformStep {
    /// Obtaining the display connection
    GetDisplay,
    /// Initialising the display
    Initialize,
    /// Choosing a framebuffer config
    ChooseConfig,
    /// Creating the window surface
    CreateSurface,
    /// Creating the rendering context
    CreateContext,
    /// Making the context current
    MakeCurrent,
    /// Presenting a frame
    SwapBuffers,
}

impl fmt::Display for PlatformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            PlatformStep::GetDisplay => "get display",
            PlatformStep::Initialize => "initialize display",
            PlatformStep::ChooseConfig => "choose config",
            PlatformStep::CreateSurface => "create window surface",
            PlatformStep::CreateContext => "create context",
            PlatformStep::MakeCurrent => "make current",
            PlatformStep::SwapBuffers => "swap buffers",
        };
        f.write_str(step)
    }
}

/// A native call that failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{step} failed: {reason}")]
pub struct PlatformError {
    /// Which step failed
    pub step: PlatformStep,
    /// Platform-provided description
    pub reason: String,
}

impl PlatformError {
    /// Create an error for `step`
    pub fn new(step: PlatformStep, reason: impl Into<String>) -> Self {
        Self {
            step,
            reason: reason.into(),
        }
    }
}

/// Result alias for native calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// EGL-shaped native platform
///
/// Release calls cannot fail; implementations log anything unexpected.
pub trait NativePlatform {
    /// Open the display behind `display`
    fn get_display(&mut self, display: RawDisplayHandle) -> PlatformResult<DisplayHandle>;

    /// Initialise a display
    fn initialize(&mut self, display: DisplayHandle) -> PlatformResult<()>;

    /// Pick a framebuffer config matching `request`
    fn choose_config(
        &mut self,
        display: DisplayHandle,
        request: &ConfigRequest,
    ) -> PlatformResult<ConfigHandle>;

    /// Create a surface rendering into `window`
    fn create_window_surface(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        window: RawWindowHandle,
    ) -> PlatformResult<SurfaceHandle>;

    /// Create a rendering context for client API `client_version`
    fn create_context(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        client_version: u32,
    ) -> PlatformResult<ContextHandle>;

    /// Bind `context` and `surface` to the calling thread
    fn make_current(
        &mut self,
        display: DisplayHandle,
        surface: SurfaceHandle,
        context: ContextHandle,
    ) -> PlatformResult<()>;

    /// Present the back buffer of `surface`
    fn swap_buffers(&mut self, display: DisplayHandle, surface: SurfaceHandle) -> PlatformResult<()>;

    /// Destroy a context
    fn destroy_context(&mut self, display: DisplayHandle, context: ContextHandle);

    /// Destroy a surface
    fn destroy_surface(&mut self, display: DisplayHandle, surface: SurfaceHandle);

    /// Release a display
    fn terminate(&mut self, display: DisplayHandle);
}

/// Handles acquired by a successful initialisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeHandles {
    /// Display connection
    pub display: DisplayHandle,
    /// Window surface
    pub surface: SurfaceHandle,
    /// Rendering context
    pub context: ContextHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_step() {
        let error = PlatformError::new(PlatformStep::CreateSurface, "no window");
        assert_eq!(error.to_string(), "create window surface failed: no window");
    }
}
