//! Window abstraction
//!
//! The render context only needs the native handles of a window and its
//! size. Windowing libraries implement [`RenderWindow`] for their window
//! type; [`HeadlessWindow`] stands in when there is no window system.

use raw_window_handle::{RawDisplayHandle, RawWindowHandle, WebDisplayHandle, WebWindowHandle};

/// A window the render context can present to
pub trait RenderWindow {
    /// Native display connection of the window
    fn raw_display_handle(&self) -> RawDisplayHandle;

    /// Native window handle
    fn raw_window_handle(&self) -> RawWindowHandle;

    /// Drawable size in pixels
    fn size(&self) -> (u32, u32);
}

/// Window without a native counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
}

impl HeadlessWindow {
    /// Create a window of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderWindow for HeadlessWindow {
    fn raw_display_handle(&self) -> RawDisplayHandle {
        RawDisplayHandle::Web(WebDisplayHandle::empty())
    }

    fn raw_window_handle(&self) -> RawWindowHandle {
        RawWindowHandle::Web(WebWindowHandle::empty())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
