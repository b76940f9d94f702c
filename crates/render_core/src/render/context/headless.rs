//! In-memory native platform
//!
//! [`HeadlessPlatform`] hands out fresh handles, tracks which of them are
//! alive and can be told to fail at any [`PlatformStep`]. The paired
//! [`HeadlessMonitor`] observes the same state after the platform has been
//! moved into a render context.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use super::platform::{
    ConfigHandle, ConfigRequest, ContextHandle, DisplayHandle, NativePlatform, PlatformError,
    PlatformResult, PlatformStep, SurfaceHandle,
};

/// One native call observed by the headless platform
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PlatformEvent {
    GetDisplay(DisplayHandle),
    Initialize(DisplayHandle),
    ChooseConfig(ConfigRequest),
    CreateSurface(SurfaceHandle),
    CreateContext { context: ContextHandle, client_version: u32 },
    MakeCurrent(ContextHandle),
    SwapBuffers(SurfaceHandle),
    DestroyContext(ContextHandle),
    DestroySurface(SurfaceHandle),
    Terminate(DisplayHandle),
}

#[derive(Debug, Default)]
struct Inner {
    next_handle: u64,
    failing: Option<PlatformStep>,
    displays: HashSet<DisplayHandle>,
    initialised: HashSet<DisplayHandle>,
    surfaces: HashSet<SurfaceHandle>,
    contexts: HashSet<ContextHandle>,
    current: Option<(SurfaceHandle, ContextHandle)>,
    swaps: usize,
    events: Vec<PlatformEvent>,
}

impl Inner {
    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn check(&self, step: PlatformStep) -> PlatformResult<()> {
        if self.failing == Some(step) {
            Err(PlatformError::new(step, "injected failure"))
        } else {
            Ok(())
        }
    }
}

/// Native platform backed by plain memory
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    inner: Rc<RefCell<Inner>>,
}

impl HeadlessPlatform {
    /// Create a platform on which every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a platform whose `step` always fails
    pub fn failing_at(step: PlatformStep) -> Self {
        let platform = Self::new();
        platform.inner.borrow_mut().failing = Some(step);
        platform
    }

    /// Observer sharing this platform's state
    pub fn monitor(&self) -> HeadlessMonitor {
        HeadlessMonitor {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl NativePlatform for HeadlessPlatform {
    fn get_display(&mut self, _display: RawDisplayHandle) -> PlatformResult<DisplayHandle> {
        let mut inner = self.inner.borrow_mut();
        inner.check(PlatformStep::GetDisplay)?;
        let display = DisplayHandle(inner.allocate());
        inner.displays.insert(display);
        inner.events.push(PlatformEvent::GetDisplay(display));
        Ok(display)
    }

    fn initialize(&mut self, display: DisplayHandle) -> PlatformResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check(PlatformStep::Initialize)?;
        if !inner.displays.contains(&display) {
            return Err(PlatformError::new(PlatformStep::Initialize, "unknown display"));
        }
        inner.initialised.insert(display);
        inner.events.push(PlatformEvent::Initialize(display));
        Ok(())
    }

    fn choose_config(
        &mut self,
        _display: DisplayHandle,
        request: &ConfigRequest,
    ) -> PlatformResult<ConfigHandle> {
        let mut inner = self.inner.borrow_mut();
        inner.check(PlatformStep::ChooseConfig)?;
        inner.events.push(PlatformEvent::ChooseConfig(*request));
        Ok(ConfigHandle(inner.allocate()))
    }

    fn create_window_surface(
        &mut self,
        _display: DisplayHandle,
        _config: ConfigHandle,
        _window: RawWindowHandle,
    ) -> PlatformResult<SurfaceHandle> {
        let mut inner = self.inner.borrow_mut();
        inner.check(PlatformStep::CreateSurface)?;
        let surface = SurfaceHandle(inner.allocate());
        inner.surfaces.insert(surface);
        inner.events.push(PlatformEvent::CreateSurface(surface));
        Ok(surface)
    }

    fn create_context(
        &mut self,
        _display: DisplayHandle,
        _config: ConfigHandle,
        client_version: u32,
    ) -> PlatformResult<ContextHandle> {
        let mut inner = self.inner.borrow_mut();
        inner.check(PlatformStep::CreateContext)?;
        let context = ContextHandle(inner.allocate());
        inner.contexts.insert(context);
        inner.events.push(PlatformEvent::CreateContext {
            context,
            client_version,
        });
        Ok(context)
    }

    fn make_current(
        &mut self,
        _display: DisplayHandle,
        surface: SurfaceHandle,
        context: ContextHandle,
    ) -> PlatformResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check(PlatformStep::MakeCurrent)?;
        if !inner.surfaces.contains(&surface) || !inner.contexts.contains(&context) {
            return Err(PlatformError::new(PlatformStep::MakeCurrent, "stale handle"));
        }
        inner.current = Some((surface, context));
        inner.events.push(PlatformEvent::MakeCurrent(context));
        Ok(())
    }

    fn swap_buffers(&mut self, _display: DisplayHandle, surface: SurfaceHandle) -> PlatformResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check(PlatformStep::SwapBuffers)?;
        inner.swaps += 1;
        inner.events.push(PlatformEvent::SwapBuffers(surface));
        Ok(())
    }

    fn destroy_context(&mut self, _display: DisplayHandle, context: ContextHandle) {
        let mut inner = self.inner.borrow_mut();
        if !inner.contexts.remove(&context) {
            log::warn!("Destroying unknown context {:?}", context);
        }
        if inner.current.map_or(false, |(_, current)| current == context) {
            inner.current = None;
        }
        inner.events.push(PlatformEvent::DestroyContext(context));
    }

    fn destroy_surface(&mut self, _display: DisplayHandle, surface: SurfaceHandle) {
        let mut inner = self.inner.borrow_mut();
        if !inner.surfaces.remove(&surface) {
            log::warn!("Destroying unknown surface {:?}", surface);
        }
        inner.events.push(PlatformEvent::DestroySurface(surface));
    }

    fn terminate(&mut self, display: DisplayHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.initialised.remove(&display);
        inner.displays.remove(&display);
        inner.events.push(PlatformEvent::Terminate(display));
    }
}

/// Read side of a [`HeadlessPlatform`]
#[derive(Debug, Clone)]
pub struct HeadlessMonitor {
    inner: Rc<RefCell<Inner>>,
}

impl HeadlessMonitor {
    /// Displays obtained and not yet terminated
    pub fn live_displays(&self) -> usize {
        self.inner.borrow().displays.len()
    }

    /// Displays initialised and not yet terminated
    pub fn initialised_displays(&self) -> usize {
        self.inner.borrow().initialised.len()
    }

    /// Surfaces created and not yet destroyed
    pub fn live_surfaces(&self) -> usize {
        self.inner.borrow().surfaces.len()
    }

    /// Contexts created and not yet destroyed
    pub fn live_contexts(&self) -> usize {
        self.inner.borrow().contexts.len()
    }

    /// Whether no native handle is alive
    pub fn is_idle(&self) -> bool {
        self.live_displays() == 0 && self.live_surfaces() == 0 && self.live_contexts() == 0
    }

    /// Surface and context currently bound
    pub fn current(&self) -> Option<(SurfaceHandle, ContextHandle)> {
        self.inner.borrow().current
    }

    /// Successful swaps so far
    pub fn swap_count(&self) -> usize {
        self.inner.borrow().swaps
    }

    /// Every successful call, oldest first
    pub fn events(&self) -> Vec<PlatformEvent> {
        self.inner.borrow().events.clone()
    }

    /// Make `step` fail from now on, or succeed again with `None`
    pub fn set_failure(&self, step: Option<PlatformStep>) {
        self.inner.borrow_mut().failing = step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::context::RenderableType;
    use raw_window_handle::{WebDisplayHandle, WebWindowHandle};

    #[test]
    fn test_handles_are_tracked() {
        let mut platform = HeadlessPlatform::new();
        let monitor = platform.monitor();

        let display = platform
            .get_display(RawDisplayHandle::Web(WebDisplayHandle::empty()))
            .unwrap();
        platform.initialize(display).unwrap();
        let config = platform
            .choose_config(
                display,
                &ConfigRequest {
                    min_buffer_bits: 16,
                    renderable_type: RenderableType::empty(),
                },
            )
            .unwrap();
        let surface = platform
            .create_window_surface(display, config, RawWindowHandle::Web(WebWindowHandle::empty()))
            .unwrap();
        let context = platform.create_context(display, config, 2).unwrap();
        platform.make_current(display, surface, context).unwrap();

        assert_eq!(monitor.current(), Some((surface, context)));
        assert_eq!(monitor.live_contexts(), 1);

        platform.destroy_context(display, context);
        platform.destroy_surface(display, surface);
        platform.terminate(display);

        assert!(monitor.is_idle());
        assert_eq!(monitor.current(), None);
    }

    #[test]
    fn test_injected_failure() {
        let mut platform = HeadlessPlatform::failing_at(PlatformStep::GetDisplay);
        let result = platform.get_display(RawDisplayHandle::Web(WebDisplayHandle::empty()));

        assert_eq!(result.unwrap_err().step, PlatformStep::GetDisplay);
        assert!(platform.monitor().events().is_empty());
    }
}
