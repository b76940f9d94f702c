//! Render context lifecycle states

use std::fmt;

/// Where a render context is in its lifecycle
///
/// `Created → Bound → Initialised → ShutDown`, with `ShutDown → Initialised`
/// allowed again since the window binding survives a shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, no window yet
    Created,
    /// Window bound, no native resources
    Bound,
    /// Native display, surface and context are live
    Initialised,
    /// Native resources released
    ShutDown,
}

impl LifecycleState {
    /// Whether `initialise` may run from this state
    pub const fn can_initialise(self) -> bool {
        matches!(self, LifecycleState::Bound | LifecycleState::ShutDown)
    }

    /// Whether native resources are live
    pub const fn is_initialised(self) -> bool {
        matches!(self, LifecycleState::Initialised)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            LifecycleState::Created => "created",
            LifecycleState::Bound => "bound",
            LifecycleState::Initialised => "initialised",
            LifecycleState::ShutDown => "shut down",
        };
        f.write_str(state)
    }
}
