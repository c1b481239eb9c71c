//! Debug markers for commanded positions.
//!
//! Rendering belongs to whoever drives the simulation. The evaluator only
//! describes where each environment's command sits; a driver hands those
//! descriptions to a [`StepObserver`] once per step.

/// Height at which command markers are drawn.
pub const MARKER_HEIGHT: f32 = 2.0;
pub const MARKER_RADIUS: f32 = 0.1;
pub const MARKER_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

/// A wireframe sphere placed at an environment's commanded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandMarker {
    pub location: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
}

impl CommandMarker {
    /// Marker for `command` in an environment whose origin is `origin`.
    ///
    /// The command is measured along the origin's y axis.
    #[must_use]
    pub fn at(origin: [f32; 3], command: f32) -> Self {
        Self {
            location: [origin[0], origin[1] + command, MARKER_HEIGHT],
            radius: MARKER_RADIUS,
            color: MARKER_COLOR,
        }
    }
}

/// Receives per-step debug output from a driver.
pub trait StepObserver {
    /// Called before the markers of a new step are emitted.
    fn begin_step(&mut self) {}

    fn on_marker(&mut self, env: usize, marker: CommandMarker);
}
