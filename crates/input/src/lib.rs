//! Input handling: key actions and cursor motion turned into camera deltas.
//!
//! The window layer translates its own events into [`Action`]s and a
//! [`FrameInput`] snapshot; [`process_input`] folds that into the persistent
//! [`InputState`] and reports what the camera should do this frame.
//!
//! # Invariants
//! - Pitch never leaves `[-89°, 89°]`.
//! - Cursor motion only steers the camera while the cursor is captured.
//! - Nothing here touches the window system or the GPU.

pub mod action;
pub mod state;

pub use action::{Action, ActionSet};
pub use state::{
    CameraDelta, CursorMode, FrameInput, InputState, direction_from_yaw_pitch, process_input,
};

pub fn crate_info() -> &'static str {
    "lumen-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
