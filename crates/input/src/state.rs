use crate::action::{Action, ActionSet};
use glam::Vec3;

pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_MOVE_SPEED: f32 = 2.5;
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Whether the window should grab and hide the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Captured,
    Free,
}

/// Input snapshot for one frame, produced by the window layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Actions whose key is currently down.
    pub held: ActionSet,
    /// Actions whose key went down since the previous frame.
    pub pressed: ActionSet,
    /// Latest cursor position in window pixels, y pointing down.
    pub cursor: Option<(f32, f32)>,
    pub window_size: (u32, u32),
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// What the camera and window should do after one frame of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDelta {
    /// New facing direction (unit length).
    pub direction: Vec3,
    /// Offset to add to the camera position.
    pub translation: Vec3,
    /// Set when the window size differs from the last one seen.
    pub resized: Option<(u32, u32)>,
    /// Set when the cursor capture flipped this frame.
    pub cursor_mode: Option<CursorMode>,
    pub quit: bool,
}

/// Look state carried across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub last_cursor: Option<(f32, f32)>,
    pub window_size: (u32, u32),
    pub cursor_captured: bool,
    pub sensitivity: f32,
    pub move_speed: f32,
}

impl InputState {
    /// Looking down -Z with the cursor captured.
    pub fn new(window_size: (u32, u32)) -> Self {
        Self {
            yaw_degrees: -90.0,
            pitch_degrees: 0.0,
            last_cursor: None,
            window_size,
            cursor_captured: true,
            sensitivity: DEFAULT_SENSITIVITY,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn cursor_mode(&self) -> CursorMode {
        if self.cursor_captured {
            CursorMode::Captured
        } else {
            CursorMode::Free
        }
    }

    pub fn direction(&self) -> Vec3 {
        direction_from_yaw_pitch(self.yaw_degrees, self.pitch_degrees)
    }

    fn look(&mut self, cursor: (f32, f32)) {
        let Some((last_x, last_y)) = self.last_cursor.replace(cursor) else {
            return;
        };
        let x_offset = (cursor.0 - last_x) * self.sensitivity;
        let y_offset = (last_y - cursor.1) * self.sensitivity;
        self.yaw_degrees += x_offset;
        self.pitch_degrees =
            (self.pitch_degrees + y_offset).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }
}

/// Unit facing vector for a yaw/pitch pair given in degrees.
///
/// Yaw -90° with zero pitch faces -Z.
pub fn direction_from_yaw_pitch(yaw_degrees: f32, pitch_degrees: f32) -> Vec3 {
    let (yaw, pitch) = (yaw_degrees.to_radians(), pitch_degrees.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
}

/// Fold one frame of input into `state` and report the camera update.
pub fn process_input(state: &mut InputState, input: &FrameInput) -> CameraDelta {
    let quit = input.pressed.contains(Action::Quit) || input.held.contains(Action::Quit);

    let resized = (input.window_size != state.window_size).then(|| {
        state.window_size = input.window_size;
        tracing::debug!(
            width = input.window_size.0,
            height = input.window_size.1,
            "window resized"
        );
        input.window_size
    });

    let mut cursor_mode = None;
    if input.pressed.contains(Action::ToggleCursor) {
        state.cursor_captured = !state.cursor_captured;
        state.last_cursor = None;
        cursor_mode = Some(state.cursor_mode());
        tracing::debug!(mode = ?state.cursor_mode(), "cursor capture toggled");
    }

    if state.cursor_captured {
        if let Some(cursor) = input.cursor {
            state.look(cursor);
        }
    }

    let front = state.direction();
    let right = front.cross(Vec3::Y).normalize_or_zero();
    let step = state.move_speed * input.dt;
    let mut translation = Vec3::ZERO;
    if input.held.contains(Action::MoveForward) {
        translation += front * step;
    }
    if input.held.contains(Action::MoveBackward) {
        translation -= front * step;
    }
    if input.held.contains(Action::StrafeLeft) {
        translation -= right * step;
    }
    if input.held.contains(Action::StrafeRight) {
        translation += right * step;
    }

    CameraDelta {
        direction: front,
        translation,
        resized,
        cursor_mode,
        quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn frame(window_size: (u32, u32)) -> FrameInput {
        FrameInput {
            held: ActionSet::EMPTY,
            pressed: ActionSet::EMPTY,
            cursor: None,
            window_size,
            dt: 0.0,
        }
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn default_direction_faces_negative_z() {
        let mut state = InputState::new((800, 600));
        let delta = process_input(&mut state, &frame((800, 600)));
        assert!(close(delta.direction, Vec3::NEG_Z));
        assert_eq!(delta.translation, Vec3::ZERO);
        assert_eq!(delta.resized, None);
        assert_eq!(delta.cursor_mode, None);
        assert!(!delta.quit);
    }

    #[test]
    fn direction_is_unit_length() {
        for (yaw, pitch) in [(0.0, 0.0), (45.0, 30.0), (-170.0, -89.0), (720.0, 89.0)] {
            let d = direction_from_yaw_pitch(yaw, pitch);
            assert!((d.length() - 1.0).abs() < EPS, "yaw {yaw} pitch {pitch}");
        }
        assert!(close(direction_from_yaw_pitch(0.0, 0.0), Vec3::X));
    }

    #[test]
    fn first_cursor_sample_is_ignored() {
        let mut state = InputState::new((800, 600));
        let mut input = frame((800, 600));
        input.cursor = Some((400.0, 300.0));
        process_input(&mut state, &input);
        assert_eq!(state.yaw_degrees, -90.0);
        assert_eq!(state.pitch_degrees, 0.0);

        input.cursor = Some((410.0, 280.0));
        process_input(&mut state, &input);
        assert!((state.yaw_degrees - -89.0).abs() < EPS);
        assert!((state.pitch_degrees - 2.0).abs() < EPS);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut state = InputState::new((800, 600));
        let mut input = frame((800, 600));
        input.cursor = Some((0.0, 10_000.0));
        process_input(&mut state, &input);
        input.cursor = Some((0.0, 0.0));
        process_input(&mut state, &input);
        assert_eq!(state.pitch_degrees, PITCH_LIMIT_DEGREES);

        input.cursor = Some((0.0, 50_000.0));
        process_input(&mut state, &input);
        assert_eq!(state.pitch_degrees, -PITCH_LIMIT_DEGREES);
    }

    #[test]
    fn free_cursor_does_not_steer() {
        let mut state = InputState::new((800, 600));
        state.cursor_captured = false;
        let mut input = frame((800, 600));
        for x in [0.0, 100.0, 300.0] {
            input.cursor = Some((x, x));
            process_input(&mut state, &input);
        }
        assert_eq!(state.yaw_degrees, -90.0);
        assert_eq!(state.last_cursor, None);
    }

    #[test]
    fn toggle_fires_on_press_edge_only() {
        let mut state = InputState::new((800, 600));
        let mut input = frame((800, 600));
        input.held.insert(Action::ToggleCursor);
        input.pressed.insert(Action::ToggleCursor);
        let delta = process_input(&mut state, &input);
        assert_eq!(delta.cursor_mode, Some(CursorMode::Free));
        assert!(!state.cursor_captured);

        input.pressed.clear();
        let delta = process_input(&mut state, &input);
        assert_eq!(delta.cursor_mode, None);
        assert!(!state.cursor_captured);

        input.pressed.insert(Action::ToggleCursor);
        let delta = process_input(&mut state, &input);
        assert_eq!(delta.cursor_mode, Some(CursorMode::Captured));
    }

    #[test]
    fn recapture_skips_stale_cursor() {
        let mut state = InputState::new((800, 600));
        let mut input = frame((800, 600));
        input.cursor = Some((100.0, 100.0));
        process_input(&mut state, &input);

        input.pressed.insert(Action::ToggleCursor);
        process_input(&mut state, &input);
        assert!(!state.cursor_captured);

        input.cursor = Some((700.0, 100.0));
        process_input(&mut state, &input);
        assert!(state.cursor_captured);
        assert_eq!(state.yaw_degrees, -90.0);

        input.pressed.clear();
        input.cursor = Some((710.0, 100.0));
        process_input(&mut state, &input);
        assert!((state.yaw_degrees - -89.0).abs() < EPS);
    }

    #[test]
    fn movement_follows_front_and_scales_with_dt() {
        let mut state = InputState::new((800, 600));
        let mut input = frame((800, 600));
        input.dt = 0.5;
        input.held.insert(Action::MoveForward);
        let delta = process_input(&mut state, &input);
        assert!(close(delta.translation, Vec3::new(0.0, 0.0, -1.25)));

        input.held = [Action::MoveForward, Action::MoveBackward].into_iter().collect();
        let delta = process_input(&mut state, &input);
        assert!(close(delta.translation, Vec3::ZERO));
    }

    #[test]
    fn strafe_uses_front_cross_up() {
        let mut state = InputState::new((800, 600)).with_move_speed(1.0);
        let mut input = frame((800, 600));
        input.dt = 1.0;
        input.held.insert(Action::StrafeRight);
        let delta = process_input(&mut state, &input);
        assert!(close(delta.translation, Vec3::X));

        input.held = ActionSet::EMPTY;
        input.held.insert(Action::StrafeLeft);
        let delta = process_input(&mut state, &input);
        assert!(close(delta.translation, Vec3::NEG_X));
    }

    #[test]
    fn resize_reported_once() {
        let mut state = InputState::new((800, 600));
        let input = frame((1024, 768));
        assert_eq!(process_input(&mut state, &input).resized, Some((1024, 768)));
        assert_eq!(process_input(&mut state, &input).resized, None);
        assert_eq!(state.window_size, (1024, 768));
    }

    #[test]
    fn quit_is_reported() {
        let mut state = InputState::new((800, 600));
        let mut input = frame((800, 600));
        input.pressed.insert(Action::Quit);
        assert!(process_input(&mut state, &input).quit);
    }
}
