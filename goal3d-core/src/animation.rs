//! Keyboard commands, animation state and the per-frame tick
//!
//! Input handling is a pure reducer over [`AnimationState`]; the tick then
//! applies whatever the state asks for to the scene graph.

use tracing::{info, warn};

use crate::assembly::GoalScene;
use crate::transform::{Axis, Transform};

/// Degrees added to the ball spin each frame at speed 1
pub const SPIN_STEP_DEGREES: f32 = 2.0;
/// Uniform scale applied by one shrink action
pub const SHRINK_FACTOR: f32 = 0.95;
/// Multiplier for one speed-up or slow-down step
pub const SPEED_STEP: f32 = 1.1;
pub const MIN_SPEED: f32 = 0.01;
pub const MAX_SPEED: f32 = 100.0;

/// Front-end neutral key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Other,
}

/// Everything the keyboard can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleSpinY,
    ToggleSpinZ,
    ShrinkGoal,
    SpeedUp,
    SlowDown,
    ToggleOrbit,
    ToggleWireframe,
}

impl Command {
    /// Map a key to its command; unbound keys are ignored
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Char('1') => Some(Command::ToggleSpinY),
            Key::Char('2') => Some(Command::ToggleSpinZ),
            Key::Char('3') => Some(Command::ShrinkGoal),
            Key::Char('+') | Key::Char('=') | Key::Up => Some(Command::SpeedUp),
            Key::Char('-') | Key::Down => Some(Command::SlowDown),
            Key::Char('o') | Key::Char('O') => Some(Command::ToggleOrbit),
            Key::Char('w') | Key::Char('W') => Some(Command::ToggleWireframe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub spin_y: bool,
    pub spin_z: bool,
    /// Shrink presses not yet applied; the next tick consumes all of them
    pub shrink_pending: u32,
    pub orbit_enabled: bool,
    pub wireframe: bool,
    pub speed_factor: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            spin_y: false,
            spin_z: false,
            shrink_pending: 0,
            orbit_enabled: true,
            wireframe: false,
            speed_factor: 1.0,
        }
    }
}

impl AnimationState {
    /// Next state after one command
    pub fn reduce(self, command: Command) -> Self {
        match command {
            Command::ToggleSpinY => Self {
                spin_y: !self.spin_y,
                ..self
            },
            Command::ToggleSpinZ => Self {
                spin_z: !self.spin_z,
                ..self
            },
            Command::ShrinkGoal => Self {
                shrink_pending: self.shrink_pending.saturating_add(1),
                ..self
            },
            Command::SpeedUp => self.with_speed(self.speed_factor * SPEED_STEP),
            Command::SlowDown => self.with_speed(self.speed_factor / SPEED_STEP),
            Command::ToggleOrbit => Self {
                orbit_enabled: !self.orbit_enabled,
                ..self
            },
            Command::ToggleWireframe => Self {
                wireframe: !self.wireframe,
                ..self
            },
        }
    }

    fn with_speed(self, speed: f32) -> Self {
        let clamped = speed.clamp(MIN_SPEED, MAX_SPEED);
        if clamped != speed {
            warn!(requested = speed, clamped, "speed factor out of range");
        }
        Self {
            speed_factor: clamped,
            ..self
        }
    }

    /// Degrees of ball spin for one frame
    pub fn spin_step(&self) -> f32 {
        SPIN_STEP_DEGREES * self.speed_factor
    }
}

/// Commands collected between two frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    commands: Vec<Command>,
}

impl FrameInput {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Map raw keys, dropping unbound ones
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            commands: keys.into_iter().filter_map(Command::from_key).collect(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Fold `input` into `state`, then advance the scene by one frame
pub fn animate(scene: &mut GoalScene, state: &mut AnimationState, input: &FrameInput) {
    let before = *state;
    *state = input
        .commands()
        .iter()
        .fold(*state, |acc, command| acc.reduce(*command));

    if state.spin_y != before.spin_y {
        info!(enabled = state.spin_y, "spin about Y toggled");
    }
    if state.spin_z != before.spin_z {
        info!(enabled = state.spin_z, "spin about Z toggled");
    }
    if state.wireframe != before.wireframe {
        info!(enabled = state.wireframe, "wireframe toggled");
    }
    if state.orbit_enabled != before.orbit_enabled {
        info!(enabled = state.orbit_enabled, "orbit controls toggled");
    }
    tick(scene, state);
}

/// Apply one frame of animation for the current state
pub fn tick(scene: &mut GoalScene, state: &mut AnimationState) {
    if state.spin_y {
        let step = Transform::rotation(state.spin_step(), Axis::Y);
        scene.graph.apply_local(scene.ball, &step);
    }
    if state.spin_z {
        let step = Transform::rotation(state.spin_step(), Axis::Z);
        scene.graph.apply_local(scene.ball, &step);
    }

    if state.shrink_pending > 0 {
        let presses = state.shrink_pending;
        let factor = SHRINK_FACTOR.powi(i32::try_from(presses).unwrap_or(i32::MAX));
        scene
            .graph
            .apply_parent(scene.goal, &Transform::uniform_scale(factor));
        state.shrink_pending = 0;
        info!(presses, factor, "goal shrunk");
    }

    if scene.graph.materials().iter().any(|m| m.wireframe != state.wireframe) {
        scene.graph.set_wireframe(state.wireframe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoalConfig;
    use nalgebra::{Matrix4, Point3};
    use std::io;
    use std::sync::{Arc, Mutex};

    fn scene() -> GoalScene {
        GoalScene::build(GoalConfig::default()).unwrap()
    }

    fn press(state: AnimationState, key: char) -> AnimationState {
        match Command::from_key(Key::Char(key)) {
            Some(command) => state.reduce(command),
            None => state,
        }
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(Key::Char('1')), Some(Command::ToggleSpinY));
        assert_eq!(Command::from_key(Key::Char('2')), Some(Command::ToggleSpinZ));
        assert_eq!(Command::from_key(Key::Char('3')), Some(Command::ShrinkGoal));
        assert_eq!(Command::from_key(Key::Up), Some(Command::SpeedUp));
        assert_eq!(Command::from_key(Key::Char('+')), Some(Command::SpeedUp));
        assert_eq!(Command::from_key(Key::Down), Some(Command::SlowDown));
        assert_eq!(Command::from_key(Key::Char('-')), Some(Command::SlowDown));
        assert_eq!(Command::from_key(Key::Char('o')), Some(Command::ToggleOrbit));
        assert_eq!(Command::from_key(Key::Char('w')), Some(Command::ToggleWireframe));
        assert_eq!(Command::from_key(Key::Char('x')), None);
        assert_eq!(Command::from_key(Key::Other), None);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let initial = AnimationState::default();
        for key in ['1', '2', 'o', 'w'] {
            let once = press(initial, key);
            assert_ne!(once, initial, "key {}", key);
            assert_eq!(press(once, key), initial, "key {}", key);
        }
    }

    #[test]
    fn test_unbound_keys_leave_state_alone() {
        let initial = AnimationState::default();
        assert_eq!(press(initial, 'z'), initial);
        assert!(FrameInput::from_keys([Key::Char('q'), Key::Other]).is_empty());
    }

    #[test]
    fn test_speed_steps() {
        let mut state = AnimationState::default();
        for _ in 0..10 {
            state = press(state, '+');
        }
        assert!((state.speed_factor - 1.1f32.powi(10)).abs() < 1e-4);
        assert!((state.speed_factor - 2.594).abs() < 1e-3);
        state = press(state, '-');
        assert!((state.speed_factor - 1.1f32.powi(9)).abs() < 1e-4);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut state = AnimationState::default();
        for _ in 0..200 {
            state = state.reduce(Command::SpeedUp);
        }
        assert_eq!(state.speed_factor, MAX_SPEED);
        for _ in 0..400 {
            state = state.reduce(Command::SlowDown);
        }
        assert_eq!(state.speed_factor, MIN_SPEED);
    }

    #[test]
    fn test_shrink_fires_once() {
        let mut scene = scene();
        let mut state = AnimationState::default();
        let before = *scene.graph.local(scene.goal);

        animate(&mut scene, &mut state, &FrameInput::new(vec![Command::ShrinkGoal]));
        assert_eq!(state.shrink_pending, 0);
        for _ in 0..50 {
            animate(&mut scene, &mut state, &FrameInput::empty());
        }

        let expected = Transform::uniform_scale(SHRINK_FACTOR) * before;
        assert!((scene.graph.local(scene.goal) - expected).norm() < 1e-6);
    }

    #[test]
    fn test_shrink_presses_in_one_frame_all_apply() {
        let mut scene = scene();
        let mut state = AnimationState::default();
        let before = *scene.graph.local(scene.goal);

        let input = FrameInput::from_keys([Key::Char('3'), Key::Char('3')]);
        animate(&mut scene, &mut state, &input);
        assert_eq!(state.shrink_pending, 0);
        animate(&mut scene, &mut state, &FrameInput::empty());

        let expected = Transform::uniform_scale(SHRINK_FACTOR * SHRINK_FACTOR) * before;
        assert!((scene.graph.local(scene.goal) - expected).norm() < 1e-6);
        assert!((scene.graph.local(scene.goal)[(0, 0)] - 0.9025).abs() < 1e-6);
    }

    #[test]
    fn test_shrink_scales_goal_children() {
        let mut scene = scene();
        let mut state = AnimationState::default();
        let post = scene.graph.require(crate::assembly::names::RIGHT_POST).unwrap();
        let before = scene.graph.world_transform(post).transform_point(&Point3::origin());

        animate(&mut scene, &mut state, &FrameInput::from_keys([Key::Char('3')]));
        let after = scene.graph.world_transform(post).transform_point(&Point3::origin());
        assert!((after.coords - before.coords * SHRINK_FACTOR).norm() < 1e-6);

        // the ball is not part of the goal
        let ball = scene.graph.world_transform(scene.ball).transform_point(&Point3::origin());
        assert_eq!(ball, Point3::new(0.0, -0.5, 0.75));
    }

    #[test]
    fn test_spin_y_accumulates() {
        let mut scene = scene();
        let mut state = AnimationState::default();
        let start = *scene.graph.local(scene.ball);

        animate(&mut scene, &mut state, &FrameInput::from_keys([Key::Char('1')]));
        for _ in 1..90 {
            animate(&mut scene, &mut state, &FrameInput::empty());
        }

        // 90 ticks of 2 degrees: half a turn about the ball's own Y axis
        let spun = start.try_inverse().unwrap() * scene.graph.local(scene.ball);
        let expected = Transform::rotation(180.0, Axis::Y);
        assert!((spun - expected).norm() < 1e-3);

        // spinning in place keeps the ball where it was
        let center = scene.graph.local(scene.ball).transform_point(&Point3::origin());
        assert!((center - start.transform_point(&Point3::origin())).norm() < 1e-5);
    }

    #[test]
    fn test_spin_y_and_z_compose_in_order() {
        let mut scene = scene();
        let start = *scene.graph.local(scene.ball);
        let mut state = AnimationState {
            spin_y: true,
            spin_z: true,
            speed_factor: 5.0,
            ..Default::default()
        };
        tick(&mut scene, &mut state);

        let expected = start
            * Transform::rotation(10.0, Axis::Y)
            * Transform::rotation(10.0, Axis::Z);
        assert!((scene.graph.local(scene.ball) - expected).norm() < 1e-5);
    }

    #[test]
    fn test_idle_tick_changes_nothing() {
        let mut scene = scene();
        let mut state = AnimationState::default();
        let locals: Vec<Matrix4<f32>> = scene.graph.nodes().map(|(_, n)| n.local).collect();
        animate(&mut scene, &mut state, &FrameInput::empty());
        let after: Vec<Matrix4<f32>> = scene.graph.nodes().map(|(_, n)| n.local).collect();
        assert_eq!(locals, after);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_every_toggle_is_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut scene = scene();
            let mut state = AnimationState::default();
            let keys = ['1', '2', 'o', 'w'].map(Key::Char);
            animate(&mut scene, &mut state, &FrameInput::from_keys(keys));
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        for message in [
            "spin about Y toggled",
            "spin about Z toggled",
            "orbit controls toggled",
            "wireframe toggled",
        ] {
            assert!(logs.contains(message), "missing {:?} in {}", message, logs);
        }
    }

    #[test]
    fn test_wireframe_applies_to_materials() {
        let mut scene = scene();
        let mut state = AnimationState::default();
        animate(&mut scene, &mut state, &FrameInput::from_keys([Key::Char('w')]));
        assert!(scene.graph.materials().iter().all(|m| m.wireframe));
        animate(&mut scene, &mut state, &FrameInput::from_keys([Key::Char('w')]));
        assert!(scene.graph.materials().iter().all(|m| !m.wireframe));
    }
}
