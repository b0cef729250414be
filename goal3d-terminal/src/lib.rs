/// Terminal front end for the goal scene
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use goal3d_core::{animate, AnimationState, Camera, FrameInput, GoalScene, Key};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod controls;
pub mod renderer;

pub use controls::OrbitControls;
pub use renderer::{AsciiRenderer, CELL_ASPECT};

/// Radians per orbit key press
const ORBIT_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 1.1;

/// Keys the terminal handles itself instead of passing to the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewAction {
    Quit,
    Orbit { azimuth: f32, elevation: f32 },
    Zoom(f32),
}

/// Where a key press ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Routed {
    View(ViewAction),
    Scene(Key),
}

/// Split a key press into a terminal action or a scene key
pub fn translate_key(code: KeyCode) -> Routed {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Routed::View(ViewAction::Quit),
        KeyCode::Left => Routed::View(ViewAction::Orbit {
            azimuth: -ORBIT_STEP,
            elevation: 0.0,
        }),
        KeyCode::Right => Routed::View(ViewAction::Orbit {
            azimuth: ORBIT_STEP,
            elevation: 0.0,
        }),
        KeyCode::PageUp => Routed::View(ViewAction::Zoom(1.0 / ZOOM_STEP)),
        KeyCode::PageDown => Routed::View(ViewAction::Zoom(ZOOM_STEP)),
        KeyCode::Char(c) => Routed::Scene(Key::Char(c)),
        KeyCode::Up => Routed::Scene(Key::Up),
        KeyCode::Down => Routed::Scene(Key::Down),
        _ => Routed::Scene(Key::Other),
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: GoalScene,
    state: AnimationState,
    camera: Camera,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: GoalScene, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let camera = camera_for(width, height);
        let controls = OrbitControls::new(&camera);

        Ok(Self {
            scene,
            state: AnimationState::default(),
            camera,
            controls,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_millis(1000 / u64::from(target_fps.max(1))),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        info!(frame_ms = self.frame_time.as_millis() as u64, "starting render loop");

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            let input = self.poll_input()?;

            // Update
            self.update(&input);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("render loop stopped");
        Ok(())
    }

    /// Drain pending events into one frame's worth of scene keys
    fn poll_input(&mut self) -> io::Result<FrameInput> {
        let mut keys = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                    match translate_key(code) {
                        Routed::View(action) => self.apply_view_action(action),
                        Routed::Scene(key) => keys.push(key),
                    }
                }
                Event::Resize(width, height) => self.resize(width, height),
                _ => {}
            }
        }
        Ok(FrameInput::from_keys(keys))
    }

    fn apply_view_action(&mut self, action: ViewAction) {
        match action {
            ViewAction::Quit => self.running = false,
            ViewAction::Orbit { azimuth, elevation } => self.controls.rotate(azimuth, elevation),
            ViewAction::Zoom(factor) => self.controls.zoom(factor),
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "terminal resized");
        self.renderer.resize(width as usize, height as usize);
        self.camera
            .set_viewport(u32::from(width), u32::from(height), CELL_ASPECT);
    }

    fn update(&mut self, input: &FrameInput) {
        animate(&mut self.scene, &mut self.state, input);
        self.controls.set_enabled(self.state.orbit_enabled);
        self.controls.update(&mut self.camera);
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render scene
        self.renderer.render_scene(&self.scene.graph, &self.camera);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(
                status_line(&self.state, self.fps)
                    .chars()
                    .take(self.renderer.width())
                    .collect::<String>()
            ),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn camera_for(width: u16, height: u16) -> Camera {
    let mut camera = Camera::default();
    camera.set_viewport(u32::from(width), u32::from(height), CELL_ASPECT);
    camera
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

const HELP: &str = "1/2 spin 3 shrink +/- speed o orbit w wire q quit";

/// One-line summary drawn over the top row
pub fn status_line(state: &AnimationState, fps: f32) -> String {
    format!(
        "FPS {:.1} | speed x{:.2} | spinY {} spinZ {} orbit {} wire {} | {}",
        fps,
        state.speed_factor,
        on_off(state.spin_y),
        on_off(state.spin_z),
        on_off(state.orbit_enabled),
        on_off(state.wireframe),
        HELP,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use goal3d_core::Command;

    #[test]
    fn test_every_command_has_a_key() {
        let codes = [
            KeyCode::Char('1'),
            KeyCode::Char('2'),
            KeyCode::Char('3'),
            KeyCode::Char('+'),
            KeyCode::Char('-'),
            KeyCode::Char('o'),
            KeyCode::Char('w'),
        ];
        let commands: Vec<Command> = codes
            .into_iter()
            .filter_map(|code| match translate_key(code) {
                Routed::Scene(key) => Some(key),
                Routed::View(_) => None,
            })
            .filter_map(Command::from_key)
            .collect();
        assert_eq!(
            commands,
            vec![
                Command::ToggleSpinY,
                Command::ToggleSpinZ,
                Command::ShrinkGoal,
                Command::SpeedUp,
                Command::SlowDown,
                Command::ToggleOrbit,
                Command::ToggleWireframe,
            ]
        );
    }

    #[test]
    fn test_arrows_split_between_speed_and_orbit() {
        assert_eq!(translate_key(KeyCode::Up), Routed::Scene(Key::Up));
        assert_eq!(translate_key(KeyCode::Down), Routed::Scene(Key::Down));
        assert!(matches!(
            translate_key(KeyCode::Left),
            Routed::View(ViewAction::Orbit { .. })
        ));
        assert!(matches!(
            translate_key(KeyCode::PageUp),
            Routed::View(ViewAction::Zoom(f)) if f < 1.0
        ));
    }

    #[test]
    fn test_camera_aspect_uses_cell_shape() {
        let camera = camera_for(120, 40);
        assert!((camera.aspect - 120.0 / (40.0 * CELL_ASPECT)).abs() < 1e-6);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(translate_key(KeyCode::Char('q')), Routed::View(ViewAction::Quit));
        assert_eq!(translate_key(KeyCode::Esc), Routed::View(ViewAction::Quit));
        assert_eq!(translate_key(KeyCode::Tab), Routed::Scene(Key::Other));
    }

    #[test]
    fn test_status_line_reports_toggles() {
        let state = AnimationState::default().reduce(Command::ToggleSpinY);
        let line = status_line(&state, 30.0);
        assert!(line.contains("spinY on"));
        assert!(line.contains("spinZ off"));
        assert!(line.contains("orbit on"));
        assert!(line.contains("x1.00"));
    }
}
