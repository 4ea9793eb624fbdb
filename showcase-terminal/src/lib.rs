/// Terminal host for the scroll-driven showcase
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use showcase_core::{AssetHandle, Camera, ScrollState, Showcase};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod overlay;
pub mod renderer;

pub use cli::Cli;
pub use overlay::Overlay;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Fraction of a viewport scrolled per arrow key or wheel notch
const LINE_STEP: f64 = 0.1;

/// What an input event asks of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Scroll(f64),
    PageUp,
    PageDown,
    Home,
    End,
    Quit,
}

impl Action {
    pub fn from_event(event: &Event) -> Option<Action> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => Self::from_key(*code),
            Event::Mouse(MouseEvent { kind, .. }) => match kind {
                MouseEventKind::ScrollDown => Some(Action::Scroll(LINE_STEP)),
                MouseEventKind::ScrollUp => Some(Action::Scroll(-LINE_STEP)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn from_key(code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::Scroll(LINE_STEP)),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::Scroll(-LINE_STEP)),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Home | KeyCode::Char('g') => Some(Action::Home),
            KeyCode::End | KeyCode::Char('G') => Some(Action::End),
            _ => None,
        }
    }

    /// Apply to the scroll state. Returns false when the app should stop.
    pub fn apply(self, scroll: &mut ScrollState) -> bool {
        match self {
            Action::Scroll(viewports) => scroll.scroll_by(viewports),
            Action::PageUp => scroll.page_up(),
            Action::PageDown => scroll.page_down(),
            Action::Home => scroll.home(),
            Action::End => scroll.end(),
            Action::Quit => return false,
        }
        true
    }
}

/// Main application struct for the terminal showcase
pub struct TerminalApp {
    stage: Showcase,
    asset: AssetHandle,
    scroll: ScrollState,
    camera: Camera,
    renderer: AsciiRenderer,
    overlay: Overlay,
    frame_time: Duration,
    running: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(
        stage: Showcase,
        asset: AssetHandle,
        scroll: ScrollState,
        frame_time: Duration,
    ) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut app = Self {
            stage,
            asset,
            scroll,
            camera: Camera::showcase(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            overlay: Overlay::default(),
            frame_time,
            running: true,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(width, height);
        Ok(app)
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.renderer.resize(width as usize, height as usize);
        self.camera.aspect = width as f32 / (height.max(1) as f32 * CELL_ASPECT);
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut last_frame = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = frame_start - last_frame;
            last_frame = frame_start;

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update(dt);

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
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Resize(width, height) = event {
            self.resize(width, height);
            return;
        }
        if let Some(action) = Action::from_event(&event) {
            self.running = action.apply(&mut self.scroll);
        }
    }

    fn update(&mut self, dt: Duration) {
        self.scroll.update(dt);
        self.stage.poll_assets(&mut self.asset);
        if let Some(change) = self.stage.frame(Some(self.scroll.offset()), dt) {
            log::info!("switched to {} view", change.to);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render the active model inside its floating group
        let group = self.stage.group_pose();
        self.renderer
            .render_model(self.stage.active_model(), &group, &self.camera);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw page copy
        let lines = self.overlay.layout(
            &self.scroll,
            self.renderer.width() as u16,
            self.renderer.height() as u16,
        );
        self.overlay.draw(&mut stdout, &lines)?;

        // Draw status line
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let section = self
            .overlay
            .current_section(&self.scroll)
            .map(|i| i + 1)
            .unwrap_or(1);
        let model = if self.stage.is_fallback() {
            format!("placeholder ({} {})", self.asset.name(), self.stage.asset_status())
        } else {
            self.asset.name().to_string()
        };
        format!(
            "FPS: {:.1} | Scroll: {:>3.0}% | Section {}/4 | {} | {} | j/k/wheel=Scroll PgUp/PgDn Home/End Q=Quit",
            self.fps,
            self.scroll.offset() * 100.0,
            section,
            self.stage.mode(),
            model,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from_key(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(Action::from_key(KeyCode::Down), Some(Action::Scroll(LINE_STEP)));
        assert_eq!(Action::from_key(KeyCode::PageUp), Some(Action::PageUp));
        assert_eq!(Action::from_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_mouse_wheel_scrolls() {
        let wheel = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(Action::from_event(&wheel), Some(Action::Scroll(-LINE_STEP)));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: event::KeyEventState::NONE,
        });
        assert_eq!(Action::from_event(&release), None);
    }

    #[test]
    fn test_actions_move_the_page() {
        let mut scroll = ScrollState::new(4.0, 0.0);
        assert!(Action::End.apply(&mut scroll));
        assert_eq!(scroll.target(), 1.0);
        assert!(Action::PageUp.apply(&mut scroll));
        assert!((scroll.target() - 2.0 / 3.0).abs() < 1e-12);
        assert!(Action::Scroll(-0.5).apply(&mut scroll));
        assert!((scroll.target() - 0.5).abs() < 1e-12);
        assert!(!Action::Quit.apply(&mut scroll));
    }
}
