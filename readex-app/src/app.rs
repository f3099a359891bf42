use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use readex_render::SkiaSurface;
use readex_timing::{HighPrecisionTimer, Timer};
use readex_trial::{
    MazeParameters, MazeSession, ReadingParameters, ReadingSession, RevealStyle,
};

const DEMO_WIDTH: u32 = 800;
const STIM_HEIGHT: u32 = 240;
const FONT_PX: f32 = 30.0;
const INTER_TRIAL_MS: u64 = 500;

enum ActiveTrial {
    Maze(MazeSession<HighPrecisionTimer>),
    Reading(ReadingSession<HighPrecisionTimer>),
    Done,
}

/// Host-harness demo: runs one binary-choice trial and one self-paced
/// reading trial in a window, forwarding key events into the session and
/// printing each record as JSON when the session finalizes it.
pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    surface: SkiaSurface,
    timer: HighPrecisionTimer,
    rng: ThreadRng,
    trial: ActiveTrial,
    should_exit: bool,
}

impl App {
    pub fn new(font_path: &str) -> Result<Self> {
        let font_data = std::fs::read(font_path)
            .with_context(|| format!("reading font file {font_path}"))?;
        let surface = SkiaSurface::new(DEMO_WIDTH, STIM_HEIGHT, font_data, FONT_PX)?;

        let mut app = Self {
            window: None,
            pixels: None,
            surface,
            timer: HighPrecisionTimer::new(),
            rng: rand::rng(),
            trial: ActiveTrial::Done,
            should_exit: false,
        };
        app.start_maze()?;
        Ok(app)
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        println!("=== READING EXPERIMENT DEMO ===");
        println!("Maze trial: press E for the left word, I for the right word.");
        println!("Reading trial: press SPACE to advance. ESC exits.\n");

        event_loop.run_app(&mut self).map_err(Into::into)
    }

    fn start_maze(&mut self) -> Result<()> {
        let params = MazeParameters {
            correct: "The cat sat on the mat".to_owned(),
            distractor: "Fig dim bow pry his git".to_owned(),
            width: DEMO_WIDTH as f32,
            height: STIM_HEIGHT as f32,
            ..MazeParameters::default()
        };
        self.surface
            .preload(params.correct.split_whitespace());
        self.surface
            .preload(params.distractor.split_whitespace());

        let mut session = MazeSession::new(
            params,
            self.timer.clone(),
            &mut self.rng,
            &self.surface,
            |record| match serde_json::to_string_pretty(&record) {
                Ok(json) => println!("maze record:\n{json}"),
                Err(e) => eprintln!("failed to serialize maze record: {e}"),
            },
        )?;
        session.start(&mut self.surface);
        self.trial = ActiveTrial::Maze(session);
        Ok(())
    }

    fn start_reading(&mut self) -> Result<()> {
        let params = ReadingParameters {
            stimulus: "After the long winter the village finally saw the first \
                       light of spring touch the frozen river"
                .to_owned(),
            style: RevealStyle::Word,
            width: DEMO_WIDTH as f32,
            height: STIM_HEIGHT as f32,
            max_duration_ms: Some(120_000.0),
            ..ReadingParameters::default()
        };
        self.surface
            .preload(params.stimulus.split_whitespace());

        let mut session = ReadingSession::new(
            params,
            self.timer.clone(),
            &self.surface,
            |record| match serde_json::to_string_pretty(&record) {
                Ok(json) => println!("reading record:\n{json}"),
                Err(e) => eprintln!("failed to serialize reading record: {e}"),
            },
        )?;
        session.start(&mut self.surface);
        self.trial = ActiveTrial::Reading(session);
        Ok(())
    }

    fn create_window_and_pixels(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = PhysicalSize::new(self.surface.width(), self.surface.height());
        let window_attributes = Window::default_attributes()
            .with_title("readex")
            .with_inner_size(size)
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(
            self.surface.width(),
            self.surface.height(),
            surface_texture,
        )?);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn forward_key(&mut self, key: char) {
        debug!("key {key:?}");
        match &mut self.trial {
            ActiveTrial::Maze(session) => session.handle_key(key, &mut self.surface),
            ActiveTrial::Reading(session) => session.handle_key(key, &mut self.surface),
            ActiveTrial::Done => {}
        }
        if let Err(e) = self.advance_if_complete() {
            eprintln!("failed to start the next trial: {e}");
            self.should_exit = true;
        }
    }

    fn render(&mut self) -> Result<()> {
        match &mut self.trial {
            ActiveTrial::Maze(session) => session.tick(&mut self.surface),
            ActiveTrial::Reading(session) => session.tick(&mut self.surface),
            ActiveTrial::Done => {}
        }
        self.advance_if_complete()?;

        if let Some(pixels) = self.pixels.as_mut() {
            pixels.frame_mut().copy_from_slice(self.surface.frame());
            pixels.render()?;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        Ok(())
    }

    fn advance_if_complete(&mut self) -> Result<()> {
        if matches!(&self.trial, ActiveTrial::Maze(s) if s.is_complete()) {
            self.timer.sleep(Duration::from_millis(INTER_TRIAL_MS));
            self.start_reading()?;
        } else if matches!(&self.trial, ActiveTrial::Reading(s) if s.is_complete()) {
            self.trial = ActiveTrial::Done;
            println!("\nSession complete. Thank you!");
            self.should_exit = true;
        }
        Ok(())
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_pixels(event_loop) {
                eprintln!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    eprintln!("render failed: {e}");
                    self.cleanup_and_exit(event_loop);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) => self.cleanup_and_exit(event_loop),
                    Key::Named(NamedKey::Space) => self.forward_key(' '),
                    Key::Character(text) => {
                        if let Some(ch) = text.chars().next() {
                            self.forward_key(ch.to_ascii_lowercase());
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
