use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::clock::{normalize_fps_cap, normalize_non_zero_duration};
use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::rendering::{Renderer, Surface};
use super::{Engine, FrameClock, InputAction, InputEvent, InputSnapshot, NodeBehavior, Vec2};

const FPS_TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
const FPS_TEXT_ORIGIN: Vec2 = Vec2 { x: 8.0, y: 8.0 };

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: Option<u32>,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub show_fps: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Saila".to_string(),
            window_width: 800,
            window_height: 600,
            target_fps: Some(60),
            max_frame_delta: Duration::from_millis(250),
            metrics_log_interval: Duration::from_secs(1),
            show_fps: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens a window sized to the play field and drives `engine` until it stops
/// or the window closes.
pub fn run_app<B: NodeBehavior + 'static>(
    config: LoopConfig,
    mut engine: Engine<B>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(
        Arc::clone(&window),
        config.window_width,
        config.window_height,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_fps = normalize_fps_cap(config.target_fps);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));

    info!(
        target_fps = ?target_fps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let mut clock = FrameClock::new(max_frame_delta);
    let mut metrics = MetricsAccumulator::new(metrics_log_interval);
    let mut input_collector = InputCollector::default();
    let mut last_applied_title: Option<String> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.push_event(InputEvent::Quit);
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                }
                WindowEvent::RedrawRequested => {
                    let frame_dt = clock.tick(target_fps);
                    let now = Instant::now();

                    engine.handle_events(input_collector.drain_events());
                    if !engine.is_running() {
                        window_target.exit();
                        return;
                    }

                    let input = input_collector.snapshot();
                    engine.update(frame_dt.as_secs_f32(), &input);
                    metrics.record_tick();

                    let fps = metrics.latest().fps;
                    let drawn = renderer.render_with(|canvas| {
                        engine.draw(canvas);
                        if config.show_fps {
                            canvas.draw_text(
                                FPS_TEXT_ORIGIN,
                                &format!("FPS: {}", fps.round() as u32),
                                FPS_TEXT_COLOR,
                            );
                        }
                    });
                    if let Err(error) = drawn {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }

                    let next_title = engine.debug_title();
                    if next_title != last_applied_title {
                        match &next_title {
                            Some(title) => window.set_title(title),
                            None => window.set_title(&config.window_title),
                        }
                        last_applied_title = next_title;
                    }

                    metrics.record_frame(frame_dt);
                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            node_count = engine.graph().len(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Folds winit keyboard events into held-action state plus a queue of
/// discrete events for the next frame.
#[derive(Debug, Default)]
struct InputCollector {
    action_states: ActionStates,
    pending_events: Vec<InputEvent>,
}

impl InputCollector {
    fn push_event(&mut self, event: InputEvent) {
        self.pending_events.push(event);
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.handle_physical_key(key_event.physical_key, is_pressed, key_event.repeat);
    }

    fn handle_physical_key(&mut self, key: PhysicalKey, is_pressed: bool, repeat: bool) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        self.action_states.set(action, is_pressed);
        if is_pressed && !repeat {
            self.push_event(InputEvent::KeyDown(action));
        }
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::new(self.action_states)
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    match key {
        PhysicalKey::Code(KeyCode::Space)
        | PhysicalKey::Code(KeyCode::ArrowUp)
        | PhysicalKey::Code(KeyCode::KeyW) => Some(InputAction::Jump),
        PhysicalKey::Code(KeyCode::KeyR) | PhysicalKey::Code(KeyCode::Enter) => {
            Some(InputAction::Restart)
        }
        PhysicalKey::Code(KeyCode::Escape) => Some(InputAction::Quit),
        _ => None,
    }
}
