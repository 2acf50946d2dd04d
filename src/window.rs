//! Desktop host: a winit window that mounts the animation full-bleed.
//!
//! [`WinitScheduler`] maps the [`FrameScheduler`] contract onto winit:
//! a frame request becomes `request_redraw`, and the matching
//! `RedrawRequested` delivers it. Pointer and resize events are forwarded
//! only while the animator holds a subscription for them; the pointer
//! subscription covers both moving and leaving.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::canvas::DrawList;
use crate::config::NetworkConfig;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::input::{from_cursor, surface_local};
use crate::lifecycle::{Animator, FrameRequest, FrameScheduler, ListenerId, Signal};
use crate::time::FrameClock;

const TITLE: &str = "neuralbg";

/// The drawing surface fills the whole client area.
const SURFACE_ORIGIN: Vec2 = Vec2::ZERO;

/// Frame and listener bookkeeping on top of a winit window.
#[derive(Default)]
pub struct WinitScheduler {
    window: Option<Arc<Window>>,
    next_id: u64,
    pending: Option<FrameRequest>,
    listeners: HashMap<ListenerId, Signal>,
}

impl WinitScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window that receives redraw requests.
    pub fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    /// Claim the frame request a redraw should fulfill.
    pub fn take_pending(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn is_listening(&self, signal: Signal) -> bool {
        self.listeners.values().any(|s| *s == signal)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameScheduler for WinitScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id());
        self.pending = Some(request);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    fn subscribe(&mut self, signal: Signal) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, signal);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

pub struct App {
    seed: Option<u64>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    animator: Animator<WinitScheduler>,
    frame: DrawList,
    clock: FrameClock,
}

impl App {
    pub fn new(config: NetworkConfig, seed: Option<u64>) -> Self {
        Self {
            seed,
            window: None,
            gpu: None,
            animator: Animator::new(WinitScheduler::new(), config),
            frame: DrawList::new(),
            clock: FrameClock::new(),
        }
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Space) => {
                let paused = self.clock.toggle_pause();
                log::info!("{}", if paused { "paused" } else { "resumed" });
                if let Some(window) = &self.window {
                    if paused {
                        window.set_title(&format!("{} (paused)", TITLE));
                    } else {
                        window.request_redraw();
                    }
                }
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.animator.stop();
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(window)) = (self.gpu.as_mut(), self.window.as_ref()) else {
            return;
        };

        // A paused animation keeps presenting its last frame.
        if !self.clock.is_paused() {
            if let Some(request) = self.animator.scheduler_mut().take_pending() {
                self.frame.reset();
                if let Some(stats) = self.animator.on_frame(request, &mut self.frame) {
                    log::trace!(
                        "links={} packets={} spawned={} removed={}",
                        stats.links,
                        stats.packets,
                        stats.spawned,
                        stats.packets_removed
                    );
                }
                if self.clock.tick() {
                    window.set_title(&format!("{} - {:.0} fps", TITLE, self.clock.fps()));
                }
            }
        }

        match gpu.render(&self.frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.animator.stop();
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.animator.scheduler_mut().attach(window.clone());
        self.window = Some(window.clone());

        let surface = match pollster::block_on(GpuState::new(window)) {
            Ok(gpu) => {
                let size = gpu.logical_size();
                self.gpu = Some(gpu);
                Some(size)
            }
            Err(e) => {
                log::error!("{}", e);
                None
            }
        };

        let rng = self.rng();
        self.animator.start(surface, rng);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.animator.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size, scale_factor);
                    if self.animator.scheduler().is_listening(Signal::Resize) {
                        self.animator.on_resize(gpu.logical_size());
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.animator.scheduler().is_listening(Signal::PointerMove) {
                    let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                    let client = from_cursor(position, scale_factor);
                    self.animator.on_pointer_move(surface_local(client, SURFACE_ORIGIN));
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if self.animator.scheduler().is_listening(Signal::PointerMove) {
                    self.animator.on_pointer_leave();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open a window and run the animation until it is closed.
pub fn run(config: NetworkConfig, seed: Option<u64>) -> Result<(), RunError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, seed);
    event_loop.run_app(&mut app)?;
    Ok(())
}
