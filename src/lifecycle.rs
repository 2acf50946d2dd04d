//! Mount/unmount lifecycle of the animation.
//!
//! The host environment is abstracted as a [`FrameScheduler`]: something that
//! can deliver one frame callback on request and forward pointer/resize
//! signals to registered listeners. [`Animator`] owns the scene and all of its
//! registrations:
//!
//! - [`Animator::start`] builds the scene, subscribes to both signals and
//!   requests the first frame
//! - every fulfilled frame runs one tick and requests the next
//! - [`Animator::stop`] is the single teardown routine: it unsubscribes both
//!   listeners, cancels the pending frame and discards the scene
//!
//! If the drawing surface is unavailable at start, or the configuration is
//! invalid, nothing is set up and nothing is scheduled. Signals delivered after stop are ignored.
//!
//! # Example
//!
//! ```ignore
//! let mut animator = Animator::new(scheduler, NetworkConfig::attract());
//! animator.start(Some(Vec2::new(1280.0, 720.0)), SmallRng::from_entropy());
//!
//! // host delivers the pending frame
//! animator.on_frame(request, &mut draw_list);
//!
//! animator.stop();
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::canvas::Canvas;
use crate::config::NetworkConfig;
use crate::scene::{Scene, TickStats};

/// Input signals a mounted animation listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    PointerMove,
    Resize,
}

/// Handle of one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Handle of one signal subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Host-side scheduling of frame callbacks and input listeners.
pub trait FrameScheduler {
    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameRequest;
    /// Withdraw a frame request that has not been delivered yet.
    fn cancel_frame(&mut self, request: FrameRequest);
    /// Start forwarding `signal`.
    fn subscribe(&mut self, signal: Signal) -> ListenerId;
    /// Stop forwarding the signal registered under `id`.
    fn unsubscribe(&mut self, id: ListenerId);
}

/// Registrations held while mounted.
#[derive(Debug)]
struct Mount {
    pointer: ListenerId,
    resize: ListenerId,
    pending: Option<FrameRequest>,
}

/// Owns a scene for the duration of a mount.
pub struct Animator<S: FrameScheduler, R: Rng = SmallRng> {
    scheduler: S,
    config: NetworkConfig,
    scene: Option<Scene<R>>,
    mount: Option<Mount>,
}

impl<S: FrameScheduler, R: Rng> Animator<S, R> {
    pub fn new(scheduler: S, config: NetworkConfig) -> Self {
        Self {
            scheduler,
            config,
            scene: None,
            mount: None,
        }
    }

    /// Mount the animation on a surface of `surface` size.
    ///
    /// `None` means the drawing surface could not be acquired; the call is
    /// then a no-op, as it is for a config that fails
    /// [`NetworkConfig::validate`]. Returns whether the animation is running
    /// afterwards.
    pub fn start(&mut self, surface: Option<Vec2>, rng: R) -> bool {
        if self.mount.is_some() {
            return true;
        }
        let Some(size) = surface else {
            log::warn!("drawing surface unavailable, background animation disabled");
            return false;
        };
        if let Err(e) = self.config.validate() {
            log::warn!("{}, background animation disabled", e);
            return false;
        }

        self.scene = Some(Scene::new(self.config.clone(), size, rng));
        let pointer = self.scheduler.subscribe(Signal::PointerMove);
        let resize = self.scheduler.subscribe(Signal::Resize);
        let pending = Some(self.scheduler.request_frame());
        self.mount = Some(Mount { pointer, resize, pending });

        log::info!("background animation started ({} particles)", self.config.particle_count);
        true
    }

    /// Tear everything down. Safe to call any number of times.
    pub fn stop(&mut self) {
        let Some(mount) = self.mount.take() else {
            return;
        };

        self.scheduler.unsubscribe(mount.pointer);
        self.scheduler.unsubscribe(mount.resize);
        if let Some(request) = mount.pending {
            self.scheduler.cancel_frame(request);
        }

        let frames = self.scene.take().map_or(0, |scene| scene.frame());
        log::info!("background animation stopped after {} frames", frames);
    }

    pub fn is_running(&self) -> bool {
        self.mount.is_some()
    }

    /// The frame request currently awaiting delivery.
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.mount.as_ref().and_then(|mount| mount.pending)
    }

    /// Deliver a frame callback.
    ///
    /// Runs one tick if `request` is the pending request of a running
    /// animation, then schedules the next frame. Stale or unexpected
    /// requests are ignored and return `None`.
    pub fn on_frame<C: Canvas + ?Sized>(&mut self, request: FrameRequest, canvas: &mut C) -> Option<TickStats> {
        let mount = self.mount.as_mut()?;
        if mount.pending != Some(request) {
            return None;
        }
        let scene = self.scene.as_mut()?;

        let stats = scene.tick(canvas);
        mount.pending = Some(self.scheduler.request_frame());
        Some(stats)
    }

    /// Deliver a pointer-move signal (surface-local coordinates).
    pub fn on_pointer_move(&mut self, position: Vec2) {
        if let Some(scene) = self.running_scene() {
            scene.set_pointer(position);
        }
    }

    /// The pointer left the surface; particles stop reacting to it.
    pub fn on_pointer_leave(&mut self) {
        if let Some(scene) = self.running_scene() {
            scene.clear_pointer();
        }
    }

    /// Deliver a resize signal.
    pub fn on_resize(&mut self, size: Vec2) {
        if let Some(scene) = self.running_scene() {
            scene.resize(size);
        }
    }

    pub fn scene(&self) -> Option<&Scene<R>> {
        self.scene.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn running_scene(&mut self) -> Option<&mut Scene<R>> {
        self.mount.as_ref()?;
        self.scene.as_mut()
    }
}

impl<S: FrameScheduler, R: Rng> Drop for Animator<S, R> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[derive(Default)]
    struct ManualScheduler {
        next_id: u64,
        pending: Vec<FrameRequest>,
        listeners: HashMap<ListenerId, Signal>,
        cancelled: Vec<FrameRequest>,
    }

    impl FrameScheduler for ManualScheduler {
        fn request_frame(&mut self) -> FrameRequest {
            self.next_id += 1;
            let request = FrameRequest(self.next_id);
            self.pending.push(request);
            request
        }

        fn cancel_frame(&mut self, request: FrameRequest) {
            self.pending.retain(|r| *r != request);
            self.cancelled.push(request);
        }

        fn subscribe(&mut self, signal: Signal) -> ListenerId {
            self.next_id += 1;
            let id = ListenerId(self.next_id);
            self.listeners.insert(id, signal);
            id
        }

        fn unsubscribe(&mut self, id: ListenerId) {
            self.listeners.remove(&id);
        }
    }

    fn animator() -> Animator<ManualScheduler, StdRng> {
        Animator::new(ManualScheduler::default(), NetworkConfig::attract())
    }

    #[test]
    fn test_start_registers_listeners_and_frame() {
        let mut anim = animator();
        assert!(anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1)));

        assert!(anim.is_running());
        assert_eq!(anim.scheduler().listeners.len(), 2);
        assert_eq!(anim.scheduler().pending.len(), 1);
        assert_eq!(anim.pending_frame(), Some(anim.scheduler().pending[0]));
    }

    #[test]
    fn test_start_without_surface_is_noop() {
        let mut anim = animator();
        assert!(!anim.start(None, StdRng::seed_from_u64(1)));

        assert!(!anim.is_running());
        assert!(anim.scene().is_none());
        assert!(anim.scheduler().listeners.is_empty());
        assert!(anim.scheduler().pending.is_empty());
    }

    #[test]
    fn test_start_with_invalid_config_is_noop() {
        let config = NetworkConfig::attract().with_spawn_probability(1.5);
        let mut anim: Animator<ManualScheduler, StdRng> = Animator::new(ManualScheduler::default(), config);
        assert!(!anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1)));

        assert!(!anim.is_running());
        assert!(anim.scene().is_none());
        assert!(anim.scheduler().listeners.is_empty());
        assert!(anim.scheduler().pending.is_empty());
    }

    #[test]
    fn test_double_start_keeps_single_mount() {
        let mut anim = animator();
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1));
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(2));
        assert_eq!(anim.scheduler().listeners.len(), 2);
        assert_eq!(anim.scheduler().pending.len(), 1);
    }

    #[test]
    fn test_frame_chain() {
        let mut anim = animator();
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1));
        let mut list = DrawList::new();

        for expected_frame in 1..=5 {
            let request = anim.pending_frame().unwrap();
            anim.scheduler_mut().pending.retain(|r| *r != request);
            list.reset();
            assert!(anim.on_frame(request, &mut list).is_some());
            assert_eq!(anim.scene().unwrap().frame(), expected_frame);
        }
        assert_eq!(anim.scheduler().pending.len(), 1);
    }

    #[test]
    fn test_stale_frame_is_ignored() {
        let mut anim = animator();
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1));
        let mut list = DrawList::new();

        assert!(anim.on_frame(FrameRequest(999), &mut list).is_none());
        assert!(list.is_empty());
        assert_eq!(anim.scene().unwrap().frame(), 0);
    }

    #[test]
    fn test_stop_releases_everything_once() {
        let mut anim = animator();
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1));
        let pending = anim.pending_frame().unwrap();

        anim.stop();
        assert!(!anim.is_running());
        assert!(anim.scene().is_none());
        assert!(anim.scheduler().listeners.is_empty());
        assert!(anim.scheduler().pending.is_empty());
        assert_eq!(anim.scheduler().cancelled, vec![pending]);

        anim.stop();
        assert_eq!(anim.scheduler().cancelled.len(), 1);
    }

    #[test]
    fn test_signals_after_stop_do_nothing() {
        let mut anim = animator();
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1));
        let request = anim.pending_frame().unwrap();
        anim.stop();

        let mut list = DrawList::new();
        assert!(anim.on_frame(request, &mut list).is_none());
        anim.on_pointer_move(Vec2::new(5.0, 5.0));
        anim.on_resize(Vec2::new(10.0, 10.0));
        assert!(list.is_empty());
        assert!(anim.scheduler().pending.is_empty());
    }

    #[test]
    fn test_pointer_enter_and_leave() {
        let mut anim = animator();
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1));

        anim.on_pointer_move(Vec2::new(40.0, 30.0));
        assert_eq!(anim.scene().unwrap().pointer().position(), Some(Vec2::new(40.0, 30.0)));

        anim.on_pointer_leave();
        assert_eq!(anim.scene().unwrap().pointer().position(), None);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut anim = animator();
        anim.start(Some(Vec2::new(800.0, 600.0)), StdRng::seed_from_u64(1));
        anim.stop();
        assert!(anim.start(Some(Vec2::new(640.0, 480.0)), StdRng::seed_from_u64(2)));
        assert_eq!(anim.scene().unwrap().size(), Vec2::new(640.0, 480.0));
        assert_eq!(anim.scheduler().listeners.len(), 2);
    }
}
