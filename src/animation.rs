//! Per-frame animation loop.
//!
//! The host calls [`AnimationLoop::frame`] once per display refresh with the
//! elapsed time in milliseconds. Each call rotates every tracked object, draws
//! the [`Stage`] and asks the host for exactly one further frame unless the
//! loop was stopped.
//!
//! Objects that arrive asynchronously are tracked before they exist: their
//! spinner starts out [`Unloaded`](LoadSlot::Unloaded) and is skipped until the
//! host [attaches](AnimationLoop::attach) the node handle.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use cgmath::Rad;
use instant::Instant;
use winit::window::Window;

use crate::{
    camera::PerspectiveCamera,
    data_structures::{
        scene_graph::{NodeHandle, SceneGraph, Spatial},
        slot::LoadSlot,
        transform::Transform,
    },
};

/// Milliseconds to seconds.
pub const MILLIS_TO_SECONDS: f64 = 0.001;

/// Draws a scene graph from the point of view of a camera.
pub trait Renderer<N> {
    type Error;

    fn render(&mut self, scene: &SceneGraph<N>, camera: &PerspectiveCamera)
    -> Result<(), Self::Error>;
}

/// The host facility that invokes the loop again on its next display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

impl FrameScheduler for Arc<Window> {
    fn request_frame(&mut self) {
        self.request_redraw();
    }
}

/// Everything a frame touches: scene graph, camera and renderer.
pub struct Stage<N, R> {
    pub scene: SceneGraph<N>,
    pub camera: PerspectiveCamera,
    pub renderer: R,
}

impl<N, R> Stage<N, R> {
    pub fn new(camera: PerspectiveCamera, renderer: R) -> Self {
        Self {
            scene: SceneGraph::new(),
            camera,
            renderer,
        }
    }
}

/// Which rotation axes a spinner drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinAxes {
    /// X and Y both follow the angle.
    XY,
    /// Only Y follows the angle; X and Z keep their values.
    Y,
}

/// A rotation that grows linearly with time, offset by a constant phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    /// Radians added to the elapsed seconds.
    pub phase: f32,
    pub axes: SpinAxes,
}

impl Spin {
    pub const fn xy(phase: f32) -> Self {
        Self {
            phase,
            axes: SpinAxes::XY,
        }
    }

    pub const fn y(phase: f32) -> Self {
        Self {
            phase,
            axes: SpinAxes::Y,
        }
    }

    pub fn angle(&self, t_millis: f64) -> f32 {
        (t_millis * MILLIS_TO_SECONDS + f64::from(self.phase)) as f32
    }

    pub fn apply(&self, t_millis: f64, transform: &mut Transform) {
        let angle = Rad(self.angle(t_millis));
        match self.axes {
            SpinAxes::XY => {
                transform.rotation.x = angle;
                transform.rotation.y = angle;
            }
            SpinAxes::Y => transform.rotation.y = angle,
        }
    }
}

/// Identifies a spinner registered with [`AnimationLoop::track`] or
/// [`AnimationLoop::track_pending`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpinnerId(usize);

#[derive(Clone, Debug)]
struct Spinner {
    target: LoadSlot<NodeHandle>,
    spin: Spin,
}

/// Shared stop flag. Cloning hands out another reference to the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Default)]
pub struct AnimationLoop {
    spinners: Vec<Spinner>,
    stop: StopHandle,
    frame_limit: Option<u64>,
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop on its own after `limit` processed frames.
    pub fn with_frame_limit(mut self, limit: Option<u64>) -> Self {
        self.frame_limit = limit;
        self
    }

    /// Spin a node that is already part of the scene graph.
    pub fn track(&mut self, target: NodeHandle, spin: Spin) -> SpinnerId {
        self.push(LoadSlot::Loaded(target), spin)
    }

    /// Spin a node that does not exist yet. It is left alone until [`attach`](Self::attach)ed.
    pub fn track_pending(&mut self, spin: Spin) -> SpinnerId {
        self.push(LoadSlot::Unloaded, spin)
    }

    fn push(&mut self, target: LoadSlot<NodeHandle>, spin: Spin) -> SpinnerId {
        self.spinners.push(Spinner { target, spin });
        SpinnerId(self.spinners.len() - 1)
    }

    /// Hand a pending spinner its node. Fails if the spinner is unknown or already attached.
    pub fn attach(&mut self, id: SpinnerId, target: NodeHandle) -> anyhow::Result<()> {
        let spinner = self
            .spinners
            .get_mut(id.0)
            .ok_or_else(|| anyhow::anyhow!("no spinner {:?}", id))?;
        spinner
            .target
            .fill(target)
            .map_err(|rejected| anyhow::anyhow!("{:?} is already attached, rejected {:?}", id, rejected))
    }

    pub fn is_attached(&self, id: SpinnerId) -> bool {
        self.spinners
            .get(id.0)
            .is_some_and(|spinner| spinner.target.is_loaded())
    }

    /// Rotate every loaded target for time `t_millis`. Unloaded targets and
    /// handles that no longer resolve are skipped.
    pub fn animate<N: Spatial>(&self, t_millis: f64, scene: &mut SceneGraph<N>) {
        for spinner in &self.spinners {
            let Some(handle) = spinner.target.get() else {
                continue;
            };
            match scene.get_mut(*handle) {
                Some(node) => spinner.spin.apply(t_millis, node.transform_mut()),
                None => log::warn!("Spinner target {:?} is not in the scene graph.", handle),
            }
        }
    }

    /// Request the first frame.
    pub fn start<F: FrameScheduler>(&self, scheduler: &mut F) {
        if !self.is_stopped() {
            scheduler.request_frame();
        }
    }

    /// Process one timestamp: rotate, draw, then re-schedule unless stopped.
    ///
    /// A render error does not affect re-scheduling. It is handed back to the
    /// host after the next frame has been requested.
    pub fn frame<N, R, F>(
        &mut self,
        t_millis: f64,
        stage: &mut Stage<N, R>,
        scheduler: &mut F,
    ) -> Result<(), R::Error>
    where
        N: Spatial,
        R: Renderer<N>,
        F: FrameScheduler,
    {
        self.animate(t_millis, &mut stage.scene);
        let rendered = stage.renderer.render(&stage.scene, &stage.camera);
        self.frames += 1;

        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            log::info!("Frame limit of {} reached, stopping.", self.frames);
            self.stop();
        }
        if !self.is_stopped() {
            scheduler.request_frame();
        }
        rendered
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Number of frames processed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Milliseconds elapsed since the first reading.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    epoch: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_millis(&mut self) -> f64 {
        let epoch = *self.epoch.get_or_insert_with(Instant::now);
        epoch.elapsed().as_secs_f64() * 1000.0
    }
}
