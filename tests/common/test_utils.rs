#![allow(dead_code)]

use cgmath::{Euler, Rad};
use rotating_shapes::{
    animation::{FrameScheduler, Renderer},
    camera::PerspectiveCamera,
    data_structures::{
        scene_graph::{SceneGraph, Spatial},
        transform::Transform,
    },
};

pub(crate) const EPSILON: f32 = 1e-5;

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= EPSILON * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

/// A scene object without any GPU resources.
#[derive(Debug, Clone)]
pub(crate) struct TestNode {
    pub(crate) name: &'static str,
    pub(crate) transform: Transform,
}

impl TestNode {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            transform: Transform::new(),
        }
    }

    pub(crate) fn rotated(name: &'static str, x: f32, y: f32, z: f32) -> Self {
        let mut node = Self::new(name);
        node.transform.rotation = Euler::new(Rad(x), Rad(y), Rad(z));
        node
    }
}

impl Spatial for TestNode {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

/// Remembers the rotation of every node each time it is asked to draw.
#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub(crate) draws: Vec<Vec<(&'static str, Euler<Rad<f32>>)>>,
    pub(crate) fail_with: Option<&'static str>,
}

impl RecordingRenderer {
    pub(crate) fn failing(reason: &'static str) -> Self {
        Self {
            draws: Vec::new(),
            fail_with: Some(reason),
        }
    }

    pub(crate) fn last_rotation(&self, name: &str) -> Option<Euler<Rad<f32>>> {
        self.draws
            .last()?
            .iter()
            .find(|(node, _)| *node == name)
            .map(|(_, rotation)| *rotation)
    }
}

impl Renderer<TestNode> for RecordingRenderer {
    type Error = String;

    fn render(
        &mut self,
        scene: &SceneGraph<TestNode>,
        _camera: &PerspectiveCamera,
    ) -> Result<(), Self::Error> {
        self.draws.push(
            scene
                .iter()
                .map(|node| (node.name, node.transform.rotation))
                .collect(),
        );
        match self.fail_with {
            Some(reason) => Err(reason.to_string()),
            None => Ok(()),
        }
    }
}

/// Counts frame requests instead of scheduling anything.
#[derive(Debug, Default)]
pub(crate) struct CountingScheduler {
    pub(crate) requests: usize,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}
