//! Straight-line reference implementation of [`PhysicsEngine`].
//!
//! Bodies move with constant velocity between external velocity updates.
//! There are no inter-body forces; this is just enough motion to drive
//! the kinetics engine in tests and CLI runs without a host application.

use ahash::AHashMap;
use glam::DVec3;

use crate::BodyHandle;
use crate::PhysicsEngine;
use crate::PhysicsError;

#[derive(Clone, Copy, Debug)]
struct Body {
    mass: f64,
    position: DVec3,
    velocity: DVec3,
}

pub struct BallisticEngine {
    bodies: AHashMap<BodyHandle, Body>,
    next_id: u32,
    paused: bool,
    capacity: usize,
}

impl Default for BallisticEngine {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}

impl BallisticEngine {
    /// An engine that refuses to create more than `capacity` bodies.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bodies: AHashMap::default(),
            next_id: 0,
            paused: false,
            capacity,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn mass(&self, handle: BodyHandle) -> Option<f64> {
        self.bodies.get(&handle).map(|b| b.mass)
    }
}

impl PhysicsEngine for BallisticEngine {
    fn create_body(&mut self, mass: f64, position: DVec3, velocity: DVec3)
        -> Result<BodyHandle, PhysicsError>
    {
        if self.bodies.len() >= self.capacity {
            return Err(PhysicsError::BodyCreation(
                format!("capacity of {} bodies reached", self.capacity)));
        }
        if !(mass > 0.0) {
            return Err(PhysicsError::BodyCreation(
                format!("non-positive mass {}", mass)));
        }
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.insert(handle, Body { mass, position, velocity });
        Ok(handle)
    }

    fn step(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        for body in self.bodies.values_mut() {
            body.position += body.velocity * dt;
        }
    }

    fn position(&self, handle: BodyHandle) -> Option<DVec3> {
        self.bodies.get(&handle).map(|b| b.position)
    }

    fn velocity(&self, handle: BodyHandle) -> Option<DVec3> {
        self.bodies.get(&handle).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: DVec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = velocity;
        }
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
