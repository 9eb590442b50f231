use std::fmt;
use glam::DVec3;

/// Identifier handed out by a physics engine for one simulated body.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BodyHandle(pub u32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

#[derive(Debug)]
pub enum PhysicsError {
    BodyCreation(String),
    UnknownHandle(BodyHandle),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::BodyCreation(msg) => {
                write!(f, "Body creation failed: {}", msg)
            }
            PhysicsError::UnknownHandle(h) => {
                write!(f, "Unknown {}", h)
            }
        }
    }
}

impl std::error::Error for PhysicsError {}

/// The external collaborator that integrates body motion.
///
/// The kinetics engine never integrates positions itself; it creates
/// bodies, asks for one `step` per tick, reads positions and velocities,
/// and mutates velocities on bounces. Implementations are expected to be
/// cheap per call since all of this happens on the tick path.
pub trait PhysicsEngine {
    fn create_body(&mut self, mass: f64, position: DVec3, velocity: DVec3)
        -> Result<BodyHandle, PhysicsError>;

    /// Advance all bodies by `dt` seconds. No-op while paused.
    fn step(&mut self, dt: f64);

    fn position(&self, handle: BodyHandle) -> Option<DVec3>;

    fn velocity(&self, handle: BodyHandle) -> Option<DVec3>;

    fn set_velocity(&mut self, handle: BodyHandle, velocity: DVec3);

    /// Remove a body; unknown handles are ignored.
    fn remove_body(&mut self, handle: BodyHandle);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Number of live bodies. Used to verify that stop/clear leave no
    /// dangling handles behind.
    fn body_count(&self) -> usize;
}
