//! One substrate/nucleophile pair, driven from approach to outcome.
//!
//! The orchestrator owns two bodies in the physics collaborator and
//! polls their separation each tick. When it crosses the contact
//! threshold the probability model and the stochastic resolver decide
//! the outcome; when the bodies fly past each other instead (impact
//! parameter too large) the run ends in a geometric miss without ever
//! consulting the resolver.

use std::rc::Rc;
use std::cell::RefCell;

use glam::DVec3;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use mk_chem::MassPair;
use mk_chem::ReactionParameters;
use mk_chem::reaction_probability;

use crate::BodyHandle;
use crate::CollisionOutcome;
use crate::EngineEvent;
use crate::EventBus;
use crate::PhysicsEngine;
use crate::PhysicsError;
use crate::resolve_collision;
use crate::CONTACT_DISTANCE;
use crate::WORLD_SPEED_PER_MPS;
use crate::WORLD_OFFSET_PER_ANGSTROM;

/// Initial separation between the two bodies (world units).
pub const APPROACH_START_DISTANCE: f64 = 4.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunState {
    Idle,
    Approaching,
    Resolving,
    Reacted,
    NoReaction,
}

struct ActiveRun {
    params: ReactionParameters,
    masses: MassPair,
    substrate: BodyHandle,
    nucleophile: BodyHandle,
    prev_separation: f64,
}

pub struct SingleCollisionOrchestrator<P: PhysicsEngine> {
    physics: P,
    events: Rc<RefCell<EventBus>>,
    rng: StdRng,
    state: RunState,
    run: Option<ActiveRun>,
    time: f64,
}

impl<P: PhysicsEngine> SingleCollisionOrchestrator<P> {
    pub fn new(physics: P, events: Rc<RefCell<EventBus>>) -> Self {
        Self {
            physics,
            events,
            rng: StdRng::from_os_rng(),
            state: RunState::Idle,
            run: None,
            time: 0.0,
        }
    }

    /// Same orchestrator with a reproducible random source.
    pub fn with_seed(physics: P, events: Rc<RefCell<EventBus>>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(physics, events)
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Masses resolved for the active run, if any.
    pub fn masses(&self) -> Option<MassPair> {
        self.run.as_ref().map(|r| r.masses)
    }

    /// Current separation of the two bodies, if a run is active.
    pub fn separation(&self) -> Option<f64> {
        let run = self.run.as_ref()?;
        let s = self.physics.position(run.substrate)?;
        let n = self.physics.position(run.nucleophile)?;
        Some(s.distance(n))
    }

    /// Begin a run with a frozen parameter snapshot.
    ///
    /// Calling `start` while a run is active clears that run first; a
    /// body-creation failure leaves the orchestrator `Idle` with nothing
    /// spawned.
    pub fn start(&mut self, params: ReactionParameters) -> Result<(), PhysicsError> {
        if self.state != RunState::Idle {
            self.stop();
        }

        let masses = MassPair::resolve(&params.substrate, &params.nucleophile);

        // Substrate rests at the origin; the nucleophile approaches along
        // -x with a perpendicular offset set by the impact parameter.
        let offset = params.impact_parameter.max(0.0) * WORLD_OFFSET_PER_ANGSTROM;
        let start = DVec3::new(-APPROACH_START_DISTANCE, offset, 0.0);
        let speed = params.relative_velocity.max(0.0) * WORLD_SPEED_PER_MPS;
        let velocity = DVec3::new(speed, 0.0, 0.0);

        let substrate = self.physics.create_body(masses.substrate, DVec3::ZERO, DVec3::ZERO)?;
        let nucleophile = match self.physics.create_body(masses.nucleophile, start, velocity) {
            Ok(h) => h,
            Err(e) => {
                // No partial spawn.
                self.physics.remove_body(substrate);
                return Err(e);
            }
        };

        debug!("single run: {} + {} ({}), separation {:.2}",
            params.substrate, params.nucleophile, params.reaction_type,
            start.length());

        self.run = Some(ActiveRun {
            params,
            masses,
            substrate,
            nucleophile,
            prev_separation: start.length(),
        });
        self.state = RunState::Approaching;
        Ok(())
    }

    /// Release all owned bodies and return to `Idle`. Valid from any
    /// state, including mid-run.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            self.physics.remove_body(run.substrate);
            self.physics.remove_body(run.nucleophile);
        }
        self.state = RunState::Idle;
    }

    /// Advance the run by `dt` simulated seconds.
    pub fn tick(&mut self, dt: f64) {
        if self.state != RunState::Approaching {
            return; // terminal states wait for stop() or start()
        }

        self.physics.step(dt);
        self.time += dt;

        let Some(separation) = self.separation() else {
            // A body vanished underneath us; abandon the run.
            self.stop();
            return;
        };

        if separation <= CONTACT_DISTANCE {
            self.resolve_contact();
        } else if separation > self.run.as_ref().unwrap().prev_separation + 1e-12 {
            // Receding without ever touching: a geometric miss.
            self.finish_missed();
        } else {
            self.run.as_mut().unwrap().prev_separation = separation;
        }
    }

    fn resolve_contact(&mut self) {
        self.state = RunState::Resolving;
        let run = self.run.as_ref().unwrap();

        let p = reaction_probability(&run.params);
        let outcome = resolve_collision(p.combined, self.time, &mut self.rng);

        self.events.borrow_mut().publish(&EngineEvent::CollisionDetected(outcome));

        self.state = if outcome.reacted() {
            RunState::Reacted
        } else {
            RunState::NoReaction
        };
        self.events.borrow_mut().publish(&EngineEvent::ReactionCompleted(outcome));
    }

    fn finish_missed(&mut self) {
        let outcome = CollisionOutcome::Missed { time: self.time };
        self.events.borrow_mut().publish(&EngineEvent::CollisionDetected(outcome));
        self.events.borrow_mut().publish(&EngineEvent::ReactionCompleted(outcome));
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use mk_chem::ReactionType;
    use crate::BallisticEngine;
    use crate::EventKind;

    fn bus() -> Rc<RefCell<EventBus>> {
        Rc::new(RefCell::new(EventBus::new()))
    }

    fn ideal_params() -> ReactionParameters {
        ReactionParameters::new(ReactionType::Sn2, "CH3Br", "OH-")
    }

    fn run_to_completion<P: PhysicsEngine>(orch: &mut SingleCollisionOrchestrator<P>) {
        for _ in 0..10_000 {
            orch.tick(0.01);
            if orch.state() != RunState::Approaching {
                return;
            }
        }
        panic!("run never completed");
    }

    #[test]
    fn test_ideal_run_reacts() {
        // Combined probability ~1.0 at these parameters.
        let events = bus();
        let mut orch =
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events, 42);
        orch.start(ideal_params()).unwrap();
        assert_eq!(orch.state(), RunState::Approaching);
        run_to_completion(&mut orch);
        assert_eq!(orch.state(), RunState::Reacted);
    }

    #[test]
    fn test_large_impact_parameter_misses() {
        let events = bus();
        let observed = Rc::new(Cell::new(false));
        {
            let observed = Rc::clone(&observed);
            events.borrow_mut().on(EventKind::ReactionCompleted, move |e| {
                observed.set(matches!(e.outcome(), CollisionOutcome::Missed { .. }));
            });
        }
        let mut orch =
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events, 42);
        orch.start(ideal_params().with_impact_parameter(5.0)).unwrap();
        run_to_completion(&mut orch);
        // A miss releases the bodies and returns to Idle.
        assert_eq!(orch.state(), RunState::Idle);
        assert_eq!(orch.physics().body_count(), 0);
        assert!(observed.get());
    }

    #[test]
    fn test_events_published_in_order() {
        let events = bus();
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::CollisionDetected, EventKind::ReactionCompleted] {
            let log = Rc::clone(&log);
            events.borrow_mut().on(kind, move |e| {
                log.borrow_mut().push(e.kind());
            });
        }
        let mut orch =
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events, 42);
        orch.start(ideal_params()).unwrap();
        run_to_completion(&mut orch);
        assert_eq!(*log.borrow(),
            vec![EventKind::CollisionDetected, EventKind::ReactionCompleted]);
    }

    #[test]
    fn test_stop_releases_bodies_from_any_state() {
        let events = bus();
        let mut orch =
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events, 42);

        orch.stop(); // valid while Idle
        assert_eq!(orch.state(), RunState::Idle);

        orch.start(ideal_params()).unwrap();
        assert_eq!(orch.physics().body_count(), 2);
        orch.tick(0.01);
        orch.stop();
        assert_eq!(orch.state(), RunState::Idle);
        assert_eq!(orch.physics().body_count(), 0);
    }

    #[test]
    fn test_reentrant_start_restarts() {
        let events = bus();
        let mut orch =
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events, 42);
        orch.start(ideal_params()).unwrap();
        orch.tick(0.01);
        orch.start(ideal_params()).unwrap();
        // Old bodies released, new pair spawned.
        assert_eq!(orch.physics().body_count(), 2);
        assert_eq!(orch.state(), RunState::Approaching);
    }

    #[test]
    fn test_failed_spawn_leaves_idle() {
        let events = bus();
        // Room for one body only: the second create_body fails.
        let mut orch = SingleCollisionOrchestrator::with_seed(
            BallisticEngine::with_capacity(1), events, 42);
        assert!(orch.start(ideal_params()).is_err());
        assert_eq!(orch.state(), RunState::Idle);
        assert_eq!(orch.physics().body_count(), 0);

        // A failed run must not poison the orchestrator.
        let events2 = bus();
        let mut orch2 =
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events2, 42);
        assert!(orch2.start(ideal_params()).is_ok());
    }

    #[test]
    fn test_separation_shrinks_while_approaching() {
        let events = bus();
        let mut orch =
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events, 42);
        orch.start(ideal_params()).unwrap();
        let before = orch.separation().unwrap();
        orch.tick(0.01);
        let after = orch.separation().unwrap();
        assert!(after < before);

        let masses = orch.masses().unwrap();
        assert_eq!(masses.substrate, 0.09493);
        assert_eq!(masses.nucleophile, 0.01701);
    }
}
