//! Population-scale rate simulation.
//!
//! Owns up to [`mk_units::MAX_PARTICLE_COUNT`] substrate/nucleophile
//! pairs inside a bounded container, steps them through the physics
//! collaborator each tick, resolves contacts through the same
//! probability/resolver path as single-collision mode, and keeps running
//! aggregate metrics. No other component mutates pair lifecycle state.

use std::rc::Rc;
use std::cell::RefCell;
use std::collections::VecDeque;

use glam::DVec3;
use log::{debug, warn};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use mk_chem::MassPair;
use mk_chem::ReactionParameters;
use mk_chem::ReactionType;
use mk_chem::reaction_probability;

use crate::BodyHandle;
use crate::ContainerBounds;
use crate::EngineEvent;
use crate::EventBus;
use crate::PhysicsEngine;
use crate::PhysicsError;
use crate::resolve_collision;
use crate::CONTACT_DISTANCE;
use crate::WORLD_SPEED_PER_MPS;

/// Sliding window over which the reaction rate is averaged (simulated
/// seconds).
pub const RATE_WINDOW_SECONDS: f64 = 5.0;

/// Mean particle speed at the reference temperature (world units/s).
pub const THERMAL_SPEED: f64 = 2.0;

/// Distance kept between spawn positions and the container walls.
pub const SPAWN_MARGIN: f64 = 0.5;

/// Minimum separation between freshly spawned bodies.
pub const MIN_SPAWN_SEPARATION: f64 = 1.0;

const MAX_SPAWN_ATTEMPTS: usize = 200;

/// Per-pair contact state machine.
///
/// `JustCollided` suppresses re-triggering on the same contact: after a
/// `NoReaction` outcome the pair is not tested again until its bodies
/// separate beyond [`CONTACT_DISTANCE`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairPhase {
    Approaching,
    JustCollided,
    Reacted,
}

/// One substrate/nucleophile pair owned by the simulator.
#[derive(Clone, Copy, Debug)]
pub struct ParticlePair {
    substrate: BodyHandle,
    nucleophile: BodyHandle,
    phase: PairPhase,
    spawned_at: f64,
}

impl ParticlePair {
    pub fn phase(&self) -> PairPhase {
        self.phase
    }

    pub fn spawned_at(&self) -> f64 {
        self.spawned_at
    }
}

/// Immutable aggregate snapshot, recomputed on demand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RateMetrics {
    /// Reactions per simulated second, averaged over the sliding window.
    pub reaction_rate: f64,
    /// Percentage of the pair population still unreacted.
    pub remaining_reactants: f64,
    pub products_formed: usize,
    /// Attempted collisions, reacted or not.
    pub collision_count: u64,
    /// Simulated seconds since the run started.
    pub elapsed_time: f64,
}

impl RateMetrics {
    fn zero() -> Self {
        Self {
            reaction_rate: 0.0,
            remaining_reactants: 100.0,
            products_formed: 0,
            collision_count: 0,
            elapsed_time: 0.0,
        }
    }
}

struct RunConfig {
    substrate: String,
    nucleophile: String,
    reaction_type: ReactionType,
    temperature: f64,
    masses: MassPair,
}

pub struct PopulationRateSimulator<P: PhysicsEngine> {
    physics: P,
    events: Rc<RefCell<EventBus>>,
    rng: StdRng,
    bounds: ContainerBounds,
    pairs: Vec<ParticlePair>,
    config: Option<RunConfig>,
    collision_count: u64,
    elapsed: f64,
    reaction_times: VecDeque<f64>,
    products_formed: usize,
}

impl<P: PhysicsEngine> PopulationRateSimulator<P> {
    pub fn new(physics: P, events: Rc<RefCell<EventBus>>) -> Self {
        Self {
            physics,
            events,
            rng: StdRng::from_os_rng(),
            bounds: ContainerBounds::default(),
            pairs: Vec::new(),
            config: None,
            collision_count: 0,
            elapsed: 0.0,
            reaction_times: VecDeque::new(),
            products_formed: 0,
        }
    }

    /// Same simulator with a reproducible random source.
    pub fn with_seed(physics: P, events: Rc<RefCell<EventBus>>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(physics, events)
        }
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn bounds(&self) -> ContainerBounds {
        self.bounds
    }

    pub fn pairs(&self) -> &[ParticlePair] {
        &self.pairs
    }

    pub fn is_running(&self) -> bool {
        self.config.is_some()
    }

    fn active_pair_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.phase != PairPhase::Reacted).count()
    }

    /// (Re)spawn the full population. Any previous run is cleared first;
    /// a body-creation failure rolls everything back and leaves the
    /// simulator empty.
    pub fn initialize_simulation(
        &mut self,
        substrate: &str,
        nucleophile: &str,
        particle_count: u32,
        temperature: f64,
        reaction_type: ReactionType,
    ) -> Result<(), PhysicsError> {
        self.clear();

        let masses = MassPair::resolve(substrate, nucleophile);
        self.config = Some(RunConfig {
            substrate: substrate.to_string(),
            nucleophile: nucleophile.to_string(),
            reaction_type,
            temperature: temperature.max(1.0),
            masses,
        });

        let count = particle_count
            .clamp(mk_units::MIN_PARTICLE_COUNT, mk_units::MAX_PARTICLE_COUNT);
        if let Err(e) = self.spawn_pairs(count as usize) {
            self.clear();
            return Err(e);
        }

        debug!("rate run: {} pairs of {} + {} ({}) at {:.0} K",
            count, substrate, nucleophile, reaction_type, temperature);
        Ok(())
    }

    /// Add or remove pairs to match `new_count` active pairs, without
    /// resetting elapsed time or accumulated metrics. Reacted pairs keep
    /// counting as products.
    pub fn adjust_concentration(
        &mut self,
        new_count: u32,
        temperature: f64,
    ) -> Result<(), PhysicsError> {
        let Some(config) = self.config.as_mut() else {
            warn!("adjust_concentration without an active simulation");
            return Ok(());
        };
        config.temperature = temperature.max(1.0);

        let target = new_count
            .clamp(mk_units::MIN_PARTICLE_COUNT, mk_units::MAX_PARTICLE_COUNT)
            as usize;
        let active = self.active_pair_count();

        if target > active {
            self.spawn_pairs(target - active)?;
        } else if target < active {
            let mut to_remove = active - target;
            // Newest unreacted pairs go first.
            for idx in (0..self.pairs.len()).rev() {
                if to_remove == 0 {
                    break;
                }
                if self.pairs[idx].phase != PairPhase::Reacted {
                    let pair = self.pairs.remove(idx);
                    self.physics.remove_body(pair.substrate);
                    self.physics.remove_body(pair.nucleophile);
                    to_remove -= 1;
                }
            }
        }
        Ok(())
    }

    /// Remove all pairs and reset metrics. Safe to call at any point,
    /// including mid-run; leaves no body handles behind.
    pub fn clear(&mut self) {
        for pair in self.pairs.drain(..) {
            if pair.phase != PairPhase::Reacted {
                self.physics.remove_body(pair.substrate);
                self.physics.remove_body(pair.nucleophile);
            }
        }
        self.config = None;
        self.collision_count = 0;
        self.elapsed = 0.0;
        self.reaction_times.clear();
        self.products_formed = 0;
    }

    /// Aggregate metrics snapshot.
    pub fn metrics(&self) -> RateMetrics {
        if self.pairs.is_empty() && self.products_formed == 0 {
            let mut m = RateMetrics::zero();
            m.elapsed_time = self.elapsed;
            m.collision_count = self.collision_count;
            return m;
        }
        let initial = self.pairs.len();
        let remaining = if initial == 0 {
            100.0
        } else {
            self.active_pair_count() as f64 / initial as f64 * 100.0
        };
        RateMetrics {
            reaction_rate: self.reaction_times.len() as f64 / RATE_WINDOW_SECONDS,
            remaining_reactants: remaining,
            products_formed: self.products_formed,
            collision_count: self.collision_count,
            elapsed_time: self.elapsed,
        }
    }

    /// Advance the population by `dt` simulated seconds.
    ///
    /// Within one tick: physics step, boundary bounces, then pairwise
    /// contacts, all against a parameter snapshot frozen at tick start.
    pub fn update(&mut self, dt: f64) {
        if self.config.is_none() {
            return;
        }

        self.physics.step(dt);
        self.elapsed += dt;

        self.reflect_at_walls();
        self.resolve_contacts();

        let horizon = self.elapsed - RATE_WINDOW_SECONDS;
        while self.reaction_times.front().is_some_and(|&t| t < horizon) {
            self.reaction_times.pop_front();
        }
    }

    fn reflect_at_walls(&mut self) {
        for i in 0..self.pairs.len() {
            let pair = self.pairs[i];
            if pair.phase == PairPhase::Reacted {
                continue;
            }
            for handle in [pair.substrate, pair.nucleophile] {
                let (Some(p), Some(v)) = (self.physics.position(handle),
                                          self.physics.velocity(handle)) else {
                    continue;
                };
                if let Some((_, bounced)) = self.bounds.reflect(p, v) {
                    self.physics.set_velocity(handle, bounced);
                }
            }
        }
    }

    fn resolve_contacts(&mut self) {
        // Identity and temperature frozen for the whole tick.
        let (substrate, nucleophile, reaction_type, temperature) = {
            let c = self.config.as_ref().unwrap();
            (c.substrate.clone(), c.nucleophile.clone(), c.reaction_type, c.temperature)
        };

        for i in 0..self.pairs.len() {
            let pair = self.pairs[i];
            if pair.phase == PairPhase::Reacted {
                continue;
            }
            let (Some(ps), Some(pn)) = (self.physics.position(pair.substrate),
                                        self.physics.position(pair.nucleophile)) else {
                continue;
            };
            let separation = ps.distance(pn);

            match pair.phase {
                PairPhase::Approaching if separation <= CONTACT_DISTANCE => {
                    let vs = self.physics.velocity(pair.substrate).unwrap_or(DVec3::ZERO);
                    let vn = self.physics.velocity(pair.nucleophile).unwrap_or(DVec3::ZERO);
                    let relative_mps = (vn - vs).length() / WORLD_SPEED_PER_MPS;
                    // Molecular orientation is not simulated; the approach
                    // angle of each contact is drawn uniformly.
                    let angle = self.rng.random_range(0.0..=180.0);

                    let params = ReactionParameters::new(reaction_type, &substrate, &nucleophile)
                        .with_temperature(temperature)
                        .with_approach_angle(angle)
                        .with_relative_velocity(relative_mps);
                    let p = reaction_probability(&params);
                    let outcome = resolve_collision(p.combined, self.elapsed, &mut self.rng);

                    self.collision_count += 1;
                    self.events.borrow_mut()
                        .publish(&EngineEvent::CollisionDetected(outcome));

                    if outcome.reacted() {
                        self.pairs[i].phase = PairPhase::Reacted;
                        self.products_formed += 1;
                        self.reaction_times.push_back(self.elapsed);
                        self.physics.remove_body(pair.substrate);
                        self.physics.remove_body(pair.nucleophile);
                        self.events.borrow_mut()
                            .publish(&EngineEvent::ReactionCompleted(outcome));
                    } else {
                        self.pairs[i].phase = PairPhase::JustCollided;
                        self.bounce_pair(pair.substrate, pair.nucleophile, ps, pn, vs, vn);
                    }
                }
                PairPhase::JustCollided if separation > CONTACT_DISTANCE => {
                    // Separated again; re-arm for the next contact.
                    self.pairs[i].phase = PairPhase::Approaching;
                }
                _ => {}
            }
        }
    }

    /// Elastic bounce along the line of centers (equal-mass exchange of
    /// the normal velocity components).
    fn bounce_pair(
        &mut self,
        substrate: BodyHandle,
        nucleophile: BodyHandle,
        ps: DVec3,
        pn: DVec3,
        vs: DVec3,
        vn: DVec3,
    ) {
        let normal = (pn - ps).normalize_or_zero();
        if normal == DVec3::ZERO {
            return;
        }
        let exchange = (vs - vn).dot(normal);
        self.physics.set_velocity(substrate, vs - normal * exchange);
        self.physics.set_velocity(nucleophile, vn + normal * exchange);
    }

    fn spawn_pairs(&mut self, count: usize) -> Result<(), PhysicsError> {
        let mut occupied: Vec<DVec3> = Vec::with_capacity(2 * (self.pairs.len() + count));
        for pair in &self.pairs {
            if let Some(p) = self.physics.position(pair.substrate) {
                occupied.push(p);
            }
            if let Some(p) = self.physics.position(pair.nucleophile) {
                occupied.push(p);
            }
        }

        let mut created: Vec<BodyHandle> = Vec::with_capacity(2 * count);
        let mut spawned: Vec<ParticlePair> = Vec::with_capacity(count);
        let mut result: Result<(), PhysicsError> = Ok(());
        for _ in 0..count {
            match self.spawn_one(&mut occupied, &mut created) {
                Ok(pair) => spawned.push(pair),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        match result {
            Ok(()) => {
                self.pairs.extend(spawned);
                Ok(())
            }
            Err(e) => {
                // No partial spawn.
                for handle in created {
                    self.physics.remove_body(handle);
                }
                Err(e)
            }
        }
    }

    fn spawn_one(
        &mut self,
        occupied: &mut Vec<DVec3>,
        created: &mut Vec<BodyHandle>,
    ) -> Result<ParticlePair, PhysicsError> {
        let (masses, temperature) = {
            let c = self.config.as_ref().expect("spawn requires a run config");
            (c.masses, c.temperature)
        };
        let thermal = THERMAL_SPEED * (temperature / 298.0).sqrt();

        let sub_pos = self.random_free_position(occupied);
        occupied.push(sub_pos);
        let nuc_pos = self.random_free_position(occupied);
        occupied.push(nuc_pos);

        let sub_vel = self.random_direction() * thermal * self.rng.random_range(0.5..1.5);
        // Aim the nucleophile at its partner so contacts actually occur
        // on reasonable timescales.
        let aim = (sub_pos - nuc_pos).normalize_or_zero();
        let nuc_vel = aim * thermal * self.rng.random_range(0.5..1.5);

        let substrate = self.physics.create_body(masses.substrate, sub_pos, sub_vel)?;
        created.push(substrate);
        let nucleophile = self.physics.create_body(masses.nucleophile, nuc_pos, nuc_vel)?;
        created.push(nucleophile);

        Ok(ParticlePair {
            substrate,
            nucleophile,
            phase: PairPhase::Approaching,
            spawned_at: self.elapsed,
        })
    }

    /// Rejection-sample a spawn position away from walls and existing
    /// bodies; after too many attempts the separation requirement is
    /// dropped rather than failing the spawn.
    fn random_free_position(&mut self, occupied: &[DVec3]) -> DVec3 {
        let lo = self.bounds.min + DVec3::splat(SPAWN_MARGIN);
        let hi = self.bounds.max - DVec3::splat(SPAWN_MARGIN);
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let p = DVec3::new(
                self.rng.random_range(lo.x..=hi.x),
                self.rng.random_range(lo.y..=hi.y),
                self.rng.random_range(lo.z..=hi.z),
            );
            if occupied.iter().all(|q| p.distance(*q) >= MIN_SPAWN_SEPARATION) {
                return p;
            }
        }
        DVec3::new(
            self.rng.random_range(lo.x..=hi.x),
            self.rng.random_range(lo.y..=hi.y),
            self.rng.random_range(lo.z..=hi.z),
        )
    }

    fn random_direction(&mut self) -> DVec3 {
        loop {
            let v = DVec3::new(
                self.rng.random_range(-1.0..=1.0),
                self.rng.random_range(-1.0..=1.0),
                self.rng.random_range(-1.0..=1.0),
            );
            let len = v.length();
            if len > 1e-6 && len <= 1.0 {
                return v / len;
            }
        }
    }
}
