//! Presentation-layer facade.
//!
//! One object owning both orchestrators and the shared event bus, with
//! the operations a host application needs: start/stop either simulation
//! mode, drive the tick loop, poll metrics, subscribe to events. All
//! heavy lifting lives in the member crates; this is plumbing.

use std::rc::Rc;
use std::cell::RefCell;

use mk_chem::ReactionParameters;
use mk_chem::ReactionType;
use mk_chem::activation_energy;
use mk_kinetics::BallisticEngine;
use mk_kinetics::EngineEvent;
use mk_kinetics::EventBus;
use mk_kinetics::EventKind;
use mk_kinetics::HandlerId;
use mk_kinetics::PhysicsError;
use mk_kinetics::PopulationRateSimulator;
use mk_kinetics::RateMetrics;
use mk_kinetics::RunState;
use mk_kinetics::SingleCollisionOrchestrator;

pub struct ReactionEngine {
    events: Rc<RefCell<EventBus>>,
    single: SingleCollisionOrchestrator<BallisticEngine>,
    rate: PopulationRateSimulator<BallisticEngine>,
}

impl Default for ReactionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactionEngine {
    pub fn new() -> Self {
        let events = Rc::new(RefCell::new(EventBus::new()));
        Self {
            single: SingleCollisionOrchestrator::new(
                BallisticEngine::default(), Rc::clone(&events)),
            rate: PopulationRateSimulator::new(
                BallisticEngine::default(), Rc::clone(&events)),
            events,
        }
    }

    /// Engine with reproducible random sources in both modes.
    pub fn with_seed(seed: u64) -> Self {
        let events = Rc::new(RefCell::new(EventBus::new()));
        Self {
            single: SingleCollisionOrchestrator::with_seed(
                BallisticEngine::default(), Rc::clone(&events), seed),
            rate: PopulationRateSimulator::with_seed(
                BallisticEngine::default(), Rc::clone(&events), seed ^ 0x9e3779b97f4a7c15),
            events,
        }
    }

    /// Advance both simulation modes by `dt` simulated seconds.
    pub fn tick(&mut self, dt: f64) {
        self.single.tick(dt);
        self.rate.update(dt);
    }

    // --- single-collision mode ---

    pub fn start_reaction_animation(&mut self, params: ReactionParameters)
        -> Result<(), PhysicsError>
    {
        self.single.start(params)
    }

    pub fn stop_reaction(&mut self) {
        self.single.stop();
    }

    pub fn reaction_state(&self) -> RunState {
        self.single.state()
    }

    // --- rate mode ---

    pub fn start_rate_simulation(
        &mut self,
        particle_count: u32,
        temperature: f64,
        reaction_type: ReactionType,
        substrate: &str,
        nucleophile: &str,
    ) -> Result<(), PhysicsError> {
        self.rate.initialize_simulation(
            substrate, nucleophile, particle_count, temperature, reaction_type)
    }

    pub fn stop_rate_simulation(&mut self) {
        self.rate.clear();
    }

    pub fn adjust_rate_simulation_concentration(
        &mut self,
        particle_count: u32,
        temperature: f64,
    ) -> Result<(), PhysicsError> {
        self.rate.adjust_concentration(particle_count, temperature)
    }

    pub fn rate_metrics(&self) -> RateMetrics {
        self.rate.metrics()
    }

    // --- lookups and conversions ---

    pub fn calculate_activation_energy(
        &self,
        substrate: &str,
        nucleophile: &str,
        reaction_type: ReactionType,
    ) -> f64 {
        activation_energy(substrate, nucleophile, reaction_type)
    }

    pub fn concentration_to_particle_count(&self, concentration: f64) -> u32 {
        mk_units::concentration_to_particle_count(concentration)
    }

    pub fn particle_count_to_concentration(&self, count: u32) -> f64 {
        mk_units::particle_count_to_concentration(count)
    }

    // --- events ---

    pub fn on<F>(&self, kind: EventKind, handler: F) -> HandlerId
    where
        F: FnMut(&EngineEvent) + 'static,
    {
        self.events.borrow_mut().on(kind, handler)
    }

    pub fn off(&self, kind: EventKind, id: HandlerId) -> bool {
        self.events.borrow_mut().off(kind, id)
    }
}
