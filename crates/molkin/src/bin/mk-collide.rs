use std::rc::Rc;
use std::cell::RefCell;

use clap::Parser;
use colored::*;
use anyhow::Result;
use anyhow::bail;

use mk_chem::ReactionParameters;
use mk_chem::activation_energy;
use mk_chem::reaction_probability;
use mk_kinetics::BallisticEngine;
use mk_kinetics::CollisionOutcome;
use mk_kinetics::EventBus;
use mk_kinetics::EventKind;
use mk_kinetics::RunState;
use mk_kinetics::SingleCollisionOrchestrator;

use molkin::run_parsers::ReactionArguments;

#[derive(Debug, Parser)]
#[command(name = "mk-collide")]
#[command(version, about = "Single-collision reaction trajectories")]
pub struct Cli {
    #[command(flatten, next_help_heading = "Reaction parameters")]
    reaction: ReactionArguments,

    /// Approach angle in degrees (0 = front, 180 = backside).
    #[arg(long, default_value_t = 180.0)]
    angle: f64,

    /// Relative velocity in m/s.
    #[arg(long, default_value_t = 400.0)]
    velocity: f64,

    /// Impact parameter in Angstrom.
    #[arg(long, default_value_t = 0.0)]
    impact: f64,

    /// Number of collision runs.
    #[arg(long, default_value_t = 20)]
    runs: usize,

    /// Tick length in simulated seconds.
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// RNG seed for reproducible outcomes.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let reaction_type = cli.reaction.reaction_type()?;

    let params = ReactionParameters::new(
            reaction_type, &cli.reaction.substrate, &cli.reaction.nucleophile)
        .with_temperature(cli.reaction.temperature)
        .with_approach_angle(cli.angle)
        .with_relative_velocity(cli.velocity)
        .with_impact_parameter(cli.impact);

    let ea = activation_energy(&params.substrate, &params.nucleophile, reaction_type);
    let p = reaction_probability(&params);
    println!("{} {} + {} at {:.0} K, Ea = {:.1} kJ/mol",
        reaction_type.to_string().yellow(),
        params.substrate, params.nucleophile, params.temperature, ea);
    println!("energy p = {:.4}, steric p = {:.4}, combined = {:.2}%",
        p.energy, p.steric, p.percent());

    let events = Rc::new(RefCell::new(EventBus::new()));
    let outcomes: Rc<RefCell<Vec<CollisionOutcome>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let outcomes = Rc::clone(&outcomes);
        events.borrow_mut().on(EventKind::ReactionCompleted, move |e| {
            outcomes.borrow_mut().push(*e.outcome());
        });
    }

    let mut orchestrator = match cli.seed {
        Some(seed) =>
            SingleCollisionOrchestrator::with_seed(BallisticEngine::default(), events, seed),
        None =>
            SingleCollisionOrchestrator::new(BallisticEngine::default(), events),
    };

    println!("{:>5} {:>12} {:>12} {:>12}",
        "run", "outcome".green(), "p".cyan(), "draw".cyan());

    for run in 1..=cli.runs {
        orchestrator.start(params.clone())?;
        let mut ticks = 0;
        while orchestrator.state() == RunState::Approaching {
            orchestrator.tick(cli.dt);
            ticks += 1;
            if ticks > 1_000_000 {
                bail!("run {} never completed", run);
            }
        }

        let outcome = *outcomes.borrow().last()
            .expect("completed run publishes an outcome");
        let label = match outcome {
            CollisionOutcome::Reacted { .. } => "reacted".green(),
            CollisionOutcome::NoReaction { .. } => "no reaction".red(),
            CollisionOutcome::Missed { .. } => "missed".yellow(),
        };
        println!("{:>5} {:>12} {:>12} {:>12}",
            run,
            label,
            outcome.probability().map_or("-".to_string(), |p| format!("{:.4}", p)),
            outcome.draw().map_or("-".to_string(), |d| format!("{:.4}", d)),
        );
        orchestrator.stop();
    }

    let outcomes = outcomes.borrow();
    let reacted = outcomes.iter().filter(|o| o.reacted()).count();
    println!("{} {}/{} runs reacted ({:.1}%, combined p {:.1}%)",
        "summary:".yellow(),
        reacted, outcomes.len(),
        reacted as f64 / outcomes.len().max(1) as f64 * 100.0,
        p.percent());
    Ok(())
}
