use std::fs;

use clap::Parser;
use colored::*;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use mk_kinetics::BallisticEngine;
use mk_kinetics::EventBus;
use mk_kinetics::PopulationRateSimulator;
use mk_kinetics::RateMetrics;
use mk_units::concentration_to_particle_count;

use molkin::run_parsers::ReactionArguments;
use molkin::run_parsers::TimecourseParameters;

use std::rc::Rc;
use std::cell::RefCell;

#[derive(Debug, Parser)]
#[command(name = "mk-rate")]
#[command(version, about = "Population-scale reaction rate timecourse")]
pub struct Cli {
    #[command(flatten, next_help_heading = "Reaction parameters")]
    reaction: ReactionArguments,

    /// Concentration in mol/L; mapped to a particle count in [1, 100].
    #[arg(long, default_value_t = 0.1)]
    concentration: f64,

    #[command(flatten, next_help_heading = "Timecourse parameters")]
    timecourse: TimecourseParameters,

    /// Write the sampled metrics as JSON to this file.
    #[arg(long)]
    json: Option<String>,

    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Serialize)]
struct TimecourseRecord {
    time: f64,
    metrics: RateMetrics,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cli.timecourse.validate()?;
    let reaction_type = cli.reaction.reaction_type()?;

    let particles = concentration_to_particle_count(cli.concentration);
    println!("{} {} + {} at {:.0} K, {:.3} mol/L -> {} pairs",
        reaction_type.to_string().yellow(),
        cli.reaction.substrate, cli.reaction.nucleophile,
        cli.reaction.temperature, cli.concentration, particles);

    let events = Rc::new(RefCell::new(EventBus::new()));
    let mut sim = match cli.seed {
        Some(seed) =>
            PopulationRateSimulator::with_seed(BallisticEngine::default(), events, seed),
        None =>
            PopulationRateSimulator::new(BallisticEngine::default(), events),
    };
    sim.initialize_simulation(
        &cli.reaction.substrate,
        &cli.reaction.nucleophile,
        particles,
        cli.reaction.temperature,
        reaction_type,
    )?;

    let ticks = cli.timecourse.total_ticks();
    let bar = ProgressBar::new(ticks as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} ticks ({eta})")?);

    println!("{:>10} {:>12} {:>12} {:>10} {:>12}",
        "time", "rate".cyan(), "remaining".green(), "products", "collisions");

    let mut output_times = cli.timecourse.output_times().into_iter().peekable();
    let mut records = Vec::new();

    let mut time = 0.0;
    for _ in 0..ticks {
        sim.update(cli.timecourse.dt);
        time += cli.timecourse.dt;
        bar.inc(1);

        while output_times.peek().is_some_and(|&t| t <= time) {
            let t = output_times.next().unwrap();
            let m = sim.metrics();
            bar.suspend(|| {
                println!("{:>10.3} {:>12.4} {:>11.1}% {:>10} {:>12}",
                    t, m.reaction_rate, m.remaining_reactants,
                    m.products_formed, m.collision_count);
            });
            records.push(TimecourseRecord { time: t, metrics: m });
        }
    }
    bar.finish_and_clear();

    let m = sim.metrics();
    println!("{} {} products from {} collisions in {:.1} s",
        "summary:".yellow(), m.products_formed, m.collision_count, m.elapsed_time);

    if let Some(path) = cli.json {
        fs::write(&path, serde_json::to_string_pretty(&records)?)?;
        println!("wrote {} records to {}", records.len(), path);
    }

    sim.clear();
    Ok(())
}
