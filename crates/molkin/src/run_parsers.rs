use clap::Args;
use anyhow::Result;
use anyhow::bail;

use mk_chem::ReactionType;

#[derive(Debug, Args)]
pub struct ReactionArguments {
    /// Substrate identity, e.g. CH3Br.
    #[arg(long, default_value = "CH3Br")]
    pub substrate: String,

    /// Nucleophile identity, e.g. OH-.
    #[arg(long, default_value = "OH-")]
    pub nucleophile: String,

    /// Reaction mechanism: SN2, SN1, E2 or E1.
    #[arg(long, default_value = "SN2")]
    pub reaction_type: String,

    /// Temperature in Kelvin.
    #[arg(long, default_value_t = 298.0)]
    pub temperature: f64,
}

impl ReactionArguments {
    pub fn reaction_type(&self) -> Result<ReactionType> {
        Ok(ReactionType::try_from(self.reaction_type.as_str())?)
    }
}

#[derive(Debug, Args)]
pub struct TimecourseParameters {
    /// Simulation stop time (simulated seconds).
    #[arg(long, default_value_t = 30.0)]
    pub t_end: f64,

    /// Tick length (simulated seconds).
    #[arg(long, default_value_t = 0.016)]
    pub dt: f64,

    /// Number of evenly spaced output rows over [0..t-end].
    #[arg(long, default_value_t = 30)]
    pub outputs: usize,
}

impl TimecourseParameters {
    /// Validate that all parameters make sense.
    pub fn validate(&self) -> Result<()> {
        if self.t_end <= 0.0 {
            bail!("t_end ({}) must be positive", self.t_end);
        }
        if self.dt <= 0.0 || self.dt > self.t_end {
            bail!("dt ({}) must be in (0, t_end]", self.dt);
        }
        if self.outputs == 0 {
            bail!("outputs must be > 0");
        }
        Ok(())
    }

    pub fn output_times(&self) -> Vec<f64> {
        let step = self.t_end / self.outputs as f64;
        (1..=self.outputs).map(|i| i as f64 * step).collect()
    }

    pub fn total_ticks(&self) -> usize {
        (self.t_end / self.dt).ceil() as usize
    }
}
