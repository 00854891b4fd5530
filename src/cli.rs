use clap::{Parser, Subcommand};

use crate::problem::ProblemId;
use crate::solver::settings::{read_config, Settings, SettingsOverrides, TieBreak};

#[derive(Parser, Debug)]
#[command(version, about = "Assigns transport loads to drivers within a shift limit")]
pub struct ProgramArguments {
    #[arg(
        long,
        global = true,
        default_value = "data",
        help = "directory of the problem store"
    )]
    pub data_dir: String,

    #[arg(long, global = true, help = "toml file with a [solver] table")]
    pub config: Option<String>,

    #[arg(
        long,
        global = true,
        help = "print drivers, total cost, mean cost and time to stdout",
        default_value = "false"
    )]
    pub print_summary_to_stdout: bool,

    #[command(flatten)]
    pub solver: SolverArguments,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stores load files as a new problem and prints its id
    Submit {
        #[arg(required = true, help = "load files, one instance each")]
        files: Vec<String>,
    },
    /// Lists all stored problems
    Problems,
    /// Computes the routes of a stored problem
    Results {
        #[arg(long)]
        problem_id: ProblemId,
        #[command(flatten)]
        output: OutputArguments,
    },
    /// Computes the routes of load files without storing them
    Solve {
        #[arg(required = true, help = "load files, one instance each")]
        files: Vec<String>,
        #[command(flatten)]
        output: OutputArguments,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct OutputArguments {
    #[arg(short, long, help = "result json file (default: stdout)")]
    pub output: Option<String>,

    #[arg(long, help = "file to store the driver schedule")]
    pub schedule: Option<String>,
}

#[derive(clap::Args, Clone, Debug)]
pub struct SolverArguments {
    #[arg(long, global = true, help = "maximum driving time per driver [default: 720]")]
    pub shift_limit: Option<f64>,
    #[arg(long, global = true, help = "cost of employing one driver [default: 500]")]
    pub fixed_cost_per_driver: Option<f64>,
    #[arg(long, global = true, value_enum, help = "[default: sequence-number]")]
    pub tie_break: Option<TieBreak>,
}

impl SolverArguments {
    pub(crate) fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            shift_limit: self.shift_limit,
            fixed_cost_per_driver: self.fixed_cost_per_driver,
            tie_break: self.tie_break,
        }
    }
}

impl ProgramArguments {
    /// defaults, then the config file, then explicit flags
    pub(crate) fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::default();
        if let Some(ref path) = self.config {
            settings = settings.with_overrides(&read_config(path)?);
        }
        Ok(settings.with_overrides(&self.solver.overrides()))
    }
}
