#![allow(dead_code)]

use clap::Parser;
use log::info;
use took::Timer;

use crate::cli::{Command, OutputArguments, ProgramArguments};
use crate::io::schedule_writer::write_schedule;
use crate::io::{create_output, submit_files, write_result_json};
use crate::solution::BatchResult;
use crate::store::{FileStore, LoadStore, MemoryStore};

mod construction;
mod io;
mod problem;
mod solution;
mod solver;
mod store;
mod utils;

mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )?;
    let args = ProgramArguments::parse_from(args);
    info!("{:?}", &args);

    let settings = args.settings()?;
    info!("{:?}", &settings);

    match &args.command {
        Command::Submit { files } => {
            let mut store = FileStore::open(&args.data_dir)?;
            let problem_id = submit_files(&mut store, files)?;
            println!("{}", problem_id);
        }
        Command::Problems => {
            let store = FileStore::open(&args.data_dir)?;
            for problem in store.list_problems()? {
                println!("{}\t{}", problem.id, problem.created_at.to_rfc3339());
            }
        }
        Command::Results { problem_id, output } => {
            let store = FileStore::open(&args.data_dir)?;
            let result = solver::solve_problem(&store, *problem_id, &settings)?;
            emit(&args, output, &result)?;
        }
        Command::Solve { files, output } => {
            let load_timer = Timer::new();
            let mut store = MemoryStore::new();
            let problem_id = submit_files(&mut store, files)?;
            info!("files loaded after {}", load_timer.took());
            let result = solver::solve_problem(&store, problem_id, &settings)?;
            emit(&args, output, &result)?;
        }
    }

    Ok(())
}

fn emit(
    args: &ProgramArguments,
    output: &OutputArguments,
    result: &BatchResult,
) -> anyhow::Result<()> {
    write_result_json(&mut create_output(output.output.as_deref())?, result)?;

    if let Some(ref path) = output.schedule {
        info!("writing schedule to {}", path);
        write_schedule(&mut create_output(Some(path))?, result)?;
    }

    if args.print_summary_to_stdout {
        println!(
            "{},{},{},{}",
            result.kpis.number_of_drivers,
            result.kpis.total_cost,
            result.kpis.mean_cost,
            result.kpis.time_taken
        );
    }
    Ok(())
}
