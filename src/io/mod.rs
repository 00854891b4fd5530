use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use log::info;

use crate::io::load_reader::read_batch;
use crate::problem::{Load, ProblemId, UNASSIGNED_PROBLEM};
use crate::solution::BatchResult;
use crate::store::LoadStore;

pub mod load_reader;
pub mod schedule_writer;

/// Creates a new problem and ingests every file as one of its instances. All files are read
/// before the store is touched, so a failing file leaves no problem behind.
pub fn submit_files(store: &mut impl LoadStore, paths: &[String]) -> anyhow::Result<ProblemId> {
    let batch = read_batch(paths, UNASSIGNED_PROBLEM)?;
    let problem_id = store.create_problem()?;
    let loads: Vec<Load> = batch
        .into_iter()
        .map(|load| load.assigned_to(problem_id))
        .collect();
    store.insert_loads(problem_id, &loads)?;
    info!("submitted {} files as problem {}", paths.len(), problem_id);
    Ok(problem_id)
}

/// Opens `path` for writing, or stdout when no path is given.
pub fn create_output(path: Option<&str>) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not create {}", path))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    Ok(writer)
}

pub fn write_result_json(writer: &mut impl Write, result: &BatchResult) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
