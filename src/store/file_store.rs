use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::problem::{Load, ProblemId};
use crate::store::{check_loads_belong_to, LoadStore, Problem};

const PROBLEMS_FILE: &str = "problems.json";
const LOADS_DIRECTORY: &str = "loads";

/// Stores problems as JSON documents below a data directory:
///
/// ```text
/// <dir>/problems.json      list of all problems
/// <dir>/loads/<id>.json    loads of one problem, in insertion order
/// ```
///
/// The store assumes a single writer: ids are derived from `problems.json` without locking, so two
/// processes submitting into the same directory at once may hand out the same id.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn open(directory: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(directory.join(LOADS_DIRECTORY))
            .with_context(|| format!("could not create data directory {}", directory.display()))?;
        debug!("opened store at {}", directory.display());
        Ok(Self { directory })
    }

    fn problems_path(&self) -> PathBuf {
        self.directory.join(PROBLEMS_FILE)
    }

    fn loads_path(&self, problem_id: ProblemId) -> PathBuf {
        self.directory
            .join(LOADS_DIRECTORY)
            .join(format!("{}.json", problem_id))
    }

    fn read_problems(&self) -> anyhow::Result<Vec<Problem>> {
        let path = self.problems_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    fn ensure_known(&self, problem_id: ProblemId) -> anyhow::Result<()> {
        if !self.read_problems()?.iter().any(|it| it.id == problem_id) {
            bail!("unknown problem {}", problem_id);
        }
        Ok(())
    }
}

impl LoadStore for FileStore {
    fn create_problem(&mut self) -> anyhow::Result<ProblemId> {
        let mut problems = self.read_problems()?;
        let id = problems.iter().map(|it| it.id).max().map_or(1, |it| it + 1);
        write_json(&self.loads_path(id), &Vec::<Load>::new())?;
        problems.push(Problem {
            id,
            created_at: Utc::now(),
        });
        write_json(&self.problems_path(), &problems)?;
        info!("created problem {}", id);
        Ok(id)
    }

    fn insert_loads(&mut self, problem_id: ProblemId, loads: &[Load]) -> anyhow::Result<()> {
        check_loads_belong_to(problem_id, loads)?;
        let mut stored = self.loads_of(problem_id)?;
        stored.extend_from_slice(loads);
        write_json(&self.loads_path(problem_id), &stored)?;
        debug!(
            "stored {} loads for problem {} ({} in total)",
            loads.len(),
            problem_id,
            stored.len()
        );
        Ok(())
    }

    fn list_problems(&self) -> anyhow::Result<Vec<Problem>> {
        self.read_problems()
    }

    fn loads_of(&self, problem_id: ProblemId) -> anyhow::Result<Vec<Load>> {
        self.ensure_known(problem_id)?;
        read_json(&self.loads_path(problem_id))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("could not parse {}", path.display()))
}

/// Writes next to the target first so readers never see a half-written document.
fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let tmp = path.with_extension(format!("json.{}.tmp", std::process::id()));
    {
        let f = File::create(&tmp).with_context(|| format!("could not create {}", tmp.display()))?;
        let mut file = BufWriter::new(f);
        serde_json::to_writer(&mut file, value)?;
        file.flush()?;
    }
    fs::rename(&tmp, path).with_context(|| format!("could not replace {}", path.display()))?;
    Ok(())
}
