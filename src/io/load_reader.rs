use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context};
use log::{info, warn};

use crate::problem::{InstanceKey, Load, Point, ProblemId};

/**
Load files are plain text with one header line followed by one load per line:

```text
loadNumber pickup dropoff
1 (-9.100071078494038,-48.89301103772511) (-116.78442480028325,-5.160885216820083)
2 (73.96200889416584,-6.003836296945713) (14.235371989000427,-35.38232380703132)
```

Fields are separated by whitespace, coordinates are `(x,y)`. Lines that do not match are skipped
with a warning; the file name becomes the instance key of every load it contains.
 */
pub fn read_loads(path: impl AsRef<Path>, problem_id: ProblemId) -> anyhow::Result<Vec<Load>> {
    let path = path.as_ref();
    let instance_key = instance_key_of(path)?;
    let f = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let loads = parse_loads(BufReader::new(f), &instance_key, problem_id)
        .with_context(|| format!("could not read {}", path.display()))?;
    info!("read {} loads from {}", loads.len(), path.display());
    Ok(loads)
}

/// Reads several load files into one batch; each file is its own instance. Two files with the same
/// name would end up in the same instance, so the batch is rejected instead.
pub fn read_batch<P: AsRef<Path>>(
    paths: &[P],
    problem_id: ProblemId,
) -> anyhow::Result<Vec<Load>> {
    let mut keys = HashSet::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let key = instance_key_of(path)?;
        if keys.contains(&key) {
            bail!(
                "{} repeats the instance {:?} of an earlier file",
                path.display(),
                key
            );
        }
        keys.insert(key);
    }

    let mut loads = Vec::new();
    for path in paths {
        loads.extend(read_loads(path, problem_id)?);
    }
    Ok(loads)
}

pub fn instance_key_of(path: &Path) -> anyhow::Result<InstanceKey> {
    Ok(path
        .file_name()
        .with_context(|| format!("{} does not name a file", path.display()))?
        .to_string_lossy()
        .to_string())
}

pub fn parse_loads(
    reader: impl BufRead,
    instance_key: &str,
    problem_id: ProblemId,
) -> anyhow::Result<Vec<Load>> {
    let mut lines = reader.lines();
    // loadNumber pickup dropoff
    lines.next().transpose()?;

    let mut loads = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_load(line, instance_key, problem_id) {
            Ok(load) => loads.push(load),
            Err(e) => warn!("{}:{}: skipped line | {:#}", instance_key, idx + 2, e),
        }
    }
    Ok(loads)
}

fn parse_load(line: &str, instance_key: &str, problem_id: ProblemId) -> anyhow::Result<Load> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        bail!("expected 3 fields, found {}", fields.len());
    }
    let sequence_number = fields[0]
        .parse::<usize>()
        .with_context(|| format!("invalid load number {:?}", fields[0]))?;
    if sequence_number == 0 {
        bail!("load number must be positive");
    }
    let pickup = parse_point(fields[1]).context("invalid pickup")?;
    let dropoff = parse_point(fields[2]).context("invalid dropoff")?;

    Ok(Load::new(
        sequence_number,
        pickup,
        dropoff,
        instance_key,
        problem_id,
    ))
}

fn parse_point(field: &str) -> anyhow::Result<Point> {
    let mut split = field.trim_matches(&['(', ')'][..]).split(",");
    let x = parse_coordinate(split.next().context("expected next split: x")?)?;
    let y = parse_coordinate(split.next().context("expected next split: y")?)?;
    if split.next().is_some() {
        bail!("expected two coordinates in {:?}", field);
    }
    Ok(Point::new(x, y))
}

fn parse_coordinate(s: &str) -> anyhow::Result<f64> {
    let value = s
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid coordinate {:?}", s))?;
    if !value.is_finite() {
        bail!("coordinate {:?} is not finite", s);
    }
    Ok(value)
}
