use super::{Algorithm, Process, ProcessResult, Schedule, SimError};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// What to simulate and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub algorithm: Algorithm,
    pub scenario: String,
    repeat: usize,
}

impl RunConfig {
    pub const DEFAULT_REPEAT: i32 = 3;

    /// A `repeat` below one is clamped to a single run.
    pub fn new(algorithm: Algorithm, scenario: &str, repeat: i32) -> Self {
        Self {
            algorithm,
            scenario: scenario.to_owned(),
            repeat: repeat.max(1) as usize,
        }
    }

    pub fn repeat(&self) -> usize {
        self.repeat
    }
}

/// Averaged metrics of a repeated simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub config: RunConfig,
    /// Per-process averages, in the completion order of the first run.
    pub averages: Vec<ProcessResult>,
    /// The first run in full, for the timeline view.
    pub schedule: Schedule,
}

pub struct ProcessRunner {
    config: RunConfig,
}

impl ProcessRunner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Runs the configured algorithm `repeat` times, each time over the
    /// untouched `processes`, and averages the results by process name.
    ///
    /// Only the first run is kept in full; later runs are folded into the
    /// averages and dropped.
    pub fn run(&self, processes: &[Process]) -> Result<Report, SimError> {
        let mut names = HashSet::new();
        for process in processes {
            if !names.insert(process.name()) {
                return Err(SimError::DuplicateProcess(process.name().to_owned()));
            }
        }

        info!(
            algorithm = %self.config.algorithm,
            scenario = %self.config.scenario,
            repeat = self.config.repeat,
            processes = processes.len(),
            "starting simulation"
        );

        let schedule = self.config.algorithm.schedule(processes);
        debug!(run = 0, slices = schedule.slices.len(), "run complete");

        let mut averager = Averager::new(&schedule.results);
        for run in 1..self.config.repeat {
            let results = self.config.algorithm.schedule(processes).results;
            averager.add(&results)?;
            debug!(run, "run complete");
        }

        let averages = averager.finish();
        let makespan = averages.iter().map(|r| r.elapsed).fold(0.0, f64::max);
        info!(makespan, "simulation finished");

        Ok(Report {
            config: self.config.clone(),
            averages,
            schedule,
        })
    }
}

/// Running per-process totals, keyed by name. The first run fixes the set
/// of names and their order; every later run must contain exactly those.
#[derive(Debug, Clone)]
pub struct Averager {
    index: HashMap<String, usize>,
    totals: Vec<ProcessResult>,
    runs: usize,
}

impl Averager {
    pub fn new(first: &[ProcessResult]) -> Self {
        Self {
            index: first
                .iter()
                .enumerate()
                .map(|(i, result)| (result.name.clone(), i))
                .collect(),
            totals: first.to_vec(),
            runs: 1,
        }
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Adds one more run. On a mismatch the totals are left untouched.
    pub fn add(&mut self, results: &[ProcessResult]) -> Result<(), SimError> {
        let run = self.runs;
        let mismatch = |name: &str| SimError::RunMismatch {
            run,
            name: name.to_owned(),
        };

        let mut slots = vec![None; self.totals.len()];
        for result in results {
            let &i = self
                .index
                .get(&result.name)
                .ok_or_else(|| mismatch(&result.name))?;
            if slots[i].replace(result).is_some() {
                return Err(mismatch(&result.name));
            }
        }

        if let Some(i) = slots.iter().position(Option::is_none) {
            return Err(mismatch(&self.totals[i].name));
        }

        for (total, result) in self.totals.iter_mut().zip(slots.into_iter().flatten()) {
            total.elapsed += result.elapsed;
            total.cpu += result.cpu;
            total.blocked += result.blocked;
            total.first_run += result.first_run;
        }

        self.runs += 1;
        Ok(())
    }

    pub fn finish(self) -> Vec<ProcessResult> {
        let count = self.runs as f64;
        self.totals
            .into_iter()
            .map(|total| ProcessResult {
                elapsed: total.elapsed / count,
                cpu: total.cpu / count,
                blocked: total.blocked / count,
                first_run: total.first_run / count,
                name: total.name,
            })
            .collect()
    }
}
