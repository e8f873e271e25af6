mod cpu;
mod display;
mod error;
mod fifo;
mod mlfq;
mod process;
mod round_robin;
mod runner;
pub mod scenarios;
mod sjf;

use std::{fmt, str::FromStr};

pub use cpu::{Cpu, Slice, Step};
pub use display::{render_table, DisplayTerminal};
pub use error::SimError;
pub use fifo::FifoScheduler;
pub use mlfq::{MultiLevelFeedbackQueue, LEVELS};
pub use process::{IoEvent, Process, ProcessResult, ProcessState};
pub use round_robin::RoundRobinScheduler;
pub use runner::{Averager, ProcessRunner, Report, RunConfig};
pub use sjf::ShortestJobFirst;

/// Time slice granted per turn by the preemptive policies.
pub const QUANTUM: f64 = 0.5;

/// Tolerance for comparisons against zero, IO thresholds and quantum
/// boundaries. Absorbs drift from repeated floating point subtraction.
pub const EPSILON: f64 = 1e-9;

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schedule {
    /// One entry per process, in completion order.
    pub results: Vec<ProcessResult>,
    /// Every CPU allocation in the order it happened.
    pub slices: Vec<Slice>,
}

pub trait Scheduler {
    const NAME: &'static str;

    /// Simulates `processes`, all arriving at time zero. The demand is left
    /// untouched; each call works on fresh run-state.
    fn schedule(&self, processes: &[Process]) -> Schedule;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fifo,
    Sjf,
    RoundRobin,
    Mlfq,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Fifo,
        Algorithm::Sjf,
        Algorithm::RoundRobin,
        Algorithm::Mlfq,
    ];

    pub fn schedule(self, processes: &[Process]) -> Schedule {
        match self {
            Algorithm::Fifo => FifoScheduler.schedule(processes),
            Algorithm::Sjf => ShortestJobFirst.schedule(processes),
            Algorithm::RoundRobin => RoundRobinScheduler.schedule(processes),
            Algorithm::Mlfq => MultiLevelFeedbackQueue.schedule(processes),
        }
    }

    /// Human readable name of the policy.
    pub fn title(self) -> &'static str {
        match self {
            Algorithm::Fifo => FifoScheduler::NAME,
            Algorithm::Sjf => ShortestJobFirst::NAME,
            Algorithm::RoundRobin => RoundRobinScheduler::NAME,
            Algorithm::Mlfq => MultiLevelFeedbackQueue::NAME,
        }
    }

    /// Short command line name.
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Fifo => "fifo",
            Algorithm::Sjf => "sjf",
            Algorithm::RoundRobin => "rr",
            Algorithm::Mlfq => "mlfq",
        }
    }
}

impl FromStr for Algorithm {
    type Err = SimError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.key() == name)
            .ok_or_else(|| SimError::UnknownAlgorithm(name.to_owned()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
