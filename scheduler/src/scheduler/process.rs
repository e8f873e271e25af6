use super::{SimError, EPSILON};

/// A scripted interrupt: once the owning process has consumed `cpu_threshold`
/// of CPU, it blocks for `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IoEvent {
    cpu_threshold: f64,
    duration: f64,
}

impl IoEvent {
    pub const fn new(cpu_threshold: f64, duration: f64) -> Self {
        Self {
            cpu_threshold,
            duration,
        }
    }

    pub fn cpu_threshold(&self) -> f64 {
        self.cpu_threshold
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// The static demand of a simulated task. Never mutated once built; every
/// simulation run takes its own [`ProcessState`] snapshot of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    name: String,
    total_cpu: f64,
    io_events: Vec<IoEvent>,
}

impl Process {
    pub fn new(name: &str, total_cpu: f64) -> Result<Self, SimError> {
        Process::with_io(name, total_cpu, Vec::new())
    }

    /// Builds a process with IO events, which must be sorted by threshold.
    pub fn with_io(name: &str, total_cpu: f64, io_events: Vec<IoEvent>) -> Result<Self, SimError> {
        let invalid = |reason: String| SimError::InvalidProcess {
            name: name.to_owned(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("empty name".to_owned()));
        }
        if !total_cpu.is_finite() || total_cpu < 0.0 {
            return Err(invalid(format!("CPU demand {total_cpu} is not a non-negative number")));
        }

        let mut last_threshold = 0.0;
        for (index, event) in io_events.iter().enumerate() {
            if !event.cpu_threshold.is_finite() || event.cpu_threshold < 0.0 {
                return Err(invalid(format!(
                    "IO event {index} has invalid threshold {}",
                    event.cpu_threshold
                )));
            }
            if !event.duration.is_finite() || event.duration < 0.0 {
                return Err(invalid(format!(
                    "IO event {index} has invalid duration {}",
                    event.duration
                )));
            }
            if event.cpu_threshold < last_threshold {
                return Err(invalid(format!("IO event {index} is out of threshold order")));
            }
            last_threshold = event.cpu_threshold;
        }

        Ok(Self {
            name: name.to_owned(),
            total_cpu: positive_zero(total_cpu),
            io_events: io_events
                .into_iter()
                .map(|event| {
                    IoEvent::new(
                        positive_zero(event.cpu_threshold),
                        positive_zero(event.duration),
                    )
                })
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_cpu(&self) -> f64 {
        self.total_cpu
    }

    pub fn io_events(&self) -> &[IoEvent] {
        &self.io_events
    }

    /// Fresh run-state for one simulation run.
    pub fn snapshot(&self) -> ProcessState<'_> {
        ProcessState {
            process: self,
            remaining: self.total_cpu,
            cpu_consumed: 0.0,
            blocked_time: 0.0,
            next_io_index: 0,
            first_run_time: None,
            finish_time: None,
        }
    }
}

/// Maps `-0.0` to `0.0` so that equal demands also compare equal under
/// `f64::total_cmp`.
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// The mutable side of a process during one run. Owned by the algorithm
/// executing it; the demand is only borrowed.
#[derive(Debug, Clone)]
pub struct ProcessState<'a> {
    pub(super) process: &'a Process,
    pub(super) remaining: f64,
    pub(super) cpu_consumed: f64,
    pub(super) blocked_time: f64,
    pub(super) next_io_index: usize,
    pub(super) first_run_time: Option<f64>,
    pub(super) finish_time: Option<f64>,
}

impl<'a> ProcessState<'a> {
    pub fn name(&self) -> &'a str {
        &self.process.name
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn cpu_consumed(&self) -> f64 {
        self.cpu_consumed
    }

    pub fn blocked_time(&self) -> f64 {
        self.blocked_time
    }

    pub fn first_run_time(&self) -> Option<f64> {
        self.first_run_time
    }

    pub fn finish_time(&self) -> Option<f64> {
        self.finish_time
    }

    pub(super) fn pending_io(&self) -> Option<IoEvent> {
        self.process.io_events.get(self.next_io_index).copied()
    }

    pub fn is_done(&self) -> bool {
        self.remaining <= EPSILON
    }

    pub fn result(&self) -> ProcessResult {
        ProcessResult {
            name: self.process.name.clone(),
            elapsed: self.finish_time.unwrap_or(0.0),
            cpu: self.cpu_consumed,
            blocked: self.blocked_time,
            first_run: self.first_run_time.unwrap_or(0.0),
        }
    }
}

/// Metrics of one completed process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessResult {
    pub name: String,
    pub elapsed: f64,
    pub cpu: f64,
    pub blocked: f64,
    pub first_run: f64,
}
