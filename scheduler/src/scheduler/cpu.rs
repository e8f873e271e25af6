use super::{IoEvent, ProcessResult, ProcessState, Schedule, EPSILON};
use tracing::{debug, trace};

/// Outcome of one call to [`ProcessState::consume`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// CPU time actually used.
    pub taken: f64,
    /// Duration of the IO event that fired during this step, if any.
    pub io_fired: Option<f64>,
}

impl ProcessState<'_> {
    /// Runs the process for at most `dt` of CPU, stopping early at its next
    /// IO threshold. A due IO event fires without consuming CPU.
    ///
    /// Simulated time is left to the caller.
    pub fn consume(&mut self, dt: f64) -> Step {
        debug_assert!(dt >= 0.0);

        let Some(event) = self.pending_io() else {
            let take = dt.min(self.remaining);
            self.apply(take);
            return Step {
                taken: take,
                io_fired: None,
            };
        };

        let gap = event.cpu_threshold() - self.cpu_consumed;
        if gap <= EPSILON {
            return Step {
                taken: 0.0,
                io_fired: Some(self.fire_io(event)),
            };
        }

        let take = dt.min(gap).min(self.remaining);
        self.apply(take);
        let reached = self.cpu_consumed >= event.cpu_threshold() - EPSILON;
        Step {
            taken: take,
            io_fired: reached.then(|| self.fire_io(event)),
        }
    }

    fn apply(&mut self, take: f64) {
        self.cpu_consumed += take;
        self.remaining -= take;
    }

    fn fire_io(&mut self, event: IoEvent) -> f64 {
        self.next_io_index += 1;
        self.blocked_time += event.duration();
        event.duration()
    }
}

/// One CPU allocation on the simulated timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub process: String,
    /// Queue level the process ran at. Always 0 outside of MLFQ.
    pub level: usize,
    pub start: f64,
    pub taken: f64,
    pub io_fired: Option<f64>,
}

impl Slice {
    /// Simulated time at which the slice (including its IO block) ends.
    pub fn end(&self) -> f64 {
        self.start + self.taken + self.io_fired.unwrap_or(0.0)
    }
}

/// The simulated processor: owns the clock and the timeline of one run.
#[derive(Debug, Default)]
pub struct Cpu {
    now: f64,
    slices: Vec<Slice>,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn mark_first_run(&self, state: &mut ProcessState) {
        if state.first_run_time.is_none() {
            state.first_run_time = Some(self.now);
        }
    }

    /// Gives `state` the CPU for up to `budget`, advancing the clock by the
    /// time taken plus any IO block that fired.
    pub fn run(&mut self, state: &mut ProcessState, budget: f64, level: usize) -> Step {
        self.mark_first_run(state);

        let start = self.now;
        let step = state.consume(budget);
        self.now += step.taken;
        if let Some(duration) = step.io_fired {
            self.now += duration;
        }

        trace!(
            process = state.name(),
            level,
            start,
            taken = step.taken,
            io = ?step.io_fired,
            remaining = state.remaining,
            "slice"
        );
        self.slices.push(Slice {
            process: state.name().to_owned(),
            level,
            start,
            taken: step.taken,
            io_fired: step.io_fired,
        });

        step
    }

    /// Stamps the finish time and snapshots the result.
    pub fn finish(&self, state: &mut ProcessState) -> ProcessResult {
        self.mark_first_run(state);
        state.finish_time = Some(self.now);

        debug!(
            process = state.name(),
            finish = self.now,
            cpu = state.cpu_consumed,
            blocked = state.blocked_time,
            "process finished"
        );
        state.result()
    }

    pub fn into_schedule(self, results: Vec<ProcessResult>) -> Schedule {
        Schedule {
            results,
            slices: self.slices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Process;
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn consume_without_io_is_capped_by_remaining() {
        let process = Process::new("A", 1.2).unwrap();
        let mut state = process.snapshot();

        let step = state.consume(0.5);
        assert_eq!(step, Step { taken: 0.5, io_fired: None });

        let step = state.consume(5.0);
        assert_close(step.taken, 0.7);
        assert!(state.is_done());
        assert_close(state.cpu_consumed(), 1.2);
    }

    #[test]
    fn consume_stops_at_io_threshold() {
        let process = Process::with_io("A", 5.0, vec![IoEvent::new(2.0, 0.4)]).unwrap();
        let mut state = process.snapshot();

        let step = state.consume(5.0);
        assert_eq!(step, Step { taken: 2.0, io_fired: Some(0.4) });
        assert_eq!(state.blocked_time(), 0.4);
        assert_eq!(state.remaining(), 3.0);
        assert_eq!(state.pending_io(), None);
    }

    #[test]
    fn consume_short_of_threshold_does_not_fire() {
        let process = Process::with_io("A", 5.0, vec![IoEvent::new(2.0, 0.4)]).unwrap();
        let mut state = process.snapshot();

        assert_eq!(state.consume(0.5), Step { taken: 0.5, io_fired: None });
        assert_eq!(state.consume(0.5), Step { taken: 0.5, io_fired: None });
        assert_eq!(state.consume(0.5), Step { taken: 0.5, io_fired: None });
        assert_eq!(state.consume(0.5), Step { taken: 0.5, io_fired: Some(0.4) });
    }

    #[test]
    fn due_io_fires_without_consuming() {
        let process = Process::with_io("A", 1.0, vec![IoEvent::new(0.0, 0.3)]).unwrap();
        let mut state = process.snapshot();

        let step = state.consume(0.5);
        assert_eq!(step, Step { taken: 0.0, io_fired: Some(0.3) });
        assert_eq!(state.cpu_consumed(), 0.0);

        let step = state.consume(0.5);
        assert_eq!(step, Step { taken: 0.5, io_fired: None });
    }

    #[test]
    fn io_beyond_demand_never_fires() {
        let process = Process::with_io("A", 1.0, vec![IoEvent::new(2.0, 0.3)]).unwrap();
        let mut state = process.snapshot();

        let step = state.consume(10.0);
        assert_eq!(step, Step { taken: 1.0, io_fired: None });
        assert!(state.is_done());
        assert_eq!(state.blocked_time(), 0.0);
    }

    #[test]
    fn cpu_clock_includes_io_block() {
        let process = Process::with_io("A", 5.0, vec![IoEvent::new(2.0, 0.4)]).unwrap();
        let mut state = process.snapshot();
        let mut cpu = Cpu::new();

        cpu.run(&mut state, 5.0, 0);
        assert_close(cpu.now(), 2.4);
        cpu.run(&mut state, 5.0, 0);
        assert_close(cpu.now(), 5.4);

        let result = cpu.finish(&mut state);
        assert_close(result.elapsed, 5.4);
        assert_eq!(result.first_run, 0.0);

        let schedule = cpu.into_schedule(vec![result]);
        assert_eq!(schedule.slices.len(), 2);
        assert_close(schedule.slices[0].end(), schedule.slices[1].start);
    }
}
