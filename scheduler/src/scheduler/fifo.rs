use super::{Cpu, Process, Schedule, Scheduler};

/// Runs processes in arrival order, each one to completion.
pub struct FifoScheduler;

impl Scheduler for FifoScheduler {
    const NAME: &'static str = "FIFO Scheduler";

    fn schedule(&self, processes: &[Process]) -> Schedule {
        run_to_completion(processes)
    }
}

/// Non-preemptive execution shared by FIFO and SJF: each process keeps the
/// CPU, across any IO blocks, until it finishes.
pub(super) fn run_to_completion<'a>(order: impl IntoIterator<Item = &'a Process>) -> Schedule {
    let mut cpu = Cpu::new();
    let mut results = Vec::new();

    for process in order {
        let mut state = process.snapshot();
        cpu.mark_first_run(&mut state);

        while !state.is_done() {
            let budget = state.remaining();
            cpu.run(&mut state, budget, 0);
        }
        results.push(cpu.finish(&mut state));
    }

    cpu.into_schedule(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{scenarios, IoEvent};

    #[test]
    fn cpu_only_scenario() {
        let processes = scenarios::scenario("1").unwrap();
        let results = FifoScheduler.schedule(&processes).results;

        let rows: Vec<_> = results
            .iter()
            .map(|r| (r.name.as_str(), r.elapsed, r.cpu, r.blocked, r.first_run))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("A", 10.0, 10.0, 0.0, 0.0),
                ("B", 25.0, 15.0, 0.0, 10.0),
                ("C", 45.0, 20.0, 0.0, 25.0),
            ]
        );
    }

    #[test]
    fn io_event_adds_blocked_time() {
        let processes = vec![Process::with_io("A", 5.0, vec![IoEvent::new(2.0, 0.4)]).unwrap()];
        let schedule = FifoScheduler.schedule(&processes);
        let result = &schedule.results[0];

        assert_eq!(result.cpu, 5.0);
        assert_eq!(result.blocked, 0.4);
        assert!((result.elapsed - 5.4).abs() < 1e-9);
        assert_eq!(schedule.slices.len(), 2);
    }

    #[test]
    fn keeps_cpu_across_io_blocks() {
        let processes = scenarios::scenario("3").unwrap();
        let schedule = FifoScheduler.schedule(&processes);

        // Slices of one process are contiguous: no interleaving.
        let mut seen: Vec<&str> = Vec::new();
        for slice in &schedule.slices {
            if seen.last() != Some(&slice.process.as_str()) {
                assert!(!seen.contains(&slice.process.as_str()));
                seen.push(&slice.process);
            }
        }
        assert_eq!(seen, vec!["A", "B", "C"]);
    }
}
