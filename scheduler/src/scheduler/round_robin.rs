use super::{Cpu, Process, ProcessState, Schedule, Scheduler, QUANTUM};
use std::collections::VecDeque;

/// A single ready queue served one quantum at a time.
pub struct RoundRobinScheduler;

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin Scheduler";

    fn schedule(&self, processes: &[Process]) -> Schedule {
        let mut ready: VecDeque<ProcessState> = processes.iter().map(Process::snapshot).collect();
        let mut cpu = Cpu::new();
        let mut results = Vec::with_capacity(ready.len());

        while let Some(mut state) = ready.pop_front() {
            if !state.is_done() {
                cpu.run(&mut state, QUANTUM, 0);

                // Back of the line, whether the quantum ran out or IO cut it short.
                if !state.is_done() {
                    ready.push_back(state);
                    continue;
                }
            }
            results.push(cpu.finish(&mut state));
        }

        cpu.into_schedule(results)
    }
}
