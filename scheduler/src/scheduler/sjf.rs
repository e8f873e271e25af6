use super::{fifo::run_to_completion, Process, Schedule, Scheduler};

/// Non-preemptive shortest job first, ordered once by total CPU demand.
pub struct ShortestJobFirst;

impl Scheduler for ShortestJobFirst {
    const NAME: &'static str = "Shortest Job First Scheduler";

    fn schedule(&self, processes: &[Process]) -> Schedule {
        let mut order: Vec<&Process> = processes.iter().collect();
        // Stable, so ties keep arrival order.
        order.sort_by(|a, b| a.total_cpu().total_cmp(&b.total_cpu()));
        run_to_completion(order)
    }
}
