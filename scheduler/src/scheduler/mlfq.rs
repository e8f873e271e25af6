use super::{Cpu, Process, ProcessState, Schedule, Scheduler, EPSILON, QUANTUM};
use std::collections::VecDeque;
use tracing::debug;

/// Number of priority levels, 0 being the highest.
pub const LEVELS: usize = 3;

/// Three-level feedback queue. A process that uses its whole quantum drops a
/// level; one cut short by IO keeps its level. There is no promotion.
pub struct MultiLevelFeedbackQueue;

impl Scheduler for MultiLevelFeedbackQueue {
    const NAME: &'static str = "Multi-Level Feedback Queue Scheduler";

    fn schedule(&self, processes: &[Process]) -> Schedule {
        let mut queues: [VecDeque<ProcessState>; LEVELS] = Default::default();
        queues[0].extend(processes.iter().map(Process::snapshot));

        let mut cpu = Cpu::new();
        let mut results = Vec::with_capacity(processes.len());

        while let Some(level) = queues.iter().position(|queue| !queue.is_empty()) {
            let Some(mut state) = queues[level].pop_front() else {
                break;
            };

            if !state.is_done() {
                let step = cpu.run(&mut state, QUANTUM, level);

                if !state.is_done() {
                    let target = if step.taken >= QUANTUM - EPSILON {
                        (level + 1).min(LEVELS - 1)
                    } else {
                        level
                    };
                    if target != level {
                        debug!(process = state.name(), from = level, to = target, "demoted");
                    }
                    queues[target].push_back(state);
                    continue;
                }
            }
            results.push(cpu.finish(&mut state));
        }

        cpu.into_schedule(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{scenarios, IoEvent, RoundRobinScheduler};

    fn trace(schedule: &Schedule) -> Vec<(&str, usize)> {
        schedule
            .slices
            .iter()
            .map(|s| (s.process.as_str(), s.level))
            .collect()
    }

    #[test]
    fn full_quanta_demote_down_to_the_last_level() {
        let processes = vec![Process::new("A", 3.0).unwrap()];
        let schedule = MultiLevelFeedbackQueue.schedule(&processes);

        let levels: Vec<usize> = schedule.slices.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 2, 2, 2]);
        assert_eq!(schedule.results[0].elapsed, 3.0);
    }

    #[test]
    fn io_cut_slice_keeps_level() {
        let processes = vec![Process::with_io("A", 2.0, vec![IoEvent::new(0.3, 0.1)]).unwrap()];
        let schedule = MultiLevelFeedbackQueue.schedule(&processes);

        let levels: Vec<usize> = schedule.slices.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![0, 0, 1, 2, 2]);
        assert_eq!(schedule.results[0].blocked, 0.1);
    }

    #[test]
    fn higher_level_runs_first() {
        let processes = vec![
            Process::new("A", 2.0).unwrap(),
            Process::with_io("B", 1.0, vec![IoEvent::new(0.2, 0.1), IoEvent::new(0.4, 0.1)])
                .unwrap(),
        ];
        let schedule = MultiLevelFeedbackQueue.schedule(&processes);

        assert_eq!(
            trace(&schedule),
            vec![
                ("A", 0),
                ("B", 0),
                ("B", 0),
                ("B", 0),
                ("A", 1),
                ("B", 1),
                ("A", 2),
                ("A", 2),
            ]
        );
        let names: Vec<&str> = schedule.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn uniform_demotion_matches_round_robin() {
        let processes = scenarios::scenario("1").unwrap();
        assert_eq!(
            MultiLevelFeedbackQueue.schedule(&processes).results,
            RoundRobinScheduler.schedule(&processes).results
        );
    }
}
