//! The built-in workloads. Every call builds a fresh, independent process set.

use super::{IoEvent, Process, SimError};

pub const IDS: [&str; 4] = ["1", "2", "3", "4"];

pub fn scenario(id: &str) -> Result<Vec<Process>, SimError> {
    match id.trim() {
        "1" => cpu_bound(&[("A", 10.0), ("B", 15.0), ("C", 20.0)]),
        "2" => cpu_bound(&[
            ("A", 5.0),
            ("B", 10.0),
            ("C", 4.0),
            ("D", 2.0),
            ("E", 3.0),
            ("F", 15.0),
        ]),
        "3" => Ok(vec![
            Process::with_io("A", 5.0, vec![IoEvent::new(1.0, 0.5), IoEvent::new(3.0, 0.7)])?,
            Process::with_io("B", 5.0, vec![IoEvent::new(2.0, 0.4)])?,
            Process::with_io("C", 5.0, vec![IoEvent::new(0.5, 0.2), IoEvent::new(2.5, 1.0)])?,
        ]),
        "4" => Ok(vec![
            Process::with_io("A", 6.0, vec![IoEvent::new(1.2, 0.6), IoEvent::new(4.0, 0.8)])?,
            Process::with_io("B", 6.0, vec![IoEvent::new(3.5, 0.5)])?,
            Process::with_io(
                "C",
                6.0,
                vec![
                    IoEvent::new(0.8, 0.3),
                    IoEvent::new(2.0, 0.4),
                    IoEvent::new(4.5, 0.6),
                ],
            )?,
        ]),
        _ => Err(SimError::UnknownScenario(id.to_owned())),
    }
}

fn cpu_bound(demands: &[(&str, f64)]) -> Result<Vec<Process>, SimError> {
    demands
        .iter()
        .map(|&(name, total_cpu)| Process::new(name, total_cpu))
        .collect()
}
