//! Deterministic simulation of CPU scheduling policies.
//!
//! Four policies share one CPU-step function: FIFO, non-preemptive shortest
//! job first, round robin and a three-level feedback queue. All processes
//! arrive at time zero and every timestamp is computed, never measured.
//!
//! ```
//! use scheduling_simulator::scheduler::{scenarios, Algorithm};
//!
//! let processes = scenarios::scenario("1").unwrap();
//! let schedule = Algorithm::Fifo.schedule(&processes);
//! assert_eq!(schedule.results[2].elapsed, 45.0);
//! ```

pub mod scheduler;
