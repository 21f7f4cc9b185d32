//! Cooperative termination policies, polled between solver steps rather than
//! preempting them: once per pivot inside [`crate::simplex::SimplexSolver`],
//! once per node inside [`crate::mip`]'s branch-and-bound loop.
//!
//! - [`TimeOutTerminator`] fires once a wall-clock budget has elapsed.
//! - [`InterruptTerminator`] fires on Ctrl-C (SIGINT) or a programmatic call
//!   to [`InterruptTerminator::interrupt`].
//! - [`MultipleTerminators`] combines any number of the above, firing as soon
//!   as one of them does.
//!
//! `InterruptTerminator::new` installs a process-global signal handler and
//! panics if called more than once per process.

use std::sync::{Arc, atomic::AtomicBool};

use crate::Status;

/// A cooperative stopping condition, checked between solver steps.
pub trait Terminator {
    /// Called once, before the first check, to reset any internal clock.
    fn initialize(&mut self) {}

    /// Returns `Some(status)` if the solve should stop now.
    fn terminate(&mut self) -> Option<Status>;
}

/// Fires once on Ctrl-C (SIGINT) or a direct call to [`interrupt`](Self::interrupt).
pub struct InterruptTerminator {
    interrupted: Arc<AtomicBool>,
}

impl InterruptTerminator {
    /// Installs the process's Ctrl-C handler. Panics if one is already installed.
    pub fn new() -> Self {
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();
        ctrlc::set_handler(move || {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
        })
        .expect("a Ctrl-C handler is already installed for this process");
        Self { interrupted }
    }

    /// Requests termination programmatically, without waiting for a signal.
    pub fn interrupt(&mut self) {
        self.interrupted.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Terminator for InterruptTerminator {
    fn terminate(&mut self) -> Option<Status> {
        if self.interrupted.load(std::sync::atomic::Ordering::SeqCst) {
            Some(Status::Interrupted)
        } else {
            None
        }
    }
}

/// Fires once `max_time_secs` have elapsed since [`initialize`](Terminator::initialize)
/// was last called.
pub struct TimeOutTerminator {
    max_time_secs: u64,
    start_time: std::time::Instant,
}

impl TimeOutTerminator {
    pub fn new(max_time_secs: u64) -> Self {
        Self { max_time_secs, start_time: std::time::Instant::now() }
    }
}

impl Terminator for TimeOutTerminator {
    fn initialize(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    fn terminate(&mut self) -> Option<Status> {
        if self.start_time.elapsed().as_secs() >= self.max_time_secs {
            Some(Status::TimeLimit)
        } else {
            None
        }
    }
}

/// Fires as soon as any of its constituent terminators does.
pub struct MultipleTerminators {
    terminators: Vec<Box<dyn Terminator>>,
}

impl MultipleTerminators {
    pub fn new(terminators: Vec<Box<dyn Terminator>>) -> Self {
        Self { terminators }
    }
}

impl Terminator for MultipleTerminators {
    fn initialize(&mut self) {
        for terminator in &mut self.terminators {
            terminator.initialize();
        }
    }

    fn terminate(&mut self) -> Option<Status> {
        for terminator in &mut self.terminators {
            if let Some(status) = terminator.as_mut().terminate() {
                return Some(status);
            }
        }
        None
    }
}
