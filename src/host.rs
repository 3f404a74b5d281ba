//! Host driver
//!
//! Drives one interpreter the way an embedding application does: once per
//! tick it feeds the elapsed time and calls `step()` until the per-tick budget
//! is spent, the script sleeps, or it finishes.

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::HostConfig;
use crate::executor::{Fault, Output, State, VM};

/// How a hosted script ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// `EXIT()` was called
    Exited,
    Failed(Fault),
    /// The host stopped it (Ctrl-C)
    Interrupted,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed | Outcome::Exited)
    }
}

pub struct Host {
    vm: VM,
    config: HostConfig,
    /// Advance virtual time by one tick period instead of waiting
    simulate: bool,
    ticks: u64,
}

impl Host {
    pub fn new(vm: VM, config: HostConfig) -> Self {
        Host {
            vm,
            config,
            simulate: false,
            ticks: 0,
        }
    }

    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    pub fn vm(&self) -> &VM {
        &self.vm
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.tick_rate_hz.max(1) as f64)
    }

    /// Run one tick; returns whether the script is still running
    pub fn tick(&mut self, delta_seconds: f64) -> bool {
        self.ticks += 1;
        self.vm.advance_time(delta_seconds);

        for _ in 0..self.config.steps_per_tick.max(1) {
            if !self.vm.step() {
                return false;
            }
            if self.vm.state() == State::Sleeping {
                break;
            }
        }
        true
    }

    /// Tick until the script ends or Ctrl-C is pressed
    pub async fn run(&mut self) -> Outcome {
        let period = self.period();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        info!(
            tick_rate_hz = self.config.tick_rate_hz,
            steps_per_tick = self.config.steps_per_tick,
            simulate = self.simulate,
            "Running script"
        );

        let mut last = Instant::now();
        loop {
            let delta = if self.simulate {
                tokio::select! {
                    _ = &mut ctrl_c => return self.interrupt(),
                    _ = tokio::task::yield_now() => {}
                }
                period.as_secs_f64()
            } else {
                tokio::select! {
                    _ = &mut ctrl_c => return self.interrupt(),
                    _ = interval.tick() => {}
                }
                let now = Instant::now();
                let delta = now.duration_since(last).as_secs_f64();
                last = now;
                delta
            };

            if !self.tick(delta) {
                info!(ticks = self.ticks, elapsed = self.vm.elapsed(), "Script finished");
                return self.outcome();
            }
        }
    }

    fn interrupt(&mut self) -> Outcome {
        debug!(ticks = self.ticks, "Interrupted");
        self.vm.destroy();
        Outcome::Interrupted
    }

    /// Outcome of a script that is no longer running
    pub fn outcome(&self) -> Outcome {
        match self.vm.last_fault() {
            None => Outcome::Completed,
            Some(Fault::Exit) => Outcome::Exited,
            Some(fault) => Outcome::Failed(fault.clone()),
        }
    }
}

/* ===================== Stdout sink ===================== */

/// Output that streams to stdout with the same line semantics as a
/// transcript: `print` starts a new line, `append` continues the open one
///
/// The returned closure terminates the last open line.
pub fn stdout_output() -> (Output, impl FnOnce()) {
    let open = Rc::new(Cell::new(false));

    let print_open = Rc::clone(&open);
    let print = move |text: &str| {
        let mut out = std::io::stdout().lock();
        if print_open.replace(true) {
            out.write_all(b"\n").ok();
        }
        out.write_all(text.as_bytes()).ok();
        out.flush().ok();
    };

    let append_open = Rc::clone(&open);
    let append = move |text: &str| {
        let mut out = std::io::stdout().lock();
        append_open.set(true);
        out.write_all(text.as_bytes()).ok();
        out.flush().ok();
    };

    let finish = move || {
        if open.get() {
            println!();
        }
    };

    (Output::new(print, append), finish)
}
