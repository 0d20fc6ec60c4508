//! The `Engine` event loop and the `Simulation` that pairs it with a network.
//!
//! # Event loop
//!
//! ```text
//! Idle ──simulate──▶ Running ──queue empty or next time > end_time──▶ Complete
//!
//! while let Some(t) = queue.peek_time():
//!   if t > end_time: break
//!   (t, owner) = queue.pop()        // clock advances to t
//!   network.execute(owner, &mut dispatch)
//! ```
//!
//! Every station and generator schedules through a short-lived `Dispatch`
//! that wraps the queue and the observer, so the network never holds a
//! reference back into the engine.

use std::fmt;

use qn_core::{SimConfig, SimTime};
use qn_network::{EventOwner, Network, Scheduler, TraceEvent};
use serde::Serialize;
use tracing::{info, trace};

use crate::queue::EventQueue;
use crate::{RunSummary, SimError, SimObserver, SimResult};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub enum EngineState {
    /// Configured but not yet run; the horizon may still change.
    Idle,
    Running,
    /// The horizon was reached or no events remain.  An engine runs once.
    Complete,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineState::Idle     => "idle",
            EngineState::Running  => "running",
            EngineState::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Scheduler handed to the network for the duration of one callback.
struct Dispatch<'a, O: SimObserver> {
    queue:    &'a mut EventQueue,
    observer: &'a mut O,
}

impl<O: SimObserver> Scheduler for Dispatch<'_, O> {
    fn now(&self) -> SimTime {
        self.queue.now()
    }

    fn schedule(&mut self, owner: EventOwner, delay: f64) {
        self.queue.schedule_in(owner, delay);
    }

    fn trace(&mut self, event: TraceEvent) {
        self.observer.on_trace(&event);
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Owns the pending-event queue, the clock, and the horizon.
pub struct Engine {
    state:    EngineState,
    end_time: SimTime,
    queue:    EventQueue,
    executed: u64,
}

impl Engine {
    /// # Errors
    /// `InvalidParameter` if `end_time` is negative or not finite.
    pub fn new(end_time: f64) -> SimResult<Self> {
        let mut engine = Self {
            state:    EngineState::Idle,
            end_time: SimTime::ZERO,
            queue:    EventQueue::new(),
            executed: 0,
        };
        engine.set_end_time(end_time)?;
        Ok(engine)
    }

    /// Change the horizon.  Events scheduled strictly after it never run.
    ///
    /// # Errors
    /// `InvalidState` unless the engine is `Idle`; `InvalidParameter` for a
    /// negative or non-finite time.
    pub fn set_end_time(&mut self, end_time: f64) -> SimResult<()> {
        if self.state != EngineState::Idle {
            return Err(SimError::InvalidState {
                operation: "set end time",
                state:     self.state,
            });
        }
        SimConfig::new(end_time, None).validate()?;
        self.end_time = SimTime(end_time);
        Ok(())
    }

    /// Schedule `owner` to run `delay` time units from now.
    ///
    /// # Errors
    /// `InvalidState` once the run is `Complete`.
    pub fn notify(&mut self, owner: EventOwner, delay: f64) -> SimResult<SimTime> {
        if self.state == EngineState::Complete {
            return Err(SimError::InvalidState {
                operation: "schedule an event",
                state:     self.state,
            });
        }
        Ok(self.queue.schedule_in(owner, delay))
    }

    /// Drive `network` until the horizon, calling `observer` along the way.
    ///
    /// The engine ends in `Complete` whether the run succeeds or fails; jobs
    /// still in backlogs or in service are left in place and counted as
    /// unfinished in the returned summary.
    ///
    /// # Errors
    /// `InvalidState` if the engine has already run; any network error
    /// raised while executing an event (fatal for the run).
    pub fn simulate<O: SimObserver>(
        &mut self,
        network:  &mut Network,
        observer: &mut O,
    ) -> SimResult<RunSummary> {
        if self.state != EngineState::Idle {
            return Err(SimError::InvalidState {
                operation: "simulate",
                state:     self.state,
            });
        }
        self.state = EngineState::Running;
        info!(
            end_time = self.end_time.as_f64(),
            seed = network.seed(),
            "simulation started"
        );
        observer.on_sim_start(network, self.end_time);

        let outcome = self.run_events(network, observer);
        self.state = EngineState::Complete;
        outcome?;

        let summary = RunSummary::collect(network, self.end_time, self.queue.now(), self.executed);
        info!(
            events = self.executed,
            final_time = self.queue.now().as_f64(),
            pending = self.queue.len(),
            "simulation complete"
        );
        observer.on_sim_end(network, &summary);
        Ok(summary)
    }

    fn run_events<O: SimObserver>(&mut self, network: &mut Network, observer: &mut O) -> SimResult<()> {
        network.initialize(&mut Dispatch { queue: &mut self.queue, observer: &mut *observer })?;

        while let Some(next) = self.queue.peek_time() {
            if next > self.end_time {
                break;
            }
            let Some((time, owner)) = self.queue.pop() else {
                break;
            };
            self.executed += 1;
            trace!(time = time.as_f64(), %owner, "dispatch");
            observer.on_event(time, owner);
            network.execute(owner, &mut Dispatch { queue: &mut self.queue, observer: &mut *observer })?;
        }
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn end_time(&self) -> SimTime {
        self.end_time
    }

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn events_executed(&self) -> u64 {
        self.executed
    }

    /// Events still queued (all later than the horizon once `Complete`).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One run: an engine and the network it drives.
///
/// Create via [`SimBuilder`][crate::SimBuilder] or
/// [`TopologyConfig::build`][crate::TopologyConfig::build].
pub struct Simulation {
    engine:  Engine,
    network: Network,
}

impl Simulation {
    pub fn new(network: Network, end_time: f64) -> SimResult<Self> {
        Ok(Self {
            engine: Engine::new(end_time)?,
            network,
        })
    }

    /// Run to the horizon.  See [`Engine::simulate`].
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        self.engine.simulate(&mut self.network, observer)
    }

    pub fn set_end_time(&mut self, end_time: f64) -> SimResult<()> {
        self.engine.set_end_time(end_time)
    }

    /// Reseed every stream.  Only meaningful before the run.
    ///
    /// # Errors
    /// `InvalidState` unless the engine is `Idle`.
    pub fn set_seed(&mut self, seed: u64) -> SimResult<()> {
        if self.engine.state() != EngineState::Idle {
            return Err(SimError::InvalidState {
                operation: "reseed",
                state:     self.engine.state(),
            });
        }
        self.network.reseed(seed);
        Ok(())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}
