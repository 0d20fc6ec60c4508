//! `Generator`: a Poisson arrival source feeding one entry station.

use qn_core::{
    CoreError, ExponentialVariate, Job, JobId, SimTime, SourceId, StationId, Stream, Variate, derive_seed,
};

use crate::{EventOwner, NetworkError, NetworkResult, Scheduler};

/// Emits jobs at exponentially distributed intervals.
///
/// A generator never stops on its own: it reschedules itself after every
/// arrival and runs until the engine stops driving events.
pub struct Generator {
    id:           SourceId,
    name:         String,
    entry:        Option<StationId>,
    interarrival: ExponentialVariate,
    generated:    u64,
}

impl Generator {
    /// # Errors
    /// `InvalidParameter` if `arrival_rate` is not positive.
    pub fn new(id: SourceId, name: impl Into<String>, arrival_rate: f64, seed: u64) -> NetworkResult<Self> {
        let name = name.into();
        let interarrival =
            ExponentialVariate::new(arrival_rate, derive_seed(seed, Stream::Arrivals(id)))
                .map_err(|_| CoreError::invalid("arrival_rate", arrival_rate, name.clone()))?;
        Ok(Self {
            id,
            name,
            entry: None,
            interarrival,
            generated: 0,
        })
    }

    /// Send generated jobs to `station`.
    pub fn set_entry_station(&mut self, station: StationId) {
        self.entry = Some(station);
    }

    pub fn set_random_seed(&mut self, seed: u64) {
        self.interarrival.set_seed(derive_seed(seed, Stream::Arrivals(self.id)));
    }

    /// Schedule the first arrival.
    ///
    /// # Errors
    /// `NoEntryStation` if no entry station was configured.
    pub fn initialize(&mut self, scheduler: &mut dyn Scheduler) -> NetworkResult<()> {
        self.entry_station()?;
        self.schedule_next(scheduler);
        Ok(())
    }

    /// Draw the next inter-arrival time and reschedule.
    pub fn schedule_next(&mut self, scheduler: &mut dyn Scheduler) {
        let delay = self.interarrival.next_variate();
        scheduler.schedule(EventOwner::Source(self.id), delay);
    }

    /// Create the job for the arrival firing now, returning it with the
    /// station it must be handed to.
    pub fn emit(&mut self, job: JobId, now: SimTime) -> NetworkResult<(Job, StationId)> {
        let entry = self.entry_station()?;
        self.generated += 1;
        Ok((Job::new(job, self.id, now), entry))
    }

    fn entry_station(&self) -> NetworkResult<StationId> {
        self.entry
            .ok_or_else(|| NetworkError::NoEntryStation { generator: self.name.clone() })
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> Option<StationId> {
        self.entry
    }

    pub fn arrival_rate(&self) -> f64 {
        self.interarrival.rate()
    }

    /// Jobs emitted so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }
}
