use crate::{Generation, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    Active {
        job_id: JobId,
        in_flight: bool,
    },
    Terminal {
        job_id: JobId,
    },
    Cancelled {
        job_id: JobId,
    },
}

/// Outcome of a timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickDecision {
    /// Issue a status request for this job.
    Fetch(JobId),
    /// The previous request has not resolved yet; skip this tick.
    Busy,
    /// The tick belongs to a poller that is no longer current.
    Stale,
}

/// Returned by [`JobPoller::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollStart {
    pub generation: Generation,
    /// Generation of an active poller that was cancelled to make room.
    pub superseded: Option<Generation>,
}

/// Status poller for a single job at a time.
///
/// The poller never performs IO. It decides whether a tick should turn into
/// a request and whether a response may still be applied. Every start and
/// cancel bumps `generation`, so results tagged with an older generation are
/// rejected by [`JobPoller::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobPoller {
    generation: Generation,
    phase: PollPhase,
}

impl JobPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn phase(&self) -> &PollPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, PollPhase::Active { .. })
    }

    pub fn active_job(&self) -> Option<&str> {
        match &self.phase {
            PollPhase::Active { job_id, .. } => Some(job_id),
            _ => None,
        }
    }

    pub fn start(&mut self, job_id: JobId) -> PollStart {
        let superseded = self.cancel();
        self.generation += 1;
        self.phase = PollPhase::Active {
            job_id,
            in_flight: false,
        };
        PollStart {
            generation: self.generation,
            superseded,
        }
    }

    /// Cancels an active poller. Returns the generation whose timer must be
    /// stopped, or `None` if nothing was active.
    pub fn cancel(&mut self) -> Option<Generation> {
        let PollPhase::Active { job_id, .. } = &self.phase else {
            return None;
        };
        let job_id = job_id.clone();
        let cancelled = self.generation;
        self.generation += 1;
        self.phase = PollPhase::Cancelled { job_id };
        Some(cancelled)
    }

    pub fn tick(&mut self, generation: Generation) -> TickDecision {
        if generation != self.generation {
            return TickDecision::Stale;
        }
        match &mut self.phase {
            PollPhase::Active { in_flight: true, .. } => TickDecision::Busy,
            PollPhase::Active { job_id, in_flight } => {
                *in_flight = true;
                TickDecision::Fetch(job_id.clone())
            }
            _ => TickDecision::Stale,
        }
    }

    /// Accepts a response for `(generation, job_id)` if it belongs to the
    /// current active poller, clearing the in-flight flag.
    pub fn resolve(&mut self, generation: Generation, job_id: &str) -> bool {
        if generation != self.generation {
            return false;
        }
        match &mut self.phase {
            PollPhase::Active {
                job_id: active,
                in_flight,
            } if active == job_id => {
                *in_flight = false;
                true
            }
            _ => false,
        }
    }

    /// Moves an active poller to Terminal. Returns the generation whose
    /// timer must be stopped; `None` if the poller was not active.
    pub fn finish(&mut self) -> Option<Generation> {
        let PollPhase::Active { job_id, .. } = &self.phase else {
            return None;
        };
        let job_id = job_id.clone();
        self.phase = PollPhase::Terminal { job_id };
        Some(self.generation)
    }
}
