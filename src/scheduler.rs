use tracing::debug;

/// What the field needs from whatever drives its frames.
pub trait FrameHost {
    /// Asks for another tick as soon as the host can deliver one.
    fn request_tick(&mut self);

    /// Withdraws an outstanding tick request.
    fn cancel(&mut self);

    fn is_visible(&self) -> bool;

    fn prefers_reduced_motion(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Paused,
    Stopped,
}

/// Gates ticks on host visibility and keeps at most one request pending.
#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    pending: bool,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Running,
            pending: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn has_pending_tick(&self) -> bool {
        self.pending
    }

    /// Follows the host's visibility. Returns the state after the check.
    pub fn observe(&mut self, host: &mut impl FrameHost) -> SchedulerState {
        match (self.state, host.is_visible()) {
            (SchedulerState::Running, false) => {
                debug!("field hidden, pausing ticks");
                if self.pending {
                    host.cancel();
                    self.pending = false;
                }
                self.state = SchedulerState::Paused;
            }
            (SchedulerState::Paused, true) => {
                debug!("field visible again, resuming ticks");
                self.state = SchedulerState::Running;
            }
            _ => {}
        }
        self.state
    }

    /// Consumes the pending request. `false` means the tick must not run.
    pub fn begin_tick(&mut self, host: &mut impl FrameHost) -> bool {
        self.pending = false;
        self.observe(host) == SchedulerState::Running
    }

    /// Requests the next tick when the animation keeps going.
    pub fn finish_tick(&mut self, host: &mut impl FrameHost, continuous: bool) {
        if self.state == SchedulerState::Running && continuous && !self.pending {
            host.request_tick();
            self.pending = true;
        }
    }

    pub fn teardown(&mut self, host: &mut impl FrameHost) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        if self.pending {
            host.cancel();
            self.pending = false;
        }
        debug!(from = ?self.state, "frame scheduler stopped");
        self.state = SchedulerState::Stopped;
    }
}
