use std::time::Duration;

use tokio::time::Instant;

// Stopped is terminal and only reached on shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Armed { due_at: Instant },
    Stopped,
}

#[derive(Debug, Clone)]
pub struct PollSchedule {
    interval: Duration,
    state: PollState,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        return PollSchedule {
            interval,
            state: PollState::Idle,
        };
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn start(&mut self, now: Instant) {
        if self.state == PollState::Idle {
            self.state = PollState::Armed {
                due_at: now + self.interval,
            };
        }
    }

    pub fn due_at(&self) -> Option<Instant> {
        match self.state {
            PollState::Armed { due_at } => Some(due_at),
            _ => None,
        }
    }

    // Rearms relative to the firing instant, not the previous deadline, so a
    // slow read cannot stall the cadence. True means the caller owes one poll.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.state {
            PollState::Armed { due_at } if now >= due_at => {
                self.state = PollState::Armed {
                    due_at: now + self.interval,
                };
                return true;
            }
            _ => return false,
        }
    }

    pub fn stop(&mut self) {
        self.state = PollState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn test_start_arms_one_interval_out() {
        let mut schedule = PollSchedule::new(INTERVAL);
        assert_eq!(schedule.state(), PollState::Idle);
        assert_eq!(schedule.due_at(), None);

        let now = Instant::now();
        schedule.start(now);

        assert_eq!(schedule.due_at(), Some(now + INTERVAL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_keeps_first_deadline() {
        let mut schedule = PollSchedule::new(INTERVAL);
        let now = Instant::now();
        schedule.start(now);
        schedule.start(now + Duration::from_millis(700));

        assert_eq!(schedule.due_at(), Some(now + INTERVAL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_before_deadline_changes_nothing() {
        let mut schedule = PollSchedule::new(INTERVAL);
        let now = Instant::now();
        schedule.start(now);

        assert!(!schedule.fire(now + Duration::from_millis(999)));
        assert_eq!(schedule.due_at(), Some(now + INTERVAL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_rearms_relative_to_firing_instant() {
        let mut schedule = PollSchedule::new(INTERVAL);
        let now = Instant::now();
        schedule.start(now);

        // Fired late: the next deadline slides with the firing instant.
        let late = now + Duration::from_millis(1300);
        assert!(schedule.fire(late));
        assert_eq!(schedule.due_at(), Some(late + INTERVAL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_fires_track_the_cadence() {
        let mut schedule = PollSchedule::new(INTERVAL);
        let now = Instant::now();
        schedule.start(now);

        let mut fired = 0;
        let mut at = now;
        for _ in 0..5 {
            at += INTERVAL;
            if schedule.fire(at) {
                fired += 1;
            }
        }

        assert_eq!(fired, 5);
        assert_eq!(schedule.due_at(), Some(at + INTERVAL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_terminal() {
        let mut schedule = PollSchedule::new(INTERVAL);
        let now = Instant::now();
        schedule.start(now);
        schedule.stop();

        assert_eq!(schedule.state(), PollState::Stopped);
        assert_eq!(schedule.due_at(), None);
        assert!(!schedule.fire(now + INTERVAL));

        schedule.start(now + INTERVAL);
        assert_eq!(schedule.state(), PollState::Stopped);
    }
}
