//! Fire-and-forget timers on active game time
//!
//! Each timer is tagged with the session it was scheduled in. A restart starts
//! a new session, and timers left over from the old one are dropped unfired
//! when they come due.

use serde::{Deserialize, Serialize};

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Start fading the level banner for `level`
    FadeBanner { level: u32 },
    /// Remove the level banner for `level`
    DismissBanner { level: u32 },
    /// End the player's red hit flash
    ClearHitFlash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    session: u32,
    due_ms: f64,
    kind: TimerKind,
}

/// Pending timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, session: u32, now_ms: f64, delay_ms: f64, kind: TimerKind) {
        self.pending.push(Timer {
            session,
            due_ms: now_ms + delay_ms,
            kind,
        });
    }

    /// Remove and return timers due at `now_ms`, oldest first
    ///
    /// Due timers from other sessions are discarded.
    pub fn take_due(&mut self, session: u32, now_ms: f64) -> Vec<TimerKind> {
        let mut due: Vec<Timer> = Vec::new();
        self.pending.retain(|t| {
            if t.due_ms <= now_ms {
                due.push(t.clone());
                false
            } else {
                true
            }
        });

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter()
            .filter(|t| {
                let current = t.session == session;
                if !current {
                    log::debug!("Dropping stale {:?} from session {}", t.kind, t.session);
                }
                current
            })
            .map(|t| t.kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule(1, 0.0, 2000.0, TimerKind::DismissBanner { level: 2 });
        timers.schedule(1, 0.0, 200.0, TimerKind::ClearHitFlash);
        timers.schedule(1, 0.0, 1500.0, TimerKind::FadeBanner { level: 2 });

        assert!(timers.take_due(1, 100.0).is_empty());
        assert_eq!(timers.take_due(1, 200.0), vec![TimerKind::ClearHitFlash]);
        assert_eq!(
            timers.take_due(1, 5000.0),
            vec![
                TimerKind::FadeBanner { level: 2 },
                TimerKind::DismissBanner { level: 2 }
            ]
        );
        assert!(timers.is_empty());
    }

    #[test]
    fn test_stale_session_is_noop() {
        let mut timers = Timers::new();
        timers.schedule(1, 0.0, 200.0, TimerKind::ClearHitFlash);
        timers.schedule(2, 0.0, 300.0, TimerKind::ClearHitFlash);

        assert!(timers.take_due(2, 250.0).is_empty());
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.take_due(2, 300.0), vec![TimerKind::ClearHitFlash]);
    }
}
