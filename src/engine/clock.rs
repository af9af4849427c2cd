use crate::engine::state::Phase;

/// Seconds a team gets per turn unless overridden at startup.
pub const TURN_SECONDS: u64 = 30;

/// Identity of one turn. The countdown re-arms whenever this changes, so a
/// confirm (or an advance to the next match) anywhere in the system resets
/// the timer for everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnKey {
    pub match_number: usize,
    pub turn: usize,
    pub phase: Phase,
}

/// Per-turn countdown with a fire-once latch.
///
/// The clock never touches draft state. The single authority observer feeds
/// it the current turn identity and steps it once per second; `tick`
/// returning `true` is the one-shot signal to resolve the timeout (which the
/// caller must do asynchronously, not inside the tick loop). Every other
/// observer just displays the remaining time it is told about.
#[derive(Debug)]
pub struct TurnClock {
    duration: u64,
    key: Option<TurnKey>,
    remaining: u64,
    fired: bool,
}

impl TurnClock {
    pub fn new(duration: u64) -> Self {
        Self {
            duration,
            key: None,
            remaining: duration,
            fired: false,
        }
    }

    /// Tell the clock which turn is live. A changed identity resets the
    /// countdown and clears the latch; the same identity is a no-op.
    pub fn observe(&mut self, key: TurnKey) {
        if self.key != Some(key) {
            self.key = Some(key);
            self.remaining = self.duration;
            self.fired = false;
        }
    }

    /// Stop counting until a turn is observed again (between matches, or
    /// once the draft is over).
    pub fn disarm(&mut self) {
        self.key = None;
        self.remaining = self.duration;
        self.fired = false;
    }

    /// One countdown step. Returns `true` exactly once per turn identity,
    /// when the countdown reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.key.is_none() || self.fired {
            return false;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(turn: usize, phase: Phase) -> TurnKey {
        TurnKey {
            match_number: 1,
            turn,
            phase,
        }
    }

    #[test]
    fn fires_once_at_zero_and_latches() {
        let mut clock = TurnClock::new(3);
        clock.observe(key(0, Phase::Ban));
        assert!(!clock.tick());
        assert!(!clock.tick());
        assert!(clock.tick());
        // Latched: no second fire for the same turn.
        assert!(!clock.tick());
        assert!(!clock.tick());
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn identity_change_resets_countdown_and_latch() {
        let mut clock = TurnClock::new(2);
        clock.observe(key(0, Phase::Ban));
        assert!(!clock.tick());
        assert!(clock.tick());

        clock.observe(key(1, Phase::Ban));
        assert_eq!(clock.remaining(), 2);
        assert!(!clock.tick());
        assert!(clock.tick());
    }

    #[test]
    fn same_turn_number_in_a_new_phase_is_a_new_identity() {
        let mut clock = TurnClock::new(1);
        clock.observe(key(0, Phase::Ban));
        assert!(clock.tick());
        // Turn 0 again, but in the pick phase.
        clock.observe(key(0, Phase::Pick));
        assert!(clock.tick());
    }

    #[test]
    fn reobserving_the_same_turn_does_not_reset() {
        let mut clock = TurnClock::new(5);
        clock.observe(key(2, Phase::Pick));
        clock.tick();
        clock.tick();
        clock.observe(key(2, Phase::Pick));
        assert_eq!(clock.remaining(), 3);
    }

    #[test]
    fn disarmed_clock_never_fires() {
        let mut clock = TurnClock::new(1);
        assert!(!clock.tick());
        clock.observe(key(0, Phase::Ban));
        clock.disarm();
        assert!(!clock.tick());
        assert_eq!(clock.remaining(), 1);
    }

    /// The authority drives the clock from a 1s interval; under paused time
    /// the timeout must land exactly once after the full duration.
    #[tokio::test(start_paused = true)]
    async fn interval_driver_fires_after_the_full_duration() {
        let mut clock = TurnClock::new(TURN_SECONDS);
        clock.observe(key(0, Phase::Pick));
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
        ticker.tick().await; // first tick is immediate

        let mut fired = 0;
        for i in 1..=TURN_SECONDS + 5 {
            ticker.tick().await;
            if clock.tick() {
                fired += 1;
                assert_eq!(i, TURN_SECONDS);
            }
        }
        assert_eq!(fired, 1);
    }
}
