use serde::{Deserialize, Serialize};

use crate::util::time::{day_index, format_duration};

/// Wall-clock session timer that can be paused
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionClock {
    started_at: Option<f64>,
    /// Time accumulated before the current run
    banked: f64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: f64) {
        self.banked = 0.0;
        self.started_at = Some(now);
    }

    pub fn pause(&mut self, now: f64) {
        if let Some(started) = self.started_at.take() {
            self.banked += (now - started).max(0.0);
        }
    }

    pub fn resume(&mut self, now: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        self.banked + self.started_at.map_or(0.0, |s| (now - s).max(0.0))
    }

    pub fn formatted(&self, now: f64) -> String {
        format_duration(self.elapsed(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
    HoldOut,
}

impl BreathPhase {
    pub fn instruction(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Breathe in",
            BreathPhase::Hold => "Hold",
            BreathPhase::Exhale => "Breathe out",
            BreathPhase::HoldOut => "Rest",
        }
    }
}

/// Where in the cycle a breathing exercise is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathState {
    pub phase: BreathPhase,
    /// Progress through the current phase, in [0, 1]
    pub progress: f32,
    /// Size of the guide circle relative to its maximum, in [0.5, 1]
    pub scale: f32,
    pub seconds_left: f32,
}

pub const MIN_BREATH_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreathingPattern {
    /// 4-4-4-4
    #[default]
    Box,
    /// 4-7-8
    Relaxing,
    /// 5-5
    Coherent,
}

impl BreathingPattern {
    pub const ALL: [BreathingPattern; 3] = [
        BreathingPattern::Box,
        BreathingPattern::Relaxing,
        BreathingPattern::Coherent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BreathingPattern::Box => "Box (4-4-4-4)",
            BreathingPattern::Relaxing => "Relaxing (4-7-8)",
            BreathingPattern::Coherent => "Coherent (5-5)",
        }
    }

    /// Phases with their durations in seconds; zero-length phases are omitted
    pub fn phases(self) -> &'static [(BreathPhase, f32)] {
        match self {
            BreathingPattern::Box => &[
                (BreathPhase::Inhale, 4.0),
                (BreathPhase::Hold, 4.0),
                (BreathPhase::Exhale, 4.0),
                (BreathPhase::HoldOut, 4.0),
            ],
            BreathingPattern::Relaxing => &[
                (BreathPhase::Inhale, 4.0),
                (BreathPhase::Hold, 7.0),
                (BreathPhase::Exhale, 8.0),
            ],
            BreathingPattern::Coherent => &[(BreathPhase::Inhale, 5.0), (BreathPhase::Exhale, 5.0)],
        }
    }

    pub fn cycle_secs(self) -> f32 {
        self.phases().iter().map(|(_, secs)| secs).sum()
    }

    pub fn phase_at(self, elapsed: f64) -> BreathState {
        let cycle = self.cycle_secs();
        let mut t = (elapsed.max(0.0) % f64::from(cycle)) as f32;
        for &(phase, duration) in self.phases() {
            if t < duration {
                let progress = (t / duration).clamp(0.0, 1.0);
                let fullness = match phase {
                    BreathPhase::Inhale => progress,
                    BreathPhase::Hold => 1.0,
                    BreathPhase::Exhale => 1.0 - progress,
                    BreathPhase::HoldOut => 0.0,
                };
                return BreathState {
                    phase,
                    progress,
                    scale: MIN_BREATH_SCALE + (1.0 - MIN_BREATH_SCALE) * fullness,
                    seconds_left: duration - t,
                };
            }
            t -= duration;
        }
        // Only reachable through float rounding at the very end of a cycle
        BreathState {
            phase: BreathPhase::Inhale,
            progress: 0.0,
            scale: MIN_BREATH_SCALE,
            seconds_left: self.phases()[0].1,
        }
    }
}

pub const DEFAULT_BREAK_INTERVAL_SECS: f64 = 20.0 * 60.0;

/// Nudges the user to rest after a stretch of drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakReminder {
    pub interval_secs: f64,
    pub last_break: f64,
    snoozed_until: Option<f64>,
}

impl BreakReminder {
    pub fn new(interval_secs: f64, now: f64) -> Self {
        Self {
            interval_secs,
            last_break: now,
            snoozed_until: None,
        }
    }

    /// A non-positive interval disables the reminder
    pub fn due(&self, now: f64) -> bool {
        if self.interval_secs <= 0.0 {
            return false;
        }
        if let Some(until) = self.snoozed_until {
            return now >= until;
        }
        now - self.last_break >= self.interval_secs
    }

    pub fn acknowledge(&mut self, now: f64) {
        self.last_break = now;
        self.snoozed_until = None;
    }

    pub fn snooze(&mut self, now: f64, secs: f64) {
        self.snoozed_until = Some(now + secs.max(0.0));
    }

    pub fn remaining(&self, now: f64) -> f64 {
        let target = self.snoozed_until.unwrap_or(self.last_break + self.interval_secs);
        (target - now).max(0.0)
    }
}

pub const AFFIRMATIONS: &[&str] = &[
    "Every line you draw is a moment of presence.",
    "There are no mistakes here, only new directions.",
    "Let your breath guide your hand.",
    "Notice the colors you are drawn to today.",
    "You are allowed to slow down.",
    "Create for the joy of it, not for the result.",
    "Feel the weight of your hand and let it rest.",
    "Small, gentle strokes are enough.",
    "Your attention is a gift to yourself.",
    "Let each shape be exactly what it is.",
];

pub const MINDFUL_PROMPTS: &[&str] = &[
    "Draw the shape of your breath.",
    "Fill the canvas with the color of your mood.",
    "Repeat one simple pattern until it feels calm.",
    "Draw something you are grateful for today.",
    "Let a single line wander without lifting your hand.",
    "Use only three colors and see where they lead.",
    "Draw a place where you feel safe.",
];

/// Same affirmation all day, a new one tomorrow
pub fn affirmation_for(timestamp: u64) -> &'static str {
    AFFIRMATIONS[(day_index(timestamp) % AFFIRMATIONS.len() as u64) as usize]
}

pub fn prompt_for(timestamp: u64) -> &'static str {
    MINDFUL_PROMPTS[(day_index(timestamp) % MINDFUL_PROMPTS.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::time::SECS_PER_DAY;

    #[test]
    fn paused_clock_holds_its_time() {
        let mut clock = SessionClock::new();
        clock.start(100.0);
        clock.pause(160.0);
        assert_eq!(clock.elapsed(1_000.0), 60.0);
        clock.resume(200.0);
        assert_eq!(clock.elapsed(230.0), 90.0);
        assert_eq!(clock.formatted(230.0), "01:30");
    }

    #[test]
    fn affirmation_changes_daily() {
        let today = 1_000 * SECS_PER_DAY;
        assert_eq!(affirmation_for(today), affirmation_for(today + 3_600));
        assert_ne!(affirmation_for(today), affirmation_for(today + SECS_PER_DAY));
    }

    #[test]
    fn box_breathing_walks_through_phases() {
        let pattern = BreathingPattern::Box;
        assert_eq!(pattern.cycle_secs(), 16.0);

        let inhale = pattern.phase_at(2.0);
        assert_eq!(inhale.phase, BreathPhase::Inhale);
        assert_eq!(inhale.progress, 0.5);
        assert_eq!(inhale.scale, 0.75);
        assert_eq!(inhale.seconds_left, 2.0);

        let hold = pattern.phase_at(5.0);
        assert_eq!((hold.phase, hold.scale), (BreathPhase::Hold, 1.0));
        let exhale = pattern.phase_at(10.0);
        assert_eq!((exhale.phase, exhale.scale), (BreathPhase::Exhale, 0.75));
        let rest = pattern.phase_at(14.0);
        assert_eq!((rest.phase, rest.scale), (BreathPhase::HoldOut, MIN_BREATH_SCALE));

        // Next cycle
        assert_eq!(pattern.phase_at(18.0), inhale);
    }

    #[test]
    fn breath_state_stays_in_range() {
        for pattern in BreathingPattern::ALL {
            for step in 0..400 {
                let state = pattern.phase_at(f64::from(step) * 0.1);
                assert!((0.0..=1.0).contains(&state.progress), "{pattern:?} {state:?}");
                assert!((MIN_BREATH_SCALE..=1.0).contains(&state.scale), "{pattern:?} {state:?}");
            }
        }
        assert_eq!(BreathingPattern::Relaxing.phase_at(11.5).phase, BreathPhase::Exhale);
        assert_eq!(BreathingPattern::Coherent.phase_at(-3.0).phase, BreathPhase::Inhale);
    }

    #[test]
    fn break_reminder_snooze_and_acknowledge() {
        let mut reminder = BreakReminder::new(60.0, 0.0);
        assert!(!reminder.due(59.0));
        assert!(reminder.due(60.0));

        reminder.snooze(60.0, 30.0);
        assert!(!reminder.due(70.0));
        assert_eq!(reminder.remaining(70.0), 20.0);
        assert!(reminder.due(90.0));

        reminder.acknowledge(90.0);
        assert!(!reminder.due(100.0));
        assert!(reminder.due(150.0));
        assert_eq!(reminder.remaining(200.0), 0.0);
    }

    #[test]
    fn zero_interval_never_reminds() {
        let reminder = BreakReminder::new(0.0, 0.0);
        assert!(!reminder.due(1e9));
    }
}
