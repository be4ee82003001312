use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::util::time::{day_index, SECS_PER_DAY};

pub const MIN_MOOD_VALUE: u8 = 1;
pub const MAX_MOOD_VALUE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mood {
    Calm,
    Happy,
    Grateful,
    Energized,
    Neutral,
    Tired,
    Anxious,
    Sad,
    Stressed,
}

impl Mood {
    pub const ALL: [Mood; 9] = [
        Mood::Calm,
        Mood::Happy,
        Mood::Grateful,
        Mood::Energized,
        Mood::Neutral,
        Mood::Tired,
        Mood::Anxious,
        Mood::Sad,
        Mood::Stressed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Calm => "Calm",
            Mood::Happy => "Happy",
            Mood::Grateful => "Grateful",
            Mood::Energized => "Energized",
            Mood::Neutral => "Neutral",
            Mood::Tired => "Tired",
            Mood::Anxious => "Anxious",
            Mood::Sad => "Sad",
            Mood::Stressed => "Stressed",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Calm => "😌",
            Mood::Happy => "😊",
            Mood::Grateful => "🙏",
            Mood::Energized => "⚡",
            Mood::Neutral => "😐",
            Mood::Tired => "😴",
            Mood::Anxious => "😟",
            Mood::Sad => "😢",
            Mood::Stressed => "😣",
        }
    }

    /// Value suggested when the user picks this mood without adjusting the slider
    pub fn default_value(self) -> u8 {
        match self {
            Mood::Happy | Mood::Grateful => 8,
            Mood::Calm | Mood::Energized => 7,
            Mood::Neutral => 5,
            Mood::Tired => 4,
            Mood::Anxious | Mood::Stressed => 3,
            Mood::Sad => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Seconds since the UNIX epoch
    pub timestamp: u64,
    pub mood: Mood,
    value: u8,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

impl MoodEntry {
    pub fn new(timestamp: u64, mood: Mood, value: u8) -> Self {
        Self {
            timestamp,
            mood,
            value: value.clamp(MIN_MOOD_VALUE, MAX_MOOD_VALUE),
            note: None,
            activities: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = (!note.trim().is_empty()).then_some(note);
        self
    }

    pub fn with_activities(mut self, activities: impl IntoIterator<Item = String>) -> Self {
        self.activities = activities.into_iter().collect();
        self
    }

    /// Intensity on the 1..=10 scale
    pub fn value(&self) -> u8 {
        self.value
    }
}

/// Mood change across a drawing session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionDelta {
    pub before: Mood,
    pub after: Mood,
    /// `after.value - before.value`
    pub change: i16,
}

/// Append-only history of mood check-ins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodJournal {
    entries: Vec<MoodEntry>,
}

impl MoodJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: MoodEntry) {
        log::debug!("Recorded mood {:?} ({})", entry.mood, entry.value);
        self.entries.push(entry);
    }

    /// Clamp values that came in through deserialization
    pub fn repair(&mut self) {
        for entry in &mut self.entries {
            entry.value = entry.value.clamp(MIN_MOOD_VALUE, MAX_MOOD_VALUE);
        }
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `n` entries, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &MoodEntry> {
        self.entries.iter().rev().take(n)
    }

    pub fn average(&self) -> Option<f32> {
        average_of(self.entries.iter())
    }

    pub fn counts(&self) -> BTreeMap<Mood, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.mood).or_insert(0) += 1;
        }
        counts
    }

    /// Ties go to the mood that appears first in [`Mood::ALL`]
    pub fn most_frequent(&self) -> Option<Mood> {
        let counts = self.counts();
        let best = counts.values().copied().max()?;
        Mood::ALL
            .into_iter()
            .find(|mood| counts.get(mood) == Some(&best))
    }

    /// Consecutive days with at least one entry, ending on the day of `now`.
    /// Zero if nothing was recorded today.
    pub fn streak(&self, now: u64) -> u32 {
        let days: BTreeSet<u64> = self.entries.iter().map(|e| day_index(e.timestamp)).collect();
        let mut day = day_index(now);
        let mut streak = 0;
        while days.contains(&day) {
            streak += 1;
            if day == 0 {
                break;
            }
            day -= 1;
        }
        streak
    }

    /// Average value of entries from the last `days` days up to `now`
    pub fn average_last_days(&self, days: u64, now: u64) -> Option<f32> {
        let since = now.saturating_sub(days.saturating_mul(SECS_PER_DAY));
        average_of(
            self.entries
                .iter()
                .filter(|e| e.timestamp >= since && e.timestamp <= now),
        )
    }

    /// Last entry before `session_start` against the last entry after it
    pub fn session_delta(&self, session_start: u64) -> Option<SessionDelta> {
        let before = self.entries.iter().rev().find(|e| e.timestamp < session_start)?;
        let after = self.entries.iter().rev().find(|e| e.timestamp >= session_start)?;
        Some(SessionDelta {
            before: before.mood,
            after: after.mood,
            change: i16::from(after.value) - i16::from(before.value),
        })
    }
}

fn average_of<'a>(entries: impl Iterator<Item = &'a MoodEntry>) -> Option<f32> {
    let (sum, count) = entries.fold((0u32, 0u32), |(sum, count), e| (sum + u32::from(e.value), count + 1));
    (count > 0).then(|| sum as f32 / count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_clamped() {
        assert_eq!(MoodEntry::new(0, Mood::Calm, 0).value(), 1);
        assert_eq!(MoodEntry::new(0, Mood::Calm, 42).value(), 10);
    }

    #[test]
    fn blank_notes_are_dropped() {
        assert_eq!(MoodEntry::new(0, Mood::Sad, 3).with_note("  ").note, None);
        assert_eq!(
            MoodEntry::new(0, Mood::Sad, 3).with_note("rainy day").note.as_deref(),
            Some("rainy day")
        );
    }

    fn journal(entries: &[(u64, Mood, u8)]) -> MoodJournal {
        let mut journal = MoodJournal::new();
        for &(timestamp, mood, value) in entries {
            journal.record(MoodEntry::new(timestamp, mood, value));
        }
        journal
    }

    #[test]
    fn average_and_counts() {
        assert_eq!(MoodJournal::new().average(), None);
        let journal = journal(&[(1, Mood::Calm, 7), (2, Mood::Sad, 3), (3, Mood::Calm, 8)]);
        assert_eq!(journal.average(), Some(6.0));
        assert_eq!(journal.counts().get(&Mood::Calm), Some(&2));
        let recent: Vec<u64> = journal.recent(2).map(|e| e.timestamp).collect();
        assert_eq!(recent, vec![3, 2]);
    }

    #[test]
    fn most_frequent_ties_follow_mood_order() {
        assert_eq!(MoodJournal::new().most_frequent(), None);
        let tied = journal(&[
            (1, Mood::Sad, 3),
            (2, Mood::Happy, 8),
            (3, Mood::Sad, 3),
            (4, Mood::Happy, 8),
        ]);
        assert_eq!(tied.most_frequent(), Some(Mood::Happy));

        let clear = journal(&[(1, Mood::Tired, 4), (2, Mood::Tired, 4), (3, Mood::Calm, 7)]);
        assert_eq!(clear.most_frequent(), Some(Mood::Tired));
    }

    #[test]
    fn average_over_recent_days() {
        let now = 30 * SECS_PER_DAY;
        let journal = journal(&[
            (now - 10 * SECS_PER_DAY, Mood::Sad, 2),
            (now - 2 * SECS_PER_DAY, Mood::Calm, 6),
            (now - 60, Mood::Happy, 9),
            // Future entries are left out
            (now + 60, Mood::Stressed, 1),
        ]);
        assert_eq!(journal.average_last_days(7, now), Some(7.5));
        assert_eq!(journal.average_last_days(30, now), Some(17.0 / 3.0));
        assert_eq!(journal.average_last_days(0, now - 3 * SECS_PER_DAY), None);
    }

    #[test]
    fn session_delta_compares_latest_entries() {
        let journal = journal(&[
            (10, Mood::Anxious, 3),
            (20, Mood::Stressed, 2),
            (100, Mood::Neutral, 5),
            (120, Mood::Calm, 7),
        ]);
        assert_eq!(
            journal.session_delta(50),
            Some(SessionDelta {
                before: Mood::Stressed,
                after: Mood::Calm,
                change: 5,
            })
        );
        // Nothing recorded before the session
        assert_eq!(journal.session_delta(5), None);
        assert_eq!(journal.session_delta(500), None);
    }

    #[test]
    fn streak_stops_at_gap() {
        let mut journal = MoodJournal::new();
        let today = 10 * SECS_PER_DAY + 100;
        for day in [6, 8, 9, 10] {
            journal.record(MoodEntry::new(day * SECS_PER_DAY + 50, Mood::Calm, 7));
        }
        assert_eq!(journal.streak(today), 3);
        assert_eq!(journal.streak(today + SECS_PER_DAY), 0);
    }
}
