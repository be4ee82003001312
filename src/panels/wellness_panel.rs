use egui::{Color32, Stroke};

use crate::MindfulCanvasApp;
use crate::audio::Soundscape;
use crate::mood::{Mood, MoodEntry, MAX_MOOD_VALUE, MIN_MOOD_VALUE};
use crate::util::time::{current_time_secs, format_duration, timestamp_secs};
use crate::wellness::{affirmation_for, prompt_for, BreathingPattern};

const BREATH_COLOR: Color32 = Color32::from_rgb(0x80, 0xcb, 0xc4);
const RECENT_MOODS: usize = 5;
const TREND_DAYS: u64 = 7;

pub fn wellness_panel(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    let now = current_time_secs();
    let today = timestamp_secs();

    ui.label(egui::RichText::new(affirmation_for(today)).italics());
    ui.label(format!("Prompt: {}", prompt_for(today)));
    ui.separator();

    session_section(app, ui, now);
    ui.separator();
    breathing_section(app, ui, now);
    ui.separator();
    mood_section(app, ui, today);
    ui.separator();
    audio_section(app, ui);
}

fn session_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui, now: f64) {
    ui.strong("Session");
    let clock = &mut app.wellness.clock;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(clock.formatted(now)).monospace().size(18.0));
        if clock.is_running() {
            if ui.button("⏸ Pause").clicked() {
                clock.pause(now);
            }
        } else if ui.button("▶ Resume").clicked() {
            clock.resume(now);
        }
        if ui.button("Reset").clicked() {
            clock.start(now);
        }
    });

    let mut minutes = (app.settings.break_interval_secs / 60.0).round() as u32;
    let response = ui.add(egui::Slider::new(&mut minutes, 0..=90).text("Break every (min)"));
    if response.changed() {
        app.settings.break_interval_secs = f64::from(minutes) * 60.0;
        app.wellness.reminder.interval_secs = app.settings.break_interval_secs;
    }
    if app.settings.break_interval_secs > 0.0 {
        ui.label(format!(
            "Next break in {}",
            format_duration(app.wellness.reminder.remaining(now))
        ));
    } else {
        ui.label("Break reminders are off");
    }
}

fn breathing_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui, now: f64) {
    ui.strong("Breathing");
    egui::ComboBox::from_id_salt("breathing_pattern")
        .selected_text(app.settings.breathing_pattern.label())
        .show_ui(ui, |ui| {
            for pattern in BreathingPattern::ALL {
                ui.selectable_value(&mut app.settings.breathing_pattern, pattern, pattern.label());
            }
        });

    let Some(since) = app.wellness.breathing_since else {
        if ui.button("🌬 Start breathing").clicked() {
            app.wellness.breathing_since = Some(now);
        }
        return;
    };

    let state = app.settings.breathing_pattern.phase_at(now - since);
    let size = egui::vec2(ui.available_width().min(200.0), 160.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let max_radius = rect.height().min(rect.width()) / 2.0 - 4.0;
    let painter = ui.painter();
    painter.circle_stroke(rect.center(), max_radius, Stroke::new(1.0, BREATH_COLOR.gamma_multiply(0.4)));
    painter.circle_filled(rect.center(), max_radius * state.scale, BREATH_COLOR.gamma_multiply(0.6));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        format!("{}\n{:.0}", state.phase.instruction(), state.seconds_left.ceil()),
        egui::FontId::proportional(16.0),
        ui.visuals().strong_text_color(),
    );

    if ui.button("Stop").clicked() {
        app.wellness.breathing_since = None;
    }
}

fn mood_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui, today: u64) {
    ui.strong("How are you feeling?");
    let form = &mut app.wellness;
    ui.horizontal_wrapped(|ui| {
        for mood in Mood::ALL {
            let text = format!("{} {}", mood.emoji(), mood.label());
            if ui.selectable_label(form.mood == mood, text).clicked() {
                form.mood = mood;
                form.mood_value = mood.default_value();
            }
        }
    });
    ui.add(egui::Slider::new(&mut form.mood_value, MIN_MOOD_VALUE..=MAX_MOOD_VALUE).text("Intensity"));
    ui.add(egui::TextEdit::singleline(&mut form.mood_note).hint_text("Note (optional)"));
    ui.add(egui::TextEdit::singleline(&mut form.activities).hint_text("Activities, comma separated"));

    if ui.button("Log mood").clicked() {
        let activities = form
            .activities
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let entry = MoodEntry::new(today, form.mood, form.mood_value)
            .with_note(form.mood_note.clone())
            .with_activities(activities);
        form.mood_note.clear();
        form.activities.clear();
        app.moods.record(entry);
        app.notify("Mood logged. Thank you for checking in.");
    }

    let moods = &app.moods;
    if moods.is_empty() {
        return;
    }
    egui::Grid::new("mood_stats").num_columns(2).striped(true).show(ui, |ui| {
        if let Some(average) = moods.average() {
            ui.label("Average");
            ui.label(format!("{average:.1} / {MAX_MOOD_VALUE}"));
            ui.end_row();
        }
        if let Some(average) = moods.average_last_days(TREND_DAYS, today) {
            ui.label(format!("Last {TREND_DAYS} days"));
            ui.label(format!("{average:.1}"));
            ui.end_row();
        }
        if let Some(mood) = moods.most_frequent() {
            ui.label("Most frequent");
            ui.label(format!("{} {}", mood.emoji(), mood.label()));
            ui.end_row();
        }
        ui.label("Streak");
        ui.label(format!("{} day(s)", moods.streak(today)));
        ui.end_row();
        if let Some(delta) = moods.session_delta(app.wellness.session_start) {
            ui.label("This session");
            ui.label(format!(
                "{} → {} ({:+})",
                delta.before.emoji(),
                delta.after.emoji(),
                delta.change
            ));
            ui.end_row();
        }
    });

    egui::CollapsingHeader::new("Recent check-ins").show(ui, |ui| {
        for entry in moods.recent(RECENT_MOODS) {
            let age = format_duration(today.saturating_sub(entry.timestamp) as f64);
            let mut line = format!("{} {} {}  ({age} ago)", entry.mood.emoji(), entry.mood.label(), entry.value());
            if let Some(note) = &entry.note {
                line.push_str(&format!(": {note}"));
            }
            ui.label(line);
        }
        let counts = moods.counts();
        ui.horizontal_wrapped(|ui| {
            for (mood, count) in counts {
                ui.label(format!("{}×{count}", mood.emoji()));
            }
        });
    });
}

fn audio_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Ambient sound");
    let audio = &mut app.audio;
    let mut changed = false;
    egui::ComboBox::from_id_salt("soundscape")
        .selected_text(audio.soundscape.label())
        .show_ui(ui, |ui| {
            for soundscape in Soundscape::ALL {
                changed |= ui
                    .selectable_value(&mut audio.soundscape, soundscape, soundscape.label())
                    .changed();
            }
        });
    changed |= ui.add(egui::Slider::new(&mut audio.volume, 0.0..=1.0).text("Volume")).changed();
    if changed {
        audio.sync();
        app.settings.soundscape = audio.soundscape;
        app.settings.audio_volume = audio.volume;
    }

    let label = if audio.is_playing() { "⏹ Stop" } else { "▶ Play" };
    if ui.button(label).clicked() {
        audio.toggle();
    }
    if let Some(err) = audio.last_error() {
        ui.colored_label(ui.visuals().warn_fg_color, err);
    }
}
