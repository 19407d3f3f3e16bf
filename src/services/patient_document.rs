use std::fmt::{self, Write};

use crate::models::daily_record::DailyRecord;
use crate::models::user::BaselineProfile;

/// Upper bound on records rendered into one document.
pub const MAX_DOCUMENT_RECORDS: usize = 8;

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() { "Unknown" } else { value }
}

/// The window sent to the model: the most recent records, oldest first.
/// Input order does not matter; ties on timestamp break on id.
pub fn document_window(records: &[DailyRecord]) -> Vec<&DailyRecord> {
    let mut window: Vec<&DailyRecord> = records.iter().collect();
    window.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    window.truncate(MAX_DOCUMENT_RECORDS);
    window.reverse();
    window
}

/// Render the profile and a bounded record window into the text block handed
/// to the model. Same inputs, same bytes.
///
/// Free text (allergies, illness descriptions, notes) is copied verbatim.
pub fn render(profile: &BaselineProfile, records: &[DailyRecord]) -> String {
    let mut out = String::new();
    write_document(&mut out, profile, records).expect("writing to a String cannot fail");
    out
}

fn write_document(out: &mut String, profile: &BaselineProfile, records: &[DailyRecord]) -> fmt::Result {
    write_profile(out, profile)?;
    let window = document_window(records);
    write_table(out, &window)?;
    write_notes(out, &window)
}

fn write_profile(out: &mut String, profile: &BaselineProfile) -> fmt::Result {
    let history = &profile.medical_history;
    let family = &profile.family_history;
    let lifestyle = &profile.lifestyle_factors;

    let latest_weight = profile
        .latest_weight_kg
        .map(|w| w.to_string())
        .unwrap_or_else(|| "Not recorded".to_string());

    writeln!(out, "Patient Profile:")?;
    writeln!(out, "- Age: {} years", profile.age)?;
    writeln!(out, "- Sex: {}", profile.sex)?;
    writeln!(out, "- Height: {} cm", profile.height_cm)?;
    writeln!(out, "- Latest Weight: {} kg", latest_weight)?;
    writeln!(out)?;
    writeln!(out, "Medical History:")?;
    writeln!(out, "- Chronic Conditions: {}", join_or_none(&history.chronic_conditions))?;
    writeln!(out, "- Past Surgeries: {}", join_or_none(&history.past_surgeries))?;
    writeln!(out, "- Current Medications: {}", join_or_none(&history.current_medications))?;
    writeln!(out, "- Allergies: {}", join_or_none(&history.known_allergies))?;
    writeln!(out)?;
    writeln!(out, "Family History:")?;
    writeln!(out, "- Heart Disease: {}", yes_no(family.heart_disease))?;
    writeln!(out, "- Diabetes: {}", yes_no(family.diabetes))?;
    writeln!(out, "- Cancer: {}", yes_no(family.cancer))?;
    writeln!(out, "- Other: {}", join_or_none(&family.other_hereditary_conditions))?;
    writeln!(out)?;
    writeln!(out, "Lifestyle:")?;
    writeln!(out, "- Smoking: {}", or_unknown(&lifestyle.smoking_status))?;
    writeln!(out, "- Alcohol: {}", or_unknown(&lifestyle.alcohol_consumption))?;
    writeln!(out, "- Exercise: {}", or_unknown(&lifestyle.exercise_habits))?;
    writeln!(out)
}

fn write_table(out: &mut String, window: &[&DailyRecord]) -> fmt::Result {
    writeln!(out, "Health Records:")?;
    writeln!(
        out,
        "| Week | Date | Rest HR | HRV | Sleep | Steps | Calories | SpO₂ | Skin Temp | Weight | Illness | Energy | Soreness | Mood |"
    )?;
    writeln!(
        out,
        "|------|------|---------|-----|-------|-------|----------|------|-----------|--------|---------|--------|----------|------|"
    )?;

    for (i, record) in window.iter().enumerate() {
        let device = &record.device_data;
        let checkin = &record.checkin_data;
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {}/10 | {}/10 | {}/10 |",
            i + 1,
            record.date.format("%Y-%m-%d"),
            device.heart_rate.resting_hr,
            device.hrv.average_hrv,
            device.sleep.sleep_duration_hours,
            device.activity.steps,
            device.activity.calories_burned,
            device.spo2.average_spo2,
            device.skin_temp.deviation_celsius,
            checkin.body_weight_kg,
            checkin.illness_label(),
            checkin.energy_level,
            checkin.muscle_soreness,
            checkin.mood_state,
        )?;
    }
    Ok(())
}

fn write_notes(out: &mut String, window: &[&DailyRecord]) -> fmt::Result {
    let notes: Vec<(usize, &str)> = window
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            r.checkin_data
                .additional_notes
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .map(|n| (i + 1, n))
        })
        .collect();

    if notes.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Patient Notes:")?;
    for (week, note) in notes {
        writeln!(out, "- Week {}: {}", week, note)?;
    }
    Ok(())
}

/// Single-record block for the quick insight template.
pub fn render_latest(record: &DailyRecord) -> String {
    let device = &record.device_data;
    let checkin = &record.checkin_data;
    [
        format!("- Heart Rate: {} bpm", device.heart_rate.resting_hr),
        format!("- Sleep: {} hours", device.sleep.sleep_duration_hours),
        format!("- Steps: {}", device.activity.steps),
        format!("- SpO₂: {}%", device.spo2.average_spo2),
        format!("- Weight: {} kg", checkin.body_weight_kg),
        format!("- Energy Level: {}/10", checkin.energy_level),
        format!("- Mood: {}/10", checkin.mood_state),
        format!("- Illness: {}", checkin.illness_label()),
    ]
    .iter()
    .map(|line| format!("{}\n", line))
    .collect()
}
