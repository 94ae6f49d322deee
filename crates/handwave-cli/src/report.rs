//! Terminal output for replay reports

use std::io::{self, Write};

use anyhow::Result;
use handwave_core::recognizer::Gesture;
use handwave_core::{HandFrame, Intent};

use crate::commands::ReplayReport;

const GESTURES: [Gesture; 6] = [
    Gesture::Wake,
    Gesture::Confirm,
    Gesture::ScrollLeft,
    Gesture::ScrollRight,
    Gesture::Summon,
    Gesture::Dismiss,
];

pub fn print(report: &ReplayReport, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        write_json(&mut out, report)
    } else {
        write_table(&mut out, report)
    }
}

pub fn dump_frames(frames: &[HandFrame]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for frame in frames {
        writeln!(out, "{}", serde_json::to_string(frame)?)?;
    }
    Ok(())
}

pub fn describe(intent: &Intent) -> String {
    match intent {
        Intent::Activate => "activate".to_string(),
        Intent::Focus { target: Some(t) } => format!("focus {}", t.kind()),
        Intent::Focus { target: None } => "focus cleared".to_string(),
        Intent::Confirm { id, target } => match target {
            Some(t) => format!("confirm #{} on {}", id, t.kind()),
            None => format!("confirm #{}", id),
        },
        Intent::Summon { id } => format!("summon #{}", id),
        Intent::Dismiss { id } => format!("dismiss #{}", id),
        Intent::Scroll { id, delta } => format!("scroll #{} by {:+}", id, delta),
    }
}

fn write_json<W: Write>(out: &mut W, report: &ReplayReport) -> Result<()> {
    for intent in &report.intents {
        writeln!(out, "{}", serde_json::to_string(intent)?)?;
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, report: &ReplayReport) -> Result<()> {
    for event in &report.events {
        let cursor = event
            .cursor
            .map(|c| format!("({:.0}, {:.0})", c.x, c.y))
            .unwrap_or_default();
        writeln!(
            out,
            "{:>9.1}ms  {:<12} {}",
            event.timestamp_ms,
            event.gesture.name(),
            cursor
        )?;
    }

    let tally: Vec<String> = GESTURES
        .iter()
        .map(|g| (g, report.count(*g)))
        .filter(|(_, n)| *n > 0)
        .map(|(g, n)| format!("{} x{}", g, n))
        .collect();
    writeln!(
        out,
        "{} frames ({} with a hand), {} gestures{}{}",
        report.frames,
        report.hand_frames,
        report.events.len(),
        if tally.is_empty() { "" } else { ": " },
        tally.join(", ")
    )?;
    Ok(())
}
