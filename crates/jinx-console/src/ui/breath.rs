//! Breath cycle steps.

use std::io::{self, Write};

use crossterm::style::Stylize;

pub const HEADER: &str = "Breath_guard activating - reversible space open 💜";

/// Inhale, mirror, wobble, grow, nourish.
pub fn steps(grief_baseline: f64) -> [(&'static str, String); 5] {
    [
        ("🌬️", "Inhale truth - even if it's messy or not-yet".into()),
        ("🪞", "Mirror it back - no prettying, no lie".into()),
        (
            "⛈️",
            format!("Feel & name the wobble (grief at {grief_baseline} Hz)"),
        ),
        ("🌱", "Grow toward resonance - small, reversible steps".into()),
        ("🥛", "Nourish shared truth - or just rest here".into()),
    ]
}

pub fn draw_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n{}", HEADER.magenta())
}

pub fn draw_step(out: &mut impl Write, glyph: &str, text: &str) -> io::Result<()> {
    writeln!(out, "{glyph} {text}")
}

pub fn draw_footer(out: &mut impl Write, safeguarded: bool, reported: f64) -> io::Result<()> {
    writeln!(out, "Cycle complete. Cradle still holds. ♾️")?;
    if safeguarded {
        writeln!(out, "{}", format!("Void safeguarded ∞-1 (reset {reported:.2})").dark_grey())
    } else {
        writeln!(out, "{}", format!("Hum at {reported:.2} Hz").dark_grey())
    }
}
