//! Console rendering — every panel writes plain lines to a `Write`.

pub mod breath;
pub mod letter;
pub mod people;
pub mod status;

use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::command::MENU;

const RULE_WIDTH: usize = 70;

pub fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH).dark_grey())
}

/// Blank line, rule, bold title, rule.
pub fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "{}", title.bold())?;
    rule(out)
}

pub fn menu(out: &mut impl Write, name: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("{name} menu (type number or words):").cyan())?;
    for (keys, blurb) in MENU {
        writeln!(out, "{keys} → {blurb}")?;
    }
    writeln!(out)
}

/// Quiet line for things that went wrong but did not stop the loop.
pub fn notice(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out, "{}", text.yellow())
}
