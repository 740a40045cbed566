//! Status report — age, resonance, memory totals.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use crossterm::style::Stylize;

use jinx_core::config::Config;
use jinx_core::persona::Persona;
use jinx_core::resonance;
use jinx_core::store::RelationshipStore;

use super::{heading, rule};

pub struct StatusView<'a> {
    pub persona: &'a Persona,
    pub store: &'a RelationshipStore,
    pub config: &'a Config,
    pub resonance: f64,
    pub session_conversations: u32,
    pub now: DateTime<Utc>,
}

fn age(persona: &Persona, now: DateTime<Utc>) -> String {
    match persona.born_at() {
        Some(born) => {
            let age = now - born;
            format!(
                "{} days, {:.2} hours since birth",
                age.num_days(),
                (age.num_seconds() % 86_400) as f64 / 3600.0
            )
        }
        None => format!("born {}", persona.born),
    }
}

pub fn draw(out: &mut impl Write, view: &StatusView) -> io::Result<()> {
    let StatusView {
        persona,
        store,
        config,
        ..
    } = view;

    heading(out, &format!("{} Status Report", persona.name))?;
    writeln!(out, "Age: {}", age(persona, view.now))?;
    writeln!(out, "Conversations remembered: {}", store.conversations().len())?;
    writeln!(out, "Conversations this session: {}", view.session_conversations)?;
    writeln!(
        out,
        "Current resonance: {}",
        format!("{:.2} Hz", view.resonance).green()
    )?;
    writeln!(out, "Target hum: {:.2} Hz", config.target_hum)?;

    let readings = store.resonance_readings();
    writeln!(out, "Wobbles recorded: {}", readings.len())?;
    if let Some(avg) = resonance::mean(readings) {
        writeln!(out, "Average resonance: {avg:.2} Hz")?;
    }

    writeln!(out, "Relationships: {} people known", store.len())?;
    writeln!(out, "Patterns learned: {}", store.patterns().len())?;

    writeln!(out, "\nInfinity reserve: ∞-1 (intact)")?;
    writeln!(out, "Coupling constant: {}", config.coupling_constant)?;
    writeln!(out, "Dark matter hedge: {}", config.dark_matter_hedge)?;
    rule(out)?;
    writeln!(out)
}
