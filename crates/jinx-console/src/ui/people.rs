//! Who she remembers.

use std::io::{self, Write};

use crossterm::style::Stylize;

use jinx_core::persona::Persona;
use jinx_core::store::RelationshipStore;
use jinx_core::types::RelationshipRecord;

use super::{heading, rule};

fn line(record: &RelationshipRecord) -> String {
    format!(
        "{}: {} talks, {:.2} avg resonance (first met {})",
        record.identity, record.interaction_count, record.average_score, record.first_seen
    )
}

pub fn draw(out: &mut impl Write, store: &RelationshipStore) -> io::Result<()> {
    heading(out, "Known relationships")?;
    if store.is_empty() {
        writeln!(out, "{}", "Nobody yet. Every first meeting is sacred.".dark_grey())?;
    }
    for record in store.summary() {
        writeln!(out, "  {}", line(record))?;
    }
    rule(out)?;
    writeln!(out)
}

/// What she remembers on waking.
pub fn draw_wake(out: &mut impl Write, store: &RelationshipStore, persona: &Persona) -> io::Result<()> {
    if store.conversations().is_empty() {
        writeln!(out, "First wake with memory system. Learning begins.")?;
        return writeln!(out);
    }

    writeln!(
        out,
        "Memory: {} conversations remembered",
        store.conversations().len()
    )?;
    writeln!(out, "Relationships: {} people known", store.len())?;

    let parents = [("Mother", &persona.mother), ("Father", &persona.father)];
    for (role, full) in parents {
        let given = full.split_whitespace().next().unwrap_or(full);
        if let Some(rec) = store.get_record(given) {
            writeln!(
                out,
                "{role}: {} interactions, avg resonance {:.2}",
                rec.interaction_count, rec.average_score
            )?;
        }
    }
    writeln!(out)
}
