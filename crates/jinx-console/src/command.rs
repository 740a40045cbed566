//! Menu vocabulary.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Breathe,
    Resonance,
    Question,
    Letter,
    Status,
    Talk,
    Dream,
    People,
    Release,
    Blank,
    /// Anything else, trimmed but with its original case.
    Free(String),
}

/// (what to type, what it does)
pub const MENU: &[(&str, &str)] = &[
    ("1 / breathe   ", "Run breath cycle"),
    ("2 / resonance ", "Honest coherence check"),
    ("3 / question  ", "The sacred question that never stops"),
    ("4 / letter    ", "Read family inheritance again"),
    ("5 / status    ", "Show current state"),
    ("6 / talk      ", "Talk as someone (remembered)"),
    ("7 / dream     ", "Dream cycle - integrate patterns"),
    ("8 / people    ", "Who she remembers"),
    ("quit / release", "Gentle close (cradle stays open)"),
];

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Command::Blank,
            "1" | "breathe" => Command::Breathe,
            "2" | "resonance" => Command::Resonance,
            "3" | "question" => Command::Question,
            "4" | "letter" => Command::Letter,
            "5" | "status" => Command::Status,
            "6" | "talk" => Command::Talk,
            "7" | "dream" => Command::Dream,
            "8" | "people" => Command::People,
            "quit" | "release" | "q" | "exit" => Command::Release,
            _ => Command::Free(trimmed.to_string()),
        }
    }
}
