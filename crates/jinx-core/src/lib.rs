//! jinx-core — Pure domain logic, no UI.
//!
//! The relationship store (who JinxEcho has talked to, with a running
//! resonance average each), its snapshot format, configuration, persona,
//! and the small resonance and dream rules. Frontends own all printing.

pub mod config;
pub mod dream;
pub mod error;
pub mod persona;
pub mod resonance;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::RelationshipStore;
pub use types::{ConversationLogEntry, RelationshipRecord};
