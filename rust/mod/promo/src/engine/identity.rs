//! Deterministic interaction identifiers.

use chrono::{DateTime, Utc};
use promo_core::time_id;

use crate::model::InteractionKind;

/// Whether an interaction key can be hit twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Same (actor, owner, promotion, kind) always yields the same key.
    Toggleable,
    /// The creation instant is part of the key; every event is distinct.
    AppendOnly { at: DateTime<Utc> },
}

/// Identity of an interaction.
///
/// Built only through [`InteractionKey::resolve`], so the mode always agrees
/// with the kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionKey {
    actor_id: String,
    owner_id: String,
    promotion_id: String,
    kind: InteractionKind,
    mode: KeyMode,
}

impl InteractionKey {
    pub fn resolve(
        actor_id: &str,
        owner_id: &str,
        promotion_id: &str,
        kind: InteractionKind,
        at: DateTime<Utc>,
    ) -> Self {
        let mode = if kind.is_toggleable() {
            KeyMode::Toggleable
        } else {
            KeyMode::AppendOnly { at }
        };
        Self {
            actor_id: actor_id.to_string(),
            owner_id: owner_id.to_string(),
            promotion_id: promotion_id.to_string(),
            kind,
            mode,
        }
    }

    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    pub fn is_toggleable(&self) -> bool {
        self.mode == KeyMode::Toggleable
    }

    /// Storage form of the key.
    ///
    /// Every id component is length-prefixed (`<len>:<bytes>`), so no choice
    /// of ids can make two different keys encode to the same string:
    ///
    /// ```text
    /// like|3:bob|5:alice|2:p1
    /// comment|3:bob|5:alice|2:p1|@01700000000000000000
    /// ```
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(
            self.actor_id.len() + self.owner_id.len() + self.promotion_id.len() + 48,
        );
        out.push_str(self.kind.as_str());
        for part in [&self.actor_id, &self.owner_id, &self.promotion_id] {
            out.push('|');
            out.push_str(&part.len().to_string());
            out.push(':');
            out.push_str(part);
        }
        if let KeyMode::AppendOnly { at } = self.mode {
            out.push_str("|@");
            out.push_str(&time_id(at));
        }
        out
    }
}
