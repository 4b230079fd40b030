//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a message sent to the model.
///
/// # Examples
///
/// ```
/// use fabula_core::Role;
///
/// assert_eq!(format!("{}", Role::System), "System");
/// assert_eq!(Role::Assistant.wire_name(), "assistant");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// Instructions that frame the whole exchange
    System,
    /// Prompts written by the engine on the user's behalf
    User,
    /// Model replies
    Assistant,
}

impl Role {
    /// Lowercase name used by chat-completion APIs.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
