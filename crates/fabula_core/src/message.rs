//! Chat messages.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One turn of the conversation sent to the model.
///
/// Every stage sends a single user message holding the rendered prompt.
///
/// # Examples
///
/// ```
/// use fabula_core::{Message, Role};
///
/// let message = Message::user("Write a story plan");
/// assert_eq!(*message.role(), Role::User);
/// assert_eq!(message.content(), "Write a story plan");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    role: Role,
    /// Plain text content
    content: String,
}

impl Message {
    /// Create a message from its parts.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Start building a message.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }
}
