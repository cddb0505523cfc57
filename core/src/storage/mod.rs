//! Message storage
//!
//! Messages are created once and never updated or deleted. The store owns
//! them; everything handed out is a copy.

pub mod store;

use crate::types::{Message, MessageId};
use crate::{Error, Result};

pub use store::Store;

/// Durable, create-only message collection
pub trait MessageStore: Send + Sync {
    /// Validate, assign an id and timestamp, and persist a new message.
    fn save(&self, text: &str, user: &str) -> Result<Message>;

    /// Look up a previously saved message
    fn get(&self, id: &MessageId) -> Result<Option<Message>>;

    /// Number of stored messages
    fn count(&self) -> Result<usize>;
}

/// Reject blank text or user before anything touches the database
pub fn validate_submission(text: &str, user: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Validation("text is required".to_string()));
    }
    if user.trim().is_empty() {
        return Err(Error::Validation("user is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_submission() {
        assert!(validate_submission("hi", "u1").is_ok());
        assert!(matches!(validate_submission("", "u1"), Err(Error::Validation(_))));
        assert!(matches!(validate_submission("hi", "  "), Err(Error::Validation(_))));
    }

    proptest! {
        #[test]
        fn prop_non_blank_inputs_are_accepted(text in "[a-z]{1,20}", user in "[a-z0-9]{1,10}") {
            prop_assert!(validate_submission(&text, &user).is_ok());
        }

        #[test]
        fn prop_whitespace_text_is_rejected(text in "[ \t\n]{0,8}") {
            prop_assert!(validate_submission(&text, "u1").is_err());
        }
    }
}
