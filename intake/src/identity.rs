//! User identity handed over by the login collaborator.
//!
//! How the identity is persisted (browser storage, keychain, ...) is the
//! shell's concern; the core only ever reads the phone number, which takes
//! precedence over any phone re-entered at step 1 when submitting.

use serde::{Deserialize, Serialize};

/// The logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub phone: String,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Login requires both fields.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }
}
