use serde::{Deserialize, Serialize};

use crate::access::{AccessLevel, Capability};
use crate::error::LedgerError;

/// The authenticated identity kept for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub level: AccessLevel,
}

impl SessionUser {
    pub fn can(&self, capability: Capability) -> bool {
        self.level.allows(capability)
    }

    pub fn require(&self, capability: Capability) -> Result<(), LedgerError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(LedgerError::Forbidden(capability))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub id: String,
    pub password: String,
}
