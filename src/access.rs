use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::auth::SessionUser;

/// Access level attached to every user. Serialized as the bare integer
/// (1, 2 or 3) the frontend already stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccessLevel {
    /// Level 1: everything, including adding rooms and payment periods.
    Full,
    /// Level 2: looks at tenants and payments, changes nothing.
    ReadOnly,
    /// Level 3: edits tenant fields, never sees the payment section.
    NoPayments,
}

/// One operation on the ledger that a session may or may not invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewTenants,
    EditTenants,
    ViewPayments,
    EditPayments,
    AddPayment,
    AddRoom,
}

impl AccessLevel {
    pub fn allows(self, capability: Capability) -> bool {
        use AccessLevel::*;
        use Capability::*;

        match capability {
            ViewTenants => true,
            EditTenants => matches!(self, Full | NoPayments),
            ViewPayments => matches!(self, Full | ReadOnly),
            EditPayments | AddPayment | AddRoom => self == Full,
        }
    }

    pub fn capabilities(self) -> Capabilities {
        Capabilities {
            edit_tenants: self.allows(Capability::EditTenants),
            view_payments: self.allows(Capability::ViewPayments),
            edit_payments: self.allows(Capability::EditPayments),
            add_payment: self.allows(Capability::AddPayment),
            add_room: self.allows(Capability::AddRoom),
        }
    }
}

impl From<AccessLevel> for u8 {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Full => 1,
            AccessLevel::ReadOnly => 2,
            AccessLevel::NoPayments => 3,
        }
    }
}

impl TryFrom<u8> for AccessLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AccessLevel::Full),
            2 => Ok(AccessLevel::ReadOnly),
            3 => Ok(AccessLevel::NoPayments),
            other => Err(format!("unknown access level {other}")),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Capability::ViewTenants => "melihat data penghuni",
            Capability::EditTenants => "mengubah data penghuni",
            Capability::ViewPayments => "melihat pembayaran",
            Capability::EditPayments => "mengubah pembayaran",
            Capability::AddPayment => "menambah pembayaran",
            Capability::AddRoom => "menambah kamar",
        };
        f.write_str(label)
    }
}

/// Flattened capability flags sent to the frontend with the room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub edit_tenants: bool,
    pub view_payments: bool,
    pub edit_payments: bool,
    pub add_payment: bool,
    pub add_room: bool,
}

/// Source of user identities. The only implementation is the hardcoded
/// table below; a real provider would sit behind the same trait.
pub trait IdentityProvider: Send + Sync {
    fn authenticate(&self, id: &str, password: &str) -> Option<SessionUser>;
}

#[derive(Debug, Clone)]
struct Credential {
    id: String,
    password: String,
    level: AccessLevel,
}

#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    credentials: Vec<Credential>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::with_credentials([
            ("irfan", "42532439", AccessLevel::Full),
            ("oeoel", "mieayambaksoo", AccessLevel::ReadOnly),
            ("yudha", "123456", AccessLevel::NoPayments),
        ])
    }

    pub fn with_credentials<'a>(
        credentials: impl IntoIterator<Item = (&'a str, &'a str, AccessLevel)>,
    ) -> Self {
        let credentials = credentials
            .into_iter()
            .map(|(id, password, level)| Credential {
                id: id.to_string(),
                password: password.to_string(),
                level,
            })
            .collect();

        Self { credentials }
    }
}

impl Default for StaticIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn authenticate(&self, id: &str, password: &str) -> Option<SessionUser> {
        let found = self
            .credentials
            .iter()
            .find(|c| c.id == id && c.password == password)
            .map(|c| SessionUser {
                id: c.id.clone(),
                level: c.level,
            });

        if found.is_none() {
            warn!(user_id = id, "rejected sign-in attempt");
        }
        found
    }
}
