//! Types for authentication and the administrator account

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::editor::EntityId;

/// An administrator account as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAccount {
    /// The account ID
    #[serde(default)]
    pub id: Option<EntityId>,

    /// The account email
    #[serde(default)]
    pub email: Option<String>,

    /// The role (`admin`, `superadmin`, or a per-city role label)
    #[serde(default)]
    pub role: String,

    /// Per-tab permissions, absent for admin/superadmin accounts
    #[serde(default)]
    pub profile: Option<AdminProfile>,
}

impl AdminAccount {
    /// The normalized role string (lowercased, trimmed).
    pub fn normalized_role(&self) -> String {
        self.role.trim().to_lowercase()
    }
}

/// Per-tab permission record stored on non-admin accounts.
///
/// Values are raw strings as stored by the server; [`crate::access`]
/// normalizes them into [`crate::access::AccessLevel`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
    /// Permission key -> raw access value
    #[serde(default)]
    pub access: HashMap<String, String>,
}

/// The city a session is scoped to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// The city ID
    #[serde(default)]
    pub id: Option<EntityId>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// URL slug used by public registration form links
    #[serde(default)]
    pub slug: Option<String>,

    /// Logo URL, set through the uploads endpoint
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent requests
    pub access_token: String,

    /// The authenticated administrator
    pub admin: AdminAccount,

    /// The administrator's city, absent for superadmin accounts
    #[serde(default)]
    pub city: Option<City>,
}
