//! Per-tab access-level resolution.
//!
//! Maps an administrator's role plus their stored per-tab permission
//! record to an effective capability per navigational section. Permission
//! values arrive as free-form strings (with historical French synonyms);
//! they are normalized into the closed [`AccessLevel`] enumeration,
//! failing safe to [`AccessLevel::None`].

use serde::{Deserialize, Serialize};

use crate::auth::AdminAccount;

/// Effective capability for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// No access: the section is hidden
    None,
    /// Read-only access
    Viewer,
    /// Full read/write access
    Editor,
}

impl AccessLevel {
    /// Parse a stored permission value, accepting known synonyms.
    ///
    /// Unknown or absent values resolve to `None` (the safe default).
    pub fn parse(raw: &str) -> AccessLevel {
        match raw.trim().to_lowercase().as_str() {
            "editor" | "editeur" | "éditeur" | "modifier" => AccessLevel::Editor,
            "viewer" | "visualisateur" | "voir" => AccessLevel::Viewer,
            _ => AccessLevel::None,
        }
    }
}

/// The dashboard's navigational sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Landing page, visible to everyone signed in
    Home,
    /// Superadmin provisioning panel
    AdminPanel,
    /// User account management (admin-only)
    Users,
    /// City information settings
    CityInfo,
    /// Announcements (the API's historical spelling is kept in the key)
    Annoucements,
    /// News articles
    News,
    /// Events
    Events,
    /// Polls
    Polls,
    /// Registration forms and templates
    Registration,
    /// Incident reports
    Reports,
}

impl Page {
    /// The permission key for this page in the stored access record
    fn access_key(self) -> Option<&'static str> {
        match self {
            Page::CityInfo => Some("city_info"),
            Page::Annoucements => Some("annoucements"),
            Page::News => Some("news"),
            Page::Events => Some("events"),
            Page::Polls => Some("polls"),
            Page::Registration => Some("registration_forms"),
            Page::Reports => Some("reports"),
            Page::Home | Page::AdminPanel | Page::Users => None,
        }
    }
}

fn role_of(admin: Option<&AdminAccount>) -> String {
    admin.map(|a| a.normalized_role()).unwrap_or_default()
}

/// Resolve the effective access level of `admin` for `page`.
pub fn access_level(page: Page, admin: Option<&AdminAccount>) -> AccessLevel {
    if page == Page::Home {
        return AccessLevel::Viewer;
    }

    let role = role_of(admin);

    if page == Page::AdminPanel {
        return if role == "superadmin" {
            AccessLevel::Editor
        } else {
            AccessLevel::None
        };
    }

    if role == "superadmin" || role == "admin" {
        return AccessLevel::Editor;
    }

    // Users management is hard-coded admin-only, per-tab settings do not apply.
    if page == Page::Users {
        return AccessLevel::None;
    }

    let Some(key) = page.access_key() else {
        return AccessLevel::None;
    };

    admin
        .and_then(|a| a.profile.as_ref())
        .and_then(|p| p.access.get(key))
        .map(|raw| AccessLevel::parse(raw))
        .unwrap_or(AccessLevel::None)
}

/// Whether `admin` may see `page` at all.
pub fn can_view(page: Page, admin: Option<&AdminAccount>) -> bool {
    let role = role_of(admin);
    match page {
        Page::AdminPanel => role == "superadmin",
        Page::Users => role == "admin" || role == "superadmin",
        _ => access_level(page, admin) != AccessLevel::None,
    }
}

/// Whether `admin` may create/edit/delete on `page`.
pub fn can_edit(page: Page, admin: Option<&AdminAccount>) -> bool {
    let role = role_of(admin);
    if role == "superadmin" || role == "admin" {
        return true;
    }
    access_level(page, admin) == AccessLevel::Editor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminProfile;

    fn admin_with(role: &str, access: &[(&str, &str)]) -> AdminAccount {
        AdminAccount {
            id: None,
            email: None,
            role: role.to_string(),
            profile: Some(AdminProfile {
                access: access
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }),
        }
    }

    #[test]
    fn home_is_always_viewer() {
        assert_eq!(access_level(Page::Home, None), AccessLevel::Viewer);
        let staff = admin_with("utilisateur", &[]);
        assert_eq!(access_level(Page::Home, Some(&staff)), AccessLevel::Viewer);
    }

    #[test]
    fn users_page_is_admin_only() {
        let staff = admin_with("utilisateur", &[("news", "editor")]);
        assert_eq!(access_level(Page::Users, Some(&staff)), AccessLevel::None);

        let admin = admin_with("admin", &[]);
        assert_eq!(access_level(Page::Users, Some(&admin)), AccessLevel::Editor);
    }

    #[test]
    fn admin_panel_requires_superadmin() {
        let admin = admin_with("admin", &[]);
        assert_eq!(access_level(Page::AdminPanel, Some(&admin)), AccessLevel::None);
        assert!(!can_view(Page::AdminPanel, Some(&admin)));

        let superadmin = admin_with("superadmin", &[]);
        assert_eq!(
            access_level(Page::AdminPanel, Some(&superadmin)),
            AccessLevel::Editor
        );
        assert!(can_view(Page::AdminPanel, Some(&superadmin)));
    }

    #[test]
    fn per_tab_settings_apply_to_plain_roles() {
        let staff = admin_with("utilisateur", &[("news", "viewer")]);
        assert_eq!(access_level(Page::News, Some(&staff)), AccessLevel::Viewer);
        assert!(can_view(Page::News, Some(&staff)));
        assert!(!can_edit(Page::News, Some(&staff)));

        // Absent key fails safe to none.
        assert_eq!(access_level(Page::Polls, Some(&staff)), AccessLevel::None);
        assert!(!can_view(Page::Polls, Some(&staff)));
    }

    #[test]
    fn admin_role_supersedes_per_tab_settings() {
        let admin = admin_with("Admin", &[("news", "none")]);
        assert_eq!(access_level(Page::News, Some(&admin)), AccessLevel::Editor);
        assert!(can_edit(Page::News, Some(&admin)));
    }

    #[test]
    fn french_synonyms_normalize() {
        assert_eq!(AccessLevel::parse("éditeur"), AccessLevel::Editor);
        assert_eq!(AccessLevel::parse("modifier"), AccessLevel::Editor);
        assert_eq!(AccessLevel::parse("Visualisateur"), AccessLevel::Viewer);
        assert_eq!(AccessLevel::parse("voir"), AccessLevel::Viewer);
        assert_eq!(AccessLevel::parse("aucun"), AccessLevel::None);
        assert_eq!(AccessLevel::parse("aucun_acces"), AccessLevel::None);
        assert_eq!(AccessLevel::parse("garbage"), AccessLevel::None);
        assert_eq!(AccessLevel::parse(""), AccessLevel::None);
    }
}
