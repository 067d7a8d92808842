//! Role scoping and free-text search over residents.
//!
//! Hamlet heads see residents whose hamlet key equals their own. A hamlet key
//! is the label with any leading `Dusun ` removed, trimmed and lowercased, so
//! `"Dusun Mawar"` and `"mawar"` name the same hamlet.

use crate::model::resident::Resident;
use crate::model::user::{User, UserRole};
use once_cell::sync::Lazy;
use regex::Regex;

static DUSUN_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*dusun(\s+|$)").expect("valid dusun prefix regex"));

/// Normalized comparison key for a hamlet label.
pub fn hamlet_key(label: &str) -> String {
    DUSUN_PREFIX_RE.replace(label, "").trim().to_lowercase()
}

/// Which residents a viewer may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResidentScope {
    All,
    /// Residents of one hamlet, by normalized key.
    Hamlet(String),
}

impl ResidentScope {
    /// Scope for a hamlet label; blank labels widen to `All`.
    pub fn hamlet(label: &str) -> Self {
        let key = hamlet_key(label);
        if key.is_empty() {
            Self::All
        } else {
            Self::Hamlet(key)
        }
    }

    /// Hamlet heads with an assigned area are restricted to it; everyone
    /// else sees the whole collection.
    pub fn for_user(user: &User) -> Self {
        match (user.role, user.area_label()) {
            (UserRole::Kadus, Some(area)) => Self::hamlet(area),
            _ => Self::All,
        }
    }

    pub fn includes(&self, resident: &Resident) -> bool {
        match self {
            Self::All => true,
            Self::Hamlet(key) => hamlet_key(&resident.dusun) == *key,
        }
    }
}

/// Case-insensitive substring on name, or substring on NIK.
///
/// A blank term matches every resident.
pub fn matches_term(resident: &Resident, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    resident
        .full_name
        .to_lowercase()
        .contains(&term.to_lowercase())
        || resident.nik.contains(term)
}

/// Residents in `scope` matching `term`, in collection order.
pub fn filter_residents(residents: &[Resident], term: &str, scope: &ResidentScope) -> Vec<Resident> {
    residents
        .iter()
        .filter(|resident| scope.includes(resident) && matches_term(resident, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_residents, hamlet_key, matches_term, ResidentScope};
    use crate::model::user::{AccountStatus, User, UserRole};
    use crate::seed::default_residents;

    fn user(role: UserRole, area: Option<&str>) -> User {
        User {
            id: "u".to_string(),
            username: "u".to_string(),
            password_hash: "h".to_string(),
            full_name: "U".to_string(),
            role,
            area: area.map(str::to_string),
            status: AccountStatus::Active,
        }
    }

    #[test]
    fn hamlet_key_strips_prefix_and_case() {
        assert_eq!(hamlet_key("Dusun Mawar"), "mawar");
        assert_eq!(hamlet_key("  dusun   Melati "), "melati");
        assert_eq!(hamlet_key("Mawar"), "mawar");
        assert_eq!(hamlet_key("Dusunan"), "dusunan");
        assert_eq!(hamlet_key(" Dusun "), "");
    }

    #[test]
    fn bare_prefix_area_widens_to_all() {
        assert_eq!(ResidentScope::hamlet("Dusun"), ResidentScope::All);
        assert_eq!(
            ResidentScope::for_user(&user(UserRole::Kadus, Some("Dusun"))),
            ResidentScope::All
        );
        let residents = default_residents();
        let scope = ResidentScope::for_user(&user(UserRole::Kadus, Some("Dusun")));
        assert_eq!(filter_residents(&residents, "", &scope).len(), 2);
    }

    #[test]
    fn hamlet_scope_uses_equality_not_containment() {
        let scope = ResidentScope::hamlet("Dusun Mawar");
        let mut resident = default_residents().remove(0);
        assert!(scope.includes(&resident));
        resident.dusun = "Mawar Indah".to_string();
        assert!(!scope.includes(&resident));
    }

    #[test]
    fn only_kadus_with_area_is_scoped() {
        assert_eq!(
            ResidentScope::for_user(&user(UserRole::Kadus, Some("Dusun Mawar"))),
            ResidentScope::Hamlet("mawar".to_string())
        );
        assert_eq!(
            ResidentScope::for_user(&user(UserRole::Kadus, None)),
            ResidentScope::All
        );
        assert_eq!(
            ResidentScope::for_user(&user(UserRole::RtRw, Some("RT 01 RW 02"))),
            ResidentScope::All
        );
    }

    #[test]
    fn term_matches_name_case_insensitively_or_nik() {
        let residents = default_residents();
        assert!(matches_term(&residents[0], "budi"));
        assert!(matches_term(&residents[0], "SANTOSO"));
        assert!(matches_term(&residents[1], "0002"));
        assert!(!matches_term(&residents[1], "budi"));
        assert!(matches_term(&residents[1], "  "));
    }

    #[test]
    fn filter_combines_scope_and_term() {
        let residents = default_residents();
        let scope = ResidentScope::hamlet("Melati");
        let found = filter_residents(&residents, "", &scope);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "Siti Aminah");
        assert!(filter_residents(&residents, "budi", &scope).is_empty());
    }
}
