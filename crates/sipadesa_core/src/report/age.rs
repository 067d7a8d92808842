//! Age and ID-card (wajib KTP) eligibility.

use crate::model::resident::Resident;
use chrono::{Datelike, NaiveDate};

/// Minimum age for mandatory ID-card ownership.
pub const ID_CARD_AGE: i32 = 17;

/// How age is derived from a birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeRule {
    /// Current year minus birth year, ignoring month and day.
    #[default]
    CalendarYear,
    /// Completed years, birthday-aware.
    Exact,
}

impl AgeRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CalendarYear => "calendar-year",
            Self::Exact => "exact",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calendar-year" | "calendar_year" | "year" => Some(Self::CalendarYear),
            "exact" => Some(Self::Exact),
            _ => None,
        }
    }
}

/// Parses a `YYYY-MM-DD` birth date; blank or malformed yields `None`.
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn age_on(birth: NaiveDate, today: NaiveDate, rule: AgeRule) -> i32 {
    let years = today.year() - birth.year();
    match rule {
        AgeRule::CalendarYear => years,
        AgeRule::Exact => {
            if (today.month(), today.day()) < (birth.month(), birth.day()) {
                years - 1
            } else {
                years
            }
        }
    }
}

/// Residents without a parseable birth date are never eligible.
pub fn is_id_card_eligible(resident: &Resident, today: NaiveDate, rule: AgeRule) -> bool {
    parse_birth_date(&resident.birth_date)
        .map(|birth| age_on(birth, today, rule) >= ID_CARD_AGE)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{age_on, is_id_card_eligible, parse_birth_date, AgeRule};
    use crate::seed::default_residents;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calendar_year_rule_ignores_birthday() {
        let birth = date(2009, 12, 31);
        let today = date(2026, 1, 1);
        assert_eq!(age_on(birth, today, AgeRule::CalendarYear), 17);
        assert_eq!(age_on(birth, today, AgeRule::Exact), 16);
    }

    #[test]
    fn exact_rule_counts_birthday_itself() {
        assert_eq!(age_on(date(2009, 3, 4), date(2026, 3, 4), AgeRule::Exact), 17);
    }

    #[test]
    fn blank_birth_date_is_not_eligible() {
        let mut resident = default_residents().remove(0);
        resident.birth_date = String::new();
        assert!(parse_birth_date(&resident.birth_date).is_none());
        assert!(!is_id_card_eligible(&resident, date(2026, 1, 1), AgeRule::CalendarYear));
    }

    #[test]
    fn rule_names_parse() {
        assert_eq!(AgeRule::parse("EXACT"), Some(AgeRule::Exact));
        assert_eq!(AgeRule::parse(AgeRule::CalendarYear.as_str()), Some(AgeRule::CalendarYear));
        assert_eq!(AgeRule::parse("months"), None);
    }
}
