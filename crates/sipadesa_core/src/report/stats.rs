//! Demographic counts for dashboards.

use super::age::{is_id_card_eligible, AgeRule};
use super::scope::hamlet_key;
use crate::model::resident::{Gender, Resident, ResidentStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket for blank job or hamlet values.
pub const UNSPECIFIED_LABEL: &str = "Lainnya";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub permanent: usize,
    pub contract: usize,
    pub moved_out: usize,
}

/// Dashboard summary over one resident slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentStats {
    pub total: usize,
    pub gender: GenderCounts,
    pub status: StatusCounts,
    pub by_job: BTreeMap<String, usize>,
    pub by_hamlet: BTreeMap<String, usize>,
    /// Number of distinct hamlets.
    pub hamlet_count: usize,
    /// Residents aged 17 or more under the chosen rule.
    pub id_card_eligible: usize,
}

impl ResidentStats {
    pub fn collect(residents: &[Resident], today: NaiveDate, rule: AgeRule) -> Self {
        let by_hamlet = count_by_hamlet(residents);
        Self {
            total: residents.len(),
            gender: count_by_gender(residents),
            status: count_by_status(residents),
            by_job: count_by_job(residents),
            hamlet_count: by_hamlet.len(),
            by_hamlet,
            id_card_eligible: count_id_card_eligible(residents, today, rule),
        }
    }
}

pub fn count_by_gender(residents: &[Resident]) -> GenderCounts {
    residents
        .iter()
        .fold(GenderCounts::default(), |mut counts, resident| {
            match resident.gender {
                Gender::Male => counts.male += 1,
                Gender::Female => counts.female += 1,
            }
            counts
        })
}

pub fn count_by_status(residents: &[Resident]) -> StatusCounts {
    residents
        .iter()
        .fold(StatusCounts::default(), |mut counts, resident| {
            match resident.status {
                ResidentStatus::Permanent => counts.permanent += 1,
                ResidentStatus::Contract => counts.contract += 1,
                ResidentStatus::MovedOut => counts.moved_out += 1,
            }
            counts
        })
}

/// Groups by free-text job; blank jobs count as `Lainnya`.
pub fn count_by_job(residents: &[Resident]) -> BTreeMap<String, usize> {
    group_by_label(residents.iter().map(|resident| resident.job.as_str()))
}

/// Groups by hamlet key, so `Dusun Mawar` and `Mawar` count as one hamlet.
///
/// Each group is labelled with the first spelling seen; blank hamlets count
/// as `Lainnya`.
pub fn count_by_hamlet(residents: &[Resident]) -> BTreeMap<String, usize> {
    let mut groups: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for resident in residents {
        let key = hamlet_key(&resident.dusun);
        let label = if key.is_empty() {
            UNSPECIFIED_LABEL
        } else {
            resident.dusun.trim()
        };
        groups
            .entry(key)
            .or_insert_with(|| (label.to_string(), 0))
            .1 += 1;
    }

    let mut counts = BTreeMap::new();
    for (label, count) in groups.into_values() {
        *counts.entry(label).or_insert(0) += count;
    }
    counts
}

pub fn count_id_card_eligible(residents: &[Resident], today: NaiveDate, rule: AgeRule) -> usize {
    residents
        .iter()
        .filter(|resident| is_id_card_eligible(resident, today, rule))
        .count()
}

fn group_by_label<'a>(labels: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for label in labels {
        let label = label.trim();
        let key = if label.is_empty() {
            UNSPECIFIED_LABEL
        } else {
            label
        };
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
}
