//! Resident collection service.
//!
//! # Responsibility
//! - Expose fetch/save/delete over residents with seed-on-first-access.
//! - Serve scoped search and dashboard statistics.

use super::error::ServiceResult;
use crate::model::resident::Resident;
use crate::report::age::AgeRule;
use crate::report::scope::{filter_residents, ResidentScope};
use crate::report::stats::ResidentStats;
use crate::repo::resident_repo::ResidentRepository;
use crate::seed;
use chrono::NaiveDate;
use log::info;

/// Use-case service for the resident collection.
pub struct ResidentService<R: ResidentRepository> {
    repo: R,
}

impl<R: ResidentRepository> ResidentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Writes the seed residents when the collection was never initialised.
    pub fn ensure_seeded(&self) -> ServiceResult<bool> {
        if self.repo.is_seeded()? {
            return Ok(false);
        }
        let seeded = self.repo.seed_residents(&seed::default_residents())?;
        if seeded {
            info!("event=collection_seed module=resident_service status=ok collection=residents");
        }
        Ok(seeded)
    }

    pub fn fetch_all(&self) -> ServiceResult<Vec<Resident>> {
        self.ensure_seeded()?;
        Ok(self.repo.list_residents()?)
    }

    pub fn get_resident(&self, id: &str) -> ServiceResult<Option<Resident>> {
        self.ensure_seeded()?;
        Ok(self.repo.get_resident(id)?)
    }

    /// Upserts `resident` by id (full replace) and returns it.
    pub fn save(&self, resident: Resident) -> ServiceResult<Resident> {
        self.ensure_seeded()?;
        self.repo.upsert_resident(&resident)?;
        info!(
            "event=resident_save module=resident_service status=ok resident_id={}",
            resident.id
        );
        Ok(resident)
    }

    /// Removes the resident with `id`; unknown ids are a no-op.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        self.ensure_seeded()?;
        let removed = self.repo.delete_resident(id)?;
        info!(
            "event=resident_delete module=resident_service status=ok resident_id={id} removed={removed}"
        );
        Ok(())
    }

    /// Residents visible in `scope` matching the free-text `term`.
    pub fn search(&self, term: &str, scope: &ResidentScope) -> ServiceResult<Vec<Resident>> {
        let residents = self.fetch_all()?;
        Ok(filter_residents(&residents, term, scope))
    }

    /// Dashboard statistics over the residents visible in `scope`.
    pub fn statistics(
        &self,
        scope: &ResidentScope,
        today: NaiveDate,
        rule: AgeRule,
    ) -> ServiceResult<ResidentStats> {
        let residents = self.search("", scope)?;
        Ok(ResidentStats::collect(&residents, today, rule))
    }
}
