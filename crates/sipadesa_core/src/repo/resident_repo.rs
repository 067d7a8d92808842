//! Resident repository contract and SQLite implementation.

use super::{is_collection_seeded, mark_collection_seeded, Collection, RepoError, RepoResult};
use crate::model::resident::{Gender, Resident, ResidentStatus};
use rusqlite::{params, Connection, Row};

const RESIDENT_SELECT_SQL: &str = "SELECT
    id,
    nik,
    full_name,
    gender,
    birth_date,
    address,
    rt,
    rw,
    dusun,
    job,
    status
FROM residents";

/// Repository interface for the resident collection.
pub trait ResidentRepository {
    /// Every stored resident in insertion order.
    fn list_residents(&self) -> RepoResult<Vec<Resident>>;
    fn get_resident(&self, id: &str) -> RepoResult<Option<Resident>>;
    /// Inserts or fully replaces the resident with the same id.
    fn upsert_resident(&self, resident: &Resident) -> RepoResult<()>;
    /// Returns whether a row was removed.
    fn delete_resident(&self, id: &str) -> RepoResult<bool>;
    fn is_seeded(&self) -> RepoResult<bool>;
    fn mark_seeded(&self) -> RepoResult<bool>;
    /// Writes `residents` and the seed marker atomically, once.
    fn seed_residents(&self, residents: &[Resident]) -> RepoResult<bool>;
}

/// SQLite-backed resident repository.
pub struct SqliteResidentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResidentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ResidentRepository for SqliteResidentRepository<'_> {
    fn list_residents(&self) -> RepoResult<Vec<Resident>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESIDENT_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut residents = Vec::new();
        while let Some(row) = rows.next()? {
            residents.push(parse_resident_row(row)?);
        }
        Ok(residents)
    }

    fn get_resident(&self, id: &str) -> RepoResult<Option<Resident>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESIDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_resident_row(row)?));
        }
        Ok(None)
    }

    fn upsert_resident(&self, resident: &Resident) -> RepoResult<()> {
        resident.validate()?;
        upsert_resident_row(self.conn, resident)
    }

    fn delete_resident(&self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM residents WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn is_seeded(&self) -> RepoResult<bool> {
        is_collection_seeded(self.conn, Collection::Residents)
    }

    fn mark_seeded(&self) -> RepoResult<bool> {
        mark_collection_seeded(self.conn, Collection::Residents)
    }

    fn seed_residents(&self, residents: &[Resident]) -> RepoResult<bool> {
        for resident in residents {
            resident.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        if !mark_collection_seeded(&tx, Collection::Residents)? {
            return Ok(false);
        }
        for resident in residents {
            upsert_resident_row(&tx, resident)?;
        }
        tx.commit()?;
        Ok(true)
    }
}

fn upsert_resident_row(conn: &Connection, resident: &Resident) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO residents (
            id, nik, full_name, gender, birth_date, address, rt, rw, dusun, job, status
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT (id) DO UPDATE SET
            nik = excluded.nik,
            full_name = excluded.full_name,
            gender = excluded.gender,
            birth_date = excluded.birth_date,
            address = excluded.address,
            rt = excluded.rt,
            rw = excluded.rw,
            dusun = excluded.dusun,
            job = excluded.job,
            status = excluded.status,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![
            resident.id.as_str(),
            resident.nik.as_str(),
            resident.full_name.as_str(),
            resident.gender.as_str(),
            resident.birth_date.as_str(),
            resident.address.as_str(),
            resident.rt.as_str(),
            resident.rw.as_str(),
            resident.dusun.as_str(),
            resident.job.as_str(),
            resident.status.as_str(),
        ],
    )?;
    Ok(())
}

fn parse_resident_row(row: &Row<'_>) -> RepoResult<Resident> {
    let id: String = row.get("id")?;

    let gender_text: String = row.get("gender")?;
    let gender = Gender::parse(&gender_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_text}` in residents.gender ({id})"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = ResidentStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in residents.status ({id})"
        ))
    })?;

    let resident = Resident {
        id,
        nik: row.get("nik")?,
        full_name: row.get("full_name")?,
        gender,
        birth_date: row.get("birth_date")?,
        address: row.get("address")?,
        rt: row.get("rt")?,
        rw: row.get("rw")?,
        dusun: row.get("dusun")?,
        job: row.get("job")?,
        status,
    };
    resident
        .validate()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(resident)
}
