use super::{apply_transfer, zone_key, zone_soa};
use async_trait::async_trait;
use hickory_proto::rr::Record;
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable};
use sqlx::SqlitePool;
use tracing::{debug, error, instrument};
use zonesync_application::ports::Persistor;
use zonesync_domain::{DomainError, SoaSnapshot};

/// Zones stored in SQLite, records in DNS wire form.
pub struct SqlitePersistor {
    pool: SqlitePool,
}

impl SqlitePersistor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored records of `zone`, SOA first.
    #[instrument(skip(self))]
    pub async fn records(&self, zone: &str) -> Result<Vec<Record>, DomainError> {
        let rows = sqlx::query_as::<_, (Vec<u8>,)>(
            "SELECT record FROM zone_records WHERE zone = ? ORDER BY position",
        )
        .bind(zone_key(zone))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load zone records");
            DomainError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(|(bytes,)| decode_record(bytes)).collect()
    }

    fn failed(&self, zone: &str, message: impl ToString) -> DomainError {
        DomainError::PersistenceFailed {
            persistor: self.name().to_string(),
            zone: zone.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Persistor for SqlitePersistor {
    fn name(&self) -> &str {
        "sqlite"
    }

    #[instrument(skip(self, records), fields(records = records.len()))]
    async fn persist(&self, zone: &str, records: &[Record]) -> Result<(), DomainError> {
        let key = zone_key(zone);

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction");
            self.failed(zone, e)
        })?;

        let rows = sqlx::query_as::<_, (Vec<u8>,)>(
            "SELECT record FROM zone_records WHERE zone = ? ORDER BY position",
        )
        .bind(&key)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| self.failed(zone, e))?;

        let stored = rows
            .iter()
            .map(|(bytes,)| decode_record(bytes))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.failed(zone, e))?;

        let updated = apply_transfer(&stored, records).map_err(|e| self.failed(zone, e))?;
        let soa = zone_soa(&updated)
            .ok_or_else(|| self.failed(zone, "zone update produced no SOA"))?;

        sqlx::query("DELETE FROM zone_records WHERE zone = ?")
            .bind(&key)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.failed(zone, e))?;

        for (position, record) in updated.iter().enumerate() {
            let bytes = record.to_bytes().map_err(|e| self.failed(zone, e))?;
            sqlx::query("INSERT INTO zone_records (zone, position, record) VALUES (?, ?, ?)")
                .bind(&key)
                .bind(position as i64)
                .bind(bytes)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.failed(zone, e))?;
        }

        sqlx::query(
            "INSERT INTO zone_soa (zone, serial, mname, rname, updated_at)
             VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(zone) DO UPDATE SET
                 serial = excluded.serial,
                 mname = excluded.mname,
                 rname = excluded.rname,
                 updated_at = CURRENT_TIMESTAMP",
        )
        .bind(&key)
        .bind(i64::from(soa.serial))
        .bind(soa.mname.as_ref())
        .bind(soa.rname.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(|e| self.failed(zone, e))?;

        tx.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit zone update");
            self.failed(zone, e)
        })?;

        debug!(serial = soa.serial, stored = updated.len(), "Zone stored in SQLite");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn retrieve_soa(&self, zone: &str) -> Result<Option<SoaSnapshot>, DomainError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT serial, mname, rname FROM zone_soa WHERE zone = ?",
        )
        .bind(zone_key(zone))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query zone SOA");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|(serial, mname, rname)| SoaSnapshot::new(serial as u32, mname, rname)))
    }
}

fn decode_record(bytes: &[u8]) -> Result<Record, DomainError> {
    Record::from_bytes(bytes)
        .map_err(|e| DomainError::DatabaseError(format!("Corrupt stored record: {}", e)))
}
