use crate::db::errors::Result;
use crate::db::models::arrival_windows::{ArrivalWindowDBRequest, ArrivalWindowDBResponse};
use crate::types::{abbrev_uuid, CompanyId};
use sqlx::PgConnection;
use tracing::instrument;

/// Arrival windows are saved as a whole list, never row by row. The caller
/// wraps replace_all in a transaction so readers never see a partial set.
pub struct ArrivalWindows<'c> {
    db: &'c mut PgConnection,
}

impl<'c> ArrivalWindows<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id)), err)]
    pub async fn list(&mut self, company_id: CompanyId) -> Result<Vec<ArrivalWindowDBResponse>> {
        let windows = sqlx::query_as::<_, ArrivalWindowDBResponse>(
            "SELECT * FROM arrival_windows WHERE company_id = $1 ORDER BY position ASC",
        )
        .bind(company_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(windows)
    }

    /// Delete-then-insert replacement. Position follows input order.
    #[instrument(skip(self, windows), fields(company_id = %abbrev_uuid(&company_id), count = windows.len()), err)]
    pub async fn replace_all(&mut self, company_id: CompanyId, windows: &[ArrivalWindowDBRequest]) -> Result<Vec<ArrivalWindowDBResponse>> {
        sqlx::query("DELETE FROM arrival_windows WHERE company_id = $1")
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        let mut saved = Vec::with_capacity(windows.len());
        for (position, window) in windows.iter().enumerate() {
            let row = sqlx::query_as::<_, ArrivalWindowDBResponse>(
                r#"
                INSERT INTO arrival_windows (company_id, label, start_time, end_time, position)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(company_id)
            .bind(&window.label)
            .bind(window.start_time)
            .bind(window.end_time)
            .bind(position as i32)
            .fetch_one(&mut *self.db)
            .await?;
            saved.push(row);
        }

        Ok(saved)
    }
}
