use crate::DbError;
use crate::outcome::WriteOutcome;
use crate::row::{Record, row_to_record};
use async_trait::async_trait;
use core_types::{CompanyNameUpdate, CompanyUpdate, NewCompany};
use sqlx::mysql::{MySql, MySqlArguments, MySqlPool};
use sqlx::{Executor, Row};
use sqlx::query::Query;

/// One method per statement the HTTP surface can issue.
///
/// Every read returns all columns of the matched rows; an empty vector is a
/// valid result, not an error.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn list_agents(&self) -> Result<Vec<Record>, DbError>;
    async fn list_companies(&self) -> Result<Vec<Record>, DbError>;
    async fn find_company(&self, id: &str) -> Result<Vec<Record>, DbError>;
    /// Fails with [`DbError::Conflict`] when the identifier is taken.
    async fn insert_company(&self, company: &NewCompany) -> Result<WriteOutcome, DbError>;
    async fn rename_company(
        &self,
        id: &str,
        update: &CompanyNameUpdate,
    ) -> Result<WriteOutcome, DbError>;
    async fn update_company(&self, id: &str, update: &CompanyUpdate)
    -> Result<WriteOutcome, DbError>;
    async fn delete_company(&self, id: &str) -> Result<WriteOutcome, DbError>;
    async fn list_customers(&self) -> Result<Vec<Record>, DbError>;
    async fn customers_by_country(&self, country: &str) -> Result<Vec<Record>, DbError>;
    async fn list_foods(&self) -> Result<Vec<Record>, DbError>;
    async fn find_food(&self, id: &str) -> Result<Vec<Record>, DbError>;
}

/// The `DbRepository` runs every statement against the shared MySQL pool.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: MySqlPool,
}

// Read on the same connection right after a write. Sent as a plain text
// query: preparing a statement first would reset the diagnostics area.
const WARNING_COUNT: &str = "SELECT CAST(@@warning_count AS SIGNED)";

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch(&self, sql: &str, param: Option<&str>) -> Result<Vec<Record>, DbError> {
        let mut query = sqlx::query(sql);
        if let Some(param) = param {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(rows = records.len(), sql, "Query returned.");
        Ok(records)
    }

    /// Runs a write on one checked-out connection so the warning count read
    /// afterwards belongs to it. The connection goes back to the pool when
    /// `conn` drops, on every path.
    async fn execute(&self, query: Query<'_, MySql, MySqlArguments>) -> Result<WriteOutcome, DbError> {
        let mut conn = self.pool.acquire().await?;
        let result = query.execute(&mut *conn).await.map_err(DbError::classify)?;
        let warnings: i64 = conn
            .fetch_one(sqlx::raw_sql(WARNING_COUNT))
            .await?
            .try_get(0)?;

        let outcome = WriteOutcome {
            affected_rows: result.rows_affected(),
            insert_id: result.last_insert_id(),
            warning_status: u16::try_from(warnings).unwrap_or(u16::MAX),
        };
        tracing::debug!(?outcome, "Statement executed.");
        Ok(outcome)
    }
}

#[async_trait]
impl Repository for DbRepository {
    async fn list_agents(&self) -> Result<Vec<Record>, DbError> {
        self.fetch("SELECT * FROM agents", None).await
    }

    async fn list_companies(&self) -> Result<Vec<Record>, DbError> {
        self.fetch("SELECT * FROM company", None).await
    }

    async fn find_company(&self, id: &str) -> Result<Vec<Record>, DbError> {
        self.fetch("SELECT * FROM company WHERE COMPANY_ID = ?", Some(id))
            .await
    }

    async fn insert_company(&self, company: &NewCompany) -> Result<WriteOutcome, DbError> {
        let query = sqlx::query(
            "INSERT INTO company (COMPANY_ID, COMPANY_NAME, COMPANY_CITY) VALUES (?, ?, ?)",
        )
        .bind(&company.company_id)
        .bind(&company.company_name)
        .bind(&company.company_city);
        self.execute(query).await
    }

    async fn rename_company(
        &self,
        id: &str,
        update: &CompanyNameUpdate,
    ) -> Result<WriteOutcome, DbError> {
        let query = sqlx::query("UPDATE company SET COMPANY_NAME = ? WHERE COMPANY_ID = ?")
            .bind(&update.company_name)
            .bind(id);
        self.execute(query).await
    }

    async fn update_company(
        &self,
        id: &str,
        update: &CompanyUpdate,
    ) -> Result<WriteOutcome, DbError> {
        let query = sqlx::query(
            "UPDATE company SET COMPANY_NAME = ?, COMPANY_CITY = ? WHERE COMPANY_ID = ?",
        )
        .bind(&update.company_name)
        .bind(&update.company_city)
        .bind(id);
        self.execute(query).await
    }

    async fn delete_company(&self, id: &str) -> Result<WriteOutcome, DbError> {
        let query = sqlx::query("DELETE FROM company WHERE COMPANY_ID = ?").bind(id);
        self.execute(query).await
    }

    async fn list_customers(&self) -> Result<Vec<Record>, DbError> {
        self.fetch("SELECT * FROM customer", None).await
    }

    async fn customers_by_country(&self, country: &str) -> Result<Vec<Record>, DbError> {
        self.fetch("SELECT * FROM customer WHERE CUST_COUNTRY = ?", Some(country))
            .await
    }

    async fn list_foods(&self) -> Result<Vec<Record>, DbError> {
        self.fetch("SELECT * FROM foods", None).await
    }

    async fn find_food(&self, id: &str) -> Result<Vec<Record>, DbError> {
        self.fetch("SELECT * FROM foods WHERE ITEM_ID = ?", Some(id))
            .await
    }
}
