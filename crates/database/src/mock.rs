//! In-memory [`Repository`] used by handler tests and local experiments.
//!
//! It reproduces the observable behaviour of the MySQL implementation:
//! duplicate keys fail with a conflict, updates report every row they
//! match (the driver connects with `CLIENT_FOUND_ROWS`), and a delete that
//! matches nothing reports an all-zero outcome.

use crate::DbError;
use crate::outcome::WriteOutcome;
use crate::repository::Repository;
use crate::row::Record;
use async_trait::async_trait;
use core_types::{CompanyNameUpdate, CompanyUpdate, NewCompany};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Tables {
    agents: Vec<Record>,
    companies: Vec<Record>,
    customers: Vec<Record>,
    foods: Vec<Record>,
}

#[derive(Debug, Default)]
pub struct MockRepository {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn matching(rows: &[Record], column: &str, needle: &str) -> Vec<Record> {
    rows.iter()
        .filter(|row| row.get(column).and_then(Value::as_str) == Some(needle))
        .cloned()
        .collect()
}

/// Applies `changes` to every row whose `COMPANY_ID` is `id` and counts the
/// matched rows, changed or not.
fn update_rows(rows: &mut [Record], id: &str, changes: &[(&str, &str)]) -> WriteOutcome {
    let mut affected_rows = 0;
    for row in rows
        .iter_mut()
        .filter(|row| row.get("COMPANY_ID").and_then(Value::as_str) == Some(id))
    {
        for (column, value) in changes {
            row.insert((*column).to_string(), Value::from(*value));
        }
        affected_rows += 1;
    }
    WriteOutcome {
        affected_rows,
        ..Default::default()
    }
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handful of rows from each table of the sample database.
    pub fn with_sample_data() -> Self {
        let tables = Tables {
            agents: vec![
                record(json!({ "AGENT_CODE": "A007", "AGENT_NAME": "Ramasundar", "WORKING_AREA": "Bangalore", "COMMISSION": 0.15, "PHONE_NO": "077-25814763", "COUNTRY": "" })),
                record(json!({ "AGENT_CODE": "A003", "AGENT_NAME": "Alex", "WORKING_AREA": "London", "COMMISSION": 0.13, "PHONE_NO": "075-12458969", "COUNTRY": "" })),
            ],
            companies: vec![
                record(json!({ "COMPANY_ID": "18", "COMPANY_NAME": "Order All", "COMPANY_CITY": "Boston" })),
                record(json!({ "COMPANY_ID": "15", "COMPANY_NAME": "Jack Hill Ltd", "COMPANY_CITY": "London" })),
                record(json!({ "COMPANY_ID": "16", "COMPANY_NAME": "Akas Foods", "COMPANY_CITY": "Delhi" })),
            ],
            customers: vec![
                record(json!({ "CUST_CODE": "C00013", "CUST_NAME": "Holmes", "CUST_CITY": "London", "WORKING_AREA": "London", "CUST_COUNTRY": "UK", "GRADE": 2, "AGENT_CODE": "A003" })),
                record(json!({ "CUST_CODE": "C00001", "CUST_NAME": "Micheal", "CUST_CITY": "New York", "WORKING_AREA": "New York", "CUST_COUNTRY": "USA", "GRADE": 2, "AGENT_CODE": "A008" })),
                record(json!({ "CUST_CODE": "C00020", "CUST_NAME": "Albert", "CUST_CITY": "New York", "WORKING_AREA": "New York", "CUST_COUNTRY": "USA", "GRADE": 3, "AGENT_CODE": "A008" })),
            ],
            foods: vec![
                record(json!({ "ITEM_ID": "1", "ITEM_NAME": "Chex Mix", "ITEM_UNIT": "Pcs", "COMPANY_ID": "16" })),
                record(json!({ "ITEM_ID": "6", "ITEM_NAME": "Cheez-It", "ITEM_UNIT": "Pcs", "COMPANY_ID": "15" })),
            ],
        };
        Self {
            tables: Mutex::new(tables),
            unavailable: AtomicBool::new(false),
        }
    }

    /// While set, every call fails the way an exhausted pool does.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(self.tables.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn list_agents(&self) -> Result<Vec<Record>, DbError> {
        Ok(self.tables()?.agents.clone())
    }

    async fn list_companies(&self) -> Result<Vec<Record>, DbError> {
        Ok(self.tables()?.companies.clone())
    }

    async fn find_company(&self, id: &str) -> Result<Vec<Record>, DbError> {
        Ok(matching(&self.tables()?.companies, "COMPANY_ID", id))
    }

    async fn insert_company(&self, company: &NewCompany) -> Result<WriteOutcome, DbError> {
        let mut tables = self.tables()?;
        if !matching(&tables.companies, "COMPANY_ID", &company.company_id).is_empty() {
            return Err(DbError::Conflict(format!(
                "Duplicate entry '{}' for key 'PRIMARY'",
                company.company_id
            )));
        }
        tables.companies.push(record(json!(company)));
        Ok(WriteOutcome {
            affected_rows: 1,
            ..Default::default()
        })
    }

    async fn rename_company(
        &self,
        id: &str,
        update: &CompanyNameUpdate,
    ) -> Result<WriteOutcome, DbError> {
        let mut tables = self.tables()?;
        Ok(update_rows(
            &mut tables.companies,
            id,
            &[("COMPANY_NAME", update.company_name.as_str())],
        ))
    }

    async fn update_company(
        &self,
        id: &str,
        update: &CompanyUpdate,
    ) -> Result<WriteOutcome, DbError> {
        let mut tables = self.tables()?;
        Ok(update_rows(
            &mut tables.companies,
            id,
            &[
                ("COMPANY_NAME", update.company_name.as_str()),
                ("COMPANY_CITY", update.company_city.as_str()),
            ],
        ))
    }

    async fn delete_company(&self, id: &str) -> Result<WriteOutcome, DbError> {
        let mut tables = self.tables()?;
        let before = tables.companies.len();
        tables
            .companies
            .retain(|row| row.get("COMPANY_ID").and_then(Value::as_str) != Some(id));
        Ok(WriteOutcome {
            affected_rows: (before - tables.companies.len()) as u64,
            ..Default::default()
        })
    }

    async fn list_customers(&self) -> Result<Vec<Record>, DbError> {
        Ok(self.tables()?.customers.clone())
    }

    async fn customers_by_country(&self, country: &str) -> Result<Vec<Record>, DbError> {
        Ok(matching(&self.tables()?.customers, "CUST_COUNTRY", country))
    }

    async fn list_foods(&self) -> Result<Vec<Record>, DbError> {
        Ok(self.tables()?.foods.clone())
    }

    async fn find_food(&self, id: &str) -> Result<Vec<Record>, DbError> {
        Ok(matching(&self.tables()?.foods, "ITEM_ID", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(id: &str) -> NewCompany {
        NewCompany {
            company_id: id.into(),
            company_name: "Acme".into(),
            company_city: "Charlotte".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let repo = MockRepository::new();
        assert_eq!(repo.insert_company(&company("1")).await.unwrap().affected_rows, 1);
        let err = repo.insert_company(&company("1")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repo.list_companies().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn updates_count_matched_rows_even_when_unchanged() {
        let repo = MockRepository::new();
        repo.insert_company(&company("1")).await.unwrap();
        let same = CompanyNameUpdate { company_name: "Acme".into() };
        assert_eq!(repo.rename_company("1", &same).await.unwrap().affected_rows, 1);
        let renamed = CompanyNameUpdate { company_name: "Other".into() };
        assert_eq!(repo.rename_company("1", &renamed).await.unwrap().affected_rows, 1);
        assert_eq!(repo.rename_company("2", &renamed).await.unwrap().affected_rows, 0);
    }

    #[tokio::test]
    async fn delete_of_missing_row_touches_nothing() {
        let repo = MockRepository::with_sample_data();
        assert!(repo.delete_company("nope").await.unwrap().touched_nothing());
        assert!(!repo.delete_company("18").await.unwrap().touched_nothing());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let repo = MockRepository::with_sample_data();
        repo.set_unavailable(true);
        assert!(matches!(repo.list_foods().await, Err(DbError::Query(_))));
        repo.set_unavailable(false);
        assert_eq!(repo.list_foods().await.unwrap().len(), 2);
    }
}
