//! Runs the MySQL repository against a live database.
//!
//! Needs `DATABASE_URL` (or a `.env` providing it); every test returns early
//! when it is missing or the server cannot be reached.

use configuration::DatabaseSettings;
use core_types::{CompanyNameUpdate, CompanyUpdate, NewCompany};
use database::{DbError, DbRepository, Repository, connect, probe, run_migrations};
use std::time::{SystemTime, UNIX_EPOCH};

async fn repository() -> Option<DbRepository> {
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL missing; skipping live database tests.");
        return None;
    };
    let settings = DatabaseSettings {
        url,
        ..Default::default()
    };
    let pool = connect(&settings).ok()?;
    if let Err(e) = probe(&pool).await {
        eprintln!("database unreachable ({e}); skipping live database tests.");
        return None;
    }
    if let Err(e) = run_migrations(&pool).await {
        eprintln!("migrations notice: {e}");
    }
    Some(DbRepository::new(pool))
}

/// A six-character identifier unlikely to collide with seeded rows.
fn fresh_id(salt: u32) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("T{:05}", (nanos / 10 + salt) % 100_000)
}

fn company(id: &str) -> NewCompany {
    NewCompany {
        company_id: id.to_string(),
        company_name: "Test Co".to_string(),
        company_city: "Charlotte".to_string(),
    }
}

#[tokio::test]
async fn company_lifecycle() {
    let Some(repo) = repository().await else { return };
    let id = fresh_id(1);
    let _ = repo.delete_company(&id).await;

    let created = repo.insert_company(&company(&id)).await.unwrap();
    assert_eq!(created.affected_rows, 1);

    let rows = repo.find_company(&id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["COMPANY_NAME"], "Test Co");

    let duplicate = repo.insert_company(&company(&id)).await.unwrap_err();
    assert!(matches!(duplicate, DbError::Conflict(_)), "{duplicate:?}");

    let renamed = repo
        .rename_company(&id, &CompanyNameUpdate { company_name: "Renamed".into() })
        .await
        .unwrap();
    assert_eq!(renamed.affected_rows, 1);
    let rows = repo.find_company(&id).await.unwrap();
    assert_eq!(rows[0]["COMPANY_NAME"], "Renamed");
    assert_eq!(rows[0]["COMPANY_CITY"], "Charlotte");

    // Matched rows count even when the value is already in place.
    let unchanged = repo
        .rename_company(&id, &CompanyNameUpdate { company_name: "Renamed".into() })
        .await
        .unwrap();
    assert_eq!(unchanged.affected_rows, 1);

    let update = CompanyUpdate {
        company_name: "Full".into(),
        company_city: "Raleigh".into(),
    };
    assert_eq!(repo.update_company(&id, &update).await.unwrap().affected_rows, 1);

    let deleted = repo.delete_company(&id).await.unwrap();
    assert!(!deleted.touched_nothing());
    assert!(repo.find_company(&id).await.unwrap().is_empty());
    assert!(repo.delete_company(&id).await.unwrap().touched_nothing());
}

#[tokio::test]
async fn unknown_country_yields_no_rows() {
    let Some(repo) = repository().await else { return };
    let rows = repo.customers_by_country("Atlantis").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn listings_succeed() {
    let Some(repo) = repository().await else { return };
    repo.list_agents().await.unwrap();
    repo.list_companies().await.unwrap();
    repo.list_customers().await.unwrap();
    repo.list_foods().await.unwrap();
}
