//! Resets the `companies` collection from the bundled dataset.

use crate::models::Company;
use crate::services::store::CompanyStore;
use metrics::counter;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

const TECH_FUNDINGS_JSON: &str = include_str!("../../data/tech_fundings.json");

/// The bundled dataset, in file order.
pub fn seed_dataset() -> Result<Vec<Company>, AppError> {
    serde_json::from_str(TECH_FUNDINGS_JSON).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Bundled seed dataset is invalid: {}", e))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedFailure {
    /// Position of the record in the dataset.
    pub position: usize,
    pub company: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub deleted: u64,
    pub inserted_ids: Vec<ObjectId>,
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    pub fn inserted(&self) -> usize {
        self.inserted_ids.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Clears the store, then inserts `dataset` in order.
///
/// A failed clear aborts the run. A failed insert does not: it is logged,
/// recorded in the report and the remaining records are still inserted.
pub async fn seed_companies(
    store: &dyn CompanyStore,
    dataset: &[Company],
) -> Result<SeedReport, AppError> {
    let deleted = store.delete_all().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to clear companies before seeding");
        e
    })?;
    tracing::info!(deleted, records = dataset.len(), "Seeding companies");

    let mut report = SeedReport {
        deleted,
        ..SeedReport::default()
    };

    for (position, company) in dataset.iter().enumerate() {
        match store.insert(company).await {
            Ok(id) => {
                counter!("companies_seeded_total").increment(1);
                report.inserted_ids.push(id);
            }
            Err(e) => {
                counter!("companies_seed_failures_total").increment(1);
                tracing::warn!(
                    position,
                    company = %company.company,
                    error = %e,
                    "Failed to insert seed record"
                );
                report.failures.push(SeedFailure {
                    position,
                    company: company.company.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        inserted = report.inserted(),
        failed = report.failures.len(),
        "Seeding finished"
    );

    Ok(report)
}
