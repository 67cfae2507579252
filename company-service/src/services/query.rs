//! Read operations behind `GET /companies` and `GET /companies/id/:id`.

use crate::models::{
    canonical_field, Company, FieldFilter, FieldKind, FieldValue, FUNDING_AMOUNT_FIELD,
};
use crate::services::store::CompanyStore;
use service_core::error::AppError;
use std::collections::{BTreeMap, HashMap};

/// Page size of an exact-match listing.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// The two listing modes. They are mutually exclusive: a funding threshold
/// replaces every other condition and lifts the page size.
#[derive(Debug, Clone, PartialEq)]
pub enum CompanyQuery {
    ExactFilter { fields: FieldFilter, limit: i64 },
    ThresholdFilter { field: &'static str, min: f64 },
}

impl CompanyQuery {
    /// Builds a query from raw query-string pairs.
    ///
    /// Keys naming a known field are matched case-insensitively and mapped
    /// to the stored name. Unknown keys are kept verbatim as text conditions.
    /// Keys that fold onto the same field must agree on the value.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        // Sorted so that error reporting does not depend on hash order
        let params: BTreeMap<&str, &str> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut threshold: Option<f64> = None;
        for (key, raw) in &params {
            if !canonical_field(key).is_some_and(|(field, _)| field == FUNDING_AMOUNT_FIELD) {
                continue;
            }
            let min = parse_number(key, raw)?;
            match threshold {
                Some(existing) if existing != min => {
                    return Err(conflicting_values(FUNDING_AMOUNT_FIELD));
                }
                _ => threshold = Some(min),
            }
        }

        if let Some(min) = threshold {
            return Ok(CompanyQuery::ThresholdFilter {
                field: FUNDING_AMOUNT_FIELD,
                min,
            });
        }

        let mut fields = FieldFilter::new();
        for (key, raw) in params {
            let (field, value) = match canonical_field(key) {
                Some((field, FieldKind::Integer)) => {
                    let value = raw.trim().parse::<i64>().map_err(|_| {
                        AppError::BadRequest(anyhow::anyhow!(
                            "{} must be an integer, got '{}'",
                            field,
                            raw
                        ))
                    })?;
                    (field, FieldValue::Integer(value))
                }
                Some((field, _)) => (field, FieldValue::Text(raw.to_string())),
                None => (key, FieldValue::Text(raw.to_string())),
            };

            match fields.get(field) {
                Some(existing) if *existing != value => return Err(conflicting_values(field)),
                Some(_) => {}
                None => {
                    fields.insert(field.to_string(), value);
                }
            }
        }

        Ok(CompanyQuery::ExactFilter {
            fields,
            limit: DEFAULT_LIST_LIMIT,
        })
    }

    pub async fn execute(&self, store: &dyn CompanyStore) -> Result<Vec<Company>, AppError> {
        match self {
            CompanyQuery::ExactFilter { fields, limit } => {
                store.find_by_filter(fields, *limit).await
            }
            CompanyQuery::ThresholdFilter { field, min } => {
                store.find_greater_than(field, *min).await
            }
        }
    }
}

fn conflicting_values(field: &str) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("conflicting values for {}", field))
}

fn parse_number(key: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("{} must be a number, got '{}'", key, raw))
        })
}

pub async fn list_companies(
    store: &dyn CompanyStore,
    params: &HashMap<String, String>,
) -> Result<Vec<Company>, AppError> {
    let query = CompanyQuery::from_params(params)?;
    tracing::debug!(?query, "Listing companies");
    query.execute(store).await
}

pub async fn get_company_by_id(store: &dyn CompanyStore, id: &str) -> Result<Company, AppError> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Company not found")))
}
