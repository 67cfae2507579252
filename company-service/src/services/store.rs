use crate::models::{Company, FieldFilter, FieldValue, StoredValue};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson};
use service_core::error::AppError;
use tokio::sync::RwLock;

/// Persistence gateway for company records.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Persists one record and returns the identifier the store assigned.
    async fn insert(&self, company: &Company) -> Result<ObjectId, AppError>;

    /// Removes every record, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, AppError>;

    /// Records matching every condition in `filter`, at most `limit` of them,
    /// in store order.
    async fn find_by_filter(&self, filter: &FieldFilter, limit: i64)
        -> Result<Vec<Company>, AppError>;

    /// All records whose numeric `field` is strictly greater than `threshold`.
    async fn find_greater_than(&self, field: &str, threshold: f64)
        -> Result<Vec<Company>, AppError>;

    /// `Ok(None)` when the identifier is well formed but unknown;
    /// `AppError::BadRequest` when it is malformed.
    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

pub fn parse_company_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest(anyhow::anyhow!("invalid id")))
}

impl From<&FieldValue> for Bson {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => Bson::String(s.clone()),
            FieldValue::Integer(i) => Bson::Int64(*i),
        }
    }
}

fn matches_filter(company: &Company, filter: &FieldFilter) -> bool {
    filter
        .iter()
        .all(|(field, expected)| match (company.field(field), expected) {
            (Some(StoredValue::Text(actual)), FieldValue::Text(expected)) => actual == expected,
            (Some(StoredValue::Number(actual)), FieldValue::Integer(expected)) => {
                actual == *expected as f64
            }
            _ => false,
        })
}

/// Process-local store with the same matching rules as the MongoDB gateway.
/// Records keep insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    companies: RwLock<Vec<Company>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.companies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.companies.read().await.is_empty()
    }

    async fn select<F>(&self, limit: Option<usize>, predicate: F) -> Vec<Company>
    where
        F: Fn(&Company) -> bool + Send,
    {
        let companies = self.companies.read().await;
        let matching = companies.iter().filter(|c| predicate(*c)).cloned();
        match limit {
            Some(max) => matching.take(max).collect(),
            None => matching.collect(),
        }
    }
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    async fn insert(&self, company: &Company) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        let mut stored = company.clone();
        stored.id = Some(id);
        self.companies.write().await.push(stored);
        Ok(id)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut companies = self.companies.write().await;
        let deleted = companies.len() as u64;
        companies.clear();
        Ok(deleted)
    }

    async fn find_by_filter(
        &self,
        filter: &FieldFilter,
        limit: i64,
    ) -> Result<Vec<Company>, AppError> {
        // MongoDB treats a limit of 0 as "no limit"
        let limit = usize::try_from(limit).ok().filter(|l| *l > 0);
        Ok(self.select(limit, |c| matches_filter(c, filter)).await)
    }

    async fn find_greater_than(
        &self,
        field: &str,
        threshold: f64,
    ) -> Result<Vec<Company>, AppError> {
        Ok(self
            .select(None, |c| {
                matches!(c.field(field), Some(StoredValue::Number(value)) if value > threshold)
            })
            .await)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError> {
        let id = parse_company_id(id)?;
        let companies = self.companies.read().await;
        Ok(companies.iter().find(|c| c.id == Some(id)).cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
