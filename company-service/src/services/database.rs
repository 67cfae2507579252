use crate::models::{Company, FieldFilter};
use crate::services::store::{parse_company_id, CompanyStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

pub const COMPANIES_COLLECTION: &str = "companies";
pub const DEFAULT_DATABASE: &str = "project-mongo-api-live";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Connects to `uri`. Without an explicit `database` the one named in the
    /// URI path is used, then [`DEFAULT_DATABASE`].
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };
        tracing::info!(database = %db.name(), "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for company-service");

        // Most list queries filter on the funding stage
        let stage_index = IndexModel::builder()
            .keys(doc! { "fundingStage": 1 })
            .options(
                IndexOptions::builder()
                    .name("funding_stage_idx".to_string())
                    .build(),
            )
            .build();

        self.companies()
            .create_index(stage_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create fundingStage index: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on companies.fundingStage");

        Ok(())
    }

    pub fn companies(&self) -> Collection<Company> {
        self.db.collection(COMPANIES_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn find_all(
        &self,
        filter: Document,
        options: Option<FindOptions>,
    ) -> Result<Vec<Company>, AppError> {
        let cursor = self
            .companies()
            .find(filter, options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query companies: {}", e);
                AppError::from(e)
            })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect companies: {}", e);
            AppError::from(e)
        })
    }
}

#[async_trait]
impl CompanyStore for MongoDb {
    async fn insert(&self, company: &Company) -> Result<ObjectId, AppError> {
        let result = self.companies().insert_one(company, None).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "MongoDB returned a non-ObjectId identifier: {}",
                result.inserted_id
            ))
        })
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = self.companies().delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }

    async fn find_by_filter(
        &self,
        filter: &FieldFilter,
        limit: i64,
    ) -> Result<Vec<Company>, AppError> {
        let query: Document = filter
            .iter()
            .map(|(field, value)| (field.clone(), Bson::from(value)))
            .collect();
        let options = FindOptions::builder().limit(limit).build();
        self.find_all(query, Some(options)).await
    }

    async fn find_greater_than(
        &self,
        field: &str,
        threshold: f64,
    ) -> Result<Vec<Company>, AppError> {
        let mut query = Document::new();
        query.insert(field, doc! { "$gt": threshold });
        self.find_all(query, None).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError> {
        let id = parse_company_id(id)?;
        Ok(self.companies().find_one(doc! { "_id": id }, None).await?)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
