pub mod database;
pub mod metrics;
pub mod query;
pub mod seed;
pub mod store;

pub use database::MongoDb;
pub use metrics::{get_metrics, init_metrics};
pub use query::{get_company_by_id, list_companies, CompanyQuery, DEFAULT_LIST_LIMIT};
pub use seed::{seed_companies, seed_dataset, SeedFailure, SeedReport};
pub use store::{CompanyStore, InMemoryStore};
