pub mod companies;
pub mod health;

pub use companies::{get_company, list_companies};
pub use health::{health_check, index, metrics_endpoint, readiness_check};
