pub mod companies;

pub use companies::CompanyResponse;
