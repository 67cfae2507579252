pub mod company;

pub use company::{
    canonical_field, Company, FieldFilter, FieldKind, FieldValue, StoredValue,
    COMPANY_FIELDS,
    FUNDING_AMOUNT_FIELD,
};
