use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FUNDING_AMOUNT_FIELD: &str = "FundingAmountUSD";

/// A funded company as stored in the `companies` collection.
///
/// Field names follow the bundled dataset verbatim, including the odd casing
/// of `FundingAmountUSD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub vertical: String,
    #[serde(rename = "FundingAmountUSD", default)]
    pub funding_amount_usd: Option<f64>,
    #[serde(rename = "fundingStage", default)]
    pub funding_stage: String,
    #[serde(rename = "fundingDate", default)]
    pub funding_date: String,
}

/// Borrowed view of one stored field, used for matching without a BSON
/// round-trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoredValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl Company {
    /// Value of the stored field `name`; `None` when the field is unknown or
    /// holds no value.
    pub fn field(&self, name: &str) -> Option<StoredValue<'_>> {
        match name {
            "index" => Some(StoredValue::Number(self.index as f64)),
            "company" => Some(StoredValue::Text(&self.company)),
            "website" => Some(StoredValue::Text(&self.website)),
            "region" => Some(StoredValue::Text(&self.region)),
            "vertical" => Some(StoredValue::Text(&self.vertical)),
            FUNDING_AMOUNT_FIELD => self.funding_amount_usd.map(StoredValue::Number),
            "fundingStage" => Some(StoredValue::Text(&self.funding_stage)),
            "fundingDate" => Some(StoredValue::Text(&self.funding_date)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Number,
}

/// Stored field names and how query values for them are coerced.
pub const COMPANY_FIELDS: &[(&str, FieldKind)] = &[
    ("index", FieldKind::Integer),
    ("company", FieldKind::Text),
    ("website", FieldKind::Text),
    ("region", FieldKind::Text),
    ("vertical", FieldKind::Text),
    (FUNDING_AMOUNT_FIELD, FieldKind::Number),
    ("fundingStage", FieldKind::Text),
    ("fundingDate", FieldKind::Text),
];

/// Resolves a client-supplied key to its stored field name, ignoring case.
pub fn canonical_field(name: &str) -> Option<(&'static str, FieldKind)> {
    COMPANY_FIELDS
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case(name))
        .copied()
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

/// Exact-match conditions keyed by stored field name.
pub type FieldFilter = BTreeMap<String, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_field_ignores_case() {
        assert_eq!(
            canonical_field("fundingamountusd"),
            Some((FUNDING_AMOUNT_FIELD, FieldKind::Number))
        );
        assert_eq!(
            canonical_field("FUNDINGSTAGE"),
            Some(("fundingStage", FieldKind::Text))
        );
        assert_eq!(canonical_field("ceo"), None);
    }

    #[test]
    fn field_lookup_uses_stored_names() {
        let company = Company {
            id: None,
            index: 4,
            company: "Acme".into(),
            website: String::new(),
            region: "Europe".into(),
            vertical: String::new(),
            funding_amount_usd: None,
            funding_stage: "Seed".into(),
            funding_date: String::new(),
        };

        assert_eq!(company.field("index"), Some(StoredValue::Number(4.0)));
        assert_eq!(company.field("fundingStage"), Some(StoredValue::Text("Seed")));
        assert_eq!(company.field(FUNDING_AMOUNT_FIELD), None);
        assert_eq!(company.field("FUNDINGSTAGE"), None);
        assert_eq!(company.field("ceo"), None);
    }

    #[test]
    fn deserializes_dataset_record_with_null_amount() {
        let company: Company = serde_json::from_value(serde_json::json!({
            "index": 7,
            "company": "Acme",
            "website": "acme.io",
            "region": "Europe",
            "vertical": "Fintech",
            "FundingAmountUSD": null,
            "fundingStage": "Seed",
            "fundingDate": "Jan-21"
        }))
        .unwrap();

        assert_eq!(company.id, None);
        assert_eq!(company.index, 7);
        assert_eq!(company.funding_amount_usd, None);
        assert_eq!(company.funding_stage, "Seed");
    }

    #[test]
    fn serializes_stored_field_names() {
        let company = Company {
            id: None,
            index: 1,
            company: "Globex".into(),
            website: "globex.com".into(),
            region: "USA".into(),
            vertical: "Cybersecurity".into(),
            funding_amount_usd: Some(5_000_000.0),
            funding_stage: "Series A".into(),
            funding_date: "Feb-21".into(),
        };

        let doc = mongodb::bson::to_document(&company).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_f64(FUNDING_AMOUNT_FIELD).unwrap(), 5_000_000.0);
        assert_eq!(doc.get_str("fundingStage").unwrap(), "Series A");
    }
}
