use crate::models::Company;
use serde::Serialize;

/// JSON shape of a company: the stored fields plus `_id` as a hex string.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub index: i64,
    pub company: String,
    pub website: String,
    pub region: String,
    pub vertical: String,
    #[serde(rename = "FundingAmountUSD")]
    pub funding_amount_usd: Option<f64>,
    #[serde(rename = "fundingStage")]
    pub funding_stage: String,
    #[serde(rename = "fundingDate")]
    pub funding_date: String,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.map(|id| id.to_hex()),
            index: company.index,
            company: company.company,
            website: company.website,
            region: company.region,
            vertical: company.vertical,
            funding_amount_usd: company.funding_amount_usd,
            funding_stage: company.funding_stage,
            funding_date: company.funding_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn identifier_is_rendered_as_hex() {
        let id = ObjectId::new();
        let response = CompanyResponse::from(Company {
            id: Some(id),
            index: 3,
            company: "Acme".into(),
            website: "acme.io".into(),
            region: "Europe".into(),
            vertical: "Fintech".into(),
            funding_amount_usd: None,
            funding_stage: "Seed".into(),
            funding_date: "Jan-21".into(),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["_id"], id.to_hex());
        assert_eq!(json["FundingAmountUSD"], serde_json::Value::Null);
        assert_eq!(json["fundingStage"], "Seed");
    }
}
