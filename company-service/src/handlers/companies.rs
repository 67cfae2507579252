use crate::dtos::CompanyResponse;
use crate::services::query;
use crate::startup::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use service_core::error::AppError;
use std::collections::HashMap;

pub async fn list_companies(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<Vec<CompanyResponse>>, AppError> {
    let Query(params) = params?;
    let companies = query::list_companies(state.store.as_ref(), &params).await?;
    tracing::debug!(count = companies.len(), "Listed companies");
    Ok(Json(
        companies.into_iter().map(CompanyResponse::from).collect(),
    ))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = query::get_company_by_id(state.store.as_ref(), &id).await?;
    Ok(Json(CompanyResponse::from(company)))
}
