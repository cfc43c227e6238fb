//! Income and expense endpoints
//!
//! One set of generic handlers serves both resources; [`LedgerRoute`] supplies
//! the per-resource failure messages.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use serde::Deserialize;

use crate::models::{Expense, Income};
use crate::services::income::last_seven_days_start;
use crate::services::{parse_ref, CreateEntry, EntryView, LedgerRecord, LedgerService, UpdateEntry};

use super::error::json_body;
use super::{business_filter, run_blocking, ApiError, AppState, RevisionQuery};

/// Messages answered when an operation fails unexpectedly
pub trait LedgerRoute: LedgerRecord {
    const FETCH_ALL: &'static str;
    const FETCH_ONE: &'static str;
    const CREATE: &'static str;
    const UPDATE: &'static str;
    const DELETE: &'static str;
}

impl LedgerRoute for Income {
    const FETCH_ALL: &'static str = "Error fetching incomes";
    const FETCH_ONE: &'static str = "Error fetching income";
    const CREATE: &'static str = "Error creating income";
    const UPDATE: &'static str = "Error updating income";
    const DELETE: &'static str = "Error deleting income";
}

impl LedgerRoute for Expense {
    const FETCH_ALL: &'static str = "Error fetching expenses";
    const FETCH_ONE: &'static str = "Error fetching expense";
    const CREATE: &'static str = "Error creating expense";
    const UPDATE: &'static str = "Error updating expense";
    const DELETE: &'static str = "Error deleting expense";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    pub business_id: Option<String>,
    /// `true` keeps entries dated within the last seven days
    #[serde(rename = "last7Days")]
    pub last7_days: Option<String>,
}

impl LedgerQuery {
    fn last_seven_days(&self) -> bool {
        self.last7_days.as_deref() == Some("true")
    }
}

pub async fn list<T>(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Vec<EntryView<T>>>, ApiError>
where
    T: LedgerRoute,
{
    let Ok(business_id) = business_filter(query.business_id.as_deref()) else {
        return Ok(Json(Vec::new()));
    };
    let since = query
        .last_seven_days()
        .then(|| last_seven_days_start(Local::now().date_naive()));

    run_blocking(&state, T::FETCH_ALL, move |storage| {
        LedgerService::<T>::new(storage).list(business_id, since)
    })
    .await
    .map(Json)
}

pub async fn create<T>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryView<T>>), ApiError>
where
    T: LedgerRoute,
{
    let request = json_body(payload)?;
    run_blocking(&state, T::CREATE, move |storage| {
        LedgerService::<T>::new(storage).create(request)
    })
    .await
    .map(|view| (StatusCode::CREATED, Json(view)))
}

pub async fn get<T>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EntryView<T>>, ApiError>
where
    T: LedgerRoute,
    T::Id: FromStr,
{
    run_blocking(&state, T::FETCH_ONE, move |storage| {
        let id = parse_ref::<T>(&id)?;
        LedgerService::<T>::new(storage).get_view(id)
    })
    .await
    .map(Json)
}

pub async fn update<T>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEntry>, JsonRejection>,
) -> Result<Json<EntryView<T>>, ApiError>
where
    T: LedgerRoute,
    T::Id: FromStr,
{
    let request = json_body(payload)?;
    run_blocking(&state, T::UPDATE, move |storage| {
        let id = parse_ref::<T>(&id)?;
        LedgerService::<T>::new(storage).update(id, request)
    })
    .await
    .map(Json)
}

pub async fn delete<T>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RevisionQuery>,
) -> Result<Json<T>, ApiError>
where
    T: LedgerRoute,
    T::Id: FromStr,
{
    run_blocking(&state, T::DELETE, move |storage| {
        let id = parse_ref::<T>(&id)?;
        LedgerService::<T>::new(storage).delete(id, query.revision)
    })
    .await
    .map(Json)
}
