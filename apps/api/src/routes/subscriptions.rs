//! # Subscription Handlers
//!
//! Decode the request, run boundary checks, call the facade, encode the
//! result. Every failure leaves through [`ApiError`].
//!
//! ## Input Rules
//! - Path ids and `user_id` must be UUIDs (`InvalidId`)
//! - Dates are `"MM-YYYY"` (`InvalidDate`); empty query values mean absent
//! - Values are taken verbatim, so surrounding whitespace fails parsing
//! - `service_name` is stripped of markup before it is stored or matched
//! - Create rejects a negative price and an end date before the start date

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use subscriptions_core::validation::{
    parse_id, parse_optional_month, validate_period, validate_price,
};
use subscriptions_core::{MonthDate, Subscription, SubscriptionError, SubscriptionUpdate, SumFilter};

use crate::error::ApiResult;
use crate::sanitize::sanitize;
use crate::AppState;

// =============================================================================
// Request / Response Shapes
// =============================================================================

/// Body of `POST /subscriptions`. Missing fields fall through to validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub message: &'static str,
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SumQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    pub price: Option<String>,
    pub end_date: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /subscriptions/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Subscription>> {
    let id = parse_id(&id)?;
    let subscription = state.subscriptions.get_by_id(id).await?;
    Ok(Json(subscription))
}

/// `GET /subscriptions?user_id=`
pub async fn list_by_user(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Subscription>>> {
    let Query(query) = query?;
    let user_id = parse_id(query.user_id.as_deref().unwrap_or_default())?;

    let subscriptions = state.subscriptions.get_list_by_user_id(user_id).await?;
    Ok(Json(subscriptions))
}

/// `GET /subscriptions/price?user_id=&service_name=&from_date=&to_date=`
pub async fn price_sum(
    State(state): State<AppState>,
    query: Result<Query<SumQuery>, QueryRejection>,
) -> ApiResult<Json<i64>> {
    let Query(query) = query?;
    let user_id = parse_id(query.user_id.as_deref().unwrap_or_default())?;

    let filter = SumFilter {
        // Presence is decided on the raw value; markup-only input filters on "".
        service_name: query
            .service_name
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(sanitize),
        from_date: parse_optional_month(query.from_date.as_deref())?,
        to_date: parse_optional_month(query.to_date.as_deref())?,
    };

    let price = state.subscriptions.get_price_sum_by_user_id(user_id, &filter).await?;
    Ok(Json(price))
}

/// `POST /subscriptions`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;

    let user_id = parse_id(&request.user_id)?;
    let start_date = MonthDate::parse(&request.start_date)?;
    let end_date = parse_optional_month(request.end_date.as_deref())?;
    validate_price(request.price)?;
    validate_period(start_date, end_date)?;

    let subscription = Subscription {
        id: Uuid::new_v4(),
        service_name: sanitize(&request.service_name),
        price: request.price,
        user_id,
        start_date,
        end_date,
    };
    state.subscriptions.create(&subscription).await?;
    debug!(id = %subscription.id, "Subscription created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedBody {
            message: "subscription was successfully created",
            id: subscription.id,
        }),
    ))
}

/// `PATCH /subscriptions/{id}?price=&end_date=`
///
/// Unlike create, the new end date is not checked against the stored start date.
pub async fn update_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<UpdateQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let Query(query) = query?;

    let update = SubscriptionUpdate {
        price: parse_optional_price(query.price.as_deref())?,
        end_date: parse_optional_month(query.end_date.as_deref())?,
    };
    state.subscriptions.update_by_id(id, update).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /subscriptions/{id}`
pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.subscriptions.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_optional_price(raw: Option<&str>) -> Result<Option<i64>, SubscriptionError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => {
            let price = value
                .parse::<i64>()
                .map_err(|_| SubscriptionError::InvalidPrice)?;
            validate_price(price)?;
            Ok(Some(price))
        }
    }
}
