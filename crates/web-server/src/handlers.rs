use crate::{AppState, error::AppError};
use axum::{
    Json, async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, Path, Request, State, rejection::JsonRejection},
    http::StatusCode,
};
use configuration::IdRoute;
use core_types::{CompanyNameUpdate, CompanyUpdate, NewCompany, Schema};
use database::{Record, WriteOutcome};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

type Rows = Json<Vec<Record>>;

/// Body of a successful create.
#[derive(Debug, Serialize)]
pub struct CreatedCompany {
    pub msg: &'static str,
    pub result: NewCompany,
}

/// Body of a successful full update.
#[derive(Debug, Serialize)]
pub struct UpdatedCompany {
    pub msg: &'static str,
    pub rows: WriteOutcome,
}

/// A write payload as untyped JSON.
///
/// A request without a JSON content type, or with an empty body, carries no
/// payload and is validated as an empty object; malformed JSON is rejected
/// as is.
pub struct JsonPayload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        // Buffering here keeps `DefaultBodyLimit` in force.
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.is_empty() {
            return Ok(Self(Value::Object(Map::new())));
        }

        let mut buffered = Request::new(Body::from(bytes));
        *buffered.headers_mut() = headers;
        match Json::<Value>::from_request(buffered, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(Self(Value::Object(Map::new()))),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

fn respond(rows: Vec<Record>) -> Rows {
    tracing::debug!(rows = rows.len(), "Responding with rows.");
    Json(rows)
}

/// # GET /api/agents
pub async fn list_agents(State(state): State<Arc<AppState>>) -> Result<Rows, AppError> {
    Ok(respond(state.repo.list_agents().await?))
}

/// # GET /api/companys
pub async fn list_companies(State(state): State<Arc<AppState>>) -> Result<Rows, AppError> {
    Ok(respond(state.repo.list_companies().await?))
}

/// # GET /api/company/:id
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Rows, AppError> {
    state.check_id(IdRoute::GetCompany, &id)?;
    Ok(respond(state.repo.find_company(&id).await?))
}

/// # POST /api/company
/// Inserts a new company; a taken identifier answers 409 and leaves the
/// existing row untouched.
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    JsonPayload(payload): JsonPayload,
) -> Result<(StatusCode, Json<CreatedCompany>), AppError> {
    let company = NewCompany::validate(&payload, state.unknown_fields())?;

    state.repo.insert_company(&company).await?;
    tracing::info!(company_id = %company.company_id, "Company created.");

    Ok((
        StatusCode::CREATED,
        Json(CreatedCompany {
            msg: "Created Company",
            result: company,
        }),
    ))
}

/// # DELETE /api/company/:id
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WriteOutcome>, AppError> {
    state.check_id(IdRoute::DeleteCompany, &id)?;

    let outcome = state.repo.delete_company(&id).await?;
    if outcome.touched_nothing() {
        return Err(AppError::NotFound);
    }
    tracing::info!(company_id = %id, "Company deleted.");
    Ok(Json(outcome))
}

/// # PATCH /api/company/:id
/// Renames a company. A missing id is not an error: the outcome simply
/// reports zero affected rows.
pub async fn patch_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<WriteOutcome>, AppError> {
    let update = CompanyNameUpdate::validate(&payload, state.unknown_fields())?;
    state.check_id(IdRoute::PatchCompany, &id)?;

    let outcome = state.repo.rename_company(&id, &update).await?;
    Ok(Json(outcome))
}

/// # PUT /api/company/:id
pub async fn put_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<UpdatedCompany>, AppError> {
    let update = CompanyUpdate::validate(&payload, state.unknown_fields())?;
    state.check_id(IdRoute::PutCompany, &id)?;

    let rows = state.repo.update_company(&id, &update).await?;
    Ok(Json(UpdatedCompany {
        msg: "Updated Company",
        rows,
    }))
}

/// # GET /api/customers
pub async fn list_customers(State(state): State<Arc<AppState>>) -> Result<Rows, AppError> {
    Ok(respond(state.repo.list_customers().await?))
}

/// # GET /api/customers/:country
pub async fn customers_by_country(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
) -> Result<Rows, AppError> {
    Ok(respond(state.repo.customers_by_country(&country).await?))
}

/// # GET /api/foods
pub async fn list_foods(State(state): State<Arc<AppState>>) -> Result<Rows, AppError> {
    Ok(respond(state.repo.list_foods().await?))
}

/// # GET /api/foods/:id
pub async fn get_food(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Rows, AppError> {
    state.check_id(IdRoute::GetFood, &id)?;
    Ok(respond(state.repo.find_food(&id).await?))
}
