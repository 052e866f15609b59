use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    Aggregates, Ammo, AmmoItem, CombatLoad, CombatLoadLine, EdlLine, Equipment, EquipmentItem,
    Exercise, ExerciseEdl, ExerciseTotals, SqliteStore, StoreError, Unit,
};

#[derive(Clone)]
pub struct AppState {
    store: Arc<SqliteStore>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    fn store(&self) -> &SqliteStore {
        &self.store
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        if value.is_constraint_violation() {
            return ApiError::Conflict(value.to_string());
        }
        match value {
            StoreError::Validation(err) => ApiError::Invalid(err.to_string()),
            StoreError::InvalidData(message) => ApiError::Invalid(message),
            other => {
                warn!(error = %other, "store failure");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct CombatLoadPayload {
    ammo_item_id: i64,
}

#[derive(Debug, Deserialize)]
struct ExerciseUnitPayload {
    unit_id: i64,
}

#[derive(Debug, Deserialize)]
struct EdlPayload {
    unit_id: i64,
    equipment_item_id: i64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ammo", get(list_ammo).post(create_ammo))
        .route("/ammo/:id", get(get_ammo).put(update_ammo).delete(delete_ammo))
        .route("/ammo_items", get(list_ammo_items).post(create_ammo_item))
        .route(
            "/ammo_items/:id",
            get(get_ammo_item)
                .put(update_ammo_item)
                .delete(delete_ammo_item),
        )
        .route("/equipment", get(list_equipment).post(create_equipment))
        .route(
            "/equipment/:id",
            get(get_equipment).put(update_equipment).delete(delete_equipment),
        )
        .route(
            "/equipment/:id/combat_loads",
            get(list_combat_loads).post(add_combat_load),
        )
        .route("/combat_loads/:id", delete(remove_combat_load))
        .route(
            "/equipment_items",
            get(list_equipment_items).post(create_equipment_item),
        )
        .route(
            "/equipment_items/:id",
            get(get_equipment_item)
                .put(update_equipment_item)
                .delete(delete_equipment_item),
        )
        .route("/units", get(list_units).post(create_unit))
        .route(
            "/units/:id",
            get(get_unit).put(update_unit).delete(delete_unit),
        )
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/exercises/:id",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
        .route(
            "/exercises/:id/units",
            get(list_exercise_units).post(add_exercise_unit),
        )
        .route(
            "/exercises/:id/units/:unit_id",
            delete(remove_exercise_unit),
        )
        .route("/exercises/:id/edl", get(list_edl).post(add_edl_entry))
        .route("/edl/:id", delete(remove_edl_entry))
        .route("/exercises/:id/totals", get(exercise_totals))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, store: SqliteStore) -> std::io::Result<()> {
    let state = AppState::new(store);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn deleted(removed: bool, kind: &str, id: i64) -> ApiResult<StatusCode> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("{kind} {id} not found")))
    }
}

fn check_path_id(path_id: i64, payload_id: i64) -> ApiResult<()> {
    if payload_id != 0 && payload_id != path_id {
        return Err(ApiError::invalid(
            "id in payload does not match path parameter",
        ));
    }
    Ok(())
}

async fn list_ammo(State(state): State<AppState>) -> ApiResult<Json<Vec<Ammo>>> {
    Ok(Json(state.store().list_ammo()?))
}

async fn create_ammo(
    State(state): State<AppState>,
    Json(ammo): Json<Ammo>,
) -> ApiResult<(StatusCode, Json<Ammo>)> {
    let created = state.store().create_ammo(&ammo)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_ammo(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Ammo>> {
    state
        .store()
        .get_ammo(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("ammo {id} not found")))
}

async fn update_ammo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(ammo): Json<Ammo>,
) -> ApiResult<Json<Ammo>> {
    check_path_id(id, ammo.id)?;
    let ammo = Ammo { id, ..ammo };
    if !state.store().update_ammo(&ammo)? {
        return Err(ApiError::not_found(format!("ammo {id} not found")));
    }
    Ok(Json(ammo))
}

async fn delete_ammo(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    deleted(state.store().delete_ammo(id)?, "ammo", id)
}

async fn list_ammo_items(State(state): State<AppState>) -> ApiResult<Json<Vec<AmmoItem>>> {
    Ok(Json(state.store().list_ammo_items()?))
}

async fn create_ammo_item(
    State(state): State<AppState>,
    Json(item): Json<AmmoItem>,
) -> ApiResult<(StatusCode, Json<AmmoItem>)> {
    let created = state.store().create_ammo_item(&item)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_ammo_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AmmoItem>> {
    state
        .store()
        .get_ammo_item(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("ammo item {id} not found")))
}

async fn update_ammo_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(item): Json<AmmoItem>,
) -> ApiResult<Json<AmmoItem>> {
    check_path_id(id, item.id)?;
    let item = AmmoItem { id, ..item };
    if !state.store().update_ammo_item(&item)? {
        return Err(ApiError::not_found(format!("ammo item {id} not found")));
    }
    Ok(Json(item))
}

async fn delete_ammo_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(state.store().delete_ammo_item(id)?, "ammo item", id)
}

async fn list_equipment(State(state): State<AppState>) -> ApiResult<Json<Vec<Equipment>>> {
    Ok(Json(state.store().list_equipment()?))
}

async fn create_equipment(
    State(state): State<AppState>,
    Json(equipment): Json<Equipment>,
) -> ApiResult<(StatusCode, Json<Equipment>)> {
    let created = state.store().create_equipment(&equipment)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Equipment>> {
    state
        .store()
        .get_equipment(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("equipment {id} not found")))
}

async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(equipment): Json<Equipment>,
) -> ApiResult<Json<Equipment>> {
    check_path_id(id, equipment.id)?;
    let equipment = Equipment { id, ..equipment };
    if !state.store().update_equipment(&equipment)? {
        return Err(ApiError::not_found(format!("equipment {id} not found")));
    }
    Ok(Json(equipment))
}

async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(state.store().delete_equipment(id)?, "equipment", id)
}

async fn list_combat_loads(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<CombatLoadLine>>> {
    if state.store().get_equipment(id)?.is_none() {
        return Err(ApiError::not_found(format!("equipment {id} not found")));
    }
    Ok(Json(state.store().combat_loads(id)?))
}

async fn add_combat_load(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CombatLoadPayload>,
) -> ApiResult<(StatusCode, Json<CombatLoad>)> {
    let load = state.store().add_combat_load(id, payload.ammo_item_id)?;
    Ok((StatusCode::CREATED, Json(load)))
}

async fn remove_combat_load(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(state.store().remove_combat_load(id)?, "combat load", id)
}

async fn list_equipment_items(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EquipmentItem>>> {
    Ok(Json(state.store().list_equipment_items()?))
}

async fn create_equipment_item(
    State(state): State<AppState>,
    Json(item): Json<EquipmentItem>,
) -> ApiResult<(StatusCode, Json<EquipmentItem>)> {
    let created = state.store().create_equipment_item(&item)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_equipment_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EquipmentItem>> {
    state
        .store()
        .get_equipment_item(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("equipment item {id} not found")))
}

async fn update_equipment_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(item): Json<EquipmentItem>,
) -> ApiResult<Json<EquipmentItem>> {
    check_path_id(id, item.id)?;
    let item = EquipmentItem { id, ..item };
    if !state.store().update_equipment_item(&item)? {
        return Err(ApiError::not_found(format!("equipment item {id} not found")));
    }
    Ok(Json(item))
}

async fn delete_equipment_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(state.store().delete_equipment_item(id)?, "equipment item", id)
}

async fn list_units(State(state): State<AppState>) -> ApiResult<Json<Vec<Unit>>> {
    Ok(Json(state.store().list_units()?))
}

async fn create_unit(
    State(state): State<AppState>,
    Json(unit): Json<Unit>,
) -> ApiResult<(StatusCode, Json<Unit>)> {
    let created = state.store().create_unit(&unit)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_unit(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Unit>> {
    state
        .store()
        .get_unit(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("unit {id} not found")))
}

async fn update_unit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(unit): Json<Unit>,
) -> ApiResult<Json<Unit>> {
    check_path_id(id, unit.id)?;
    let unit = Unit { id, ..unit };
    if !state.store().update_unit(&unit)? {
        return Err(ApiError::not_found(format!("unit {id} not found")));
    }
    Ok(Json(unit))
}

async fn delete_unit(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    deleted(state.store().delete_unit(id)?, "unit", id)
}

async fn list_exercises(State(state): State<AppState>) -> ApiResult<Json<Vec<Exercise>>> {
    Ok(Json(state.store().list_exercises()?))
}

async fn create_exercise(
    State(state): State<AppState>,
    Json(exercise): Json<Exercise>,
) -> ApiResult<(StatusCode, Json<Exercise>)> {
    let created = state.store().create_exercise(&exercise)?;
    Ok((StatusCode::CREATED, Json(created)))
}

fn require_exercise(state: &AppState, id: i64) -> ApiResult<Exercise> {
    state
        .store()
        .get_exercise(id)?
        .ok_or_else(|| ApiError::not_found(format!("exercise {id} not found")))
}

async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Exercise>> {
    Ok(Json(require_exercise(&state, id)?))
}

async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(exercise): Json<Exercise>,
) -> ApiResult<Json<Exercise>> {
    check_path_id(id, exercise.id)?;
    let exercise = Exercise { id, ..exercise };
    if !state.store().update_exercise(&exercise)? {
        return Err(ApiError::not_found(format!("exercise {id} not found")));
    }
    Ok(Json(exercise))
}

async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(state.store().delete_exercise(id)?, "exercise", id)
}

async fn list_exercise_units(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Unit>>> {
    require_exercise(&state, id)?;
    Ok(Json(state.store().exercise_units(id)?))
}

async fn add_exercise_unit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExerciseUnitPayload>,
) -> ApiResult<StatusCode> {
    if state.store().add_exercise_unit(id, payload.unit_id)? {
        Ok(StatusCode::CREATED)
    } else {
        Ok(StatusCode::OK)
    }
}

async fn remove_exercise_unit(
    State(state): State<AppState>,
    Path((id, unit_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    if state.store().remove_exercise_unit(id, unit_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!(
            "unit {unit_id} is not attached to exercise {id}"
        )))
    }
}

async fn list_edl(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<EdlLine>>> {
    require_exercise(&state, id)?;
    Ok(Json(state.store().edl_lines(id)?))
}

async fn add_edl_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EdlPayload>,
) -> ApiResult<(StatusCode, Json<ExerciseEdl>)> {
    let entry = state
        .store()
        .add_edl_entry(id, payload.unit_id, payload.equipment_item_id)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn remove_edl_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(state.store().remove_edl_entry(id)?, "edl line", id)
}

async fn exercise_totals(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ExerciseTotals>> {
    require_exercise(&state, id)?;
    Ok(Json(state.store().exercise_totals(id)?))
}
