use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::info;

use crate::access::Capability;
use crate::ledger::Ledger;
use crate::models::kamar::{
    PaymentEdit, PaymentPattern, RoomView, TenantEdit, UpdatePaymentRequest, UpdateTenantRequest,
};
use crate::routes::error::ApiError;
use crate::routes::extractor::{ApiJson, ApiPath, AuthSession};
use crate::state::AppState;

// Semua kamar, disaring sesuai level akses
pub async fn get_rooms(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    session.user.require(Capability::ViewTenants)?;
    let ledger = state.sessions.snapshot(&session.token).await?;
    let level = session.user.level;

    let rooms: Vec<RoomView> = ledger
        .rooms()
        .enumerate()
        .map(|(index, room)| RoomView::new(index, room, level))
        .collect();

    let mut body = json!({
        "status": "success",
        "level": level,
        "capabilities": level.capabilities(),
        "rooms": rooms
    });
    if session.user.can(Capability::ViewPayments) {
        body["payment_patterns"] = json!(PaymentPattern::all().collect::<Vec<_>>());
    }

    Ok(Json(body))
}

// Tambah kamar baru dengan nomor setelah kamar terakhir
pub async fn create_room(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let ledger = state
        .sessions
        .apply(&session.token, Capability::AddRoom, Ledger::append_room)
        .await?;

    let index = ledger.len() - 1;
    if let Some(room) = ledger.room(index) {
        info!(user_id = %session.user.id, number = %room.number, "room added");
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Kamar berhasil ditambahkan!",
        "data": room_view(&ledger, index, &session)?
    })))
}

pub async fn update_tenant(
    State(state): State<AppState>,
    session: AuthSession,
    ApiPath((room_index, tenant_index)): ApiPath<(usize, usize)>,
    ApiJson(payload): ApiJson<UpdateTenantRequest>,
) -> Result<Json<Value>, ApiError> {
    session.user.require(Capability::EditTenants)?;
    let edit = TenantEdit::try_from(payload)?;

    let ledger = state
        .sessions
        .apply(&session.token, Capability::EditTenants, |ledger| {
            ledger.set_tenant_field(room_index, tenant_index, edit)
        })
        .await?;

    info!(user_id = %session.user.id, room_index, tenant_index, "tenant updated");

    Ok(Json(json!({
        "status": "success",
        "message": "Data penghuni berhasil diupdate!",
        "data": room_view(&ledger, room_index, &session)?
    })))
}

pub async fn create_payment(
    State(state): State<AppState>,
    session: AuthSession,
    ApiPath((room_index, tenant_index)): ApiPath<(usize, usize)>,
) -> Result<Json<Value>, ApiError> {
    let ledger = state
        .sessions
        .apply(&session.token, Capability::AddPayment, |ledger| {
            ledger.append_payment(room_index, tenant_index)
        })
        .await?;

    info!(user_id = %session.user.id, room_index, tenant_index, "payment period added");

    Ok(Json(json!({
        "status": "success",
        "message": "Pembayaran berhasil ditambahkan!",
        "data": room_view(&ledger, room_index, &session)?
    })))
}

pub async fn update_payment(
    State(state): State<AppState>,
    session: AuthSession,
    ApiPath((room_index, tenant_index, payment_index)): ApiPath<(usize, usize, usize)>,
    ApiJson(payload): ApiJson<UpdatePaymentRequest>,
) -> Result<Json<Value>, ApiError> {
    session.user.require(Capability::EditPayments)?;
    let edit = PaymentEdit::try_from(payload)?;

    let ledger = state
        .sessions
        .apply(&session.token, Capability::EditPayments, |ledger| {
            ledger.set_payment_field(room_index, tenant_index, payment_index, edit)
        })
        .await?;

    info!(
        user_id = %session.user.id,
        room_index,
        tenant_index,
        payment_index,
        "payment updated"
    );

    Ok(Json(json!({
        "status": "success",
        "message": "Pembayaran berhasil diupdate!",
        "data": room_view(&ledger, room_index, &session)?
    })))
}

fn room_view(ledger: &Ledger, index: usize, session: &AuthSession) -> Result<Value, ApiError> {
    let room = ledger
        .room(index)
        .ok_or_else(|| ApiError::not_found("Kamar tidak ditemukan."))?;

    serde_json::to_value(RoomView::new(index, room, session.user.level))
        .map_err(ApiError::internal)
}
