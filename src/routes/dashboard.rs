use axum::{extract::State, response::Json};
use chrono::Local;
use serde_json::{json, Value};

use crate::access::Capability;
use crate::routes::error::ApiError;
use crate::routes::extractor::AuthSession;
use crate::state::AppState;

// Ringkasan kamar dan pembayaran tertunggak
pub async fn get_dashboard(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let ledger = state.sessions.snapshot(&session.token).await?;
    let today = Local::now().date_naive();
    let summary = ledger.summary(today, session.user.can(Capability::ViewPayments));

    Ok(Json(json!({
        "status": "success",
        "today": today,
        "data": summary
    })))
}
