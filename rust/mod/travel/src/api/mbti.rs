use axum::extract::State;
use axum::Json;
use serde::Serialize;

use tripmatch_core::{ListResult, MbtiType};

use crate::api::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MbtiSummary {
    code: MbtiType,
    title: &'static str,
    travel_style: &'static str,
    /// Catalog entries recommended for this type.
    destinations: usize,
}

/// GET /mbti: the sixteen types in selector order.
pub(super) async fn list(State(svc): State<AppState>) -> Json<ListResult<MbtiSummary>> {
    let items = MbtiType::ALL
        .into_iter()
        .map(|t| MbtiSummary {
            code: t,
            title: t.title(),
            travel_style: t.travel_style(),
            destinations: svc.catalog().all().iter().filter(|d| d.is_for(t)).count(),
        })
        .collect();
    Json(ListResult::new(items))
}
