//! Reports against posts and comments.

use std::str::FromStr;

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::error::ValidationError;
use community_domain::id::ReportId;
use community_domain::report::{NewReport, ReportKind, ReportReason};
use community_domain::time::now;

use crate::api::{ApiResult, non_blank};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReasonsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateReportRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub target_id: i64,
    pub reason: String,
    pub content: Option<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: ReportId,
}

fn report_kind(raw: Option<String>) -> Result<ReportKind, ValidationError> {
    let raw = non_blank(raw).ok_or(ValidationError::Required("type"))?;
    ReportKind::from_str(raw.trim())
}

/// `GET /api/report/reasons`
pub async fn reasons<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<ReasonsQuery>,
) -> ApiResult<Vec<ReportReason>> {
    let reasons = state.reports.reasons(report_kind(query.kind)?).await?;
    Ok(Envelope::ok("ok", reasons))
}

/// `POST /api/report/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<CreateReportRequest>,
) -> ApiResult<Created> {
    let id = state
        .reports
        .create(NewReport {
            user_id: user.id,
            kind: report_kind(req.kind)?,
            target_id: req.target_id,
            reason: req.reason,
            content: non_blank(req.content),
            images: req.images,
            created_at: now(),
        })
        .await?;
    Ok(Envelope::ok("report submitted", Created { id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_require_type_when_missing_or_blank() {
        assert_eq!(report_kind(None), Err(ValidationError::Required("type")));
        assert_eq!(
            report_kind(Some(" ".to_string())),
            Err(ValidationError::Required("type"))
        );
        assert_eq!(report_kind(Some("comment".to_string())), Ok(ReportKind::Comment));
    }
}
