//! Site configuration administration.

use std::collections::BTreeMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::id::SettingId;
use community_domain::setting::{NewSetting, Setting, SettingValue};

use crate::api::{ApiResult, non_blank};
use crate::auth::AdminUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}

/// One entry of a bulk update. Entries without a name are skipped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValueEntry {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSettingRequest {
    pub name: String,
    pub group: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tip: Option<String>,
    pub value: Option<String>,
    pub sort: i64,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: SettingId,
}

#[derive(Debug, Serialize)]
pub struct Updated {
    pub count: u64,
}

/// `GET /api/config/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<BTreeMap<String, Vec<Setting>>> {
    let groups = state.settings.list_grouped(non_blank(query.group)).await?;
    Ok(Envelope::ok("ok", groups))
}

/// `GET /api/config/get`
pub async fn get<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Setting> {
    let setting = state.settings.get(query.name.trim()).await?;
    Ok(Envelope::ok("ok", setting))
}

/// `POST /api/config/update`
pub async fn update<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(entries): Json<Vec<ValueEntry>>,
) -> ApiResult<Updated> {
    let values = entries
        .into_iter()
        .map(|entry| SettingValue {
            name: entry.name,
            value: entry.value,
        })
        .collect();
    let count = state.settings.update(values).await?;
    Ok(Envelope::ok("settings updated", Updated { count }))
}

/// `POST /api/config/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(req): Json<CreateSettingRequest>,
) -> ApiResult<Created> {
    let id = state
        .settings
        .create(NewSetting {
            name: req.name,
            group: req.group,
            title: req.title,
            kind: req.kind,
            tip: non_blank(req.tip),
            value: req.value,
            sort: req.sort,
        })
        .await?;
    Ok(Envelope::ok("setting created", Created { id }))
}

/// `POST /api/config/delete`
pub async fn delete<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(body): Json<NameQuery>,
) -> ApiResult<()> {
    state.settings.delete(body.name.trim()).await?;
    Ok(Envelope::done("setting deleted"))
}
