//! Public helpers for the client: site values, uploads, areas, versions
//! and communities.

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::catalog::{AppVersion, Area, NearbyCommunity};
use community_domain::error::{CommunityError, ValidationError};
use community_domain::geo::Point;
use community_domain::upload::{UploadKind, extension_of};

use crate::api::{ApiResult, non_blank};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::Query;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AreaQuery {
    #[serde(default)]
    pub pid: i64,
}

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Deserialize)]
pub struct CommunityQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl CommunityQuery {
    fn origin(&self) -> Option<Point> {
        self.lat.zip(self.lng).map(|(lat, lng)| Point::new(lat, lng))
    }
}

#[derive(Debug, Serialize)]
pub struct Value {
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Uploaded {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct List<T> {
    pub list: Vec<T>,
}

/// The `file` part of an upload.
struct FilePart {
    name: String,
    mime: String,
    bytes: Bytes,
}

/// `GET /api/common/config`
pub async fn config<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Value> {
    let name = query.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required("name").into());
    }
    let value = state.settings.public_value(name).await?;
    Ok(Envelope::ok("ok", Value { value }))
}

/// `GET /api/common/config_all`
pub async fn config_all<R: Store>(
    State(state): State<AppState<R>>,
) -> ApiResult<BTreeMap<String, Option<String>>> {
    let values = state.settings.public_values().await?;
    Ok(Envelope::ok("ok", values))
}

/// `POST /api/common/upload`, a multipart form with `file` and `type`.
pub async fn upload<R: Store>(
    State(state): State<AppState<R>>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Uploaded> {
    let mut kind = None;
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        let part = field.name().map(ToString::to_string);
        match part.as_deref() {
            Some("type") => kind = non_blank(Some(field.text().await?)),
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                file = Some(FilePart { name, mime, bytes });
            }
            _ => {}
        }
    }

    let kind = match kind {
        Some(raw) => UploadKind::from_str(raw.trim())?,
        None => UploadKind::default(),
    };
    let file = file.ok_or(ValidationError::Required("file"))?;
    let extension = extension_of(&file.name).ok_or(ValidationError::Invalid {
        field: "file",
        reason: "file name has no extension",
    })?;
    kind.check(&file.mime, &extension, file.bytes.len() as u64)?;

    let url = state
        .uploads
        .save(kind, &extension, &file.bytes)
        .await
        .map_err(CommunityError::from)?;
    Ok(Envelope::ok("uploaded", Uploaded { url }))
}

/// `GET /api/common/area`
pub async fn area<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<AreaQuery>,
) -> ApiResult<List<Area>> {
    let list = state.catalog.areas(query.pid).await?;
    Ok(Envelope::ok("ok", List { list }))
}

/// `GET /api/common/version`
pub async fn version<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<Option<AppVersion>> {
    let version = state.catalog.latest_version(&query.platform).await?;
    Ok(Envelope::ok("ok", version))
}

/// `GET /api/common/community`
pub async fn community<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<CommunityQuery>,
) -> ApiResult<List<NearbyCommunity>> {
    let list = state.catalog.communities(query.origin()).await?;
    Ok(Envelope::ok("ok", List { list }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_need_both_coordinates_for_origin() {
        let partial = CommunityQuery {
            lat: Some(30.0),
            lng: None,
        };
        assert_eq!(partial.origin(), None);

        let full = CommunityQuery {
            lat: Some(30.0),
            lng: Some(120.0),
        };
        assert_eq!(full.origin(), Some(Point::new(30.0, 120.0)));
    }
}
