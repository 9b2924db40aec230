//! Read-only catalogs served to the client: areas, app versions, banners, communities.

use serde::Serialize;

use crate::time::Timestamp;

/// Administrative division, children looked up by parent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppVersion {
    pub id: i64,
    pub platform: String,
    pub version: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub is_force: bool,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub url: Option<String>,
}

/// A residential community with optional coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Community {
    pub id: i64,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A community with its distance in metres from the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyCommunity {
    #[serde(flatten)]
    pub community: Community,
    pub distance: Option<f64>,
}

/// Payload of the app home screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeFeed {
    pub banners: Vec<Banner>,
    pub categories: Vec<crate::category::Category>,
    pub posts: Vec<crate::post::PostView>,
}
