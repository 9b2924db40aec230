//! Delivery addresses.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::address::{Address, AddressForm};
use community_domain::id::AddressId;

use crate::api::{ApiResult, IdBody, flag};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::Json;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddressRequest {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub address: String,
    #[serde(deserialize_with = "flag")]
    pub is_default: bool,
}

impl From<AddressRequest> for AddressForm {
    fn from(req: AddressRequest) -> Self {
        Self {
            name: req.name,
            mobile: req.mobile,
            province: req.province,
            city: req.city,
            district: req.district,
            address: req.address,
            is_default: req.is_default,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: AddressId,
}

#[derive(Debug, Serialize)]
pub struct Addresses {
    pub list: Vec<Address>,
}

/// `GET /api/address/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> ApiResult<Addresses> {
    let list = state.addresses.list(user.id).await?;
    Ok(Envelope::ok("ok", Addresses { list }))
}

/// `POST /api/address/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<AddressRequest>,
) -> ApiResult<Created> {
    let id = state.addresses.create(user.id, req.into()).await?;
    Ok(Envelope::ok("address added", Created { id }))
}

/// `POST /api/address/update`
pub async fn update<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<AddressRequest>,
) -> ApiResult<()> {
    let id = AddressId::new(req.id);
    state.addresses.update(user.id, id, req.into()).await?;
    Ok(Envelope::done("address updated"))
}

/// `POST /api/address/delete`
pub async fn delete<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<IdBody>,
) -> ApiResult<()> {
    state.addresses.delete(user.id, AddressId::new(body.id)).await?;
    Ok(Envelope::done("address deleted"))
}
