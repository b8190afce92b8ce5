use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Json,
};
use serde::Deserialize;
use tracing::warn;
use crate::circulation::command::bookshelf_cmd::{BookshelfCommand, BookshelfCommandRequest, BookshelfCommandResponse};
use crate::circulation::command::borrow_cmd::{BorrowCommand, BorrowCommandRequest, BorrowCommandResponse};
use crate::circulation::command::detail_cmd::{DetailCommand, DetailCommandRequest, DetailCommandResponse};
use crate::circulation::command::fulfill_cmd::{FulfillCommand, FulfillCommandRequest};
use crate::circulation::command::revoke_cmd::{RevokeCommand, RevokeCommandRequest, RevokeCommandResponse};
use crate::core::command::Command;
use crate::core::controller::{AppState, credential, ServerError};

#[derive(Debug, Deserialize)]
pub struct LibraryPath {
    library: String,
}

#[derive(Debug, Deserialize)]
pub struct WorkPath {
    library: String,
    identifier_type: String,
    identifier: String,
    #[serde(default)]
    mechanism_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PoolPath {
    library: String,
    pool_id: String,
    #[serde(default)]
    mechanism_id: Option<String>,
}

pub async fn bookshelf(
    State(state): State<AppState>,
    Path(path): Path<LibraryPath>,
    headers: HeaderMap) -> Result<Json<BookshelfCommandResponse>, ServerError> {
    let req = BookshelfCommandRequest::new(path.library.as_str(), credential(&headers).as_deref(), false);
    let res = BookshelfCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}

pub async fn borrow(
    State(state): State<AppState>,
    Path(path): Path<WorkPath>,
    headers: HeaderMap) -> Result<(StatusCode, Json<BorrowCommandResponse>), ServerError> {
    let req = BorrowCommandRequest::new(path.library.as_str(), credential(&headers).as_deref(),
                                        path.identifier_type.as_str(), path.identifier.as_str(),
                                        path.mechanism_id.as_deref());
    let res = BorrowCommand::new(state.service.clone()).execute(req).await?;
    let status = if res.outcome.is_new() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(res)))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(path): Path<WorkPath>,
    headers: HeaderMap) -> Result<Json<DetailCommandResponse>, ServerError> {
    let req = DetailCommandRequest::new(path.library.as_str(), credential(&headers).as_deref(),
                                        path.identifier_type.as_str(), path.identifier.as_str());
    let res = DetailCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}

pub async fn fulfill(
    State(state): State<AppState>,
    Path(path): Path<PoolPath>,
    headers: HeaderMap) -> Result<(StatusCode, HeaderMap, Vec<u8>), ServerError> {
    let req = FulfillCommandRequest::new(path.library.as_str(), credential(&headers).as_deref(),
                                         path.pool_id.as_str(), path.mechanism_id.as_deref());
    let res = FulfillCommand::new(state.service.clone()).execute(req).await?;
    let status = StatusCode::from_u16(res.content.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut out = HeaderMap::new();
    for (name, value) in &res.content.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                out.append(name, value);
            }
            _ => warn!(header = name.as_str(), "dropping unrepresentable header"),
        }
    }
    Ok((status, out, res.content.body))
}

pub async fn revoke(
    State(state): State<AppState>,
    Path(path): Path<PoolPath>,
    headers: HeaderMap) -> Result<Json<RevokeCommandResponse>, ServerError> {
    let req = RevokeCommandRequest::new(path.library.as_str(), credential(&headers).as_deref(), path.pool_id.as_str());
    let res = RevokeCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}
