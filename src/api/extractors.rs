//! Request extractors shared by handlers.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::domain::entities::RequestMetadata;

/// Click metadata taken from the `User-Agent` header and the peer address.
///
/// Never rejects: missing values stay `None`. The peer address is only known
/// when the router is served with `into_make_service_with_connect_info`.
#[derive(Debug, Clone)]
pub struct ClientMetadata(pub RequestMetadata);

impl<S> FromRequestParts<S> for ClientMetadata
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok());

        let client_address = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(Self(RequestMetadata::new(user_agent, client_address)))
    }
}
