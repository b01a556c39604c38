//! Caller identity extraction.
//!
//! The platform fronts this service with a gateway that authenticates the
//! caller and forwards their identifier in the `X-User-ID` header. Role
//! checks happen in the domain against the stored user record, so a forged
//! header can at most impersonate an identifier the store does not know.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{Ready, ready};

use crate::api::error::ApiError;
use crate::domain::{Error, UserId};

/// Header carrying the authenticated caller's identifier.
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Extractor for the calling user's identity.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub UserId);

impl Actor {
    /// The caller's identifier.
    pub fn id(self) -> UserId {
        self.0
    }
}

fn extract(req: &HttpRequest) -> Result<Actor, ApiError> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::unauthenticated("missing user identity header"))?;

    let id = UserId::new(raw).map_err(|_| Error::unauthenticated("malformed user identifier"))?;
    Ok(Actor(id))
}

impl FromRequest for Actor {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[tokio::test]
    async fn extracts_a_valid_header() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();

        let actor = extract(&req).expect("valid header accepted");
        assert_eq!(actor.id(), UserId::from_uuid(id));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let req = TestRequest::default().to_http_request();
        let err = extract(&req).expect_err("missing header refused");
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_identifier_is_unauthenticated() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();

        let err = extract(&req).expect_err("malformed id refused");
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
    }
}
