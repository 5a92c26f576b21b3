//! Request identity. Session authentication terminates at the fronting
//! proxy, which injects the resolved account id as a header; this module
//! only decides trusted-header-present vs not.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use super::error::ApplicationError;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated account, required. Extraction fails with 403 when
/// the header is missing or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i32);

/// The authenticated account, if any. A missing header is an anonymous
/// visitor; a present but unusable header is still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeUserId(pub Option<i32>);

fn header_user_id(req: &HttpRequest) -> Result<Option<i32>, ApplicationError> {
    let Some(value) = req.headers().get(USER_ID_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.parse::<i32>().ok())
        .filter(|id| *id > 0)
        .map(Some)
        .ok_or(ApplicationError::AuthenticationRequired)
}

impl FromRequest for UserId {
    type Error = ApplicationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match header_user_id(req) {
            Ok(Some(id)) => Ok(UserId(id)),
            Ok(None) => Err(ApplicationError::AuthenticationRequired),
            Err(err) => Err(err),
        })
    }
}

impl FromRequest for MaybeUserId {
    type Error = ApplicationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(header_user_id(req).map(MaybeUserId))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn valid_header_resolves_the_account() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "7"))
            .to_http_request();
        assert_eq!(header_user_id(&req).unwrap(), Some(7));
    }

    #[test]
    fn missing_header_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(header_user_id(&req).unwrap(), None);
    }

    #[test]
    fn garbage_header_is_rejected() {
        for raw in ["abc", "-1", "0", "1.5", ""] {
            let req = TestRequest::default()
                .insert_header((USER_ID_HEADER, raw))
                .to_http_request();
            assert!(
                matches!(
                    header_user_id(&req),
                    Err(ApplicationError::AuthenticationRequired)
                ),
                "header {raw:?} should be rejected"
            );
        }
    }
}
