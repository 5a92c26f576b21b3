use std::fmt::Display;

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, HttpResponseBuilder};

use domain_db::error::StoreError;

use super::response::Envelope;

#[derive(Debug)]
pub enum ApplicationError {
    Validation(Vec<String>),
    AuthenticationRequired,
    NotFound(String),
    InternalServerError,
    ServiceUnavailable,
}

impl Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl actix_web::error::ResponseError for ApplicationError {
    fn error_response(&self) -> HttpResponse {
        let envelope = match self {
            Self::Validation(messages) => Envelope::error("validation_error", messages.clone()),
            Self::AuthenticationRequired => Envelope::error(
                "authentication_required",
                vec!["authentication required".into()],
            ),
            Self::NotFound(what) => {
                Envelope::error("not_found", vec![format!("resource not found [{what}]")])
            }
            Self::InternalServerError => {
                Envelope::error("unexpected_error", vec!["unexpected error".into()])
            }
            Self::ServiceUnavailable => {
                Envelope::error("service_unavailable", vec!["service unavailable".into()])
            }
        };

        HttpResponseBuilder::new(self.status_code()).json(envelope)
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationRequired => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

pub fn handle_blocking_error(error: BlockingError) -> ApplicationError {
    log::error!("{}", error);
    ApplicationError::ServiceUnavailable
}

/// Store failures keep their HTTP meaning: missing resources are 404,
/// the keyword cap is a client error, anything else is logged and
/// collapsed into a generic 500.
pub fn handle_store_error(error: StoreError) -> ApplicationError {
    match error {
        StoreError::NotFound(what) => ApplicationError::NotFound(what),
        StoreError::KeywordLimit { max } => {
            ApplicationError::Validation(vec![format!("cannot register more than {max} keywords")])
        }
        other => {
            log::error!("{}", other);
            ApplicationError::InternalServerError
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::error::ResponseError;

    use super::*;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(
            ApplicationError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApplicationError::AuthenticationRequired.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApplicationError::NotFound("cve.cve_id=CVE-2024-0001".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApplicationError::InternalServerError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn keyword_limit_maps_to_validation() {
        let mapped = handle_store_error(StoreError::KeywordLimit { max: 50 });
        match mapped {
            ApplicationError::Validation(messages) => {
                assert_eq!(messages, vec!["cannot register more than 50 keywords"]);
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn not_found_keeps_the_resource_description() {
        let mapped = handle_store_error(StoreError::NotFound("cve.cve_id=CVE-2024-0001".into()));
        match mapped {
            ApplicationError::NotFound(what) => assert_eq!(what, "cve.cve_id=CVE-2024-0001"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
