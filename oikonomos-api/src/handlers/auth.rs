use super::error::ApiError;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const ADMIN_HEADER: &str = "X-Admin-Token";

/// Shared secret of the management endpoints; they refuse every call while unset
#[derive(Clone, Default)]
pub struct ManagementState {
    pub token: Option<String>,
}

/// Succeeds when `header` carries `expected`; an unset or empty secret refuses everyone
pub(crate) fn check_token(req: &HttpRequest, header: &str, expected: Option<&str>) -> Result<(), ApiError> {
    let Some(expected) = expected.filter(|t| !t.is_empty()) else {
        return Err(ApiError::Forbidden);
    };
    let given = req.headers().get(header).and_then(|v| v.to_str().ok());
    if given == Some(expected) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Extractor guarding the management endpoints with `X-Admin-Token`
pub struct Admin;

impl FromRequest for Admin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let expected = req
            .app_data::<web::Data<ManagementState>>()
            .and_then(|state| state.token.as_deref());
        let result = check_token(req, ADMIN_HEADER, expected).map(|_| Admin);
        if result.is_err() {
            tracing::warn!("Rejected management call to {}", req.path());
        }
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_check_token() {
        let req = TestRequest::default().insert_header((ADMIN_HEADER, "s3cret")).to_http_request();
        assert!(check_token(&req, ADMIN_HEADER, Some("s3cret")).is_ok());
        assert!(check_token(&req, ADMIN_HEADER, Some("other")).is_err());
        assert!(check_token(&req, ADMIN_HEADER, Some("")).is_err());
        assert!(check_token(&req, ADMIN_HEADER, None).is_err());

        let bare = TestRequest::default().to_http_request();
        assert!(check_token(&bare, ADMIN_HEADER, Some("s3cret")).is_err());
    }
}
