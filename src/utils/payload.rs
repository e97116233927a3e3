use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Request body accepted either as JSON or as a URL-encoded form,
/// chosen by the request's content type.
pub struct JsonOrForm<T>(pub T);

impl<T> JsonOrForm<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

// `application/json` and any `application/*+json` subtype.
fn is_json(req: &HttpRequest) -> bool {
    match req.mime_type() {
        Ok(Some(mime)) => {
            mime.subtype().as_str() == "json" || mime.suffix().map(|suffix| suffix.as_str()) == Some("json")
        }
        _ => false,
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for JsonOrForm<T> {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_json(req) {
            let body = web::Json::<T>::from_request(req, payload);
            Box::pin(async move {
                body.await
                    .map(|json| JsonOrForm(json.into_inner()))
                    .map_err(|err| AppError::BadRequest(err.to_string()))
            })
        } else {
            let body = web::Form::<T>::from_request(req, payload);
            Box::pin(async move {
                body.await
                    .map(|form| JsonOrForm(form.into_inner()))
                    .map_err(|err| AppError::BadRequest(err.to_string()))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::test::TestRequest;

    fn with_content_type(content_type: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header((header::CONTENT_TYPE, content_type))
            .to_http_request()
    }

    #[test]
    fn json_subtypes_and_suffixes_select_json() {
        assert!(is_json(&with_content_type("application/json")));
        assert!(is_json(&with_content_type("application/json; charset=utf-8")));
        assert!(is_json(&with_content_type("application/merge-patch+json")));
    }

    #[test]
    fn other_bodies_select_form() {
        assert!(!is_json(&with_content_type("application/x-www-form-urlencoded")));
        assert!(!is_json(&with_content_type("text/plain")));
        assert!(!is_json(&TestRequest::default().to_http_request()));
    }
}
