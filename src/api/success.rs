use actix_web::HttpResponse;
use std::borrow::Cow;

#[derive(serde::Serialize)]
pub struct SuccessBody<T: serde::Serialize> {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message: Cow<'static, str>,
    pub payload: Option<T>,
    pub success: bool,
}

pub struct Success<T: serde::Serialize> {
    pub status: actix_web::http::StatusCode,
    pub body: Option<SuccessBody<T>>,
}

impl<T: serde::Serialize> Success<T> {
    fn with_status(status: actix_web::http::StatusCode, payload: Option<T>) -> Self {
        Self {
            status,
            body: Some(SuccessBody {
                timestamp: chrono::Utc::now(),
                message: Cow::Borrowed(""),
                payload,
                success: true,
            }),
        }
    }

    pub fn ok(payload: Option<T>) -> Self {
        Self::with_status(actix_web::http::StatusCode::OK, payload)
    }

    pub fn created(payload: Option<T>) -> Self {
        Self::with_status(actix_web::http::StatusCode::CREATED, payload)
    }

    pub fn message<M>(mut self, msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        if let Some(body) = &mut self.body {
            body.message = msg.into();
        }
        self
    }

    pub fn no_content() -> Self {
        Self { status: actix_web::http::StatusCode::NO_CONTENT, body: None }
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        let mut response = HttpResponse::build(self.status);

        match self.body {
            Some(body) => response.json(body),
            None => response.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test::TestRequest, Responder};

    #[actix_web::test]
    async fn ok_response_wraps_payload_in_envelope() {
        let req = TestRequest::default().to_http_request();
        let res = Success::ok(Some(vec![1, 2, 3])).message("Loaded").respond_to(&req);
        assert_eq!(res.status(), actix_web::http::StatusCode::OK);

        let body = to_bytes(res.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Loaded");
        assert_eq!(json["payload"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["success"], true);
        assert!(json["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn no_content_has_empty_body() {
        let req = TestRequest::default().to_http_request();
        let res = Success::<()>::no_content().respond_to(&req);
        assert_eq!(res.status(), actix_web::http::StatusCode::NO_CONTENT);
        assert!(to_bytes(res.into_body()).await.unwrap().is_empty());
    }
}
