//! `/Auth` endpoints

use std::sync::Arc;

use super::decode_optional;
use crate::error::Result;
use crate::models::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::transport::{send_as, ApiRequest, ApiTransport};

#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn ApiTransport>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        send_as(
            self.transport.as_ref(),
            ApiRequest::post("/Auth/Login").json(request)?,
        )
        .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        send_as(
            self.transport.as_ref(),
            ApiRequest::post("/Auth/Register").json(request)?,
        )
        .await
    }

    /// `None` when the server answers without a session body.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Option<AuthResponse>> {
        let value = self
            .transport
            .send(ApiRequest::put("/Auth/ChangePassword").json(request)?)
            .await?;
        decode_optional(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Role;
    use crate::transport::mock::{fixtures, MockReply, MockTransport};
    use crate::transport::RequestBody;
    use reqwest::Method;

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let mock = Arc::new(MockTransport::new().reply_json(
            Method::POST,
            "/Auth/Login",
            fixtures::auth_response(3, "Admin", Some("tok")),
        ));
        let service = AuthService::new(mock.clone());

        let response = service
            .login(&LoginRequest {
                email: "ada@example.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user_role, Role::Admin);
        assert_eq!(response.access_token.as_deref(), Some("tok"));

        match mock.last_request().unwrap().body {
            RequestBody::Json(body) => {
                assert_eq!(body["email"], "ada@example.com");
                assert_eq!(body["password"], "Secret1!");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_401_is_authentication_error() {
        let mock = Arc::new(MockTransport::new().reply(
            Method::POST,
            "/Auth/Login",
            MockReply::Status(401, String::new()),
        ));
        let result = AuthService::new(mock)
            .login(&LoginRequest {
                email: "a@b.io".to_string(),
                password: "x".to_string(),
            })
            .await;
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn test_change_password_body_and_empty_reply() {
        let mock = Arc::new(MockTransport::new().reply_json(
            Method::PUT,
            "/Auth/ChangePassword",
            serde_json::Value::Null,
        ));
        let service = AuthService::new(mock.clone());

        let response = service
            .change_password(&ChangePasswordRequest {
                old_password: "Old1!old".to_string(),
                new_password: "New1!new".to_string(),
            })
            .await
            .unwrap();
        assert!(response.is_none());

        match mock.last_request().unwrap().body {
            RequestBody::Json(body) => {
                assert_eq!(body["oldPassword"], "Old1!old");
                assert_eq!(body["newPassword"], "New1!new");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
