//! `/User` endpoints

use std::sync::Arc;

use super::{decode_optional, ResourceClient};
use crate::error::Result;
use crate::models::{ProfileUpdate, Session, UserProfile};
use crate::query::CatalogQuery;
use crate::transport::{ApiRequest, ApiTransport, MultipartForm};
use crate::validation::validate_profile;

#[derive(Clone)]
pub struct UserService {
    resource: ResourceClient,
}

impl UserService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            resource: ResourceClient::new(transport, "User"),
        }
    }

    pub async fn get(&self, id: i64) -> Result<UserProfile> {
        self.resource.get(id).await
    }

    pub async fn list(&self, query: &CatalogQuery) -> Result<Vec<UserProfile>> {
        self.resource.list(query).await
    }

    /// Send the edit-profile form as multipart.
    ///
    /// A non-admin viewer cannot send `Credit` or a different `UserRole`: both
    /// are stripped and the viewer's own role is sent instead. The server
    /// still decides; a refusal surfaces as `Error::Authorization`.
    pub async fn update_profile(
        &self,
        update: ProfileUpdate,
        viewer: &Session,
    ) -> Result<Option<UserProfile>> {
        validate_profile(&update)?;
        let id = update.id;
        let form = profile_form(update, viewer);

        log::info!("[users] Updating profile {}", id);
        let value = self
            .resource
            .transport()
            .send(ApiRequest::put(self.resource.item_path(id)).multipart(form))
            .await?;
        decode_optional(value)
    }
}

fn profile_form(update: ProfileUpdate, viewer: &Session) -> MultipartForm {
    let mut form = MultipartForm::new()
        .text("Name", update.name)
        .text("Email", update.email)
        .text("UserSex", update.sex.to_string())
        .text_opt("Bio", update.bio)
        .text_opt("Address", update.address)
        .text_opt("Phone", update.phone)
        .text_opt("BirthDate", update.birth_date)
        .text("Id", update.id.to_string())
        .text_opt("TimeStamp", update.time_stamp)
        .text_opt("Credit", update.credit.map(|c| c.to_string()))
        .text_opt("UserRole", update.role.map(|r| r.to_string()));
    if let Some(image) = update.image {
        form = form.file("Image", image);
    }

    if viewer.is_admin() {
        form
    } else {
        form.remove("Credit")
            .remove("UserRole")
            .text("UserRole", viewer.user_role.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{Role, Sex};
    use crate::transport::mock::{MockReply, MockTransport};
    use crate::transport::RequestBody;
    use reqwest::Method;
    use serde_json::json;

    fn viewer(role: Role) -> Session {
        Session {
            user_id: 12,
            user_name: Some("Ada".to_string()),
            user_role: role,
            image_url: None,
            access_token: "tok".to_string(),
        }
    }

    fn update() -> ProfileUpdate {
        ProfileUpdate {
            id: 12,
            time_stamp: Some("AAAAAAAAD2M=".to_string()),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            sex: Sex::Female,
            bio: Some("Analyst".to_string()),
            address: None,
            phone: None,
            birth_date: Some("1815-12-10".to_string()),
            credit: Some(500.0),
            role: Some(Role::Admin),
            image: None,
        }
    }

    fn sent_form(mock: &MockTransport) -> MultipartForm {
        match mock.last_request().unwrap().body {
            RequestBody::Multipart(form) => form,
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mock = Arc::new(MockTransport::new().reply_json(
            Method::GET,
            "/User/12",
            json!({
                "id": 12, "timeStamp": "AAAAAAAAD2M=", "name": "Ada", "userSex": "Female",
                "credit": 20, "email": "ada@example.com", "userRole": "User",
                "imageURL": null, "createdAt": "2024-01-01T00:00:00"
            }),
        ));
        let profile = UserService::new(mock).get(12).await.unwrap();
        assert_eq!(profile.user_sex, Sex::Female);
        assert_eq!(profile.credit, Some(20.0));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_send_credit_or_role() {
        let mock = Arc::new(MockTransport::new().reply_json(Method::PUT, "/User/12", json!(null)));
        UserService::new(mock.clone())
            .update_profile(update(), &viewer(Role::User))
            .await
            .unwrap();

        let form = sent_form(&mock);
        assert!(!form.contains("Credit"));
        assert_eq!(form.get_text("UserRole"), Some("User"));
        assert_eq!(form.get_text("TimeStamp"), Some("AAAAAAAAD2M="));
        assert_eq!(form.get_text("Id"), Some("12"));
        assert_eq!(form.get_text("UserSex"), Some("Female"));
        assert_eq!(
            form.parts().iter().filter(|(n, _)| n == "UserRole").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_admin_sends_credit_and_role() {
        let mock = Arc::new(MockTransport::new().reply_json(Method::PUT, "/User/12", json!(null)));
        UserService::new(mock.clone())
            .update_profile(update(), &viewer(Role::Admin))
            .await
            .unwrap();

        let form = sent_form(&mock);
        assert_eq!(form.get_text("Credit"), Some("500"));
        assert_eq!(form.get_text("UserRole"), Some("Admin"));
    }

    #[tokio::test]
    async fn test_invalid_profile_not_sent() {
        let mock = Arc::new(MockTransport::new());
        let mut bad = update();
        bad.email = "not-an-email".to_string();

        let result = UserService::new(mock.clone())
            .update_profile(bad, &viewer(Role::User))
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_forbidden_update_is_authorization_error() {
        let mock = Arc::new(MockTransport::new().reply(
            Method::PUT,
            "/User/12",
            MockReply::Status(403, String::new()),
        ));
        let result = UserService::new(mock)
            .update_profile(update(), &viewer(Role::User))
            .await;
        assert!(matches!(result, Err(Error::Authorization(_))));
    }
}
