//! `/Borrowing` endpoints

use std::sync::Arc;

use super::ResourceClient;
use crate::error::{Error, Result};
use crate::models::{
    BaseRef, Borrowing, BorrowingAction, InitiateBorrowingRequest, InitiateBorrowingResponse,
    StatusUpdateRequest, StatusUpdateResponse,
};
use crate::query::CatalogQuery;
use crate::transport::{send_as, ApiRequest, ApiTransport};
use crate::workflow::BatchOutcome;

#[derive(Clone)]
pub struct BorrowingService {
    resource: ResourceClient,
}

impl BorrowingService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            resource: ResourceClient::new(transport, "Borrowing"),
        }
    }

    pub async fn list(&self, query: &CatalogQuery) -> Result<Vec<Borrowing>> {
        self.resource.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Borrowing> {
        self.resource.get(id).await
    }

    /// Request to borrow books; one outcome per requested book id.
    pub async fn initiate(&self, book_ids: &[i64]) -> Result<BatchOutcome> {
        if book_ids.is_empty() {
            return Err(Error::validation("Select at least one book"));
        }
        log::info!("[borrowing] Requesting {} book(s)", book_ids.len());

        let body = InitiateBorrowingRequest {
            book_ids: book_ids.to_vec(),
        };
        let response: InitiateBorrowingResponse = send_as(
            self.resource.transport(),
            ApiRequest::post("/Borrowing/initiate").json(&body)?,
        )
        .await?;

        let outcome = BatchOutcome::from_initiate_response(book_ids, response);
        log_outcome("initiate", &outcome);
        Ok(outcome)
    }

    /// Apply `action` to every id in one request; one outcome per id.
    ///
    /// Only a transport failure or an undecodable response is an `Err`;
    /// per-item refusals come back inside the outcome.
    pub async fn act_on_status(
        &self,
        action: BorrowingAction,
        borrowing_ids: &[i64],
    ) -> Result<BatchOutcome> {
        if borrowing_ids.is_empty() {
            return Err(Error::validation("Select at least one borrowing"));
        }
        log::info!(
            "[borrowing] {} on {} borrowing(s)",
            action,
            borrowing_ids.len()
        );

        let body = StatusUpdateRequest {
            action,
            borrowing_ids: borrowing_ids.to_vec(),
        };
        let response: StatusUpdateResponse = send_as(
            self.resource.transport(),
            ApiRequest::put("/Borrowing/act-on-borrowing-status").json(&body)?,
        )
        .await?;

        let outcome = BatchOutcome::from_status_response(borrowing_ids, response);
        log_outcome(action.as_str(), &outcome);
        Ok(outcome)
    }

    pub async fn delete(&self, reference: &BaseRef) -> Result<()> {
        self.resource.delete(reference).await
    }
}

fn log_outcome(label: &str, outcome: &BatchOutcome) {
    if outcome.failed() == 0 {
        log::info!("[borrowing] {}: {} succeeded", label, outcome.succeeded());
    } else {
        log::warn!(
            "[borrowing] {}: {} succeeded, {} failed",
            label,
            outcome.succeeded(),
            outcome.failed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BorrowingStatus;
    use crate::transport::mock::{fixtures, MockReply, MockTransport};
    use crate::transport::RequestBody;
    use crate::workflow::ItemOutcome;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_act_on_status_request_shape() {
        let mock = Arc::new(MockTransport::new().reply_json(
            Method::PUT,
            "/Borrowing/act-on-borrowing-status",
            json!({"success": [fixtures::borrowing(4, "Approved")], "errors": []}),
        ));
        let outcome = BorrowingService::new(mock.clone())
            .act_on_status(BorrowingAction::Approve, &[4])
            .await
            .unwrap();
        assert!(outcome.ensure_complete().is_ok());

        match mock.last_request().unwrap().body {
            RequestBody::Json(body) => {
                assert_eq!(body, json!({"action": "Approve", "borrowingIds": [4]}));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_partial_batch_outcomes() {
        let mock = Arc::new(MockTransport::new().reply_json(
            Method::PUT,
            "/Borrowing/act-on-borrowing-status",
            json!({
                "success": [fixtures::borrowing(1, "Returned"), fixtures::borrowing(2, "Returned")],
                "errors": [{"borrowingId": 3, "message": "Borrowing is not in Borrowed state"}]
            }),
        ));
        let outcome = BorrowingService::new(mock)
            .act_on_status(BorrowingAction::Return, &[1, 2, 3])
            .await
            .unwrap();

        assert_eq!(outcome.succeeded(), 2);
        match outcome.get(3) {
            Some(ItemOutcome::Failed(msg)) => assert!(msg.contains("not in Borrowed")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        match outcome.get(1) {
            Some(ItemOutcome::Updated(b)) => assert_eq!(b.status, BorrowingStatus::Returned),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_null_lists_in_response() {
        let mock = Arc::new(MockTransport::new().reply_json(
            Method::PUT,
            "/Borrowing/act-on-borrowing-status",
            json!({"success": null, "errors": null}),
        ));
        let outcome = BorrowingService::new(mock)
            .act_on_status(BorrowingAction::Cancel, &[8])
            .await
            .unwrap();
        assert_eq!(outcome.failed(), 1);
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected_locally() {
        let mock = Arc::new(MockTransport::new());
        let service = BorrowingService::new(mock.clone());
        assert!(service.act_on_status(BorrowingAction::Approve, &[]).await.is_err());
        assert!(service.initiate(&[]).await.is_err());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_initiate_posts_book_ids() {
        let mock = Arc::new(MockTransport::new().reply_json(
            Method::POST,
            "/Borrowing/initiate",
            json!({
                "success": [fixtures::borrowing(1, "Pending")],
                "errors": [{"bookId": 205, "message": "No copies left"}]
            }),
        ));
        let outcome = BorrowingService::new(mock.clone())
            .initiate(&[101, 205])
            .await
            .unwrap();

        assert!(outcome.get(101).is_some_and(ItemOutcome::is_updated));
        assert_eq!(outcome.failures().collect::<Vec<_>>(), vec![(205, "No copies left")]);
        match mock.last_request().unwrap().body {
            RequestBody::Json(body) => assert_eq!(body, json!({"bookIds": [101, 205]})),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_network_failure_is_error() {
        let mock = Arc::new(MockTransport::new().reply(
            Method::PUT,
            "/Borrowing/act-on-borrowing-status",
            MockReply::Network("connection reset".to_string()),
        ));
        let result = BorrowingService::new(mock)
            .act_on_status(BorrowingAction::Approve, &[1])
            .await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
