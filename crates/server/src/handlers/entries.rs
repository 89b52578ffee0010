//! Glossary entry API handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use glossar_common::{
    auth::MaybeIdentity,
    errors::{AppError, Result},
    metrics, EntryStore, NewEntry,
};

/// Inbound payload for a new glossary entry.
///
/// The original wire format names the fields `begriff`/`erklaerung`; both
/// spellings are accepted. An `id` in the payload is ignored; the store
/// assigns identity.
#[derive(Debug, Deserialize, Validate)]
pub struct EntryPayload {
    #[validate(length(min = 1, message = "term must not be empty"))]
    #[serde(alias = "begriff")]
    pub term: String,

    #[serde(alias = "erklaerung")]
    pub definition: String,
}

/// Response after creating an entry
#[derive(Debug, Serialize)]
pub struct CreateEntryResponse {
    pub id: i64,
    pub message: String,
}

/// Create a new glossary entry.
///
/// Outcomes in order, first match wins: 401 for anonymous callers (the body
/// is never parsed), 400 for an unparsable or invalid payload, 409 when the
/// term already exists, 201 with the assigned id otherwise.
pub async fn create_entry(
    State(state): State<AppState>,
    MaybeIdentity(user): MaybeIdentity,
    body: String,
) -> Result<(StatusCode, Json<CreateEntryResponse>)> {
    let Some(user) = user else {
        tracing::warn!("Attempt to create a glossary entry without authentication");
        metrics::record_create_rejected("unauthorized");
        return Err(AppError::Unauthorized {
            message: "Authentication required to create a glossary entry".to_string(),
        });
    };

    tracing::info!(user = %user.username, payload = %body, "Received create payload");

    let payload: EntryPayload = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to deserialize create payload");
        metrics::record_create_rejected("invalid_payload");
        AppError::InvalidPayload {
            message: e.to_string(),
        }
    })?;

    payload.validate().map_err(|e| {
        tracing::warn!(error = %e, "Create payload failed validation");
        metrics::record_create_rejected("validation");
        AppError::Validation {
            message: e.to_string(),
            field: Some("term".to_string()),
        }
    })?;

    if state.store.find_by_term(&payload.term).await?.is_some() {
        tracing::warn!(term = %payload.term, "Glossary entry already exists");
        metrics::record_create_rejected("duplicate");
        return Err(AppError::DuplicateTerm { term: payload.term });
    }

    let now = chrono::Utc::now();
    let id = state
        .store
        .insert(NewEntry {
            term: payload.term.clone(),
            definition: payload.definition,
            created_at: now,
            updated_at: now,
        })
        .await?;

    metrics::record_entry_created();
    tracing::info!(id, term = %payload.term, "New glossary entry stored");

    Ok((
        StatusCode::CREATED,
        Json(CreateEntryResponse {
            id,
            message: "New glossary entry stored".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{test_state, MockStore};
    use axum::http::StatusCode;
    use glossar_common::auth::Identity;
    use std::sync::Arc;

    fn authenticated(username: &str) -> MaybeIdentity {
        MaybeIdentity(Some(Identity {
            username: username.to_string(),
        }))
    }

    fn anonymous() -> MaybeIdentity {
        MaybeIdentity(None)
    }

    #[tokio::test]
    async fn anonymous_create_is_unauthorized_regardless_of_body() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        for body in ["", "not json at all", r#"{"term":"API","definition":"x"}"#] {
            let err = create_entry(
                State(state.clone()),
                anonymous(),
                body.to_string(),
            )
            .await
            .unwrap_err();

            assert!(matches!(err, AppError::Unauthorized { .. }));
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }

        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_without_insert() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        let err = create_entry(
            State(state),
            authenticated("alice"),
            "{".to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidPayload { .. }));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn missing_definition_is_rejected() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        let err = create_entry(
            State(state),
            authenticated("alice"),
            r#"{"term":"API"}"#.to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidPayload { .. }));
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn wrong_field_type_is_rejected() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        let err = create_entry(
            State(state),
            authenticated("alice"),
            r#"{"term":42,"definition":"x"}"#.to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidPayload { .. }));
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn empty_term_is_rejected() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        let err = create_entry(
            State(state),
            authenticated("alice"),
            r#"{"term":"","definition":"x"}"#.to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_term_is_a_conflict_without_insert() {
        let store = Arc::new(MockStore::with_terms(&["API"]));
        let state = test_state(store.clone());

        let err = create_entry(
            State(state),
            authenticated("alice"),
            r#"{"term":"API","definition":"Application Programming Interface"}"#.to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::DuplicateTerm { .. }));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn fresh_term_is_created_with_matching_timestamps() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        let (status, Json(response)) = create_entry(
            State(state),
            authenticated("alice"),
            r#"{"id":0,"term":"CORS","erklaerung":"Cross-Origin Resource Sharing"}"#.to_string(),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(response.id > 0);
        assert_eq!(store.insert_calls(), 1);

        let inserts = store.recorded_inserts();
        assert_eq!(inserts.len(), 1);
        assert_eq!(inserts[0].term, "CORS");
        assert_eq!(inserts[0].definition, "Cross-Origin Resource Sharing");
        assert_eq!(inserts[0].created_at, inserts[0].updated_at);
    }

    #[tokio::test]
    async fn original_wire_names_are_accepted() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        let (status, Json(response)) = create_entry(
            State(state),
            authenticated("alice"),
            r#"{"begriff":"REST","erklaerung":"Representational State Transfer"}"#.to_string(),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(response.id > 0);
        assert_eq!(store.recorded_inserts()[0].term, "REST");
    }

    #[tokio::test]
    async fn empty_definition_is_allowed() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());

        let (status, _) = create_entry(
            State(state),
            authenticated("alice"),
            r#"{"term":"API","definition":""}"#.to_string(),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(store.insert_calls(), 1);
    }

    #[tokio::test]
    async fn same_payload_twice_creates_then_conflicts() {
        let store = Arc::new(MockStore::new());
        let state = test_state(store.clone());
        let body = r#"{"term":"CORS","definition":"Cross-Origin Resource Sharing"}"#;

        let (status, _) = create_entry(
            State(state.clone()),
            authenticated("alice"),
            body.to_string(),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let err = create_entry(
            State(state),
            authenticated("alice"),
            body.to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::DuplicateTerm { .. }));
        assert_eq!(store.insert_calls(), 1);
    }
}
