//! Server-rendered glossary pages

use axum::{extract::State, response::Html};
use serde::Serialize;

use crate::AppState;
use glossar_common::{
    auth::{Identity, MaybeIdentity},
    errors::Result,
    metrics, EntryStore, GlossaryEntry,
};

/// Template context for the main glossary page.
///
/// `nutzername` is the authenticated username, or an empty string for
/// anonymous visitors; the template keys off it to toggle the login/logout
/// affordance. `begriffe` is the ordered list of terms; definitions are
/// deliberately omitted from this summary view.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MainPageContext {
    pub nutzername: String,
    pub begriffe: Vec<String>,
}

/// Build the main page view-model from the identity and the stored entries
pub fn main_page_context(user: Option<&Identity>, entries: &[GlossaryEntry]) -> MainPageContext {
    MainPageContext {
        nutzername: user.map(|u| u.username.clone()).unwrap_or_default(),
        begriffe: entries.iter().map(|e| e.term.clone()).collect(),
    }
}

/// Main glossary page: the list of terms plus the caller's login state
pub async fn main_page(
    State(state): State<AppState>,
    MaybeIdentity(user): MaybeIdentity,
) -> Result<Html<String>> {
    match &user {
        Some(identity) => {
            tracing::info!(user = %identity.username, "Main page accessed by authenticated user")
        }
        None => tracing::info!("Main page accessed by anonymous user"),
    }

    let entries = state.store.list_all().await?;
    metrics::record_page_view(user.is_some());

    let context = main_page_context(user.as_ref(), &entries);
    let html = state.pages.render_main_page(&context)?;
    Ok(Html(html))
}
