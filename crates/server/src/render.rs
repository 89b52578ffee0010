//! Server-side page rendering
//!
//! Thin wrapper over a minijinja environment with the templates embedded at
//! compile time. Handlers hand a fully built context to the renderer; no
//! template touches the store directly.

use crate::handlers::pages::MainPageContext;
use glossar_common::errors::{AppError, Result};
use minijinja::Environment;

const MAIN_PAGE_TEMPLATE: &str = include_str!("../templates/hauptseite.html");

/// Renderer for the server-side HTML pages
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("hauptseite", MAIN_PAGE_TEMPLATE)
            .map_err(|e| AppError::Render {
                message: e.to_string(),
            })?;

        Ok(Self { env })
    }

    /// Render the main glossary page
    pub fn render_main_page(&self, context: &MainPageContext) -> Result<String> {
        let template = self
            .env
            .get_template("hauptseite")
            .map_err(|e| AppError::Render {
                message: e.to_string(),
            })?;

        template.render(context).map_err(|e| AppError::Render {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_page_shows_login_affordance() {
        let renderer = PageRenderer::new().unwrap();
        let context = MainPageContext {
            nutzername: String::new(),
            begriffe: vec![],
        };

        let html = renderer.render_main_page(&context).unwrap();
        assert!(html.contains("Anmelden"));
        assert!(!html.contains("Abmelden"));
    }

    #[test]
    fn test_authenticated_page_shows_logout_affordance() {
        let renderer = PageRenderer::new().unwrap();
        let context = MainPageContext {
            nutzername: "alice".to_string(),
            begriffe: vec![],
        };

        let html = renderer.render_main_page(&context).unwrap();
        assert!(html.contains("alice"));
        assert!(html.contains("Abmelden"));
        assert!(!html.contains(">Anmelden<"));
    }

    #[test]
    fn test_terms_render_in_order() {
        let renderer = PageRenderer::new().unwrap();
        let context = MainPageContext {
            nutzername: String::new(),
            begriffe: vec!["API".to_string(), "REST".to_string()],
        };

        let html = renderer.render_main_page(&context).unwrap();
        let api = html.find("API").unwrap();
        let rest = html.find("REST").unwrap();
        assert!(api < rest);
    }

    #[test]
    fn test_empty_glossary_renders_placeholder() {
        let renderer = PageRenderer::new().unwrap();
        let context = MainPageContext {
            nutzername: String::new(),
            begriffe: vec![],
        };

        let html = renderer.render_main_page(&context).unwrap();
        assert!(html.contains("Noch keine Einträge vorhanden."));
    }
}
