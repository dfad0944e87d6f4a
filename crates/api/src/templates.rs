//! Handlebars templates for the server-rendered screens.
//!
//! Templates are compiled into the binary and registered once at startup;
//! a template that fails to parse is a configuration error.

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, Html, IntoResponse, Response};
use handlebars::Handlebars;
use rallycontrol_core::error::CoreError;
use serde::Serialize;

use crate::error::{AppError, HtmlResult};
use crate::flash::IncomingFlash;
use crate::middleware::auth::AuthUser;
use crate::nav::{nav_links, NavLink};

pub const DASHBOARD: &str = "dashboard";
pub const GENERIC_LIST: &str = "generic_list";
pub const GENERIC_FORM: &str = "generic_form";
pub const LOGIN: &str = "login";

const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
];

const PAGES: &[(&str, &str)] = &[
    (DASHBOARD, include_str!("../templates/dashboard.hbs")),
    (GENERIC_LIST, include_str!("../templates/generic_list.hbs")),
    (GENERIC_FORM, include_str!("../templates/generic_form.hbs")),
    (LOGIN, include_str!("../templates/login.hbs")),
];

/// The compiled template registry.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, CoreError> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry
                .register_partial(name, *source)
                .map_err(|e| CoreError::Config(format!("partial '{name}': {e}")))?;
        }
        for (name, source) in PAGES {
            registry
                .register_template_string(name, *source)
                .map_err(|e| CoreError::Config(format!("template '{name}': {e}")))?;
        }
        Ok(Self { registry })
    }

    /// Render a page to HTML.
    pub fn render<T: Serialize>(&self, name: &str, page: &Page<'_, T>) -> Result<String, AppError> {
        self.registry
            .render(name, page)
            .map_err(|e| AppError::InternalError(format!("Rendering '{name}' failed: {e}")))
    }

    /// Render a page into a response, consuming the incoming flash message.
    pub fn respond<T: Serialize>(
        &self,
        status: StatusCode,
        name: &str,
        page: &Page<'_, T>,
        flash: &IncomingFlash,
    ) -> HtmlResult<Response> {
        let html = self.render(name, page)?;
        let clear = flash.clear_header().map(|cookie| (SET_COOKIE, cookie));
        Ok((status, AppendHeaders(clear), Html(html)).into_response())
    }
}

/// Context shared by every page plus the page-specific `body`, flattened
/// into the template's root scope.
#[derive(Debug, Serialize)]
pub struct Page<'a, T: Serialize> {
    pub title: String,
    pub nav: Vec<NavLink>,
    pub flash: Option<&'a str>,
    pub username: Option<&'a str>,
    #[serde(flatten)]
    pub body: T,
}

impl<'a, T: Serialize> Page<'a, T> {
    pub fn new(
        title: impl Into<String>,
        path: &str,
        user: Option<&'a AuthUser>,
        flash: &'a IncomingFlash,
        body: T,
    ) -> Self {
        Self {
            title: title.into(),
            nav: nav_links(path),
            flash: flash.message(),
            username: user.map(|u| u.username.as_str()),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn all_templates_compile() {
        assert!(Templates::new().is_ok());
    }

    #[test]
    fn layout_escapes_and_marks_navigation() {
        let templates = Templates::new().unwrap();
        let flash = IncomingFlash::default();
        let page = Page::new(
            "RallyControl Dashboard",
            "/",
            None,
            &flash,
            json!({ "stats": [{ "label": "Events", "value": 2 }] }),
        );
        let html = templates.render(DASHBOARD, &page).unwrap();
        assert!(html.contains("<title>RallyControl Dashboard"));
        assert!(html.contains(r#"<a href="/drivers/">Fahrer</a>"#));
        assert!(html.contains(r#"class="active""#));

        let page = Page::new("<script>", "/", None, &flash, json!({ "stats": [] }));
        let html = templates.render(DASHBOARD, &page).unwrap();
        assert!(html.contains("&lt;script&gt;"));
    }
}
