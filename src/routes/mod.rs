//! HTTP handlers and the glue shared between them.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::models::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod api;
pub mod client;
pub mod main;
pub mod tickets;

/// 303 redirect to the given location.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Maps flash levels onto the alert classes used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every rendered page: alerts, the current user and
/// navigation state.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template {name}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Standard translation of service failures for the HTML surface.
pub fn service_error_response(err: ServiceError, back: &str) -> HttpResponse {
    match err {
        // The user is signed in but carries no staff role for this tenant.
        ServiceError::Unauthorized => redirect("/na"),
        ServiceError::NotFound => {
            FlashMessage::error("Nu a fost găsit.").send();
            redirect(back)
        }
        ServiceError::Form(e) => {
            log::error!("Form validation failed: {e}");
            FlashMessage::error("Eroare de validare a formularului").send();
            redirect(back)
        }
        ServiceError::Repository(e) => {
            log::error!("Repository failure: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
