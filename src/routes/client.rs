use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::client::SaveClientForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::client::{load_client_page, save_client as save_client_service};

#[get("/client/{client_id}")]
pub async fn show_client(
    client_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    // The path segment is the opaque identity key; the codec is the only
    // place that takes it apart.
    let page_data = match load_client_page(repo.get_ref(), &user, &client_id) {
        Ok(page_data) => page_data,
        Err(e) => return service_error_response(e, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "clients",
        &server_config.auth_service_url,
    );
    context.insert("client", &page_data.client);
    context.insert("client_url", &page_data.client.encoded_url());
    context.insert("tickets", &page_data.tickets);
    context.insert("ticket_count", &page_data.ticket_count);
    context.insert("first_seen", &page_data.first_seen);
    context.insert("last_activity", &page_data.last_activity);

    render_template(&tera, "client/index.html", &context)
}

#[post("/client/save")]
pub async fn save_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveClientForm>,
) -> impl Responder {
    let back = format!(
        "/client/{}",
        crate::domain::client::ClientKey::decode(&form.client_id).encoded_url()
    );

    let report = match save_client_service(repo.get_ref(), &user, form) {
        Ok(report) => report,
        Err(e) => return service_error_response(e, &back),
    };

    if report.is_complete() {
        FlashMessage::success("Clientul a fost actualizat.").send();
    } else {
        // Partial success: completed writes stay, the rest is reported.
        let failed: Vec<&str> = report.failures().map(|o| o.ticket_id.as_str()).collect();
        log::error!(
            "Client edit propagated to {} of {} tickets; failed: {failed:?}",
            report.succeeded(),
            report.outcomes.len()
        );
        FlashMessage::error(format!(
            "Actualizare incompletă: {} din {} fișe au fost salvate.",
            report.succeeded(),
            report.outcomes.len()
        ))
        .send();
    }

    redirect(&back)
}
