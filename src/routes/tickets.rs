use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;
use validator::Validate;

use crate::dto::clients::IndexQuery;
use crate::forms::ticket::{AddTicketForm, DeleteTicketForm, SaveTicketForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::ServiceError;
use crate::services::tickets::{add_ticket, load_tickets_page, remove_ticket, save_ticket};

#[get("/tickets")]
pub async fn show_tickets(
    params: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page_data = match load_tickets_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(page_data) => page_data,
        Err(e) => return service_error_response(e, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "tickets",
        &server_config.auth_service_url,
    );
    context.insert("tickets", &page_data.tickets);
    if let Some(q) = &page_data.search_query {
        context.insert("search_query", q);
    }

    render_template(&tera, "tickets/index.html", &context)
}

#[post("/ticket/add")]
pub async fn ticket_add(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddTicketForm>,
) -> impl Responder {
    match add_ticket(repo.get_ref(), &user, form) {
        Ok(ticket_id) => {
            FlashMessage::success(format!("Fișa {ticket_id} a fost creată.")).send();
        }
        Err(ServiceError::Unauthorized) => {
            return service_error_response(ServiceError::Unauthorized, "/tickets");
        }
        Err(e) => {
            log::error!("Failed to add ticket: {e}");
            FlashMessage::error("Eroare la crearea fișei").send();
        }
    }
    redirect("/tickets")
}

#[post("/ticket/save")]
pub async fn ticket_save(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveTicketForm>,
) -> impl Responder {
    match save_ticket(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Fișa a fost actualizată.").send();
        }
        Err(ServiceError::Unauthorized) => {
            return service_error_response(ServiceError::Unauthorized, "/tickets");
        }
        Err(e) => {
            log::error!("Failed to update ticket: {e}");
            FlashMessage::error("Eroare la actualizarea fișei").send();
        }
    }
    redirect("/tickets")
}

#[post("/ticket/delete")]
pub async fn ticket_delete(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteTicketForm>,
) -> impl Responder {
    if let Err(e) = form.validate() {
        log::error!("Failed to validate form: {e}");
        FlashMessage::error("Eroare de validare a formularului").send();
        return redirect("/tickets");
    }

    match remove_ticket(repo.get_ref(), &user, &form.ticket_id) {
        Ok(()) => {
            FlashMessage::success("Fișa a fost ștearsă.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Doar proprietarul poate șterge fișe.").send();
        }
        Err(e) => {
            log::error!("Failed to delete ticket: {e}");
            FlashMessage::error("Eroare la ștergerea fișei").send();
        }
    }
    redirect("/tickets")
}
