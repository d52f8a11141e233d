use actix_web::cookie::Cookie;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::dto::clients::IndexQuery;
use crate::models::auth::{AUTH_COOKIE, AuthenticatedUser};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::clients::{ClientSourceProbe, load_clients_page};

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    probe: web::Data<ClientSourceProbe>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page_data = match load_clients_page(
        repo.get_ref(),
        probe.get_ref(),
        &user,
        params.into_inner(),
    ) {
        Ok(page_data) => page_data,
        Err(e) => return service_error_response(e, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );
    context.insert("clients", &page_data.clients);
    if let Some(q) = &page_data.search_query {
        context.insert("search_query", q);
    }

    render_template(&tera, "main/index.html", &context)
}

#[post("/logout")]
pub async fn logout() -> impl Responder {
    let mut expired = Cookie::new(AUTH_COOKIE, "");
    expired.make_removal();
    HttpResponse::SeeOther()
        .insert_header((actix_web::http::header::LOCATION, "/"))
        .cookie(expired)
        .finish()
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/not_assigned.html", &context)
}
