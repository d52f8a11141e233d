use actix_web::{HttpResponse, Responder, get, web};
use log::error;

use crate::dto::api::ClientsQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::api::list_clients;
use crate::services::clients::ClientSourceProbe;

#[get("/v1/clients")]
pub async fn api_v1_clients(
    params: web::Query<ClientsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    probe: web::Data<ClientSourceProbe>,
) -> impl Responder {
    match list_clients(repo.get_ref(), probe.get_ref(), &user, params.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(e) => {
            error!("Failed to list clients: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
