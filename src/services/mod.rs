use thiserror::Error;

use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;
use crate::{SERVICE_EMPLOYEE_ROLE, SERVICE_OWNER_ROLE};

pub mod api;
pub mod client;
pub mod clients;
pub mod tickets;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Form validation error: {0}")]
    Form(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Gate shared by every staff-facing operation: both owners and employees of
/// a repair shop may work with tickets and derived clients.
pub(crate) fn ensure_staff(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.has_role(SERVICE_OWNER_ROLE) || user.has_role(SERVICE_EMPLOYEE_ROLE) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Gate for destructive operations, reserved to the shop owner.
pub(crate) fn ensure_owner(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.has_role(SERVICE_OWNER_ROLE) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
