//! Redirects unauthenticated browser traffic to the sign-in page.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{Error, HttpResponse};

/// Sign-in page exposed by the auth service.
pub const SIGNIN_LOCATION: &str = "/auth/signin";

/// Wraps the HTML scope: a 401 coming out of any handler or extractor turns
/// into a redirect instead of a bare error page. API scopes stay unwrapped
/// and keep their 401s.
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let http_req = req.request().clone();

        Box::pin(async move {
            match service.call(req).await {
                Ok(res) if res.status() == StatusCode::UNAUTHORIZED => {
                    let (req, _) = res.into_parts();
                    Ok(ServiceResponse::new(req, signin_redirect()))
                }
                Ok(res) => Ok(res.map_into_left_body()),
                // Extractor failures surface as errors, not responses.
                Err(err)
                    if err.as_response_error().status_code() == StatusCode::UNAUTHORIZED =>
                {
                    Ok(ServiceResponse::new(http_req, signin_redirect()))
                }
                Err(err) => Err(err),
            }
        })
    }
}

fn signin_redirect<B>() -> actix_web::HttpResponse<EitherBody<B>> {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, SIGNIN_LOCATION))
        .finish()
        .map_into_right_body()
}
