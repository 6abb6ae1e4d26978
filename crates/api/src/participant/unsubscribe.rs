use crate::error::GatherlyError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use gatherly_api_structs::unsubscribe::*;
use gatherly_domain::{Participant, ID};
use gatherly_infra::GatherlyContext;
use tracing::error;

pub async fn unsubscribe_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<GatherlyContext>,
) -> Result<HttpResponse, GatherlyError> {
    let path_params = path_params.into_inner();
    let usecase = UnsubscribeUseCase {
        event_id: path_params.event_id,
        email: path_params.email,
    };

    match execute(usecase, &ctx).await {
        Ok(true) => Ok(HttpResponse::Ok().json(APIResponse { unsubscribed: true })),
        Ok(false) => Err(GatherlyError::NotFound(
            "No subscription was found for the given event and email".into(),
        )),
        Err(e) => Err(GatherlyError::from(e)),
    }
}

/// Removes the subscription of an email to an `Event`. Responds with
/// whether a subscription was removed.
#[derive(Debug)]
pub struct UnsubscribeUseCase {
    pub event_id: ID,
    pub email: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for GatherlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UnsubscribeUseCase {
    type Response = bool;

    type Error = UseCaseError;

    const NAME: &'static str = "Unsubscribe";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .participants
            .delete_by_event_and_email(&self.event_id, &Participant::normalize_email(&self.email))
            .await
            .map_err(|e| {
                error!(
                    "Unable to unsubscribe {} from event: {}. Error: {:?}",
                    self.email, self.event_id, e
                );
                UseCaseError::StorageError
            })
    }
}
