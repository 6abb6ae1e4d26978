use crate::error::GatherlyError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use gatherly_api_structs::get_participants::*;
use gatherly_domain::{Participant, ID};
use gatherly_infra::GatherlyContext;
use tracing::error;

pub async fn get_participants_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<GatherlyContext>,
) -> Result<HttpResponse, GatherlyError> {
    let usecase = GetParticipantsUseCase {
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|participants| HttpResponse::Ok().json(APIResponse::new(participants)))
        .map_err(GatherlyError::from)
}

#[derive(Debug)]
pub struct GetParticipantsUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for GatherlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetParticipantsUseCase {
    type Response = Vec<Participant>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetParticipants";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.event_id));
        }

        ctx.repos
            .participants
            .find_by_event(&self.event_id)
            .await
            .map_err(|e| {
                error!(
                    "Unable to find the participants of event: {}. Error: {:?}",
                    self.event_id, e
                );
                UseCaseError::StorageError
            })
    }
}
