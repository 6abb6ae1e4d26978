use crate::error::GatherlyError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use gatherly_api_structs::get_event::*;
use gatherly_domain::{Event, ID};
use gatherly_infra::GatherlyContext;

pub async fn get_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<GatherlyContext>,
) -> Result<HttpResponse, GatherlyError> {
    let usecase = GetEventUseCase {
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(GatherlyError::from)
}

#[derive(Debug)]
pub struct GetEventUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for GatherlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEvent";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find(&self.event_id)
            .await
            .ok_or(UseCaseError::NotFound(self.event_id))
    }
}
