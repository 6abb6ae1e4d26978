use crate::error::GatherlyError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use gatherly_api_structs::delete_event::*;
use gatherly_domain::{Event, ID};
use gatherly_infra::GatherlyContext;
use tracing::{error, info};

pub async fn delete_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<GatherlyContext>,
) -> Result<HttpResponse, GatherlyError> {
    let usecase = DeleteEventUseCase {
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(GatherlyError::from)
}

/// Deletes an `Event` together with all its `Participant`s
#[derive(Debug)]
pub struct DeleteEventUseCase {
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
impl UseCase for DeleteEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.event_id));
        }

        let deleted_participants = ctx
            .repos
            .participants
            .delete_by_event(&self.event_id)
            .await
            .map_err(|e| {
                error!(
                    "Unable to delete the participants of event: {}. Error: {:?}",
                    self.event_id, e
                );
                UseCaseError::StorageError
            })?;
        info!(
            "Deleted {} participants of event: {}",
            deleted_participants.deleted_count, self.event_id
        );

        ctx.repos
            .events
            .delete(&self.event_id)
            .await
            .ok_or(UseCaseError::NotFound(self.event_id))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::{insert_event, setup, HOUR_MILLIS, NOW};
    use gatherly_domain::Participant;

    #[actix_web::test]
    async fn deletes_event_and_its_participants() {
        let ctx = setup().ctx;
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, None).await;
        let participant = Participant::new(event.id, "a@x.com", None, NOW);
        ctx.repos
            .participants
            .insert_within_capacity(&participant, None)
            .await
            .unwrap();

        let mut usecase = DeleteEventUseCase { event_id: event.id };
        let deleted = usecase.execute(&ctx).await.expect("To delete event");
        assert_eq!(deleted, event);
        assert!(ctx.repos.events.find(&event.id).await.is_none());
        assert_eq!(
            ctx.repos.participants.count_by_event(&event.id).await.unwrap(),
            0
        );
    }

    #[actix_web::test]
    async fn rejects_unknown_event() {
        let ctx = setup().ctx;
        let event_id = ID::default();
        let mut usecase = DeleteEventUseCase { event_id };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotFound(event_id)
        );
    }
}
