use crate::error::GatherlyError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use gatherly_api_structs::create_event::*;
use gatherly_domain::{Event, ID};
use gatherly_infra::GatherlyContext;
use tracing::error;

pub async fn create_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<GatherlyContext>,
) -> Result<HttpResponse, GatherlyError> {
    let body = body.0;
    let usecase = CreateEventUseCase {
        title: body.title,
        description: body.description,
        start_ts: body.start_ts,
        capacity: body.capacity,
        owner_id: body.owner_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(GatherlyError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub title: String,
    pub description: Option<String>,
    pub start_ts: i64,
    pub capacity: Option<i64>,
    pub owner_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidTitle,
    InvalidCapacity(i64),
    StorageError,
}

impl From<UseCaseError> for GatherlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTitle => {
                Self::BadClientData("The event title must not be empty".into())
            }
            UseCaseError::InvalidCapacity(capacity) => Self::BadClientData(format!(
                "The event capacity: {}, must be a positive number",
                capacity
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(UseCaseError::InvalidTitle);
        }
        if !Event::is_valid_capacity(self.capacity) {
            return Err(UseCaseError::InvalidCapacity(self.capacity.unwrap_or_default()));
        }

        let mut e = Event::new(
            title.to_string(),
            self.start_ts,
            self.capacity,
            self.owner_id,
            ctx.sys.get_timestamp_millis(),
        );
        e.description = self.description.clone();

        ctx.repos
            .events
            .insert(&e)
            .await
            .map_err(|err| {
                error!(
                    "Unable to insert event: {}. Error: {:?}",
                    e.id, err
                );
                UseCaseError::StorageError
            })?;

        Ok(e)
    }
}
