use super::subscribers::SendConfirmationOnSubscribed;
use crate::error::GatherlyError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use gatherly_api_structs::subscribe::*;
use gatherly_domain::{Event, Participant, ID};
use gatherly_infra::{GatherlyContext, InsertParticipantResult};
use tracing::{error, info};

pub async fn subscribe_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<GatherlyContext>,
) -> Result<HttpResponse, GatherlyError> {
    let body = body.0;
    let usecase = SubscribeUseCase {
        event_id: path_params.event_id,
        email: body.email,
        name: body.name,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| {
            let mut res = if subscription.is_new {
                HttpResponse::Created()
            } else {
                HttpResponse::Ok()
            };
            res.json(APIResponse::new(subscription.participant))
        })
        .map_err(GatherlyError::from)
}

/// Subscribes an email to an `Event`.
///
/// Subscribing an email that is already subscribed returns the existing
/// `Participant` without consuming capacity.
#[derive(Debug)]
pub struct SubscribeUseCase {
    pub event_id: ID,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub event: Event,
    pub participant: Participant,
    /// `false` when the email was already subscribed
    pub is_new: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidEmail,
    NotFound(ID),
    EventAlreadyStarted(ID),
    CapacityExceeded(ID),
    StorageError,
}

impl From<UseCaseError> for GatherlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEmail => {
                Self::BadClientData("An email address is required to subscribe".into())
            }
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::EventAlreadyStarted(event_id) => Self::BadClientData(format!(
                "The event with id: {}, has already started",
                event_id
            )),
            UseCaseError::CapacityExceeded(event_id) => Self::Conflict(format!(
                "The event with id: {}, is full",
                event_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SubscribeUseCase {
    type Response = Subscription;

    type Error = UseCaseError;

    const NAME: &'static str = "Subscribe";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        if self.email.trim().is_empty() {
            return Err(UseCaseError::InvalidEmail);
        }

        let event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseError::NotFound(self.event_id)),
        };

        let now = ctx.sys.get_timestamp_millis();
        if event.has_started(now) {
            return Err(UseCaseError::EventAlreadyStarted(event.id));
        }

        let participant = Participant::new(event.id, &self.email, self.name.clone(), now);
        let res = ctx
            .repos
            .participants
            .insert_within_capacity(&participant, event.capacity)
            .await
            .map_err(|e| {
                error!(
                    "Unable to subscribe {} to event: {}. Error: {:?}",
                    participant.email, event.id, e
                );
                UseCaseError::StorageError
            })?;

        match res {
            InsertParticipantResult::Inserted(participant) => {
                info!(
                    "Subscribed: {} to event: {}",
                    participant.email, participant.event_id
                );
                Ok(Subscription {
                    event,
                    participant,
                    is_new: true,
                })
            }
            InsertParticipantResult::AlreadySubscribed(participant) => Ok(Subscription {
                event,
                participant,
                is_new: false,
            }),
            InsertParticipantResult::CapacityExceeded => {
                Err(UseCaseError::CapacityExceeded(event.id))
            }
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendConfirmationOnSubscribed)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::participant::unsubscribe::UnsubscribeUseCase;
    use crate::shared::test_helpers::{
        insert_event, setup, BrokenEventParticipants, TestContext, HOUR_MILLIS, NOW,
    };
    use actix_web::rt::time::sleep;
    use futures::future::join_all;
    use gatherly_infra::InMemoryMailer;
    use std::time::Duration;

    fn usecase(event_id: ID, email: &str) -> SubscribeUseCase {
        SubscribeUseCase {
            event_id,
            email: email.into(),
            name: None,
        }
    }

    async fn wait_for_mail(mailer: &InMemoryMailer, recipient: &str) -> usize {
        for _ in 0..50 {
            let sent = mailer.sent_to(recipient).len();
            if sent > 0 {
                return sent;
            }
            sleep(Duration::from_millis(10)).await;
        }
        0
    }

    #[actix_web::test]
    async fn subscribes_until_capacity_is_reached() {
        let ctx = setup().ctx;
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, Some(2)).await;

        for email in ["a@x.com", "b@x.com"] {
            let subscription = usecase(event.id, email)
                .execute(&ctx)
                .await
                .expect("To subscribe");
            assert!(subscription.is_new);
            assert!(!subscription.participant.notified);
        }

        let res = usecase(event.id, "c@x.com").execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::CapacityExceeded(event.id));
        assert_eq!(
            ctx.repos.participants.count_by_event(&event.id).await.unwrap(),
            2
        );
    }

    #[actix_web::test]
    async fn resubscribing_does_not_consume_capacity() {
        let ctx = setup().ctx;
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, Some(1)).await;

        let first = usecase(event.id, "a@x.com")
            .execute(&ctx)
            .await
            .expect("To subscribe");
        let second = usecase(event.id, " A@X.com ")
            .execute(&ctx)
            .await
            .expect("To return existing subscription");
        assert!(!second.is_new);
        assert_eq!(first.participant, second.participant);
        assert_eq!(
            ctx.repos.participants.count_by_event(&event.id).await.unwrap(),
            1
        );
    }

    #[actix_web::test]
    async fn rejects_started_event_regardless_of_capacity() {
        let ctx = setup().ctx;
        for start_ts in [NOW, NOW - HOUR_MILLIS] {
            let event = insert_event(&ctx, start_ts, None).await;
            let res = usecase(event.id, "a@x.com").execute(&ctx).await;
            assert_eq!(res.unwrap_err(), UseCaseError::EventAlreadyStarted(event.id));
        }
    }

    #[actix_web::test]
    async fn rejects_unknown_event() {
        let ctx = setup().ctx;
        let event_id = ID::default();
        let res = usecase(event_id, "a@x.com").execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(event_id));
    }

    #[actix_web::test]
    async fn rejects_blank_email() {
        let ctx = setup().ctx;
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, None).await;
        let res = usecase(event.id, "  ").execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidEmail);
    }

    #[actix_web::test]
    async fn resubscribing_after_unsubscribe_creates_fresh_participant() {
        let ctx = setup().ctx;
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, Some(1)).await;

        let first = usecase(event.id, "a@x.com")
            .execute(&ctx)
            .await
            .expect("To subscribe");
        ctx.repos
            .participants
            .set_notified(&first.participant.id)
            .await
            .unwrap();

        let unsubscribed = UnsubscribeUseCase {
            event_id: event.id,
            email: "a@x.com".into(),
        }
        .execute(&ctx)
        .await
        .expect("To unsubscribe");
        assert!(unsubscribed);

        let second = usecase(event.id, "a@x.com")
            .execute(&ctx)
            .await
            .expect("To subscribe again");
        assert!(second.is_new);
        assert_ne!(first.participant.id, second.participant.id);
        assert!(!second.participant.notified);
    }

    #[actix_web::test]
    async fn concurrent_subscribers_cannot_overbook() {
        let ctx = setup().ctx;
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, Some(3)).await;
        for email in ["a@x.com", "b@x.com"] {
            usecase(event.id, email)
                .execute(&ctx)
                .await
                .expect("To subscribe");
        }

        let emails = (0..10)
            .map(|i| format!("user{}@x.com", i))
            .collect::<Vec<_>>();
        let results = join_all(emails.iter().map(|email| {
            let ctx = ctx.clone();
            let usecase = usecase(event.id, email);
            async move { execute(usecase, &ctx).await }
        }))
        .await;

        let accepted = results.iter().filter(|res| res.is_ok()).count();
        assert_eq!(accepted, 1);
        assert!(results
            .iter()
            .filter_map(|res| res.as_ref().err())
            .all(|e| *e == UseCaseError::CapacityExceeded(event.id)));
        assert_eq!(
            ctx.repos.participants.count_by_event(&event.id).await.unwrap(),
            3
        );
    }

    #[actix_web::test]
    async fn sends_confirmation_only_for_new_subscriptions() {
        let TestContext { ctx, mailer } = setup();
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, None).await;

        execute(usecase(event.id, "a@x.com"), &ctx)
            .await
            .expect("To subscribe");
        assert_eq!(wait_for_mail(&mailer, "a@x.com").await, 1);

        execute(usecase(event.id, "a@x.com"), &ctx)
            .await
            .expect("To return existing subscription");
        sleep(Duration::from_millis(50)).await;
        assert_eq!(mailer.sent_to("a@x.com").len(), 1);
        assert!(mailer.sent()[0].subject.contains("You are registered"));
    }

    #[actix_web::test]
    async fn failing_confirmation_keeps_subscription() {
        let TestContext { ctx, mailer } = setup();
        mailer.fail_for("a@x.com");
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, None).await;

        let subscription = execute(usecase(event.id, "a@x.com"), &ctx)
            .await
            .expect("To subscribe");
        sleep(Duration::from_millis(50)).await;

        assert!(mailer.sent().is_empty());
        assert_eq!(
            ctx.repos
                .participants
                .find_by_event_and_email(&event.id, "a@x.com")
                .await,
            Some(subscription.participant)
        );
    }

    #[actix_web::test]
    async fn storage_failure_is_reported() {
        let TestContext { mut ctx, mailer } = setup();
        let event = insert_event(&ctx, NOW + 48 * HOUR_MILLIS, None).await;
        ctx.repos.participants = BrokenEventParticipants::wrap(&ctx, event.id);

        let res = execute(usecase(event.id, "a@x.com"), &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::StorageError);
        sleep(Duration::from_millis(50)).await;
        assert!(mailer.sent().is_empty());
    }
}
