use super::subscribe::{SubscribeUseCase, Subscription};
use crate::notification::{BatchEntry, NotificationDispatcher};
use crate::shared::usecase::Subscriber;
use gatherly_domain::NotificationKind;
use gatherly_infra::GatherlyContext;

pub struct SendConfirmationOnSubscribed;

#[async_trait::async_trait(?Send)]
impl Subscriber<SubscribeUseCase> for SendConfirmationOnSubscribed {
    async fn notify(&self, e: &Subscription, ctx: &GatherlyContext) {
        if !e.is_new {
            return;
        }

        let dispatcher = NotificationDispatcher::new(ctx);
        let entry = BatchEntry::new(&e.event, &e.participant);
        // Not awaited, the subscriber does not wait for the mail provider
        actix_web::rt::spawn(async move {
            dispatcher
                .send_one(NotificationKind::Confirmation, &entry)
                .await;
        });
    }
}
