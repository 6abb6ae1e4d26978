use gatherly_api::ReminderScheduler;
use gatherly_domain::DailyTrigger;
use gatherly_infra::{GatherlyContext, ISys, InMemoryMailer};
use std::sync::Arc;

pub const HOUR_MILLIS: i64 = 1000 * 60 * 60;

/// Sun Feb 21 2021 00:00:00 GMT+0100
pub const NOW: i64 = 1613862000000;

pub struct StaticTimeSys(pub i64);
impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0
    }
}

pub struct TestApp {
    pub ctx: GatherlyContext,
    pub mailer: Arc<InMemoryMailer>,
    pub scheduler: Arc<ReminderScheduler>,
}

/// Inmemory context frozen at `NOW` with a mailer that can be inspected
pub fn setup() -> TestApp {
    let mut ctx = GatherlyContext::create_inmemory();
    ctx.sys = Arc::new(StaticTimeSys(NOW));
    ctx.config.reminder_trigger = DailyTrigger::morning(chrono_tz::UTC);
    let mailer = Arc::new(InMemoryMailer::new());
    ctx.mailer = mailer.clone();
    let scheduler = Arc::new(ReminderScheduler::new(ctx.clone()));

    TestApp {
        ctx,
        mailer,
        scheduler,
    }
}

/// Builds the service under test with the same routes as the server
#[macro_export]
macro_rules! init_app {
    ($test_app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($test_app.ctx.clone()))
                .app_data(actix_web::web::Data::from($test_app.scheduler.clone()))
                .service(
                    actix_web::web::scope("/api/v1")
                        .configure(gatherly_api::configure_server_api),
                ),
        )
        .await
    };
}
