mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, PacingPolicy, SmtpSettings};
pub use repos::{DeleteResult, IEventRepo, IParticipantRepo, InsertParticipantResult, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::info;

#[derive(Clone)]
pub struct GatherlyContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailer>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl GatherlyContext {
    /// Inmemory infra with an `InMemoryMailer` and no pacing. Used when testing.
    pub fn create_inmemory() -> Self {
        let mut config = Config::new();
        config.pacing = PacingPolicy::none();
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(InMemoryMailer::new()),
        }
    }

    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let config = Config::new();
        let mailer = Arc::new(SmtpMailer::new(config.smtp.as_ref()));
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mailer,
        })
    }

    fn create_inmemory_with_smtp() -> Self {
        let config = Config::new();
        let mailer = Arc::new(SmtpMailer::new(config.smtp.as_ref()));
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            mailer,
        }
    }
}

const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<GatherlyContext> {
    let args: Vec<_> = std::env::args().collect();

    // cargo run inmemory
    let inmemory_arg_set = args.len() > 1 && args[1].eq("inmemory");
    if inmemory_arg_set {
        info!("Inmemory argument provided. Going to use inmemory infra.");
        return Ok(GatherlyContext::create_inmemory_with_smtp());
    }

    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(postgres_connection_string) => {
            info!("{} env var was provided. Going to use postgres.", PSQL_CONNECTION_STRING);
            GatherlyContext::create(ContextParams {
                postgres_connection_string,
            })
            .await
        }
        Err(_) => {
            info!(
                "{} env var was not provided. Going to use inmemory infra.",
                PSQL_CONNECTION_STRING
            );
            Ok(GatherlyContext::create_inmemory_with_smtp())
        }
    }
}

/// Runs the embedded migrations when postgres is used
pub async fn run_migration() -> Result<(), MigrateError> {
    let connection_string = match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(connection_string) => connection_string,
        Err(_) => return Ok(()),
    };
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&connection_string)
        .await?;

    sqlx::migrate!().run(&pool).await
}
