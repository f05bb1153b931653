use std::{process, sync::Arc};

use circolare::{
    application::{
        content::ContentService,
        error::AppError,
        mail::Mailer,
        newsletter::{NewsletterOptions, NewsletterService},
        repos::{PostsRepo, PostsWriteRepo, SubscribersRepo},
        subscribers::SubscriberService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AppState},
        mail::{HttpMailer, UnconfiguredMailer},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let repositories = init_repositories(&settings).await?;
    let state = build_state(repositories, &settings);

    serve_http(&settings, state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_state(repositories: Arc<PostgresRepositories>, settings: &config::Settings) -> AppState {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let subscribers_repo: Arc<dyn SubscribersRepo> = repositories.clone();

    let mailer: Arc<dyn Mailer> = match &settings.mail.api_key {
        Some(api_key) => Arc::new(HttpMailer::new(&settings.mail.base_url, api_key.clone())),
        None => Arc::new(UnconfiguredMailer),
    };

    let content = Arc::new(ContentService::new(
        posts_repo.clone(),
        posts_write_repo,
        settings.site.author.clone(),
    ));
    let subscribers = Arc::new(SubscriberService::new(subscribers_repo.clone()));
    let newsletter = Arc::new(NewsletterService::new(
        posts_repo,
        subscribers_repo,
        mailer,
        NewsletterOptions {
            from: settings.mail.from.clone(),
            placeholder_to: settings.mail.placeholder_to.clone(),
            public_url: settings.site.public_url.clone(),
            digest_size: settings.site.digest_size,
        },
    ));

    AppState {
        content,
        subscribers,
        newsletter,
        db: repositories,
    }
}

async fn serve_http(settings: &config::Settings, state: AppState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(addr = %addr, "listening");
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
