use std::{process, sync::Arc, time::Duration};

use folio::{
    application::{
        admin::{
            audit::AdminAuditService,
            chrome::AdminChromeService,
            content::{AdminBlogService, AdminContentService, AdminSingletonService},
            dashboard::{AdminDashboardService, DashboardSources},
        },
        auth::{AdminAccountError, AdminAuthService},
        error::AppError,
        portfolio::{PortfolioService, PortfolioSources},
        rate_limit::LoginRateLimiter,
        repos::{AdminSessionsRepo, AdminUsersRepo, AuditRepo, BlogsRepo, HealthRepo},
    },
    config,
    domain::entities::{
        BlogRecord, EducationRecord, ExperienceRecord, HeroContentRecord, ProfileRecord,
        ProjectRecord, SkillRecord,
    },
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
    },
    util::timezone,
};
use tokio::{sync::watch, try_join};
use tracing::{Dispatch, Level, debug, dispatcher, error, info, warn};
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
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
        config::Command::Admin(args) => run_admin(settings, args.command).await,
    }
}

async fn connect(settings: &config::Settings) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn migrate(repositories: &PostgresRepositories) -> Result<(), AppError> {
    PostgresRepositories::run_migrations(repositories.pool())
        .await
        .map_err(|err| AppError::from(InfraError::Migration(err)))
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = connect(&settings).await?;
    migrate(&repositories).await?;
    info!(target = "folio::migrate", "database migrations applied");
    Ok(())
}

fn build_auth_service(
    repositories: &Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> AdminAuthService {
    let users: Arc<dyn AdminUsersRepo> = repositories.clone();
    let sessions: Arc<dyn AdminSessionsRepo> = repositories.clone();
    let limiter = LoginRateLimiter::new(
        settings.auth.login_window,
        settings.auth.login_max_attempts.get(),
    );

    AdminAuthService::new(
        users,
        sessions,
        limiter,
        settings.auth.session_ttl,
        settings.auth.bcrypt_cost,
    )
}

async fn run_admin(
    settings: config::Settings,
    command: config::AdminCommand,
) -> Result<(), AppError> {
    let repositories = connect(&settings).await?;
    migrate(&repositories).await?;
    let auth = build_auth_service(&repositories, &settings);

    match command {
        config::AdminCommand::Create(args) => {
            let admin = auth
                .create_admin(&args.email, &args.password)
                .await
                .map_err(account_error)?;
            println!("created admin {} ({})", admin.email, admin.id);
        }
        config::AdminCommand::Passwd(args) => {
            let revoked = auth
                .change_password(&args.email, &args.password)
                .await
                .map_err(account_error)?;
            println!(
                "password updated for {}; {revoked} session(s) revoked",
                args.email.trim()
            );
        }
        config::AdminCommand::List => {
            let admins = auth.list_admins().await.map_err(AppError::from)?;
            if admins.is_empty() {
                println!("no admin accounts");
            }
            for admin in admins {
                println!(
                    "{}\t{}",
                    admin.email,
                    timezone::format_timestamp(admin.created_at, settings.site.timezone)
                );
            }
        }
    }

    Ok(())
}

fn account_error(err: AdminAccountError) -> AppError {
    match err {
        AdminAccountError::Repo(err) => AppError::from(err),
        AdminAccountError::Hash(message) => AppError::unexpected(message),
        other => AppError::validation(other.to_string()),
    }
}

struct ApplicationContext {
    http_state: HttpState,
    admin_state: AdminState,
    auth: Arc<AdminAuthService>,
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> ApplicationContext {
    let audit_repo: Arc<dyn AuditRepo> = repositories.clone();
    let blogs_repo: Arc<dyn BlogsRepo> = repositories.clone();
    let health: Arc<dyn HealthRepo> = repositories.clone();

    let audit = AdminAuditService::new(audit_repo);

    let hero = AdminSingletonService::<HeroContentRecord>::new(repositories.clone(), audit.clone());
    let profile = AdminSingletonService::<ProfileRecord>::new(repositories.clone(), audit.clone());
    let skills = AdminContentService::<SkillRecord>::new(repositories.clone(), audit.clone());
    let projects = AdminContentService::<ProjectRecord>::new(repositories.clone(), audit.clone());
    let experience = AdminContentService::<ExperienceRecord>::new(repositories.clone(), audit.clone());
    let education = AdminContentService::<EducationRecord>::new(repositories.clone(), audit.clone());
    let blogs = AdminContentService::<BlogRecord>::new(repositories.clone(), audit.clone());
    let blog_status = AdminBlogService::new(blogs_repo.clone(), audit.clone());

    let dashboard = AdminDashboardService::new(
        DashboardSources {
            hero: hero.clone(),
            profile: profile.clone(),
            skills: skills.clone(),
            projects: projects.clone(),
            experience: experience.clone(),
            education: education.clone(),
            blogs: blogs.clone(),
            blog_status: blog_status.clone(),
            audit,
        },
        settings.site.timezone,
    );

    let portfolio = PortfolioService::new(
        PortfolioSources {
            hero: repositories.clone(),
            profile: repositories.clone(),
            skills: repositories.clone(),
            projects: repositories.clone(),
            experience: repositories.clone(),
            education: repositories.clone(),
            blogs: blogs_repo,
        },
        settings.site.clone(),
    );

    let auth = Arc::new(build_auth_service(&repositories, settings));

    let http_state = HttpState {
        portfolio: Arc::new(portfolio),
        health: health.clone(),
    };

    let admin_state = AdminState {
        auth: auth.clone(),
        chrome: Arc::new(AdminChromeService::new(
            settings.site.title.clone(),
            settings.site.public_url.clone(),
        )),
        dashboard: Arc::new(dashboard),
        hero,
        profile,
        skills,
        projects,
        experience,
        education,
        blogs,
        blog_status,
        health,
        timezone: settings.site.timezone,
        cookie_secure: settings.auth.cookie_secure,
        site_title: settings.site.title.clone(),
    };

    ApplicationContext {
        http_state,
        admin_state,
        auth,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = connect(&settings).await?;
    migrate(&repositories).await?;

    let app = build_application_context(repositories, &settings);

    let purge_handle = spawn_session_purge(app.auth.clone(), settings.auth.session_purge_interval);

    let result = serve_http(&settings, app.http_state, app.admin_state).await;

    purge_handle.abort();
    let _ = purge_handle.await;

    result
}

fn spawn_session_purge(
    auth: Arc<AdminAuthService>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // Skip the first immediate tick
        loop {
            interval.tick().await;
            let pruned = auth.prune_login_attempts();
            if pruned > 0 {
                debug!(
                    target = "folio::auth",
                    pruned, "stale login throttle buckets dropped"
                );
            }
            match auth.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => info!(
                    target = "folio::auth",
                    purged, "expired admin sessions purged"
                ),
                Err(err) => warn!(
                    target = "folio::auth",
                    error = %err,
                    "failed to purge expired admin sessions"
                ),
            }
        }
    })
}

async fn wait_for_shutdown(mut signal: watch::Receiver<bool>) {
    let _ = signal.wait_for(|stop| *stop).await;
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "folio::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listening"
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(target = "folio::serve", "shutdown requested");
            let _ = stop_tx.send(true);
        }
    });

    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(wait_for_shutdown(stop_rx.clone()));
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(wait_for_shutdown(stop_rx.clone()));

    let grace = settings.server.graceful_shutdown;
    let drain_deadline = async move {
        wait_for_shutdown(stop_rx).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = async { try_join!(public_server, admin_server) } => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        () = drain_deadline => {
            warn!(
                target = "folio::serve",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    Ok(())
}
