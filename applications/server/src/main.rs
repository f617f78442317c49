/// Starter Server - user management HTTP backend
use anyhow::Context;
use clap::{Parser, Subcommand};
use starter_server::{
    api::users::UserCreateRequest,
    config::Settings,
    create_router,
    services::{AuthService, UserService},
    state::AppState,
    telemetry,
};
use starter_storage::{Database, SqliteUserRepository};
use std::{net::SocketAddr, path::PathBuf};
use validator::Validate;

#[derive(Parser)]
#[command(name = "starter-server")]
#[command(about = "Starter kit user management backend", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "STARTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    CreateUser {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// List users in ascending id order
    ListUsers {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let _log_guard = telemetry::init(&settings)?;

    match cli.command {
        Commands::Serve => {
            serve(settings).await?;
        }
        Commands::CreateUser {
            email,
            username,
            password,
            full_name,
        } => {
            let request = UserCreateRequest {
                email,
                username,
                password,
                full_name,
            };
            create_user(settings, request).await?;
        }
        Commands::ListUsers { skip, limit } => {
            list_users(settings, skip, limit).await?;
        }
    }

    Ok(())
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = settings.environment.as_str(),
        "Application startup"
    );

    let db = Database::connect(&settings.database_url, &settings.pool_settings()).await?;
    tracing::info!("Database connected");

    let addr = SocketAddr::from((
        settings
            .server_host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid server host {}", settings.server_host))?,
        settings.server_port,
    ));

    let app_state = AppState::from_settings(settings, db.clone());
    let app = create_router(app_state);

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    db.close().await;
    tracing::info!("Application shutdown");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn create_user(settings: Settings, request: UserCreateRequest) -> anyhow::Result<()> {
    request
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid user: {}", e))?;

    let db = Database::connect(&settings.database_url, &settings.pool_settings()).await?;
    let auth_service = AuthService::from_settings(&settings);

    let mut tx = db.begin().await?;
    let user = UserService::new(SqliteUserRepository::new(&mut tx), &auth_service)
        .create_user(request.into())
        .await?;
    tx.commit().await?;

    println!("Created user {} ({})", user.id, user.username);

    db.close().await;
    Ok(())
}

async fn list_users(settings: Settings, skip: u32, limit: Option<u32>) -> anyhow::Result<()> {
    let db = Database::connect(&settings.database_url, &settings.pool_settings()).await?;
    let auth_service = AuthService::from_settings(&settings);

    let mut conn = db.pool().acquire().await?;
    let mut service = UserService::new(SqliteUserRepository::new(&mut conn), &auth_service);
    let total = service.count_users().await?;
    let users = service.get_users(skip, settings.page_limit(limit)).await?;

    println!("Users ({} total):", total);
    for user in users {
        let status = if user.is_active { "active" } else { "inactive" };
        println!("  {} - {} <{}> [{}]", user.id, user.username, user.email, status);
    }

    drop(service);
    drop(conn);
    db.close().await;
    Ok(())
}
