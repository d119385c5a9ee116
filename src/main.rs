use std::{net::SocketAddr, sync::Arc};

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use travel_dashboard::{
    config::AppConfig,
    dashboard::Dashboard,
    error::AppError,
    format::DateLocale,
    render::render_dashboard,
    routes::create_router,
    services::{HttpTripStore, StaticTripStore, TripStore},
    state::AppState,
};

#[derive(Debug, Parser)]
#[command(name = "travel-dashboard", about = "Travel stats and trip search in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a user's dashboard and print it.
    Show {
        #[arg(long)]
        user: Option<String>,
        #[arg(long, short, default_value = "")]
        query: String,
        /// Date locale used for searching departure dates (ru, en).
        #[arg(long)]
        locale: Option<DateLocale>,
        /// Use the built-in demo data instead of the HTTP backend.
        #[arg(long)]
        demo: bool,
    },
    /// Serve the demo data over the dashboard HTTP API.
    Serve {
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    match cli.command {
        Command::Show {
            user,
            query,
            locale,
            demo,
        } => {
            if let Some(user) = user {
                config.user_id = user;
            }
            if let Some(locale) = locale {
                config.date_locale = locale;
            }
            let store: Box<dyn TripStore> = if demo {
                Box::new(StaticTripStore::demo())
            } else {
                Box::new(HttpTripStore::from_config(&config)?)
            };

            let mut dashboard = Dashboard::new(config.date_locale);
            dashboard.set_query(query);
            dashboard.load(store.as_ref(), &config.user_id).await;
            println!("{}", render_dashboard(&mut dashboard)?);
        }
        Command::Serve { listen } => {
            if let Some(listen) = listen {
                config.listen_addr = listen;
            }
            let state = AppState::new(config.clone(), Arc::new(StaticTripStore::demo()));
            let app = create_router(state);

            let listener = TcpListener::bind(config.listen_addr).await?;
            info!("mock backend listening on {}", listener.local_addr()?);
            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,travel_dashboard=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
