mod config;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vestibule_login::{
    AttemptNotice, ExchangeClient, LoginError, NoticeKind, Notifier, SessionController,
};
use vestibule_session::{FileTokenStore, SessionStatus, SessionStore};

use crate::config::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "vestibule",
    about = "Command-line client for the vestibule authentication backend"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current session.
    Status,
    /// Log in with an email and password.
    Login { email: String, password: String },
    /// Log out and delete the mirrored access token.
    Logout,
}

/// Prints attempt notices to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: AttemptNotice) {
        match notice.kind() {
            NoticeKind::Success => println!("{}", notice.message()),
            NoticeKind::Error => eprintln!("{}", notice.message()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ClientConfig::from_env().expect("failed to load configuration");
    tracing::debug!(backend_url = %config.backend_url, "Loaded configuration");

    let mirror = Arc::new(FileTokenStore::new(config.state_dir.clone()));
    let store = Arc::new(SessionStore::restore(mirror).await);
    tracing::debug!(status = ?store.current().status(), "Restored session state");
    let exchange = Arc::new(ExchangeClient::new(config.backend_url.clone()));
    let controller = SessionController::new(store.clone(), exchange)
        .with_notifier(Arc::new(ConsoleNotifier));

    match args.command {
        Command::Status => {
            print_status(&store);
            ExitCode::SUCCESS
        }
        Command::Login { email, password } => {
            match controller.login_with_password(&email, &password).await {
                Ok(()) => {
                    print_status(&store);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    // Resolved attempts were already reported through the
                    // notifier; validation and refusals belong to this
                    // surface, the way a form would render them.
                    if matches!(
                        e,
                        LoginError::Validation(_)
                            | LoginError::AttemptInProgress
                            | LoginError::AdapterMissing { .. }
                    ) {
                        eprintln!("{e}");
                    }
                    ExitCode::FAILURE
                }
            }
        }
        Command::Logout => {
            controller.logout().await;
            println!("Logged out");
            ExitCode::SUCCESS
        }
    }
}

fn print_status(store: &SessionStore) {
    let state = store.current();
    match state.status() {
        SessionStatus::Anonymous => println!("Not logged in"),
        SessionStatus::PendingProfile => {
            println!("Logged in; profile not loaded in this session");
        }
        SessionStatus::Authenticated => {
            let user = state.user().expect("authenticated state has a user");
            println!("Logged in as {} (account {})", user.email(), user.account_no());
            if user.is_expired() {
                println!("The access token has expired; log in again");
            }
        }
    }
}
