use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use creator_desk::{
    config::{database, policy, users},
    core::{
        dates::parse_date,
        invitation::InvitationStore,
        kv::SystemStateStore,
        notification::Viewer,
        report,
        schedule::{DueListSort, SortKey},
    },
    errors::Result,
};
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "creator-desk")]
#[command(about = "Creator contract payments and negotiation notifications")]
struct Cli {
    /// Business policy file; built-in defaults are used when it does not exist
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List creators with a payment due for a brand
    Due {
        #[arg(long)]
        brand: String,
        /// Evaluation day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        as_of: Option<String>,
        /// Sort requests, applied in order like clicking column headers; the list
        /// starts sorted by due date ascending
        #[arg(long = "sort", value_enum)]
        sort: Vec<SortColumn>,
    },
    /// Show the notification feed for a staff member
    Notifications {
        #[arg(long)]
        viewer: String,
        /// View as an admin regardless of `ADMIN_EMAILS`
        #[arg(long)]
        admin: bool,
    },
    /// Mark an invitation notification as read
    MarkRead {
        #[arg(long)]
        viewer: String,
        #[arg(long)]
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortColumn {
    DueDate,
    Handle,
}

impl From<SortColumn> for SortKey {
    fn from(value: SortColumn) -> Self {
        match value {
            SortColumn::DueDate => Self::DueDate,
            SortColumn::Handle => Self::CreatorHandle,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load business policy
    let config = policy::load_config_or_default(&cli.config)
        .inspect_err(|e| error!("Failed to load policy configuration: {}", e))?;

    // 4. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    match cli.command {
        Commands::Due {
            brand,
            as_of,
            sort,
        } => {
            let as_of = match as_of {
                Some(raw) => parse_date(&raw)?,
                None => Utc::now().date_naive(),
            };
            let sort = sort
                .into_iter()
                .fold(DueListSort::default(), |current, column| {
                    current.toggle(column.into())
                });

            let due = report::generate_due_report(&db, &brand, as_of, sort, &config).await?;
            print!("{}", report::format_due_report(&due));
        }
        Commands::Notifications { viewer, admin } => {
            let role = users::resolve_role(&viewer, admin, &users::get_admin_emails());
            let viewer = Viewer {
                email: viewer,
                role,
            };

            let feed =
                report::generate_notification_feed(&db, &viewer, Utc::now(), &config).await?;
            print!("{}", report::format_notification_feed(&feed));
        }
        Commands::MarkRead { viewer, id } => {
            let kv = SystemStateStore::new(&db);
            let changed = InvitationStore::new(&kv)
                .mark_invitation_read(&viewer, &id)
                .await?;
            if changed {
                info!("Marked {} as read for {}", id, viewer);
            } else {
                info!("{} was already read or does not exist", id);
            }
        }
    }

    Ok(())
}
