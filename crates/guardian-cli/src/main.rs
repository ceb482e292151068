use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use guardian_core::auth::Role;
use guardian_core::rate_limit::Queue;
use guardian_core::review::{ReviewQuery, RiskFilter, SortOrder, StatusFilter, TierFilter};
use guardian_core::session::Plan;
use guardian_core::view::ActiveView;
use guardian_execution::{LogOptions, init_logging};
use guardian_infrastructure::{ConfigService, GuardianPaths};

mod commands;
mod views;

use commands::AppContext;
use commands::session::LoginArgs;

#[derive(Parser)]
#[command(name = "guardian")]
#[command(about = "Guardian - human-in-the-loop oversight console for AI automation", long_about = None)]
struct Cli {
    /// Configuration directory (defaults to $GUARDIAN_HOME, then the platform config dir)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Show info-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show debug-level logs
    #[arg(long, global = true)]
    debug: bool,

    /// Without a subcommand the active view (the dashboard) is shown
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a plan (demo) or with an account
    Login {
        /// Plan to subscribe to: standard, vip or enterprise
        #[arg(long, required_unless_present = "email")]
        plan: Option<Plan>,
        #[arg(long, requires = "password")]
        email: Option<String>,
        #[arg(long, requires = "email")]
        password: Option<String>,
        /// Create the account first
        #[arg(long, requires = "email")]
        sign_up: bool,
    },
    /// End the current session
    Logout,
    /// Impersonate a role: admin, viewer or auditor
    Role { role: Role },
    /// Run the onboarding wizard
    Wizard {
        #[arg(long)]
        skip: bool,
    },
    /// Show stats and queue health
    Dashboard,
    /// List the review queue
    Review {
        #[arg(long, default_value_t = TierFilter::All)]
        tier: TierFilter,
        #[arg(long, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        #[arg(long, default_value_t = RiskFilter::All)]
        risk: RiskFilter,
        /// newest, oldest, confidence-asc or confidence-desc
        #[arg(long, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },
    /// Approve a pending task, optionally replacing its draft
    Approve {
        id: String,
        #[arg(long)]
        text: Option<String>,
    },
    /// Reject a pending task
    Reject { id: String },
    /// Show the ghost audit report
    Audit,
    /// Show session, role, kill switch and rate limits
    Settings,
    /// Engage or release the global kill switch (admin)
    KillSwitch { state: SwitchState },
    /// Set a queue's rate limit in requests per second (admin)
    RateLimit { queue: Queue, value: u32 },
    /// Restore the default dashboard counters
    ResetStats,
    /// Run the live task feed
    Simulate {
        /// Stop after this many seconds instead of waiting for Ctrl-C
        #[arg(long)]
        duration: Option<u64>,
        /// Seed for a reproducible feed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Assess content for compliance risk
    Analyze {
        content: String,
        #[arg(long)]
        context: Option<String>,
    },
    /// Detect and redact PII
    Redact { text: String },
    /// Ask the analysis model for suggestions
    Suggest { prompt: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SwitchState {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let home = cli.home.as_deref();

    let config = ConfigService::new(home)
        .and_then(|service| service.load())
        .context("Failed to load config.toml")?;

    let file_dir = if config.logging.file {
        Some(GuardianPaths::new(home).logs_dir()?)
    } else {
        None
    };
    let _log_guard = init_logging(&LogOptions {
        verbose: cli.verbose,
        debug: cli.debug,
        level: config.logging.level.clone(),
        file_dir,
    })?;

    let ctx = AppContext::bootstrap(home, config).await?;
    ctx.verify_session().await;
    let _listener = ctx.auth.spawn_state_listener();

    let Some(command) = cli.command else {
        return commands::console::current(&ctx).await;
    };

    match command {
        Commands::Login {
            plan,
            email,
            password,
            sign_up,
        } => {
            commands::session::login(
                &ctx,
                LoginArgs {
                    plan,
                    email,
                    password,
                    sign_up,
                },
            )
            .await?
        }
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Role { role } => commands::session::set_role(&ctx, role).await?,
        Commands::Wizard { skip } => commands::session::wizard(&ctx, skip).await?,
        Commands::Dashboard => {
            commands::console::show(&ctx, ActiveView::Dashboard, &ReviewQuery::default()).await?
        }
        Commands::Review {
            tier,
            status,
            risk,
            sort,
        } => {
            let query = ReviewQuery {
                tier,
                status,
                risk,
                sort,
            };
            commands::console::show(&ctx, ActiveView::Reviews, &query).await?
        }
        Commands::Approve { id, text } => commands::console::approve(&ctx, &id, text).await?,
        Commands::Reject { id } => commands::console::reject(&ctx, &id).await?,
        Commands::Audit => {
            commands::console::show(&ctx, ActiveView::GhostReports, &ReviewQuery::default())
                .await?
        }
        Commands::Settings => {
            commands::console::show(&ctx, ActiveView::Settings, &ReviewQuery::default()).await?
        }
        Commands::KillSwitch { state } => {
            commands::control::kill_switch(&ctx, matches!(state, SwitchState::On)).await?
        }
        Commands::RateLimit { queue, value } => {
            commands::control::rate_limit(&ctx, queue, value).await?
        }
        Commands::ResetStats => commands::control::reset_stats(&ctx).await?,
        Commands::Simulate { duration, seed } => {
            commands::simulate::run(&ctx, duration, seed).await?
        }
        Commands::Analyze { content, context } => {
            commands::analyze::analyze(&ctx, &content, context.as_deref()).await?
        }
        Commands::Redact { text } => commands::analyze::redact(&ctx, &text).await?,
        Commands::Suggest { prompt } => commands::analyze::suggest(&ctx, &prompt).await?,
    }

    Ok(())
}
