//! `promo`: command-line front end for the promotions scoring engine.
//!
//! Usage:
//!   promo -c <context-name-or-path> [-o json] <command>
//!
//! The context name resolves to `/etc/promo/<name>.toml`.
//! If a path with `/` or ending in `.toml` is given, it's used directly.

mod bootstrap;
mod commands;
mod config;

use clap::{Parser, Subcommand};
use promo::model::{CreatePromotion, CreateUser, PromotionQuery, ReactRequest};
use tracing::info;

use config::ServerConfig;

/// Promotions feed scoring engine.
#[derive(Parser, Debug)]
#[command(name = "promo", about = "Promotions feed scoring engine")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", global = true, default_value = "default")]
    config: String,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// User accounts.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Promotions.
    Promotion {
        #[command(subcommand)]
        action: PromotionAction,
    },

    /// React to a promotion. Repeating a like or favorite undoes it.
    React {
        /// Reacting user.
        #[arg(long)]
        user: String,
        /// Owner of the promotion.
        #[arg(long)]
        owner: String,
        /// Promotion id.
        #[arg(long)]
        promotion: String,
        /// favorite, like or comment.
        #[arg(long)]
        kind: String,
        /// Comment text (required for comments).
        #[arg(long)]
        comment: Option<String>,
    },

    /// Show a stored interaction.
    Interaction {
        /// Interaction id.
        id: String,
    },

    /// Top users by points earned in a trailing window.
    Leaderboard {
        /// Window length in days.
        #[arg(long)]
        days: Option<i64>,
        /// Number of users.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Recompute a user's score, level and tier from the ledger.
    Rebuild {
        /// User id.
        user: String,
    },

    /// Promotion categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum UserAction {
    /// Register a user.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        picture_url: Option<String>,
    },
    /// Show a user.
    Get { id: String },
    /// Set a user's picture URL.
    Picture { id: String, url: String },
}

#[derive(Subcommand, Debug)]
enum PromotionAction {
    /// Publish a promotion.
    Create {
        /// Owner user id.
        #[arg(long)]
        owner: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        link: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        original_price: Option<String>,
        #[arg(long)]
        discounted_price: Option<String>,
        #[arg(long)]
        discount_badge: Option<String>,
        #[arg(long)]
        platform: Option<String>,
        /// Category (repeatable).
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Show a promotion.
    Get { id: String },
    /// Search promotions. Matches any given filter.
    Search {
        /// Category (repeatable).
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Case-insensitive text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Set a promotion's image URL.
    Image { id: String, url: String },
}

#[derive(Subcommand, Debug)]
enum CategoryAction {
    /// Add a category.
    Add { name: String },
    /// List categories.
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Load and validate the configuration without opening the store.
    Check,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.output == "json";

    if let Commands::Version = cli.command {
        println!("promo v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    let engine = bootstrap::verify_config(&server_config)?;

    if let Commands::Config { action: ConfigAction::Check } = cli.command {
        println!("configuration OK: {}", config_path.display());
        println!("  store:        {}", server_config.storage.resolve_db_path().display());
        println!("  weights:      {:?}", engine.scorer.weights());
        println!("  tiers:        {:?}", engine.tiers.ladder().tiers());
        println!("  leaderboard:  {:?}", engine.leaderboard);
        return Ok(());
    }

    let svc = bootstrap::open_service(&server_config, engine)?;

    match cli.command {
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                picture_url,
            } => commands::user::create(
                &svc,
                CreateUser {
                    name,
                    email,
                    picture_url,
                },
                json,
            )?,
            UserAction::Get { id } => commands::user::get(&svc, &id, json)?,
            UserAction::Picture { id, url } => commands::user::set_picture(&svc, &id, &url, json)?,
        },

        Commands::Promotion { action } => match action {
            PromotionAction::Create {
                owner,
                title,
                link,
                description,
                original_price,
                discounted_price,
                discount_badge,
                platform,
                categories,
            } => commands::promotion::create(
                &svc,
                CreatePromotion {
                    user_id: owner,
                    title,
                    link,
                    description,
                    original_price,
                    discounted_price,
                    discount_badge,
                    platform,
                    categories,
                },
                json,
            )?,
            PromotionAction::Get { id } => commands::promotion::get(&svc, &id, json)?,
            PromotionAction::Search { categories, search } => {
                commands::promotion::search(&svc, &PromotionQuery { categories, search }, json)?
            }
            PromotionAction::Image { id, url } => {
                commands::promotion::set_image(&svc, &id, &url, json)?
            }
        },

        Commands::React {
            user,
            owner,
            promotion,
            kind,
            comment,
        } => commands::score::react(
            &svc,
            ReactRequest {
                user_id: user,
                owner_user_id: owner,
                promotion_id: promotion,
                kind,
                comment,
            },
            json,
        )?,

        Commands::Interaction { id } => commands::score::interaction(&svc, &id, json)?,

        Commands::Leaderboard { days, limit } => {
            commands::score::leaderboard(&svc, days, limit, json)?
        }

        Commands::Rebuild { user } => commands::user::rebuild(&svc, &user, json)?,

        Commands::Category { action } => match action {
            CategoryAction::Add { name } => commands::promotion::add_category(&svc, &name, json)?,
            CategoryAction::List => commands::promotion::list_categories(&svc, json)?,
        },

        Commands::Config { .. } | Commands::Version => {}
    }

    Ok(())
}
