//! AiGENThix CMS command line.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is kept in $CMS_STATE_DIR/credentials.json)
//! cms login -e editor@aigenthix.com
//!
//! # List, inspect and edit posts
//! cms blogs list
//! cms blogs get 12
//! cms blogs create -f post.json
//! cms blogs update 12 -f post.json
//!
//! # Toggle and bulk actions
//! cms blogs publish 12
//! cms blogs feature 12
//! cms blogs bulk-delete 3 4 5
//!
//! # Upload an image and print its URL
//! cms blogs upload cover.png
//! ```
//!
//! # Environment Variables
//!
//! - `CMS_API_URL` - Content API base URL (default: `http://localhost:8000`)
//! - `CMS_API_TIMEOUT_MS` - Per-request timeout (default: 15000)
//! - `CMS_STATE_DIR` - Credential directory (default: `.cms-admin`)
//! - `CMS_PASSWORD` - Password for `login` when `--password` is omitted

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use aigenthix_core::BlogId;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cms")]
#[command(author, version, about = "AiGENThix content management CLI")]
struct Cli {
    /// Directory holding the stored credential
    #[arg(long, env = "CMS_STATE_DIR", default_value = ".cms-admin", global = true)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the token
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "CMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage blog posts
    Blogs {
        #[command(subcommand)]
        action: BlogAction,
    },
}

#[derive(Subcommand)]
enum BlogAction {
    /// List every post, drafts included
    List,
    /// Show one post
    Get { id: BlogId },
    /// Create a post from a JSON file (`-` reads stdin)
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Replace a post from a JSON file (`-` reads stdin)
    Update {
        id: BlogId,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a post
    Delete { id: BlogId },
    /// Toggle a post's published flag
    Publish { id: BlogId },
    /// Toggle a post's featured flag
    Feature { id: BlogId },
    /// Publish several posts
    BulkPublish {
        #[arg(required = true)]
        ids: Vec<BlogId>,
    },
    /// Unpublish several posts
    BulkUnpublish {
        #[arg(required = true)]
        ids: Vec<BlogId>,
    },
    /// Delete several posts
    BulkDelete {
        #[arg(required = true)]
        ids: Vec<BlogId>,
    },
    /// Upload an image and print its URL
    Upload { path: PathBuf },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let ctx = commands::Context::load(&cli.state_dir)?;
    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, &email, password).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Blogs { action } => match action {
            BlogAction::List => commands::blogs::list(&ctx).await,
            BlogAction::Get { id } => commands::blogs::get(&ctx, id).await,
            BlogAction::Create { file } => commands::blogs::create(&ctx, &file).await,
            BlogAction::Update { id, file } => commands::blogs::update(&ctx, id, &file).await,
            BlogAction::Delete { id } => commands::blogs::delete(&ctx, id).await,
            BlogAction::Publish { id } => commands::blogs::toggle_publish(&ctx, id).await,
            BlogAction::Feature { id } => commands::blogs::toggle_featured(&ctx, id).await,
            BlogAction::BulkPublish { ids } => {
                commands::blogs::bulk(&ctx, aigenthix_admin::api::BulkAction::Publish, &ids).await
            }
            BlogAction::BulkUnpublish { ids } => {
                commands::blogs::bulk(&ctx, aigenthix_admin::api::BulkAction::Unpublish, &ids)
                    .await
            }
            BlogAction::BulkDelete { ids } => {
                commands::blogs::bulk(&ctx, aigenthix_admin::api::BulkAction::Delete, &ids).await
            }
            BlogAction::Upload { path } => commands::blogs::upload(&ctx, &path).await,
        },
    }
}
