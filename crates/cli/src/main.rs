//! Techstore CLI - storefront and back-office from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse and fill the cart
//! techstore products search laptop
//! techstore products add 78 laptop
//! techstore cart add '{"id": "p1", "title": "Cable", "price": 10}'
//! techstore cart set p1 3
//! techstore cart show
//!
//! # Accounts
//! techstore account register --document 12345678 --first-names Ana \
//!     --last-names Pérez -e ana@example.com -p 'Secreto#1'
//! techstore account login -e ana@example.com -p 'Secreto#1'
//!
//! # Back-office
//! techstore admin users --search maria --page 2
//! techstore admin delete-product 42
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the shopping cart
//! - `products` - Browse the product catalog
//! - `account` - Register, log in and out
//! - `admin` - Manage users and products of the admin API

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use techstore_storefront::config::StorefrontConfig;
use techstore_storefront::models::RegistrationForm;
use techstore_storefront::state::AppState;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "techstore")]
#[command(author, version, about = "Techstore storefront and back-office")]
struct Cli {
    /// Profile directory (overrides `TECHSTORE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Register, log in and out
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage users and products of the admin API
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents, item count and total
    Show,
    /// Add one unit of a product given as JSON (needs at least an `id`)
    Add {
        /// Product JSON, e.g. '{"id": 1, "title": "Phone", "price": 549}'
        product: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Set a product's quantity (0 or non-numeric removes it)
    Set {
        /// Product id
        id: String,
        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List the product categories
    Categories,
    /// Search products by category term
    Search {
        /// Search term (default: phone)
        term: Option<String>,
    },
    /// Add a product from a search to the cart
    Add {
        /// Product id
        id: i64,
        /// Search term the product was listed under (default: phone)
        term: Option<String>,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Register a new account
    Register {
        /// Identity document (8-11 digits)
        #[arg(long)]
        document: String,

        /// Given names
        #[arg(long)]
        first_names: String,

        /// Family names
        #[arg(long)]
        last_names: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (8+ characters, an uppercase letter, a digit and a symbol)
        #[arg(short, long)]
        password: String,
    },
    /// Log in and open a session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Close the session
    Logout,
    /// Show the logged-in account
    Whoami,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List users
    Users {
        /// Filter by name or email
        #[arg(short, long, default_value = "")]
        search: String,

        /// Page number (starts at 1)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// List products
    Products {
        /// Filter by title
        #[arg(short, long, default_value = "")]
        search: String,

        /// Page number (starts at 1)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create a product
    CreateProduct {
        #[command(flatten)]
        fields: commands::admin::ProductFields,
    },
    /// Update a product
    UpdateProduct {
        /// Product id
        id: String,

        #[command(flatten)]
        fields: commands::admin::ProductFields,
    },
    /// Delete a product
    DeleteProduct {
        /// Product id
        id: String,
    },
}

/// Initialize Sentry error tracking.
///
/// Returns a guard that must be kept alive for the duration of the program.
/// If `SENTRY_DSN` is not set, Sentry is disabled and this returns `None`.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry
                .environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry.sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Logs go to stderr so command output on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "techstore_storefront=warn,techstore_admin=warn,techstore_cli=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CommandError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), CommandError> {
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Cart { action } => run_cart(&AppState::open(config)?, action),
        Commands::Products { action } => run_products(&AppState::open(config)?, action).await,
        Commands::Account { action } => run_account(&AppState::open(config)?, action),
        // Admin commands talk to the admin API only
        Commands::Admin { action } => run_admin(action).await,
    }
}

fn run_cart(state: &AppState, action: CartAction) -> Result<(), CommandError> {
    match action {
        CartAction::Show => commands::cart::show(state),
        CartAction::Add { product } => commands::cart::add(state, &product)?,
        CartAction::Remove { id } => commands::cart::remove(state, &id)?,
        CartAction::Set { id, quantity } => commands::cart::set(state, &id, quantity)?,
        CartAction::Clear => commands::cart::clear(state),
    }
    Ok(())
}

async fn run_products(state: &AppState, action: ProductsAction) -> Result<(), CommandError> {
    match action {
        ProductsAction::Categories => commands::products::categories(state),
        ProductsAction::Search { term } => {
            commands::products::search(state, term.as_deref().unwrap_or_default()).await?;
        }
        ProductsAction::Add { id, term } => {
            commands::products::add(state, id, term.as_deref().unwrap_or_default()).await?;
        }
    }
    Ok(())
}

fn run_account(state: &AppState, action: AccountAction) -> Result<(), CommandError> {
    match action {
        AccountAction::Register {
            document,
            first_names,
            last_names,
            email,
            password,
        } => commands::account::register(
            state,
            RegistrationForm {
                document,
                first_names,
                last_names,
                email,
                password: SecretString::from(password),
            },
        )?,
        AccountAction::Login { email, password } => {
            commands::account::login(state, &email, &SecretString::from(password))?;
        }
        AccountAction::Logout => commands::account::logout(state)?,
        AccountAction::Whoami => commands::account::whoami(state),
    }
    Ok(())
}

async fn run_admin(action: AdminAction) -> Result<(), CommandError> {
    let client = commands::admin::client()?;

    match action {
        AdminAction::Users { search, page } => {
            commands::admin::users(&client, &search, page).await?;
        }
        AdminAction::Products { search, page } => {
            commands::admin::products(&client, &search, page).await?;
        }
        AdminAction::CreateProduct { fields } => {
            commands::admin::create_product(&client, fields).await?;
        }
        AdminAction::UpdateProduct { id, fields } => {
            commands::admin::update_product(&client, &id, fields).await?;
        }
        AdminAction::DeleteProduct { id } => commands::admin::delete_product(&client, &id).await?,
    }
    Ok(())
}
