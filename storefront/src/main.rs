//! Storefront command line.
//!
//! Every command starts a session against the file-backed storage, enters
//! its page through the router (so the login and guest guards apply) and
//! prints the result as JSON.
//!
//! ```text
//! storefront login --username johnd --password 'm38rmF$'
//! storefront products --category male
//! storefront add-to-cart 3 --quantity 2
//! storefront logout
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storefront::constants::routes;
use storefront::forms::{LoginForm, RegisterForm};
use storefront::providers::Navigator;
use storefront::router::Navigation;
use storefront::types::{CategoryFilter, ProductId, UserId};
use storefront::{Config, Environment, LiveEnvironment, Storefront};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and persist the session token
    Login {
        /// Login name
        #[arg(long)]
        username: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        /// Login name
        #[arg(long)]
        username: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
        /// Password confirmation
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the session token
    Logout,
    /// List products, optionally of one category
    Products {
        /// male, female, jewelery or electronics
        #[arg(long)]
        category: Option<CategoryFilter>,
    },
    /// Show one product
    Product {
        /// Product id
        id: ProductId,
    },
    /// Show the cart lines
    Cart,
    /// Add a product to the cart
    AddToCart {
        /// Product id
        product_id: ProductId,
        /// Number of items
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Show a user profile
    Profile {
        /// User id; the configured user when omitted
        #[arg(long)]
        id: Option<UserId>,
    },
    /// Show the session state
    Status,
}

#[derive(Serialize)]
struct Status {
    logged_in: bool,
    location: String,
    state: storefront::AppState,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info,storefront_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Enter `path`; fails when a guard sends the session elsewhere.
async fn enter(storefront: &Storefront<LiveEnvironment>, path: &str) -> anyhow::Result<()> {
    match storefront.navigate(path).await? {
        Navigation::Allowed(_) => Ok(()),
        Navigation::Redirected { to, .. } if to.path() == routes::LOGIN => {
            bail!("Not logged in; run `storefront login` first")
        },
        Navigation::Redirected { to, .. } => {
            bail!("Already logged in; redirected to {to}")
        },
    }
}

async fn run(command: Command, storefront: &Storefront<LiveEnvironment>) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            enter(storefront, routes::LOGIN).await?;
            storefront.login(LoginForm::new(username, password)).await?;
            print_json(&storefront.state().await.auth)
        },

        Command::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            enter(storefront, routes::REGISTER).await?;
            storefront
                .register(RegisterForm {
                    username,
                    email,
                    password,
                    confirm_password,
                })
                .await?;
            print_json(&storefront.state().await.auth)
        },

        Command::Logout => {
            storefront.logout().await?;
            print_json(&storefront.state().await.auth)
        },

        Command::Products { category } => {
            enter(storefront, routes::PRODUCTS).await?;
            storefront.load_products().await?;
            if let Some(category) = category {
                storefront.select_category(category).await?;
            }
            print_json(&*storefront.filtered_products().await)
        },

        Command::Product { id } => {
            enter(storefront, &format!("{}/{id}", routes::PRODUCTS)).await?;
            print_json(&storefront.product(id).await?)
        },

        Command::Cart => {
            enter(storefront, routes::CART).await?;
            print_json(&*storefront.load_cart().await?)
        },

        Command::AddToCart {
            product_id,
            quantity,
        } => {
            enter(storefront, routes::PRODUCTS).await?;
            print_json(&storefront.add_to_cart(product_id, quantity).await?)
        },

        Command::Profile { id } => {
            enter(storefront, routes::PROFILE).await?;
            print_json(&storefront.load_profile(id).await?)
        },

        Command::Status => print_json(&Status {
            logged_in: storefront.is_logged_in().await,
            location: storefront.store().environment().navigator().current_url(),
            state: storefront.state().await,
        }),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let env = LiveEnvironment::from_config(&config)?;
    let storefront = Storefront::bootstrap(env, &config)
        .await
        .context("Failed to start storefront session")?;

    let result = run(cli.command, &storefront).await;

    if let Err(error) = storefront.shutdown().await {
        tracing::warn!(%error, "Effects still running at exit");
    }

    result
}
