//! Fruit Mall CLI - the storefront in a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! fruitmall home
//! fruitmall products --origin Jeju --sort price-asc --page 2
//! fruitmall search mango
//!
//! # Shop
//! fruitmall login -u kim -p secret
//! fruitmall cart add 3 --quantity 2
//! fruitmall checkout --recipient "Kim Minji" --phone 010-1234-5678 \
//!     --zip 06236 --address1 "Teheran-ro 152"
//!
//! # My Page
//! fruitmall profile --name "Kim Minji" --phone 010-9876-5432
//! fruitmall password --current secret --new 'fresh!fruit7' --confirm 'fresh!fruit7'
//!
//! # Check a route against the guards
//! fruitmall open /admin/orders
//! ```
//!
//! # Environment Variables
//!
//! - `FRUITMALL_API_URL` - Backend base URL
//! - `FRUITMALL_TOKEN_PATH` - Where the session token is kept
//! - `SENTRY_DSN` - Error tracking (optional)
//! - `RUST_LOG` - Log filter; logs go to stderr

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use fruit_mall_core::{CategoryId, OrderDetailId, OrderId, ProductId, ReviewId};
use fruit_mall_storefront::catalog::CatalogSort;
use fruit_mall_storefront::config::StorefrontConfig;
use fruit_mall_storefront::{AppContext, AppError};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "fruitmall")]
#[command(author, version, about = "Fruit Mall storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the newest products
    Home,
    /// Sign in
    Login {
        /// Username or email
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register(commands::account::RegisterArgs),
    /// Sign out and forget the session token
    Logout,
    /// Show the signed-in member
    Whoami,
    /// Edit my name, phone number and address
    Profile(commands::account::ProfileArgs),
    /// Change my password
    Password(commands::account::PasswordArgs),
    /// List products
    Products {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one product with its reviews
    Product {
        /// Product ID
        id: ProductId,
    },
    /// List the categories
    Categories,
    /// List one category's products
    Category {
        /// Category ID
        id: CategoryId,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Search products by keyword
    Search {
        /// Search keyword
        #[arg(id = "search_keyword", value_name = "KEYWORD")]
        keyword: String,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Order everything in the cart
    Checkout(commands::cart::CheckoutArgs),
    /// View and cancel orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Read and write reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Resolve a storefront path through the route guards
    Open {
        /// Path such as `/my-page/orders`
        path: String,
    },
}

/// Filters, sort and page shared by product listings.
#[derive(Args)]
struct ListArgs {
    /// Only this category
    #[arg(long)]
    category: Option<CategoryId>,

    /// Only this origin
    #[arg(long)]
    origin: Option<String>,

    /// Only this season
    #[arg(long)]
    season: Option<String>,

    /// Minimum price in won
    #[arg(long)]
    min_price: Option<i64>,

    /// Maximum price in won
    #[arg(long)]
    max_price: Option<i64>,

    /// Name contains
    #[arg(short, long)]
    keyword: Option<String>,

    /// `newest`, `price-asc`, `price-desc`, `name-asc` or `name-desc`
    #[arg(short, long, default_value = "newest")]
    sort: CatalogSort,

    /// Page number
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        product: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change a line's quantity
    Update {
        /// Cart line ID
        line: fruit_mall_core::CartItemId,

        /// New quantity
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Cart line ID
        line: fruit_mall_core::CartItemId,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add {
        /// Product ID
        product: ProductId,
    },
    /// Remove a saved product
    Remove {
        /// Product ID
        product: ProductId,
    },
    /// Save a product, or remove it if already saved
    Toggle {
        /// Product ID
        product: ProductId,
    },
    /// Remove everything
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List my orders
    List,
    /// Show one order
    Show {
        /// Order ID
        id: OrderId,
    },
    /// Cancel an order that has not shipped
    Cancel {
        /// Order ID
        id: OrderId,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Reviews of a product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// My reviews
    Mine,
    /// Review a delivered order line
    Write {
        /// Order line ID
        order_detail: OrderDetailId,

        /// 1 to 5 stars
        #[arg(short, long)]
        rating: u8,

        /// Review text
        #[arg(short, long)]
        content: String,

        /// Photo URL
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete one of my reviews
    Delete {
        /// Review ID
        id: ReviewId,
    },
    /// Lines of an order that can still be reviewed
    Reviewable {
        /// Order ID
        order: OrderId,
    },
}

/// Initialize Sentry error tracking.
///
/// Returns `None` if `SENTRY_DSN` is not configured.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
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

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            render::failure(&e.to_string());
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fruit_mall_storefront=info,fruit_mall_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let mut ctx = match AppContext::start(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            e.report();
            render::failure(&e.user_message());
            std::process::exit(1);
        }
    };

    let result = run(&mut ctx, cli).await;
    ctx.shutdown();

    if let Err(e) = result {
        tracing::debug!(error = %e, "Command failed");
        render::failure(&e.user_message());
        std::process::exit(1);
    }
}

async fn run(ctx: &mut AppContext, cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Home => commands::catalog::home(ctx).await,
        Commands::Login { username, password } => {
            commands::account::login(ctx, &username, password).await
        }
        Commands::Register(args) => commands::account::register(ctx, args).await,
        Commands::Logout => commands::account::logout(ctx),
        Commands::Whoami => commands::account::whoami(ctx).await,
        Commands::Profile(args) => commands::account::update_profile(ctx, args).await,
        Commands::Password(args) => commands::account::change_password(ctx, args).await,
        Commands::Products { list } => commands::catalog::products(ctx, list.into_query()).await,
        Commands::Product { id } => commands::catalog::product(ctx, id).await,
        Commands::Categories => commands::catalog::categories(ctx).await,
        Commands::Category { id, list } => {
            commands::catalog::category(ctx, id, list.into_query()).await
        }
        Commands::Search { keyword, list } => {
            commands::catalog::search(ctx, &keyword, list.into_query()).await
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx).await,
            CartAction::Add { product, quantity } => {
                commands::cart::add(ctx, product, quantity).await
            }
            CartAction::Update { line, quantity } => {
                commands::cart::update(ctx, line, quantity).await
            }
            CartAction::Remove { line } => commands::cart::remove(ctx, line).await,
            CartAction::Clear => commands::cart::clear(ctx).await,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(ctx).await,
            WishlistAction::Add { product } => commands::wishlist::add(ctx, product).await,
            WishlistAction::Remove { product } => commands::wishlist::remove(ctx, product).await,
            WishlistAction::Toggle { product } => commands::wishlist::toggle(ctx, product).await,
            WishlistAction::Clear => commands::wishlist::clear(ctx).await,
        },
        Commands::Checkout(args) => commands::cart::checkout(ctx, args).await,
        Commands::Orders { action } => match action {
            OrderAction::List => commands::orders::list(ctx).await,
            OrderAction::Show { id } => commands::orders::show(ctx, id).await,
            OrderAction::Cancel { id } => commands::orders::cancel(ctx, id).await,
        },
        Commands::Reviews { action } => match action {
            ReviewAction::Product { id } => commands::reviews::product(ctx, id).await,
            ReviewAction::Mine => commands::reviews::mine(ctx).await,
            ReviewAction::Write {
                order_detail,
                rating,
                content,
                image_url,
            } => commands::reviews::write(ctx, order_detail, rating, &content, image_url).await,
            ReviewAction::Delete { id } => commands::reviews::delete(ctx, id).await,
            ReviewAction::Reviewable { order } => commands::reviews::reviewable(ctx, order).await,
        },
        Commands::Open { path } => {
            commands::catalog::open(ctx, &path).await;
            Ok(())
        }
    }
}

impl ListArgs {
    fn into_query(self) -> fruit_mall_storefront::catalog::CatalogQuery {
        use fruit_mall_core::Price;
        use fruit_mall_storefront::catalog::{CatalogFilters, CatalogQuery};

        CatalogQuery {
            filters: CatalogFilters {
                category: self.category,
                origin: self.origin,
                season: self.season,
                min_price: self.min_price.map(Price::from_won),
                max_price: self.max_price.map(Price::from_won),
                keyword: self.keyword,
            },
            sort: self.sort,
            page: self.page,
        }
    }
}
