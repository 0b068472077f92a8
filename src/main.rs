//! Command-line shim for the unimarket engine.
//!
//! This binary is the thin integration layer between the engine library and a
//! terminal: it translates CLI invocations into engine events, executes the
//! actions the handler returns (posting worker messages, running UI hooks),
//! and renders the computed view models as text.
//!
//! The engine itself stays headless — everything here could be replaced by a
//! richer front end without touching the library.
//!
//! # Subcommands
//!
//! - `browse`: fetch and display listings with optional filters
//! - `show`: fetch and display a single listing
//! - `post`: validate and submit a new listing
//! - `update`: apply a partial update to a listing
//! - `delete`: delete a listing
//!
//! # Configuration
//!
//! `--config` points at a TOML file; environment variables
//! (`UNIMARKET_API_URL`, `UNIMARKET_LOG`, ...) override it, and `--api-url`
//! overrides both. The CLI runs with a zero debounce window since every
//! invocation is one-shot.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use unimarket::app::FetchStatus;
use unimarket::domain::draft::DraftInput;
use unimarket::domain::{Category, Condition, ListingPatch, UserSession};
use unimarket::remote::HttpListingApi;
use unimarket::ui::viewmodel::{CatalogViewModel, GridCell, ListingDetail};
use unimarket::worker::{MarketWorker, WorkerMessage, WorkerResponse};
use unimarket::{handle_event, initialize, Action, AppState, Config, Event, UiHooks};

#[derive(Parser, Debug)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Listings API base URL (overrides config and environment).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse listings, optionally filtered.
    Browse {
        /// Case-insensitive search over name, description and category.
        #[arg(long)]
        search: Option<String>,

        /// Inclusive lower price bound.
        #[arg(long)]
        min_price: Option<f64>,

        /// Inclusive upper price bound.
        #[arg(long)]
        max_price: Option<f64>,

        /// Category filter (repeatable; the remote honors the first one).
        #[arg(long)]
        category: Vec<String>,

        /// Condition filter (repeatable; the remote honors the first one).
        #[arg(long)]
        condition: Vec<String>,
    },

    /// Show a single listing.
    Show {
        /// Listing id.
        id: i64,
    },

    /// Post a new listing.
    Post {
        /// Listing title.
        #[arg(long)]
        name: String,

        /// Listing description.
        #[arg(long)]
        description: String,

        /// Price (validated before anything is sent).
        #[arg(long)]
        price: String,

        /// Optional image URL.
        #[arg(long)]
        image_url: Option<String>,

        /// Category id (e.g. `electronics`, `textbooks`).
        #[arg(long)]
        category: String,

        /// Condition id (e.g. `new`, `like-new`).
        #[arg(long)]
        condition: String,

        /// Seller id for the session.
        #[arg(long, default_value_t = 1)]
        seller_id: i64,
    },

    /// Update fields of an existing listing.
    Update {
        /// Listing id.
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        image_url: Option<String>,

        /// Listing status (e.g. `active`, `sold`).
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        condition: Option<String>,
    },

    /// Delete a listing.
    Delete {
        /// Listing id.
        id: i64,
    },
}

/// Engine wiring for one CLI invocation: state, worker channels, hooks.
struct Shim {
    state: AppState,
    hooks: UiHooks,
    requests: mpsc::UnboundedSender<WorkerMessage>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
}

impl Shim {
    fn new(config: &Config) -> Result<Self> {
        let api = Arc::new(
            HttpListingApi::new(&config.api_base_url, config.request_timeout())
                .context("configuring listings API")?,
        );
        // One-shot invocations have no keystroke bursts to coalesce.
        let (requests, responses) = MarketWorker::spawn(api, std::time::Duration::ZERO);

        let hooks = UiHooks {
            on_listing_created: Some(Box::new(|listing| {
                println!("Created listing #{}: {}", listing.id, listing.name);
            })),
            on_navigate_home: Some(Box::new(|| {
                tracing::debug!("navigation signal: back to browsing");
            })),
        };

        Ok(Self {
            state: initialize(config),
            hooks,
            requests,
            responses,
        })
    }

    /// Feeds one event through the handler and executes the returned actions.
    fn dispatch(&mut self, event: &Event) -> Result<()> {
        let (_render, actions) = handle_event(&mut self.state, event)?;
        for action in actions {
            match action {
                Action::PostToWorker(message) => self.requests.send(message).map_err(|_| {
                    unimarket::MarketError::Worker("fetch worker is gone".to_string())
                })?,
                Action::AnnounceCreated(listing) => self.hooks.announce_created(&listing),
                Action::NavigateHome => self.hooks.navigate_home(),
            }
        }
        Ok(())
    }

    /// Receives one worker response and feeds it back as an event.
    async fn pump(&mut self) -> Result<WorkerResponse> {
        let response = self
            .responses
            .recv()
            .await
            .context("fetch worker stopped unexpectedly")?;
        self.dispatch(&Event::WorkerResponse(response.clone()))?;
        Ok(response)
    }

    /// Pumps responses until no fetch is in flight.
    async fn settle_fetch(&mut self) -> Result<()> {
        while self.state.catalog.status == FetchStatus::Loading {
            self.pump().await?;
        }
        Ok(())
    }

    /// Pumps responses until the composer leaves the submitting state.
    async fn settle_submit(&mut self) -> Result<()> {
        while self.state.composer.is_submitting() {
            self.pump().await?;
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(api_url) = &cli.api_url {
        config.api_base_url = api_url.clone();
    }
    init_tracing(&config);

    match cli.command {
        Command::Browse {
            search,
            min_price,
            max_price,
            category,
            condition,
        } => browse(&config, search, min_price, max_price, &category, &condition).await,
        Command::Show { id } => show(&config, id).await,
        Command::Post {
            name,
            description,
            price,
            image_url,
            category,
            condition,
            seller_id,
        } => {
            post(
                &config,
                PostArgs {
                    name,
                    description,
                    price,
                    image_url,
                    category,
                    condition,
                    seller_id,
                },
            )
            .await
        }
        Command::Update {
            id,
            name,
            description,
            price,
            image_url,
            status,
            category,
            condition,
        } => {
            let patch = ListingPatch {
                name,
                description,
                price,
                image_url,
                status,
                category: category.as_deref().map(Category::parse_strict).transpose()?,
                condition: condition
                    .as_deref()
                    .map(Condition::parse_strict)
                    .transpose()?,
            };
            update(&config, id, patch).await
        }
        Command::Delete { id } => delete(&config, id).await,
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = config
        .log_filter
        .clone()
        .map_or_else(EnvFilter::from_default_env, EnvFilter::new);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn browse(
    config: &Config,
    search: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    categories: &[String],
    conditions: &[String],
) -> Result<()> {
    let mut shim = Shim::new(config)?;

    if let Some(search) = search {
        shim.dispatch(&Event::SetSearchText(search))?;
    }
    if min_price.is_some() || max_price.is_some() {
        shim.dispatch(&Event::SetPriceRange {
            min: min_price.unwrap_or(0.0),
            max: max_price.unwrap_or(config.price_ceiling),
        })?;
    }
    for raw in categories {
        shim.dispatch(&Event::ToggleCategory(Category::parse_strict(raw)?))?;
    }
    for raw in conditions {
        shim.dispatch(&Event::ToggleCondition(Condition::parse_strict(raw)?))?;
    }
    if shim.state.catalog.status != FetchStatus::Loading {
        shim.dispatch(&Event::Refresh)?;
    }

    shim.settle_fetch().await?;
    render_catalog(&shim.state.compute_viewmodel());
    Ok(())
}

async fn show(config: &Config, id: i64) -> Result<()> {
    let mut shim = Shim::new(config)?;
    shim.dispatch(&Event::LoadListing(id))?;

    match shim.pump().await? {
        WorkerResponse::ListingLoaded { listing } => {
            render_detail(&ListingDetail::from_listing(&listing));
            Ok(())
        }
        WorkerResponse::Error { message } => bail!("{message}"),
        other => bail!("unexpected worker response: {other:?}"),
    }
}

struct PostArgs {
    name: String,
    description: String,
    price: String,
    image_url: Option<String>,
    category: String,
    condition: String,
    seller_id: i64,
}

async fn post(config: &Config, args: PostArgs) -> Result<()> {
    let mut shim = Shim::new(config)?;

    shim.dispatch(&Event::SessionStarted(UserSession::new(
        args.seller_id,
        "cli",
    )))?;
    shim.dispatch(&Event::DraftEdited(DraftInput::Name(args.name)))?;
    shim.dispatch(&Event::DraftEdited(DraftInput::Description(
        args.description,
    )))?;
    shim.dispatch(&Event::DraftEdited(DraftInput::Price(args.price)))?;
    if let Some(image_url) = args.image_url {
        shim.dispatch(&Event::DraftEdited(DraftInput::ImageUrl(image_url)))?;
    }
    shim.dispatch(&Event::DraftEdited(DraftInput::Category(Some(
        Category::parse_strict(&args.category)?,
    ))))?;
    shim.dispatch(&Event::DraftEdited(DraftInput::Condition(Some(
        Condition::parse_strict(&args.condition)?,
    ))))?;

    shim.dispatch(&Event::SubmitDraft)?;
    let composer_vm = shim.state.compute_composer_viewmodel();
    if !composer_vm.issues.is_empty() {
        for issue in &composer_vm.issues {
            eprintln!("  - {}", issue.message);
        }
        bail!("listing rejected by validation; nothing was sent");
    }

    shim.settle_submit().await?;
    if let Some(error) = shim.state.compute_composer_viewmodel().error {
        bail!("creation failed (draft preserved, rerun to retry): {error}");
    }
    Ok(())
}

async fn update(config: &Config, id: i64, patch: ListingPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("nothing to update: pass at least one field flag");
    }
    let mut shim = Shim::new(config)?;
    shim.dispatch(&Event::UpdateListing { id, patch })?;

    match shim.pump().await? {
        WorkerResponse::ListingUpdated { listing } => {
            println!("Updated listing #{}: {}", listing.id, listing.name);
            Ok(())
        }
        WorkerResponse::Error { message } => bail!("{message}"),
        other => bail!("unexpected worker response: {other:?}"),
    }
}

async fn delete(config: &Config, id: i64) -> Result<()> {
    let mut shim = Shim::new(config)?;
    shim.dispatch(&Event::DeleteListing(id))?;

    match shim.pump().await? {
        WorkerResponse::ListingDeleted { id } => {
            println!("Deleted listing #{id}");
            Ok(())
        }
        WorkerResponse::Error { message } => bail!("{message}"),
        other => bail!("unexpected worker response: {other:?}"),
    }
}

fn render_catalog(vm: &CatalogViewModel) {
    if let Some(banner) = &vm.banner {
        eprintln!("! {}", banner.message);
    }
    if let Some(empty) = &vm.empty_state {
        println!("{}", empty.message);
        return;
    }

    println!(
        "{:>6}  {:<28} {:>8}  {:<12} {:<10} {:<12} {}",
        "id", "title", "price", "category", "condition", "seller", "posted"
    );
    for cell in &vm.cells {
        match cell {
            GridCell::Placeholder => println!("{:>6}  {}", "…", "loading"),
            GridCell::Card(card) => println!(
                "{:>6}  {:<28} {:>8}  {:<12} {:<10} {:<12} {}",
                card.id,
                truncate(&card.title, 28),
                card.price_label,
                truncate(&card.category, 12),
                truncate(&card.condition, 10),
                truncate(&card.seller_name, 12),
                card.posted
            ),
        }
    }
}

fn render_detail(detail: &ListingDetail) {
    println!("#{} {}", detail.id, detail.title);
    println!("{} · {} · {}", detail.price_label, detail.category, detail.condition);
    println!("seller: {} · posted {}", detail.seller_name, detail.posted);
    println!("image: {}", detail.image_url);
    println!();
    println!("{}", detail.description);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}
