/// Harvest - crop marketplace command-line client
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use harvest_cli::{CliConfig, SessionFile};
use harvest_client::{BackendConfig, HarvestClient};
use harvest_core::{HarvestError, IdentityProvider, ListingId};
use harvest_dashboard::{
    BuyerDashboard, BuyerRegistration, DashboardController, DashboardEvent, DashboardUpdate,
    FarmerRegistration, GateAction, ListingsPanel, LoginForm, RecommendationsPanel, Redirect,
    SortKey,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Harvest crop marketplace client", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./harvest.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct AccountArgs {
    /// Account email
    #[arg(long, env = "HARVEST_EMAIL")]
    email: String,
    /// Account password
    #[arg(long, env = "HARVEST_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a farmer account
    RegisterFarmer {
        #[command(flatten)]
        account: AccountArgs,
        #[arg(long, default_value = "")]
        full_name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, default_value = "")]
        district: String,
        /// Farm size in acres
        #[arg(long, default_value = "")]
        farm_size: String,
        /// Comma-separated crop names
        #[arg(long, default_value = "")]
        crops: String,
    },
    /// Create a buyer account
    RegisterBuyer {
        #[command(flatten)]
        account: AccountArgs,
        #[arg(long, default_value = "")]
        business_name: String,
        #[arg(long, default_value = "")]
        contact_person: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        business_type: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, default_value = "")]
        city: String,
        /// Comma-separated crop names to get recommendations for
        #[arg(long, default_value = "")]
        interested_crops: String,
    },
    /// Sign in
    Login {
        #[command(flatten)]
        account: AccountArgs,
        /// farmer or buyer
        #[arg(long, default_value = "")]
        user_type: String,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Show the buyer dashboard
    Dashboard {
        /// Free-text search over crop name and category
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        quality: String,
        /// newest, price-low, price-high or quantity
        #[arg(long, default_value = "newest")]
        sort: SortKey,
    },
    /// Contact the farmer of a listing
    Contact {
        /// Listing id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "harvest=info,harvest_client=info,harvest_dashboard=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;
    let session = SessionFile::new(config.session_file.clone());

    let mut backend = BackendConfig::new(config.backend_url.clone());
    backend.api_key = config.backend_api_key.clone();
    backend.id_token = session.load()?;
    let client = Arc::new(HarvestClient::new(backend)?);

    match cli.command {
        Commands::RegisterFarmer {
            account,
            full_name,
            phone,
            state,
            district,
            farm_size,
            crops,
        } => {
            let form = FarmerRegistration {
                full_name,
                email: account.email,
                phone,
                password: account.password,
                state,
                district,
                farm_size,
                crops,
            };
            let redirect =
                harvest_dashboard::register_farmer(client.as_ref(), client.as_ref(), &form)
                    .await
                    .map_err(user_error)?;
            save_session(&client, &session).await?;
            follow(&redirect).await;
        }
        Commands::RegisterBuyer {
            account,
            business_name,
            contact_person,
            phone,
            business_type,
            state,
            city,
            interested_crops,
        } => {
            let form = BuyerRegistration {
                business_name,
                contact_person,
                email: account.email,
                phone,
                password: account.password,
                business_type,
                state,
                city,
                interested_crops,
            };
            let redirect =
                harvest_dashboard::register_buyer(client.as_ref(), client.as_ref(), &form)
                    .await
                    .map_err(user_error)?;
            save_session(&client, &session).await?;
            follow(&redirect).await;
        }
        Commands::Login { account, user_type } => {
            let form = LoginForm {
                email: account.email,
                password: account.password,
                user_type,
            };
            let redirect = harvest_dashboard::login(client.as_ref(), &form)
                .await
                .map_err(user_error)?;
            save_session(&client, &session).await?;
            follow(&redirect).await;
        }
        Commands::Logout => {
            let redirect = harvest_dashboard::logout(client.as_ref())
                .await
                .map_err(|e| anyhow::anyhow!("Logout failed: {}", e.user_message()))?;
            session.clear()?;
            follow(&redirect).await;
        }
        Commands::Dashboard {
            search,
            category,
            quality,
            sort,
        } => {
            let Some(controller) = open_dashboard(&client).await? else {
                return Ok(());
            };
            for event in [
                DashboardEvent::SearchChanged(search),
                DashboardEvent::CategoryChanged(category),
                DashboardEvent::QualityChanged(quality),
                DashboardEvent::SortChanged(sort),
            ] {
                controller.handle(event).await;
            }
            print_dashboard(&*controller.view().await);
        }
        Commands::Contact { id } => {
            let Some(controller) = open_dashboard(&client).await? else {
                return Ok(());
            };
            match controller
                .handle(DashboardEvent::ContactRequested(ListingId::new(id)))
                .await
            {
                DashboardUpdate::ContactOpened(card) => println!("{card}"),
                DashboardUpdate::Notice(notice) => eprintln!("{notice}"),
                _ => {}
            }
        }
    }

    Ok(())
}

type Controller = DashboardController<HarvestClient, HarvestClient>;

/// Restore the saved session and load the dashboard, or explain why not
async fn open_dashboard(client: &Arc<HarvestClient>) -> anyhow::Result<Option<Controller>> {
    client
        .restore_session()
        .await
        .context("Could not restore session")?;

    let controller = DashboardController::new(Arc::clone(client), Arc::clone(client));
    match controller.on_auth_state(&client.current_state()).await {
        GateAction::Load(_) => Ok(Some(controller)),
        GateAction::Redirect(route) => {
            eprintln!("Not signed in. Please log in first ({}).", route.page());
            Ok(None)
        }
    }
}

fn print_dashboard(view: &BuyerDashboard) {
    if let Some(greeting) = view.greeting() {
        println!("{greeting}");
        println!();
    }

    println!("Recommended for you");
    match view.recommendations_panel() {
        RecommendationsPanel::Loading => println!("  ..."),
        RecommendationsPanel::Notice(notice) => println!("  {notice}"),
        RecommendationsPanel::Cards(cards) => {
            for card in cards {
                println!("{card}");
            }
        }
    }
    println!();

    println!("All crops ({})", view.crop_count());
    match view.listings_panel() {
        ListingsPanel::Loading => println!("  ..."),
        ListingsPanel::Error(notice) | ListingsPanel::Empty(notice) => println!("  {notice}"),
        ListingsPanel::Cards(cards) => {
            for card in cards {
                println!("{card}");
                println!();
            }
        }
    }
}

async fn save_session(client: &HarvestClient, session: &SessionFile) -> anyhow::Result<()> {
    match client.id_token().await {
        Some(token) => session.save(&token)?,
        None => bail!("Backend did not return a session token"),
    }
    Ok(())
}

/// Announce a redirect and wait out its delay
async fn follow(redirect: &Redirect) {
    if let Some(message) = &redirect.message {
        println!("{message}");
    }
    tokio::time::sleep(redirect.delay).await;
    println!("-> {}", redirect.route.page());
}

fn user_error(e: HarvestError) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}
