use anyhow::Context as _;
use clap::Parser as _;
use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

mod db;
mod error;
mod modules;
mod services;

use services::gateway::{ModGateway, SerenityGateway};
use services::giveaways::GiveawayService;
use services::ledger::LedgerService;
use services::punishments::PunishmentScheduler;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Publish commands. If no guild ID is provided, publish globally.
    #[arg(long, num_args = 0..)]
    publish: Option<Vec<u64>>,

    /// Clear all commands instead of publishing them.
    #[arg(long)]
    clear: bool,

    /// Rollback the specified number of migrations and run all migrations again.
    #[arg(long, num_args = 0..=1, default_missing_value = "1")]
    refresh_migrations: Option<u32>,
}

// Custom user data passed to all command functions
pub struct Data {
    pub ledger: Arc<LedgerService>,
    pub scheduler: Arc<PunishmentScheduler>,
    pub giveaways: Arc<GiveawayService>,
    pub gateway: Arc<SerenityGateway>,
    /// Entrant that always wins a slot when present in a giveaway pool.
    pub preferred_winner: Option<i64>,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting warden...");

    // Establish database connection
    let db = db::establish_connection()
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    if let Some(depth) = args.refresh_migrations {
        info!("Refreshing migrations (down {}, then up)...", depth);
        db::migrations::Migrator::down(&db, Some(depth))
            .await
            .context("Failed to rollback migration")?;
    }

    db::migrations::Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;

    if args.refresh_migrations.is_some() {
        info!("Migrations refreshed successfully.");
        std::process::exit(0);
    }

    let token = serenity::Token::from_env("DISCORD_TOKEN").expect("missing DISCORD_TOKEN");
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MODERATION
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let preferred_winner = match std::env::var("PREFERRED_WINNER_ID") {
        Ok(raw) => match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("PREFERRED_WINNER_ID is not a valid id, ignoring it");
                None
            }
        },
        Err(_) => None,
    };

    let http = Arc::new(serenity::HttpBuilder::new(token.clone()).build());

    // Initialize services
    let ledger = Arc::new(LedgerService::new(db.clone()));
    let gateway = Arc::new(SerenityGateway::new(http.clone()));
    let scheduler = Arc::new(PunishmentScheduler::new(
        ledger.clone(),
        gateway.clone() as Arc<dyn ModGateway>,
    ));
    let giveaways = Arc::new(GiveawayService::new(db.clone()));

    let framework_options = poise::FrameworkOptions {
        commands: modules::commands(),
        ..Default::default()
    };

    // Handle command registration if requested
    if let Some(publish_args) = args.publish {
        let bot_user = http
            .get_current_user()
            .await
            .context("Failed to fetch bot user info")?;

        let http = serenity::HttpBuilder::new(token.clone())
            .application_id(serenity::ApplicationId::new(bot_user.id.get()))
            .build();

        let empty_commands = vec![];
        let commands = if args.clear {
            &empty_commands
        } else {
            &framework_options.commands
        };

        if publish_args.is_empty() {
            if args.clear {
                info!("Clearing commands globally...");
            } else {
                info!("Registering commands globally...");
            }

            if let Err(e) = poise::builtins::register_globally(&http, commands).await {
                error!("Failed to register commands globally: {}", e);
            } else {
                info!("Global command operation successful");
            }
        } else {
            for guild_id in publish_args {
                if args.clear {
                    info!("Clearing commands in guild {}...", guild_id);
                } else {
                    info!("Registering commands in guild {}...", guild_id);
                }

                if let Err(e) = poise::builtins::register_in_guild(
                    &http,
                    commands,
                    serenity::GuildId::new(guild_id),
                )
                .await
                {
                    error!("Failed to register commands in guild {}: {}", guild_id, e);
                } else {
                    info!("Guild command operation successful for guild {}", guild_id);
                }
            }
        }
        std::process::exit(0);
    }

    // Create the poise framework
    let framework = poise::Framework::new(framework_options);

    // Build the client with both poise framework and custom event handler
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(Box::new(framework))
        .event_handler(Arc::new(services::event_manager::Handler))
        .data(Arc::new(Data {
            ledger,
            scheduler: scheduler.clone(),
            giveaways: giveaways.clone(),
            gateway,
            preferred_winner,
        }) as _)
        .await
        .context("Failed to create client")?;

    // Recover in-flight punishments before taking any commands: overdue ones
    // settle now, pending ones get their timers back
    scheduler
        .restore()
        .await
        .context("Failed to restore punishments")?;

    // Start the punishment reconciliation sweep
    scheduler.start_reconcile_runner();

    // Start the giveaway sweep
    giveaways.start_sweep_runner(http, preferred_winner);

    info!("Bot is ready!");
    client.start_autosharded().await.context("Client error")?;

    Ok(())
}
