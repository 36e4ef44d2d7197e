use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Discord bot that verifies student emails against a roster and grants a role
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Register slash commands per-guild in every guild the bot is in
    #[arg(long, short = 's')]
    sync_commands: bool,

    /// Specific guild ID to register commands to (overrides GUILD_ID)
    #[arg(long)]
    guild_id: Option<u64>,

    /// Log at DEBUG level
    #[arg(long, short = 'v')]
    verbose: bool,
}

mod commands;
mod config;
mod error;
mod events;
mod logging;
mod managers;
mod messages;
mod roster;
mod verification;
mod web;

use commands::{ping, verify};
use config::BotConfig;
use events::{handle_guild_create, handle_interaction, handle_message};
use managers::{run_startup_permission_check, DiscordRoleGranter};
use roster::RosterClient;
use verification::VerificationService;

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared application state
pub struct Data {
    pub config: Arc<BotConfig>,
    pub verification: VerificationService,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = handle_message(ctx, new_message, data).await {
                error!("Failed to handle message: {}", e);
            }
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            if let Err(e) = handle_interaction(ctx, interaction, data).await {
                error!("Failed to handle interaction: {}", e);
            }
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if let Err(e) = handle_guild_create(ctx, guild, *is_new, data).await {
                error!("Failed to handle guild create: {}", e);
            }
        }
        _ => {}
    }
    Ok(())
}

/// The first token segment is the base64 encoded application ID
fn bot_id_from_token(token: &str) -> Option<String> {
    use base64::Engine;

    let encoded = token.split('.').next()?;
    let decoded = base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(encoded)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(encoded))
        .ok()?;
    String::from_utf8(decoded).ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    logging::init(args.verbose);

    let config = Arc::new(BotConfig::from_env()?);

    if let Some(id) = bot_id_from_token(&config.discord_token) {
        info!("Bot ID: {} (configure intents at https://discord.com/developers/applications/{}/bot)", id, id);
    }

    info!(
        "Roster consumption {}, detailed reasons {}, modal flow {}",
        if config.roster.consume { "on" } else { "off" },
        if config.detailed_reasons { "on" } else { "off" },
        if config.modal_flow { "on" } else { "off" },
    );

    // Up before the gateway connects so the hosting probe passes during login
    let web_config = web::WebServerConfig { port: config.port };
    let web_state = web::AppState {
        started_at: chrono::Utc::now(),
    };
    tokio::spawn(async move {
        if let Err(e) = web::start_web_server(web_config, web_state).await {
            error!("Health server error: {}", e);
        }
    });

    let roster_client = Arc::new(RosterClient::new(config.roster.clone())?);

    let sync_commands = args.sync_commands;
    let target_guild_id = args
        .guild_id
        .map(serenity::GuildId::new)
        .or(config.guild_id);

    if sync_commands {
        info!("--sync-commands: Will register commands in every guild");
    }
    match target_guild_id {
        Some(gid) => info!("Registering commands to guild {}", gid),
        None => info!("Registering commands globally (takes up to 1 hour to propagate)"),
    }

    let setup_config = config.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![verify(), ping()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' invoked by {} (ID: {}) in {}",
                        ctx.command().qualified_name,
                        ctx.author().name,
                        ctx.author().id,
                        ctx.guild_id().map(|g| g.to_string()).unwrap_or_else(|| "DM".to_string())
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' completed for {}",
                        ctx.command().qualified_name,
                        ctx.author().name
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Error in command '{}': {}", ctx.command().qualified_name, error);
                            let _ = ctx
                                .send(
                                    poise::CreateReply::default()
                                        .content(messages::UNEXPECTED_ERROR)
                                        .ephemeral(true),
                                )
                                .await;
                        }
                        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
                            error!("Argument parse error in '{}': {} (input: {:?})", ctx.command().qualified_name, error, input);
                        }
                        poise::FrameworkError::GuildOnly { ctx, .. } => {
                            warn!("Command '{}' is guild-only, used in DM by {}", ctx.command().qualified_name, ctx.author().name);
                            let _ = ctx
                                .send(
                                    poise::CreateReply::default()
                                        .content(messages::rejection_message(roster::RejectReason::Error))
                                        .ephemeral(true),
                                )
                                .await;
                        }
                        other => {
                            error!("Other framework error: {}", other);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            let config = setup_config.clone();
            let roster_client = roster_client.clone();

            Box::pin(async move {
                info!("Bot logged in as: {}", ready.user.name);

                let guild_ids: Vec<serenity::GuildId> = ready.guilds.iter().map(|g| g.id).collect();
                if guild_ids.is_empty() {
                    warn!("Bot is not in any guilds - skipping permission check");
                } else {
                    run_startup_permission_check(ctx.http.as_ref(), &guild_ids, config.role_id).await;
                }

                let commands = &framework.options().commands;
                let guilds_to_register: Vec<serenity::GuildId> = match target_guild_id {
                    Some(gid) => vec![gid],
                    None if sync_commands => guild_ids.clone(),
                    None => Vec::new(),
                };

                if guilds_to_register.is_empty() {
                    info!("Registering commands globally...");
                    if let Err(e) = poise::builtins::register_globally(ctx, commands).await {
                        error!("Failed to register commands globally: {}", e);
                    } else {
                        info!("Successfully registered {} commands globally", commands.len());
                    }
                } else {
                    for guild_id in &guilds_to_register {
                        if let Err(e) = poise::builtins::register_in_guild(ctx, commands, *guild_id).await {
                            error!("Failed to register commands for guild {}: {}", guild_id, e);
                        } else {
                            info!("Successfully registered {} commands for guild {}", commands.len(), guild_id);
                        }
                    }
                }

                let granter = Arc::new(DiscordRoleGranter::new(ctx.http.clone(), config.role_id));
                let verification =
                    VerificationService::new(roster_client, granter, config.detailed_reasons);

                Ok(Data {
                    config,
                    verification,
                })
            })
        })
        .build();

    let mut intents = serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MEMBERS;
    if config.modal_flow {
        intents |= serenity::GatewayIntents::GUILD_MESSAGES | serenity::GatewayIntents::MESSAGE_CONTENT;
    }

    let privileged_intents: Vec<&str> = [
        (serenity::GatewayIntents::MESSAGE_CONTENT, "MESSAGE_CONTENT"),
        (serenity::GatewayIntents::GUILD_MEMBERS, "GUILD_MEMBERS"),
    ]
    .into_iter()
    .filter(|(intent, _)| intents.contains(*intent))
    .map(|(_, name)| name)
    .collect();

    info!("Requesting privileged intents: {:?}", privileged_intents);

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot...");
    if let Err(e) = client.start().await {
        let err_str = e.to_string();
        if err_str.contains("Disallowed") || err_str.contains("intents") {
            error!("Failed to start bot: {}", e);
            error!("The following privileged intents need to be enabled in the Discord Developer Portal:");
            for intent in &privileged_intents {
                error!("  - {}", intent);
            }
            error!("Go to https://discord.com/developers/applications -> Your App -> Bot -> Privileged Gateway Intents");
            return Err(anyhow::anyhow!(
                "Disallowed gateway intents. Enable these in Discord Developer Portal: {:?}",
                privileged_intents
            ));
        }
        return Err(e.into());
    }
    warn!("Bot ended.");

    Ok(())
}
