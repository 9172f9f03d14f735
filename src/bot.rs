//! Discord glue: receives message events and sends router replies.

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{debug, info};

use crate::command::CommandRouter;
use crate::config::BotConfig;
use crate::embed::Embed;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub struct Data {
    pub router: Arc<CommandRouter>,
}

/// Connect to Discord and serve commands until the connection ends.
pub async fn run(config: BotConfig) -> anyhow::Result<()> {
    let router = Arc::new(CommandRouter::from_config(&config)?);
    let activity = config.discord.activity.clone();
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions::<Data, Error> {
            event_handler: |ctx, event, framework, data| {
                Box::pin(async move { handle_event(ctx, event, framework, data).await })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                info!(
                    user = %ready.user.name,
                    guilds = ready.guilds.len(),
                    "bot is online"
                );
                ctx.set_activity(Some(serenity::ActivityData::watching(activity)));
                Ok(Data { router })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord.token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if message.author.bot || !message.content.trim_start().starts_with(data.router.prefix()) {
        return Ok(());
    }
    debug!(author = %message.author.name, content = %message.content, "received command");

    let typing = message.channel_id.start_typing(&ctx.http);

    let reply = data.router.handle_guarded(&message.content).await;
    typing.stop();

    if let Some(embed) = reply {
        message
            .channel_id
            .send_message(&ctx.http, serenity::CreateMessage::new().embed(to_create_embed(&embed)))
            .await?;
    }
    Ok(())
}

fn to_create_embed(embed: &Embed) -> serenity::CreateEmbed {
    let mut out = serenity::CreateEmbed::new()
        .title(&embed.title)
        .color(embed.color);
    if let Some(description) = &embed.description {
        out = out.description(description);
    }
    for field in &embed.fields {
        out = out.field(&field.name, &field.value, field.inline);
    }
    if let Some(url) = &embed.thumbnail {
        out = out.thumbnail(url);
    }
    if let Some(footer) = &embed.footer {
        out = out.footer(serenity::CreateEmbedFooter::new(footer));
    }
    if embed.timestamp {
        out = out.timestamp(serenity::Timestamp::now());
    }
    out
}
