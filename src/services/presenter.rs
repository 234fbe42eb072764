use poise::serenity_prelude as serenity;

pub fn mention_list(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| format!("<@{id}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The public giveaway announcement. Field layout mirrors what the rest of
/// the bot posts so announcements look uniform across guilds.
pub fn giveaway_embed(
    title: &str,
    host_id: i64,
    winners: i32,
    requirements: Option<&str>,
    end_at: i64,
) -> serenity::CreateEmbed<'static> {
    let mut embed = serenity::CreateEmbed::new()
        .title(format!("🎉 Giveaway: {title}"))
        .colour(serenity::Colour::BLURPLE)
        .field("Hosted by", format!("<@{host_id}>"), false)
        .field("Number of Winners", winners.to_string(), false);

    if let Some(req) = requirements {
        embed = embed.field("Requirements", req.to_string(), false);
    }

    embed
        .field("Ends", format!("<t:{end_at}:R>"), false)
        .footer(serenity::CreateEmbedFooter::new(
            "Click the button below to join!",
        ))
}

/// The join/leave toggle button. The entry count lives in the label and is
/// re-rendered after every toggle.
pub fn join_row(giveaway_id: i32, count: u64, disabled: bool) -> serenity::CreateActionRow<'static> {
    serenity::CreateActionRow::Buttons(vec![serenity::CreateButton::new(format!(
        "giveaway_join_{giveaway_id}"
    ))
    .label(format!("🎉 Join Giveaway ({count})"))
    .style(serenity::ButtonStyle::Success)
    .disabled(disabled)])
}

pub fn giveaway_ended_embed(
    title: &str,
    host_id: i64,
    winners: i32,
    winner_ids: &[i64],
) -> serenity::CreateEmbed<'static> {
    serenity::CreateEmbed::new()
        .title(format!("🏁 Giveaway Ended: {title}"))
        .colour(serenity::Colour::RED)
        .field("Hosted by", format!("<@{host_id}>"), false)
        .field("Number of Winners", winners.to_string(), false)
        .field("Winners", mention_list(winner_ids), false)
}

pub fn participants_embed(title: &str, entry_ids: &[i64]) -> serenity::CreateEmbed<'static> {
    serenity::CreateEmbed::new()
        .title(format!("👥 Participants for {title}"))
        .description(mention_list(entry_ids))
        .colour(serenity::Colour::DARK_GREEN)
}
