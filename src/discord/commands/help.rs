use crate::discord::{Context, Error};

const HELP_TEXT: &str = "🦸 **SentriBot Help Menu**\n\n\
    **Commands:**\n\
    • `!help` - Display this help menu\n\
    • `!reviewchannel <channel_id>` - **(Admin only)** Set the moderation review channel\n\
    • `!reviewstatus` - **(Admin only)** Show the review channel and pending reviews\n\n\
    **Features:**\n\
    • Automatically detects spam and phishing messages using AI\n\
    • Quarantines suspicious messages for moderator review\n\
    • Moderators can approve (✅) or reject (❌) flagged messages\n\
    • Whitelists trusted domains (YouTube, Discord, GitHub, DeviantArt)\n\n\
    **Setup:**\n\
    1. Use `!reviewchannel <channel_id>` to set your mod review channel\n\
    2. Ensure the bot has `Manage Messages` permission\n\
    3. SentriBot will automatically monitor all messages!\n\n\
    Need help? Contact your server administrator.";

/// Display the help menu.
#[poise::command(prefix_command, slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(HELP_TEXT).await?;
    Ok(())
}
