//! CLI command: `quillpad quota`
//!
//! Shows a user's remaining AI operations, lists their usage history, and
//! prunes old SQLite history.

use crate::server::{init_tracker, load_config, open_sqlite_store, validate_config};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum QuotaCommand {
    /// Show today's remaining AI operations for a user
    Show {
        /// Account id
        #[arg(long)]
        user: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List a user's daily usage, newest first
    History {
        /// Account id
        #[arg(long)]
        user: String,
        /// Number of days to show
        #[arg(long, default_value_t = 14)]
        limit: usize,
    },
    /// Delete usage history older than a day (SQLite backend)
    Prune {
        /// Keep records on or after this day (YYYY-MM-DD)
        #[arg(long)]
        before: NaiveDate,
    },
}

/// Run the quota subcommand.
pub async fn run(command: QuotaCommand) -> Result<()> {
    let config = load_config()?;
    validate_config(&config)?;
    let ceiling = config.quota.daily_ceiling;

    match command {
        QuotaCommand::Show { user, json } => {
            let tracker = init_tracker(&config).await?;
            let window = tracker.window();
            let balance = tracker.remaining_in(&window, &user, ceiling).await?;

            if json {
                let value = serde_json::json!({
                    "user": user,
                    "day": window.day.to_string(),
                    "remaining": balance.remaining,
                    "ceiling": balance.ceiling,
                    "resets_at": window.resets_at.to_rfc3339(),
                    "error": balance.error.as_ref().map(ToString::to_string),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!();
                println!("  AI messages remaining: {}/{}", balance.remaining, ceiling);
                println!("  Day (UTC):             {}", window.day);
                println!("  Resets at:             {}", window.resets_at.to_rfc3339());
                if let Some(e) = &balance.error {
                    println!("  !! {}", e);
                }
                println!();
            }
        }
        QuotaCommand::History { user, limit } => {
            let tracker = init_tracker(&config).await?;
            let records = tracker.history(&user, limit).await?;

            println!();
            println!("  {:<12} {:>6}", "Day", "Used");
            println!("  {}", "-".repeat(20));
            if records.is_empty() {
                println!("  (no AI usage recorded)");
            }
            for record in &records {
                println!("  {:<12} {:>3}/{}", record.day, record.count, ceiling);
            }
            println!();
        }
        QuotaCommand::Prune { before } => {
            let store = open_sqlite_store(&config).await?;
            let removed = store.prune_before(before).await?;
            println!("Removed {} usage record(s) before {}", removed, before);
        }
    }

    Ok(())
}
