mod api_client;
mod config;
mod error;
mod output;
mod pipeline;
mod runner;
mod validate;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::Config;
use error::Error;
use log::error;

#[derive(Parser)]
struct Args {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Fetch,
}

#[derive(Subcommand)]
enum Fetch {
    Fetch {
        #[arg(help = "Ad account ID to fetch insights for")]
        account_id: String,

        #[arg(help = "Date should be in the form YYYY-MM-DD", value_parser = validate_date)]
        start: NaiveDate,

        #[arg(help = "Date should be in the form YYYY-MM-DD", value_parser = validate_date)]
        end: NaiveDate,
    },
}

fn validate_date(s: &str) -> Result<NaiveDate, String> {
    let error_message = "Invalid date, expected YYYY-MM-DD";

    let parts = s
        .split("-")
        .map(|part| part.parse::<u16>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| error_message)?;

    match parts.as_slice() {
        &[year, month, day] if month <= 12 && day <= 31 => {
            Ok(
                NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                    .ok_or(error_message)?,
            )
        }
        _ => Err(error_message.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    env_logger::init();

    match &args.command {
        Fetch::Fetch {
            account_id,
            start,
            end,
        } => {
            if let Err(err) =
                runner::fetch_and_validate_insights(args.config, account_id, start, end).await
            {
                error!("failed to fetch and validate insights: {}", err);
                std::process::exit(1);
            }
        }
    };

    Ok(())
}
