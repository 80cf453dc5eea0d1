//! arbox - command-line access to an Arbox box.
//!
//! Reads the connection settings from `ACCOUNT_*` environment variables
//! (a `.env` file in the working directory is loaded first), runs a single
//! command and prints the result as JSON.

use std::io;

use anyhow::{bail, Context, Result};
use arbox_core::api::DEFAULT_SALES_REPORT;
use arbox_core::{ArboxClient, ClientOptions, ConnectionConfig, DateRange};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "\
usage: arbox <command> [args]

commands:
  check                      verify the session, logging in if needed
  customers                  all users and leads (raw)
  active-members             active members report
  open-leads                 open leads
  lead <id>                  a single lead
  tasks [from to]            all tasks (default: this week)
  sales [from to]            box sales report (default: today)
  transactions [from to]     transactions report (default: today)
  birthdays                  birthdays this week
  schedule [from to]         lessons at the configured location (default: this week)
  search <name>              search members and leads by name
  suspended                  memberships on hold until the end of the month
  stats                      debt and active-plan member counters

dates are YYYY-MM-DD";

/// Filter used when RUST_LOG is unset. ACCOUNT_DEBUG turns on the
/// client's request logging.
fn default_directives(request_logging: bool) -> &'static str {
    if request_logging {
        "warn,arbox_core=debug"
    } else {
        "warn"
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(request_logging: bool) {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(request_logging)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", value))
}

/// Explicit `from to` arguments, or the fallback range when none are given.
fn parse_range(args: &[String], fallback: fn() -> DateRange) -> Result<DateRange> {
    match args {
        [] => Ok(fallback()),
        [from, to] => Ok(DateRange::new(parse_date(from)?, parse_date(to)?)),
        _ => bail!("Expected either no dates or both <from> and <to>"),
    }
}

fn single_arg<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    match args {
        [value] => Ok(value),
        _ => bail!("Expected exactly one <{}> argument", name),
    }
}

async fn run(client: &ArboxClient, command: &str, args: &[String]) -> Result<Value> {
    let value = match command {
        "check" => {
            client.ensure_connection().await?;
            serde_json::json!({
                "connected": true,
                "box_id": client.config().box_id,
            })
        }
        "customers" => client.get_all_customers().await?,
        "active-members" => serde_json::to_value(client.get_all_active_customers().await?)?,
        "open-leads" => serde_json::to_value(client.get_open_leads().await?)?,
        "lead" => {
            let id = single_arg(args, "id")?
                .parse::<i64>()
                .context("Lead id must be a number")?;
            serde_json::to_value(client.get_lead(id).await?)?
        }
        "tasks" => {
            let range = parse_range(args, DateRange::this_week)?;
            serde_json::to_value(client.get_all_tasks(range).await?)?
        }
        "sales" => {
            let range = parse_range(args, DateRange::today)?;
            client.get_box_sales(range, DEFAULT_SALES_REPORT).await?
        }
        "transactions" => {
            let range = parse_range(args, DateRange::today)?;
            serde_json::to_value(client.get_transactions(range).await?)?
        }
        "birthdays" => serde_json::to_value(client.get_birthdays(DateRange::this_week()).await?)?,
        "schedule" => {
            let range = parse_range(args, DateRange::this_week)?;
            serde_json::to_value(client.get_schedule(range).await?)?
        }
        "search" => {
            let query = args.join(" ");
            if query.trim().is_empty() {
                bail!("Expected a <name> to search for");
            }
            serde_json::to_value(client.search_by_name(&query).await?)?
        }
        "suspended" => {
            serde_json::to_value(client.get_suspended_users(DateRange::rest_of_month()).await?)?
        }
        "stats" => serde_json::to_value(client.get_stats().await?)?,
        other => bail!("Unknown command {:?}\n\n{}", other, USAGE),
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let options = ClientOptions::from_env();
    init_tracing(options.debug);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        return Ok(());
    };
    if command == "-h" || command == "--help" {
        println!("{}", USAGE);
        return Ok(());
    }

    let client = ConnectionConfig::from_env()
        .map_err(arbox_core::Error::from)
        .and_then(|config| ArboxClient::new(config, options))
        .context("Failed to configure the Arbox client")?;
    info!(box_id = client.config().box_id, command = %command, "Running command");

    let value = run(&client, command, rest).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_range() {
        let range = parse_range(&strings(&["2021-10-01", "2021-10-31"]), DateRange::today).unwrap();
        assert_eq!(range.from_param(), "2021-10-01");
        assert_eq!(range.to_param(), "2021-10-31");

        assert_eq!(parse_range(&[], DateRange::today).unwrap(), DateRange::today());
        assert!(parse_range(&strings(&["2021-10-01"]), DateRange::today).is_err());
        assert!(parse_range(&strings(&["01/10/2021", "2021-10-31"]), DateRange::today).is_err());
    }

    #[test]
    fn test_debug_flag_enables_request_logging() {
        assert_eq!(default_directives(false), "warn");
        let directives = default_directives(true);
        assert!(directives.contains("arbox_core=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_single_arg() {
        assert_eq!(single_arg(&strings(&["42"]), "id").unwrap(), "42");
        assert!(single_arg(&[], "id").is_err());
        assert!(single_arg(&strings(&["1", "2"]), "id").is_err());
    }
}
