use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use validator_dashboard::{models::log::LogType, services::earnings_service::EarningsOption};

mod commands;
mod config;
mod types;

use commands::{DashboardCommands, DutyOptions, EarningsOptions};
use config::Config;

fn app() -> App<'static, 'static> {
    App::new("Validator Dashboard CLI")
        .version("1.0")
        .author("PeoChain Team")
        .about("CLI tool for inspecting validator logs, proposer duties and earnings")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("logs")
                .about("Search a log stream and show its severity counts")
                .arg(
                    Arg::with_name("input")
                        .short("i")
                        .long("input")
                        .value_name("FILE")
                        .help("Log file with one JSON record per line")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("type")
                        .short("t")
                        .long("type")
                        .value_name("TYPE")
                        .help("Log stream: beacon or validator")
                        .takes_value(true)
                        .default_value("beacon"),
                )
                .arg(
                    Arg::with_name("search")
                        .short("s")
                        .long("search")
                        .value_name("TEXT")
                        .help("Case-insensitive text to look for in any field")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("duties")
                .about("Show proposer duty alerts")
                .arg(
                    Arg::with_name("input")
                        .short("i")
                        .long("input")
                        .value_name("FILE")
                        .help("JSON file with proposer duties grouped per alert")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("head-slot")
                        .long("head-slot")
                        .value_name("SLOT")
                        .help("Current head slot")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("seconds-per-slot")
                        .long("seconds-per-slot")
                        .value_name("SECONDS")
                        .help("Slot duration, overrides the configured value")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("expand")
                        .short("e")
                        .long("expand")
                        .help("Expand grouped alerts"),
                )
                .arg(
                    Arg::with_name("dismiss")
                        .short("d")
                        .long("dismiss")
                        .value_name("UUID")
                        .help("Dismiss the duty with this id")
                        .takes_value(true)
                        .multiple(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("earnings")
                .about("Summarize account earnings")
                .arg(
                    Arg::with_name("states")
                        .long("states")
                        .value_name("FILE")
                        .help("JSON file with validator states")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("cache")
                        .long("cache")
                        .value_name("FILE")
                        .help("JSON file with cached epoch balances per validator")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("rates")
                        .long("rates")
                        .value_name("FILE")
                        .help("JSON file with ETH exchange rates")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("estimate")
                        .long("estimate")
                        .value_name("OPTION")
                        .help("Projection: daily, weekly, monthly or annual")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("validator")
                        .long("validator")
                        .value_name("INDEX")
                        .help("Also show metrics of a single validator")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("currency")
                .about("Show or set the display currency")
                .arg(
                    Arg::with_name("code")
                        .value_name("CODE")
                        .help("Currency code to store, e.g. EUR")
                        .index(1),
                ),
        )
        .subcommand(
            SubCommand::with_name("check-credentials")
                .about("Check a withdrawal address")
                .arg(
                    Arg::with_name("address")
                        .value_name("ADDRESS")
                        .help("0x-prefixed execution address")
                        .required(true)
                        .index(1),
                ),
        )
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| anyhow!("invalid --{} '{}': {}", name, value, e))
        })
        .transpose()
}

fn required_path(matches: &ArgMatches, name: &str) -> Result<PathBuf> {
    matches
        .value_of(name)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing --{}", name))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = app().get_matches();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    let output = match matches.subcommand() {
        ("logs", Some(sub_matches)) => {
            let input = required_path(sub_matches, "input")?;
            let log_type = parse_arg::<LogType>(sub_matches, "type")?.unwrap_or(LogType::Beacon);
            let search = sub_matches.value_of("search");

            DashboardCommands::logs(&config, &input, log_type, search).await?
        }
        ("duties", Some(sub_matches)) => {
            let options = DutyOptions {
                input: required_path(sub_matches, "input")?,
                head_slot: parse_arg(sub_matches, "head-slot")?
                    .ok_or_else(|| anyhow!("missing --head-slot"))?,
                seconds_per_slot: parse_arg(sub_matches, "seconds-per-slot")?
                    .unwrap_or(config.seconds_per_slot),
                expand: sub_matches.is_present("expand"),
                dismiss: sub_matches
                    .values_of("dismiss")
                    .map(|values| values.map(String::from).collect())
                    .unwrap_or_default(),
            };

            DashboardCommands::duties(&options)?
        }
        ("earnings", Some(sub_matches)) => {
            let options = EarningsOptions {
                states: required_path(sub_matches, "states")?,
                cache: required_path(sub_matches, "cache")?,
                rates: sub_matches.value_of("rates").map(PathBuf::from),
                estimate: parse_arg::<EarningsOption>(sub_matches, "estimate")?,
                validator: parse_arg(sub_matches, "validator")?,
            };

            DashboardCommands::earnings(&config, &options).await?
        }
        ("currency", Some(sub_matches)) => {
            vec![DashboardCommands::currency(&config, sub_matches.value_of("code")).await?]
        }
        ("check-credentials", Some(sub_matches)) => {
            let address = sub_matches
                .value_of("address")
                .ok_or_else(|| anyhow!("missing address"))?;
            vec![DashboardCommands::check_credentials(address)?]
        }
        _ => vec!["No subcommand specified. Use --help for usage information.".to_string()],
    };

    for line in output {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duties_arguments() {
        let matches = app()
            .get_matches_from_safe(vec![
                "validator-dashboard",
                "duties",
                "-i",
                "duties.json",
                "--head-slot",
                "100",
                "-d",
                "a",
                "-d",
                "b",
            ])
            .unwrap();

        let (name, sub_matches) = matches.subcommand();
        assert_eq!(name, "duties");
        let sub_matches = sub_matches.unwrap();
        assert_eq!(parse_arg::<u64>(sub_matches, "head-slot").unwrap(), Some(100));
        assert_eq!(sub_matches.values_of("dismiss").unwrap().count(), 2);
        assert!(!sub_matches.is_present("expand"));
    }

    #[test]
    fn test_invalid_estimate_is_reported() {
        let matches = app()
            .get_matches_from_safe(vec![
                "validator-dashboard",
                "earnings",
                "--states",
                "states.json",
                "--cache",
                "cache.json",
                "--estimate",
                "hourly",
            ])
            .unwrap();

        let sub_matches = matches.subcommand_matches("earnings").unwrap();
        assert!(parse_arg::<EarningsOption>(sub_matches, "estimate").is_err());
        assert_eq!(parse_arg::<u64>(sub_matches, "validator").unwrap(), None);
    }

    #[test]
    fn test_validator_index_argument() {
        let matches = app()
            .get_matches_from_safe(vec![
                "validator-dashboard",
                "earnings",
                "--states",
                "states.json",
                "--cache",
                "cache.json",
                "--validator",
                "42",
            ])
            .unwrap();

        let sub_matches = matches.subcommand_matches("earnings").unwrap();
        assert_eq!(parse_arg::<u64>(sub_matches, "validator").unwrap(), Some(42));
        assert_eq!(parse_arg::<EarningsOption>(sub_matches, "estimate").unwrap(), None);
    }
}
