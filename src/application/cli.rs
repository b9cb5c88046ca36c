use anyhow::Result;
use clap::Arg;
use clap::Command;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

fn config_arg(key: ConfigKey, help: &str) -> Arg {
    let name = key.to_string();
    return Arg::new(name.clone())
        .long(name)
        .help(format!("{help} [default: {}]", Config::default(key)))
        .num_args(1)
        .global(true);
}

pub fn build() -> Command {
    return Command::new("parley-term")
        .about("Terminal chat client for the OpenAI Assistants API")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(config_arg(
            ConfigKey::ConfigFile,
            "Path to the configuration file",
        ))
        .arg(config_arg(
            ConfigKey::LogLevel,
            "Log level written to the log file",
        ))
        .arg(config_arg(
            ConfigKey::OpenAIURL,
            "Base URL of the OpenAI-compatible assistant service",
        ))
        .arg(config_arg(
            ConfigKey::PollInterval,
            "Milliseconds between run status polls",
        ))
        .arg(config_arg(
            ConfigKey::PollTimeout,
            "Seconds before giving up on a run, 0 waits forever",
        ))
        .subcommand(
            Command::new("config")
                .about("Configuration file commands")
                .subcommand(
                    Command::new("default").about("Print the default configuration file"),
                ),
        );
}

/// Parses arguments and loads the configuration. Returns false when a
/// subcommand handled the invocation and the UI should not start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    if let Some(("config", subcommand_matches)) = matches.subcommand() {
        if let Some(("default", _)) = subcommand_matches.subcommand() {
            println!("{}", Config::serialize_default(build()));
            return Ok(false);
        }
    }

    Config::load(build(), vec![&matches]).await?;
    return Ok(true);
}
