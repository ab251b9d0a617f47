//! Kaginawa - command-line front end
//!
//! `kaginawa alive` lists the nodes that reported recently, `kaginawa command`
//! opens an interactive command session on a single node.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use kaginawa::logs::{init_logging, LogOptions};
use kaginawa::utils::version_info;
use kaginawa::{KaginawaClient, Settings};
use secrecy::SecretString;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, error};

const USAGE: &str = "Usage: kaginawa <alive|command> [--endpoint=<ENDPOINT>] [--api-key=<API_KEY>] \
                     [--config=<FILE>] [--minutes=<N>]";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let mut mode = None;
    let mut cli_args: HashMap<String, String> = HashMap::new();
    for arg in env::args().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        } else if mode.is_none() {
            mode = Some(arg);
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("{}", e),
        }
        return ExitCode::SUCCESS;
    }

    let settings = match load_settings(&cli_args).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            return ExitCode::from(2);
        }
    };

    let log_options = LogOptions {
        log_level: settings.log_level.unwrap_or_default(),
        json_format: cli_args.contains_key("json-logs"),
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let mut prompt = Prompt::new();
    let result = match mode.as_deref() {
        Some("alive") => alive(&settings, &cli_args).await,
        Some("command") => command(settings, &mut prompt).await,
        _ => {
            println!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} {:#}", "error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Command line values win over the config file, which wins over the environment.
async fn load_settings(cli_args: &HashMap<String, String>) -> anyhow::Result<Settings> {
    let env_settings = Settings::from_env()?;
    let mut settings = match cli_args.get("config") {
        Some(path) => Settings::load(path).await?.or(env_settings),
        None => env_settings,
    };
    if let Some(endpoint) = cli_args.get("endpoint") {
        settings.endpoint = Some(endpoint.clone());
    }
    if let Some(api_key) = cli_args.get("api-key") {
        settings.api_key = Some(SecretString::from(api_key.clone()));
    }
    settings.endpoint = settings.endpoint.map(|e| with_scheme(&e));
    Ok(settings)
}

fn with_scheme(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    }
}

async fn alive(settings: &Settings, cli_args: &HashMap<String, String>) -> anyhow::Result<()> {
    let minutes = match cli_args.get("minutes") {
        Some(minutes) => minutes.parse().context("--minutes must be a number")?,
        None => 5,
    };
    let client = settings.connect().context(USAGE)?;

    let nodes = client.list_alive_nodes(minutes).await?;
    println!("{} alive node(s) detected.", nodes.len().to_string().green());
    for node in nodes {
        let time = match node.server_time_utc() {
            Some(time) => time.format("%Y/%m/%d %H:%M:%S").to_string(),
            None => node.server_time().to_string(),
        };
        println!("{} {} {}", time, node.id(), node.custom_id());
    }
    Ok(())
}

async fn command(mut settings: Settings, prompt: &mut Prompt) -> anyhow::Result<()> {
    if settings.endpoint.is_none() {
        settings.endpoint = prompt.ask("endpoint").await?.map(|e| with_scheme(&e));
    }
    if settings.api_key.is_none() {
        settings.api_key = prompt.ask("api key").await?.map(SecretString::from);
    }
    let client = settings.connect()?;

    let Some(id) = prompt.ask("target id").await? else {
        return Ok(());
    };
    let report = client.find_node_by_id(&id).await?;
    println!("{} {}", report.id(), report.hostname());

    let Some(user) = prompt.ask("user").await? else {
        return Ok(());
    };
    let password = prompt.ask("password").await?.unwrap_or_default();

    session(&client, &id, &user, &password, prompt).await
}

/// Relays typed commands until `exit`, end of input, or an authentication failure.
async fn session(
    client: &KaginawaClient,
    id: &str,
    user: &str,
    password: &str,
    prompt: &mut Prompt,
) -> anyhow::Result<()> {
    loop {
        let Some(line) = prompt.ask("command (type \"exit\" to exit)").await? else {
            return Ok(());
        };
        match line.as_str() {
            "exit" | "quit" => return Ok(()),
            "" => continue,
            _ => {}
        }

        debug!("Executing command on {}", id);
        match client.command(id, &line, user, None, Some(password), 0).await {
            Ok(output) => println!("{}", output),
            Err(e) => {
                let message = e.to_string();
                eprintln!("{}", message.red());
                if message.contains("authenticate") {
                    bail!("session closed: {}", message);
                }
            }
        }
    }
}

/// Line-oriented prompt on stdin/stdout
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }

    /// `None` at end of input
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        let mut stdout = io::stdout();
        stdout.write_all(format!("{} > ", label).as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}
