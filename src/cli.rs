//! CLI subcommand handlers for nanochat.
//!
//! main.rs stays focused on argument parsing and routing; the command
//! implementations live here.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::config::loader::{get_config_path, resolve_api_key, save_config};
use crate::config::schema::Config;
use crate::providers::base::SamplingParams;
use crate::providers::openai_compat::OpenAICompatClient;
use crate::session::ChatSession;
use crate::tools::notify::NotifyTool;
use crate::tools::registry::ToolRegistry;
use crate::tools::weather::WeatherTool;

/// Build the tool registry from config. The registry is fixed for the
/// lifetime of the process.
pub fn build_registry(config: &Config) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    if config.tools.notify {
        registry.register(Box::new(NotifyTool));
    }
    if config.tools.weather {
        registry.register(Box::new(WeatherTool));
    }
    registry
}

/// Build the provider from config, with the API key resolved from config
/// or environment.
pub fn build_provider(config: &Config) -> OpenAICompatClient {
    let api_key = resolve_api_key(config);
    OpenAICompatClient::new(&api_key, &config.api.api_base, &config.api.model)
}

fn new_session(config: &Config) -> ChatSession {
    match &config.system_prompt {
        Some(prompt) => ChatSession::with_system_prompt(prompt),
        None => ChatSession::new(),
    }
}

/// `ask`: send a single message through a fresh session and print the reply.
pub async fn run_ask(
    config: &Config,
    message: &str,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
) -> Result<()> {
    let defaults = config.sampling_params();
    let sampling = SamplingParams::new(
        temperature.unwrap_or(defaults.temperature),
        max_tokens.unwrap_or(defaults.max_tokens),
    );

    let provider = build_provider(config);
    let registry = build_registry(config);
    let mut session = new_session(config);

    let reply = session.send(&provider, &registry, message, &sampling).await?;
    println!("{}", reply);
    Ok(())
}

/// `chat`: interactive loop over one session. `/reset` clears history,
/// `/quit` exits. Completion failures are printed as errors, never shown
/// as assistant replies.
pub async fn run_chat(config: &Config) -> Result<()> {
    let provider = build_provider(config);
    let registry = build_registry(config);
    let sampling = config.sampling_params();
    let mut session = new_session(config);

    println!(
        "nanochat — model {} at {} (/reset clears history, /quit exits)",
        config.api.model, config.api.api_base
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/reset" => {
                session.clear();
                println!("(history cleared)");
                continue;
            }
            _ => {}
        }

        match session.send(&provider, &registry, input, &sampling).await {
            Ok(reply) => println!("assistant> {}", reply),
            Err(e) => eprintln!("error: {:#}", e),
        }
    }

    Ok(())
}

/// `onboard`: write a default config file if none exists.
pub fn run_onboard() -> Result<()> {
    let path = get_config_path();
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    save_config(&Config::default(), Some(&path));
    println!("Wrote default config to {}", path.display());
    println!("Set your API key there or via NANOCHAT_API_KEY / OPENAI_API_KEY.");
    Ok(())
}

/// `status`: show the effective configuration and registered tools.
pub fn run_status(config: &Config) -> Result<()> {
    let registry = build_registry(config);
    println!("config:   {}", get_config_path().display());
    println!("endpoint: {}", config.api.api_base);
    println!("model:    {}", config.api.model);
    println!(
        "api key:  {}",
        if resolve_api_key(config).is_empty() {
            "not set"
        } else {
            "set"
        }
    );
    println!("tools:    {}", registry.names().join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_both_tools() {
        let registry = build_registry(&Config::default());
        assert!(registry.has("notify"));
        assert!(registry.has("get_current_weather"));
    }

    #[test]
    fn test_tools_can_be_disabled() {
        let mut config = Config::default();
        config.tools.notify = false;
        let registry = build_registry(&config);
        assert!(!registry.has("notify"));
        assert!(registry.has("get_current_weather"));
    }

    #[test]
    fn test_provider_uses_config_endpoint() {
        let mut config = Config::default();
        config.api.api_base = "http://localhost:11434/v1/".into();
        config.api.model = "phi4".into();
        let provider = build_provider(&config);
        assert_eq!(provider.api_base(), "http://localhost:11434/v1");
        assert_eq!(provider.model(), "phi4");
    }
}
