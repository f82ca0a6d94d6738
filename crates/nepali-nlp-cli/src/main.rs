//! Nepali NLP CLI - Command-line chat with hosted Nepali NLP models
//!
//! Usage:
//!     nepali-nlp [OPTIONS] [TEXT]
//!
//! Environment Variables:
//!     NEPALI_NLP_API_URL: Explicit API base URL (highest priority)
//!     NEPALI_NLP_DEV_PROXY: Development reverse-proxy prefix (used when no explicit URL)
//!     NEPALI_NLP_TIMEOUT_SECS: Request timeout in seconds (default: HTTP client default)
//!     NEPALI_NLP_MODEL: Model slug (default: nepaligpt)

use anyhow::{Context, Result};
use clap::Parser;
use nepali_nlp::config::{ENV_API_URL, ENV_DEV_PROXY, ENV_TIMEOUT_SECS};
use nepali_nlp::{
    resolve_base_url, ApiConfig, ChatMessage, ChatSession, InferenceBackend, InferenceClient,
    ModelKind, Sender,
};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Nepali NLP - chat with hosted Nepali language models
#[derive(Parser, Debug)]
#[command(name = "nepali-nlp")]
#[command(about = "Chat with hosted Nepali NLP models")]
#[command(after_help = r#"Examples:
    # Interactive chat with the text generation model
    nepali-nlp

    # Named-entity recognition on one sentence
    nepali-nlp --model named-entity-recognition "राम शर्मा काठमाडौं विश्वविद्यालयमा पढ्छन्।"

    # Use a local backend
    nepali-nlp --base-url http://localhost:5001 --model morphological-analyzer

    # Check the service
    nepali-nlp --health

    # List models and their slugs
    nepali-nlp --list-models
"#)]
struct Cli {
    /// Explicit API base URL (overrides the dev proxy and production fallback)
    #[arg(long, env = ENV_API_URL)]
    base_url: Option<String>,

    /// Development reverse-proxy prefix, e.g. http://localhost:8009/api
    #[arg(long, env = ENV_DEV_PROXY)]
    dev_proxy: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = ENV_TIMEOUT_SECS)]
    timeout: Option<u64>,

    /// Model slug (e.g. nepaligpt, nepali-lemmatizer, named-entity-recognition)
    #[arg(short = 'm', long, env = "NEPALI_NLP_MODEL", default_value = "nepaligpt")]
    model: String,

    /// List available models and exit
    #[arg(long)]
    list_models: bool,

    /// Check service health and exit
    #[arg(long)]
    health: bool,

    /// Show model info reported by the service and exit
    #[arg(long)]
    model_info: bool,

    /// Show sample inputs for the selected model and exit
    #[arg(long)]
    samples: bool,

    /// Log request details to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Text to send (interactive mode if not provided)
    text: Option<String>,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,nepali_nlp=debug"
    } else {
        "warn,nepali_nlp=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_config(args: &Cli) -> ApiConfig {
    let mut config = ApiConfig::default().with_base(resolve_base_url(
        args.base_url.as_deref(),
        args.dev_proxy.as_deref(),
    ));
    if let Some(secs) = args.timeout.filter(|s| *s > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

/// Print available models
fn print_models() {
    println!("Available models:");
    println!("{}", "-".repeat(60));
    for kind in ModelKind::ALL {
        println!(
            "  {:<34} {} ({})",
            kind.slug(),
            kind.display_name(),
            kind.endpoint().path()
        );
    }
}

fn print_samples(kind: ModelKind) {
    println!("Sample inputs for {}:", kind);
    for sample in kind.sample_inputs() {
        println!("  - {}", sample);
    }
}

/// Check /health and report
async fn check_health(client: &InferenceClient) -> bool {
    println!("Checking service at {}...", client.config().base);
    match client.health().await {
        Ok(health) => {
            let mark = if health.is_healthy() { "\u{2705}" } else { "\u{26A0}\u{FE0F}" };
            println!("{} Status: {}", mark, health.status);
            if let Some(loaded) = health.model_loaded {
                println!("   Model loaded: {}", loaded);
            }
            if let Some(loaded) = health.stemmer_loaded {
                println!("   Stemmer loaded: {}", loaded);
            }
            if let Some(loaded) = health.aspect_loaded {
                println!("   Aspect model loaded: {}", loaded);
            }
            if let Some(message) = &health.message {
                println!("   {}", message);
            }
            health.is_healthy()
        }
        Err(e) => {
            println!("\u{274C} Health check failed: {}", e);
            false
        }
    }
}

async fn print_model_info(client: &InferenceClient) -> Result<()> {
    let info = client
        .model_info()
        .await
        .context("Failed to fetch model info")?;

    println!("{}", "=".repeat(50));
    if let Some(name) = &info.model_name {
        println!("Model: {}", name);
    }
    if let Some(kind) = &info.model_type {
        println!("Type: {}", kind);
    }
    if let Some(description) = &info.description {
        println!("Description: {}", description);
    }
    if let Some(loaded) = info.model_loaded {
        println!("Loaded: {}", loaded);
    }
    for (key, value) in &info.extra {
        println!("{}: {}", key, value);
    }
    println!("{}", "=".repeat(50));
    Ok(())
}

fn format_message(message: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}",
        message.time_label(),
        message.sender().label(),
        message.text()
    )
}

fn print_message(message: &ChatMessage) {
    println!("{}", format_message(message));
}

/// Print header
fn print_header(kind: ModelKind, config: &ApiConfig) {
    println!("{}", "=".repeat(50));
    println!("Nepali NLP - {}", kind);
    println!("{}", "=".repeat(50));
    println!("Model slug: {}", kind.slug());
    println!("Endpoint: {}", config.url(kind.endpoint()));
    println!("{}", "=".repeat(50));
}

/// Submit one input and print everything it appended
async fn send<B: InferenceBackend>(session: &mut ChatSession<B>, text: &str) {
    let before = session.messages().len();
    session.submit(text).await;
    // The user's own line was typed already
    for message in session.messages()[before..]
        .iter()
        .filter(|m| m.sender() != Sender::User)
    {
        print_message(message);
    }
}

/// Run interactive mode
async fn run_interactive_mode<B: InferenceBackend>(session: &mut ChatSession<B>) -> Result<()> {
    println!("\nEntering interactive mode. Type 'quit' to exit, 'reset' to clear.\n");
    for message in session.messages() {
        print_message(message);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(_) => {
                println!("\n\nInterrupted. Goodbye!");
                break;
            }
        }

        let text = input.trim();

        if text.eq_ignore_ascii_case("quit")
            || text.eq_ignore_ascii_case("exit")
            || text.eq_ignore_ascii_case("q")
        {
            println!("Goodbye!");
            break;
        }

        if text.eq_ignore_ascii_case("reset") {
            session.reset();
            if let Some(welcome) = session.last_message() {
                print_message(welcome);
            }
            continue;
        }

        send(session, text).await;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before reading any env-bound options)
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    init_logging(args.verbose);

    if args.list_models {
        print_models();
        return Ok(());
    }

    let kind = ModelKind::from_slug(&args.model)
        .with_context(|| format!("Unknown model '{}'. Try --list-models.", args.model))?;

    if args.samples {
        print_samples(kind);
        return Ok(());
    }

    let config = build_config(&args);
    tracing::debug!(base = %config.base, "Resolved API base");
    let client = InferenceClient::new(config.clone()).context("Failed to build HTTP client")?;

    if args.health {
        if !check_health(&client).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    if args.model_info {
        return print_model_info(&client).await;
    }

    print_header(kind, &config);
    let mut session = ChatSession::new(kind, client).with_generation_params(config.generation);

    if let Some(text) = &args.text {
        send(&mut session, text).await;
    } else {
        run_interactive_mode(&mut session).await?;
    }

    Ok(())
}
