use anyhow::{Context, Result};
use bat::PrettyPrinter;
use clap::Parser;
use cliclack::{input, spinner};
use console::{style, Term};
use dotenv::dotenv;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

use think_tool::config::{ConversationConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use think_tool::executor::PlaceholderAnalyzer;
use think_tool::format::{format_output, OutputFormat};
use think_tool::orchestrator::Orchestrator;
use think_tool::providers::anthropic::AnthropicClient;
use think_tool::providers::configs::{AnthropicProviderConfig, ProviderConfig};
use think_tool::storage::{read_thought, write_output};

const DEFAULT_THOUGHT: &str = "I believe we should launch the new feature next week because our \
testing shows it improves user engagement by 23% and reduces load times by 15%, which addresses \
our Q2 goals. The only concern is that we haven't completed security testing, but I think we can \
do that in parallel during a limited rollout.";

/// Analyze and verify thinking processes with a model that can call a `think` tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Thought to analyze (a sample thought is used when omitted)
    thought: Option<String>,

    /// Anthropic API key (can also be set via ANTHROPIC_API_KEY environment variable)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// API request timeout in seconds, shared by both turns
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Maximum tokens in each model response
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// File containing the thought to analyze
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// File to write the analysis to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log each step of the conversation to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Analyze thoughts line by line until "exit" or "quit"
    #[arg(long)]
    interactive: bool,

    /// Custom prompt placed before the thought
    #[arg(short, long)]
    prompt: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenv().ok();
    init_logging(cli.verbose);

    let provider_config = AnthropicProviderConfig::from_env()?.with_api_key(cli.api_key.clone());
    let client = AnthropicClient::new(provider_config)?;
    let executor = PlaceholderAnalyzer;
    let orchestrator = Orchestrator::new(&client, &executor);

    let config = ConversationConfig::new(&cli.model)
        .with_max_tokens(cli.max_tokens)
        .with_prompt_template(cli.prompt.clone())
        .with_timeout(Duration::from_secs(cli.timeout));

    if cli.interactive {
        return interactive(&orchestrator, &config, cli.format);
    }

    let thought = match (&cli.input, &cli.thought) {
        (Some(path), _) => read_thought(path).context("Error reading input file")?,
        (None, Some(thought)) => thought.clone(),
        (None, None) => DEFAULT_THOUGHT.to_string(),
    };

    let result = orchestrator
        .run(&thought, &config)
        .context("Think tool call error")?;
    let output = format_output(&result, cli.format)?;

    match &cli.output {
        Some(path) => {
            write_output(path, &output).context("Error writing output file")?;
            println!("Analysis written to {}", path.display());
        }
        None => render(&output, cli.format),
    }
    Ok(())
}

fn interactive(
    orchestrator: &Orchestrator,
    config: &ConversationConfig,
    format: OutputFormat,
) -> Result<()> {
    println!(
        "Think tool interactive mode {}",
        style("- type \"exit\" or \"quit\" to end the session").dim()
    );
    println!("\n");

    loop {
        let line: String = input("Thought:")
            .placeholder("")
            .required(false)
            .interact()?;
        let thought = line.trim();

        if thought.eq_ignore_ascii_case("exit") || thought.eq_ignore_ascii_case("quit") {
            break;
        }
        if thought.is_empty() {
            continue;
        }

        let spin = spinner();
        spin.start("analyzing thought");
        let outcome = orchestrator.run(thought, config);
        spin.stop("");

        match outcome {
            Ok(result) => render(&format_output(&result, format)?, format),
            Err(err) => println!("{} {}", style("Error:").red(), err),
        }
        println!("\n");
    }

    println!("Goodbye!");
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn render(content: &str, format: OutputFormat) {
    let language = match format {
        OutputFormat::Text => "markdown",
        OutputFormat::Json => "json",
    };

    if Term::stdout().is_term() {
        let printed = PrettyPrinter::new()
            .input_from_bytes(content.as_bytes())
            .language(language)
            .print();
        if printed.is_ok() {
            return;
        }
    }
    println!("{}", content);
}
