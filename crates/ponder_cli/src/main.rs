mod commands;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use ponder_core::PonderConfig;
use ponder_reasoning::{providers, ReasoningEngine};
use render::Renderer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "ponder.toml")]
    config: PathBuf,

    /// Model to use (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Chat backend: ollama or mock (overrides config)
    #[arg(long)]
    provider: Option<String>,

    /// Step ceiling before a final answer is forced (overrides config)
    #[arg(long)]
    max_steps: Option<u32>,

    /// Print the finished trace as JSON instead of rendering it
    #[arg(long)]
    json: bool,

    /// Ask a single question and exit instead of starting the prompt
    query: Vec<String>,
}

impl Args {
    fn apply_to(&self, config: &mut PonderConfig) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(provider) = &self.provider {
            config.llm.provider = provider.clone();
        }
        if let Some(max_steps) = self.max_steps {
            config.reasoning.max_steps = max_steps;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();
    let args = Args::parse();

    let mut config = PonderConfig::load_or_default(&args.config);
    args.apply_to(&mut config);

    info!(
        "Starting with provider {} and model {}",
        config.llm.provider, config.llm.model
    );
    let client = providers::from_config(&config.llm)?;
    let mut engine = ReasoningEngine::from_config(client, &config);

    if !args.query.is_empty() {
        let query = args.query.join(" ");
        return if args.json {
            print_json(&engine, &query).await
        } else {
            answer(&engine, &query).await
        };
    }

    repl(&mut engine).await
}

async fn print_json(engine: &ReasoningEngine, query: &str) -> Result<()> {
    let progress = engine.think(query).await;
    println!("{}", serde_json::to_string_pretty(&progress)?);
    Ok(())
}

/// Run one query, rendering each step as it arrives. Ctrl-C abandons the run.
async fn answer(engine: &ReasoningEngine, query: &str) -> Result<()> {
    let mut run = engine.run(query);
    let mut renderer = Renderer::new();
    let mut stdout = io::stdout();

    loop {
        tokio::select! {
            next = run.next_progress() => match next {
                Some(progress) => renderer.render(&progress, &mut stdout)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\n[interrupted]");
                break;
            }
        }
    }
    Ok(())
}

async fn repl(engine: &mut ReasoningEngine) -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to start line editor")?;
    println!(
        "Ponder ready (model {}). Type /help for commands, /quit to exit.",
        engine.model()
    );

    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };
        if let Err(e) = editor.add_history_entry(line.as_str()) {
            debug!("Failed to record history entry: {}", e);
        }

        match commands::parse(&line) {
            Command::Empty => {}
            Command::Query(query) => {
                if let Err(e) = answer(engine, &query).await {
                    error!("Failed to render answer: {:#}", e);
                }
                println!();
            }
            Command::Help => println!("{}", commands::HELP),
            Command::ShowModel => println!("Current model: {}", engine.model()),
            Command::SetModel(model) => {
                engine.set_model(model);
                println!("Model changed to: {}", engine.model());
            }
            Command::ShowSteps => println!("Step ceiling: {}", engine.max_steps()),
            Command::SetSteps(n) => {
                engine.set_max_steps(n);
                println!("Step ceiling changed to: {}", n);
            }
            Command::Clear => {
                if let Err(e) = editor.clear_screen() {
                    error!("Failed to clear screen: {}", e);
                }
            }
            Command::Quit => break,
            Command::Invalid(msg) => println!("{}", msg),
            Command::Unknown(cmd) => println!("Unknown command: {}", cmd),
        }
        io::stdout().flush()?;
    }

    Ok(())
}
