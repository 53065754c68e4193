//! Terminal front-end for promptflow pipelines.
//!
//! Collects the initial input values, runs the chosen built-in pipeline,
//! prints per-stage progress to stderr and the final text to stdout. All
//! pipeline logic lives in the `promptflow` crate; this binary only adapts
//! it to a terminal.

use anyhow::Context;
use promptflow::prelude::*;
use std::io::Write;
use std::process;
use std::sync::Arc;

/// Prints per-stage progress to stderr as the run advances.
struct TerminalProgress;

impl RunObserver for TerminalProgress {
    fn on_stage_started(&self, stage_id: &str) {
        eprintln!("... running stage '{stage_id}'");
    }

    fn on_stage_completed(&self, stage_id: &str, output: &str) {
        eprintln!("    stage '{stage_id}' completed ({} chars)", output.len());
    }

    fn on_stage_failed(&self, stage_id: &str, error: &str) {
        eprintln!("    stage '{stage_id}' failed: {error}");
    }

    fn on_run_completed(&self, _final_stage_id: &str, duration_ms: f64) {
        eprintln!("    done in {duration_ms:.0} ms");
    }
}

fn usage() {
    eprintln!("usage: promptflow <command>");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  optimize [--model <id>]   improve and optimize a prompt for a target model");
    eprintln!("  post                      create and moderate a social media post");
    eprintln!();
    eprintln!("The GROQ_API_KEY environment variable (or a .env entry) must be set.");
}

fn read_line(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    std::io::stdout().flush().context("flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("read stdin")?;
    Ok(line.trim().to_string())
}

/// Builds the HTTP client, resolving the credential once at startup.
fn build_client(model_override: Option<&str>) -> Result<Arc<HttpCompletionClient>, i32> {
    let config = match CompletionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("add it to your environment or to a .env file in the working directory");
            return Err(2);
        }
    };
    let config = match model_override {
        Some(model) => config.with_model(model),
        None => config,
    };
    match HttpCompletionClient::new(config) {
        Ok(client) => Ok(Arc::new(client)),
        Err(e) => {
            eprintln!("error: {e}");
            Err(1)
        }
    }
}

fn cancel_on_ctrl_c() -> Arc<CancellationToken> {
    let token = Arc::new(CancellationToken::new());
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel("interrupted by user");
            }
        });
    }
    token
}

fn report_failure(failure: &PipelineFailure) {
    eprintln!();
    eprintln!("error: {failure}");
    if !failure.partial.is_empty() {
        eprintln!();
        eprintln!("outputs of completed stages:");
        for output in failure.partial.outputs() {
            eprintln!();
            eprintln!("--- {} ---", output.stage_id);
            eprintln!("{}", output.text);
        }
    }
}

async fn run_optimize(args: &[String]) -> i32 {
    let mut model_override = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--model" => {
                i += 1;
                if i < args.len() {
                    model_override = Some(args[i].clone());
                } else {
                    eprintln!("error: --model requires a value");
                    return 2;
                }
            }
            other => {
                eprintln!("error: unknown argument '{other}'");
                return 2;
            }
        }
        i += 1;
    }

    let client = match build_client(model_override.as_deref()) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let target_model = client.model().to_string();

    println!("Prompt Improver & Optimizer");
    println!();
    let user_prompt = match read_line("Write your prompt: ") {
        Ok(line) => line,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    if user_prompt.is_empty() {
        println!("No prompt given. Exiting.");
        return 0;
    }

    println!();
    println!("Target model: {target_model}");
    println!();

    let runner = PipelineRunner::new(client).with_observer(Arc::new(TerminalProgress));
    let token = cancel_on_ctrl_c();

    let outcome = runner
        .run_with_cancellation(
            &presets::prompt_refinement(),
            Bindings::from_pairs([
                (presets::USER_PROMPT, user_prompt.as_str()),
                (presets::TARGET_MODEL, target_model.as_str()),
            ]),
            &token,
        )
        .await;

    match outcome {
        Ok(result) => {
            println!();
            println!("Enhanced & optimized prompt:");
            println!();
            println!("{}", result.final_output().unwrap_or_default());
            0
        }
        Err(failure) => {
            report_failure(&failure);
            1
        }
    }
}

async fn run_post() -> i32 {
    let client = match build_client(None) {
        Ok(client) => client,
        Err(code) => return code,
    };

    println!("Social Media Content Creator");
    println!();
    let topic = match read_line("Enter a topic for the post: ") {
        Ok(line) => line,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let platform = match read_line("Enter the target platform (e.g., LinkedIn, Twitter): ") {
        Ok(line) => line,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    if topic.is_empty() || platform.is_empty() {
        println!("Topic and platform are both required. Exiting.");
        return 0;
    }

    println!();

    let runner = PipelineRunner::new(client).with_observer(Arc::new(TerminalProgress));
    let token = cancel_on_ctrl_c();

    let outcome = runner
        .run_with_cancellation(
            &presets::social_content(),
            Bindings::from_pairs([
                (presets::TOPIC, topic.as_str()),
                (presets::PLATFORM, platform.as_str()),
            ]),
            &token,
        )
        .await;

    match outcome {
        Ok(result) => {
            println!();
            println!("Generated content:");
            println!();
            println!("{}", result.get("content").unwrap_or_default());
            println!();
            println!("Approved content:");
            println!();
            println!("{}", result.final_output().unwrap_or_default());
            0
        }
        Err(failure) => {
            report_failure(&failure);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present; the credential check happens at client build.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let code = match args.get(1).map(String::as_str) {
        Some("optimize") => run_optimize(&args[2..]).await,
        Some("post") => run_post().await,
        _ => {
            usage();
            2
        }
    };

    process::exit(code);
}
