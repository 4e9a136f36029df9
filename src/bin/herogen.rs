//! CLI for herogen - generate the newsletter hero images.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use herogen::{
    GeminiModel, GeneratorConfig, HeroImageGenerator, ImageProvider, PromptCatalog, RunSummary,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "herogen")]
#[command(about = "Generate newsletter hero images via Google Gemini")]
#[command(version)]
struct Cli {
    /// Directory the images are written to
    #[arg(short, long, default_value = herogen::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Env file to read GOOGLE_API_KEY from (defaults to ./.env if present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long, value_enum, default_value = "nano-banana")]
    model: ModelArg,

    /// Seed for deterministic generation
    #[arg(long)]
    seed: Option<u64>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Log per-part detail
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    /// gemini-2.5-flash-image
    NanoBanana,
    /// nano-banana-pro-preview
    NanoBananaPro,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::NanoBanana => GeminiModel::NanoBanana,
            ModelArg::NanoBananaPro => GeminiModel::NanoBananaPro,
        }
    }
}

fn init_tracing(verbose: bool, json_output: bool) {
    let default = if verbose { "herogen=debug" } else { "herogen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    // Keep stdout clean for the JSON document.
    if json_output {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.with_writer(std::io::stdout).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let result = run(&cli).await;
    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }
    ExitCode::from(exit_status(&result))
}

/// Exit 1 only when the run could not start; partial runs still exit 0.
fn exit_status(result: &anyhow::Result<RunSummary>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

async fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let config = load_config(cli, herogen::DEFAULT_CREDENTIAL_VAR)?;

    let mut generator =
        HeroImageGenerator::from_config(&config).context("failed to set up Gemini provider")?;
    if let Some(seed) = cli.seed {
        generator = generator.with_seed(seed);
    }

    generate_and_report(&generator, &PromptCatalog::newsletter_heroes(), cli.json).await
}

fn load_config(cli: &Cli, credential_var: &str) -> anyhow::Result<GeneratorConfig> {
    let mut builder = GeneratorConfig::builder()
        .output_dir(&cli.output_dir)
        .model(cli.model.into())
        .credential_var(credential_var);
    if let Some(ref env_file) = cli.env_file {
        builder = builder.env_file(env_file);
    }
    builder.build().context("cannot start without an API key")
}

async fn generate_and_report<P: ImageProvider>(
    generator: &HeroImageGenerator<P>,
    catalog: &PromptCatalog,
    json_output: bool,
) -> anyhow::Result<RunSummary> {
    if !json_output {
        print_banner(generator.provider());
    }

    let summary = generator.run(catalog).await;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(summary)
}

fn print_banner(provider: &impl ImageProvider) {
    let rule = "=".repeat(80);
    println!("{rule}");
    println!("GENERATING NEWSLETTER HERO IMAGES");
    println!("{rule}");
    println!("Using: {} - {}", provider.name(), provider.model());
    println!();
}

fn print_summary(summary: &RunSummary) {
    let rule = "=".repeat(80);
    println!("\n{rule}");
    println!("GENERATION COMPLETE");
    println!("{rule}");
    println!("Generated: {}/{} images", summary.succeeded, summary.total);
    println!("Output: {}", summary.output_dir.display());
    println!();

    if summary.all_succeeded() {
        println!("[COMPLETE] All hero images generated!");
        for path in summary.written_paths() {
            println!("   - {}", path.display());
        }
    } else {
        println!(
            "[WARNING] Only {}/{} images generated successfully",
            summary.succeeded, summary.total
        );
    }
}
