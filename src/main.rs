use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use medcopy::app::App;
use medcopy::config::{Config, LocalSettings};
use medcopy::models::{Audience, ContentFormat, GenerationInputs, Platform};
use medcopy::presets::{self, PRESETS};
use medcopy::session::{SaveOutcome, Session};
use medcopy::sheets::AuthSession;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "medcopy")]
#[command(about = "Generate persona-driven medical marketing copy")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate content and save it when a spreadsheet is configured.
    Generate(GenerateArgs),
    /// Store spreadsheet connection settings.
    Settings {
        #[arg(long)]
        client_id: Option<String>,
        #[arg(long)]
        spreadsheet_id: Option<String>,
    },
    /// List built-in persona presets.
    Presets,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Persona definition text.
    #[arg(long, conflicts_with_all = ["persona_file", "preset"])]
    persona: Option<String>,
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    persona_file: Option<PathBuf>,
    /// Built-in persona id (see `medcopy presets`).
    #[arg(long, value_name = "ID")]
    preset: Option<String>,
    /// Topic or raw notes. Optional summary goal in summarizer mode.
    #[arg(long, default_value = "")]
    topic: String,
    /// Grounding text, or the source text to summarize.
    #[arg(long, conflicts_with = "context_file")]
    context: Option<String>,
    #[arg(long, value_name = "PATH")]
    context_file: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<ContentFormat>,
    #[arg(long, value_enum)]
    audience: Option<Audience>,
    #[arg(long)]
    citations: bool,
    #[arg(long)]
    hashtags: bool,
    /// Distill the topic into one core insight first.
    #[arg(long)]
    distill: bool,
    /// Generate N distinct variations.
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..=10),
        conflicts_with_all = ["carousel", "summarize"]
    )]
    batch: Option<u32>,
    #[arg(long, conflicts_with = "summarize")]
    carousel: bool,
    #[arg(long)]
    summarize: bool,
    /// Exam-oriented summary with timestamps and high-yield pearls.
    #[arg(long, requires = "summarize")]
    exam: bool,
    /// Multi-format variant to save.
    #[arg(long, value_enum)]
    platform: Option<Platform>,
    #[arg(long)]
    no_save: bool,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

fn build_inputs(args: &GenerateArgs) -> Result<GenerationInputs> {
    let persona = match (&args.persona, &args.persona_file, &args.preset) {
        (Some(text), _, _) => text.clone(),
        (None, Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read persona file {}", path.display()))?,
        (None, None, Some(id)) => match presets::preset(id) {
            Some(preset) => preset.persona_prompt.to_string(),
            None => bail!("Unknown preset '{}'. Run `medcopy presets` to list them.", id),
        },
        (None, None, None) => String::new(),
    };

    let context = match (&args.context, &args.context_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file {}", path.display()))?,
        (None, None) => String::new(),
    };

    let mut inputs = GenerationInputs::new(persona, args.topic.clone())
        .with_context(context)
        .with_format(args.format.unwrap_or_default())
        .with_audience(args.audience.unwrap_or_default());
    inputs.include_citations = args.citations;
    inputs.include_hashtags = args.hashtags;
    inputs.enable_distillation = args.distill;

    if let Some(count) = args.batch {
        inputs.set_batch_mode(true);
        inputs.set_batch_count(count);
    }
    inputs.set_carousel_mode(args.carousel);
    inputs.set_summarizer_mode(args.summarize);
    inputs.set_exam_summarizer_mode(args.exam);

    Ok(inputs)
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let inputs = build_inputs(&args)?;
    let config = Config::from_env()?;
    let settings = LocalSettings::load(&config.settings_path)?.with_fallbacks(&config);

    let auth = Arc::new(match &config.sheets_access_token {
        Some(token) => AuthSession::with_token(token.clone()),
        None => AuthSession::new(),
    });
    let app = App::new(&config, &settings, auth)?;

    let mut session = Session::new(inputs);
    session.generate(&app).await?;
    if let Some(platform) = args.platform {
        session.active_platform = platform;
    }

    if let Some(result) = session.result() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            println!("{}", result);
        }
    }

    if args.no_save {
        return Ok(());
    }

    match session.save(&app).await {
        Ok(SaveOutcome::Saved) => info!("Saved result to spreadsheet"),
        Ok(SaveOutcome::AuthorizationRequired) => warn!(
            "Not saved: Google Sheets needs authorization. Set GOOGLE_SHEETS_ACCESS_TOKEN and run again."
        ),
        Ok(outcome) => info!("Result not saved ({:?})", outcome),
        Err(e) => error!("Failed to save result: {}", e),
    }
    Ok(())
}

fn run_settings(client_id: Option<String>, spreadsheet_id: Option<String>) -> Result<()> {
    dotenvy::dotenv().ok();
    let path = std::env::var("MEDCOPY_SETTINGS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(medcopy::config::DEFAULT_SETTINGS_PATH));

    let mut settings = LocalSettings::load(&path)?;
    if let Some(client_id) = client_id {
        settings.client_id = client_id;
    }
    if let Some(spreadsheet_id) = spreadsheet_id {
        settings.spreadsheet_id = spreadsheet_id;
    }
    settings.save(&path)?;

    if !settings.is_complete() {
        warn!("Settings saved but incomplete: both client id and spreadsheet id are needed");
    }
    Ok(())
}

fn list_presets() {
    for preset in PRESETS {
        println!("{:<20} {} - {}", preset.id, preset.name, preset.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medcopy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Settings {
            client_id,
            spreadsheet_id,
        } => run_settings(client_id, spreadsheet_id),
        Command::Presets => {
            list_presets();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
