use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use exoplanet_explorer::comparison;
use exoplanet_explorer::config::{ExplorerConfig, API_TOKEN_ENV};
use exoplanet_explorer::features::{self, FeatureVector};
use exoplanet_explorer::imaging::ImageGenClient;
use exoplanet_explorer::inference::{self, load_model, ModelChoice};
use exoplanet_explorer::mapper;
use exoplanet_explorer::names::NameMap;
use exoplanet_explorer::questionnaire::{ClusterKey, CLUSTERS};
use exoplanet_explorer::session::ExplorerSession;
use exoplanet_explorer::synthesis;

#[derive(Parser, Debug)]
#[command(name = "exoplanet_explorer")]
#[command(about = "Explore exoplanet classification and design your own planet")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Token for the image generation service
    #[arg(long, env = API_TOKEN_ENV, hide_env_values = true, global = true)]
    api_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the planet questions and their options
    Questions,
    /// Design a planet from questionnaire answers
    Create(CreateArgs),
    /// Classify a KOI candidate with one of the trained models
    Predict(PredictArgs),
    /// Compare our models with the published baseline
    Compare,
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Explorer's name
    #[arg(short, long)]
    name: String,

    /// How big is the planet
    #[arg(long)]
    size: Option<String>,

    /// How hot or cold the planet is
    #[arg(long)]
    temperature: Option<String>,

    /// How long a year lasts
    #[arg(long)]
    orbit: Option<String>,

    /// Kind of host star
    #[arg(long)]
    star_type: Option<String>,

    /// Surface gravity
    #[arg(long)]
    gravity: Option<String>,

    /// Atmosphere
    #[arg(long)]
    atmosphere: Option<String>,

    /// Where in the sky the planet is
    #[arg(long)]
    location: Option<String>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print every generated feature value
    #[arg(long)]
    show_features: bool,

    /// Print the full image prompt
    #[arg(long)]
    show_prompt: bool,

    /// Render the planet with the image generation service
    #[arg(long)]
    image: bool,
}

impl CreateArgs {
    fn answer(&self, key: ClusterKey) -> Option<&str> {
        match key {
            ClusterKey::Size => self.size.as_deref(),
            ClusterKey::Temperature => self.temperature.as_deref(),
            ClusterKey::Orbit => self.orbit.as_deref(),
            ClusterKey::StarType => self.star_type.as_deref(),
            ClusterKey::Gravity => self.gravity.as_deref(),
            ClusterKey::Atmosphere => self.atmosphere.as_deref(),
            ClusterKey::Location => self.location.as_deref(),
        }
    }
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Model to use
    #[arg(short, long, default_value = "CatBoost", value_parser = ModelChoice::from_str)]
    model: ModelChoice,

    /// Override the configured model file
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Feature value as "Label=value" (repeatable); others default to their range midpoint
    #[arg(long = "value", value_name = "LABEL=VALUE")]
    values: Vec<String>,

    /// Start from random values instead of midpoints
    #[arg(long)]
    randomize: bool,

    /// Random seed for --randomize
    #[arg(short, long)]
    seed: Option<u64>,
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    let seed = seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);
    ChaCha8Rng::seed_from_u64(seed)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => ExplorerConfig::from_json_file(path)?,
        None => ExplorerConfig::default(),
    }
    .with_token_fallback(cli.api_token.clone());

    match cli.command {
        Command::Questions => list_questions(),
        Command::Create(args) => create_planet(&args, &config),
        Command::Predict(args) => predict(&args, &config),
        Command::Compare => {
            println!("{}", comparison::render_table());
            Ok(())
        }
    }
}

fn list_questions() -> Result<()> {
    for cluster in CLUSTERS.iter() {
        println!("{} (--{})", cluster.question, cluster.key.as_str().replace('_', "-"));
        for option in cluster.options {
            println!("  - {:<13} {}", option.name, option.desc);
        }
        println!();
    }
    Ok(())
}

fn create_planet(args: &CreateArgs, config: &ExplorerConfig) -> Result<()> {
    let mut session = ExplorerSession::new();
    session.set_name(&args.name);
    session.start()?;
    session.begin_questions()?;

    for key in ClusterKey::ALL {
        if let Some(choice) = args.answer(key) {
            session.answer(key, choice)?;
        }
    }
    let answers = session.finish()?;

    let mut rng = seeded_rng(args.seed);
    let values = mapper::generate_feature_values(&answers, &mut rng);
    let prompt = synthesis::generate_description(&answers, session.explorer(), &values);

    println!("{}", synthesis::planet_summary(&answers, session.explorer()));

    if args.show_features {
        println!("\nNASA KOI features generated: {} out of {}", values.len(), features::FEATURES.len());
        for (label, value) in values.iter_table_order() {
            println!("  {}: {:.6}", label, value);
        }
    }

    if args.show_prompt {
        println!("\n{}", prompt);
    }

    if args.image {
        render_image(&prompt, config)?;
    }

    Ok(())
}

/// Image service failures are reported, never fatal.
fn render_image(prompt: &str, config: &ExplorerConfig) -> Result<()> {
    if config.image.api_token.is_none() {
        warn!("No API token set ({}); the image service may refuse the request", API_TOKEN_ENV);
    }
    let client = ImageGenClient::new(config.image.clone()).context("creating image client")?;

    println!("\nGenerating image... this may take a few seconds");
    match client.generate_and_save(prompt) {
        Ok(path) => println!("Image saved as {}", path.display()),
        Err(e) if e.is_transient() => println!("Model is loading... please try again in a few seconds."),
        Err(e) => println!("Image generation failed: {}", e),
    }
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, f64)> {
    let (label, value) = raw
        .rsplit_once('=')
        .with_context(|| format!("expected LABEL=VALUE, got '{}'", raw))?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", value.trim()))?;
    Ok((label.trim().to_string(), value))
}

fn predict(args: &PredictArgs, config: &ExplorerConfig) -> Result<()> {
    let mut values = FeatureVector::midpoints();
    if args.randomize {
        values.randomize_all(&mut seeded_rng(args.seed));
    }
    for raw in &args.values {
        let (label, value) = parse_assignment(raw)?;
        if features::feature(&label).is_none() {
            warn!("'{}' is not a known feature label; passing it through unchanged", label);
        }
        values.insert(label, value);
    }

    for warning in values.out_of_range() {
        warn!("{}", warning);
        println!("Warning: {}", warning);
    }

    let input = inference::input_from_features(&values, &NameMap::default());
    println!("Input preview (model input):\n{}", input.preview());

    let path = args
        .model_path
        .clone()
        .unwrap_or_else(|| config.models.path_for(args.model).to_path_buf());
    let model = load_model(&path).with_context(|| format!("loading {} model", args.model))?;
    println!("Loaded {} model successfully.", args.model);

    match inference::predict(&model, &input) {
        Ok(prediction) => println!("{}", prediction),
        Err(failure) => println!("{}", failure),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let (label, value) = parse_assignment("Orbital Period (days) = 10.5").unwrap();
        assert_eq!(label, "Orbital Period (days)");
        assert_eq!(value, 10.5);
        assert!(parse_assignment("no equals sign").is_err());
        assert!(parse_assignment("RA (deg)=north").is_err());
    }

    #[test]
    fn test_cli_parses_create() {
        let cli = Cli::try_parse_from([
            "exoplanet_explorer",
            "create",
            "--name",
            "Ada",
            "--star-type",
            "Sun-like",
            "--seed",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Create(args) => {
                assert_eq!(args.answer(ClusterKey::StarType), Some("Sun-like"));
                assert_eq!(args.answer(ClusterKey::Size), None);
                assert_eq!(args.seed, Some(3));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_predict_model() {
        let cli = Cli::try_parse_from(["exoplanet_explorer", "predict", "-m", "lightgbm"]).unwrap();
        match cli.command {
            Command::Predict(args) => assert_eq!(args.model, ModelChoice::LightGBM),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
