//! scavenger CLI - Image scavenger hunt.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scavenger::game::INSTRUCTIONS;
use scavenger::{
    Config, ConsoleDisplay, ConsolePicker, ExitStatus, FilePicker, GameConfig, GameSession,
    ImageDisplay, MatcherClient, ProcessMatcher, PromptStream, RngState, RoundController,
    SampleSet, ScavengerError, ScriptedPicker, ViewerDisplay,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG: &str = "scavenger.toml";

#[derive(Parser)]
#[command(name = "scavenger")]
#[command(version)]
#[command(about = "Find another picture of the same thing; an external matcher decides")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply when scavenger.toml is absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game
    Play {
        /// Number of rounds (asked interactively when omitted)
        #[arg(short, long)]
        rounds: Option<usize>,

        /// Shuffle seed, for repeatable games
        #[arg(long)]
        seed: Option<u64>,

        /// Directory of challenge images
        #[arg(long)]
        samples: Option<PathBuf>,

        /// Matcher executable
        #[arg(long)]
        matcher: Option<PathBuf>,

        /// External image viewer for reference images
        #[arg(long)]
        viewer: Option<PathBuf>,

        /// Replay these candidates instead of asking (comma-separated, `skip` cancels)
        #[arg(long, value_delimiter = ',')]
        candidates: Option<Vec<String>>,

        /// Print the final report as JSON on stdout (prompts go to stderr)
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration and sample directory
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("logging already initialized");
    }
}

fn print_example_config() {
    let example = r#"# scavenger configuration file

[samples]
dir = "objectSamples"

[matcher]
program = "ScreenSearch"
# arguments placed before <reference> <candidate> <artifact>
leading_args = ["objectDetection"]
artifact = "lastMatch.png"
poll_interval_ms = 1000
show_progress = true

[display]
# viewer = "feh"
# viewer_args = ["--scale-down"]
reveal_delay_ms = 2000

[game]
# rounds = 5
# seed = 42
"#;
    println!("{example}");
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path),
        None => Config::from_file_or_default(Path::new(DEFAULT_CONFIG)),
    };
    config
        .map_err(ScavengerError::from)
        .context("Failed to load configuration")
}

/// Exit status for an error, looking through any added context.
fn exit_status(err: &anyhow::Error) -> ExitStatus {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ScavengerError>())
        .map(ScavengerError::exit_status)
        .unwrap_or(ExitStatus::InternalFault)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::from(ExitStatus::Success.code()),
        Err(err) => {
            let status = exit_status(&err);
            error!(exit_code = status.code(), "{err:#}");
            ExitCode::from(status.code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Example => {
            print_example_config();
        }

        Commands::Validate => {
            let samples = SampleSet::load(&config.samples.dir)?;

            info!("Configuration is valid");
            println!("Samples:     {} in {}", samples.len(), samples.root().display());
            println!("Matcher:     {}", config.matcher.program.display());
            println!("Poll:        {}ms", config.matcher.poll_interval_ms);
            match &config.display.viewer {
                Some(viewer) => println!("Viewer:      {}", viewer.display()),
                None => println!("Viewer:      (console)"),
            }
            if let Some(rounds) = config.game.rounds {
                GameConfig::new(rounds, samples.len())?;
                println!("Rounds:      {rounds}");
            }
        }

        Commands::Play {
            rounds,
            seed,
            samples,
            matcher,
            viewer,
            candidates,
            json,
        } => {
            // CLI flags override the config file
            if let Some(dir) = samples {
                config.samples.dir = dir;
            }
            if let Some(program) = matcher {
                config.matcher.program = program;
            }
            if viewer.is_some() {
                config.display.viewer = viewer;
            }
            let rounds = rounds.or(config.game.rounds);
            let seed = seed.or(config.game.seed);

            play(config, rounds, seed, candidates, json).await?;
        }
    }

    Ok(())
}

async fn play(
    config: Config,
    rounds: Option<usize>,
    seed: Option<u64>,
    candidates: Option<Vec<String>>,
    json: bool,
) -> Result<()> {
    // stdout is reserved for the report in JSON mode
    let stream = PromptStream::for_report(json);
    let samples = SampleSet::load(&config.samples.dir)?;
    let mut console = ConsolePicker::stdin().with_stream(stream);

    let game_config = match rounds {
        Some(rounds) => GameConfig::new(rounds, samples.len())?,
        None => {
            stream.write(format_args!(
                "found {} sample images.  Each round, one of these is chosen at random.  How many rounds do you wish to play?\n",
                samples.len()
            ));
            let line = console.read_line().await?.unwrap_or_default();
            GameConfig::parse(&line, samples.len())?
        }
    };

    let mut rng = match seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_time(),
    };
    let session = GameSession::new(samples, game_config, &mut rng)?
        .with_reveal_delay(config.display.reveal_delay());

    let matcher = Arc::new(ProcessMatcher::from_config(&config.matcher));
    let controller = RoundController::new(MatcherClient::new(matcher));

    let mut display: Box<dyn ImageDisplay> = match &config.display.viewer {
        Some(viewer) => Box::new(
            ViewerDisplay::new(viewer.clone(), config.display.viewer_args.clone())
                .with_stream(stream),
        ),
        None => Box::new(ConsoleDisplay::new().with_stream(stream)),
    };

    let mut scripted = candidates.map(ScriptedPicker::from_specs);
    let interactive = scripted.is_none();
    let picker: &mut dyn FilePicker = match scripted.as_mut() {
        Some(scripted) => scripted,
        None => &mut console,
    };

    stream.write(format_args!("{INSTRUCTIONS}\n\n"));
    let report = session
        .run(display.as_mut(), picker, &controller)
        .await
        .context("Game aborted")?;

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{out}");
        return Ok(());
    }

    println!("\n\nGame over!");
    println!("{}", report.score);
    println!("Seed:        {}", report.seed);
    println!("Runtime:     {:.1}s", report.runtime_secs);

    if interactive {
        println!("\nPress enter to exit.");
        if let Err(e) = console.read_line().await {
            warn!(error = %e, "Could not wait for enter");
        }
    }

    Ok(())
}
