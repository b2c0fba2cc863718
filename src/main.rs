use anyhow::Context;
use clap::Parser;
use gurpsify::{ConvertOptions, Converter, InputStatblock, OutputDocument};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BATTLE_HARDENED_PROMPT: &str = "Is the character battle-hardened? (Yes/No): ";

#[derive(Parser)]
#[command(name = "gurpsify")]
#[command(
    version,
    about = "Convert a 5e monster statblock into a GURPS character sheet",
    long_about = None
)]
struct Cli {
    /// Source statblock (5etools JSON)
    #[arg(short, long, env = "GURPSIFY_INPUT", default_value = "input.json")]
    input: PathBuf,

    /// Baseline character sheet to build on [default: bundled sheet]
    #[arg(short, long, env = "GURPSIFY_BASELINE")]
    baseline: Option<PathBuf>,

    /// Where to write the converted sheet
    #[arg(short, long, env = "GURPSIFY_OUTPUT", default_value = "output.json")]
    output: PathBuf,

    /// Answer to the battle-hardened question; prompts when omitted
    #[arg(long, env = "GURPSIFY_BATTLE_HARDENED", value_name = "ANSWER")]
    battle_hardened: Option<String>,

    /// Print the per-rule conversion report as JSON
    #[arg(long)]
    report: bool,
}

/// Ask the battle-hardened question on stdout. End of input counts as "no".
fn prompt_battle_hardened() -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(BATTLE_HARDENED_PROMPT.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for the prompt and report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gurpsify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let answer = match cli.battle_hardened {
        Some(answer) => answer,
        None => prompt_battle_hardened().context("Failed to read the battle-hardened answer")?,
    };
    let options = ConvertOptions::from_answer(&answer);

    let input = InputStatblock::from_path(&cli.input)?;
    let baseline = match &cli.baseline {
        Some(path) => OutputDocument::from_path(path)?,
        None => OutputDocument::bundled()?,
    };
    tracing::info!(
        input = %cli.input.display(),
        battle_hardened = options.battle_hardened,
        "loaded statblock"
    );

    let conversion = Converter::new()?.convert(&input, baseline, options)?;
    conversion.document.write_to(&cli.output)?;
    tracing::info!(output = %cli.output.display(), "wrote character sheet");

    if cli.report {
        let report = serde_json::to_string_pretty(&conversion.report)
            .context("Failed to serialize the conversion report")?;
        println!("{report}");
    }

    Ok(())
}
