//! Wayfarer binary: interactive weather-aware travel recommendations.

mod logging;

use clap::Parser;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(about = "Wayfarer: weather-aware travel mode recommendations")]
struct Args {
    /// Model id for both phases (overrides WAYFARER_MODEL)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Tool turns before the recommendation is forced (overrides WAYFARER_MAX_TURNS)
    #[arg(long, value_name = "N")]
    max_turns: Option<u32>,

    /// Verbose: debug-level logs for node and tool execution
    #[arg(short, long)]
    verbose: bool,

    /// Register only the weather tool
    #[arg(long)]
    no_repo_tools: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("wayfarer", None::<&std::path::Path>).ok();
    let args = Args::parse();
    logging::init(args.verbose)?;

    let mut settings = match config::Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("wayfarer: {e}");
            std::process::exit(2);
        }
    };
    if let Some(model) = args.model {
        settings.model = model;
    }
    if let Some(n) = args.max_turns {
        settings.max_turns = n;
    }

    let agent = wayfarer::build_travel_agent(&settings, !args.no_repo_tools)?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    tokio::select! {
        res = cli::run_session(&agent, stdin, &mut stdout) => {
            res?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n👋 Session terminated.");
        }
    }
    Ok(())
}
