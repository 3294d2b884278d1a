use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use omen_pipeline::{Pipeline, Strategy};

/// Omen — turn a system description into a STRIDE threat model and a
/// draw.io diagram.
#[derive(Parser)]
#[command(name = "omen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// System description. Reads stdin when omitted.
    description: Option<String>,

    /// Directory the diagram document is written to
    #[arg(long, default_value = "outputs")]
    out_dir: PathBuf,

    /// Delegate extraction and synthesis to the configured language
    /// model (~/.omen/settings.json) instead of the keyword rules
    #[arg(long)]
    delegate: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let description = match cli.description {
        Some(d) => d,
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("failed to read description from stdin: {e}");
                std::process::exit(1);
            }
            buf
        }
    };
    let description = description.trim();
    if description.is_empty() {
        eprintln!("no system description given");
        std::process::exit(1);
    }

    let pipeline = if cli.delegate {
        let settings = omen_core::read_settings();
        if !omen_core::ai_configured(&settings) {
            eprintln!(
                "--delegate needs provider, model, and api key in {}",
                omen_core::config_dir().join("settings.json").display()
            );
            std::process::exit(1);
        }
        Pipeline::from_settings(&settings, cli.out_dir)
    } else {
        Pipeline::new(Strategy::RuleBased, cli.out_dir)
    };

    match pipeline.run(description).await {
        Ok(bundle) => match serde_json::to_string_pretty(&bundle) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to serialize result: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("threat model generation failed: {e}");
            std::process::exit(1);
        }
    }
}
