//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--json] [--seconds N] <file>

use std::env;

use stratum_chords::{analyze_with_config, AnalysisConfig, DEFAULT_MAX_DURATION_SECONDS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut json = false;
    let mut seconds = DEFAULT_MAX_DURATION_SECONDS;
    let mut path: Option<String> = None;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--seconds" => {
                seconds = args
                    .first()
                    .ok_or("--seconds requires a value")?
                    .parse::<f64>()?;
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_file [--json] [--seconds N] <file>\n\
                     \n\
                     --json       Emit the timeline as JSON\n\
                     --seconds N  Analyse at most N seconds (default: 90)\n"
                );
                return Ok(());
            }
            _ => path = Some(a),
        }
    }

    let path = match path {
        Some(p) => p,
        None => {
            eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
            std::process::exit(2);
        }
    };

    let config = AnalysisConfig::with_max_duration(seconds);
    let analysis = analyze_with_config(&path, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis.timeline)?);
        return Ok(());
    }

    println!("Chords in {}:", path);
    for event in &analysis.timeline {
        let quality = if event.chord.is_minor() { "minor" } else { "major" };
        println!("  {:>4}s  {:<4} ({})", event.onset_seconds, event.chord.name(), quality);
    }
    println!(
        "  {:.1}s analysed, {} frames at {:.2} fps, {:.2} ms",
        analysis.metadata.duration_seconds,
        analysis.metadata.frame_count,
        analysis.metadata.frame_rate,
        analysis.metadata.processing_time_ms
    );

    Ok(())
}
