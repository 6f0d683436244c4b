//! lumina_noel: interactive entry point.

mod cli;

use clap::Parser;
use lumina_noel::app::{run, SourceKind};

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG still wins over the flags
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let cfg = cli.into_config();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Lumina Noel: gesture-controlled particle tree       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &cfg.source {
        SourceKind::Simulated     => println!("  Hand: keyboard simulation (F/O/P/R, H, mouse)"),
        SourceKind::Stdin         => println!("  Hand: JSON lines on stdin"),
        SourceKind::Command(argv) => println!("  Hand: detector `{}`", argv.join(" ")),
    }
    println!("  {} particles, {} photos", cfg.formation.particle_count, cfg.photos.len());
    println!();

    if let Err(e) = run(cfg) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
