use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "climate-api")]
#[command(about = "Read-only climate observation API")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, help = "Configuration file (toml, yaml, json, ...)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "SQLite database with station and measurement tables")]
    pub database: Option<PathBuf>,

    #[arg(long, help = "Address to bind the HTTP server to")]
    pub host: Option<String>,

    #[arg(short, long, help = "Port to bind the HTTP server to")]
    pub port: Option<u16>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}
