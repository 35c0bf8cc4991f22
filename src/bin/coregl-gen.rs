use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coregl::{Generator, GeneratorConfig, Platform};

/// Generate OpenGL.h / OpenGL.c bindings for the OpenGL Core Profile
#[derive(Parser, Debug)]
#[command(name = "coregl-gen", version)]
#[command(about = "Generate OpenGL core-profile loading code from a local glcorearb.h")]
struct Cli {
    /// TOML configuration file; flags below override its values
    #[arg(short, long, env = "COREGL_CONFIG")]
    config: Option<PathBuf>,

    /// Path to glcorearb.h, or a directory containing it
    #[arg(long, env = "COREGL_SOURCE")]
    source: Option<PathBuf>,

    /// Directory the generated files are written to
    #[arg(long, env = "COREGL_DESTINATION")]
    destination: Option<PathBuf>,

    /// Target platform of the generated code (linux, windows, macos)
    #[arg(long, env = "COREGL_PLATFORM")]
    platform: Option<Platform>,

    /// Skip prototypes declared in extension blocks
    #[arg(long, env = "COREGL_CORE_ONLY")]
    core_only: bool,

    /// Log level
    #[arg(long, env = "COREGL_LOG", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(destination) = self.destination {
            config.destination = destination;
        }
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if self.core_only {
            config.core_only = true;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .init();

    let config = cli.into_config()?;
    log::debug!("{:?}", config);

    let report = Generator::new(config)
        .run()
        .context("OpenGL binding generation failed")?;

    println!(
        "The OpenGL library loading files were written to: {} ({} functions)",
        report
            .header_path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        report.functions
    );
    Ok(())
}
