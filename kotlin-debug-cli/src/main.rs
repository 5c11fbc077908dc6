//! Kotlin Debug CLI
//!
//! Provisions the Kotlin Debug Adapter and prints the launch descriptor a
//! debugging front-end should use to start it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kotlin_debug_core::adapter::{default_storage_dir, paths};
use kotlin_debug_core::{
    register_debug_adapter, JavaInstallation, LogStatus, Provisioner, ReleaseInstaller,
    SessionRegistry, Settings, SetupContext, DEBUG_TYPE,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Storage directory for settings and the managed install
    /// (default: platform data dir / kotlin-debug)
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Use this adapter start script instead of the managed install
    #[arg(long)]
    adapter_path: Option<String>,

    /// Java home to launch the adapter with
    #[arg(long)]
    java_home: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Provision the adapter and print its session descriptor as JSON (default)
    Descriptor,
    /// Remove the managed adapter install
    Uninstall,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kotlin_debug=debug".parse()?)
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting kotlin-debug v{}", kotlin_debug_core::VERSION);

    let args = Args::parse();
    let storage_dir = match args.storage_dir.clone() {
        Some(dir) => dir,
        None => default_storage_dir()?,
    };
    paths::ensure_dirs_exist(&storage_dir)?;

    match args.command.unwrap_or(Command::Descriptor) {
        Command::Descriptor => print_descriptor(&args, storage_dir).await,
        Command::Uninstall => {
            ReleaseInstaller::default()
                .uninstall(&paths::install_dir(&storage_dir))
                .await?;
            Ok(())
        }
    }
}

async fn print_descriptor(args: &Args, storage_dir: PathBuf) -> anyhow::Result<()> {
    let settings = load_settings(args, &storage_dir);
    let java = JavaInstallation::locate(&settings);
    tracing::debug!(?java, "Java runtime");

    let ctx = SetupContext::new(storage_dir, settings, Arc::new(LogStatus), java);
    let provisioner = Provisioner::new(ReleaseInstaller::default());
    let registry = SessionRegistry::new();

    register_debug_adapter(&ctx, &provisioner, &registry).await?;

    let descriptor = registry.start_session(DEBUG_TYPE)?;
    let json = serde_json::to_string_pretty(&descriptor).context("Failed to serialize descriptor")?;
    println!("{json}");
    Ok(())
}

/// Settings file values, with command-line flags taking precedence.
fn load_settings(args: &Args, storage_dir: &std::path::Path) -> Settings {
    let mut settings = Settings::load(&paths::settings_path(storage_dir));
    if let Some(path) = &args.adapter_path {
        settings.debug_adapter.path = Some(path.clone());
    }
    if let Some(home) = &args.java_home {
        settings.java_home = Some(home.clone());
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "kotlin-debug",
            "--adapter-path",
            "/opt/kda/bin/kotlin-debug-adapter",
            "uninstall",
        ]);
        assert_eq!(
            args.adapter_path.as_deref(),
            Some("/opt/kda/bin/kotlin-debug-adapter")
        );
        assert_eq!(args.command, Some(Command::Uninstall));
    }

    #[test]
    fn test_flags_override_settings_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file_settings = Settings {
            java_home: Some("/from/file".to_string()),
            ..Settings::default()
        };
        file_settings.save(&paths::settings_path(temp_dir.path())).unwrap();

        let args = Args::parse_from(["kotlin-debug", "--adapter-path", "/custom/adapter"]);
        let settings = load_settings(&args, temp_dir.path());

        assert_eq!(settings.debug_adapter_path(), Some("/custom/adapter"));
        assert_eq!(settings.java_home(), Some("/from/file"));
    }
}
