use adb_install_wizard::prelude::*;
use adb_install_wizard::{InstallTarget, DEFAULT_PACKAGE};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// 通过 ADB 把 APK 安装到已连接的 Android 设备
#[derive(Parser, Debug)]
#[command(name = "adb-install-wizard", version, about)]
struct Cli {
    /// Path to the adb executable
    #[arg(long, default_value = "adb")]
    adb: PathBuf,

    /// APK to install, relative to the working directory
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    package: PathBuf,

    /// Delay after the push before reporting completion (ms)
    #[arg(long, default_value_t = 2000)]
    settle_ms: u64,

    /// Wait used by the ADB provisioning step (ms)
    #[arg(long, default_value_t = 3000)]
    provision_ms: u64,

    /// Install on every authorized device in parallel
    #[arg(long)]
    all_devices: bool,

    /// Do not pass -r to adb install
    #[arg(long)]
    no_replace: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan for connected devices (default)
    Devices {
        /// Print the scan result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the automatic installation
    Install,
    /// Show help & troubleshooting
    Guide,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let target = if cli.all_devices {
        InstallTarget::AllAuthorized
    } else {
        InstallTarget::Default
    };
    let config = WizardConfigBuilder::default()
        .adb_path(&cli.adb)
        .package_path(&cli.package)
        .settle_delay(cli.settle_ms)
        .provision_delay(cli.provision_ms)
        .replace_existing(!cli.no_replace)
        .target(target)
        .build();

    let panel = Arc::new(WizardPanel::console());
    let installer = Installer::with_adb(config, panel.clone());

    match cli.command.unwrap_or(Commands::Devices { json: false }) {
        Commands::Devices { json: true } => match installer.scanner().scan() {
            Ok(devices) => match serde_json::to_string_pretty(&devices) {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Devices { json: false } => {
            installer.refresh();
            ExitCode::SUCCESS
        }
        Commands::Install => {
            installer.refresh();
            let result = installer.spawn().and_then(|handle| handle.wait());
            match result {
                Some(InstallResult::Success) => ExitCode::SUCCESS,
                Some(InstallResult::Failure(reason)) => {
                    eprintln!("Installation failed: {}", reason);
                    ExitCode::FAILURE
                }
                None => {
                    eprintln!("Installation did not run");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Guide => {
            installer.show_help();
            ExitCode::SUCCESS
        }
    }
}
