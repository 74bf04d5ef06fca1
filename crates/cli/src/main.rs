// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use abslot_cli::commands::{
    boot_mode, dump, init, inspect, mark_successful, merge_status, next, reinit, set_active,
    set_unbootable,
};
use abslot_cli::session;
use abslot_kernel::config::DEFAULT_MAX_RETRIES;
use abslot_kernel::ProvisionConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "abslot")]
#[command(about = "Inspect and drive A/B boot-slot metadata files", long_about = None)]
struct Cli {
    /// Metadata file
    #[arg(long, short, global = true, default_value = "abslot.bin")]
    file: PathBuf,

    /// Slot the firmware is running from (letter or index)
    #[arg(long, global = true)]
    current: Option<String>,

    /// Reprovision the file if it fails validation
    #[arg(long, global = true)]
    recover: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a fresh metadata file
    Init {
        #[arg(long, default_value_t = 2)]
        slots: u8,

        #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
        max_retries: u8,

        /// Do not record why slots became unbootable
        #[arg(long)]
        no_reason_tracking: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the metadata as a table
    Inspect,
    /// Print the metadata as JSON
    Dump,
    /// Show the next boot target
    Next {
        /// Consume a boot attempt from the selected slot
        #[arg(long)]
        mark: bool,
    },
    /// Make a slot the next boot target with a fresh retry budget
    SetActive { slot: String },
    /// Retire a slot
    SetUnbootable { slot: String, reason: String },
    /// Record that a slot booted to completion
    MarkSuccessful { slot: String },
    /// Reset every slot to its defaults
    Reinit,
    /// Show or set the boot mode
    BootMode { mode: Option<String> },
    /// Show or set the snapshot merge status
    MergeStatus { status: Option<String> },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "abslot=info,abslot_kernel=info,abslot_persistence=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let current = session::parse_current(cli.current.as_deref())?;
    let open = || session::open(&cli.file, current, cli.recover);

    match cli.command {
        Commands::Init {
            slots,
            max_retries,
            no_reason_tracking,
            force,
        } => {
            let config = ProvisionConfig {
                slot_count: slots,
                max_retries,
                tracks_unbootable_reasons: !no_reason_tracking,
            };
            init::run(&cli.file, config, force)
        }
        Commands::Inspect => inspect::run(&open()?),
        Commands::Dump => dump::run(&open()?).map(|_| ()),
        Commands::Next { mark } => next::run(&mut open()?, mark).map(|_| ()),
        Commands::SetActive { slot } => set_active::run(&mut open()?, &slot),
        Commands::SetUnbootable { slot, reason } => set_unbootable::run(&mut open()?, &slot, &reason),
        Commands::MarkSuccessful { slot } => mark_successful::run(&mut open()?, &slot),
        Commands::Reinit => reinit::run(&mut open()?),
        Commands::BootMode { mode } => boot_mode::run(&mut open()?, mode.as_deref()).map(|_| ()),
        Commands::MergeStatus { status } => merge_status::run(&mut open()?, status.as_deref()).map(|_| ()),
    }
}
