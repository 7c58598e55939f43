//! # SALT RSS Sensitivity File Creator
//!
//! Prompts for the directory and the name of the standard star FITS file,
//! then creates the standard file `std_<star>` and the sensitivity file `sens_<star>` with IRAF.
//!
//! `cargo run --release -- --help`

use anyhow::Context;
use clap::Parser;
use rss_sens::{
    config::{self, IrafConfig, Loader},
    iraf::IrafCl,
    onedspec::DryRun,
    pipeline, CalibrationConfig, Pipeline,
};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "SALT RSS sensitivity file creator")]
struct Cli {
    /// Directory that contains the standard star FITS file
    #[arg(short, long)]
    dir: Option<PathBuf>,
    /// File name (with extension) of the standard star FITS file
    #[arg(short, long)]
    star: Option<String>,
    /// YAML calibration configuration, default: `rss_sens.yaml` if present
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// IRAF `cl` executable
    #[arg(long)]
    cl: Option<PathBuf>,
    /// Removes the standard and sensitivity files of a previous run
    #[arg(long)]
    clobber: bool,
    /// Prints the IRAF commands without running them
    #[arg(long)]
    dry_run: bool,
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("\n{message}  ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read the console input")?;
    Ok(answer.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!(
        "\n--------------------------------------\nSALT RSS Sensitivity File Creator\n--------------------------------------"
    );

    let dir = match cli.dir {
        Some(dir) => dir,
        None => PathBuf::from(prompt(
            "Enter file path of the directory that contains the FITS file:",
        )?),
    };
    let launch = std::env::current_dir().context("failed to read the current directory")?;
    let config_file = cli.config.map(|path| config::rebase(path, &launch));
    let cl = cli.cl.map(|cl| IrafConfig::program_from(cl, &launch));
    pipeline::enter_directory(&dir)?;

    let star = match cli.star {
        Some(star) => star,
        None => prompt("Enter file name (with extension) of the standard star FITS file:")?,
    };

    let mut config: CalibrationConfig = match &config_file {
        Some(path) => Loader::<CalibrationConfig>::from(path.as_path())
            .load()
            .with_context(|| format!("failed to load {path:?}"))?,
        None => Loader::<CalibrationConfig>::default().load_or_default()?,
    };
    if let Some(cl) = cl {
        config.iraf.program = cl;
    }
    config.clobber |= cli.clobber;

    let builder = Pipeline::builder();
    let builder = if cli.dry_run {
        builder.toolkit(DryRun::new())
    } else {
        builder.toolkit(IrafCl::new(&config.iraf))
    };
    let mut pipeline = builder.config(config).build();

    let (standard, sensitivity) = pipeline
        .run(&star)
        .with_context(|| format!("sensitivity calibration of {star} failed"))?;
    let dir = pipeline.directory();
    println!(
        "\nStandard file: {:?}\nSensitivity file: {:?}",
        dir.join(standard),
        dir.join(sensitivity)
    );
    Ok(())
}
