use anyhow::Context;
use clap::Parser;
use snowflake_poster::poster::{generate, PosterParameters};
use snowflake_poster::raster::{save, RasterOptions};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(about = "Render the snowflake poster to an image file")]
struct Args {
    /// Output file path
    #[arg(short, long, default_value = "poster_snowflake.png")]
    output: PathBuf,

    /// Canvas side length in pixels
    #[arg(long, default_value_t = RasterOptions::default().size)]
    size: u32,

    /// Skip opening the image viewer after saving
    #[arg(long)]
    no_preview: bool,
}

/// Hand the saved file to the platform's default viewer
fn open_preview(path: &Path) -> std::io::Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path).spawn().map(|_| ())
}

/// The batch poster is always the same one
fn batch_parameters() -> PosterParameters {
    PosterParameters {
        seed: Some(42),
        n_arms: 6,
        n_layers: 4,
        ..PosterParameters::default()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = batch_parameters();

    println!("Generating snowflake poster...");
    let poster = generate(&params);

    println!("Saving image...");
    save(&poster, &args.output, &RasterOptions { size: args.size })
        .with_context(|| format!("failed to save {}", args.output.display()))?;
    println!("Image saved as {}", args.output.display());

    if !args.no_preview {
        if let Err(e) = open_preview(&args.output) {
            log::warn!("could not open preview for {}: {e}", args.output.display());
        }
    }
    Ok(())
}
