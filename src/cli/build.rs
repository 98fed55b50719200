//! Build command implementation.
//!
//! Transforms stylesheets and writes them, along with their composites,
//! into an output directory.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::SpriteOptions;
use crate::discovery::{discover, load_options};
use crate::error::{Result, SpriteError};
use crate::output::{display_path, plural, Printer};
use crate::transform::SpriteTransform;

/// Transform stylesheets and emit sprite composites
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Stylesheets or directories to process
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output directory
    #[arg(long, short, default_value = "dist")]
    pub output: PathBuf,

    /// Options file (default: ./csssprite.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory prefix for composites inside the output directory
    #[arg(long)]
    pub output_path: Option<String>,

    /// URL prefix for composites in rewritten CSS
    #[arg(long)]
    pub css_image_path: Option<String>,

    /// Log every stylesheet that produced sprite groups
    #[arg(long)]
    pub debug: bool,
}

impl BuildArgs {
    /// Options from the options file with command-line overrides applied.
    fn options(&self) -> Result<SpriteOptions> {
        let mut options = load_options(self.config.as_deref(), Path::new("."))?;
        if let Some(output_path) = &self.output_path {
            options.output_path = output_path.clone();
        }
        if let Some(css_image_path) = &self.css_image_path {
            options.css_image_path = Some(css_image_path.clone());
        }
        options.debug |= self.debug;
        Ok(options)
    }
}

/// Totals for a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub stylesheets: usize,
    pub processed: usize,
    pub sprites: usize,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(build(&args, printer))?;
    Ok(())
}

/// Run a build on the current runtime.
///
/// Every stylesheet is transformed before anything is written, so a failing
/// stylesheet leaves the output directory untouched.
pub async fn build(args: &BuildArgs, printer: &Printer) -> Result<BuildSummary> {
    let options = args.options()?;
    let files = discover(&args.paths)?;

    if files.is_empty() {
        printer.warning("Warning", "no stylesheets found");
        return Ok(BuildSummary::default());
    }

    let mut prepared = Vec::with_capacity(files.len());
    for file in &files {
        printer.status("Processing", &display_path(&file.path));

        let transform =
            SpriteTransform::with_output(&args.output, options_for(&options, &file.relative));
        match transform.prepare_file(&file.path).await {
            Ok(output) => prepared.push((file, transform, output)),
            Err(e) => {
                printer.error("Failed", &display_path(&file.path));
                return Err(e);
            }
        }
    }

    tokio::fs::create_dir_all(&args.output)
        .await
        .map_err(|e| SpriteError::Io {
            path: args.output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;

    let mut summary = BuildSummary::default();

    for (file, transform, prepared) in prepared {
        let output = transform.commit(prepared).await?;

        let destination = args.output.join(&file.relative);
        write_stylesheet(&destination, &output.css).await?;

        for sprite in &output.sprites {
            printer.info(
                "Sprite",
                &format!(
                    "{} {}",
                    printer.cyan(&sprite.url),
                    printer.dim(&format!(
                        "({}, {}, {}x{}, {})",
                        sprite.ratio,
                        sprite.repeat,
                        sprite.width,
                        sprite.height,
                        plural(sprite.members, "image", "images")
                    ))
                ),
            );
        }

        summary.stylesheets += 1;
        summary.sprites += output.sprites.len();
        if output.processed {
            summary.processed += 1;
        }
    }

    printer.status(
        "Finished",
        &format!(
            "{} ({} enabled), {} to {}",
            plural(summary.stylesheets, "stylesheet", "stylesheets"),
            summary.processed,
            plural(summary.sprites, "sprite", "sprites"),
            display_path(&args.output)
        ),
    );

    Ok(summary)
}

/// Options for a stylesheet written at `relative` below the output
/// directory. Without an explicit `css_image_path`, composite urls are made
/// relative to where the stylesheet is written.
fn options_for(options: &SpriteOptions, relative: &Path) -> SpriteOptions {
    let mut options = options.clone();
    if options.css_image_path.is_none() {
        let depth = relative.parent().map_or(0, |dir| dir.components().count());
        options.css_image_path = Some(format!("{}{}", "../".repeat(depth), options.output_path));
    }
    options
}

async fn write_stylesheet(path: &Path, css: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SpriteError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create directory: {}", e),
            })?;
    }
    tokio::fs::write(path, css).await.map_err(|e| SpriteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write stylesheet: {}", e),
    })
}
