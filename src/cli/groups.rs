//! Groups command implementation.
//!
//! Reports the sprite groups each stylesheet would form, without packing.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::discovery::discover;
use crate::error::{Result, SpriteError};
use crate::output::{display_path, plural, Printer};
use crate::sprite::{group_images, PixelRatio, RepeatMode};
use crate::stylesheet::parse_stylesheet;
use crate::transform::is_enabled;

/// Show the sprite groups stylesheets would form
#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Stylesheets or directories to inspect
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print a JSON report on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StylesheetReport {
    pub path: String,
    pub enabled: bool,
    pub groups: Vec<GroupReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub ratio: PixelRatio,
    pub repeat: RepeatMode,
    pub members: Vec<MemberReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberReport {
    pub url: String,
    pub selectors: Vec<String>,
}

pub fn run(args: GroupsArgs, printer: &Printer) -> Result<()> {
    let reports = discover(&args.paths)?
        .iter()
        .map(|file| report(&file.path))
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports, printer);
    }

    Ok(())
}

/// Group a stylesheet without touching any image.
///
/// Stylesheets that did not opt in report no groups.
pub fn report(path: &Path) -> Result<StylesheetReport> {
    let css = std::fs::read_to_string(path).map_err(|e| SpriteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read stylesheet: {}", e),
    })?;
    let sheet = parse_stylesheet(&css)?;
    let enabled = is_enabled(&sheet);

    let groups = if enabled {
        group_images(&sheet)
            .into_iter()
            .map(|group| GroupReport {
                ratio: group.ratio,
                repeat: group.repeat,
                members: group
                    .members
                    .iter()
                    .map(|member| MemberReport {
                        url: member.url.clone(),
                        selectors: sheet
                            .rule(member.rule)
                            .map(|rule| rule.selectors.clone())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(StylesheetReport {
        path: display_path(path),
        enabled,
        groups,
    })
}

fn print_reports(reports: &[StylesheetReport], printer: &Printer) {
    for report in reports {
        if !report.enabled {
            printer.info("Skipped", &format!("{} {}", report.path, printer.dim("(not enabled)")));
            continue;
        }

        printer.status(
            "Stylesheet",
            &format!(
                "{} {}",
                report.path,
                printer.dim(&format!("({})", plural(report.groups.len(), "group", "groups")))
            ),
        );

        for group in &report.groups {
            printer.info(
                &format!("{} {}", group.ratio, group.repeat),
                &plural(group.members.len(), "image", "images"),
            );
            for member in &group.members {
                eprintln!(
                    "{:>14}{} {} {}",
                    "",
                    member.url,
                    printer.dim("<-"),
                    member.selectors.join(", ")
                );
            }
        }
    }
}
