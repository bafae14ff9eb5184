// File: ./src/cli.rs
//! Command-line entry logic: load config and raw records, run the
//! pipeline, write both artifacts.

use crate::config::ScheduleConfig;
use crate::export::{feed, grid};
use crate::model::lesson::RawLesson;
use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn print_help(binary_name: &str) {
    println!(
        "{} v{} - timetable normaliser and exporter",
        binary_name,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!(
        "    {} <lessons.json> <subgroup> [--config <file.toml>] [--out <dir>]",
        binary_name
    );
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <file>   TOML file with bell tables, day names and term anchors.");
    println!("    -o, --out <dir>       Output directory (default: ./output).");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("Reads a JSON array of raw lesson records, keeps the given subgroup, and");
    println!("writes <subgroup>.xlsx and <subgroup>.ics into the output directory.");
}

#[derive(Debug)]
pub struct CliArgs {
    pub lessons: PathBuf,
    pub subgroup: String,
    pub config: Option<PathBuf>,
    pub out_dir: PathBuf,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut out_dir = PathBuf::from("output");

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                let value = args.get(i).context("--config requires a path")?;
                config = Some(PathBuf::from(value));
            }
            "-o" | "--out" => {
                i += 1;
                let value = args.get(i).context("--out requires a path")?;
                out_dir = PathBuf::from(value);
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    let lessons = positional.next().context("missing <lessons.json> argument")?;
    let subgroup = positional.next().context("missing <subgroup> argument")?;

    Ok(CliArgs {
        lessons: PathBuf::from(lessons),
        subgroup,
        config,
        out_dir,
    })
}

pub fn run(args: CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ScheduleConfig::load(path)?,
        None => ScheduleConfig::default(),
    };

    let contents = fs::read_to_string(&args.lessons)
        .with_context(|| format!("failed to read '{}'", args.lessons.display()))?;
    let raw: Vec<RawLesson> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse '{}'", args.lessons.display()))?;

    let output = Pipeline::new(&config).run(&raw, &args.subgroup);
    let problems = output
        .diagnostics
        .iter()
        .filter(|d| !d.is_expected())
        .count();
    if problems > 0 {
        log::warn!("{problems} records reported problems during normalisation");
    }

    grid::write_grid(&config, &output.lessons, &args.subgroup, &args.out_dir)?;
    feed::write_feed(&config, &output.lessons, &args.subgroup, &args.out_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_and_flags_mix() {
        let args = parse_args(&strings(&[
            "lessons.json",
            "--out",
            "artifacts",
            "202б",
            "-c",
            "bells.toml",
        ]))
        .unwrap();
        assert_eq!(args.lessons, PathBuf::from("lessons.json"));
        assert_eq!(args.subgroup, "202б");
        assert_eq!(args.config, Some(PathBuf::from("bells.toml")));
        assert_eq!(args.out_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn missing_subgroup_is_an_error() {
        assert!(parse_args(&strings(&["lessons.json"])).is_err());
    }
}
