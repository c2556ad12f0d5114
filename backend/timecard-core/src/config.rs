// src/config.rs
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

use crate::detail::WeekNumbering;
use crate::error::Result;

const ENV_PREFIX: &str = "TIMECARD_";

/// Command-line flags. Anything left unset falls back to the environment.
#[derive(Debug, Default, Parser)]
#[command(name = "timecard", version, about = "Builds payroll timecard reports from CSV exports")]
pub struct Cli {
    /// Directory holding the three input CSV files
    #[arg(long)]
    pub input_dir: Option<PathBuf>,
    /// Directory the reports are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Approved-hours (attendance detail) file name
    #[arg(long)]
    pub detail_file: Option<String>,
    /// Payroll directory file name
    #[arg(long)]
    pub directory_file: Option<String>,
    /// Summary-hours file name
    #[arg(long)]
    pub summary_file: Option<String>,
    /// How attendance dates map to week numbers
    #[arg(long, value_enum)]
    pub week_numbering: Option<WeekNumbering>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_detail_file")]
    pub detail_file: String,
    #[serde(default = "default_directory_file")]
    pub directory_file: String,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    #[serde(default)]
    pub week_numbering: WeekNumbering,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_detail_file() -> String {
    "approved_hours.csv".to_string()
}

fn default_directory_file() -> String {
    "payroll_info.csv".to_string()
}

fn default_summary_file() -> String {
    "summary_hours.csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            detail_file: default_detail_file(),
            directory_file: default_directory_file(),
            summary_file: default_summary_file(),
            week_numbering: WeekNumbering::default(),
        }
    }
}

impl Config {
    /// Reads `TIMECARD_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Config>()?)
    }

    /// Flags given on the command line take precedence.
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(dir) = cli.input_dir {
            self.input_dir = dir;
        }
        if let Some(dir) = cli.output_dir {
            self.output_dir = dir;
        }
        if let Some(file) = cli.detail_file {
            self.detail_file = file;
        }
        if let Some(file) = cli.directory_file {
            self.directory_file = file;
        }
        if let Some(file) = cli.summary_file {
            self.summary_file = file;
        }
        if let Some(numbering) = cli.week_numbering {
            self.week_numbering = numbering;
        }
        self
    }

    pub fn detail_path(&self) -> PathBuf {
        self.input_dir.join(&self.detail_file)
    }

    pub fn directory_path(&self) -> PathBuf {
        self.input_dir.join(&self.directory_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.input_dir.join(&self.summary_file)
    }
}
