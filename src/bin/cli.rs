//! Offline locator-generation CLI
//!
//! Reads a saved page-source XML dump and prints the locators the server
//! would generate for it, without needing a device or an Appium server.
//! Useful for debugging locator quality against captured screens.

use appium_use::locator::{
    generate_elements, ElementWithLocators, FilterConfig, Platform, UNKNOWN_VIEWPORT,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformArg {
    Android,
    Ios,
}

impl From<PlatformArg> for Platform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Android => Platform::Android,
            PlatformArg::Ios => Platform::Ios,
        }
    }
}

#[derive(Parser)]
#[command(name = "appium-use")]
#[command(version)]
#[command(about = "Generate element locators from a saved page-source XML dump", long_about = None)]
struct Cli {
    /// Page-source XML file
    file: PathBuf,

    /// Platform the dump was captured on
    #[arg(long, short = 'P', value_enum)]
    platform: PlatformArg,

    /// Viewport size as WIDTHxHEIGHT (e.g. 1080x1920); omitted = unbounded
    #[arg(long, short = 'v', value_name = "WxH")]
    viewport: Option<String>,

    /// Keep bare layout containers in the output
    #[arg(long)]
    include_containers: bool,

    /// Only include clickable elements
    #[arg(long)]
    clickable_only: bool,

    /// Print full records as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Maximum number of elements to print
    #[arg(long, short = 'n')]
    limit: Option<usize>,
}

fn parse_viewport(spec: &str) -> Result<(i64, i64), String> {
    let (w, h) = spec
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid viewport '{}', expected WIDTHxHEIGHT", spec))?;
    let width = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid viewport width '{}'", w))?;
    let height = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid viewport height '{}'", h))?;
    Ok((width, height))
}

fn print_table(elements: &[ElementWithLocators]) {
    println!(
        "{:<10} {:<36} {:<20} LOCATORS",
        "PATH", "TAG", "TEXT"
    );
    for element in elements {
        let tag = element
            .tag_name
            .rsplit('.')
            .next()
            .unwrap_or(&element.tag_name);
        let text = element.text.as_deref().unwrap_or("");
        let text = if text.chars().count() > 18 {
            format!("{}…", text.chars().take(17).collect::<String>())
        } else {
            text.to_string()
        };
        let locators: Vec<String> = element
            .locators
            .iter()
            .map(|(strategy, value)| format!("{}={}", strategy, value))
            .collect();
        println!(
            "{:<10} {:<36} {:<20} {}",
            element.path,
            tag,
            text,
            locators.join("  |  ")
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let platform: Platform = cli.platform.into();

    let xml = std::fs::read_to_string(&cli.file)
        .map_err(|e| format!("Failed to read {}: {}", cli.file.display(), e))?;

    let viewport = match &cli.viewport {
        Some(spec) => parse_viewport(spec)?,
        None => (UNKNOWN_VIEWPORT, UNKNOWN_VIEWPORT),
    };

    let mut config = if cli.include_containers {
        FilterConfig::default()
    } else {
        FilterConfig::without_containers(platform)
    };
    config.clickable_only = cli.clickable_only;

    let mut elements = generate_elements(&xml, platform, viewport, &config);
    let total = elements.len();
    if let Some(limit) = cli.limit {
        elements.truncate(limit);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&elements)?);
    } else {
        print_table(&elements);
        eprintln!(
            "\n{} element(s) shown of {} generated",
            elements.len(),
            total
        );
    }

    Ok(())
}
