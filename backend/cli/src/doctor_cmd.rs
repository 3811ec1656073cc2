//! `doctor`: audio support and config health in one report.

use std::path::Path;

use anyhow::{Context, Result};
use readaloud_config::{collect_referenced_vars, load_config, validate, ReadAloudConfig};

use crate::app::App;
use crate::terminal_output::{note_error, note_success, status_line};

/// Run every check; returns whether all passed.
pub async fn run(app: &App, config_path: &Path) -> Result<bool> {
    println!("\nreadaloud doctor\n");

    let audio_ok = check_audio(app);
    let config_ok = check_config(&app.config, config_path);
    let env_ok = check_env(config_path).await?;

    println!();
    let ok = audio_ok && config_ok && env_ok;
    if ok {
        note_success("All checks passed");
    } else {
        note_error("Some checks failed; see above");
    }
    Ok(ok)
}

fn check_audio(app: &App) -> bool {
    println!("Audio:");
    let support = match app.page() {
        Ok(page) => page.audio_support(),
        Err(e) => {
            println!("{}", status_line(false, "reader", &format!("{e:#}")));
            return false;
        }
    };
    println!("{}", status_line(true, "host", &support.host));
    println!("{}", status_line(support.encoding, "transport encoding", ""));
    println!("{}", status_line(support.playback, "WAV decode and fresh context", ""));
    support.is_supported()
}

fn check_config(config: &ReadAloudConfig, path: &Path) -> bool {
    println!("Config ({}):", path.display());
    let report = validate(config);
    for error in &report.errors {
        println!("{}", status_line(false, &error.path, &error.message));
    }
    for warning in &report.warnings {
        println!("{}", status_line(true, &warning.path, &warning.message));
    }
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("{}", status_line(true, "no issues", ""));
    }
    report.is_valid()
}

async fn check_env(path: &Path) -> Result<bool> {
    println!("Environment:");
    // The raw file still holds the `${VAR}` references.
    let raw = load_config(path).await?;
    let vars = referenced_env(&raw, |name| std::env::var_os(name).is_some())?;
    if vars.is_empty() {
        println!("{}", status_line(true, "no variables referenced", ""));
    }
    for (name, set) in &vars {
        println!("{}", status_line(*set, name, if *set { "set" } else { "not set" }));
    }
    Ok(vars.iter().all(|(_, set)| *set))
}

/// Every `${VAR}` the config refers to, paired with whether it is set.
fn referenced_env(
    raw: &ReadAloudConfig,
    is_set: impl Fn(&str) -> bool,
) -> Result<Vec<(String, bool)>> {
    let value = serde_json::to_value(raw).context("Failed to serialize config")?;
    Ok(collect_referenced_vars(&value)
        .into_iter()
        .map(|name| {
            let set = is_set(&name);
            (name, set)
        })
        .collect())
}
