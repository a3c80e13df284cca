//
// utils.rs
// Distributed under terms of the MIT license.
//

use crate::error::NofanError;
use chrono::{self, DateTime, FixedOffset, Utc};
use colored::Colorize;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

// Fanfou timestamps come in asctime form, e.g. "Wed Jun 06 20:07:10 +0000 2012".
pub fn from_asctime<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    DateTime::parse_from_str(&s, "%a %b %d %H:%M:%S %z %Y").map_err(serde::de::Error::custom)
}

const TIME_STEPS: [f64; 6] = [60.0, 60.0, 24.0, 7.0, 4.345, 12.0];
const TIME_UNITS: [&str; 7] = ["second", "minute", "hour", "day", "week", "month", "year"];

pub fn time_ago(then: DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let mut diff = now.signed_duration_since(then).num_seconds().max(0) as f64;

    let mut unit = 0;
    while unit < TIME_STEPS.len() && diff >= TIME_STEPS[unit] {
        diff /= TIME_STEPS[unit];
        unit += 1;
    }

    let n = diff as u64;
    if unit == 0 && n <= 9 {
        "just now".to_string()
    } else if n == 1 {
        format!("1 {} ago", TIME_UNITS[unit])
    } else {
        format!("{} {}s ago", n, TIME_UNITS[unit])
    }
}

pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// Large photo urls may carry a "@<size>.<ext>" crop suffix.
pub fn strip_photo_suffix(url: &str) -> Result<String, NofanError> {
    let re = Regex::new(r"@.+\..+$").map_err(|e| NofanError::ParseError(e.to_string()))?;
    Ok(re.replace(url, "").into_owned())
}

pub fn hyperlink(text: &str, url: &str) -> String {
    format!(
        "\u{1b}]8;;{}\u{1b}\\{}\u{1b}]8;;\u{1b}\\",
        url, text
    )
}

pub fn supports_hyperlinks() -> bool {
    if std::env::var_os("FORCE_HYPERLINK").is_some() {
        return true;
    }
    if let Ok(program) = std::env::var("TERM_PROGRAM") {
        if matches!(program.as_str(), "iTerm.app" | "WezTerm" | "vscode" | "Hyper") {
            return true;
        }
    }
    if let Ok(vte) = std::env::var("VTE_VERSION") {
        return vte.parse::<u32>().map(|v| v >= 5000).unwrap_or(false);
    }
    false
}

pub fn succeed(message: &str) {
    println!("{} {}", "✔".green(), message);
}

pub fn fail(message: &str) {
    eprintln!("{} {}", "✖".red(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

// Dumps the clipboard image to <base>/temp/temp.png via pngpaste.
pub fn clipboard_image(base: &Path) -> Result<PathBuf, NofanError> {
    if !cfg!(target_os = "macos") {
        return Err(NofanError::UnsupportedPlatform(
            "Upload from clipboard is only available on macOS".to_string(),
        ));
    }

    let dir = base.join("temp");
    fs::create_dir_all(&dir).map_err(|e| NofanError::IoError(e.to_string()))?;
    let filepath = dir.join("temp.png");

    let output = Command::new("pngpaste")
        .arg(&filepath)
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                NofanError::UnsupportedPlatform(
                    "Required `pngpaste`, install it with `brew install pngpaste`".to_string(),
                )
            } else {
                NofanError::IoError(e.to_string())
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(NofanError::IoError(if stderr.is_empty() {
            "No image data found on the clipboard".to_string()
        } else {
            stderr
        }));
    }

    Ok(filepath)
}
