//! Output Rendering
//!
//! Results go to stdout as text or JSON; the one-line failure summary goes
//! to stderr. Progress narration is not rendered here, it goes through
//! `tracing`.

use std::io::{self, Write};

use crate::application::{DeployReport, VersionListing};
use crate::domain::services::{DeletionReport, SkipReason};
use crate::domain::value_objects::VersionName;
use crate::error::CutoverError;

use super::exit;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    trash: &'static str,
    skip: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            trash: "-",
            skip: "○",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            trash: "[DEL]",
            skip: "[ ]",
        }
    }
}

pub struct Renderer {
    format: OutputFormat,
    icons: Icons,
}

impl Renderer {
    pub fn new(format: OutputFormat, unicode: bool) -> Self {
        Self {
            format,
            icons: if unicode {
                Icons::unicode()
            } else {
                Icons::ascii()
            },
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn json<W: Write>(&self, out: &mut W, value: &serde_json::Value) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        writeln!(out, "{}", text)
    }

    /// `list-versions`: one line per version, oldest first
    pub fn versions<W: Write>(&self, out: &mut W, listing: &[VersionListing]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let value = serde_json::to_value(listing).map_err(io::Error::other)?;
            return self.json(out, &value);
        }
        for entry in listing {
            if entry.tags.is_empty() {
                writeln!(out, "{}", entry.name)?;
            } else {
                let tags: Vec<String> = entry.tags.iter().map(|t| t.to_string()).collect();
                writeln!(out, "{}  [{}]", entry.name, tags.join(", "))?;
            }
        }
        Ok(())
    }

    pub fn deletion<W: Write>(&self, out: &mut W, report: &DeletionReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let value = serde_json::to_value(report).map_err(io::Error::other)?;
            return self.json(out, &value);
        }
        for name in &report.deleted {
            writeln!(out, "  {} {}", self.icons.trash, name)?;
        }
        for skipped in &report.skipped {
            let reason = match &skipped.reason {
                SkipReason::NotFound => "not found".to_string(),
                SkipReason::Protected => "protected".to_string(),
                SkipReason::Failed(e) => format!("failed: {e}"),
            };
            writeln!(out, "  {} {} ({})", self.icons.skip, skipped.name, reason)?;
        }
        writeln!(
            out,
            "{} deleted {}, skipped {}",
            self.icons.check,
            report.deleted.len(),
            report.skipped.len()
        )
    }

    /// Text summary of a deploy. In JSON mode stdout carries the NDJSON
    /// event stream, which already ends with the `complete` event.
    pub fn deployed<W: Write>(&self, out: &mut W, report: &DeployReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(
            out,
            "{} deployed {} (was {})",
            self.icons.check, report.version, report.beginning
        )
    }

    /// `create-version` prints the new name and nothing else in text mode
    pub fn created<W: Write>(&self, out: &mut W, name: &VersionName) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(out, &serde_json::json!({ "version": name }));
        }
        writeln!(out, "{}", name)
    }

    /// Success summary for commands without a result to show
    pub fn done<W: Write>(&self, out: &mut W, command: &str, detail: &str) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let value = serde_json::json!({
                "success": true,
                "command": command,
                "detail": detail,
            });
            return self.json(out, &value);
        }
        writeln!(out, "{} {}: {}", self.icons.check, command, detail)
    }

    /// Failure summary, written to stderr by the binaries
    pub fn failed<W: Write>(
        &self,
        out: &mut W,
        command: &str,
        error: &anyhow::Error,
        code: i32,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let value = serde_json::json!({
                "success": false,
                "command": command,
                "exit_code": code,
                "class": exit::describe(code),
                "error": summary(error),
            });
            return self.json(out, &value);
        }
        writeln!(
            out,
            "{} {} failed ({}, exit {}): {}",
            self.icons.cross,
            command,
            exit::describe(code),
            code,
            summary(error)
        )
    }
}

/// Context chain joined with ": ", cut after the first `CutoverError`.
/// Those already print their own source.
fn summary(error: &anyhow::Error) -> String {
    let mut parts = Vec::new();
    for cause in error.chain() {
        parts.push(cause.to_string());
        if cause.is::<CutoverError>() {
            break;
        }
    }
    parts.join(": ")
}
