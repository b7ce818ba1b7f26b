//! Renderer module
//!
//! Renders license records for the diagnostic stream: indented and colorized (pretty) or
//! one compact JSON object per line (json).

use colored::Color;
use serde_json::Value;

use crate::core::model::LicenseRecord;

const INDENT: &str = "  ";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and color
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }
}

/// Token classes that get their own color in pretty output
#[derive(Debug, Clone, Copy)]
enum Paint {
    Key,
    Str,
    Number,
    Literal,
}

/// Renderer for license records
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordRenderer {
    config: RenderConfig,
}

impl RecordRenderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a single record to a string (no trailing newline)
    pub fn render(&self, record: &LicenseRecord) -> String {
        match self.config.format {
            OutputFormat::Pretty => {
                let mut output = String::new();
                self.write_value(&mut output, record, 0);
                output
            }
            OutputFormat::Json => serde_json::to_string(record).unwrap_or_default(),
        }
    }

    fn write_value(&self, output: &mut String, value: &Value, depth: usize) {
        match value {
            Value::Null => self.push_painted(output, "null", Paint::Literal),
            Value::Bool(b) => self.push_painted(output, &b.to_string(), Paint::Literal),
            Value::Number(n) => self.push_painted(output, &n.to_string(), Paint::Number),
            Value::String(s) => self.push_painted(output, &quote(s), Paint::Str),
            Value::Array(items) => {
                if items.is_empty() {
                    output.push_str("[]");
                    return;
                }
                output.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    push_indent(output, depth + 1);
                    self.write_value(output, item, depth + 1);
                    if i + 1 < items.len() {
                        output.push(',');
                    }
                    output.push('\n');
                }
                push_indent(output, depth);
                output.push(']');
            }
            Value::Object(map) => {
                if map.is_empty() {
                    output.push_str("{}");
                    return;
                }
                output.push_str("{\n");
                for (i, (key, item)) in map.iter().enumerate() {
                    push_indent(output, depth + 1);
                    self.push_painted(output, &quote(key), Paint::Key);
                    output.push_str(": ");
                    self.write_value(output, item, depth + 1);
                    if i + 1 < map.len() {
                        output.push(',');
                    }
                    output.push('\n');
                }
                push_indent(output, depth);
                output.push('}');
            }
        }
    }

    fn push_painted(&self, output: &mut String, text: &str, paint: Paint) {
        if !self.config.color {
            output.push_str(text);
            return;
        }

        // raw escapes: only RenderConfig decides, never colored's stdout/CLICOLOR check
        let color = match paint {
            Paint::Key => Color::BrightBlue,
            Paint::Str => Color::Green,
            Paint::Number => Color::Yellow,
            Paint::Literal => Color::Magenta,
        };
        output.push_str(&format!("\u{1b}[{}m{}\u{1b}[0m", color.to_fg_str(), text));
    }
}

fn push_indent(output: &mut String, depth: usize) {
    for _ in 0..depth {
        output.push_str(INDENT);
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}
