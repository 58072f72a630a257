//! CLI Output Formatting.
//!
//! Renders health reports as coloured text or JSON.

use console::style;

use crate::error::{Error, Result};
use crate::health::{HealthCategory, HealthMetric, HealthReport};

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Compact JSON
    Json,
    /// Pretty JSON
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Output formatter for CLI
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl OutputFormatter {
    /// Create new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    /// Disable color
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Get format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a health report
    pub fn report(&self, report: &HealthReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string(report)
                .map_err(|e| Error::Serialization(e.to_string())),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(report)
                .map_err(|e| Error::Serialization(e.to_string())),
            OutputFormat::Text => Ok(self.report_text(report)),
        }
    }

    fn report_text(&self, report: &HealthReport) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Financial health: {}/100 ({})\n\n",
            self.paint_score(report.score),
            self.paint_category(report.category)
        ));

        for metric in HealthMetric::all() {
            if let Some(m) = report.metric(*metric) {
                out.push_str(&format!(
                    "  {:<20} {:>2}/{:<2}  ratio {:>8.4}  {}\n",
                    metric.key(),
                    m.score,
                    m.max_score,
                    m.value,
                    metric.description()
                ));
            }
        }

        let weak = report.weak_metrics();
        if !weak.is_empty() {
            let keys: Vec<&str> = weak.iter().map(|m| m.key()).collect();
            out.push_str(&format!("\nNeeds attention: {}\n", keys.join(", ")));
        }

        out.push_str("\nRecommendations:\n");
        for rec in &report.recommendations {
            out.push_str(&format!("  {} {}\n", self.bullet(), rec));
        }

        out
    }

    /// Render the category table
    pub fn categories(&self) -> Result<String> {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let data: Vec<serde_json::Value> = HealthCategory::all()
                    .iter()
                    .rev()
                    .map(|c| {
                        serde_json::json!({
                            "category": c.as_str(),
                            "minScore": c.min_score(),
                            "recommendations": c.recommendations(),
                        })
                    })
                    .collect();
                let rendered = if self.format == OutputFormat::Json {
                    serde_json::to_string(&data)
                } else {
                    serde_json::to_string_pretty(&data)
                };
                rendered.map_err(|e| Error::Serialization(e.to_string()))
            }
            OutputFormat::Text => {
                let mut out = String::new();
                for category in HealthCategory::all().iter().rev() {
                    out.push_str(&format!(
                        "{} (score >= {})\n",
                        self.paint_category(*category),
                        category.min_score()
                    ));
                    for rec in category.recommendations() {
                        out.push_str(&format!("  {} {}\n", self.bullet(), rec));
                    }
                }
                Ok(out)
            }
        }
    }

    fn paint_score(&self, score: u8) -> String {
        if !self.color {
            return score.to_string();
        }
        style(score).bold().to_string()
    }

    fn paint_category(&self, category: HealthCategory) -> String {
        if !self.color {
            return category.to_string();
        }
        let styled = style(category.as_str()).bold();
        match category {
            HealthCategory::Excellent => styled.green(),
            HealthCategory::Good => styled.cyan(),
            HealthCategory::Fair => styled.yellow(),
            HealthCategory::Poor => styled.red(),
        }
        .to_string()
    }

    fn bullet(&self) -> String {
        if self.color {
            style("→").cyan().to_string()
        } else {
            "-".to_string()
        }
    }
}
