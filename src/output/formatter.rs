//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeRankerError};
use crate::output::report::{RankingReport, ReportRow};
use crate::processing::results::ScoreBand;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

const NAME_WIDTH: usize = 32;
const SCORE_WIDTH: usize = 11;
const DETAIL_WIDTH: usize = 60;

/// Renders a ranking report in one output format
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
}

/// Plain-text table; rows colored by score band
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Dispatches to the formatter for a given `OutputFormat`
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Ranking Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            color: #1f2937;
            background: #f0f2f5;
            max-width: 1100px;
            margin: 0 auto;
            padding: 20px;
        }
        h1 { color: #4f46e5; }
        table { width: 100%; border-collapse: collapse; background: white; }
        th, td { padding: 8px 12px; border-bottom: 1px solid #e5e7eb; text-align: left; }
        th { color: #6b7280; }
        .strong { color: #10b981; }
        .moderate { color: #f59e0b; }
        .weak, .error { color: #ef4444; }
        .metadata { color: #6b7280; font-size: 0.9em; margin-top: 20px; }
    </style>
    {% endif %}
</head>
<body>
    <h1>Resume Ranking Report</h1>
    <p><strong>Job description:</strong> {{ reference_preview }}</p>
    <table>
        <thead>
            <tr><th>#</th><th>Resume File</th><th>Match Score</th><th>Missing Keywords</th></tr>
        </thead>
        <tbody>
            {% for row in rows %}
            <tr class="{{ row.css_class }}">
                <td>{{ row.rank }}</td>
                <td>{{ row.name }}</td>
                <td>{{ row.score }}</td>
                <td>{{ row.detail }}</td>
            </tr>
            {% endfor %}
        </tbody>
    </table>
    <div class="metadata">
        Generated {{ generated_at }} | {{ scored_count }} scored, {{ failed_count }} failed |
        Model: {{ embedding_model }} | {{ processing_time }}ms
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    reference_preview: String,
    rows: Vec<HtmlRow>,
    generated_at: String,
    scored_count: usize,
    failed_count: usize,
    embedding_model: String,
    processing_time: u64,
}

#[derive(Debug, Clone)]
struct HtmlRow {
    css_class: String,
    rank: String,
    name: String,
    score: String,
    detail: String,
}

fn band_color(band: Option<ScoreBand>) -> Color {
    match band {
        Some(ScoreBand::Strong) => Color::Green,
        Some(ScoreBand::Moderate) => Color::Yellow,
        Some(ScoreBand::Weak) | None => Color::Red,
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}%", score),
        None => "Error".to_string(),
    }
}

fn format_rank(rank: Option<usize>) -> String {
    rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Cut to at most `width` graphemes, marking the cut with an ellipsis
fn truncate_graphemes(text: &str, width: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= width {
        text.to_string()
    } else {
        let mut cut: String = graphemes[..width.saturating_sub(1)].concat();
        cut.push('…');
        cut
    }
}

/// Left-align to `width` graphemes
fn pad(text: &str, width: usize) -> String {
    let len = text.graphemes(true).count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_row(&self, row: &ReportRow) -> String {
        let name = if self.detailed {
            row.name.clone()
        } else {
            truncate_graphemes(&row.name, NAME_WIDTH)
        };
        let detail = if self.detailed {
            row.detail.clone()
        } else {
            truncate_graphemes(&row.detail, DETAIL_WIDTH)
        };

        let color = band_color(row.band);
        format!(
            "{:>3}  {}  {}  {}\n",
            format_rank(row.rank),
            pad(&name, NAME_WIDTH),
            self.colorize(&pad(&format_score(row.score), SCORE_WIDTH), color),
            if row.score.is_some() { detail } else { self.colorize(&detail, color) }
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        let title = "Resume Ranking Results";

        if self.use_colors {
            output.push_str(&format!("\n{}\n", title.color(Color::Blue).bold()));
        } else {
            output.push_str(&format!("\n{}\n", title));
        }

        output.push_str(&format!(
            "{:>3}  {}  {}  {}\n",
            "#",
            pad("Resume File", NAME_WIDTH),
            pad("Match Score", SCORE_WIDTH),
            "Missing Keywords"
        ));
        output.push_str(&format!("{}\n", "-".repeat(3 + 2 + NAME_WIDTH + 2 + SCORE_WIDTH + 2 + 16)));

        for row in report.rows() {
            output.push_str(&self.format_row(&row));
        }

        let meta = &report.metadata;
        output.push_str(&format!(
            "\nProcessed {} resumes: {} scored, {} failed in {}ms\n",
            meta.candidate_count, meta.scored_count, meta.failed_count, meta.processing_time_ms
        ));

        if self.detailed {
            output.push_str(&format!("Embedding model: {}\n", meta.embedding_model));
            output.push_str(&format!("Job description: {}\n", meta.reference_preview));
            output.push_str(&format!(
                "Bands: strong >= {}%, moderate >= {}%, weak below\n",
                ScoreBand::STRONG_THRESHOLD,
                ScoreBand::MODERATE_THRESHOLD
            ));
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::from("# Resume Ranking Report\n\n");
        output.push_str(&format!(
            "**Job description:** {}\n\n",
            Self::escape_cell(&report.metadata.reference_preview)
        ));

        output.push_str("| # | Resume File | Match Score | Band | Missing Keywords |\n");
        output.push_str("|---|---|---|---|---|\n");

        for row in report.rows() {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                format_rank(row.rank),
                Self::escape_cell(&row.name),
                format_score(row.score),
                row.band.map(|b| b.label()).unwrap_or("error"),
                Self::escape_cell(&row.detail)
            ));
        }

        if self.include_metadata {
            let meta = &report.metadata;
            output.push_str(&format!(
                "\n---\n\n*Generated {} by resume-ranker v{} | Model: {} | {} scored, {} failed | {}ms*\n",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                meta.ranker_version,
                meta.embedding_model,
                meta.scored_count,
                meta.failed_count,
                meta.processing_time_ms
            ));
        }

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &RankingReport) -> HtmlTemplate {
        let rows = report
            .rows()
            .into_iter()
            .map(|row| HtmlRow {
                css_class: row.band.map(|b| b.label()).unwrap_or("error").to_string(),
                rank: format_rank(row.rank),
                name: row.name,
                score: format_score(row.score),
                detail: row.detail,
            })
            .collect();

        let meta = &report.metadata;
        HtmlTemplate {
            include_styles: self.include_styles,
            reference_preview: meta.reference_preview.clone(),
            rows,
            generated_at: meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            scored_count: meta.scored_count,
            failed_count: meta.failed_count,
            embedding_model: meta.embedding_model.clone(),
            processing_time: meta.processing_time_ms,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeRankerError::OutputFormatting(e.to_string()))
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("resume_ranking{}.{}", timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeRankerError;
    use crate::processing::keyword_gaps::KeywordGaps;
    use crate::processing::results::{CandidateId, MatchResult, ResultSet};

    fn report() -> RankingReport {
        let results = ResultSet::rank(vec![
            MatchResult::Scored {
                id: CandidateId::from("resumes/jane|doe.pdf"),
                similarity: 0.62,
                score: 62.0,
                missing_keywords: KeywordGaps::Missing(vec!["<script>".to_string(), "kubernetes".to_string()]),
            },
            MatchResult::failed(
                CandidateId::from("resumes/scan.pdf"),
                &ResumeRankerError::Extraction("no extractable text".to_string()),
            ),
        ]);
        RankingReport::new(&results, "Senior Go developer", "test-model", 12)
    }

    #[test]
    fn test_console_plain() {
        let output = ConsoleFormatter::new(false, false).format_report(&report()).unwrap();
        assert!(output.contains("Resume Ranking Results"));
        assert!(output.contains("62.0%"));
        assert!(output.contains("Error"));
        assert!(output.contains("no extractable text"));
        assert!(output.contains("1 scored, 1 failed"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_uses_reference_records() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["results"][0]["status"], "scored");
        assert_eq!(value["results"][0]["missingKeywords"][1], "kubernetes");
        assert_eq!(value["results"][1]["status"], "error");
        assert_eq!(value["metadata"]["candidateCount"], 2);
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let output = MarkdownFormatter::new(false).format_report(&report()).unwrap();
        assert!(output.contains("jane\\|doe.pdf"));
        assert!(output.contains("| moderate |"));
        assert!(output.contains("| error |"));
    }

    #[test]
    fn test_html_escapes_content() {
        let output = HtmlFormatter::new(false).format_report(&report()).unwrap();
        assert!(output.contains("<table>"));
        assert!(output.contains("class=\"moderate\""));
        assert!(!output.contains("<script>"));
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("short", 10), "short");
        assert_eq!(truncate_graphemes("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_graphemes("ééééé", 5), "ééééé");
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Json, false), "resume_ranking.json");
        assert!(suggest_filename(&OutputFormat::Html, true).ends_with(".html"));
    }
}
