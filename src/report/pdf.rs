//! PDF report writer.
//!
//! Pages are A4 portrait. The body is set in the built-in Courier face so the
//! terminal tables and the ASCII plot keep their column alignment without
//! embedding a font file. Built-in fonts only cover WinAnsi text, so anything
//! outside printable ASCII is replaced with `?`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::AppError;
use crate::plot::render_ascii_plot;
use crate::report::{AnalysisSummary, format_run_summary};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 8.5;
/// Baseline-to-baseline distance for body text (mm).
const LINE_HEIGHT: f32 = 3.8;
const PLOT_WIDTH: usize = 90;
const PLOT_HEIGHT: usize = 22;

/// Body lines of the PDF, in page order (the title is drawn separately).
pub fn render_pdf_lines(summary: &AnalysisSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Generated: {}", summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
    ];
    // The first summary line repeats the title.
    lines.extend(format_run_summary(summary).lines().skip(1).map(pdf_safe));

    lines.push(String::new());
    lines.push("Particle size distribution (o observed, - Gaudin-Schuhmann, ~ Rosin-Rammler)".to_string());
    let plot = render_ascii_plot(&summary.distribution, &summary.fits, PLOT_WIDTH, PLOT_HEIGHT);
    lines.extend(plot.lines().map(pdf_safe));

    if let Some(chart) = &summary.chart {
        lines.push(String::new());
        lines.push(pdf_safe(&format!("SVG chart: {chart}")));
    }
    lines
}

/// Write the summary as a PDF document to `path`.
pub fn write_pdf_report(path: &Path, summary: &AnalysisSummary) -> Result<(), AppError> {
    draw_pdf(path, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write PDF report '{}': {e}", path.display())))
}

fn draw_pdf(path: &Path, summary: &AnalysisSummary) -> Result<(), Box<dyn std::error::Error>> {
    let (doc, page, layer) = PdfDocument::new(
        pdf_safe(&summary.title),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let title_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let body_font = doc.add_builtin_font(BuiltinFont::Courier)?;

    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;
    current.use_text(pdf_safe(&summary.title), TITLE_SIZE, Mm(MARGIN), Mm(y), &title_font);
    y -= 2.5 * LINE_HEIGHT;

    for line in render_pdf_lines(summary) {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(page).get_layer(layer);
            y = PAGE_HEIGHT - MARGIN;
        }
        if !line.trim().is_empty() {
            current.use_text(line, BODY_SIZE, Mm(MARGIN), Mm(y), &body_font);
        }
        y -= LINE_HEIGHT;
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))?;
    Ok(())
}

fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::summary;

    #[test]
    fn lines_carry_key_figures_and_plot() {
        let lines = render_pdf_lines(&summary());

        assert_eq!(lines[0], "Generated: 2024-03-01 08:30:00 UTC");
        assert!(!lines.iter().any(|l| l.contains("=== Mill 2 survey ===")));
        assert!(lines.iter().any(|l| l.contains("Bond Work Index: 90.17 kWh/t")));
        assert!(lines.iter().any(|l| l.contains("Mill power: 832.5 kW")));
        assert!(lines.iter().any(|l| l.starts_with("Plot: size=")));
        assert_eq!(lines.last().map(String::as_str), Some("SVG chart: survey.svg"));
    }

    #[test]
    fn non_ascii_text_is_replaced() {
        assert_eq!(pdf_safe("63 µm\tP80"), "63 ?m?P80");
    }

    #[test]
    fn report_is_written_as_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo_report.pdf");
        write_pdf_report(&path, &summary()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_pdf_report(dir.path(), &summary()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
