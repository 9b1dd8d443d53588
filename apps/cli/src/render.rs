use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tokio::fs;
use vid2doc_core::{Report, format::format_time_range};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
.section { margin-bottom: 30px; border-bottom: 1px solid #ddd; padding-bottom: 20px; }
.frames { display: block; }
.frames img { max-width: 100%; margin-bottom: 10px; }";

/// Renders a [`Report`] as one self-contained HTML page.
///
/// Frames are referenced by absolute path, one image per row.
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn render(&self, report: &Report) -> Result<String> {
        let mut html = String::new();
        let title = encode_text(&report.title);
        let href = encode_double_quoted_attribute(&report.source_url);
        let url = encode_text(&report.source_url);

        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"UTF-8\">")?;
        writeln!(html, "<title>{title}</title>")?;
        writeln!(html, "<style>\n{STYLE}\n</style>")?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<h1>{title}</h1>")?;
        writeln!(html, "<p><a href=\"{href}\">{url}</a></p>")?;

        for (i, section) in report.sections.iter().enumerate() {
            writeln!(html, "<div class=\"section\">")?;
            writeln!(
                html,
                "<h2>Section {} <small>{}</small></h2>",
                i + 1,
                format_time_range(section.start_time, section.end_time)
            )?;
            writeln!(html, "<p>{}</p>", encode_text(section.text.trim()))?;
            writeln!(html, "<div class=\"frames\">")?;
            for frame in &section.frame_refs {
                let src = std::path::absolute(&frame.path)
                    .with_context(|| format!("resolving frame path {}", frame.path))?;
                writeln!(
                    html,
                    "<img src=\"{}\" alt=\"Frame at {:.2}s\">",
                    encode_double_quoted_attribute(&src.to_string_lossy()),
                    frame.timestamp
                )?;
            }
            writeln!(html, "</div>")?;
            writeln!(html, "</div>")?;
        }

        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;
        Ok(html)
    }

    /// Render `report` into `path`, creating parent directories as needed.
    pub async fn write(&self, report: &Report, path: &Path) -> Result<PathBuf> {
        let html = self.render(report)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, html)
            .await
            .with_context(|| format!("writing report to {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}
