//! HTML fragments for history entries.
//!
//! Every piece of text or attribute content passes through [`escape_html`];
//! the raw payload only survives inside the copy control's `data-text`
//! attribute, where the browser unescapes it on parse.

use chrono::Local;

use super::ledger::LedgerSnapshot;
use super::record::DetectionRecord;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Payloads starting with `http` render as links.
pub fn is_link(payload: &str) -> bool {
    payload.starts_with("http")
}

pub fn render_payload(payload: &str) -> String {
    let safe = escape_html(payload);
    if is_link(payload) {
        format!(r#"<a href="{safe}" target="_blank" rel="noopener noreferrer">{safe}</a>"#)
    } else {
        format!("<span>{safe}</span>")
    }
}

pub fn render_entry(record: &DetectionRecord) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        r#"<div class="card" data-id="{}">"#,
        escape_html(&record.id)
    ));
    html.push_str(r#"<button class="delete-icon" aria-label="Delete this entry">❌</button>"#);
    html.push_str(&format!(
        "<p><strong>No:</strong> {}</p>",
        record.sequence_number
    ));
    if let Some(thumbnail) = &record.thumbnail {
        html.push_str(&format!(
            r#"<img class="capture-image" src="{}" width="{}" height="{}" alt="QR code capture">"#,
            escape_html(&thumbnail.data_url),
            thumbnail.width,
            thumbnail.height
        ));
    }
    html.push_str(r#"<p class="qr-content"><strong>Content: </strong>"#);
    html.push_str(&render_payload(&record.payload));
    html.push_str(&format!(
        r#"<button class="copy-icon" aria-label="Copy QR code content" data-text="{}">📋</button></p>"#,
        escape_html(&record.payload)
    ));
    html.push_str(&format!(
        "<p><strong>Read at:</strong> {}</p>",
        record
            .captured_at
            .with_timezone(&Local)
            .format("%Y/%m/%d %H:%M:%S")
    ));
    html.push_str("</div>");
    html
}

pub fn render_ledger(snapshot: &LedgerSnapshot) -> String {
    snapshot.entries.iter().map(render_entry).collect()
}
