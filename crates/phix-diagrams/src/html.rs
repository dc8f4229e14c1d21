//! Embed markup for rendered diagrams.

use std::fmt::Write;

use phix_renderer::directive::Placement;
use phix_renderer::escape_html;

use crate::backend::Backend;
use crate::options::EmbedOptions;

/// Markup embedding the SVG at `reference_path`.
///
/// Block placement yields a paragraph carrying the backend class, with an
/// optional right-aligned "Open in new window" link. Inline placement yields
/// a `<span>` that can sit in a line of text.
#[must_use]
pub fn embed_html(
    backend: Backend,
    reference_path: &str,
    embed: &EmbedOptions,
    placement: Placement,
) -> String {
    let reference = escape_html(reference_path);

    let mut classes = vec![backend.directive_name().to_owned()];
    classes.extend(embed.classes.iter().cloned());
    if let Some(align) = embed.align {
        classes.push(format!("align-{}", align.as_str()));
    }
    let classes = escape_html(&classes.join(" "));

    let object = format!(
        r#"<object data="{reference}" width="{}" height="{}" border="{}" type="image/svg+xml" class="img">"#,
        escape_html(&embed.width),
        escape_html(&embed.height),
        embed.border,
    );
    let alt = embed.alt.as_deref().map(escape_html).unwrap_or_default();
    let link = format!(r#"<a href="{reference}" target="_blank">Open in new window</a>"#);

    let mut html = String::with_capacity(256);
    match placement {
        Placement::Block => {
            let _ = write!(html, "<p class=\"{classes}\">{object}\n{alt}</object>");
            if embed.new_window {
                let _ = write!(html, "<p align=\"right\">\n{link}</p>\n");
            }
            html.push_str("</p>\n");
        }
        Placement::Inline => {
            let _ = write!(html, "<span class=\"{classes}\">{object}{alt}</object>");
            if embed.new_window {
                html.push(' ');
                html.push_str(&link);
            }
            html.push_str("</span>");
        }
    }
    html
}
