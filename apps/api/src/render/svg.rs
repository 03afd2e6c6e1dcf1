//! Static markup serializer: `PanelLayout` → standalone SVG document.
//!
//! The output references nothing external; a rasterizer only needs the bundled font to
//! draw it. Line text is XML-escaped. Every other field is engine-generated.

use std::fmt::Write;

use crate::layout::panel::{format_number as num, PanelLayout};

/// Serializes the whole panel, text included.
pub fn render_panel_to_string(layout: &PanelLayout) -> String {
    write_panel(layout, true)
}

/// Serializes the panel without its text block, for views that draw their own text.
pub fn render_panel_without_text(layout: &PanelLayout) -> String {
    write_panel(layout, false)
}

fn write_panel(layout: &PanelLayout, include_text: bool) -> String {
    // `write!` into a `String` cannot fail.
    let mut out = String::with_capacity(4096);

    let _ = write!(
        out,
        r#"<svg width="{}" height="{}" viewBox="{}" xmlns="http://www.w3.org/2000/svg">"#,
        num(layout.width),
        num(layout.height),
        layout.view_box
    );
    let _ = write!(out, "<defs><style>{}</style></defs>", layout.style_tag);

    out.push_str("<g>");
    write_path(&mut out, &layout.blue_rect.d, &layout.blue_rect.fill, None);
    let _ = write!(out, r#"<g transform="{}">"#, layout.logo.transform);
    for path in &layout.logo.paths {
        write_path(&mut out, &path.d, &path.fill, None);
    }
    out.push_str("</g>");
    write_path(
        &mut out,
        &layout.region_text.d,
        &layout.region_text.fill,
        Some(&layout.region_text.transform),
    );
    out.push_str("</g>");

    out.push_str("<g>");
    write_path(&mut out, &layout.white_rect.d, &layout.white_rect.fill, None);
    if include_text {
        let text = &layout.custom_text;
        let _ = write!(
            out,
            r#"<text class="panel-text" fill="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}">"#,
            text.fill,
            num(text.font_size)
        );
        for line in &text.lines {
            let _ = write!(
                out,
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                num(line.x),
                num(line.y),
                escape_xml(&line.text)
            );
        }
        out.push_str("</text>");
    }
    out.push_str("</g>");

    let b = &layout.border;
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        num(b.x),
        num(b.y),
        num(b.width),
        num(b.height),
        num(b.rx),
        num(b.ry),
        b.stroke,
        num(b.stroke_width)
    );

    out.push_str("</svg>");
    out
}

fn write_path(out: &mut String, d: &str, fill: &str, transform: Option<&str>) {
    let _ = match transform {
        Some(t) => write!(out, r#"<path d="{d}" fill="{fill}" transform="{t}"/>"#),
        None => write!(out, r#"<path d="{d}" fill="{fill}"/>"#),
    };
}

/// Escapes the five XML-reserved characters.
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
