use std::fmt::Write;

use super::builder::Viewport;
use super::render::{DrawCommand, FONT_FAMILY, FontWeight, TextAlign};

pub fn to_svg(commands: &[DrawCommand], viewport: Viewport) -> String {
    let mut out = String::with_capacity(256 + commands.len() * 96);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}">"#,
        w = num(viewport.width),
        h = num(viewport.height),
    );

    for command in commands {
        match command {
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
                dash,
            } => {
                let _ = write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="{}""#,
                    num(*x1),
                    num(*y1),
                    num(*x2),
                    num(*y2),
                    num(*width),
                );
                if let Some([on, off]) = dash {
                    let _ = write!(out, r#" stroke-dasharray="{} {}""#, num(*on), num(*off));
                }
                out.push_str("/>");
            }
            DrawCommand::Polyline {
                points,
                color,
                width,
            } => {
                let coords = points
                    .iter()
                    .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(
                    out,
                    r#"<polyline points="{coords}" fill="none" stroke="{color}" stroke-width="{}" stroke-linejoin="round"/>"#,
                    num(*width),
                );
            }
            DrawCommand::Circle { cx, cy, r, color } => {
                let _ = write!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{color}"/>"#,
                    num(*cx),
                    num(*cy),
                    num(*r),
                );
            }
            DrawCommand::Text {
                x,
                y,
                text,
                color,
                size,
                align,
                weight,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let weight = match weight {
                    FontWeight::Normal => "400",
                    FontWeight::Medium => "500",
                };
                let _ = write!(
                    out,
                    r#"<text x="{}" y="{}" fill="{color}" font-size="{}" font-weight="{weight}" text-anchor="{anchor}">{}</text>"#,
                    num(*x),
                    num(*y),
                    num(*size),
                    escape(text),
                );
            }
        }
    }

    out.push_str("</svg>");
    out
}

/// Two decimals, with trailing zeros dropped.
fn num(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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
