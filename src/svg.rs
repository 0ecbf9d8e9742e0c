use crate::poster::{PlacedBlob, Poster};
use crate::raster::CANVAS_INCHES;
use std::fmt::Write;

fn polygon(out: &mut String, blob: &PlacedBlob) {
    let [r, g, b] = blob.fill.color.to_rgb8();
    let points = blob
        .shape
        .points()
        .map(|(x, y)| format!("{x:.4},{y:.4}"))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        out,
        r#"    <polygon points="{points}" fill="rgb({r},{g},{b})" fill-opacity="{:.4}" fill-rule="nonzero"/>"#,
        blob.fill.opacity()
    );
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render the poster as a standalone SVG document.
///
/// World y points up, so blobs are drawn inside a y-flipped group while the
/// caption is placed in document coordinates to keep the text upright.
pub fn render_svg(poster: &Poster) -> String {
    let view = &poster.view;
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" preserveAspectRatio="xMidYMid meet">"#,
        view.x_min,
        -view.y_max,
        view.width(),
        view.height()
    );
    let _ = writeln!(
        out,
        r#"  <defs><clipPath id="view"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
        view.x_min,
        -view.y_max,
        view.width(),
        view.height()
    );
    let _ = writeln!(
        out,
        r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="white"/>"#,
        view.x_min,
        -view.y_max,
        view.width(),
        view.height()
    );

    out.push_str("  <g clip-path=\"url(#view)\">\n");
    out.push_str("   <g transform=\"scale(1,-1)\">\n");
    for blob in &poster.blobs {
        polygon(&mut out, blob);
    }
    out.push_str("   </g>\n");

    let caption = &poster.caption;
    // point size relative to the plot area's width in inches
    let font_size = caption.font_size_pt / 72.0 * view.width() / CANVAS_INCHES;
    let _ = writeln!(
        out,
        r#"   <text x="{}" y="{}" font-family="sans-serif" font-size="{font_size:.4}" font-weight="{}" dominant-baseline="hanging" text-anchor="start">{}</text>"#,
        caption.anchor.0,
        -caption.anchor.1,
        if caption.bold { "bold" } else { "normal" },
        escape(caption.text)
    );
    out.push_str("  </g>\n</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poster::{generate, PosterParameters};

    #[test]
    fn test_one_polygon_per_blob() {
        let poster = generate(&PosterParameters {
            seed: Some(42),
            ..PosterParameters::default()
        });
        let svg = render_svg(&poster);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polygon").count(), 25);
        assert!(svg.contains(r#"viewBox="-10 -10 20 20""#));
    }

    #[test]
    fn test_caption_escaped() {
        let poster = generate(&PosterParameters {
            seed: Some(1),
            n_arms: 1,
            n_layers: 1,
            ..PosterParameters::default()
        });
        let svg = render_svg(&poster);
        assert!(svg.contains("Week3 Arts &amp; Advanced Big Data"));
        assert!(svg.contains(r#"x="-9.5" y="-9.5""#));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn test_fill_opacity_compounds() {
        let poster = generate(&PosterParameters {
            seed: Some(1),
            n_arms: 1,
            n_layers: 1,
            ..PosterParameters::default()
        });
        let svg = render_svg(&poster);
        // arm blob 0.6 * 0.6, center blob 0.6 * 0.7
        assert!(svg.contains(r#"fill-opacity="0.3600""#));
        assert!(svg.contains(r#"fill-opacity="0.4200""#));
        assert!(svg.contains("fill=\"rgb(179,242,230)\""));
    }

    #[test]
    fn test_same_seed_same_document() {
        let params = PosterParameters {
            seed: Some(99),
            ..PosterParameters::default()
        };
        assert_eq!(render_svg(&generate(&params)), render_svg(&generate(&params)));
    }
}
