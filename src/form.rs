// src/form.rs
use crate::poster::{generate, PosterParameters};
use crate::raster::{encode_png, render, RasterOptions};
use crate::svg::render_svg;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::fmt::Write;

/// A numeric slider on the form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl Slider {
    /// Clamp to the slider range; non-finite input falls back to the default
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

pub const ARMS: Slider = Slider {
    name: "arms",
    label: "Number of Arms",
    min: 3.0,
    max: 12.0,
    default: 6.0,
    step: 1.0,
};

pub const LAYERS: Slider = Slider {
    name: "layers",
    label: "Number of Layers",
    min: 1.0,
    max: 8.0,
    default: 4.0,
    step: 1.0,
};

pub const WOBBLE_MIN: Slider = Slider {
    name: "wobble_min",
    label: "Min Wobble",
    min: 0.01,
    max: 0.2,
    default: 0.05,
    step: 0.01,
};

pub const WOBBLE_MAX: Slider = Slider {
    name: "wobble_max",
    label: "Max Wobble",
    min: 0.01,
    max: 0.3,
    default: 0.15,
    step: 0.01,
};

pub const SLIDERS: [Slider; 4] = [ARMS, LAYERS, WOBBLE_MIN, WOBBLE_MAX];

pub const DEFAULT_SEED: i64 = 42;

/// Pixel size of the inline PNG preview
const PREVIEW_SIZE: u32 = 600;

/// Query parameters sent by the form; missing fields take the slider defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormQuery {
    pub arms: f64,
    pub layers: f64,
    pub wobble_min: f64,
    pub wobble_max: f64,
    /// Free integer; negative values wrap to `u64` (`-1` seeds as `u64::MAX`)
    pub seed: i64,
}

impl Default for FormQuery {
    fn default() -> Self {
        FormQuery {
            arms: ARMS.default,
            layers: LAYERS.default,
            wobble_min: WOBBLE_MIN.default,
            wobble_max: WOBBLE_MAX.default,
            seed: DEFAULT_SEED,
        }
    }
}

impl FormQuery {
    /// Clamp each value to its slider range. The wobble bounds are not
    /// checked against each other.
    pub fn to_parameters(&self) -> PosterParameters {
        PosterParameters {
            seed: Some(self.seed as u64),
            n_arms: ARMS.clamp(self.arms).round() as usize,
            n_layers: LAYERS.clamp(self.layers).round() as usize,
            wobble_min: WOBBLE_MIN.clamp(self.wobble_min),
            wobble_max: WOBBLE_MAX.clamp(self.wobble_max),
        }
    }
}

/// The form page: sliders, a seed box and an inline poster refreshed on every change
pub fn page() -> String {
    let mut controls = String::new();
    for s in SLIDERS {
        let _ = writeln!(
            controls,
            r#"<label>{label} <output id="{name}-value">{default}</output><br><input type="range" name="{name}" min="{min}" max="{max}" step="{step}" value="{default}"></label>"#,
            label = s.label,
            name = s.name,
            min = s.min,
            max = s.max,
            step = s.step,
            default = s.default,
        );
    }
    let _ = writeln!(
        controls,
        r#"<label>Random Seed (optional)<br><input type="number" name="seed" step="1" value="{DEFAULT_SEED}"></label>"#
    );

    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Snowflake Poster Generator</title></head>
<body style="font-family:sans-serif; max-width:720px; margin:24px auto;">
<h1>Snowflake Poster Generator</h1>
<form id="controls" style="display:grid; gap:12px;">
{controls}</form>
<img id="poster" src="/poster.svg" alt="snowflake poster" style="width:100%; margin-top:16px;">
<script>
(function(){{
    const form = document.getElementById('controls');
    const img = document.getElementById('poster');
    const refresh = ()=>{{
        const params = new URLSearchParams(new FormData(form));
        form.querySelectorAll('input[type=range]').forEach((el)=>{{
            const out = document.getElementById(el.name + '-value');
            if(out) out.textContent = el.value;
        }});
        img.src = '/poster.svg?' + params.toString();
    }};
    form.addEventListener('input', refresh);
    refresh();
}})();
</script>
</body>
</html>
"#
    )
}

async fn index() -> Html<String> {
    Html(page())
}

fn internal_error<E: std::fmt::Display>(err: E) -> Response {
    log::error!("poster render failed: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {err}")).into_response()
}

async fn poster_svg(Query(query): Query<FormQuery>) -> Response {
    let params = query.to_parameters();
    log::debug!("svg request: {params:?}");
    match tokio::task::spawn_blocking(move || render_svg(&generate(&params))).await {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn poster_png(Query(query): Query<FormQuery>) -> Response {
    let params = query.to_parameters();
    log::debug!("png request: {params:?}");
    let rendered = tokio::task::spawn_blocking(move || {
        let img = render(&generate(&params), &RasterOptions { size: PREVIEW_SIZE });
        encode_png(&img)
    })
    .await;
    match rendered {
        Ok(Ok(png)) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/poster.svg", get(poster_svg))
        .route("/poster.png", get(poster_png))
        .route("/healthz", get(|| async { "ok" }))
}
