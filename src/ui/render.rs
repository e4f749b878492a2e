//! HTML fragments for the page regions.
//!
//! All server-provided text is escaped before it is placed in markup.

use chrono::{DateTime, Utc};

use crate::models::{Heatmap, RecommendationItem, SearchEntry, ViewEntry};

const OVERVIEW_PREVIEW_CHARS: usize = 150;

pub const NO_RESULTS: &str = "<p class=\"empty-msg\">No matching recommendations found.</p>";
pub const NO_HEATMAP: &str = "<p class=\"empty-msg\">No similarity data available</p>";
pub const NO_SEARCHES: &str = "<p class=\"empty-msg\">No search history yet</p>";
pub const NO_VIEWS: &str = "<p class=\"empty-msg\">No viewed movies yet</p>";

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn overview_preview(overview: &str) -> String {
    if overview.chars().count() > OVERVIEW_PREVIEW_CHARS {
        let cut: String = overview.chars().take(OVERVIEW_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        overview.to_string()
    }
}

/// One row per item; `data-index` is the item's position in `items`
pub fn results(items: &[RecommendationItem]) -> String {
    if items.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut html = String::new();
    for (index, item) in items.iter().enumerate() {
        let year = item
            .display_year()
            .map(|y| format!(" • {}", y))
            .unwrap_or_default();
        let overview = item
            .overview
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .map(|o| format!("<p class=\"overview\">{}</p>", html_escape(&overview_preview(o))))
            .unwrap_or_default();

        html.push_str(&format!(
            "<div class=\"result-item\" data-index=\"{index}\">\
             <h3>{title}</h3>\
             <p class=\"meta\">{genres} • Rating: {rating:.1}/10{year}</p>\
             {overview}\
             <span class=\"score\">Similarity: {score:.2}%</span>\
             </div>",
            title = html_escape(&item.title),
            genres = html_escape(&item.genres),
            rating = item.rating,
            score = item.score * 100.0,
        ));
    }
    html
}

/// Cell lightness: 90% at the matrix minimum down to 40% at the maximum
pub fn heatmap_lightness(value: f64, min: f64, max: f64) -> f64 {
    let norm = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    90.0 - norm * 50.0
}

fn heatmap_color(value: f64, min: f64, max: f64) -> String {
    format!("hsl(190, 70%, {:.0}%)", heatmap_lightness(value, min, max))
}

/// A labelled n×n grid; missing matrix cells render as 0
pub fn heatmap(heatmap: Option<&Heatmap>) -> String {
    let Some(heatmap) = heatmap.filter(|h| !h.labels.is_empty() && !h.matrix.is_empty()) else {
        return NO_HEATMAP.to_string();
    };

    let n = heatmap.labels.len();
    let (min, max) = heatmap
        .matrix
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let mut html = format!(
        "<div class=\"heatmap-grid\" style=\"grid-template-columns: repeat({}, minmax(60px, 1fr))\">\
         <div class=\"heatmap-cell header\"></div>",
        n + 1
    );
    for label in &heatmap.labels {
        html.push_str(&format!(
            "<div class=\"heatmap-cell header\">{}</div>",
            html_escape(label)
        ));
    }

    for (i, row_label) in heatmap.labels.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"heatmap-cell header\">{}</div>",
            html_escape(row_label)
        ));
        for (j, col_label) in heatmap.labels.iter().enumerate() {
            let value = heatmap
                .matrix
                .get(i)
                .and_then(|row| row.get(j))
                .copied()
                .unwrap_or(0.0);
            html.push_str(&format!(
                "<div class=\"heatmap-cell\" style=\"background: {color}\" title=\"{a} ↔ {b}: {pct:.1}%\">{pct:.0}%</div>",
                color = heatmap_color(value, min, max),
                a = html_escape(row_label),
                b = html_escape(col_label),
                pct = value * 100.0,
            ));
        }
    }

    html.push_str("</div>");
    html
}

pub fn search_history(entries: &[SearchEntry]) -> String {
    if entries.is_empty() {
        return NO_SEARCHES.to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "<div class=\"history-item\">\
                 <span class=\"history-query\">{query}</span>\
                 <span class=\"history-meta\">{count} results • {time}</span>\
                 </div>",
                query = html_escape(&entry.query),
                count = entry.result_count,
                time = format_timestamp(&entry.timestamp),
            )
        })
        .collect()
}

pub fn view_history(entries: &[ViewEntry]) -> String {
    if entries.is_empty() {
        return NO_VIEWS.to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let rating = entry
                .rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "N/A".to_string());
            format!(
                "<div class=\"history-item\">\
                 <span class=\"history-title\">{title}</span>\
                 <span class=\"history-meta\">{genres} • Rating: {rating} • {time}</span>\
                 </div>",
                title = html_escape(&entry.title),
                genres = html_escape(entry.genres.as_deref().unwrap_or_default()),
                time = format_timestamp(&entry.timestamp),
            )
        })
        .collect()
}
