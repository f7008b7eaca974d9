//! Plain-text rendering of view models.

use std::fmt::Write;

use chrono::Local;
use client_core::{
    alerts::AlertEmphasis,
    views::{
        AnalyticsView, DashboardView, ForecastView, HealthView, TrendDirection,
        CONCENTRATION_UNIT,
    },
    DashboardSnapshot, ViewModel,
};
use shared::domain::{ActiveView, LocationId};

const RULE: &str = "------------------------------------------------------------";

pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    match alert_indicator(snapshot) {
        Some(indicator) => {
            let _ = writeln!(out, "{}  {indicator}", tab_bar(snapshot.active_view));
        }
        None => {
            let _ = writeln!(out, "{}", tab_bar(snapshot.active_view));
        }
    }
    let _ = writeln!(out, "{RULE}");
    match snapshot.view_model() {
        ViewModel::Loading { location } => {
            let _ = writeln!(out, "Loading air quality data for {location}...");
        }
        ViewModel::Unavailable { location, view } => {
            let _ = writeln!(
                out,
                "No current reading for {location}; the {view} view has nothing to show."
            );
        }
        ViewModel::Dashboard(view) => dashboard(&mut out, &view),
        ViewModel::Forecast(view) => forecast(&mut out, &view),
        ViewModel::Analytics(view) => analytics(&mut out, &view),
        ViewModel::Health(view) => health(&mut out, &view),
    }
    out
}

pub fn render_presets(presets: &[LocationId]) -> String {
    presets
        .iter()
        .enumerate()
        .map(|(i, location)| format!(":{} {}", i + 1, location))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn help_text(presets: &[LocationId]) -> String {
    format!(
        "Commands:\n  <city>            search a location\n  city <name>       search even if the name is a keyword\n  :N                pick a preset ({})\n  view <name>       dashboard | forecast | analytics | health\n  refresh           reload the current location\n  quit              exit",
        render_presets(presets)
    )
}

fn tab_bar(active: ActiveView) -> String {
    ActiveView::ALL
        .iter()
        .map(|view| {
            if *view == active {
                format!("[{view}]")
            } else {
                format!(" {view} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shown on every view whenever the alerts slot holds anything.
fn alert_indicator(snapshot: &DashboardSnapshot) -> Option<String> {
    let digest = snapshot.alert_digest();
    if !digest.has_active_alerts() {
        return None;
    }
    Some(format!(
        "(!) {} active alert(s), {} high",
        digest.alerts().len(),
        digest.high_severity_count()
    ))
}

fn dashboard(out: &mut String, view: &DashboardView<'_>) {
    let headline = &view.headline;
    let _ = writeln!(out, "{}", view.location);
    let _ = writeln!(
        out,
        "AQI {}  {}  ({})",
        headline.display_index(),
        headline.status(),
        headline.category.color().as_str()
    );
    let _ = writeln!(out, "{}", headline.advisory());
    if let Some(updated) = view.last_updated {
        let _ = writeln!(
            out,
            "Last updated {}",
            updated.with_timezone(&Local).format("%H:%M:%S")
        );
    }
    if view.refreshing {
        let _ = writeln!(out, "Refreshing...");
    }

    let _ = writeln!(out, "\nPollutants ({CONCENTRATION_UNIT})");
    for tile in &view.pollutants {
        let _ = writeln!(out, "  {:<6} {:>8.1}  {}", tile.symbol, tile.value, tile.name);
    }

    let _ = writeln!(out, "\nAlerts");
    if !view.alerts.has_active_alerts() {
        let _ = writeln!(out, "  No active alerts");
    }
    for (alert, emphasis) in view.alerts.entries() {
        let marker = match emphasis {
            AlertEmphasis::High => "!!",
            AlertEmphasis::Standard => " -",
        };
        let _ = writeln!(out, "  {marker} {} ({})", alert.message, alert.time);
    }

    if !view.trend.is_empty() {
        let _ = writeln!(out, "\nLast {} samples", view.trend.len());
        for point in view.trend {
            let _ = writeln!(out, "  {}  {:>5.0}", point.time, point.index);
        }
    }
}

fn forecast(out: &mut String, view: &ForecastView<'_>) {
    let _ = writeln!(out, "7-day forecast for {}", view.location);
    if view.days.is_empty() {
        let _ = writeln!(out, "  Forecast unavailable");
        return;
    }
    for day in &view.days {
        let confidence = day
            .point
            .confidence
            .map(|c| format!("  confidence {c:.0}%"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<8} {:>4}  {}{confidence}",
            day.point.day,
            day.classification.display_index(),
            day.classification.status()
        );
    }
}

fn analytics(out: &mut String, view: &AnalyticsView<'_>) {
    let _ = writeln!(out, "Analytics for {}", view.location);
    let _ = writeln!(
        out,
        "  Current AQI {} ({})",
        view.current.display_index(),
        view.current.status()
    );
    let _ = writeln!(
        out,
        "  Dominant pollutant: PM2.5 at {:.1} {CONCENTRATION_UNIT}",
        view.fine_particulate
    );
    match &view.trend {
        Some(trend) => {
            let direction = match trend.direction {
                TrendDirection::Rising => "rising",
                TrendDirection::Falling => "falling",
                TrendDirection::Steady => "steady",
            };
            let _ = writeln!(
                out,
                "  {} samples: min {:.0}, max {:.0}, mean {:.1}, {direction}",
                trend.samples, trend.min, trend.max, trend.mean
            );
        }
        None => {
            let _ = writeln!(out, "  No historical data");
        }
    }
}

fn health(out: &mut String, view: &HealthView<'_>) {
    let _ = writeln!(
        out,
        "Health guidance for {}: AQI {} ({})",
        view.location,
        view.current.display_index(),
        view.current.status()
    );
    let _ = writeln!(out, "  {}", view.current.advisory());
    let _ = writeln!(out, "\nScale");
    for category in view.legend {
        let marker = if *category == view.current.category {
            ">"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            " {marker} {:<8} {:<31} {}",
            category.range_label(),
            category.label(),
            category.short_description()
        );
    }
}
