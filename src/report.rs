//! Plain-text rendering of a discovery result for terminal output.

use std::fmt::Write as _;

use poi_search::{Poi, ProviderResponse, ProviderStatus, SearchResult};

/// Where a merged POI came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Primary,
    Secondary,
}

impl Source {
    fn tag(self) -> &'static str {
        match self {
            Self::Primary => "local",
            Self::Secondary => "catalog",
        }
    }
}

/// Attribute a merged POI to the provider slot whose response carried it.
///
/// The whole POI is compared, not just its id: the merger keeps primary
/// entries unchanged, so only a primary-slot answer can match one exactly.
pub fn source_of(poi: &Poi, result: &SearchResult) -> Source {
    let carried_by = |response: Option<&ProviderResponse>| {
        response.is_some_and(|r| r.pois.iter().any(|p| p == poi))
    };
    if carried_by(result.primary_response.as_ref()) {
        Source::Primary
    } else {
        Source::Secondary
    }
}

/// Render `result` as the multi-section text report printed by the demo.
pub fn render_text(result: &SearchResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "POI discovery: {}", result.location);
    let _ = writeln!(out, "strategy: {}", result.strategy_used);
    let _ = writeln!(out);

    let _ = writeln!(out, "timing");
    let _ = writeln!(out, "  primary:   {}", timing_line(result.primary_response.as_ref()));
    let _ = writeln!(out, "  secondary: {}", timing_line(result.secondary_response.as_ref()));
    let _ = writeln!(out, "  total:     {} ms", result.timing.total_ms);
    let _ = writeln!(out);

    let report = &result.integrity_report;
    if report.is_clean() {
        let _ = writeln!(out, "integrity: clean ({} checked)", report.pois_checked);
    } else {
        let _ = writeln!(
            out,
            "integrity: {} violation(s) in {} checked",
            report.violations.len(),
            report.pois_checked
        );
        for v in &report.violations {
            let _ = writeln!(out, "  ! {} (matched \"{}\")", v.poi_name, v.matched_term);
        }
    }
    let _ = writeln!(out);

    write_provider_section(&mut out, "primary (local inference)", result.primary_response.as_ref());
    write_provider_section(&mut out, "secondary (remote catalog)", result.secondary_response.as_ref());

    let _ = writeln!(out, "merged ({})", result.merged_results.len());
    for (i, poi) in result.merged_results.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. [{}] {}",
            i + 1,
            source_of(poi, result).tag(),
            poi_line(poi)
        );
    }

    out
}

/// Aggregate over several discovery runs, compared against the provider
/// budgets.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub locations: usize,
    pub violations: usize,
    /// Mean primary elapsed time over runs that invoked the primary.
    pub avg_primary_ms: Option<f64>,
    /// Mean secondary elapsed time over runs that invoked the secondary.
    pub avg_secondary_ms: Option<f64>,
}

impl Summary {
    pub fn from_results(results: &[SearchResult]) -> Self {
        Self {
            locations: results.len(),
            violations: results
                .iter()
                .map(|r| r.integrity_report.violations.len())
                .sum(),
            avg_primary_ms: mean_elapsed(
                results.iter().filter_map(|r| r.primary_response.as_ref()),
            ),
            avg_secondary_ms: mean_elapsed(
                results.iter().filter_map(|r| r.secondary_response.as_ref()),
            ),
        }
    }
}

fn mean_elapsed<'a>(responses: impl Iterator<Item = &'a ProviderResponse>) -> Option<f64> {
    let (count, total) = responses.fold((0u32, 0u64), |(n, sum), r| {
        (n + 1, sum.saturating_add(r.elapsed_ms))
    });
    (count > 0).then(|| total as f64 / f64::from(count))
}

/// Render `summary` with each average checked against its budget.
pub fn render_summary(
    summary: &Summary,
    primary_budget_ms: u64,
    secondary_budget_ms: u64,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "summary");
    let _ = writeln!(out, "  locations:  {}", summary.locations);
    let _ = writeln!(
        out,
        "  violations: {} [{}]",
        summary.violations,
        if summary.violations == 0 { "ok" } else { "attention" }
    );
    let _ = writeln!(
        out,
        "  primary:    {}",
        average_line(summary.avg_primary_ms, primary_budget_ms)
    );
    let _ = writeln!(
        out,
        "  secondary:  {}",
        average_line(summary.avg_secondary_ms, secondary_budget_ms)
    );
    out
}

fn average_line(avg_ms: Option<f64>, budget_ms: u64) -> String {
    match avg_ms {
        None => "not invoked".to_string(),
        Some(avg) => {
            let verdict = if avg < budget_ms as f64 { "ok" } else { "over budget" };
            format!("avg {avg:.0} ms (budget {budget_ms} ms) [{verdict}]")
        }
    }
}

fn timing_line(response: Option<&ProviderResponse>) -> String {
    match response {
        None => "skipped".to_string(),
        Some(r) => match r.status() {
            ProviderStatus::Ok => format!("{} ms, {} result(s)", r.elapsed_ms, r.pois.len()),
            status => format!("{} ms, {}", r.elapsed_ms, status_label(status)),
        },
    }
}

fn status_label(status: ProviderStatus) -> &'static str {
    match status {
        ProviderStatus::Ok => "ok",
        ProviderStatus::Unavailable => "unavailable",
        ProviderStatus::Timeout => "timed out",
        ProviderStatus::InvalidResponse => "invalid response",
    }
}

fn write_provider_section(out: &mut String, title: &str, response: Option<&ProviderResponse>) {
    let Some(response) = response else {
        let _ = writeln!(out, "{title}: not invoked");
        let _ = writeln!(out);
        return;
    };

    match &response.error {
        Some(err) => {
            let _ = writeln!(out, "{title}: {err}");
        }
        None => {
            let confidence = response
                .confidence
                .map(|c| format!(", confidence {c:.2}"))
                .unwrap_or_default();
            let _ = writeln!(out, "{title}: {} result(s){confidence}", response.pois.len());
            for poi in &response.pois {
                let _ = writeln!(out, "  - {}", poi_line(poi));
            }
        }
    }
    let _ = writeln!(out);
}

fn poi_line(poi: &Poi) -> String {
    format!(
        "{} ({}) {:.1}* {:.1} mi",
        poi.name, poi.category, poi.rating, poi.distance_from_origin
    )
}
