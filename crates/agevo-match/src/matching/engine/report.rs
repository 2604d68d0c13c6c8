use std::fmt::Write as _;

use super::super::domain::Grant;
use super::weights::MatchWeights;
use super::MatchResult;

fn push_section(report: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    let _ = writeln!(report, "{heading}:");
    for item in items {
        let _ = writeln!(report, "   - {item}");
    }
    report.push('\n');
}

pub(crate) fn format_report(result: &MatchResult, grant: &Grant, weights: &MatchWeights) -> String {
    let criteria = &result.criteria;
    let details = &criteria.score_details;
    let mut report = String::new();

    let _ = writeln!(report, "MATCH COMPATIBILITY REPORT");
    let _ = writeln!(report, "{}\n", "=".repeat(50));

    let _ = writeln!(report, "Grant: {}", grant.title);
    let _ = writeln!(report, "Issuer: {}\n", grant.ente_erogatore);

    let _ = writeln!(report, "TOTAL SCORE: {}%", result.total_score);
    let _ = writeln!(
        report,
        "Confidence level: {}",
        result.confidence_level.label().to_uppercase()
    );
    let _ = writeln!(
        report,
        "Success probability: {}%",
        result.estimated_success_rate
    );
    let _ = writeln!(
        report,
        "Priority: {}\n",
        result.priority.label().to_uppercase()
    );

    let _ = writeln!(report, "DETAILED ANALYSIS:");
    let _ = writeln!(report, "{}", "-".repeat(30));

    push_section(&mut report, "Strengths", &criteria.matching_features);
    push_section(
        &mut report,
        "Missing requirements",
        &criteria.missing_requirements,
    );
    push_section(&mut report, "Suggestions", &criteria.suggestions);

    let _ = writeln!(report, "SCORE BREAKDOWN:");
    let _ = writeln!(report, "   Sector: {}/{}", details.sector_score, weights.sector);
    let _ = writeln!(report, "   Region: {}/{}", details.region_score, weights.region);
    let _ = writeln!(report, "   Size: {}/{}", details.size_score, weights.size);
    let _ = writeln!(report, "   Goals: {}/{}", details.goal_score, weights.goal);

    if details.bonus_score > 0 {
        let _ = writeln!(report, "   Bonus: +{}", details.bonus_score);
    }
    if details.penalty_score < 0 {
        let _ = writeln!(report, "   Penalty: {}", details.penalty_score);
    }

    report
}
