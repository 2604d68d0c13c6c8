use crate::infra::{load_catalog, scoring_instant, InMemoryStore};
use agevo_match::error::AppError;
use agevo_match::matching::{
    CompanyId, CompanyProfile, CompanySize, CompanySubmission, Grant, GrantCatalog,
    InvestmentGoal, MatchBoard, MatchResult, MatchingEngine, MatchingService, Region, Sector,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Company sector (e.g. tech, manufacturing, services)
    #[arg(long)]
    pub(crate) sector: Sector,
    /// Region of the operating site (e.g. lombardia, emilia-romagna)
    #[arg(long)]
    pub(crate) region: Region,
    /// Company size: micro, small, medium or large
    #[arg(long)]
    pub(crate) size: CompanySize,
    /// Primary investment goal (e.g. digitalization, green)
    #[arg(long)]
    pub(crate) goal: InvestmentGoal,
    /// JSON or CSV grant catalog. Defaults to the bundled sample.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the full compatibility report for every match
    #[arg(long)]
    pub(crate) report: bool,
    /// Score as of this date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Score as of this date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// JSON or CSV grant catalog. Defaults to the bundled sample.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        sector,
        region,
        size,
        goal,
        catalog,
        report,
        today,
    } = args;

    let now = scoring_instant(today);
    let catalog = load_catalog(catalog.as_deref())?;
    let profile = cli_profile(sector, region, size, goal, now);
    let engine = MatchingEngine::default();
    let active: Vec<Grant> = catalog.active().into_iter().cloned().collect();
    let results = engine.score_all(&profile, &active, now);

    println!(
        "Profile: {} | {} | {} | {}",
        sector.label(),
        region.label(),
        size.label(),
        goal.label()
    );
    println!(
        "{} active grants evaluated, {} matches at or above threshold",
        active.len(),
        results.len()
    );

    render_results(&catalog, &results);

    if report {
        for result in &results {
            if let Some(grant) = catalog.get(&result.grant_id) {
                println!("\n{}", engine.format_report(result, grant));
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, catalog } = args;
    let now = scoring_instant(today);
    let catalog = load_catalog(catalog.as_deref())?;

    println!("AGEVO MATCH demo");
    println!(
        "Catalog: {} grants ({} active)",
        catalog.len(),
        catalog.active().len()
    );

    let store = Arc::new(InMemoryStore::from_catalog(catalog.clone()));
    let service = MatchingService::new(store);

    let outcome = match service.submit(demo_submission(), now) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };

    let company = &outcome.company;
    println!(
        "\nCompany {} ({}) registered as {}",
        company.company_name, company.email, company.id
    );
    println!(
        "  {} | {} | {} | {}",
        company.sector.label(),
        company.region.label(),
        company.company_size.label(),
        company.investment_goal.label()
    );

    match service.matches_for(&company.id, None) {
        Ok(board) => render_board(&board),
        Err(err) => println!("  Match lookup failed: {}", err),
    }

    if let Some(top) = outcome.matches.first() {
        match service.report(&company.id, &top.grant_id, now) {
            Ok(report) => println!("\n{}", report),
            Err(err) => println!("  Report unavailable: {}", err),
        }
    }

    Ok(())
}

fn cli_profile(
    sector: Sector,
    region: Region,
    company_size: CompanySize,
    investment_goal: InvestmentGoal,
    now: DateTime<Utc>,
) -> CompanyProfile {
    CompanyProfile {
        id: CompanyId("cli".to_string()),
        company_name: "Command line profile".to_string(),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        sector,
        region,
        company_size,
        investment_goal,
        created_at: now,
    }
}

fn demo_submission() -> CompanySubmission {
    CompanySubmission {
        company_name: "Officine Digitali Brianza S.r.l.".to_string(),
        first_name: "Chiara".to_string(),
        last_name: "Colombo".to_string(),
        email: "chiara.colombo@officinedigitali.it".to_string(),
        sector: Sector::Tech,
        region: Region::Lombardia,
        company_size: CompanySize::Small,
        investment_goal: InvestmentGoal::Digitalization,
    }
}

fn render_results(catalog: &GrantCatalog, results: &[MatchResult]) {
    if results.is_empty() {
        println!("\nNo grants reached the minimum score");
        return;
    }

    println!();
    for (rank, result) in results.iter().enumerate() {
        let title = catalog
            .get(&result.grant_id)
            .map(|grant| grant.title.as_str())
            .unwrap_or("(unknown grant)");
        println!(
            "{:>2}. {:>3}% {:<40} {} | {} confidence | {}% success",
            rank + 1,
            result.total_score,
            title,
            result.priority.label(),
            result.confidence_level.label(),
            result.estimated_success_rate
        );
    }
}

fn render_board(board: &MatchBoard) {
    println!("\n{} matches", board.total);
    for group in &board.groups {
        println!("\n{} ({})", group.label, group.matches.len());
        for view in &group.matches {
            let closing = view
                .grant
                .closing_date
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "open".to_string());
            println!(
                "  - {}% {} [{}] closes {} | up to EUR {}",
                view.record.match_score,
                view.grant.title,
                view.record.match_reasons.priority.label(),
                closing,
                view.grant.max_amount
            );
        }
    }
}
