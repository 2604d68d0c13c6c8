use super::super::domain::{CompanyProfile, Grant, InvestmentGoal, Sector};
use super::weights::{
    MatchWeights, BROAD_SECTOR_LIST, GOAL_PARTIAL_RATIO, NATIONAL_REGION_LIST,
    REGION_PARTIAL_RATIO, SECTOR_PARTIAL_RATIO, SIZE_PARTIAL_RATIO,
};
use super::MatchCriteria;

/// Goals close enough to earn partial credit. Not symmetric: international lists
/// expansion and training, while green and training never list international.
pub(crate) fn related_goals(goal: InvestmentGoal) -> &'static [InvestmentGoal] {
    use InvestmentGoal::*;

    match goal {
        Digitalization => &[Innovation, Research],
        Innovation => &[Digitalization, Research],
        Green => &[Innovation, Expansion],
        Research => &[Innovation, Digitalization],
        International => &[Expansion, Training],
        Expansion => &[International, Green],
        Training => &[Digitalization, Innovation],
        Other => &[],
    }
}

fn sector_partial_credit(company: &CompanyProfile, grant: &Grant) -> bool {
    company.sector == Sector::Services && grant.eligible_sectors.len() > BROAD_SECTOR_LIST
}

fn region_partial_credit(grant: &Grant) -> bool {
    grant.eligible_regions.len() > NATIONAL_REGION_LIST
}

fn size_partial_credit(company: &CompanyProfile, grant: &Grant) -> bool {
    company
        .company_size
        .border_tier()
        .map(|tier| grant.eligible_company_sizes.contains(&tier))
        .unwrap_or(false)
}

fn goal_partial_credit(company: &CompanyProfile, grant: &Grant) -> bool {
    let related = related_goals(company.investment_goal);
    grant
        .eligible_investment_goals
        .iter()
        .any(|goal| related.contains(goal))
}

/// Evaluate the four base criteria. Each one yields full credit, a partial fallback, or
/// nothing; the `*_match` flags are only set on full credit.
pub(crate) fn score_criteria(
    company: &CompanyProfile,
    grant: &Grant,
    weights: &MatchWeights,
) -> MatchCriteria {
    let mut criteria = MatchCriteria::default();

    if grant.eligible_sectors.contains(&company.sector) {
        criteria.sector_match = true;
        criteria.score_details.sector_score = weights.sector;
        criteria
            .matching_features
            .push("Company sector is eligible".to_string());
    } else {
        criteria
            .missing_requirements
            .push("Sector not admitted by the grant".to_string());
        if sector_partial_credit(company, grant) {
            criteria.score_details.sector_score = weights.sector * SECTOR_PARTIAL_RATIO;
            criteria
                .suggestions
                .push("The generic \"services\" sector may be partially compatible".to_string());
        }
    }

    if grant.eligible_regions.contains(&company.region) {
        criteria.region_match = true;
        criteria.score_details.region_score = weights.region;
        criteria
            .matching_features
            .push("Region is covered".to_string());
    } else {
        criteria
            .missing_requirements
            .push("Region not covered by the grant".to_string());
        if region_partial_credit(grant) {
            criteria.score_details.region_score = weights.region * REGION_PARTIAL_RATIO;
            criteria
                .suggestions
                .push("Check whether exceptions exist for your region".to_string());
        }
    }

    if grant.eligible_company_sizes.contains(&company.company_size) {
        criteria.size_match = true;
        criteria.score_details.size_score = weights.size;
        criteria
            .matching_features
            .push("Company size is eligible".to_string());
    } else {
        criteria
            .missing_requirements
            .push("Company size not compatible".to_string());
        if size_partial_credit(company, grant) {
            criteria.score_details.size_score = weights.size * SIZE_PARTIAL_RATIO;
            criteria
                .suggestions
                .push("You could qualify with minor structural changes".to_string());
        }
    }

    if grant
        .eligible_investment_goals
        .contains(&company.investment_goal)
    {
        criteria.goal_match = true;
        criteria.score_details.goal_score = weights.goal;
        criteria
            .matching_features
            .push("Investment goals are aligned".to_string());
    } else {
        criteria
            .missing_requirements
            .push("Investment goals not aligned with the grant".to_string());
        if goal_partial_credit(company, grant) {
            criteria.score_details.goal_score = weights.goal * GOAL_PARTIAL_RATIO;
            criteria
                .suggestions
                .push("Your goals are partially related to the grant".to_string());
        }
    }

    criteria
}
