use chrono::{DateTime, Utc};

use super::domain::{CompanyId, CompanyProfile, CompanySubmission};

/// Validation errors raised while accepting an intake form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileViolation {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("'{value}' is not a valid e-mail address")]
    InvalidEmail { value: String },
}

/// Guard responsible for producing `CompanyProfile` instances from raw submissions.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Check required contact fields and build the stored profile. The four scoring
    /// attributes are already typed, so only free-text fields need checking here.
    pub fn profile_from_submission(
        &self,
        submission: CompanySubmission,
        id: CompanyId,
        created_at: DateTime<Utc>,
    ) -> Result<CompanyProfile, ProfileViolation> {
        let company_name = required("company_name", &submission.company_name)?;
        let first_name = required("first_name", &submission.first_name)?;
        let last_name = required("last_name", &submission.last_name)?;
        let email = required("email", &submission.email)?;

        if !looks_like_email(&email) {
            return Err(ProfileViolation::InvalidEmail { value: email });
        }

        Ok(CompanyProfile {
            id,
            company_name,
            first_name,
            last_name,
            email: email.to_ascii_lowercase(),
            sector: submission.sector,
            region: submission.region,
            company_size: submission.company_size,
            investment_goal: submission.investment_goal,
            created_at,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProfileViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileViolation::MissingField { field });
    }
    Ok(trimmed.to_string())
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(' ')
        }
        None => false,
    }
}
