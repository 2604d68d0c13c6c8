use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored company profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

/// Identifier wrapper for grants ("bandi").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raised when a wire value does not belong to one of the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

fn lookup<T: Copy>(
    kind: &'static str,
    all: &[T],
    as_str: fn(T) -> &'static str,
    raw: &str,
) -> Result<T, UnknownValue> {
    let needle = raw.trim().to_ascii_lowercase();
    all.iter()
        .copied()
        .find(|candidate| as_str(*candidate) == needle)
        .ok_or_else(|| UnknownValue {
            kind,
            value: raw.trim().to_string(),
        })
}

/// Business sector declared on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sector {
    Tech,
    Manufacturing,
    Services,
    Retail,
    Healthcare,
    Construction,
    Food,
    Logistics,
    Energy,
    Agriculture,
    Tourism,
    Other,
}

impl Sector {
    pub const ALL: [Sector; 12] = [
        Sector::Tech,
        Sector::Manufacturing,
        Sector::Services,
        Sector::Retail,
        Sector::Healthcare,
        Sector::Construction,
        Sector::Food,
        Sector::Logistics,
        Sector::Energy,
        Sector::Agriculture,
        Sector::Tourism,
        Sector::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Sector::Tech => "tech",
            Sector::Manufacturing => "manufacturing",
            Sector::Services => "services",
            Sector::Retail => "retail",
            Sector::Healthcare => "healthcare",
            Sector::Construction => "construction",
            Sector::Food => "food",
            Sector::Logistics => "logistics",
            Sector::Energy => "energy",
            Sector::Agriculture => "agriculture",
            Sector::Tourism => "tourism",
            Sector::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Sector::Tech => "Tecnologia e Software",
            Sector::Manufacturing => "Manifatturiero",
            Sector::Services => "Servizi",
            Sector::Retail => "Commercio",
            Sector::Healthcare => "Sanità",
            Sector::Construction => "Costruzioni",
            Sector::Food => "Alimentare",
            Sector::Logistics => "Logistica",
            Sector::Energy => "Energia",
            Sector::Agriculture => "Agricoltura",
            Sector::Tourism => "Turismo",
            Sector::Other => "Altro",
        }
    }
}

impl FromStr for Sector {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lookup("sector", &Self::ALL, Self::as_str, raw)
    }
}

/// Italian administrative region of the company's operating site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Lombardia,
    Lazio,
    Veneto,
    EmiliaRomagna,
    Piemonte,
    Toscana,
    Campania,
    Sicilia,
    Puglia,
    Calabria,
    Sardegna,
    Friuli,
    Liguria,
    Marche,
    Abruzzo,
    Umbria,
    Basilicata,
    Molise,
    Trentino,
    ValleAosta,
}

impl Region {
    pub const ALL: [Region; 20] = [
        Region::Lombardia,
        Region::Lazio,
        Region::Veneto,
        Region::EmiliaRomagna,
        Region::Piemonte,
        Region::Toscana,
        Region::Campania,
        Region::Sicilia,
        Region::Puglia,
        Region::Calabria,
        Region::Sardegna,
        Region::Friuli,
        Region::Liguria,
        Region::Marche,
        Region::Abruzzo,
        Region::Umbria,
        Region::Basilicata,
        Region::Molise,
        Region::Trentino,
        Region::ValleAosta,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Region::Lombardia => "lombardia",
            Region::Lazio => "lazio",
            Region::Veneto => "veneto",
            Region::EmiliaRomagna => "emilia-romagna",
            Region::Piemonte => "piemonte",
            Region::Toscana => "toscana",
            Region::Campania => "campania",
            Region::Sicilia => "sicilia",
            Region::Puglia => "puglia",
            Region::Calabria => "calabria",
            Region::Sardegna => "sardegna",
            Region::Friuli => "friuli",
            Region::Liguria => "liguria",
            Region::Marche => "marche",
            Region::Abruzzo => "abruzzo",
            Region::Umbria => "umbria",
            Region::Basilicata => "basilicata",
            Region::Molise => "molise",
            Region::Trentino => "trentino",
            Region::ValleAosta => "valle-aosta",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Region::Lombardia => "Lombardia",
            Region::Lazio => "Lazio",
            Region::Veneto => "Veneto",
            Region::EmiliaRomagna => "Emilia-Romagna",
            Region::Piemonte => "Piemonte",
            Region::Toscana => "Toscana",
            Region::Campania => "Campania",
            Region::Sicilia => "Sicilia",
            Region::Puglia => "Puglia",
            Region::Calabria => "Calabria",
            Region::Sardegna => "Sardegna",
            Region::Friuli => "Friuli-Venezia Giulia",
            Region::Liguria => "Liguria",
            Region::Marche => "Marche",
            Region::Abruzzo => "Abruzzo",
            Region::Umbria => "Umbria",
            Region::Basilicata => "Basilicata",
            Region::Molise => "Molise",
            Region::Trentino => "Trentino-Alto Adige",
            Region::ValleAosta => "Valle d'Aosta",
        }
    }
}

impl FromStr for Region {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lookup("region", &Self::ALL, Self::as_str, raw)
    }
}

/// EU SME size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanySize {
    Micro,
    Small,
    Medium,
    Large,
}

impl CompanySize {
    pub const ALL: [CompanySize; 4] = [
        CompanySize::Micro,
        CompanySize::Small,
        CompanySize::Medium,
        CompanySize::Large,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CompanySize::Micro => "micro",
            CompanySize::Small => "small",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CompanySize::Micro => "Micro (< 10 dipendenti)",
            CompanySize::Small => "Piccola (10-49 dipendenti)",
            CompanySize::Medium => "Media (50-249 dipendenti)",
            CompanySize::Large => "Grande (250+ dipendenti)",
        }
    }

    /// The tier a company of this size sits just below, when that tier can earn partial credit.
    /// Only micro→small and small→medium qualify.
    pub const fn border_tier(self) -> Option<CompanySize> {
        match self {
            CompanySize::Micro => Some(CompanySize::Small),
            CompanySize::Small => Some(CompanySize::Medium),
            CompanySize::Medium | CompanySize::Large => None,
        }
    }
}

impl FromStr for CompanySize {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lookup("company size", &Self::ALL, Self::as_str, raw)
    }
}

/// What the company wants to invest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentGoal {
    Digitalization,
    Research,
    Green,
    International,
    Training,
    Innovation,
    Expansion,
    Other,
}

impl InvestmentGoal {
    pub const ALL: [InvestmentGoal; 8] = [
        InvestmentGoal::Digitalization,
        InvestmentGoal::Research,
        InvestmentGoal::Green,
        InvestmentGoal::International,
        InvestmentGoal::Training,
        InvestmentGoal::Innovation,
        InvestmentGoal::Expansion,
        InvestmentGoal::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            InvestmentGoal::Digitalization => "digitalization",
            InvestmentGoal::Research => "research",
            InvestmentGoal::Green => "green",
            InvestmentGoal::International => "international",
            InvestmentGoal::Training => "training",
            InvestmentGoal::Innovation => "innovation",
            InvestmentGoal::Expansion => "expansion",
            InvestmentGoal::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            InvestmentGoal::Digitalization => "Digitalizzazione",
            InvestmentGoal::Research => "Ricerca e Sviluppo",
            InvestmentGoal::Green => "Transizione Ecologica",
            InvestmentGoal::International => "Internazionalizzazione",
            InvestmentGoal::Training => "Formazione",
            InvestmentGoal::Innovation => "Innovazione",
            InvestmentGoal::Expansion => "Espansione",
            InvestmentGoal::Other => "Altro",
        }
    }
}

impl FromStr for InvestmentGoal {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lookup("investment goal", &Self::ALL, Self::as_str, raw)
    }
}

/// Funding instrument offered by a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    FondoPerduto,
    FinanziamentoAgevolato,
    CreditoImposta,
    Misto,
}

impl ContributionType {
    pub const ALL: [ContributionType; 4] = [
        ContributionType::FondoPerduto,
        ContributionType::FinanziamentoAgevolato,
        ContributionType::CreditoImposta,
        ContributionType::Misto,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ContributionType::FondoPerduto => "fondo_perduto",
            ContributionType::FinanziamentoAgevolato => "finanziamento_agevolato",
            ContributionType::CreditoImposta => "credito_imposta",
            ContributionType::Misto => "misto",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ContributionType::FondoPerduto => "Fondo Perduto",
            ContributionType::FinanziamentoAgevolato => "Finanziamento Agevolato",
            ContributionType::CreditoImposta => "Credito d'Imposta",
            ContributionType::Misto => "Misto",
        }
    }
}

impl FromStr for ContributionType {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lookup("contribution type", &Self::ALL, Self::as_str, raw)
    }
}

/// Publication state of a grant. Only `Active` grants are offered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    Active,
    Closed,
    ComingSoon,
    Draft,
}

impl GrantStatus {
    pub const ALL: [GrantStatus; 4] = [
        GrantStatus::Active,
        GrantStatus::Closed,
        GrantStatus::ComingSoon,
        GrantStatus::Draft,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            GrantStatus::Active => "active",
            GrantStatus::Closed => "closed",
            GrantStatus::ComingSoon => "coming_soon",
            GrantStatus::Draft => "draft",
        }
    }
}

impl FromStr for GrantStatus {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lookup("grant status", &Self::ALL, Self::as_str, raw)
    }
}

/// Raw intake form payload, before required-field validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySubmission {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub sector: Sector,
    pub region: Region,
    pub company_size: CompanySize,
    pub investment_goal: InvestmentGoal,
}

/// Validated company profile. Only the four categorical attributes influence scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: CompanyId,
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub sector: Sector,
    pub region: Region,
    pub company_size: CompanySize,
    pub investment_goal: InvestmentGoal,
    pub created_at: DateTime<Utc>,
}

/// Public funding opportunity with its eligibility rules.
///
/// Deserialization goes through [`RawGrant`] so that a record missing any eligibility list
/// is rejected with a [`GrantValidationError`] instead of being scored as ineligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrant")]
pub struct Grant {
    pub id: GrantId,
    pub title: String,
    pub description: String,
    pub ente_erogatore: String,
    pub contribution_type: ContributionType,
    pub min_amount: u64,
    pub max_amount: u64,
    pub eligible_sectors: Vec<Sector>,
    pub eligible_regions: Vec<Region>,
    pub eligible_company_sizes: Vec<CompanySize>,
    pub eligible_investment_goals: Vec<InvestmentGoal>,
    pub opening_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub status: GrantStatus,
    pub official_url: Option<String>,
}

impl Grant {
    pub fn is_active(&self) -> bool {
        self.status == GrantStatus::Active
    }
}

/// Grant record as it arrives from a catalog, with every eligibility list and the status
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGrant {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ente_erogatore: String,
    pub contribution_type: Option<ContributionType>,
    #[serde(default)]
    pub min_amount: u64,
    #[serde(default)]
    pub max_amount: u64,
    pub eligible_sectors: Option<Vec<Sector>>,
    pub eligible_regions: Option<Vec<Region>>,
    pub eligible_company_sizes: Option<Vec<CompanySize>>,
    pub eligible_investment_goals: Option<Vec<InvestmentGoal>>,
    #[serde(default)]
    pub opening_date: Option<NaiveDate>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    pub status: Option<GrantStatus>,
    #[serde(default)]
    pub official_url: Option<String>,
}

/// Contract violations on grant records supplied by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrantValidationError {
    #[error("grant record is missing an id")]
    MissingId,
    #[error("grant '{grant_id}' is missing the {field} eligibility list")]
    MissingEligibility {
        grant_id: String,
        field: &'static str,
    },
    #[error("grant '{grant_id}' is missing its status")]
    MissingStatus { grant_id: String },
    #[error("grant '{grant_id}' has min_amount {min} above max_amount {max}")]
    InvertedAmounts { grant_id: String, min: u64, max: u64 },
}

impl TryFrom<RawGrant> for Grant {
    type Error = GrantValidationError;

    fn try_from(raw: RawGrant) -> Result<Self, Self::Error> {
        let grant_id = raw.id.trim().to_string();
        if grant_id.is_empty() {
            return Err(GrantValidationError::MissingId);
        }

        let missing = |field: &'static str| GrantValidationError::MissingEligibility {
            grant_id: grant_id.clone(),
            field,
        };

        let eligible_sectors = raw.eligible_sectors.ok_or_else(|| missing("eligible_sectors"))?;
        let eligible_regions = raw.eligible_regions.ok_or_else(|| missing("eligible_regions"))?;
        let eligible_company_sizes = raw
            .eligible_company_sizes
            .ok_or_else(|| missing("eligible_company_sizes"))?;
        let eligible_investment_goals = raw
            .eligible_investment_goals
            .ok_or_else(|| missing("eligible_investment_goals"))?;
        let status = raw
            .status
            .ok_or_else(|| GrantValidationError::MissingStatus {
                grant_id: grant_id.clone(),
            })?;

        if raw.max_amount > 0 && raw.min_amount > raw.max_amount {
            return Err(GrantValidationError::InvertedAmounts {
                grant_id,
                min: raw.min_amount,
                max: raw.max_amount,
            });
        }

        Ok(Grant {
            id: GrantId(grant_id),
            title: raw.title,
            description: raw.description,
            ente_erogatore: raw.ente_erogatore,
            contribution_type: raw
                .contribution_type
                .unwrap_or(ContributionType::FondoPerduto),
            min_amount: raw.min_amount,
            max_amount: raw.max_amount,
            eligible_sectors,
            eligible_regions,
            eligible_company_sizes,
            eligible_investment_goals,
            opening_date: raw.opening_date,
            closing_date: raw.closing_date,
            status,
            official_url: raw.official_url.filter(|url| !url.trim().is_empty()),
        })
    }
}
