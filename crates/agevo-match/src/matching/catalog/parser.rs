use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::super::domain::{ContributionType, GrantStatus, RawGrant, UnknownValue};
use super::CatalogImportError;

/// Separator for multi-valued eligibility columns.
const LIST_SEPARATOR: char = ';';

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawGrant>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut grants = Vec::new();

    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = record?;
        // header is line 1
        let line = index + 2;
        grants.push(row.into_raw(line)?);
    }

    Ok(grants)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    ente_erogatore: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contribution_type: Option<String>,
    #[serde(default)]
    min_amount: Option<u64>,
    #[serde(default)]
    max_amount: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    eligible_sectors: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    eligible_regions: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    eligible_company_sizes: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    eligible_investment_goals: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    opening_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    closing_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    official_url: Option<String>,
}

impl CatalogRow {
    fn into_raw(self, line: usize) -> Result<RawGrant, CatalogImportError> {
        let value_error = |source: UnknownValue| CatalogImportError::Value { line, source };

        Ok(RawGrant {
            id: self.id,
            title: self.title,
            description: self.description,
            ente_erogatore: self.ente_erogatore,
            contribution_type: self
                .contribution_type
                .as_deref()
                .map(str::parse::<ContributionType>)
                .transpose()
                .map_err(value_error)?,
            min_amount: self.min_amount.unwrap_or(0),
            max_amount: self.max_amount.unwrap_or(0),
            eligible_sectors: parse_list(self.eligible_sectors.as_deref()).map_err(value_error)?,
            eligible_regions: parse_list(self.eligible_regions.as_deref()).map_err(value_error)?,
            eligible_company_sizes: parse_list(self.eligible_company_sizes.as_deref())
                .map_err(value_error)?,
            eligible_investment_goals: parse_list(self.eligible_investment_goals.as_deref())
                .map_err(value_error)?,
            opening_date: parse_date(line, self.opening_date.as_deref())?,
            closing_date: parse_date(line, self.closing_date.as_deref())?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<GrantStatus>)
                .transpose()
                .map_err(value_error)?,
            official_url: self.official_url,
        })
    }
}

/// An absent column stays `None` so validation can report the missing list.
fn parse_list<T>(raw: Option<&str>) -> Result<Option<Vec<T>>, UnknownValue>
where
    T: FromStr<Err = UnknownValue>,
{
    raw.map(|value| {
        value
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(T::from_str)
            .collect::<Result<Vec<T>, _>>()
    })
    .transpose()
}

fn parse_date(line: usize, raw: Option<&str>) -> Result<Option<NaiveDate>, CatalogImportError> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CatalogImportError::Date {
            line,
            value: value.to_string(),
        })
    })
    .transpose()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::{CompanySize, Region, Sector};
    use std::io::Cursor;

    const HEADER: &str = "id,title,description,ente_erogatore,contribution_type,min_amount,max_amount,eligible_sectors,eligible_regions,eligible_company_sizes,eligible_investment_goals,opening_date,closing_date,status,official_url\n";

    #[test]
    fn rows_split_list_columns() {
        let csv = format!(
            "{HEADER}bando-1,Voucher Digitale,,Regione Lombardia,fondo_perduto,5000,40000,tech; services ,lombardia;emilia-romagna,micro;small,digitalization,2026-01-10,2026-12-31,active,\n"
        );

        let rows = parse_rows(Cursor::new(csv)).expect("rows parse");
        let raw = rows.into_iter().next().expect("one row");
        assert_eq!(
            raw.eligible_sectors,
            Some(vec![Sector::Tech, Sector::Services])
        );
        assert_eq!(
            raw.eligible_regions,
            Some(vec![Region::Lombardia, Region::EmiliaRomagna])
        );
        assert_eq!(
            raw.eligible_company_sizes,
            Some(vec![CompanySize::Micro, CompanySize::Small])
        );
        assert_eq!(raw.max_amount, 40_000);
        assert_eq!(raw.closing_date, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert!(raw.official_url.is_none());
    }

    #[test]
    fn empty_list_column_is_reported_as_missing() {
        let csv = format!("{HEADER}bando-2,Titolo,,Ente,,,,,lazio,small,green,,,,\n");

        let rows = parse_rows(Cursor::new(csv)).expect("rows parse");
        assert!(rows[0].eligible_sectors.is_none());
        assert!(rows[0].closing_date.is_none());
    }

    #[test]
    fn unknown_values_carry_the_line_number() {
        let csv = format!(
            "{HEADER}bando-3,Titolo,,Ente,,,,tech,atlantis,small,green,,,,\n"
        );

        match parse_rows(Cursor::new(csv)) {
            Err(CatalogImportError::Value { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source.kind, "region");
                assert_eq!(source.value, "atlantis");
            }
            other => panic!("expected value error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let csv = format!(
            "{HEADER}bando-4,Titolo,,Ente,,,,tech,lazio,small,green,,31/12/2026,,\n"
        );

        match parse_rows(Cursor::new(csv)) {
            Err(CatalogImportError::Date { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "31/12/2026");
            }
            other => panic!("expected date error, got {other:?}"),
        }
    }
}
