use crate::error::ExtractionError;
use crate::extract::SheetSource;
use crate::layout::template;
use crate::layout::Range;
use crate::layout::RegionDescriptor;
use crate::record::Section;
use crate::record::Value;
use crate::region::unique_name;
use crate::region::unnamed_column;
use crate::region::value_to_name;
use crate::spreadsheet::reference::index_to_reference;
use tracing::info;

pub(super) fn extract_section(source: &mut SheetSource, section: Section) -> Result<Vec<Value>, ExtractionError> {
    match section {
        Section::BasicInfo => plain(source, &template::BASIC_INFO),
        Section::Turnover => without_blank_rows(source, &template::TURNOVER),
        Section::RiskAssessment => plain(source, &template::RISK_ASSESSMENT),
        Section::FinancialAnalysis => financial_analysis(source),
        Section::Proposal => plain(source, &template::PROPOSAL),
        Section::Creditworthiness => creditworthiness(source),
        Section::CreditHistory => credit_history(source),
        Section::LegalDisputes => whole_sheet(source, section, &template::LEGAL_DISPUTES),
        Section::FinancialSummary => financial_summary(source),
        Section::RelatedParties => plain(source, &template::RELATED_PARTIES),
        Section::BlockageHistory => whole_sheet(source, section, &template::BLOCKAGE_HISTORY),
    }
}

fn plain(source: &mut SheetSource, descriptor: &RegionDescriptor) -> Result<Vec<Value>, ExtractionError> {
    Ok(source.read(descriptor)?.into_records())
}

fn without_blank_rows(source: &mut SheetSource, descriptor: &RegionDescriptor) -> Result<Vec<Value>, ExtractionError> {
    let mut table = source.read(descriptor)?;
    table.drop_blank_rows();
    Ok(table.into_records())
}

/// The attribute column has no header; it is renamed from its positional name.
fn financial_analysis(source: &mut SheetSource) -> Result<Vec<Value>, ExtractionError> {
    let descriptor = &template::FINANCIAL_ANALYSIS;
    let mut table = source.read(descriptor)?;
    let first_col = first_column(descriptor)?;
    table.rename_column(&unnamed_column(first_col), template::ATTRIBUTE);
    Ok(table.into_records())
}

/// One row combining the rating table with the two probe pairs below it.
///
/// Rating columns are named `"<prefix> <header>"`, where the prefix is the
/// header of the first column. Each probe contributes `label → value`;
/// a label that repeats an earlier key gets a `.1`, `.2`, … suffix.
fn creditworthiness(source: &mut SheetSource) -> Result<Vec<Value>, ExtractionError> {
    let descriptor = &template::CREDITWORTHINESS;
    let table = source.read(descriptor)?;
    let values = table.rows().first().ok_or_else(|| ExtractionError::RegionRead {
        region: descriptor.to_string(),
        message: "rating row is missing".to_owned(),
    })?;
    let (prefix, columns) = table.columns().split_first().ok_or_else(|| ExtractionError::RegionRead {
        region: descriptor.to_string(),
        message: "rating table has no columns".to_owned(),
    })?;
    let mut entries: Vec<(String, Value)> = columns
        .iter()
        .zip(values.iter().skip(1))
        .map(|(column, value)| (format!("{prefix} {column}"), value.clone()))
        .collect();

    for probe in &template::CREDITWORTHINESS_PROBES {
        let table = source.read(probe)?;
        let (label, value) = match table.rows().first().map(Vec::as_slice) {
            Some([label, value]) => (label, value),
            _ => Err(ExtractionError::RegionRead {
                region: probe.to_string(),
                message: "probe row is missing".to_owned(),
            })?,
        };
        let label = value_to_name(label).ok_or_else(|| ExtractionError::RegionRead {
            region: probe.to_string(),
            message: "label cell is blank".to_owned(),
        })?;
        let label = unique_name(&label, |candidate| entries.iter().any(|(key, _)| key == candidate));
        entries.push((label, value.clone()));
    }
    Ok(vec![Value::Map(entries)])
}

fn credit_history(source: &mut SheetSource) -> Result<Vec<Value>, ExtractionError> {
    let descriptor = &template::CREDIT_HISTORY;
    let mut table = source.read(descriptor)?;
    table.drop_blank_rows();
    if table.is_empty() {
        let first = index_to_reference(descriptor.skip, first_column(descriptor)?);
        info!(section = %Section::CreditHistory, first = %first, "credit history table is empty");
    }
    Ok(table.into_records())
}

/// Sheets that hold a single table; an empty sheet means an empty table.
fn whole_sheet(source: &mut SheetSource, section: Section, descriptor: &RegionDescriptor) -> Result<Vec<Value>, ExtractionError> {
    if source.sheet(&descriptor.sheet)?.is_empty() {
        info!(section = %section, sheet = %descriptor.sheet, "{} table is empty", section.description());
        return Ok(Vec::new());
    }
    let records = source.read(descriptor)?.into_records();
    if records.is_empty() {
        info!(section = %section, sheet = %descriptor.sheet, "{} table is empty", section.description());
    }
    Ok(records)
}

/// Spacer columns of the summary sheet carry no header and are dropped.
fn financial_summary(source: &mut SheetSource) -> Result<Vec<Value>, ExtractionError> {
    let mut table = source.read(&template::FINANCIAL_SUMMARY)?;
    table.drop_columns(|name| name.starts_with("Unnamed"));
    Ok(table.into_records())
}

fn first_column(descriptor: &RegionDescriptor) -> Result<usize, ExtractionError> {
    descriptor
        .range()
        .map(|range: Range| range.col_lower_bound.unwrap_or(0))
        .map_err(|e| ExtractionError::RegionRead {
            region: descriptor.to_string(),
            message: e.to_string(),
        })
}
