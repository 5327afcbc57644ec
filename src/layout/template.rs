//! Region layout of the credit-application template.
//!
//! The primary sheet stacks several small tables at fixed offsets; the
//! auxiliary sheets each hold one table. Offsets count 0-based rows, so
//! `skip: 4` starts reading at Excel row 5.
use crate::layout::descriptor::Header;
use crate::layout::descriptor::RegionDescriptor;
use crate::layout::descriptor::RowLimit;
use crate::record::Section;
use crate::spreadsheet::SheetRef;

pub const PRIMARY_SHEET: SheetRef = SheetRef::Index(0);
pub const LEGAL_DISPUTES_SHEET: SheetRef = SheetRef::Name("Sudski sporovi");
pub const FINANCIAL_SUMMARY_SHEET: SheetRef = SheetRef::Name("Rezime");
pub const RELATED_PARTIES_SHEET: SheetRef = SheetRef::Name("Povezana lica");
pub const BLOCKAGE_HISTORY_SHEET: SheetRef = SheetRef::Name("Istorija blokada");

pub const ATTRIBUTE: &str = "Atribut";
pub const VALUE: &str = "Vrednost";

pub const BASIC_INFO: RegionDescriptor = RegionDescriptor {
    sheet: PRIMARY_SHEET,
    range: "E:F",
    skip: 4,
    header: Header::None,
    limit: RowLimit::Rows(12),
    names: &[ATTRIBUTE, VALUE],
};

pub const TURNOVER: RegionDescriptor = RegionDescriptor {
    sheet: PRIMARY_SHEET,
    range: "E:F",
    skip: 18,
    header: Header::None,
    limit: RowLimit::Rows(29),
    names: &[ATTRIBUTE, "Vrednost RSD bez PDV"],
};

pub const RISK_ASSESSMENT: RegionDescriptor = RegionDescriptor {
    sheet: PRIMARY_SHEET,
    range: "I:J",
    skip: 9,
    header: Header::None,
    limit: RowLimit::Rows(10),
    names: &[ATTRIBUTE, VALUE],
};

pub const FINANCIAL_ANALYSIS: RegionDescriptor = RegionDescriptor {
    sheet: PRIMARY_SHEET,
    range: "I:N",
    skip: 26,
    header: Header::Row(0),
    limit: RowLimit::Rows(21),
    names: &[],
};

pub const PROPOSAL: RegionDescriptor = RegionDescriptor {
    sheet: PRIMARY_SHEET,
    range: "E:F",
    skip: 50,
    header: Header::None,
    limit: RowLimit::Rows(6),
    names: &[ATTRIBUTE, "Vrednost RSD"],
};

/// Rating table: a prefix column followed by three labeled rating columns.
pub const CREDITWORTHINESS: RegionDescriptor = RegionDescriptor {
    sheet: PRIMARY_SHEET,
    range: "L:O",
    skip: 7,
    header: Header::Row(1),
    limit: RowLimit::Rows(1),
    names: &[],
};

/// Label/value cell pairs read below the rating table.
pub const CREDITWORTHINESS_PROBES: [RegionDescriptor; 2] = [
    RegionDescriptor {
        sheet: PRIMARY_SHEET,
        range: "L11:M11",
        skip: 0,
        header: Header::None,
        limit: RowLimit::Rows(1),
        names: &["label", "value"],
    },
    RegionDescriptor {
        sheet: PRIMARY_SHEET,
        range: "L12:M12",
        skip: 0,
        header: Header::None,
        limit: RowLimit::Rows(1),
        names: &["label", "value"],
    },
];

pub const CREDIT_HISTORY: RegionDescriptor = RegionDescriptor {
    sheet: PRIMARY_SHEET,
    range: "I:K",
    skip: 52,
    header: Header::Row(0),
    limit: RowLimit::All,
    names: &[],
};

pub const LEGAL_DISPUTES: RegionDescriptor = RegionDescriptor {
    sheet: LEGAL_DISPUTES_SHEET,
    range: "",
    skip: 0,
    header: Header::Row(0),
    limit: RowLimit::All,
    names: &[],
};

pub const FINANCIAL_SUMMARY: RegionDescriptor = RegionDescriptor {
    sheet: FINANCIAL_SUMMARY_SHEET,
    range: "B:G",
    skip: 3,
    header: Header::Row(0),
    limit: RowLimit::Rows(30),
    names: &[],
};

pub const RELATED_PARTIES: RegionDescriptor = RegionDescriptor {
    sheet: RELATED_PARTIES_SHEET,
    range: "A:D",
    skip: 0,
    header: Header::Row(0),
    limit: RowLimit::All,
    names: &[],
};

pub const BLOCKAGE_HISTORY: RegionDescriptor = RegionDescriptor {
    sheet: BLOCKAGE_HISTORY_SHEET,
    range: "",
    skip: 0,
    header: Header::Row(0),
    limit: RowLimit::All,
    names: &[],
};

/// Sheet a section is read from.
pub const fn sheet_of(section: Section) -> SheetRef {
    match section {
        Section::LegalDisputes => LEGAL_DISPUTES_SHEET,
        Section::FinancialSummary => FINANCIAL_SUMMARY_SHEET,
        Section::RelatedParties => RELATED_PARTIES_SHEET,
        Section::BlockageHistory => BLOCKAGE_HISTORY_SHEET,
        _ => PRIMARY_SHEET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::range::RangeError;

    #[test]
    fn every_descriptor_parses() -> Result<(), RangeError> {
        let descriptors = [
            &BASIC_INFO, &TURNOVER, &RISK_ASSESSMENT, &FINANCIAL_ANALYSIS, &PROPOSAL,
            &CREDITWORTHINESS, &CREDITWORTHINESS_PROBES[0], &CREDITWORTHINESS_PROBES[1],
            &CREDIT_HISTORY, &LEGAL_DISPUTES, &FINANCIAL_SUMMARY, &RELATED_PARTIES, &BLOCKAGE_HISTORY,
        ];
        for descriptor in descriptors {
            let range = descriptor.range()?;
            if descriptor.header == Header::None {
                let width = range.col_upper_bound.zip(range.col_lower_bound).map(|(upper, lower)| upper - lower + 1);
                assert_eq!(width, Some(descriptor.names.len()), "{descriptor}");
            }
        }
        Ok(())
    }

    #[test]
    fn probes_pin_single_rows() -> Result<(), RangeError> {
        let rows: Vec<_> = CREDITWORTHINESS_PROBES
            .iter()
            .map(|probe| probe.range().map(|range| (range.row_lower_bound, range.row_upper_bound)))
            .collect::<Result<_, _>>()?;
        assert_eq!(rows, vec![(Some(10), Some(10)), (Some(11), Some(11))]);
        Ok(())
    }

    #[test]
    fn descriptors_display_their_location() {
        assert_eq!(BASIC_INFO.to_string(), "#0!E:F");
        assert_eq!(LEGAL_DISPUTES.to_string(), "'Sudski sporovi'");
    }
}
