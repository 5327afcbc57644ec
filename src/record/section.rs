use std::fmt::Display;
use std::fmt::Formatter;

/// The named parts of a client record, in output order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    BasicInfo,
    Turnover,
    RiskAssessment,
    FinancialAnalysis,
    Proposal,
    Creditworthiness,
    CreditHistory,
    LegalDisputes,
    FinancialSummary,
    RelatedParties,
    BlockageHistory,
}

impl Section {
    /// Every section, in the order keys appear in the record.
    pub const ALL: [Section; 11] = [
        Section::BasicInfo,
        Section::Turnover,
        Section::RiskAssessment,
        Section::FinancialAnalysis,
        Section::Proposal,
        Section::Creditworthiness,
        Section::CreditHistory,
        Section::LegalDisputes,
        Section::FinancialSummary,
        Section::RelatedParties,
        Section::BlockageHistory,
    ];

    /// Key of the section in the output record. Downstream prompt text refers
    /// to these names verbatim.
    pub const fn key(&self) -> &'static str {
        match self {
            Section::BasicInfo => "osnovne_informacije",
            Section::Turnover => "prometRSD",
            Section::RiskAssessment => "ocena_rizika",
            Section::FinancialAnalysis => "finansijska_analizaEUR",
            Section::Proposal => "predlogRSD",
            Section::Creditworthiness => "bonitetna_ocena",
            Section::CreditHistory => "istorijaKL",
            Section::LegalDisputes => "sudski sporovi",
            Section::FinancialSummary => "rezimeEUR",
            Section::RelatedParties => "povezana_lica",
            Section::BlockageHistory => "istorija_blokada",
        }
    }

    /// Human-readable name used in log messages.
    pub const fn description(&self) -> &'static str {
        match self {
            Section::BasicInfo => "basic info",
            Section::Turnover => "turnover",
            Section::RiskAssessment => "risk assessment",
            Section::FinancialAnalysis => "financial analysis",
            Section::Proposal => "proposal",
            Section::Creditworthiness => "creditworthiness history",
            Section::CreditHistory => "credit history",
            Section::LegalDisputes => "legal disputes",
            Section::FinancialSummary => "financial summary",
            Section::RelatedParties => "related parties",
            Section::BlockageHistory => "blockage history",
        }
    }

    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|section| section.key() == key)
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
