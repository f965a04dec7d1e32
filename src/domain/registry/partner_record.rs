// ============================================================
// PARTNER RECORD TYPES
// ============================================================
// Rows read from the registry extract, before and after cleaning

use super::MISSING_VALUE;

/// A row as read from the file, already decoded to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Data row position (0-based, blank lines not counted)
    pub index: usize,

    /// Raw company identifier field
    pub company_id: String,

    /// Raw partner name field, `None` when the row is too short
    pub partner_name: Option<String>,
}

/// A cleaned partner row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerRecord {
    /// Data row position (0-based)
    pub index: usize,

    /// Company identifier, digits only
    pub company_id: String,

    /// Cleaned partner name; `None` when the source row had no name field
    pub partner_name: Option<String>,
}

impl PartnerRecord {
    pub fn new(index: usize, company_id: String, partner_name: Option<String>) -> Self {
        Self {
            index,
            company_id,
            partner_name,
        }
    }

    /// Grouping key used for duplicate detection.
    pub fn name_key(&self) -> Option<&str> {
        self.partner_name.as_deref()
    }

    /// Name as shown in the rendered table
    pub fn display_name(&self) -> &str {
        self.partner_name.as_deref().unwrap_or(MISSING_VALUE)
    }
}

/// Outcome of scanning the sample for repeated partners
#[derive(Debug, Clone)]
pub struct DuplicateReport {
    /// Number of rows loaded from the file
    pub rows_read: usize,

    /// Every row whose cleaned name repeats, in file order
    pub duplicates: Vec<PartnerRecord>,

    /// Distinct (company, partner) rows selected for the prompt
    pub sample: Vec<PartnerRecord>,

    /// Plain-text rendering of `sample`
    pub table: String,
}

impl DuplicateReport {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }
}
