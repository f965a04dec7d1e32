use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::registry::{PartnerRecord, RawRecord};

static NON_DIGIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").unwrap());

static NON_NAME_CHAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]+").unwrap());

static DIGIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

/// Keep only the digits of a company identifier
pub fn clean_company_id(raw: &str) -> String {
    NON_DIGIT_PATTERN.replace_all(raw, "").into_owned()
}

/// Normalize a partner name into its grouping key
pub fn clean_partner_name(raw: &str) -> String {
    // Accented letters fall outside a-zA-Z and are dropped too
    let letters = NON_NAME_CHAR_PATTERN.replace_all(raw, "");
    let without_digits = DIGIT_PATTERN.replace_all(&letters, "");
    without_digits.trim().to_string()
}

pub fn clean_record(raw: &RawRecord) -> PartnerRecord {
    PartnerRecord::new(
        raw.index,
        clean_company_id(&raw.company_id),
        raw.partner_name.as_deref().map(clean_partner_name),
    )
}

pub fn clean_records(raw: &[RawRecord]) -> Vec<PartnerRecord> {
    raw.iter().map(clean_record).collect()
}
