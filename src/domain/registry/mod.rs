// ============================================================
// REGISTRY DOMAIN LAYER
// ============================================================
// Value types for the partner (sócio) registry extract
// No I/O, no async

mod partner_record;
mod scan_config;

pub use partner_record::{DuplicateReport, PartnerRecord, RawRecord};
pub use scan_config::ScanConfig;

/// Table header for the company identifier column
pub const COMPANY_HEADER: &str = "CNPJ_EMPRESA";

/// Table header for the partner name column
pub const PARTNER_HEADER: &str = "NOME_SOCIO";

/// Rendered in place of a missing partner name
pub const MISSING_VALUE: &str = "NaN";
