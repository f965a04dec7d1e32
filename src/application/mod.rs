pub mod use_cases;

pub use use_cases::partner_analysis::{build_prompt, PartnerAnalysisUseCase};
