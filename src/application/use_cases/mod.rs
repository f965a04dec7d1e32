pub mod duplicate_finder;
pub mod name_cleaning;
pub mod partner_analysis;
pub mod table_renderer;
