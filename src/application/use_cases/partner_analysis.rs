// ============================================================
// PARTNER ANALYSIS USE CASE
// ============================================================
// Read the extract, find repeated partners, and ask the model about them

use std::sync::Arc;

use tracing::info;

use crate::application::use_cases::duplicate_finder::{distinct_pairs, find_duplicates};
use crate::application::use_cases::name_cleaning::clean_records;
use crate::application::use_cases::table_renderer::render_table;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::registry::{DuplicateReport, ScanConfig};
use crate::infrastructure::csv::RegistryReader;
use crate::infrastructure::llm_clients::LLMClient;

const TABLE_TITLE: &str = "Tabela de sócios com CNPJs:";

pub struct PartnerAnalysisUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl PartnerAnalysisUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// Scan the first rows of the extract. `None` means no partner repeats.
    pub fn analyze(&self, config: &ScanConfig) -> Result<Option<DuplicateReport>> {
        let reader = RegistryReader::from_config(config)?;
        let raw = reader.read_file(config)?;
        let records = clean_records(&raw);

        let duplicates = find_duplicates(&records);
        if duplicates.is_empty() {
            info!(rows = records.len(), "No repeated partners in sample");
            return Ok(None);
        }

        let sample = distinct_pairs(&duplicates, config.sample_size);
        let table = render_table(&sample);

        info!(
            rows = records.len(),
            duplicates = duplicates.len(),
            sample = sample.len(),
            "Found repeated partners"
        );

        Ok(Some(DuplicateReport {
            rows_read: records.len(),
            duplicates,
            sample,
            table,
        }))
    }

    /// Send one prompt to the model and return its reply unchanged
    pub async fn ask(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        if !config.has_api_key() {
            return Err(AppError::MissingCredential(
                "no API key configured for the model".to_string(),
            ));
        }

        info!(model = %config.model, prompt_chars = prompt.chars().count(), "Requesting analysis");
        self.llm_client.generate(config, "", prompt).await
    }
}

pub fn build_prompt(table: &str, question: &str) -> String {
    format!("{}\n\n{}\n\n{}", TABLE_TITLE, table, question)
}
