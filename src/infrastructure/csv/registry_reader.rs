// ============================================================
// REGISTRY READER
// ============================================================
// Stream the first N rows of a headerless, single-byte encoded extract

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};

use csv::{ByteRecord, ReaderBuilder, Trim};
use encoding_rs::Encoding;
use tracing::{debug, info};

use crate::domain::error::{AppError, Result};
use crate::domain::registry::{RawRecord, ScanConfig};

/// Reader for the partner registry extract
pub struct RegistryReader {
    /// Field delimiter
    delimiter: u8,

    /// Encoding used to decode each field
    encoding: &'static Encoding,

    /// Decode bytes as ISO-8859-1 code points instead of `encoding`
    latin1: bool,

    /// Maximum number of data rows to load
    max_rows: usize,

    company_column: usize,
    name_column: usize,
}

impl RegistryReader {
    /// Build a reader from a validated scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        config.validate().map_err(|e| {
            AppError::ValidationError(format!("Invalid scan config: {}", e))
        })?;

        let encoding = config.resolve_encoding().ok_or_else(|| {
            AppError::ValidationError(format!("unknown encoding label: {}", config.encoding))
        })?;

        Ok(Self {
            delimiter: config.delimiter,
            encoding,
            latin1: config.is_latin1(),
            max_rows: config.max_rows,
            company_column: config.company_column,
            name_column: config.name_column,
        })
    }

    /// Read the configured input file
    pub fn read_file(&self, config: &ScanConfig) -> Result<Vec<RawRecord>> {
        let path = &config.input_path;
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                AppError::NotFound(format!("partner file {} does not exist", path.display()))
            }
            _ => AppError::IoError(format!("Failed to open {}: {}", path.display(), e)),
        })?;

        info!(path = %path.display(), max_rows = self.max_rows, "Reading registry extract");
        let records = self.read_from(BufReader::new(file))?;
        info!(rows = records.len(), "Loaded registry rows");

        Ok(records)
    }

    /// Read records from any byte source. Stops after `max_rows` data rows.
    pub fn read_from<R: Read>(&self, source: R) -> Result<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .trim(Trim::None)
            .flexible(true) // Allow rows with different lengths
            .from_reader(source);

        let mut records = Vec::new();
        let mut record = ByteRecord::new();

        while records.len() < self.max_rows {
            let has_more = reader.read_byte_record(&mut record).map_err(|e| {
                AppError::ParseError(format!(
                    "Failed to parse row {}: {}",
                    records.len() + 1,
                    e
                ))
            })?;
            if !has_more {
                break;
            }

            let index = records.len();
            records.push(self.decode_record(index, &record));
        }

        debug!(rows = records.len(), "Stopped reading");
        Ok(records)
    }

    fn decode_record(&self, index: usize, record: &ByteRecord) -> RawRecord {
        let company_id = record
            .get(self.company_column)
            .map(|field| self.decode_field(field))
            .unwrap_or_default();
        // An empty name field is a missing value, like an absent column
        let partner_name = record
            .get(self.name_column)
            .filter(|field| !field.is_empty())
            .map(|field| self.decode_field(field));

        RawRecord {
            index,
            company_id,
            partner_name,
        }
    }

    fn decode_field(&self, bytes: &[u8]) -> String {
        if self.latin1 {
            return encoding_rs::mem::decode_latin1(bytes).into_owned();
        }
        let (text, _had_errors) = self.encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }
}
