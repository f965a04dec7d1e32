// ============================================================
// SCAN CONFIGURATION
// ============================================================
// Where and how much of the registry extract to read

use std::path::PathBuf;

use encoding_rs::Encoding;

/// Labels naming true ISO-8859-1 (bytes map 1:1 to U+0000..U+00FF)
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso88591",
    "iso_8859-1",
    "iso_8859-1:1987",
    "iso-ir-100",
    "latin1",
    "l1",
    "csisolatin1",
    "cp819",
    "ibm819",
];

/// Configuration for a single scan of the registry extract
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Path to the semicolon-delimited extract
    pub input_path: PathBuf,

    /// Field delimiter (default: `;`)
    pub delimiter: u8,

    /// Encoding label understood by `encoding_rs` (default: ISO-8859-1)
    pub encoding: String,

    /// Number of data rows to load (default: 20000)
    pub max_rows: usize,

    /// Number of distinct duplicate rows sent to the model (default: 10)
    pub sample_size: usize,

    /// Column holding the company identifier (default: 0)
    pub company_column: usize,

    /// Column holding the partner name (default: 2)
    pub name_column: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("socios.csv"),
            delimiter: b';',
            encoding: "ISO-8859-1".to_string(),
            max_rows: 20_000,
            sample_size: 10,
            company_column: 0,
            name_column: 2,
        }
    }
}

impl ScanConfig {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Default::default()
        }
    }

    /// Resolve the configured encoding label
    pub fn resolve_encoding(&self) -> Option<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
    }

    /// True when the label names ISO-8859-1 itself rather than windows-1252.
    ///
    /// The WHATWG table folds both into windows-1252, which remaps 0x80..0x9F.
    pub fn is_latin1(&self) -> bool {
        let label = self.encoding.trim().to_ascii_lowercase();
        LATIN1_LABELS.contains(&label.as_str())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rows == 0 {
            return Err("max_rows must be > 0".to_string());
        }
        if self.sample_size == 0 {
            return Err("sample_size must be > 0".to_string());
        }
        if self.company_column == self.name_column {
            return Err("company_column and name_column must differ".to_string());
        }
        if !self.delimiter.is_ascii() {
            return Err("delimiter must be a single ASCII character".to_string());
        }
        if self.resolve_encoding().is_none() {
            return Err(format!("unknown encoding label: {}", self.encoding));
        }
        Ok(())
    }
}
