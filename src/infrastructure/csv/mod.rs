// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Bounded, encoding-aware reading of the registry extract

mod registry_reader;

pub use registry_reader::RegistryReader;
