// Adapters layer: concrete implementations for the outside world
// (text ingestion, export formats, the insight API).

pub mod export;
pub mod ingest;
pub mod insights;
