// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV file reading with encoding fallback and typed rows

mod csv_parser;

pub use csv_parser::CsvParser;
