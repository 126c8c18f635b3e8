use std::path::PathBuf;

/// Directory containing the event data fixtures used in tests
pub fn get_test_data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data")
}
