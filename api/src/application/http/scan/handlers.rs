pub mod analyze_scan;
pub mod upload_scan;
