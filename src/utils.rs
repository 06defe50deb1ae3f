// src/utils.rs
use chrono::{DateTime, Utc};

/// Normalize an uploaded file name for storage and display
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "uploaded_resume.txt".to_string()
    } else {
        cleaned
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Date formatting used by the resume list endpoint
pub fn format_upload_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my resume.pdf"), "my_resume.pdf");
        assert_eq!(sanitize_file_name("简历.txt"), "简历.txt");
        assert_eq!(sanitize_file_name("a/b\\c.txt"), "a_b_c.txt");
        assert_eq!(sanitize_file_name(""), "uploaded_resume.txt");
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("resume.PDF"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("resume.tar.gz"), Some("gz".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_format_upload_date() {
        let timestamp = Utc.with_ymd_and_hms(2026, 4, 20, 9, 30, 0).unwrap();
        assert_eq!(format_upload_date(timestamp), "2026-04-20");
    }
}
