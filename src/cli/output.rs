//! Output formatting for CLI

use crate::result::FileResult;

/// Format a result as pretty-printed JSON
pub fn format_json_output(result: &FileResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Format a result for humans
pub fn format_pretty_output(result: &FileResult) -> String {
    let mut output = String::new();

    if result.success {
        output.push_str(&format!("✅ {}\n", result.msg));
    } else {
        output.push_str(&format!("❌ {}\n", result.msg));
        if let Some(kind) = result.kind {
            output.push_str(&format!("  Kind: {:?}\n", kind));
        }
    }

    if let Some(path) = &result.path {
        output.push_str(&format!("  Path: {}\n", path));
    }
    if result.success {
        output.push_str(&format!("  Exists: {}\n", result.exists));
    }
    if let Some(url) = &result.url {
        output.push_str(&format!("  URL: {}\n", url));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[test]
    fn test_pretty_success() {
        let result = FileResult::ok("file saved")
            .with_path("a/b.jpg")
            .with_url("http://127.0.0.1/a/b.jpg")
            .with_exists(true);
        let output = format_pretty_output(&result);
        assert!(output.starts_with("✅ file saved"));
        assert!(output.contains("  Path: a/b.jpg\n"));
        assert!(output.contains("  URL: http://127.0.0.1/a/b.jpg\n"));
        assert!(output.contains("  Exists: true\n"));
    }

    #[test]
    fn test_pretty_failure() {
        let result = FileResult::failure(&StorageError::DuplicateFile("a.txt".to_string()));
        let output = format_pretty_output(&result);
        assert!(output.starts_with("❌ file already exists"));
        assert!(output.contains("Kind: DuplicateFile"));
        assert!(!output.contains("Exists"));
    }

    #[test]
    fn test_json_output() {
        let output = format_json_output(&FileResult::existence("x.txt", false));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["exists"], false);
        assert_eq!(value["path"], "x.txt");
    }
}
