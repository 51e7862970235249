//! Tool names and argument shapes shared by the MCP server and client.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const LIST_FILES: &str = "list_files";
pub const READ_TEXT_FILE: &str = "read_text_file";
pub const CREATE_TEXT_FILE: &str = "create_text_file";
pub const CREATE_MARKDOWN_FILE: &str = "create_markdown_file";
pub const READ_CSV_STATS: &str = "read_csv_stats";

pub const TOOL_NAMES: [&str; 5] = [
    LIST_FILES,
    READ_TEXT_FILE,
    CREATE_TEXT_FILE,
    CREATE_MARKDOWN_FILE,
    READ_CSV_STATS,
];

fn default_dir() -> String {
    ".".to_string()
}

fn default_preview_rows() -> usize {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListFilesRequest {
    /// Directory relative to the sandbox root, e.g. "." or "reports"
    #[serde(default = "default_dir")]
    pub dir_path: String,
    /// Walk subdirectories as well
    #[serde(default)]
    pub recursive: bool,
    /// Include entries whose name starts with "."
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadFileRequest {
    /// File path relative to the sandbox root
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateFileRequest {
    /// File path relative to the sandbox root; missing parent folders are created
    pub file_path: String,
    /// Full UTF-8 content of the file
    pub content: String,
    /// Replace the file if it already exists
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadCsvRequest {
    /// CSV path relative to the sandbox root
    pub file_path: String,
    /// Maximum number of rows included in the preview
    #[serde(default = "default_preview_rows")]
    pub max_rows_preview: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tool_contract() {
        let list: ListFilesRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(list.dir_path, ".");
        assert!(!list.recursive);
        assert!(!list.include_hidden);

        let csv: ReadCsvRequest = serde_json::from_str(r#"{"file_path":"a.csv"}"#).unwrap();
        assert_eq!(csv.max_rows_preview, 50);

        let create: CreateFileRequest =
            serde_json::from_str(r#"{"file_path":"a.txt","content":"x"}"#).unwrap();
        assert!(!create.overwrite);
    }
}
