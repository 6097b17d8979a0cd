//! Filesystem capabilities
//!
//! Resource failures (missing files, permission errors) are converted to
//! result strings so the agent reports them conversationally instead of
//! aborting the dispatch.

use aura_core::{ActionDescriptor, Capability, DispatchContext, Error, Params, Result};
use regex::Regex;
use serde_json::json;
use tracing::debug;

fn missing(action: &str, param: &str) -> Error {
    Error::InvalidParameters {
        action: action.to_string(),
        missing: vec![param.to_string()],
    }
}

// ============================================================================
// create_file
// ============================================================================

/// Creates an empty file at the specified path
pub struct CreateFile {
    descriptor: ActionDescriptor,
}

impl CreateFile {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "create_file",
                "Creates an empty file at the specified path",
            )
            .with_required("filepath")
            .with_example(
                "create a file named report.txt",
                json!({"action": "create_file", "parameters": {"filepath": "report.txt"}}),
            ),
        }
    }
}

impl Default for CreateFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for CreateFile {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let filepath =
            crate::str_param(params, "filepath").ok_or_else(|| missing("create_file", "filepath"))?;

        match tokio::fs::File::create(&filepath).await {
            Ok(_) => Ok(format!("Successfully created file: {filepath}")),
            Err(e) => Ok(format!("Error creating file: {e}")),
        }
    }
}

// ============================================================================
// write_to_file
// ============================================================================

/// Writes content to a file, overwriting it if it exists
pub struct WriteToFile {
    descriptor: ActionDescriptor,
}

impl WriteToFile {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "write_to_file",
                "Writes content to a file, overwriting it if it exists",
            )
            .with_required("filepath")
            .with_required("content")
            .with_example(
                "write 'hello world' to the file notes.txt",
                json!({"action": "write_to_file", "parameters": {"filepath": "notes.txt", "content": "hello world"}}),
            ),
        }
    }
}

impl Default for WriteToFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for WriteToFile {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let filepath = crate::str_param(params, "filepath")
            .ok_or_else(|| missing("write_to_file", "filepath"))?;
        let content =
            crate::str_param(params, "content").ok_or_else(|| missing("write_to_file", "content"))?;

        match tokio::fs::write(&filepath, content).await {
            Ok(()) => Ok(format!("Successfully wrote to file: {filepath}")),
            Err(e) => Ok(format!("Error writing to file: {e}")),
        }
    }
}

// ============================================================================
// read_file
// ============================================================================

/// Reads the content of a file
pub struct ReadFile {
    descriptor: ActionDescriptor,
}

impl ReadFile {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new("read_file", "Reads the content of a file")
                .with_required("filepath")
                .with_example(
                    "read the file notes.txt",
                    json!({"action": "read_file", "parameters": {"filepath": "notes.txt"}}),
                ),
        }
    }
}

impl Default for ReadFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for ReadFile {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let filepath =
            crate::str_param(params, "filepath").ok_or_else(|| missing("read_file", "filepath"))?;

        match tokio::fs::read_to_string(&filepath).await {
            Ok(content) => Ok(format!("Content of {filepath}:\n{content}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(format!("Error: File not found at '{filepath}'"))
            }
            Err(e) => Ok(format!("Error reading file: {e}")),
        }
    }
}

// ============================================================================
// delete_file
// ============================================================================

/// Deletes a file at the specified path
pub struct DeleteFile {
    descriptor: ActionDescriptor,
}

impl DeleteFile {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new("delete_file", "Deletes a file at the specified path")
                .with_required("filepath"),
        }
    }
}

impl Default for DeleteFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for DeleteFile {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let filepath =
            crate::str_param(params, "filepath").ok_or_else(|| missing("delete_file", "filepath"))?;

        match tokio::fs::remove_file(&filepath).await {
            Ok(()) => Ok(format!("Successfully deleted file: {filepath}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(format!("Error: File not found at '{filepath}'"))
            }
            Err(e) => Ok(format!("Error deleting file: {e}")),
        }
    }
}

// ============================================================================
// list_files
// ============================================================================

/// Lists all files and directories in a specified directory
pub struct ListFiles {
    descriptor: ActionDescriptor,
}

impl ListFiles {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "list_files",
                "Lists all files and directories in a specified directory",
            )
            .with_optional("directory")
            .with_example(
                "list all files in the current directory",
                json!({"action": "list_files", "parameters": {}}),
            ),
        }
    }
}

impl Default for ListFiles {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for ListFiles {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let directory = crate::str_param(params, "directory").unwrap_or_else(|| ".".to_string());

        let mut entries = match tokio::fs::read_dir(&directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(format!("Error: Directory not found at '{directory}'"));
            }
            Err(e) => return Ok(format!("Error listing files: {e}")),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::ActionExecution {
                action: "list_files".to_string(),
                message: e.to_string(),
            })?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        if names.is_empty() {
            return Ok("The directory is empty.".to_string());
        }
        names.sort();
        Ok(format!("Files in directory:\n{}", names.join("\n")))
    }
}

// ============================================================================
// search_files
// ============================================================================

/// Searches a directory for file names matching a pattern
pub struct SearchFiles {
    descriptor: ActionDescriptor,
}

impl SearchFiles {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "search_files",
                "Searches a directory for file names matching a pattern",
            )
            .with_required("pattern")
            .with_optional("directory")
            .with_example(
                "find files with report in the name",
                json!({"action": "search_files", "parameters": {"pattern": "report"}}),
            ),
        }
    }
}

impl Default for SearchFiles {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for SearchFiles {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let pattern =
            crate::str_param(params, "pattern").ok_or_else(|| missing("search_files", "pattern"))?;
        let directory = crate::str_param(params, "directory").unwrap_or_else(|| ".".to_string());

        // Treat the pattern as a literal substring when it is not valid regex.
        let matcher = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(_) => {
                debug!(%pattern, "pattern is not valid regex, matching literally");
                Regex::new(&regex::escape(&pattern)).map_err(|e| Error::ActionExecution {
                    action: "search_files".to_string(),
                    message: e.to_string(),
                })?
            }
        };

        let mut entries = match tokio::fs::read_dir(&directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(format!("Error: Directory not found at '{directory}'"));
            }
            Err(e) => return Ok(format!("Error searching files: {e}")),
        };

        let mut matches = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::ActionExecution {
                action: "search_files".to_string(),
                message: e.to_string(),
            })?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if matcher.is_match(&name) {
                matches.push(name);
            }
        }

        if matches.is_empty() {
            return Ok(format!("No files matching '{pattern}' were found."));
        }
        matches.sort();
        Ok(format!("Files matching '{pattern}':\n{}", matches.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: serde_json::Value) -> Params {
        value.as_object().unwrap().clone()
    }

    fn ctx() -> DispatchContext {
        DispatchContext::new()
    }

    #[tokio::test]
    async fn test_create_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let path_str = path.to_str().unwrap();

        let result = CreateFile::new()
            .invoke(&params(serde_json::json!({"filepath": path_str})), &ctx())
            .await
            .unwrap();
        assert_eq!(result, format!("Successfully created file: {path_str}"));

        let result = ReadFile::new()
            .invoke(&params(serde_json::json!({"filepath": path_str})), &ctx())
            .await
            .unwrap();
        assert_eq!(result, format!("Content of {path_str}:\n"));
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let path_str = path.to_str().unwrap();
        std::fs::write(&path, "old").unwrap();

        WriteToFile::new()
            .invoke(
                &params(serde_json::json!({"filepath": path_str, "content": "hello world"})),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[tokio::test]
    async fn test_read_missing_file_reports_not_found() {
        let result = ReadFile::new()
            .invoke(
                &params(serde_json::json!({"filepath": "/no/such/file.txt"})),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result, "Error: File not found at '/no/such/file.txt'");
    }

    #[tokio::test]
    async fn test_delete_missing_file_reports_not_found() {
        let result = DeleteFile::new()
            .invoke(
                &params(serde_json::json!({"filepath": "/no/such/file.txt"})),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result, "Error: File not found at '/no/such/file.txt'");
    }

    #[tokio::test]
    async fn test_list_files_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = ListFiles::new()
            .invoke(
                &params(serde_json::json!({"directory": dir.path().to_str().unwrap()})),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result, "The directory is empty.");
    }

    #[tokio::test]
    async fn test_list_files_names_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();

        let result = ListFiles::new()
            .invoke(
                &params(serde_json::json!({"directory": dir.path().to_str().unwrap()})),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result, "Files in directory:\na.txt\nb.txt");
    }

    #[tokio::test]
    async fn test_search_files_matches_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report_q1.txt"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let result = SearchFiles::new()
            .invoke(
                &params(serde_json::json!({
                    "pattern": "report",
                    "directory": dir.path().to_str().unwrap()
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result, "Files matching 'report':\nreport_q1.txt");
    }

    #[tokio::test]
    async fn test_search_files_invalid_regex_matches_literally() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data(1.txt"), "").unwrap();

        let result = SearchFiles::new()
            .invoke(
                &params(serde_json::json!({
                    "pattern": "data(1",
                    "directory": dir.path().to_str().unwrap()
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert!(result.contains("data(1.txt"));
    }

    #[tokio::test]
    async fn test_missing_required_param_is_an_error() {
        let err = CreateFile::new()
            .invoke(&params(serde_json::json!({})), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters { .. }));
    }
}
