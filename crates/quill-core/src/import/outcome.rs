use serde::{Deserialize, Serialize};

use super::error::ImportError;

/// Result of one import attempt, as shown to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub message: String,
    pub imported_count: u64,
}

impl ImportOutcome {
    pub fn succeeded(imported_count: u64) -> Self {
        Self {
            success: true,
            message: format!(
                "The file was processed successfully, {imported_count} posts created"
            ),
            imported_count,
        }
    }

    pub fn failed(error: &ImportError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            imported_count: 0,
        }
    }
}

impl From<Result<u64, ImportError>> for ImportOutcome {
    fn from(result: Result<u64, ImportError>) -> Self {
        match result {
            Ok(count) => Self::succeeded(count),
            Err(error) => Self::failed(&error),
        }
    }
}
