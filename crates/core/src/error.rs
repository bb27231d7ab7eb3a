use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcuError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid panel options: {}", format_issues(.0))]
    Validation(Vec<crate::panel::ValidationIssue>),

    #[error("Options migration failed: {0}")]
    Migration(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, EcuError>;

fn format_issues(issues: &[crate::panel::ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
