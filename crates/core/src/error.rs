#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("there is no patient with id: '{0}'")]
    PatientNotFound(i64),
    #[error("failed to serialize session value: {0}")]
    SessionSerialization(serde_json::Error),
    #[error("failed to read seed file: {0}")]
    SeedRead(std::io::Error),
    #[error("failed to parse seed file: {0}")]
    SeedParse(serde_json::Error),
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
