use std::fmt;
use videosplus_api_client::ServiceError;

/// Every check the harness knows about, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    Environment,
    ServerConnection,
    StorageBackup,
    VideosApi,
    UsersApi,
    SiteConfig,
    StaticFiles,
    SignedUrls,
    Upload,
    /// Abbreviated check used by quick runs: health and site config both answer.
    OverallStatus,
}

impl CheckId {
    /// Checks of a full run.
    pub const FULL: [CheckId; 9] = [
        CheckId::Environment,
        CheckId::ServerConnection,
        CheckId::StorageBackup,
        CheckId::VideosApi,
        CheckId::UsersApi,
        CheckId::SiteConfig,
        CheckId::StaticFiles,
        CheckId::SignedUrls,
        CheckId::Upload,
    ];

    /// Checks of a quick run.
    pub const QUICK: [CheckId; 3] = [
        CheckId::Environment,
        CheckId::ServerConnection,
        CheckId::OverallStatus,
    ];

    /// Name shown in reports. These are the names operators already know.
    pub fn label(self) -> &'static str {
        match self {
            CheckId::Environment => "Variáveis de Ambiente",
            CheckId::ServerConnection => "Conexão com Servidor",
            CheckId::StorageBackup => "Conexão com Wasabi",
            CheckId::VideosApi => "API de Vídeos",
            CheckId::UsersApi => "API de Usuários",
            CheckId::SiteConfig => "Configuração do Site",
            CheckId::StaticFiles => "Arquivos Estáticos",
            CheckId::SignedUrls => "URLs Assinadas Wasabi",
            CheckId::Upload => "Upload Wasabi",
            CheckId::OverallStatus => "Status Geral",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("PASS"),
            Outcome::Fail => f.write_str("FAIL"),
        }
    }
}

/// Why a check did not pass.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The service answered, but not with what was expected.
    #[error("{0}")]
    Assertion(String),

    /// The service could not be asked at all, or refused.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CheckError {
    pub fn assertion(message: impl Into<String>) -> Self {
        CheckError::Assertion(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub id: CheckId,
    pub outcome: Outcome,
    pub message: Option<String>,
}

impl CheckResult {
    pub fn pass(id: CheckId, message: Option<String>) -> Self {
        Self {
            id,
            outcome: Outcome::Pass,
            message,
        }
    }

    pub fn fail(id: CheckId, message: impl Into<String>) -> Self {
        Self {
            id,
            outcome: Outcome::Fail,
            message: Some(message.into()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.label()
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_quick_sets_start_with_the_same_two_checks() {
        assert_eq!(CheckId::FULL[..2], CheckId::QUICK[..2]);
        assert!(!CheckId::FULL.contains(&CheckId::OverallStatus));
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = CheckId::FULL.iter().map(|c| c.label()).collect();
        labels.push(CheckId::OverallStatus.label());
        let count = labels.len();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), count);
    }
}
