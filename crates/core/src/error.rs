use crate::channels::ChannelKind;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A collaborator outside this process (release butler, database) failed.
    #[error("External service '{service}' failed: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    #[error("Delivery via {channel} failed: {message}")]
    Delivery {
        channel: ChannelKind,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn external(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::ExternalService {
            service,
            message: err.to_string(),
        }
    }

    pub fn delivery(channel: ChannelKind, err: impl std::fmt::Display) -> Self {
        Self::Delivery {
            channel,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = CoreError::NotFound {
            entity: "NotificationConfig",
            id: 7,
        };
        assert_eq!(
            err.to_string(),
            "Entity not found: NotificationConfig with id 7"
        );
    }

    #[test]
    fn display_external_service() {
        let err = CoreError::external("butler", "connection refused");
        assert_eq!(
            err.to_string(),
            "External service 'butler' failed: connection refused"
        );
    }

    #[test]
    fn display_delivery() {
        let err = CoreError::delivery(ChannelKind::Telegram, "chat not found");
        assert_eq!(err.to_string(), "Delivery via telegram failed: chat not found");
    }
}
