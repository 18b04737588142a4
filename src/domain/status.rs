use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a document, model or medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Nothing is known about the resource yet.
    #[default]
    Uninitialized,
    /// Registered, nothing loaded.
    Initialized,
    /// A fetch is in flight.
    Loading,
    /// Content has been received.
    Ready,
    /// The last fetch failed.
    Error,
}

impl Status {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// The lifecycle is monotonic except for retry, which moves an errored
    /// resource back to `Loading`.
    pub fn can_transition_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Initialized)
                | (Self::Initialized, Self::Loading)
                | (Self::Error, Self::Loading)
                | (Self::Loading, Self::Ready)
                | (Self::Loading, Self::Error)
        )
    }

    /// A resource that is loading or loaded must not be fetched again.
    pub fn needs_fetch(self) -> bool {
        !matches!(self, Self::Loading | Self::Ready)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "UNINITIALIZED"),
            Self::Initialized => write!(f, "INITIALIZED"),
            Self::Loading => write!(f, "LOADING"),
            Self::Ready => write!(f, "READY"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "UNINITIALIZED" => Ok(Self::Uninitialized),
            "INITIALIZED" => Ok(Self::Initialized),
            "LOADING" => Ok(Self::Loading),
            "READY" => Ok(Self::Ready),
            "ERROR" | "ERRED" => Ok(Self::Error),
            other => Err(format!("invalid status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_monotonic_except_retry() {
        assert!(Status::Initialized.can_transition_to(Status::Loading));
        assert!(Status::Loading.can_transition_to(Status::Ready));
        assert!(Status::Loading.can_transition_to(Status::Error));
        assert!(Status::Error.can_transition_to(Status::Loading));

        assert!(!Status::Initialized.can_transition_to(Status::Ready));
        assert!(!Status::Initialized.can_transition_to(Status::Error));
        assert!(!Status::Ready.can_transition_to(Status::Loading));
        assert!(!Status::Ready.can_transition_to(Status::Initialized));
    }

    #[test]
    fn only_idle_statuses_need_fetch() {
        assert!(Status::Initialized.needs_fetch());
        assert!(Status::Error.needs_fetch());
        assert!(!Status::Loading.needs_fetch());
        assert!(!Status::Ready.needs_fetch());
    }

    #[test]
    fn status_display_parse() {
        assert_eq!(Status::Ready.to_string(), "READY");
        assert_eq!(Status::from_str("loading").unwrap(), Status::Loading);
        assert_eq!(Status::from_str("erred").unwrap(), Status::Error);
        assert!(Status::from_str("done").is_err());
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&Status::Uninitialized).unwrap();
        assert_eq!(json, "\"UNINITIALIZED\"");
    }
}
