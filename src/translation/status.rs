/*!
 * Run status and progress records.
 */

use std::fmt;

/// Lifecycle state of a translation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusType {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusType::Idle => "idle",
            StatusType::Processing => "processing",
            StatusType::Success => "success",
            StatusType::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Current status with a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationStatus {
    pub status_type: StatusType,
    pub message: String,
}

impl TranslationStatus {
    pub fn new(status_type: StatusType, message: impl Into<String>) -> Self {
        Self {
            status_type,
            message: message.into(),
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    /// Whether a run is in flight
    pub fn is_processing(&self) -> bool {
        self.status_type == StatusType::Processing
    }

    /// Whether the run has ended (successfully or not)
    pub fn is_finished(&self) -> bool {
        matches!(self.status_type, StatusType::Success | StatusType::Error)
    }
}

/// Progress of the batched resolution phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationProgress {
    /// Texts processed so far
    pub current: usize,
    /// Texts needing translation in this run
    pub total: usize,
    pub message: String,
}

impl TranslationProgress {
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Completion ratio in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}
