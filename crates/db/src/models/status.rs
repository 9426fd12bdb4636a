//! Status ids for the `export_job_statuses` lookup table.
//!
//! Variant discriminants match the seed data order (1-based) in the
//! migration. The string labels are what callers see in status queries.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Export job lifecycle status.
///
/// State machine: `Queued -> Active -> {Completed, Failed}`. There are no
/// transitions out of the terminal states.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportJobStatus {
    Queued = 1,
    Active = 2,
    Completed = 3,
    Failed = 4,
}

impl ExportJobStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Resolve a database status ID back into the enum.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Queued),
            2 => Some(Self::Active),
            3 => Some(Self::Completed),
            4 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Caller-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether this status is final and immutable.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl From<ExportJobStatus> for StatusId {
    fn from(value: ExportJobStatus) -> Self {
        value as StatusId
    }
}
