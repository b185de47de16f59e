//! Job status mapping to the `job_statuses` SMALLINT lookup table.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Background job lifecycle status.
///
/// Discriminants match the seed data order (1-based) in `job_statuses`.
/// The lifecycle is monotonic: `queued → started → finished | failed`;
/// every transition in the repository guards on the expected current
/// status, so a job never moves backward.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued = 1,
    Started = 2,
    Finished = 3,
    Failed = 4,
}

impl JobStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Wire name used in API responses.
    pub fn name(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Started => "started",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }

    /// Reverse lookup from a database status ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Queued),
            2 => Some(Self::Started),
            3 => Some(Self::Finished),
            4 => Some(Self::Failed),
            _ => None,
        }
    }
}

impl From<JobStatus> for StatusId {
    fn from(value: JobStatus) -> Self {
        value as StatusId
    }
}
