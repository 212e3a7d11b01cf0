// src/workflow.rs
use std::fmt;

use crate::data_types::Record;
use crate::file_handler::{self, SelectedFile};

/// Where the upload workflow currently stands. Drives which triggers are
/// enabled and what the primary button says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    FileSelected,
    Uploading,
    Succeeded,
    Failed,
}

impl WorkflowStatus {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowStatus::Idle => "idle",
            WorkflowStatus::FileSelected => "file selected",
            WorkflowStatus::Uploading => "uploading",
            WorkflowStatus::Succeeded => "done",
            WorkflowStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// Declared MIME type outside the allow-list; carries the rejected type.
    InvalidFileType(String),
    /// Re-run requested before any upload captured a snapshot.
    MissingSnapshot,
    /// A request is already in flight.
    Busy,
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::InvalidFileType(mime) => {
                write!(f, "file type not allowed: {}", mime)
            }
            WorkflowError::MissingSnapshot => write!(f, "no previous upload to re-run"),
            WorkflowError::Busy => write!(f, "a request is already in flight"),
        }
    }
}

impl std::error::Error for WorkflowError {}

/// A request the state machine has issued and expects a `finish` call for.
/// The sequence id ties the eventual response back to this request.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub file: SelectedFile,
    pub seq: u64,
}

/// How `finish` applied a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Success,
    Failure,
    /// The response belonged to a superseded request and was dropped.
    Stale,
}

/// All mutable workflow state, owned by the application and only ever
/// touched from the UI event loop.
#[derive(Debug)]
pub struct WorkflowState {
    pub status: WorkflowStatus,
    selected: Option<SelectedFile>,
    snapshot: Option<SelectedFile>,
    results: Vec<Record>,
    seq: u64,
    /// Sequence id of the request currently awaiting a response, if any.
    /// Tracked separately from `status` so a new pick mid-flight cannot
    /// re-enable the triggers.
    in_flight: Option<u64>,
}

impl WorkflowState {
    pub fn new() -> Self {
        WorkflowState {
            status: WorkflowStatus::Idle,
            selected: None,
            snapshot: None,
            results: Vec::new(),
            seq: 0,
            in_flight: None,
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn results(&self) -> &[Record] {
        &self.results
    }

    /// Accepts a candidate selection. Rejections leave every field as it
    /// was, including any previously selected file. A pick while a request
    /// is in flight stores the file but keeps the Uploading status, so the
    /// triggers stay disabled until the response lands.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), WorkflowError> {
        if !file_handler::is_allowed(&file.mime) {
            return Err(WorkflowError::InvalidFileType(file.mime));
        }
        self.selected = Some(file);
        if self.in_flight.is_none() {
            self.status = WorkflowStatus::FileSelected;
        }
        Ok(())
    }

    pub fn can_upload(&self) -> bool {
        self.selected.is_some() && self.in_flight.is_none()
    }

    pub fn can_rerun(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Starts the primary upload. The current selection is snapshotted for
    /// later re-runs before the network call resolves, so a failed upload
    /// still updates the re-run slot. Returns `None` when there is nothing
    /// to upload or a request is already in flight.
    pub fn begin_upload(&mut self) -> Option<PendingRequest> {
        if !self.can_upload() {
            return None;
        }
        let file = self.selected.clone()?;
        self.snapshot = Some(file.clone());
        self.status = WorkflowStatus::Uploading;
        self.seq += 1;
        self.in_flight = Some(self.seq);
        Some(PendingRequest {
            file,
            seq: self.seq,
        })
    }

    /// Starts a re-run of the last uploaded file. Uses the snapshot taken by
    /// `begin_upload`, never the current selection, and leaves both slots
    /// untouched.
    pub fn begin_rerun(&mut self) -> Result<PendingRequest, WorkflowError> {
        if self.in_flight.is_some() {
            return Err(WorkflowError::Busy);
        }
        let file = self
            .snapshot
            .clone()
            .ok_or(WorkflowError::MissingSnapshot)?;
        self.status = WorkflowStatus::Uploading;
        self.seq += 1;
        self.in_flight = Some(self.seq);
        Ok(PendingRequest {
            file,
            seq: self.seq,
        })
    }

    /// Applies a finished request. Responses carrying a sequence id other
    /// than the pending one are stale and change nothing, so a late
    /// response can never overwrite a newer result. Failures keep the
    /// previous result collection.
    pub fn finish<E>(&mut self, seq: u64, outcome: Result<Vec<Record>, E>) -> Applied {
        if self.in_flight != Some(seq) {
            return Applied::Stale;
        }
        self.in_flight = None;
        match outcome {
            Ok(records) => {
                self.results = records;
                self.status = WorkflowStatus::Succeeded;
                Applied::Success
            }
            Err(_) => {
                self.status = WorkflowStatus::Failed;
                Applied::Failure
            }
        }
    }
}
