//! Notes, meetings and uploaded files.
//!
//! Notes are append-only within a phase. Their text is never edited in
//! place; removal is by id.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MeetingId, NoteId, Timestamp, ValidationError};

/// A pasted or uploaded block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// File name for uploads, operator label for pasted text.
    pub file_name: String,
    pub text: String,
    pub uploaded_at: Timestamp,
}

impl Note {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        let text = text.into();
        if file_name.trim().is_empty() {
            return Err(ValidationError::empty_field("file_name"));
        }
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(Self {
            id: NoteId::new(),
            file_name,
            text,
            uploaded_at: Timestamp::now(),
        })
    }
}

/// A functional meeting with its attached notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: MeetingId,
    pub label: String,
    pub domain: String,
    pub function: String,
    #[serde(default)]
    pub notes: Vec<Note>,
    pub uploaded_at: Timestamp,
}

impl Meeting {
    /// All note text of this meeting, one note per paragraph.
    pub fn text(&self) -> String {
        self.notes
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Operator input for a new meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingDraft {
    pub label: String,
    pub domain: String,
    pub function: String,
    /// Optional pasted notes, stored as the meeting's first note.
    pub notes_text: Option<String>,
}

impl MeetingDraft {
    pub fn new(label: impl Into<String>, domain: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            domain: domain.into(),
            function: function.into(),
            notes_text: None,
        }
    }

    pub fn with_notes(mut self, text: impl Into<String>) -> Self {
        self.notes_text = Some(text.into());
        self
    }

    /// Validates the draft and builds the meeting with the given extra notes.
    pub fn into_meeting(self, mut extra_notes: Vec<Note>) -> Result<Meeting, ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::empty_field("label"));
        }
        let mut notes = Vec::new();
        if let Some(text) = self.notes_text.filter(|t| !t.trim().is_empty()) {
            notes.push(Note::new(self.label.clone(), text)?);
        }
        notes.append(&mut extra_notes);

        Ok(Meeting {
            id: MeetingId::new(),
            label: self.label.trim().to_string(),
            domain: self.domain.trim().to_string(),
            function: self.function.trim().to_string(),
            notes,
            uploaded_at: Timestamp::now(),
        })
    }
}

/// A file handed in by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_requires_label_and_text() {
        assert!(Note::new("", "text").is_err());
        assert!(Note::new("kickoff.txt", "  ").is_err());
        assert!(Note::new("kickoff.txt", "Invoices pile up").is_ok());
    }

    #[test]
    fn meeting_draft_with_notes_creates_first_note() {
        let meeting = MeetingDraft::new("Finance sync", "Finance", "Accounts Payable")
            .with_notes("invoice backlog")
            .into_meeting(vec![Note::new("extra.txt", "ledger").unwrap()])
            .unwrap();

        assert_eq!(meeting.notes.len(), 2);
        assert_eq!(meeting.notes[0].file_name, "Finance sync");
        assert_eq!(meeting.text(), "invoice backlog\n\nledger");
    }

    #[test]
    fn meeting_draft_rejects_blank_label() {
        assert!(MeetingDraft::new(" ", "Finance", "AP").into_meeting(vec![]).is_err());
    }

    #[test]
    fn uploaded_file_extension_is_lowercased() {
        assert_eq!(UploadedFile::new("Notes.TXT", b"x".to_vec()).extension(), Some("txt".into()));
        assert_eq!(UploadedFile::new("README", b"x".to_vec()).extension(), None);
    }
}
