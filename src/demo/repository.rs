use anyhow::Result;
use prompt_framework::SessionState;
use serde::{Deserialize, Serialize};

const NOTES_KEY: &str = "notes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub text: String,
}

/// Notes kept in the session state under the `notes` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteRepository;

impl NoteRepository {
    pub fn all(&self, state: &SessionState) -> Vec<Note> {
        state.get(NOTES_KEY).unwrap_or_default()
    }

    pub fn create(&self, state: &mut SessionState, text: String) -> Result<Note> {
        let mut notes = self.all(state);
        let id = notes.iter().map(|n| n.id).max().map_or(1, |max| max + 1);
        let note = Note { id, text };
        notes.push(note.clone());
        self.store(state, notes)?;
        Ok(note)
    }

    /// Remove the most recently created note.
    pub fn delete_last(&self, state: &mut SessionState) -> Result<Option<Note>> {
        let mut notes = self.all(state);
        let removed = notes.pop();
        self.store(state, notes)?;
        Ok(removed)
    }

    fn store(&self, state: &mut SessionState, notes: Vec<Note>) -> Result<()> {
        // an empty list is stored as absent so `state show` stays tidy
        let value = (!notes.is_empty()).then_some(notes);
        state.set(NOTES_KEY, value)?;
        Ok(())
    }
}
