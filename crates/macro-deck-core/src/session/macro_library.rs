use crate::{
    CoreResult, SessionError,
    model::{Macro, MacroId},
};

use std::panic::Location;

use error_location::ErrorLocation;

/// Ordered collection of saved macros.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroLibrary {
    macros: Vec<Macro>,
}

impl MacroLibrary {
    /// Wrap macros in their display order.
    pub fn new(macros: Vec<Macro>) -> Self {
        Self { macros }
    }

    /// Number of macros.
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    /// `true` when the library has no macros.
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Macros in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.macros.iter()
    }

    /// Look up a macro by id.
    pub fn get(&self, macro_id: &MacroId) -> Option<&Macro> {
        self.macros.iter().find(|m| &m.id == macro_id)
    }

    /// Whether a macro with this id exists.
    pub fn contains(&self, macro_id: &MacroId) -> bool {
        self.get(macro_id).is_some()
    }

    /// Id of the first macro, if any.
    pub fn first_id(&self) -> Option<MacroId> {
        self.macros.first().map(|m| m.id.clone())
    }

    /// Default name for the next recorded macro: `Macro N` with N one past
    /// the current size.
    pub fn next_default_name(&self) -> String {
        format!("Macro {}", self.macros.len() + 1)
    }

    /// Insert `macro_data`, replacing any macro with the same id in place.
    pub fn upsert(&mut self, macro_data: Macro) {
        match self.macros.iter_mut().find(|m| m.id == macro_data.id) {
            Some(existing) => *existing = macro_data,
            None => self.macros.push(macro_data),
        }
    }

    /// Remove a macro, returning it if it was present.
    pub fn remove(&mut self, macro_id: &MacroId) -> Option<Macro> {
        let position = self.macros.iter().position(|m| &m.id == macro_id)?;
        Some(self.macros.remove(position))
    }

    /// Validate a persisted selection against the library.
    ///
    /// Returns [`SessionError::SelectionStale`] when the id no longer exists.
    #[track_caller]
    pub fn resolve_selection(&self, selection: Option<&MacroId>) -> CoreResult<Option<MacroId>> {
        match selection {
            None => Ok(None),
            Some(macro_id) if self.contains(macro_id) => Ok(Some(macro_id.clone())),
            Some(macro_id) => Err(SessionError::SelectionStale {
                macro_id: macro_id.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
