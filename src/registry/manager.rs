//! Registration manager: committed records, the open draft and reference data

use tracing::{debug, info, warn};

use super::{Draft, FormMode, RecordStore, RegistryError};
use crate::models::{AddressLookup, CityOption, Record, RecordField, RecordId, StateOption};
use crate::reference::{LookupResult, ReferenceService};

/// Identifies one municipality request. Only the most recently issued ticket
/// may update the city list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityLookupTicket {
    seq: u64,
    pub state_id: u32,
    pub state_code: String,
}

/// Identifies one postal-code request against the draft it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalLookupTicket {
    generation: u64,
    pub postal_code: String,
}

/// What happened to a lookup response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The response updated state
    Applied,
    /// A newer request or a different draft superseded it; nothing changed
    Stale,
    /// No request was needed
    Skipped,
}

#[derive(Debug, Default)]
pub struct RegistrationManager {
    store: RecordStore,
    draft: Draft,
    mode: FormMode,
    states: Vec<StateOption>,
    cities: Vec<CityOption>,
    city_request_seq: u64,
    draft_generation: u64,
}

impl RegistrationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &RecordStore {
        &self.store
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn states(&self) -> &[StateOption] {
        &self.states
    }

    pub fn cities(&self) -> &[CityOption] {
        &self.cities
    }

    pub fn state_by_code(&self, code: &str) -> Option<&StateOption> {
        self.states.iter().find(|s| s.abbreviation == code)
    }

    /// Open an empty form in create mode
    pub fn open_create_form(&mut self) {
        self.reset_draft(Draft::create());
        self.mode = FormMode::OpenCreate;
        debug!("Opened create form");
    }

    /// Open the form on a copy of an existing record
    pub fn open_edit_form(&mut self, id: RecordId) -> Result<(), RegistryError> {
        let record = self
            .store
            .get(id)
            .cloned()
            .ok_or(RegistryError::RecordNotFound(id))?;

        self.reset_draft(Draft::edit(id, record));
        self.mode = FormMode::OpenEdit(id);
        debug!("Opened edit form for record {}", id);
        Ok(())
    }

    /// Close the form and throw the draft away
    pub fn cancel_form(&mut self) {
        self.reset_draft(Draft::create());
        self.mode = FormMode::Closed;
    }

    /// Set one draft field. Any string is accepted.
    pub fn update_draft_field(&mut self, field: RecordField, value: impl Into<String>) {
        self.draft.record.set(field, value);
    }

    /// Commit the draft: append in create mode, overwrite in edit mode
    pub fn submit_draft(&mut self) -> Result<RecordId, RegistryError> {
        let id = match self.mode {
            FormMode::Closed => return Err(RegistryError::FormClosed),
            FormMode::OpenCreate => {
                let id = self.store.insert(self.draft.record.clone());
                info!("Registered record {} ({} total)", id, self.store.len());
                id
            }
            FormMode::OpenEdit(id) => {
                self.store.replace(id, self.draft.record.clone())?;
                info!("Updated record {}", id);
                id
            }
        };

        self.cancel_form();
        Ok(id)
    }

    /// Delete a committed record. Closes the form if it was editing that record.
    pub fn delete_record(&mut self, id: RecordId) -> Result<Record, RegistryError> {
        let removed = self.store.remove(id)?;
        if self.mode == FormMode::OpenEdit(id) {
            warn!("Record {} deleted while being edited; closing form", id);
            self.cancel_form();
        }
        info!("Deleted record {} ({} remaining)", id, self.store.len());
        Ok(removed)
    }

    /// Replace the state list with a lookup result. The list is kept on failure.
    pub fn apply_states(&mut self, result: LookupResult<Vec<StateOption>>) -> LookupResult<usize> {
        let states = result.map_err(|e| {
            warn!("State list lookup failed: {}", e);
            e
        })?;
        self.states = states;
        Ok(self.states.len())
    }

    /// Fetch and install the state list
    pub async fn load_states(&mut self, service: &dyn ReferenceService) -> LookupResult<usize> {
        let result = service.list_states().await;
        self.apply_states(result)
    }

    /// Record a state selection and issue a ticket for its municipalities.
    ///
    /// The draft city and the city options are cleared whether or not the
    /// code matches a loaded state; `None` means no request is needed.
    pub fn begin_state_selection(&mut self, state_code: &str) -> Option<CityLookupTicket> {
        self.draft.record.state_code = state_code.to_string();
        self.draft.record.city.clear();
        self.issue_city_ticket()
    }

    /// Issue a municipality ticket for the draft's current state without
    /// touching the draft city (used after autofill and when editing)
    pub fn begin_city_refresh(&mut self) -> Option<CityLookupTicket> {
        self.issue_city_ticket()
    }

    fn issue_city_ticket(&mut self) -> Option<CityLookupTicket> {
        self.city_request_seq += 1;
        self.cities.clear();

        let state_code = self.draft.record.state_code.clone();
        let state_id = self.state_by_code(&state_code)?.id;
        Some(CityLookupTicket {
            seq: self.city_request_seq,
            state_id,
            state_code,
        })
    }

    /// Install municipalities if the ticket is still the latest one
    pub fn apply_city_lookup(
        &mut self,
        ticket: &CityLookupTicket,
        result: LookupResult<Vec<CityOption>>,
    ) -> LookupResult<LookupOutcome> {
        if ticket.seq != self.city_request_seq {
            debug!(
                "Discarding municipalities for {} (request {} superseded by {})",
                ticket.state_code, ticket.seq, self.city_request_seq
            );
            return Ok(LookupOutcome::Stale);
        }

        let cities = result.map_err(|e| {
            warn!("Municipality lookup for {} failed: {}", ticket.state_code, e);
            e
        })?;
        debug!("Loaded {} municipalities for {}", cities.len(), ticket.state_code);
        self.cities = cities;
        Ok(LookupOutcome::Applied)
    }

    /// Select a state and load its municipalities
    pub async fn select_state(
        &mut self,
        service: &dyn ReferenceService,
        state_code: &str,
    ) -> LookupResult<LookupOutcome> {
        match self.begin_state_selection(state_code) {
            Some(ticket) => {
                let result = service.list_cities(ticket.state_id).await;
                self.apply_city_lookup(&ticket, result)
            }
            None => Ok(LookupOutcome::Skipped),
        }
    }

    /// Issue a ticket for looking up the draft's postal code
    pub fn begin_postal_lookup(&self) -> PostalLookupTicket {
        PostalLookupTicket {
            generation: self.draft_generation,
            postal_code: self.draft.record.postal_code.clone(),
        }
    }

    /// Apply a postal-code result to the draft it was issued for, provided
    /// the draft still holds the same postal code.
    ///
    /// On failure the draft is left unchanged and the error is returned.
    pub fn apply_postal_lookup(
        &mut self,
        ticket: &PostalLookupTicket,
        result: LookupResult<AddressLookup>,
    ) -> LookupResult<LookupOutcome> {
        if ticket.generation != self.draft_generation {
            debug!("Discarding postal lookup for {}: draft was replaced", ticket.postal_code);
            return Ok(LookupOutcome::Stale);
        }
        if ticket.postal_code != self.draft.record.postal_code {
            debug!(
                "Discarding postal lookup for {}: postal code is now {}",
                ticket.postal_code, self.draft.record.postal_code
            );
            return Ok(LookupOutcome::Stale);
        }

        let address = result.map_err(|e| {
            warn!("Postal lookup for '{}' failed: {}", ticket.postal_code, e);
            e
        })?;
        self.draft.record.apply_address(&address);
        Ok(LookupOutcome::Applied)
    }

    /// Auto-fill the draft address from its postal code, then refresh the
    /// municipality options for the filled-in state.
    pub async fn lookup_address_by_postal_code(
        &mut self,
        service: &dyn ReferenceService,
    ) -> LookupResult<LookupOutcome> {
        let ticket = self.begin_postal_lookup();
        let result = service.lookup_postal_code(&ticket.postal_code).await;
        let outcome = self.apply_postal_lookup(&ticket, result)?;

        if outcome == LookupOutcome::Applied {
            if let Some(city_ticket) = self.begin_city_refresh() {
                let cities = service.list_cities(city_ticket.state_id).await;
                if let Err(e) = self.apply_city_lookup(&city_ticket, cities) {
                    warn!("Address filled but municipality list unavailable: {}", e);
                }
            }
        }
        Ok(outcome)
    }

    fn reset_draft(&mut self, draft: Draft) {
        self.draft = draft;
        self.draft_generation += 1;
        self.city_request_seq += 1;
        self.cities.clear();
    }
}
