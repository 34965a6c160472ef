//! Results of background reference lookups

use crate::models::{AddressLookup, CityOption, StateOption};
use crate::reference::LookupResult;
use crate::registry::{CityLookupTicket, PostalLookupTicket};

/// Completion of a lookup task, delivered back to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    StatesLoaded(LookupResult<Vec<StateOption>>),
    CitiesLoaded {
        ticket: CityLookupTicket,
        result: LookupResult<Vec<CityOption>>,
    },
    AddressResolved {
        ticket: PostalLookupTicket,
        result: LookupResult<AddressLookup>,
    },
}

impl AppEvent {
    pub fn describe(&self) -> &'static str {
        match self {
            AppEvent::StatesLoaded(_) => "states",
            AppEvent::CitiesLoaded { .. } => "municipalities",
            AppEvent::AddressResolved { .. } => "postal code",
        }
    }
}
