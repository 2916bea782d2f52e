//! The drill-down state machine.
//!
//! `SelectionState` is the single source of truth for which tier is on
//! screen. A channel cannot be selected without a station because the
//! channel variant carries the station with it.

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    NoSelection,
    StationSelected {
        station_id: String,
        display_name: String,
    },
    ChannelSelected {
        station_id: String,
        display_name: String,
        notation: String,
    },
}

/// Result of asking for a transition. Every request yields one of these;
/// none leaves the state machine between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entered a new selection from `NoSelection`
    Selected,
    /// Replaced the selection inside a drill-down
    Switched,
    /// Already selected; nothing changed
    Unchanged,
    /// Not valid from the current state; nothing changed
    Rejected,
}

impl Transition {
    /// Whether the next tier needs to be (re)loaded.
    pub fn changed(&self) -> bool {
        matches!(self, Transition::Selected | Transition::Switched)
    }
}

#[derive(Debug, Default)]
pub struct NavigationController {
    state: SelectionState,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn station_id(&self) -> Option<&str> {
        match &self.state {
            SelectionState::NoSelection => None,
            SelectionState::StationSelected { station_id, .. }
            | SelectionState::ChannelSelected { station_id, .. } => Some(station_id),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match &self.state {
            SelectionState::NoSelection => None,
            SelectionState::StationSelected { display_name, .. }
            | SelectionState::ChannelSelected { display_name, .. } => Some(display_name),
        }
    }

    pub fn notation(&self) -> Option<&str> {
        match &self.state {
            SelectionState::ChannelSelected { notation, .. } => Some(notation),
            _ => None,
        }
    }

    /// Drill into a station.
    ///
    /// From `NoSelection` this is `Selected`. Inside a drill-down the same
    /// station is `Unchanged`, and a different one is `Switched`: a reset
    /// and a fresh selection in one step. Surrounding whitespace in the ID
    /// is ignored.
    pub fn select_station(&mut self, station_id: &str, display_name: &str) -> Transition {
        let station_id = station_id.trim();
        if station_id.is_empty() {
            return Transition::Rejected;
        }
        let transition = match self.station_id() {
            None => Transition::Selected,
            Some(current) if current == station_id => return Transition::Unchanged,
            Some(_) => Transition::Switched,
        };
        debug!("Selecting station {} ({:?})", station_id, transition);
        self.state = SelectionState::StationSelected {
            station_id: station_id.to_string(),
            display_name: display_name.to_string(),
        };
        transition
    }

    /// Activate a channel of the selected station. Only the dashboard calls
    /// this, after checking the notation belongs to the loaded catalog.
    pub(crate) fn select_channel(&mut self, notation: &str) -> Transition {
        let (station_id, display_name, transition) = match &self.state {
            SelectionState::NoSelection => return Transition::Rejected,
            SelectionState::ChannelSelected {
                notation: current, ..
            } if current == notation => return Transition::Unchanged,
            SelectionState::StationSelected {
                station_id,
                display_name,
            } => (station_id.clone(), display_name.clone(), Transition::Selected),
            SelectionState::ChannelSelected {
                station_id,
                display_name,
                ..
            } => (station_id.clone(), display_name.clone(), Transition::Switched),
        };
        debug!("Selecting channel {} of {} ({:?})", notation, station_id, transition);
        self.state = SelectionState::ChannelSelected {
            station_id,
            display_name,
            notation: notation.to_string(),
        };
        transition
    }

    /// Back to the station list, from anywhere.
    pub fn reset(&mut self) {
        self.state = SelectionState::NoSelection;
    }
}
