//! Table selection.
//!
//! Guests pick the table they are seated at, optionally merged with a second
//! table for larger parties.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::TablesConfig;
use crate::error::OrderingError;

/// Area of the dining room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Window,
    Center,
    Bar,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Window => "Window",
            Zone::Center => "Center",
            Zone::Bar => "Bar",
        }
    }
}

/// A table on the floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub number: u32,
    pub zone: Zone,
    /// Metres from the home table.
    pub distance: u32,
}

/// The fixed floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFloor {
    count: u32,
    home_table: u32,
}

impl TableFloor {
    /// Create a floor with tables `1..=count`. `home_table` must be on it.
    pub fn new(count: u32, home_table: u32) -> Result<Self, OrderingError> {
        if !(1..=count).contains(&home_table) {
            return Err(OrderingError::InvalidTable(home_table));
        }
        Ok(Self { count, home_table })
    }

    /// Build from the `tables` config section.
    pub fn from_config(config: &TablesConfig) -> Result<Self, OrderingError> {
        Self::new(config.count, config.home_table)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn home_table(&self) -> u32 {
        self.home_table
    }

    /// Zone of a table by number.
    pub fn zone(&self, number: u32) -> Zone {
        if number % 3 == 0 {
            Zone::Window
        } else if number % 2 == 0 {
            Zone::Center
        } else {
            Zone::Bar
        }
    }

    /// `|home - n|`.
    pub fn distance_from_home(&self, number: u32) -> u32 {
        self.home_table.abs_diff(number)
    }

    /// Look up a table, rejecting numbers off the floor plan.
    pub fn table(&self, number: u32) -> Result<TableInfo, OrderingError> {
        if !(1..=self.count).contains(&number) {
            return Err(OrderingError::InvalidTable(number));
        }
        Ok(TableInfo {
            number,
            zone: self.zone(number),
            distance: self.distance_from_home(number),
        })
    }

    /// Every table in number order.
    pub fn tables(&self) -> Vec<TableInfo> {
        (1..=self.count)
            .map(|number| TableInfo {
                number,
                zone: self.zone(number),
                distance: self.distance_from_home(number),
            })
            .collect()
    }
}

impl Default for TableFloor {
    fn default() -> Self {
        Self {
            count: 12,
            home_table: 5,
        }
    }
}

/// The table(s) an order is served at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAssignment {
    pub primary: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_with: Option<u32>,
}

impl TableAssignment {
    /// "Table 5" or "Table 5 + Table 7".
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Table numbers covered.
    pub fn tables(&self) -> Vec<u32> {
        std::iter::once(self.primary).chain(self.merged_with).collect()
    }
}

impl fmt::Display for TableAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table {}", self.primary)?;
        if let Some(other) = self.merged_with {
            write!(f, " + Table {}", other)?;
        }
        Ok(())
    }
}

/// Interactive table picker.
#[derive(Debug, Clone)]
pub struct TableSelection {
    floor: TableFloor,
    primary: Option<u32>,
    merged_with: Option<u32>,
    merge_mode: bool,
}

impl TableSelection {
    pub fn new(floor: TableFloor) -> Self {
        Self {
            floor,
            primary: None,
            merged_with: None,
            merge_mode: false,
        }
    }

    pub fn floor(&self) -> &TableFloor {
        &self.floor
    }

    /// Pick a table.
    ///
    /// In normal mode this replaces the selection (and drops any merge). In
    /// merge mode it sets the second table, which must differ from the first.
    pub fn select(&mut self, number: u32) -> Result<(), OrderingError> {
        self.floor.table(number)?;

        if self.merge_mode {
            match self.primary {
                None => {
                    return Err(OrderingError::InvalidTableMerge(
                        "select a primary table before merging".to_string(),
                    ))
                }
                Some(primary) if primary == number => {
                    return Err(OrderingError::InvalidTableMerge(format!(
                        "table {number} cannot be merged with itself"
                    )))
                }
                Some(_) => self.merged_with = Some(number),
            }
        } else {
            self.primary = Some(number);
            self.merged_with = None;
        }

        tracing::debug!(primary = ?self.primary, merged_with = ?self.merged_with, "table selected");
        Ok(())
    }

    /// Toggle merge mode. Leaving merge mode drops the merged table.
    pub fn set_merge_mode(&mut self, enabled: bool) {
        self.merge_mode = enabled;
        if !enabled {
            self.merged_with = None;
        }
    }

    pub fn is_merge_mode(&self) -> bool {
        self.merge_mode
    }

    /// Clear the selection.
    pub fn reset(&mut self) {
        self.primary = None;
        self.merged_with = None;
        self.merge_mode = false;
    }

    /// The current assignment, if a table is selected.
    pub fn assignment(&self) -> Option<TableAssignment> {
        self.primary.map(|primary| TableAssignment {
            primary,
            merged_with: self.merged_with,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones() {
        let floor = TableFloor::default();
        assert_eq!(floor.zone(3), Zone::Window);
        assert_eq!(floor.zone(6), Zone::Window);
        assert_eq!(floor.zone(4), Zone::Center);
        assert_eq!(floor.zone(5), Zone::Bar);
        assert_eq!(floor.zone(1), Zone::Bar);
    }

    #[test]
    fn test_distance_from_home() {
        let floor = TableFloor::default();
        assert_eq!(floor.distance_from_home(5), 0);
        assert_eq!(floor.distance_from_home(2), 3);
        assert_eq!(floor.distance_from_home(12), 7);
    }

    #[test]
    fn test_floor_bounds() {
        let floor = TableFloor::default();
        assert_eq!(floor.tables().len(), 12);
        assert!(matches!(floor.table(0), Err(OrderingError::InvalidTable(0))));
        assert!(matches!(floor.table(13), Err(OrderingError::InvalidTable(13))));
        assert!(TableFloor::new(4, 5).is_err());
    }

    #[test]
    fn test_select_and_merge() {
        let mut selection = TableSelection::new(TableFloor::default());
        assert!(selection.assignment().is_none());

        selection.select(5).unwrap();
        selection.set_merge_mode(true);
        selection.select(7).unwrap();

        let assignment = selection.assignment().unwrap();
        assert_eq!(assignment.label(), "Table 5 + Table 7");
        assert_eq!(assignment.tables(), vec![5, 7]);
    }

    #[test]
    fn test_invalid_merges() {
        let mut selection = TableSelection::new(TableFloor::default());
        selection.set_merge_mode(true);
        assert!(matches!(
            selection.select(3),
            Err(OrderingError::InvalidTableMerge(_))
        ));

        selection.set_merge_mode(false);
        selection.select(3).unwrap();
        selection.set_merge_mode(true);
        assert!(matches!(
            selection.select(3),
            Err(OrderingError::InvalidTableMerge(_))
        ));
        assert!(matches!(
            selection.select(40),
            Err(OrderingError::InvalidTable(40))
        ));
    }

    #[test]
    fn test_normal_select_replaces_merge() {
        let mut selection = TableSelection::new(TableFloor::default());
        selection.select(2).unwrap();
        selection.set_merge_mode(true);
        selection.select(4).unwrap();
        selection.set_merge_mode(false);
        assert_eq!(selection.assignment().unwrap().label(), "Table 2");

        selection.select(9).unwrap();
        assert_eq!(selection.assignment().unwrap().label(), "Table 9");

        selection.reset();
        assert!(selection.assignment().is_none());
        assert!(!selection.is_merge_mode());
    }
}
