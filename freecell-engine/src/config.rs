use anyhow::{Result, bail};

use crate::card::MAX_SUIT;

pub const DEFAULT_TABLEAUS: usize = 8;
pub const DEFAULT_FOUNDATIONS: usize = 4;
pub const DEFAULT_FREE_CELLS: usize = 4;

/// Container counts, fixed for the life of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub tableaus: usize,
    pub foundations: usize,
    pub free_cells: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            tableaus: DEFAULT_TABLEAUS,
            foundations: DEFAULT_FOUNDATIONS,
            free_cells: DEFAULT_FREE_CELLS,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tableaus == 0 {
            bail!("At least one tableau pile is required.");
        }
        if self.foundations == 0 {
            bail!("At least one foundation is required.");
        }
        if self.foundations > MAX_SUIT as usize {
            bail!(
                "At most {MAX_SUIT} foundations are supported, got {}.",
                self.foundations
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config() {
        assert!(TableConfig::default().validate().is_ok());
        let no_cells = TableConfig {
            free_cells: 0,
            ..Default::default()
        };
        assert!(no_cells.validate().is_ok());
        let no_piles = TableConfig {
            tableaus: 0,
            ..Default::default()
        };
        assert!(no_piles.validate().is_err());
        let too_many = TableConfig {
            foundations: 5,
            ..Default::default()
        };
        assert!(too_many.validate().is_err());
    }
}
