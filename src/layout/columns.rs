//! Responsive column breakpoints.

use serde::Deserialize;

/// Viewport widths at or above `min_width` get `columns` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakpoint {
    /// Smallest viewport width this entry applies to.
    pub min_width: u32,
    /// Column count at or above `min_width`.
    pub columns: u16,
}

/// Breakpoint table, widest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBreakpoints {
    breakpoints: Vec<Breakpoint>,
    fallback: u16,
}

impl ColumnBreakpoints {
    /// Build a table. Zero column counts are clamped to 1; `fallback` applies below
    /// the narrowest breakpoint.
    pub fn new(mut breakpoints: Vec<Breakpoint>, fallback: u16) -> Self {
        for bp in &mut breakpoints {
            bp.columns = bp.columns.max(1);
        }
        breakpoints.sort_by(|a, b| b.min_width.cmp(&a.min_width));
        Self {
            breakpoints,
            fallback: fallback.max(1),
        }
    }

    /// Entries, widest first.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Column count for a viewport `width`.
    pub fn columns_for(&self, width: u32) -> u16 {
        self.breakpoints
            .iter()
            .find(|bp| width >= bp.min_width)
            .map(|bp| bp.columns)
            .unwrap_or(self.fallback)
    }
}

impl Default for ColumnBreakpoints {
    fn default() -> Self {
        Self::new(
            vec![
                Breakpoint { min_width: 1440, columns: 5 },
                Breakpoint { min_width: 1200, columns: 4 },
                Breakpoint { min_width: 768, columns: 3 },
            ],
            2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_responsive_steps() {
        let table = ColumnBreakpoints::default();
        assert_eq!(table.columns_for(1920), 5);
        assert_eq!(table.columns_for(1440), 5);
        assert_eq!(table.columns_for(1439), 4);
        assert_eq!(table.columns_for(1200), 4);
        assert_eq!(table.columns_for(1024), 3);
        assert_eq!(table.columns_for(768), 3);
        assert_eq!(table.columns_for(767), 2);
        assert_eq!(table.columns_for(0), 2);
    }

    #[test]
    fn unsorted_input_is_ordered_widest_first() {
        let table = ColumnBreakpoints::new(
            vec![
                Breakpoint { min_width: 500, columns: 2 },
                Breakpoint { min_width: 1000, columns: 4 },
            ],
            1,
        );
        assert_eq!(table.breakpoints()[0].min_width, 1000);
        assert_eq!(table.columns_for(1200), 4);
        assert_eq!(table.columns_for(600), 2);
        assert_eq!(table.columns_for(100), 1);
    }

    #[test]
    fn zero_columns_clamped_to_one() {
        let table = ColumnBreakpoints::new(vec![Breakpoint { min_width: 0, columns: 0 }], 0);
        assert_eq!(table.columns_for(50), 1);
    }
}
