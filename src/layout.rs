//! Layout: The two fixed screen regions and their dirty tracking.
//!
//! ```text
//! row 0        ┌────────────────────────────┐
//!              │ input row (program / path) │
//! rows 1..h    ├────────────────────────────┤
//!              │ results                    │
//!              └────────────────────────────┘
//! ```

use bitflags::bitflags;
use std::ops::Range;

/// Row holding the program text or the save prompt.
pub const INPUT_ROW: u16 = 0;

/// First row of the results region.
pub const FIRST_RESULT_ROW: u16 = 1;

bitflags! {
    /// Screen regions that need repainting on the next flush.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Regions: u8 {
        /// The input row.
        const INPUT = 0b01;
        /// Every row below the input row.
        const RESULTS = 0b10;
    }
}

impl Regions {
    /// Row spans covered by these regions on a screen `height` rows tall.
    pub fn row_spans(self, height: u16) -> Vec<Range<u16>> {
        let mut spans = Vec::with_capacity(2);
        if self.contains(Self::INPUT) {
            spans.push(INPUT_ROW..FIRST_RESULT_ROW.min(height));
        }
        if self.contains(Self::RESULTS) && height > FIRST_RESULT_ROW {
            spans.push(FIRST_RESULT_ROW..height);
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_spans() {
        assert_eq!(Regions::INPUT.row_spans(24), vec![0..1]);
        assert_eq!(Regions::RESULTS.row_spans(24), vec![1..24]);
        assert_eq!(Regions::all().row_spans(24), vec![0..1, 1..24]);
        assert!(Regions::empty().row_spans(24).is_empty());
    }

    #[test]
    fn test_single_row_screen_has_no_results() {
        assert!(Regions::RESULTS.row_spans(1).is_empty());
    }
}
