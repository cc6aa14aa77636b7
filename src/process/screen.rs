//! Screen efficiency and blinding.
//!
//! With `f`, `o`, `u` the undersize fractions (0–1) of feed, oversize and
//! undersize streams, the mass balance gives `U/F = (f - o)/(u - o)`, so the
//! undersize recovery is
//!
//! ```text
//! E = ((f - o)/(u - o)) · (u/f)
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_BLINDING_THRESHOLD;
use crate::error::AnalysisError;

/// Undersize recovery of a screen.
///
/// Fails when `u == o` (streams are identical, nothing was separated) and when
/// `f == 0` (no undersize in the feed to recover).
pub fn calculate_screen_efficiency(
    feed_undersize: f64,
    oversize_undersize: f64,
    undersize_undersize: f64,
) -> Result<f64, AnalysisError> {
    let (f, o, u) = (feed_undersize, oversize_undersize, undersize_undersize);

    if u == o {
        return Err(AnalysisError::InvalidSeparation { fraction: u });
    }
    if f == 0.0 {
        return Err(AnalysisError::ZeroFeedUndersize);
    }

    Ok(((f - o) / (u - o)) * (u / f))
}

/// Outcome of the blinding threshold check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindingCheck {
    pub is_blinding: bool,
    pub message: String,
}

/// Flag a screen whose efficiency has dropped below `threshold`.
pub fn detect_blinding(efficiency: f64, threshold: f64) -> BlindingCheck {
    if efficiency < threshold {
        BlindingCheck {
            is_blinding: true,
            message: "Potential blinding or screen wear detected.".to_string(),
        }
    } else {
        BlindingCheck {
            is_blinding: false,
            message: "Screen operating normally.".to_string(),
        }
    }
}

/// `detect_blinding` with the default 0.85 threshold.
pub fn detect_blinding_default(efficiency: f64) -> BlindingCheck {
    detect_blinding(efficiency, DEFAULT_BLINDING_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_matches_mass_balance() {
        let e = calculate_screen_efficiency(0.8, 0.1, 0.95).unwrap();
        let expected = (0.7 / 0.85) * (0.95 / 0.8);
        assert!((e - expected).abs() < 1e-12);
        assert!((e - 0.9779).abs() < 1e-4);
    }

    #[test]
    fn identical_streams_are_rejected() {
        for &(f, o) in &[(0.8, 0.1), (0.5, 0.5), (0.0, 0.3)] {
            let err = calculate_screen_efficiency(f, o, o).unwrap_err();
            assert_eq!(err, AnalysisError::InvalidSeparation { fraction: o });
        }
    }

    #[test]
    fn zero_feed_undersize_is_rejected() {
        let err = calculate_screen_efficiency(0.0, 0.1, 0.95).unwrap_err();
        assert_eq!(err, AnalysisError::ZeroFeedUndersize);
    }

    #[test]
    fn blinding_threshold_is_strict() {
        assert!(detect_blinding(0.84, 0.85).is_blinding);
        assert!(!detect_blinding(0.85, 0.85).is_blinding);
        assert_eq!(detect_blinding_default(0.9).message, "Screen operating normally.");
        assert_eq!(
            detect_blinding_default(0.5).message,
            "Potential blinding or screen wear detected."
        );
    }
}
