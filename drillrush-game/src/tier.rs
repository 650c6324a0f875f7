//! Recognition tiers gate locations, hazard knowledge and contract length.
use serde::{Deserialize, Serialize};

/// Player progression level, ordinal 0-3.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionTier {
    /// Fixed-size tutorial contracts.
    #[default]
    Tutorial,
    Regional,
    Continental,
    Global,
}

impl RecognitionTier {
    pub const ALL: [Self; 4] = [
        Self::Tutorial,
        Self::Regional,
        Self::Continental,
        Self::Global,
    ];

    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Tutorial => 0,
            Self::Regional => 1,
            Self::Continental => 2,
            Self::Global => 3,
        }
    }

    /// Tier for an ordinal; anything above 3 clamps to the top tier.
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            0 => Self::Tutorial,
            1 => Self::Regional,
            2 => Self::Continental,
            _ => Self::Global,
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Tutorial => Some(Self::Regional),
            Self::Regional => Some(Self::Continental),
            Self::Continental => Some(Self::Global),
            Self::Global => None,
        }
    }

    #[must_use]
    pub const fn is_tutorial(self) -> bool {
        matches!(self, Self::Tutorial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_roundtrip_and_clamp() {
        for tier in RecognitionTier::ALL {
            assert_eq!(RecognitionTier::from_ordinal(tier.ordinal()), tier);
        }
        assert_eq!(RecognitionTier::from_ordinal(9), RecognitionTier::Global);
    }

    #[test]
    fn next_walks_up_to_global() {
        assert_eq!(
            RecognitionTier::Tutorial.next(),
            Some(RecognitionTier::Regional)
        );
        assert_eq!(RecognitionTier::Global.next(), None);
        assert!(RecognitionTier::Tutorial < RecognitionTier::Global);
    }
}
