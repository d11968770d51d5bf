use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayFrequency {
    Yearly,
    Monthly,
    #[serde(alias = "Semi-monthly")]
    SemiMonthly,
}

impl PayFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Yearly => 1,
            Self::Monthly => 12,
            Self::SemiMonthly => 24,
        }
    }
}
