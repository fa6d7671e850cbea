//! Blood group types and ABO/Rh donation compatibility rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight ABO/Rh blood groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// All eight groups, in display order.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    /// The display code for this group (e.g. `"AB-"`).
    pub fn code(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    /// Parse a blood group code. Returns `None` for anything outside the
    /// eight-member set; unknown codes are rejected here so that the rest
    /// of the core only ever sees valid groups.
    pub fn parse(code: &str) -> Option<BloodGroup> {
        match code.trim() {
            "A+" => Some(BloodGroup::APositive),
            "A-" => Some(BloodGroup::ANegative),
            "B+" => Some(BloodGroup::BPositive),
            "B-" => Some(BloodGroup::BNegative),
            "AB+" => Some(BloodGroup::AbPositive),
            "AB-" => Some(BloodGroup::AbNegative),
            "O+" => Some(BloodGroup::OPositive),
            "O-" => Some(BloodGroup::ONegative),
            _ => None,
        }
    }

    /// The recipient groups this group can donate to.
    ///
    /// O- is the universal donor; AB+ is the universal recipient and can
    /// only donate to AB+.
    pub fn compatible_recipients(&self) -> &'static [BloodGroup] {
        use BloodGroup::*;
        match self {
            ONegative => &[
                ONegative, OPositive, ANegative, APositive, BNegative, BPositive, AbNegative,
                AbPositive,
            ],
            OPositive => &[OPositive, APositive, BPositive, AbPositive],
            ANegative => &[ANegative, APositive, AbNegative, AbPositive],
            APositive => &[APositive, AbPositive],
            BNegative => &[BNegative, BPositive, AbNegative, AbPositive],
            BPositive => &[BPositive, AbPositive],
            AbNegative => &[AbNegative, AbPositive],
            AbPositive => &[AbPositive],
        }
    }

    pub fn is_universal_donor(&self) -> bool {
        matches!(self, BloodGroup::ONegative)
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BloodGroup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::parse(s).ok_or_else(|| anyhow::anyhow!("unrecognized blood group code: {s:?}"))
    }
}

/// Every donor group whose compatibility list contains the recipient group,
/// computed by inverting the forward donation map.
pub fn compatible_donor_groups_for(recipient: BloodGroup) -> Vec<BloodGroup> {
    BloodGroup::ALL
        .iter()
        .copied()
        .filter(|donor| donor.compatible_recipients().contains(&recipient))
        .collect()
}

/// How urgently a blood request needs to be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    /// Ranking priority: high requests sort above medium above low.
    pub fn priority(&self) -> i32 {
        match self {
            UrgencyLevel::High => 3,
            UrgencyLevel::Medium => 2,
            UrgencyLevel::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_group_can_donate_to_itself() {
        for group in BloodGroup::ALL {
            assert!(
                compatible_donor_groups_for(group).contains(&group),
                "{group} should be compatible with itself"
            );
        }
    }

    #[test]
    fn o_negative_is_universal_donor() {
        for group in BloodGroup::ALL {
            assert!(
                compatible_donor_groups_for(group).contains(&BloodGroup::ONegative),
                "O- should be able to donate to {group}"
            );
        }
    }

    #[test]
    fn ab_positive_accepts_all_eight_groups() {
        let donors = compatible_donor_groups_for(BloodGroup::AbPositive);
        assert_eq!(donors.len(), 8);
        for group in BloodGroup::ALL {
            assert!(donors.contains(&group));
        }
    }

    #[test]
    fn only_o_negative_can_donate_to_o_negative() {
        assert_eq!(
            compatible_donor_groups_for(BloodGroup::ONegative),
            vec![BloodGroup::ONegative]
        );
    }

    #[test]
    fn parse_accepts_all_codes_and_rejects_garbage() {
        for group in BloodGroup::ALL {
            assert_eq!(BloodGroup::parse(group.code()), Some(group));
        }
        assert_eq!(BloodGroup::parse("C+"), None);
        assert_eq!(BloodGroup::parse(""), None);
        assert_eq!(BloodGroup::parse("ab+"), None);
    }

    #[test]
    fn serde_round_trips_display_codes() {
        let json = serde_json::to_string(&BloodGroup::AbNegative).unwrap();
        assert_eq!(json, "\"AB-\"");
        let back: BloodGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BloodGroup::AbNegative);
    }

    #[test]
    fn urgency_priorities_are_ordered() {
        assert!(UrgencyLevel::High.priority() > UrgencyLevel::Medium.priority());
        assert!(UrgencyLevel::Medium.priority() > UrgencyLevel::Low.priority());
    }
}
