//! The sixteen MBTI personality codes.
//!
//! Used as a recommendation tag on destinations and as an optional field on
//! user profiles. Parsing is case-insensitive; the canonical form is the
//! upper-case four-letter code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown MBTI type: {0:?}")]
pub struct UnknownMbtiType(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MbtiType {
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
}

impl MbtiType {
    /// All codes, in the order the type picker shows them.
    pub const ALL: [MbtiType; 16] = [
        MbtiType::Intj,
        MbtiType::Intp,
        MbtiType::Entj,
        MbtiType::Entp,
        MbtiType::Infj,
        MbtiType::Infp,
        MbtiType::Enfj,
        MbtiType::Enfp,
        MbtiType::Istj,
        MbtiType::Isfj,
        MbtiType::Estj,
        MbtiType::Esfj,
        MbtiType::Istp,
        MbtiType::Isfp,
        MbtiType::Estp,
        MbtiType::Esfp,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MbtiType::Intj => "INTJ",
            MbtiType::Intp => "INTP",
            MbtiType::Entj => "ENTJ",
            MbtiType::Entp => "ENTP",
            MbtiType::Infj => "INFJ",
            MbtiType::Infp => "INFP",
            MbtiType::Enfj => "ENFJ",
            MbtiType::Enfp => "ENFP",
            MbtiType::Istj => "ISTJ",
            MbtiType::Isfj => "ISFJ",
            MbtiType::Estj => "ESTJ",
            MbtiType::Esfj => "ESFJ",
            MbtiType::Istp => "ISTP",
            MbtiType::Isfp => "ISFP",
            MbtiType::Estp => "ESTP",
            MbtiType::Esfp => "ESFP",
        }
    }

    /// Short nickname shown next to the code.
    pub fn title(self) -> &'static str {
        match self {
            MbtiType::Intj => "The Architect",
            MbtiType::Intp => "The Logician",
            MbtiType::Entj => "The Commander",
            MbtiType::Entp => "The Debater",
            MbtiType::Infj => "The Advocate",
            MbtiType::Infp => "The Mediator",
            MbtiType::Enfj => "The Protagonist",
            MbtiType::Enfp => "The Campaigner",
            MbtiType::Istj => "The Logistician",
            MbtiType::Isfj => "The Defender",
            MbtiType::Estj => "The Executive",
            MbtiType::Esfj => "The Consul",
            MbtiType::Istp => "The Virtuoso",
            MbtiType::Isfp => "The Adventurer",
            MbtiType::Estp => "The Entrepreneur",
            MbtiType::Esfp => "The Entertainer",
        }
    }

    /// One-line description of how this type tends to travel.
    pub fn travel_style(self) -> &'static str {
        match self {
            MbtiType::Intj => "Plans every leg in advance and prefers quiet places with depth: museums, architecture, history.",
            MbtiType::Intp => "Wanders without a fixed plan, drawn to science centres, odd corners and ideas worth chasing.",
            MbtiType::Entj => "Packs the itinerary tight and wants efficient cities with landmarks, food and business energy.",
            MbtiType::Entp => "Looks for novelty, debate and street life; happy to change plans halfway through the day.",
            MbtiType::Infj => "Seeks meaningful, calm places for reflection: temples, gardens, small towns off the main route.",
            MbtiType::Infp => "Travels for atmosphere and stories: coastal villages, bookshops, slow trains, sunsets.",
            MbtiType::Enfj => "Enjoys sharing the trip with others and places with strong local culture and community.",
            MbtiType::Enfp => "Chases spontaneous adventures, festivals and new people; the unknown is the point.",
            MbtiType::Istj => "Likes well-organised trips with clear schedules, heritage sites and reliable comfort.",
            MbtiType::Isfj => "Prefers cosy, familiar comforts: hot springs, traditional inns, family-friendly spots.",
            MbtiType::Estj => "Wants structured tours, famous sights and good logistics with no wasted time.",
            MbtiType::Esfj => "Travels to connect: lively markets, group activities and places everyone enjoys.",
            MbtiType::Istp => "Hands-on and independent: hiking, diving, road trips and learning how things work.",
            MbtiType::Isfp => "Follows the senses: art, nature, colour and quiet moments in beautiful scenery.",
            MbtiType::Estp => "Thrives on action: extreme sports, nightlife and anything with an adrenaline rush.",
            MbtiType::Esfp => "Wants fun in the moment: beaches, parties, shows and sharing it all with friends.",
        }
    }
}

impl fmt::Display for MbtiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MbtiType {
    type Err = UnknownMbtiType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        MbtiType::ALL
            .into_iter()
            .find(|t| t.code() == upper)
            .ok_or_else(|| UnknownMbtiType(s.to_string()))
    }
}

impl TryFrom<String> for MbtiType {
    type Error = UnknownMbtiType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MbtiType> for String {
    fn from(value: MbtiType) -> Self {
        value.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("enfp".parse::<MbtiType>().unwrap(), MbtiType::Enfp);
        assert_eq!(" IsTj ".parse::<MbtiType>().unwrap(), MbtiType::Istj);
        assert!("ABCD".parse::<MbtiType>().is_err());
        assert!("".parse::<MbtiType>().is_err());
    }

    #[test]
    fn codes_round_trip_through_display() {
        for t in MbtiType::ALL {
            assert_eq!(t.to_string().parse::<MbtiType>().unwrap(), t);
            assert_eq!(t.code().len(), 4);
        }
    }

    #[test]
    fn all_codes_are_distinct() {
        let mut codes: Vec<_> = MbtiType::ALL.iter().map(|t| t.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 16);
    }

    #[test]
    fn serde_uses_upper_case_code() {
        let json = serde_json::to_string(&MbtiType::Infp).unwrap();
        assert_eq!(json, "\"INFP\"");
        let parsed: MbtiType = serde_json::from_str("\"infp\"").unwrap();
        assert_eq!(parsed, MbtiType::Infp);
        assert!(serde_json::from_str::<MbtiType>("\"XXXX\"").is_err());
    }
}
