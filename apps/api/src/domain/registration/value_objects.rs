use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

/// Raised when a selection does not name a known catalog value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownOption::new("gender", s))
    }
}

/// Current year of study, stored as its catalog value `"1"`..`"4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum YearOfStudy {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
    #[serde(rename = "4")]
    Fourth,
}

impl YearOfStudy {
    pub const ALL: [YearOfStudy; 4] = [
        YearOfStudy::First,
        YearOfStudy::Second,
        YearOfStudy::Third,
        YearOfStudy::Fourth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "1",
            Self::Second => "2",
            Self::Third => "3",
            Self::Fourth => "4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::First => "1st Year",
            Self::Second => "2nd Year",
            Self::Third => "3rd Year",
            Self::Fourth => "4th Year",
        }
    }
}

impl FromStr for YearOfStudy {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|y| y.as_str() == s)
            .ok_or_else(|| UnknownOption::new("year of study", s))
    }
}

/// Selected team size, counting the submitting participant.
///
/// The participant is always the first member, so a team of strength `n`
/// carries `n - 1` teammate entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TeamStrength {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
}

impl TeamStrength {
    pub const ALL: [TeamStrength; 3] = [TeamStrength::Two, TeamStrength::Three, TeamStrength::Four];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Two => "2 members",
            Self::Three => "3 members",
            Self::Four => "4 members",
        }
    }

    pub fn members(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Number of teammate entries required besides the participant.
    pub fn teammate_slots(self) -> usize {
        self.members() - 1
    }
}

impl FromStr for TeamStrength {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownOption::new("team strength", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Profession {
    #[serde(rename = "individual")]
    Individual,
    #[serde(rename = "startup")]
    Startup,
    #[serde(rename = "working_professional", alias = "working professional")]
    WorkingProfessional,
    #[serde(rename = "student")]
    Student,
}

impl Profession {
    pub const ALL: [Profession; 4] = [
        Profession::Individual,
        Profession::Startup,
        Profession::WorkingProfessional,
        Profession::Student,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Startup => "startup",
            Self::WorkingProfessional => "working_professional",
            Self::Student => "student",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Startup => "Startup",
            Self::WorkingProfessional => "Working Professional",
            Self::Student => "Student",
        }
    }
}

impl FromStr for Profession {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "working professional" {
            return Ok(Self::WorkingProfessional);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownOption::new("profession", s))
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Gender, YearOfStudy, TeamStrength, Profession);
