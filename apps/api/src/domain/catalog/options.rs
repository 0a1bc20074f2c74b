use crate::domain::registration::value_objects::{Gender, Profession, TeamStrength, YearOfStudy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Every static option list the registration form renders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionCatalog {
    pub gender: Vec<SelectOption>,
    pub current_year_of_study: Vec<SelectOption>,
    pub team_strength: Vec<SelectOption>,
    pub profession: Vec<SelectOption>,
}

pub fn gender_options() -> Vec<SelectOption> {
    Gender::ALL
        .into_iter()
        .map(|g| SelectOption::new(g.as_str(), g.label()))
        .collect()
}

pub fn year_of_study_options() -> Vec<SelectOption> {
    YearOfStudy::ALL
        .into_iter()
        .map(|y| SelectOption::new(y.as_str(), y.label()))
        .collect()
}

pub fn team_strength_options() -> Vec<SelectOption> {
    TeamStrength::ALL
        .into_iter()
        .map(|s| SelectOption::new(s.as_str(), s.label()))
        .collect()
}

pub fn profession_options() -> Vec<SelectOption> {
    Profession::ALL
        .into_iter()
        .map(|p| SelectOption::new(p.as_str(), p.label()))
        .collect()
}

pub fn catalog() -> OptionCatalog {
    OptionCatalog {
        gender: gender_options(),
        current_year_of_study: year_of_study_options(),
        team_strength: team_strength_options(),
        profession: profession_options(),
    }
}
