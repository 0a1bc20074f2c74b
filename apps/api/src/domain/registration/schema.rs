//! Declarative validation of the combined participant + team form.
//!
//! Each field carries its rules as `validator` attributes. Validation runs the
//! whole tree and reports every failing rule, keyed by dotted field path, so
//! each input can show its own message. Nothing here touches the store.

use super::entity::{NewParticipant, NewTeam, ValidatedRegistration};
use super::errors::FieldErrors;
use super::members::MemberList;
use super::value_objects::{Gender, Profession, TeamStrength, YearOfStudy};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use ts_rs::TS;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

pub const MIN_AGE: i64 = 16;
pub const MAX_AGE: i64 = 100;

lazy_static! {
    static ref MOBILE_DIGITS_REGEX: regex::Regex = regex::Regex::new(r"^[0-9]+$").unwrap();
    static ref VIDEO_URL_REGEX: regex::Regex =
        regex::Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be|vimeo\.com)/.+").unwrap();
}

/// Raw participant section as typed into the form. Selections that have not
/// been made yet are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(default)]
#[ts(export)]
pub struct ParticipantInput {
    #[validate(length(min = 3, message = "Participant name must be at least 3 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_age"))]
    pub age: String,

    #[validate(
        required(message = "Please select a gender"),
        custom(function = "validate_gender")
    )]
    pub gender: Option<String>,

    #[validate(
        length(equal = 10, message = "Mobile number must be 10 digits"),
        regex(path = *MOBILE_DIGITS_REGEX, message = "Mobile number must contain only digits")
    )]
    pub mobile: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 2, message = "Institution name is required"))]
    pub educational_institution: String,

    #[validate(
        required(message = "Please select current year"),
        custom(function = "validate_year_of_study")
    )]
    pub current_year_of_study: Option<String>,

    #[validate(length(min = 2, message = "Field of study is required"))]
    pub field_of_study: String,
}

/// Team fields a user edits directly. Strength and members are changed
/// through the member list so the two never drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct TeamDetailsInput {
    pub name: String,
    pub profession: Option<String>,
    pub company_name: Option<String>,
    pub company_cin: Option<String>,
    pub video_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(default)]
#[ts(export)]
pub struct TeamInput {
    #[validate(custom(function = "validate_team_name"))]
    pub name: String,

    #[validate(
        required(message = "Please select the number of members"),
        custom(function = "validate_strength")
    )]
    pub strength: Option<String>,

    #[validate(
        required(message = "Please select a profession"),
        custom(function = "validate_profession")
    )]
    pub profession: Option<String>,

    pub company_name: Option<String>,

    pub company_cin: Option<String>,

    #[validate(
        url(message = "Please enter a valid URL"),
        regex(path = *VIDEO_URL_REGEX, message = "Please provide a valid YouTube or Vimeo video URL")
    )]
    pub video_link: String,

    pub members: MemberList,
}

impl TeamInput {
    pub fn details(&self) -> TeamDetailsInput {
        TeamDetailsInput {
            name: self.name.clone(),
            profession: self.profession.clone(),
            company_name: self.company_name.clone(),
            company_cin: self.company_cin.clone(),
            video_link: self.video_link.clone(),
        }
    }

    pub fn apply_details(&mut self, details: TeamDetailsInput) {
        self.name = details.name;
        self.profession = details.profession;
        self.company_name = details.company_name;
        self.company_cin = details.company_cin;
        self.video_link = details.video_link;
    }
}

/// The whole form tree: `{ user, team }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(default)]
#[ts(export)]
pub struct RegistrationForm {
    #[validate(nested)]
    pub user: ParticipantInput,

    #[validate(nested)]
    pub team: TeamInput,
}

impl RegistrationForm {
    /// Validates every field and, if all pass, returns the typed registration.
    pub fn validate_all(&self) -> Result<ValidatedRegistration, FieldErrors> {
        if let Err(errors) = self.validate() {
            let mut fields = FieldErrors::new();
            collect_field_errors("", &errors, &mut fields);
            return Err(fields);
        }
        self.to_validated()
    }

    fn to_validated(&self) -> Result<ValidatedRegistration, FieldErrors> {
        let mut fields = FieldErrors::new();
        let user = &self.user;
        let team = &self.team;

        let age = record(&mut fields, "user.age", parse_age(&user.age));
        let gender = record(&mut fields, "user.gender", parse_selection::<Gender>(&user.gender, "Please select a gender"));
        let year = record(
            &mut fields,
            "user.current_year_of_study",
            parse_selection::<YearOfStudy>(&user.current_year_of_study, "Please select current year"),
        );
        let strength = record(
            &mut fields,
            "team.strength",
            parse_selection::<TeamStrength>(&team.strength, "Please select the number of members"),
        );
        let profession = record(
            &mut fields,
            "team.profession",
            parse_selection::<Profession>(&team.profession, "Please select a profession"),
        );

        let (Some(age), Some(gender), Some(current_year_of_study), Some(strength), Some(profession)) =
            (age, gender, year, strength, profession)
        else {
            return Err(fields);
        };

        Ok(ValidatedRegistration {
            participant: NewParticipant {
                name: user.name.trim().to_string(),
                age,
                gender,
                mobile: user.mobile.clone(),
                email: user.email.trim().to_string(),
                educational_institution: user.educational_institution.clone(),
                current_year_of_study,
                field_of_study: user.field_of_study.clone(),
            },
            team: NewTeam {
                name: team.name.trim().to_string(),
                strength,
                profession,
                company_name: non_blank(&team.company_name),
                company_cin: non_blank(&team.company_cin),
                video_link: team.video_link.trim().to_string(),
                members: team.members.entries(),
            },
        })
    }
}

fn record<T>(fields: &mut FieldErrors, path: &str, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            fields.push(path, message_of(&err));
            None
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Flattens `validator`'s nested error tree into dotted paths.
fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    out.push(path.clone(), message_of(err));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{path}.{index}"), inner, out);
                }
            }
        }
    }
}

fn message_of(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Coerces the raw age text to a number. Surrounding whitespace is ignored,
/// anything else that is not a whole integer is rejected rather than read as 0.
/// Integers too large for `i64` are still numbers and fail the range rule.
pub fn parse_age(raw: &str) -> Result<i32, ValidationError> {
    let out_of_range = || failure("age_range", "Age must be between 16 and 100");
    let trimmed = raw.trim();
    let age: i64 = match trimmed.parse() {
        Ok(age) => age,
        Err(_) if is_integer_literal(trimmed) => return Err(out_of_range()),
        Err(_) => return Err(failure("age_not_a_number", "Age must be a number")),
    };
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(out_of_range());
    }
    i32::try_from(age).map_err(|_| out_of_range())
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_selection<T: FromStr>(raw: &Option<String>, message: &'static str) -> Result<T, ValidationError> {
    raw.as_deref()
        .ok_or_else(|| failure("required", message))?
        .parse()
        .map_err(|_| failure("unknown_option", message))
}

fn validate_age(raw: &str) -> Result<(), ValidationError> {
    parse_age(raw).map(|_| ())
}

fn validate_team_name(raw: &str) -> Result<(), ValidationError> {
    let length = raw.chars().count();
    if length < 2 {
        return Err(failure("team_name_length", "Team name must be at least 2 characters"));
    }
    if length > 100 {
        return Err(failure("team_name_length", "Team name cannot exceed 100 characters"));
    }
    Ok(())
}

fn validate_option<T: FromStr>(raw: &str, message: &'static str) -> Result<(), ValidationError> {
    raw.parse::<T>()
        .map(|_| ())
        .map_err(|_| failure("unknown_option", message))
}

fn validate_gender(raw: &str) -> Result<(), ValidationError> {
    validate_option::<Gender>(raw, "Please select a gender")
}

fn validate_year_of_study(raw: &str) -> Result<(), ValidationError> {
    validate_option::<YearOfStudy>(raw, "Please select current year")
}

fn validate_strength(raw: &str) -> Result<(), ValidationError> {
    validate_option::<TeamStrength>(raw, "Please select the number of members")
}

fn validate_profession(raw: &str) -> Result<(), ValidationError> {
    validate_option::<Profession>(raw, "Please select a profession")
}
