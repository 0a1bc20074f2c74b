use registration_api::domain::{
    catalog::catalog,
    registration::{
        members::MemberList,
        schema::{ParticipantInput, RegistrationForm, TeamDetailsInput, parse_age},
        value_objects::{Profession, TeamStrength},
    },
};

fn filled_form() -> RegistrationForm {
    let mut form = RegistrationForm::default();
    form.user = ParticipantInput {
        name: "Meera Iyer".to_string(),
        age: "19".to_string(),
        gender: Some("female".to_string()),
        mobile: "9876543210".to_string(),
        email: "meera@example.com".to_string(),
        educational_institution: "BITS Pilani".to_string(),
        current_year_of_study: Some("2".to_string()),
        field_of_study: "Electronics".to_string(),
    };
    form.team.apply_details(TeamDetailsInput {
        name: "Signal Path".to_string(),
        profession: Some("working_professional".to_string()),
        company_name: Some("  ".to_string()),
        company_cin: None,
        video_link: "https://youtu.be/dQw4w9WgXcQ".to_string(),
    });
    form.team.strength = Some("2".to_string());
    form.team.members.on_team_size_change(TeamStrength::Two);
    form
}

#[test]
fn age_bounds_are_inclusive() {
    assert!(parse_age("15").is_err());
    assert_eq!(parse_age("16").ok(), Some(16));
    assert_eq!(parse_age("100").ok(), Some(100));
    assert!(parse_age("101").is_err());
}

#[test]
fn age_must_be_a_whole_number() {
    assert!(parse_age("").is_err());
    assert!(parse_age("twenty").is_err());
    assert!(parse_age("20.5").is_err());
    assert_eq!(parse_age(" 42 ").ok(), Some(42));
}

#[test]
fn valid_form_produces_typed_registration() {
    let registration = filled_form().validate_all().expect("form should be valid");
    assert_eq!(registration.participant.age, 19);
    assert_eq!(registration.team.profession, Profession::WorkingProfessional);
    assert_eq!(registration.team.company_name, None);
    assert_eq!(registration.team.members.len(), 1);
}

#[test]
fn working_professional_is_stored_in_identifier_form() {
    for spelling in ["working_professional", "working professional"] {
        let mut form = filled_form();
        form.team.profession = Some(spelling.to_string());
        let registration = form.validate_all().expect("form should be valid");
        assert_eq!(registration.team.profession.as_str(), "working_professional");
    }
}

#[test]
fn video_link_must_point_at_a_video_host() {
    let mut form = filled_form();
    form.team.video_link = "https://www.youtube.com/watch?v=abc".to_string();
    assert!(form.validate_all().is_ok());

    form.team.video_link = "https://example.com/video".to_string();
    let errors = form.validate_all().expect_err("non-video host should fail");
    assert!(errors.contains("team.video_link"));
}

#[test]
fn every_failing_field_is_reported_at_once() {
    let errors = RegistrationForm::default()
        .validate_all()
        .expect_err("empty form should fail");
    for path in [
        "user.name",
        "user.age",
        "user.gender",
        "user.mobile",
        "user.email",
        "user.educational_institution",
        "user.current_year_of_study",
        "user.field_of_study",
        "team.name",
        "team.strength",
        "team.profession",
        "team.video_link",
    ] {
        assert!(errors.contains(path), "expected an error for {}", path);
    }
}

#[test]
fn member_count_follows_team_size() {
    let mut members = MemberList::new();
    for strength in TeamStrength::ALL {
        members.on_team_size_change(strength);
        assert_eq!(members.len(), strength.members() - 1);
    }
}

#[test]
fn catalog_values_parse_back_into_their_enums() {
    let options = catalog();
    for option in &options.team_strength {
        assert!(option.value.parse::<TeamStrength>().is_ok());
    }
    for option in &options.profession {
        assert!(option.value.parse::<Profession>().is_ok());
    }
}
