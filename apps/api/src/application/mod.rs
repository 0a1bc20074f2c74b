pub mod registration_session;
pub mod submit_registration;
