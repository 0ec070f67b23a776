//! Sample forms and stored responses for tests and the demo binary.

pub mod event_registration;
pub mod team_lunch;

pub use event_registration::{
    RETAINED_HISTORICAL_RESPONSES, event_registration, historical_responses, sample_answers,
};
pub use team_lunch::team_lunch;
