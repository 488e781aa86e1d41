mod trip;
mod validation;

pub use trip::{TripField, TripRequest};
pub use validation::{
    FieldRule, ValidationError, validate_flight, validate_identity, validate_name, validate_tel,
};
