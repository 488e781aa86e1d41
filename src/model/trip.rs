use super::validation::{
    FieldRule, ValidationError, validate_flight, validate_identity, validate_name, validate_tel,
};

/// The fields of a [`TripRequest`], in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripField {
    /// Drop-off airport and terminal. Fixed by configuration.
    Airport,
    Flight,
    Name,
    Tel,
    /// ID card or passport number.
    Identity,
    RideNotes,
}

impl TripField {
    /// All fields in display order.
    pub const ALL: [TripField; 6] = [
        Self::Airport,
        Self::Flight,
        Self::Name,
        Self::Tel,
        Self::Identity,
        Self::RideNotes,
    ];

    /// Label shown above the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Airport => "Drop-off Airport",
            Self::Flight => "Flight Number",
            Self::Name => "Name",
            Self::Tel => "Phone",
            Self::Identity => "ID / Passport Number",
            Self::RideNotes => "Ride Notes",
        }
    }

    /// The validation rule for this field, or `None` if the field is unconstrained.
    pub fn rule(self) -> Option<FieldRule> {
        match self {
            Self::Flight => Some(validate_flight),
            Self::Name => Some(validate_name),
            Self::Tel => Some(validate_tel),
            Self::Identity => Some(validate_identity),
            Self::Airport | Self::RideNotes => None,
        }
    }

    /// Runs this field's rule against `value`. Unconstrained fields always pass.
    pub fn check(self, value: &str) -> Result<(), ValidationError> {
        self.rule().map_or(Ok(()), |rule| rule(value))
    }

    /// Returns `true` if the user may edit this field.
    pub fn is_editable(self) -> bool {
        self != Self::Airport
    }
}

/// One passenger's airport drop-off request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripRequest {
    pub airport: String,
    pub flight: String,
    pub name: String,
    pub tel: String,
    pub identity: String,
    pub ride_notes: String,
}

impl TripRequest {
    /// Returns the stored value for `field`.
    pub fn get(&self, field: TripField) -> &str {
        match field {
            TripField::Airport => &self.airport,
            TripField::Flight => &self.flight,
            TripField::Name => &self.name,
            TripField::Tel => &self.tel,
            TripField::Identity => &self.identity,
            TripField::RideNotes => &self.ride_notes,
        }
    }

    /// Checks every constrained field and returns the failures in field order.
    ///
    /// An empty result means the request may be submitted.
    pub fn validate(&self) -> Vec<(TripField, ValidationError)> {
        TripField::ALL
            .into_iter()
            .filter_map(|field| field.check(self.get(field)).err().map(|e| (field, e)))
            .collect()
    }

    /// Returns `true` if every constrained field passes its rule.
    pub fn is_submittable(&self) -> bool {
        self.validate().is_empty()
    }
}
