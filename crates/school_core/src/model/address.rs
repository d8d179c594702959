//! Address entity.

/// Store-assigned address identifier.
pub type AddressId = i64;

/// Postal address owned by at most one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: Option<AddressId>,
    pub street: String,
    pub city: String,
    pub country: String,
}

impl Address {
    /// Creates an unsaved address.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            street: street.into(),
            city: city.into(),
            country: country.into(),
        }
    }
}
