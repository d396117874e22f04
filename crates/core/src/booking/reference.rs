use uuid::Uuid;

/// Prefix of every booking reference.
pub const REFERENCE_PREFIX: &str = "BK";

/// Generate a booking reference: `BK` followed by 128 random bits as uppercase hex.
pub fn new_booking_reference() -> String {
    format!(
        "{}{}",
        REFERENCE_PREFIX,
        Uuid::new_v4().simple().to_string().to_uppercase()
    )
}
