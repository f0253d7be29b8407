use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod customers;
pub mod orders;
pub mod products;
pub mod settings;
pub mod users;

/// Distinguishes an absent field from an explicit null in partial updates:
/// absent leaves the stored value alone, null clears it.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
