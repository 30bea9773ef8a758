//! Utilities to be used in serde derives for more robust (de)serializations.

use serde::{Deserialize, Deserializer};

/// Many fields in the webauthn spec have the following wording.
///
/// > The values SHOULD be members of `T` but client platforms MUST ignore unknown values.
///
/// This method is a simple way of ignoring unknown values without failing deserialization.
pub fn ignore_unknown<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(T::deserialize(de).unwrap_or_default())
}

/// Same as [`ignore_unknown`] for the items of an optional list, except that
/// unknown items are filtered out of the list instead of replaced by a
/// default value.
pub fn ignore_unknown_opt_vec<'de, D, T>(de: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged, bound = "T: Deserialize<'de>")]
    enum Item<T> {
        Known(T),
        Unknown(serde::de::IgnoredAny),
    }

    let items = Option::<Vec<Item<T>>>::deserialize(de)?;
    Ok(items.map(|list| {
        list.into_iter()
            .filter_map(|item| match item {
                Item::Known(value) => Some(value),
                Item::Unknown(_) => None,
            })
            .collect()
    }))
}

/// Deserialize a numeric field which some platforms emit as a JSON string.
pub fn maybe_stringified<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(de)? {
        Some(NumberOrString::Number(timeout)) => Ok(Some(timeout)),
        Some(NumberOrString::String(string)) => Ok(string.parse().ok()),
        None => Ok(None),
    }
}

pub mod i64_to_iana {
    use coset::iana::EnumI64;

    pub fn serialize<S, T>(value: &T, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: EnumI64,
    {
        ser.serialize_i64(value.to_i64())
    }

    pub fn deserialize<'de, D, T>(de: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: EnumI64,
    {
        let value: i64 = serde::Deserialize::deserialize(de)?;

        T::from_i64(value).ok_or_else(|| {
            <D::Error as serde::de::Error>::invalid_value(
                serde::de::Unexpected::Signed(value),
                &"an iana::Algorithm value",
            )
        })
    }
}
