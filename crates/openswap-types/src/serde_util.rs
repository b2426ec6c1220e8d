//! Serde helpers.

/// Serde helper to (de)serialize `u128` as decimal strings.
///
/// Identifiers and amounts routinely exceed 2^53, and tagged or flattened
/// serde representations cannot buffer native 128-bit integers.
pub mod u128_str {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &u128, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse::<u128>().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::u128_str;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Wrapper(#[serde(with = "u128_str")] u128);

    #[test]
    fn large_values_survive() {
        let w = Wrapper(u128::MAX);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, format!("\"{}\"", u128::MAX));
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }

    #[test]
    fn non_numeric_rejected() {
        assert!(serde_json::from_str::<Wrapper>("\"12a\"").is_err());
        assert!(serde_json::from_str::<Wrapper>("\"-1\"").is_err());
    }
}
