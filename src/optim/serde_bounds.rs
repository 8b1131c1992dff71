//! JSON-safe representation of an optional set of box constraints.
//!
//! JSON has no infinities, so each end is written as `null` when it is not
//! finite and read back as `-∞` (lower) or `+∞` (upper).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Bound;

type Wire = (Option<f64>, Option<f64>);

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

pub fn serialize<S, const N: usize>(bounds: &Option<[Bound; N]>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    bounds
        .as_ref()
        .map(|b| b.iter().map(|&(lo, hi)| (finite(lo), finite(hi))).collect::<Vec<Wire>>())
        .serialize(s)
}

pub fn deserialize<'de, D, const N: usize>(d: D) -> Result<Option<[Bound; N]>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(wire) = Option::<Vec<Wire>>::deserialize(d)? else {
        return Ok(None);
    };
    if wire.len() != N {
        return Err(D::Error::invalid_length(wire.len(), &format!("{N} bounds").as_str()));
    }
    let mut out = [(f64::NEG_INFINITY, f64::INFINITY); N];
    for (slot, (lo, hi)) in out.iter_mut().zip(wire) {
        *slot = (lo.unwrap_or(f64::NEG_INFINITY), hi.unwrap_or(f64::INFINITY));
    }
    Ok(Some(out))
}
