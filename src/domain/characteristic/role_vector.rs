//! Fixed-size role score vector.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Role;

/// One normalized score per `Role`, each component in `[0.0, 1.0]`.
///
/// Every write clamps its component independently; there is no cross-component
/// normalization. Non-finite inputs are stored as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 7]", into = "[f64; 7]")]
pub struct RoleVector([f64; Role::COUNT]);

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl RoleVector {
    /// All components zero.
    pub const fn zero() -> Self {
        Self([0.0; Role::COUNT])
    }

    /// 1.0 for `role`, 0.0 elsewhere.
    pub fn one_hot(role: Role) -> Self {
        let mut v = Self::zero();
        v.set(role, 1.0);
        v
    }

    /// Builds a vector from raw components, clamping each.
    pub fn from_components(components: [f64; Role::COUNT]) -> Self {
        Self(components.map(clamp_unit))
    }

    /// Builds a vector from (role, score) pairs; unspecified roles stay 0.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Role, f64)>,
    {
        let mut v = Self::zero();
        for (role, score) in pairs {
            v.set(role, score);
        }
        v
    }

    pub fn get(&self, role: Role) -> f64 {
        self.0[role.index()]
    }

    /// Sets one component, clamped to `[0, 1]`.
    pub fn set(&mut self, role: Role, value: f64) {
        self.0[role.index()] = clamp_unit(value);
    }

    pub fn components(&self) -> &[f64; Role::COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, f64)> + '_ {
        Role::ALL.iter().map(move |role| (*role, self.0[role.index()]))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }

    /// Arithmetic mean of the components.
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / Role::COUNT as f64
    }

    /// Mean of squared deviations from the component mean.
    pub fn population_variance(&self) -> f64 {
        let mean = self.mean();
        self.0.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / Role::COUNT as f64
    }

    /// Adds `factor * other` component-wise, clamping each result.
    pub fn scaled_add(&mut self, other: &RoleVector, factor: f64) {
        for (slot, value) in self.0.iter_mut().zip(other.0.iter()) {
            *slot = clamp_unit(*slot + factor * value);
        }
    }

    /// Running average of `self` over `n` members after adding `other` as one more.
    ///
    /// Computes `(self * n + other) / (n + 1)` per component.
    pub fn blend_one_more(&self, n: u32, other: &RoleVector) -> RoleVector {
        let weight = f64::from(n);
        let mut out = [0.0; Role::COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (self.0[i] * weight + other.0[i]) / (weight + 1.0);
        }
        RoleVector::from_components(out)
    }
}

impl Default for RoleVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[f64; Role::COUNT]> for RoleVector {
    fn from(components: [f64; Role::COUNT]) -> Self {
        Self::from_components(components)
    }
}

impl From<RoleVector> for [f64; Role::COUNT] {
    fn from(v: RoleVector) -> Self {
        v.0
    }
}

impl fmt::Display for RoleVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| format!("{:.3}", c)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_components_clamps_each_component_independently() {
        let v = RoleVector::from_components([1.5, -0.2, 0.4, 7.0, 0.0, 1.0, -9.0]);
        assert_eq!(v.components(), &[1.0, 0.0, 0.4, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn scaled_add_clamps_after_adding() {
        let mut v = RoleVector::from_pairs([(Role::Leader, 0.8), (Role::Planner, 0.3)]);
        v.scaled_add(&RoleVector::from_pairs([(Role::Leader, 1.0), (Role::Planner, 1.0)]), 0.5);
        assert_eq!(v.get(Role::Leader), 1.0);
        assert!((v.get(Role::Planner) - 0.8).abs() < 1e-12);

        v.scaled_add(&RoleVector::one_hot(Role::Planner), -2.0);
        assert_eq!(v.get(Role::Planner), 0.0);
    }

    #[test]
    fn nan_and_infinity_are_sanitized() {
        let v = RoleVector::from_components([f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.3, 0.0, 0.0, 0.0]);
        assert_eq!(v.get(Role::Leader), 0.0);
        assert_eq!(v.get(Role::Planner), 1.0);
        assert_eq!(v.get(Role::Expert), 0.0);
        assert_eq!(v.get(Role::Creative), 0.3);
    }

    #[test]
    fn one_hot_sets_single_component() {
        let v = RoleVector::one_hot(Role::Creative);
        for (role, score) in v.iter() {
            let expected = if role == Role::Creative { 1.0 } else { 0.0 };
            assert_eq!(score, expected);
        }
    }

    #[test]
    fn one_hot_variance_is_six_forty_ninths() {
        let v = RoleVector::one_hot(Role::Leader);
        assert!((v.population_variance() - 6.0 / 49.0).abs() < 1e-15);
    }

    #[test]
    fn flat_vector_has_zero_variance() {
        let v = RoleVector::from_components([0.4; 7]);
        assert!(v.population_variance().abs() < 1e-15);
    }

    #[test]
    fn blend_one_more_averages() {
        let group = RoleVector::one_hot(Role::Leader);
        let candidate = RoleVector::one_hot(Role::Planner);
        let blended = group.blend_one_more(1, &candidate);
        assert_eq!(blended.get(Role::Leader), 0.5);
        assert_eq!(blended.get(Role::Planner), 0.5);
    }

    #[test]
    fn deserialization_clamps() {
        let v: RoleVector = serde_json::from_str("[2.0, -1.0, 0.5, 0, 0, 0, 0]").unwrap();
        assert_eq!(v.get(Role::Leader), 1.0);
        assert_eq!(v.get(Role::Planner), 0.0);
        assert_eq!(v.get(Role::Expert), 0.5);
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_string(&RoleVector::one_hot(Role::Leader)).unwrap();
        assert_eq!(json, "[1.0,0.0,0.0,0.0,0.0,0.0,0.0]");
    }

    proptest! {
        #[test]
        fn every_write_lands_in_unit_interval(
            raw in proptest::array::uniform7(any::<f64>()),
            extra in any::<f64>(),
            idx in 0usize..7,
        ) {
            let mut v = RoleVector::from_components(raw);
            v.set(Role::ALL[idx], extra);
            for (_, c) in v.iter() {
                prop_assert!((0.0..=1.0).contains(&c));
            }
        }
    }
}
