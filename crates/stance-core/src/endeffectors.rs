use std::fmt;
use std::ops::{Div, Index, IndexMut, Sub};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EndeffectorId
// ---------------------------------------------------------------------------

/// Identifier of one end-effector (foot, hand) of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EndeffectorId {
    E0,
    E1,
    E2,
    E3,
    E4,
    E5,
}

impl EndeffectorId {
    /// Maximum number of end-effectors a robot may have.
    pub const MAX_COUNT: usize = 6;

    /// All ids in order.
    pub const ALL: [Self; Self::MAX_COUNT] =
        [Self::E0, Self::E1, Self::E2, Self::E3, Self::E4, Self::E5];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for EndeffectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.index())
    }
}

// ---------------------------------------------------------------------------
// Endeffectors<T>
// ---------------------------------------------------------------------------

/// Assigns one value to each end-effector, ordered E0 -> EN.
///
/// Common values are xyz-positions ([`EndeffectorsPos`]) and contact flags
/// ([`EndeffectorsBool`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endeffectors<T> {
    ee: Vec<T>,
}

pub type EndeffectorsPos = Endeffectors<Vector3<f64>>;
pub type EndeffectorsVel = EndeffectorsPos;
pub type EndeffectorsBool = Endeffectors<bool>;

impl<T> Default for Endeffectors<T> {
    fn default() -> Self {
        Self { ee: Vec::new() }
    }
}

impl<T: Default + Clone> Endeffectors<T> {
    /// Create `n_ee` default-valued entries.
    ///
    /// # Panics
    /// If `n_ee` exceeds [`EndeffectorId::MAX_COUNT`].
    pub fn new(n_ee: usize) -> Self {
        let mut ee = Self::default();
        ee.set_count(n_ee);
        ee
    }

    /// Define the number of end-effectors, default-filling new entries.
    ///
    /// # Panics
    /// If `n_ee` exceeds [`EndeffectorId::MAX_COUNT`].
    pub fn set_count(&mut self, n_ee: usize) {
        assert!(
            n_ee <= EndeffectorId::MAX_COUNT,
            "at most {} end-effectors supported, got {n_ee}",
            EndeffectorId::MAX_COUNT
        );
        self.ee.resize(n_ee, T::default());
    }
}

impl<T> Endeffectors<T> {
    /// Build from values ordered E0 -> EN. Returns `None` for more than six.
    pub fn from_vec(values: Vec<T>) -> Option<Self> {
        (values.len() <= EndeffectorId::MAX_COUNT).then_some(Self { ee: values })
    }

    /// Set every end-effector to `value`.
    pub fn set_all(&mut self, value: &T)
    where
        T: Clone,
    {
        for v in &mut self.ee {
            v.clone_from(value);
        }
    }

    pub fn count(&self) -> usize {
        self.ee.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ee.is_empty()
    }

    /// All ids from E0 -> EN.
    pub fn ees_ordered(&self) -> Vec<EndeffectorId> {
        EndeffectorId::ALL[..self.ee.len()].to_vec()
    }

    pub fn at(&self, ee: EndeffectorId) -> &T {
        &self.ee[ee.index()]
    }

    pub fn at_mut(&mut self, ee: EndeffectorId) -> &mut T {
        &mut self.ee[ee.index()]
    }

    pub fn get(&self, ee: EndeffectorId) -> Option<&T> {
        self.ee.get(ee.index())
    }

    /// Iterate `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EndeffectorId, &T)> {
        EndeffectorId::ALL.into_iter().zip(self.ee.iter())
    }

    pub fn values(&self) -> &[T] {
        &self.ee
    }

    pub fn into_vec(self) -> Vec<T> {
        self.ee
    }

    /// Apply `f` to every value, keeping the id ordering.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Endeffectors<U> {
        Endeffectors {
            ee: self.ee.iter().map(f).collect(),
        }
    }
}

impl Endeffectors<bool> {
    /// Copy with every flag flipped.
    #[must_use]
    pub fn invert(&self) -> Self {
        self.map(|c| !c)
    }

    /// Number of end-effectors whose flag is set.
    pub fn true_count(&self) -> usize {
        self.ee.iter().filter(|&&c| c).count()
    }
}

impl<T> Index<EndeffectorId> for Endeffectors<T> {
    type Output = T;
    fn index(&self, ee: EndeffectorId) -> &T {
        self.at(ee)
    }
}

impl<T> IndexMut<EndeffectorId> for Endeffectors<T> {
    fn index_mut(&mut self, ee: EndeffectorId) -> &mut T {
        self.at_mut(ee)
    }
}

impl<T: Clone + Sub<Output = T>> Sub for &Endeffectors<T> {
    type Output = Endeffectors<T>;

    fn sub(self, rhs: Self) -> Endeffectors<T> {
        debug_assert_eq!(self.count(), rhs.count());
        Endeffectors {
            ee: self
                .ee
                .iter()
                .zip(rhs.ee.iter())
                .map(|(a, b)| a.clone() - b.clone())
                .collect(),
        }
    }
}

impl<T: Clone + Sub<Output = T>> Sub for Endeffectors<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl<T: Clone + Div<f64, Output = T>> Div<f64> for &Endeffectors<T> {
    type Output = Endeffectors<T>;

    fn div(self, scalar: f64) -> Endeffectors<T> {
        self.map(|v| v.clone() / scalar)
    }
}

impl<T: Clone + Div<f64, Output = T>> Div<f64> for Endeffectors<T> {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        &self / scalar
    }
}

impl<T> FromIterator<T> for Endeffectors<T> {
    /// # Panics
    /// If the iterator yields more than [`EndeffectorId::MAX_COUNT`] values.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let ee: Vec<T> = iter.into_iter().collect();
        assert!(
            ee.len() <= EndeffectorId::MAX_COUNT,
            "at most {} end-effectors supported, got {}",
            EndeffectorId::MAX_COUNT,
            ee.len()
        );
        Self { ee }
    }
}

impl<T: fmt::Display> fmt::Display for Endeffectors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.ee {
            write!(f, "{v}, ")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Morphologies
// ---------------------------------------------------------------------------

/// Two-legged robots.
pub mod biped {
    use super::EndeffectorId;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FootId {
        L,
        R,
    }

    pub const fn foot(ee: EndeffectorId) -> Option<FootId> {
        match ee {
            EndeffectorId::E0 => Some(FootId::L),
            EndeffectorId::E1 => Some(FootId::R),
            _ => None,
        }
    }

    pub const fn endeffector(foot: FootId) -> EndeffectorId {
        match foot {
            FootId::L => EndeffectorId::E0,
            FootId::R => EndeffectorId::E1,
        }
    }
}

/// Four-legged robots.
pub mod quad {
    use super::EndeffectorId;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FootId {
        RF,
        LF,
        LH,
        RH,
    }

    pub const fn foot(ee: EndeffectorId) -> Option<FootId> {
        match ee {
            EndeffectorId::E0 => Some(FootId::LH),
            EndeffectorId::E1 => Some(FootId::LF),
            EndeffectorId::E2 => Some(FootId::RH),
            EndeffectorId::E3 => Some(FootId::RF),
            _ => None,
        }
    }

    pub const fn endeffector(foot: FootId) -> EndeffectorId {
        match foot {
            FootId::LH => EndeffectorId::E0,
            FootId::LF => EndeffectorId::E1,
            FootId::RH => EndeffectorId::E2,
            FootId::RF => EndeffectorId::E3,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
