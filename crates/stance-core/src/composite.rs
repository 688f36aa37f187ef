//! Stacking of several variable sets into the single vector the solver sees.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use nalgebra::DVector;
use tracing::warn;

use crate::error::VariableError;
use crate::traits::{Bounds, VariableSet};

/// A variable set shared between the composite and the constraints reading it.
pub type SharedVariableSet = Rc<RefCell<dyn VariableSet>>;

/// Ordered stack of variable sets.
///
/// Values and bounds are concatenated in insertion order. An update is applied
/// to all sets or to none: if one set rejects its slice, the sets already
/// updated are restored to their previous values.
pub struct VariableComposite {
    name: String,
    sets: Vec<SharedVariableSet>,
}

impl VariableComposite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: Vec::new(),
        }
    }

    pub fn add_set(&mut self, set: SharedVariableSet) {
        self.sets.push(set);
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Names of the stacked sets, in order.
    pub fn names(&self) -> Vec<String> {
        self.sets.iter().map(|s| s.borrow().name().to_owned()).collect()
    }

    /// First index of the named set inside the stacked vector.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for set in &self.sets {
            let set = set.borrow();
            if set.name() == name {
                return Some(offset);
            }
            offset += set.rows();
        }
        None
    }
}

impl VariableSet for VariableComposite {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> usize {
        self.sets.iter().map(|s| s.borrow().rows()).sum()
    }

    fn values(&self) -> DVector<f64> {
        let parts: Vec<f64> = self
            .sets
            .iter()
            .flat_map(|s| s.borrow().values().iter().copied().collect::<Vec<_>>())
            .collect();
        DVector::from_vec(parts)
    }

    fn set_variables(&mut self, x: &DVector<f64>) -> Result<(), VariableError> {
        let expected = self.rows();
        if x.len() != expected {
            return Err(VariableError::DimensionMismatch {
                expected,
                got: x.len(),
            });
        }

        let mut previous = Vec::with_capacity(self.sets.len());
        let mut offset = 0;
        for (i, set) in self.sets.iter().enumerate() {
            let mut set = set.borrow_mut();
            let n = set.rows();
            let before = set.values();
            if let Err(err) = set.set_variables(&x.rows(offset, n).into_owned()) {
                drop(set);
                warn!(composite = %self.name, set = i, %err, "rejected iterate, restoring previous values");
                for (restored, values) in self.sets.iter().zip(previous) {
                    // previously accepted values
                    restored.borrow_mut().set_variables(&values)?;
                }
                return Err(err);
            }
            previous.push(before);
            offset += n;
        }
        Ok(())
    }

    fn bounds(&self) -> Vec<Bounds> {
        self.sets.iter().flat_map(|s| s.borrow().bounds()).collect()
    }
}

impl fmt::Debug for VariableComposite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableComposite")
            .field("name", &self.name)
            .field("sets", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scalar variables whose first entry must stay below `limit`.
    struct Capped {
        name: String,
        x: Vec<f64>,
        limit: f64,
    }

    impl VariableSet for Capped {
        fn name(&self) -> &str {
            &self.name
        }
        fn rows(&self) -> usize {
            self.x.len()
        }
        fn values(&self) -> DVector<f64> {
            DVector::from_column_slice(&self.x)
        }
        fn set_variables(&mut self, x: &DVector<f64>) -> Result<(), VariableError> {
            if x[0] >= self.limit {
                return Err(VariableError::NonPositiveLastDuration {
                    duration: self.limit - x[0],
                    total: self.limit,
                });
            }
            self.x = x.iter().copied().collect();
            Ok(())
        }
        fn bounds(&self) -> Vec<Bounds> {
            vec![Bounds::new(0.0, self.limit); self.x.len()]
        }
    }

    fn capped(name: &str, x: Vec<f64>, limit: f64) -> Rc<RefCell<Capped>> {
        Rc::new(RefCell::new(Capped {
            name: name.into(),
            x,
            limit,
        }))
    }

    #[test]
    fn stacks_values_and_bounds() {
        let mut comp = VariableComposite::new("all");
        comp.add_set(capped("a", vec![0.1, 0.2], 1.0));
        comp.add_set(capped("b", vec![0.3], 2.0));

        assert_eq!(comp.rows(), 3);
        assert_eq!(comp.values().as_slice(), &[0.1, 0.2, 0.3]);
        let bounds = comp.bounds();
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds[2], Bounds::new(0.0, 2.0));
        assert_eq!(comp.names(), vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn offset_of_named_sets() {
        let mut comp = VariableComposite::new("all");
        comp.add_set(capped("a", vec![0.1, 0.2], 1.0));
        comp.add_set(capped("b", vec![0.3], 2.0));
        assert_eq!(comp.offset_of("a"), Some(0));
        assert_eq!(comp.offset_of("b"), Some(2));
        assert_eq!(comp.offset_of("c"), None);
    }

    #[test]
    fn splits_update_across_sets() {
        let a = capped("a", vec![0.1, 0.2], 1.0);
        let b = capped("b", vec![0.3], 2.0);
        let mut comp = VariableComposite::new("all");
        comp.add_set(a.clone());
        comp.add_set(b.clone());

        comp.set_variables(&DVector::from_vec(vec![0.5, 0.6, 0.7]))
            .unwrap();
        assert_eq!(a.borrow().x, vec![0.5, 0.6]);
        assert_eq!(b.borrow().x, vec![0.7]);
    }

    #[test]
    fn rejected_slice_restores_earlier_sets() {
        let a = capped("a", vec![0.1, 0.2], 1.0);
        let b = capped("b", vec![0.3], 2.0);
        let mut comp = VariableComposite::new("all");
        comp.add_set(a.clone());
        comp.add_set(b.clone());

        let err = comp
            .set_variables(&DVector::from_vec(vec![0.5, 0.6, 5.0]))
            .unwrap_err();
        assert!(matches!(err, VariableError::NonPositiveLastDuration { .. }));
        assert_eq!(a.borrow().x, vec![0.1, 0.2]);
        assert_eq!(b.borrow().x, vec![0.3]);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let mut comp = VariableComposite::new("all");
        comp.add_set(capped("a", vec![0.1, 0.2], 1.0));
        let err = comp
            .set_variables(&DVector::from_vec(vec![0.5]))
            .unwrap_err();
        assert_eq!(
            err,
            VariableError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
    }
}
