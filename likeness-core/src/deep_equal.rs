//! Cycle-safe deep structural equality.
//!
//! The comparison is co-inductive: before descending into a pair of objects
//! the pair is recorded as "assumed equal", and meeting the same pair again
//! further down answers `true` immediately. Two self-referencing graphs with
//! the same shape therefore compare equal instead of recursing forever.
//!
//! Pairs are never removed from the state for the rest of the call. The one
//! place where a `false` does not end the whole comparison is the search for
//! a matching member in a set or map; those trials run against a scratch copy
//! of the state that is only kept when the trial succeeds.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::classify::Kind;
use crate::comparator::Comparator;
use crate::identical::identical;
use crate::value::{Object, ObjectClass, Property, Value};

/// Unordered pairs of object identities assumed equal during one top-level
/// comparison.
///
/// Each entry keeps handles to both objects, so an address in the table can
/// never be reused by an unrelated allocation while the state is alive.
#[derive(Default, Clone)]
pub struct TraversalState {
    assumed: HashMap<(usize, usize), (Object, Object)>,
}

impl fmt::Debug for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalState")
            .field("assumed", &self.assumed.len())
            .finish()
    }
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &Object, b: &Object) -> (usize, usize) {
        let (x, y) = (a.addr(), b.addr());
        if x <= y { (x, y) } else { (y, x) }
    }

    pub fn is_assumed(&self, a: &Object, b: &Object) -> bool {
        self.assumed.contains_key(&Self::key(a, b))
    }

    /// Record the pair. Returns false if it was already recorded.
    pub fn assume(&mut self, a: &Object, b: &Object) -> bool {
        match self.assumed.entry(Self::key(a, b)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert((a.clone(), b.clone()));
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.assumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assumed.is_empty()
    }
}

impl Comparator {
    /// Deep structural equality with a fresh traversal state.
    pub fn deep_equal(&self, a: &Value, b: &Value) -> bool {
        let mut state = TraversalState::new();
        self.deep_equal_with(a, b, &mut state)
    }

    /// Deep structural equality continuing an existing traversal.
    pub fn deep_equal_with(&self, a: &Value, b: &Value, state: &mut TraversalState) -> bool {
        if identical(a, b) {
            return true;
        }

        let (left_kind, right_kind) = (self.classify_kind(a), self.classify_kind(b));
        if !left_kind.compatible_with(right_kind) {
            trace!(left = %left_kind, right = %right_kind, "kinds differ");
            return false;
        }

        if left_kind.is_reference_only() {
            return false;
        }
        if left_kind == Kind::ExternalNode {
            return self.same_node(a, b);
        }

        let (Value::Object(x), Value::Object(y)) = (a, b) else {
            return false;
        };

        if state.is_assumed(x, y) {
            trace!(kind = %left_kind, "pair already assumed equal");
            return true;
        }
        state.assume(x, y);

        let left = x.borrow();
        let right = y.borrow();

        // RUST CONCEPT: Or-patterns with bindings
        // Arrays and arguments objects bind the same way, so one arm covers
        // every mix of the two interchangeable kinds.
        let same_contents = match (&left.class, &right.class) {
            (
                ObjectClass::Array(xs) | ObjectClass::Arguments(xs),
                ObjectClass::Array(ys) | ObjectClass::Arguments(ys),
            ) => self.sequences_equal(xs, ys, state),
            (ObjectClass::Date(d1), ObjectClass::Date(d2)) => d1 == d2,
            (ObjectClass::Pattern(p1), ObjectClass::Pattern(p2)) => p1.same_pattern(p2),
            (ObjectClass::Set(m1), ObjectClass::Set(m2)) => self.sets_equal(m1, m2, state),
            (ObjectClass::Map(e1), ObjectClass::Map(e2)) => self.maps_equal(e1, e2, state),
            // Records: plain objects and non-element host objects
            _ => left.class_name() == right.class_name(),
        };

        same_contents && self.properties_equal(&left.properties, &right.properties, state)
    }

    fn sequences_equal(&self, xs: &[Value], ys: &[Value], state: &mut TraversalState) -> bool {
        xs.len() == ys.len()
            && xs
                .iter()
                .zip(ys)
                .all(|(x, y)| self.deep_equal_with(x, y, state))
    }

    // Own enumerable properties must form the same key set, whatever the
    // insertion order, with pairwise deep-equal values.
    fn properties_equal(
        &self,
        left: &IndexMap<Rc<str>, Property>,
        right: &IndexMap<Rc<str>, Property>,
        state: &mut TraversalState,
    ) -> bool {
        let enumerable = |(_, property): &(&Rc<str>, &Property)| property.enumerable;
        if left.iter().filter(enumerable).count() != right.iter().filter(enumerable).count() {
            return false;
        }

        left.iter().filter(enumerable).all(|(key, property)| {
            match right.get(key) {
                Some(other) if other.enumerable => {
                    self.deep_equal_with(&property.value, &other.value, state)
                }
                _ => false,
            }
        })
    }

    // Each member of `left` claims a distinct deep-equal member of `right`
    fn sets_equal(&self, left: &[Value], right: &[Value], state: &mut TraversalState) -> bool {
        if left.len() != right.len() {
            return false;
        }

        let mut claimed = vec![false; right.len()];
        for member in left {
            let found = self.claim_match(&mut claimed, state, |index, trial| {
                self.deep_equal_with(member, &right[index], trial)
            });
            if !found {
                trace!("set member has no counterpart");
                return false;
            }
        }
        true
    }

    fn maps_equal(
        &self,
        left: &[(Value, Value)],
        right: &[(Value, Value)],
        state: &mut TraversalState,
    ) -> bool {
        if left.len() != right.len() {
            return false;
        }

        let mut claimed = vec![false; right.len()];
        for (key, value) in left {
            let found = self.claim_match(&mut claimed, state, |index, trial| {
                let (other_key, other_value) = &right[index];
                self.deep_equal_with(key, other_key, trial)
                    && self.deep_equal_with(value, other_value, trial)
            });
            if !found {
                trace!("map entry has no counterpart");
                return false;
            }
        }
        true
    }

    // Try every unclaimed candidate against a scratch copy of the state and
    // keep the copy of the first candidate that matches.
    fn claim_match<F>(&self, claimed: &mut [bool], state: &mut TraversalState, mut matches: F) -> bool
    where
        F: FnMut(usize, &mut TraversalState) -> bool,
    {
        for index in 0..claimed.len() {
            if claimed[index] {
                continue;
            }
            let mut trial = state.clone();
            if matches(index, &mut trial) {
                claimed[index] = true;
                *state = trial;
                return true;
            }
        }
        false
    }
}
