//! ObjectValue - ordered string-keyed map with shared storage.
//!
//! Keys keep insertion order and stay unique: `set` overwrites in place when
//! the key exists and appends otherwise, `del` removes without disturbing
//! the order of the rest. The store is shared between clones; mutation
//! copies it first when aliased, the same copy-on-write discipline as
//! vectors.

use std::cell::RefCell;
use std::rc::Rc;

use crate::session::SessionRef;
use crate::value::{UndefValue, Value};

#[derive(Debug)]
struct ObjectStore {
    keys: Vec<String>,
    values: Vec<Value>,
    session: Option<SessionRef>,
}

/// Ordered string-keyed map value.
#[derive(Debug, Clone)]
pub struct ObjectValue {
    store: Rc<RefCell<ObjectStore>>,
}

impl ObjectValue {
    pub fn new(session: Option<SessionRef>) -> Self {
        Self {
            store: Rc::new(RefCell::new(ObjectStore {
                keys: Vec::new(),
                values: Vec::new(),
                session,
            })),
        }
    }

    /// Detached empty object, used as the fallback for out-of-type access.
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Build an object from ordered key/value pairs; later duplicates
    /// overwrite earlier ones, as repeated `set` calls would.
    pub fn from_entries(
        session: Option<SessionRef>,
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let mut object = Self::new(session);
        for (key, value) in entries {
            object.set(&key, value);
        }
        object
    }

    pub fn len(&self) -> usize {
        self.store.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.borrow().keys.iter().any(|k| k == key)
    }

    /// The value stored under `key`, or the system undefined when absent.
    pub fn get(&self, key: &str) -> Value {
        let store = self.store.borrow();
        match store.keys.iter().position(|k| k == key) {
            Some(index) => store.values[index].clone(),
            None => Value::undefined(),
        }
    }

    /// Insert or overwrite. Returns true when an existing key was
    /// overwritten in place.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        self.make_unique();
        let mut store = self.store.borrow_mut();
        match store.keys.iter().position(|k| k == key) {
            Some(index) => {
                store.values[index] = value;
                true
            }
            None => {
                store.keys.push(key.to_string());
                store.values.push(value);
                false
            }
        }
    }

    /// Remove `key`, preserving the order of the remaining entries.
    /// Returns true when the key existed.
    pub fn del(&mut self, key: &str) -> bool {
        self.make_unique();
        let mut store = self.store.borrow_mut();
        match store.keys.iter().position(|k| k == key) {
            Some(index) => {
                store.keys.remove(index);
                store.values.remove(index);
                true
            }
            None => false,
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.store.borrow().keys.clone()
    }

    /// Ordered key/value pairs (values are cheap aliasing clones).
    pub fn entries(&self) -> Vec<(String, Value)> {
        let store = self.store.borrow();
        store
            .keys
            .iter()
            .cloned()
            .zip(store.values.iter().cloned())
            .collect()
    }

    pub fn session(&self) -> Option<SessionRef> {
        self.store.borrow().session.clone()
    }

    /// Structural equality as a runtime value.
    ///
    /// Same store compares equal immediately; otherwise both objects must
    /// agree on length, then on the key and value at every index. A value
    /// comparison that does not come back boolean-unequal counts as equal.
    pub fn equals(&self, other: &ObjectValue) -> Value {
        if Rc::ptr_eq(&self.store, &other.store) {
            return Value::Bool(true);
        }
        let a = self.store.borrow();
        let b = other.store.borrow();
        if a.values.len() != b.values.len() {
            return Value::Bool(false);
        }
        for index in 0..a.values.len() {
            if a.keys[index] != b.keys[index] {
                return Value::Bool(false);
            }
            let unequal = a.values[index].not_equals(&b.values[index]);
            if unequal.to_bool() {
                return Value::Bool(false);
            }
        }
        Value::Bool(true)
    }

    pub fn not_equals(&self, other: &ObjectValue) -> Value {
        Value::Bool(!self.equals(other).to_bool())
    }

    pub fn less_than(&self, _other: &ObjectValue) -> Value {
        Value::Undefined(UndefValue::with_reason(
            "operation undefined (object < object)",
        ))
    }

    pub fn greater_than(&self, _other: &ObjectValue) -> Value {
        Value::Undefined(UndefValue::with_reason(
            "operation undefined (object > object)",
        ))
    }

    pub fn less_or_equal(&self, _other: &ObjectValue) -> Value {
        Value::Undefined(UndefValue::with_reason(
            "operation undefined (object <= object)",
        ))
    }

    pub fn greater_or_equal(&self, _other: &ObjectValue) -> Value {
        Value::Undefined(UndefValue::with_reason(
            "operation undefined (object >= object)",
        ))
    }

    fn make_unique(&mut self) {
        if Rc::strong_count(&self.store) == 1 {
            return;
        }
        let copy = {
            let store = self.store.borrow();
            ObjectStore {
                keys: store.keys.clone(),
                values: store.values.clone(),
                session: store.session.clone(),
            }
        };
        self.store = Rc::new(RefCell::new(copy));
    }
}
