//! VectorValue - the shared, embeddable sequence backing `[...]` values.
//!
//! A vector is a handle to a reference-counted backing store. The store
//! holds physical slots, each a `Value`; a slot may be an *embedded* vector,
//! i.e. another store spliced in by reference instead of copied. Embedding
//! makes comprehension-style concatenation O(1) per sub-list: the store
//! tracks `embed_excess`, the number of logical elements contributed by
//! embedded children beyond the one physical slot each occupies, so the
//! logical length is `slots + embed_excess` without walking the children.
//!
//! Iteration exposes the fully flattened logical view through an explicit
//! frame stack, and the store destructor walks an explicit purge list, so
//! neither deep embedding chains nor deep plain nesting can exhaust the
//! call stack.

use std::cell::RefCell;
use std::rc::Rc;

use crate::session::SessionRef;
use crate::value::Value;

pub(crate) type StoreRef = Rc<RefCell<VectorStore>>;

#[derive(Debug)]
pub(crate) struct VectorStore {
    vec: Vec<Value>,
    /// Sum over embedded children of (child logical size - 1).
    embed_excess: usize,
    session: Option<SessionRef>,
}

impl VectorStore {
    fn new(session: Option<SessionRef>) -> StoreRef {
        Rc::new(RefCell::new(VectorStore {
            vec: Vec::new(),
            embed_excess: 0,
            session,
        }))
    }
}

impl Drop for VectorStore {
    /// Iterative teardown.
    ///
    /// Embedded chains can be arbitrarily deep, so the destructor must not
    /// recurse once per level. Instead it scans its own slots for child
    /// stores about to die with it, moves their handles onto an explicit
    /// purge list, and keeps scanning each popped store *before* letting it
    /// drop - every node is destroyed only after its children have been
    /// discovered, and a chain of N single-reference embeddings unwinds in
    /// a loop, not N call frames.
    fn drop(&mut self) {
        if let Some(session) = &self.session {
            session.remove_vector_elements(self.vec.len());
        }
        let mut purge: Vec<StoreRef> = Vec::new();
        scavenge(&mut self.vec, &mut purge);
        while let Some(store) = purge.pop() {
            if let Ok(cell) = Rc::try_unwrap(store) {
                let mut inner = cell.into_inner();
                scavenge(&mut inner.vec, &mut purge);
                // `inner` drops here; its children are already detached, so
                // its own destructor scan finds nothing and returns.
            }
        }
    }
}

/// Move every dying child store out of `slots` and onto the purge list.
/// A child survives (and is left in place) while another handle aliases it.
fn scavenge(slots: &mut [Value], purge: &mut Vec<StoreRef>) {
    for slot in slots {
        let unique = match slot {
            Value::Vector(v) => Rc::strong_count(&v.store) == 1,
            Value::EmbeddedVector(e) => Rc::strong_count(&e.store) == 1,
            _ => false,
        };
        if !unique {
            continue;
        }
        match std::mem::replace(slot, Value::undefined()) {
            Value::Vector(v) => purge.push(v.store),
            Value::EmbeddedVector(e) => purge.push(e.store),
            other => *slot = other,
        }
    }
}

/// Ordered, sharable sequence of values.
///
/// Cloning aliases the backing store; mutation copies the store first when
/// it is aliased, so a value obtained from `clone()` can never be changed
/// through the original (nor vice versa).
#[derive(Debug, Clone)]
pub struct VectorValue {
    pub(crate) store: StoreRef,
}

impl VectorValue {
    /// New empty vector accounted against `session`.
    pub fn new(session: Option<SessionRef>) -> Self {
        Self {
            store: VectorStore::new(session),
        }
    }

    /// Detached empty vector, used as the fallback for out-of-type access.
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Build a vector from values; embedded vectors among them are spliced.
    pub fn from_values(
        session: Option<SessionRef>,
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        let mut vector = Self::new(session);
        for value in values {
            vector.push(value);
        }
        vector
    }

    /// The `[x, y, z]` convenience constructor.
    pub fn from_xyz(session: Option<SessionRef>, x: f64, y: f64, z: f64) -> Self {
        Self::from_values(
            session,
            [Value::Number(x), Value::Number(y), Value::Number(z)],
        )
    }

    /// Logical (flattened) element count.
    pub fn len(&self) -> usize {
        let store = self.store.borrow();
        store.vec.len() + store.embed_excess
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().vec.is_empty()
    }

    /// Physical slot count; differs from `len()` while children are
    /// embedded.
    pub fn physical_len(&self) -> usize {
        self.store.borrow().vec.len()
    }

    pub fn embed_excess(&self) -> usize {
        self.store.borrow().embed_excess
    }

    pub fn session(&self) -> Option<SessionRef> {
        self.store.borrow().session.clone()
    }

    /// Append a value. An embedded vector argument is spliced in by
    /// reference: its store becomes one physical slot and `embed_excess`
    /// absorbs the rest of its logical size. A single-element embedded
    /// child is copied directly so `embed_excess` never has to represent a
    /// zero-width splice; an empty one disappears.
    pub fn push(&mut self, value: Value) {
        self.make_unique();
        match value {
            Value::EmbeddedVector(embedded) => self.push_embedded(embedded),
            value => {
                let mut store = self.store.borrow_mut();
                if let Some(session) = &store.session {
                    session.add_vector_elements(1);
                }
                store.vec.push(value);
            }
        }
    }

    fn push_embedded(&mut self, embedded: EmbeddedVectorValue) {
        let size = embedded.len();
        if size > 1 {
            let mut store = self.store.borrow_mut();
            // The embedded slot itself counts toward the physical length,
            // so it contributes size - 1 extra logical elements.
            store.embed_excess += size - 1;
            if let Some(session) = &store.session {
                session.add_vector_elements(1);
            }
            store.vec.push(Value::EmbeddedVector(embedded));
        } else if size == 1 {
            if let Some(single) = embedded.iter().next() {
                self.push(single);
            }
        }
        // size == 0: nothing to splice
    }

    /// Element at logical index `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Value> {
        {
            let store = self.store.borrow();
            if store.embed_excess == 0 {
                return store.vec.get(index).cloned();
            }
        }
        self.iter().nth(index)
    }

    /// Iterate the logical (flattened) sequence.
    pub fn iter(&self) -> VectorIter {
        VectorIter {
            frames: vec![Frame {
                store: Rc::clone(&self.store),
                index: 0,
            }],
        }
    }

    /// Materialize the logical sequence into directly-owned slots and reset
    /// `embed_excess` to zero.
    ///
    /// Required before the vector is handed to storage that must not alias
    /// embedded children. Iterator-driven, so arbitrarily deep embedding
    /// flattens without call-stack growth. Safe on an aliased store: the
    /// logical content is unchanged.
    pub fn flatten(&self) {
        if self.store.borrow().embed_excess == 0 {
            return;
        }
        let flat: Vec<Value> = self.iter().collect();
        let mut store = self.store.borrow_mut();
        if let Some(session) = &store.session {
            session.add_vector_elements(flat.len());
            session.remove_vector_elements(store.vec.len());
        }
        store.embed_excess = 0;
        store.vec = flat;
    }

    /// Copy the backing store if any other handle aliases it.
    fn make_unique(&mut self) {
        if Rc::strong_count(&self.store) == 1 {
            return;
        }
        let copy = {
            let store = self.store.borrow();
            if let Some(session) = &store.session {
                session.add_vector_elements(store.vec.len());
            }
            VectorStore {
                vec: store.vec.clone(),
                embed_excess: store.embed_excess,
                session: store.session.clone(),
            }
        };
        self.store = Rc::new(RefCell::new(copy));
    }
}

/// A vector marked for splicing into a parent vector.
///
/// Never user-visible: it exists only as an argument to
/// [`VectorValue::push`] and inside a parent store's slots.
#[derive(Debug, Clone)]
pub struct EmbeddedVectorValue {
    pub(crate) store: StoreRef,
}

impl EmbeddedVectorValue {
    /// Logical element count of the embedded content.
    pub fn len(&self) -> usize {
        let store = self.store.borrow();
        store.vec.len() + store.embed_excess
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().vec.is_empty()
    }

    pub fn iter(&self) -> VectorIter {
        VectorIter {
            frames: vec![Frame {
                store: Rc::clone(&self.store),
                index: 0,
            }],
        }
    }

    /// View the same store as an ordinary vector.
    pub fn to_vector(&self) -> VectorValue {
        VectorValue {
            store: Rc::clone(&self.store),
        }
    }
}

impl From<VectorValue> for EmbeddedVectorValue {
    fn from(vector: VectorValue) -> Self {
        Self {
            store: vector.store,
        }
    }
}

#[derive(Debug)]
struct Frame {
    store: StoreRef,
    index: usize,
}

/// Iterator over a vector's logical sequence.
///
/// Embedded children are entered through an explicit frame stack, so
/// iteration depth lives on the heap. Elements are yielded as cheap
/// aliasing clones.
#[derive(Debug)]
pub struct VectorIter {
    frames: Vec<Frame>,
}

impl Iterator for VectorIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        loop {
            let frame = self.frames.last_mut()?;
            let store_rc = Rc::clone(&frame.store);
            let index = frame.index;
            let store = store_rc.borrow();
            if index >= store.vec.len() {
                drop(store);
                self.frames.pop();
                continue;
            }
            frame.index += 1;
            match &store.vec[index] {
                Value::EmbeddedVector(child) => {
                    let child_store = Rc::clone(&child.store);
                    drop(store);
                    self.frames.push(Frame {
                        store: child_store,
                        index: 0,
                    });
                }
                element => {
                    let result = element.clone();
                    return Some(result);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EvaluationSession;

    fn session() -> SessionRef {
        Rc::new(EvaluationSession::new())
    }

    fn numbers(session: Option<SessionRef>, values: &[f64]) -> VectorValue {
        VectorValue::from_values(session, values.iter().map(|&n| Value::Number(n)))
    }

    // ── push / len ────────────────────────────────────────────────────────────

    #[test]
    fn test_vector_push_and_len() {
        let mut v = VectorValue::new(None);
        assert!(v.is_empty());
        v.push(Value::Number(1.0));
        v.push(Value::Number(2.0));
        assert_eq!(v.len(), 2);
        assert_eq!(v.physical_len(), 2);
    }

    #[test]
    fn test_vector_get_by_logical_index() {
        let v = numbers(None, &[10.0, 20.0, 30.0]);
        assert!(matches!(v.get(1), Some(Value::Number(n)) if n == 20.0));
        assert!(v.get(3).is_none());
    }

    // ── embedding ─────────────────────────────────────────────────────────────

    #[test]
    fn test_vector_embedding_splices_by_reference() {
        let mut parent = VectorValue::new(None);
        parent.push(Value::EmbeddedVector(numbers(None, &[1.0, 2.0]).into()));
        parent.push(Value::EmbeddedVector(numbers(None, &[3.0]).into()));
        parent.push(Value::EmbeddedVector(numbers(None, &[]).into()));

        // [1,2] stays one slot + excess 1; [3] is copied in; [] vanishes
        assert_eq!(parent.len(), 3);
        assert_eq!(parent.physical_len(), 2);
        assert_eq!(parent.embed_excess(), 1);

        let flat: Vec<f64> = parent.iter().map(|v| v.to_f64()).collect();
        assert_eq!(flat, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_vector_flatten_materializes_and_resets_excess() {
        let mut parent = VectorValue::new(None);
        parent.push(Value::EmbeddedVector(numbers(None, &[1.0, 2.0]).into()));
        parent.push(Value::EmbeddedVector(numbers(None, &[3.0]).into()));
        parent.flatten();
        assert_eq!(parent.len(), 3);
        assert_eq!(parent.physical_len(), 3);
        assert_eq!(parent.embed_excess(), 0);
        let flat: Vec<f64> = parent.iter().map(|v| v.to_f64()).collect();
        assert_eq!(flat, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_vector_nested_embedding_iterates_in_order() {
        let inner = numbers(None, &[2.0, 3.0]);
        let mut middle = VectorValue::new(None);
        middle.push(Value::Number(1.0));
        middle.push(Value::EmbeddedVector(inner.into()));
        let mut outer = VectorValue::new(None);
        outer.push(Value::Number(0.0));
        outer.push(Value::EmbeddedVector(middle.into()));
        outer.push(Value::Number(4.0));

        assert_eq!(outer.len(), 5);
        let flat: Vec<f64> = outer.iter().map(|v| v.to_f64()).collect();
        assert_eq!(flat, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    // ── accounting ────────────────────────────────────────────────────────────

    #[test]
    fn test_vector_accounting_tracks_physical_slots() {
        let s = session();
        let mut parent = VectorValue::new(Some(Rc::clone(&s)));
        parent.push(Value::EmbeddedVector(
            numbers(Some(Rc::clone(&s)), &[1.0, 2.0]).into(),
        ));
        parent.push(Value::EmbeddedVector(
            numbers(Some(Rc::clone(&s)), &[3.0]).into(),
        ));
        // child [1,2]: 2 slots; its embed slot in parent: 1; [3]'s element
        // copied into parent: 1 (the [3] store itself died on embed)
        assert_eq!(s.vector_element_count(), 4);

        parent.flatten();
        // flatten drops the embedded child store (2) and rebuilds the
        // parent at logical size 3
        assert_eq!(s.vector_element_count(), 3);
        assert_eq!(parent.physical_len(), 3);

        drop(parent);
        assert_eq!(s.vector_element_count(), 0);
    }

    // ── copy-on-write ─────────────────────────────────────────────────────────

    #[test]
    fn test_vector_clone_is_aliasing_until_mutation() {
        let v = numbers(None, &[1.0, 2.0]);
        let w = v.clone();
        assert!(Rc::ptr_eq(&v.store, &w.store));

        let mut w = w;
        w.push(Value::Number(3.0));
        assert!(!Rc::ptr_eq(&v.store, &w.store));
        assert_eq!(v.len(), 2);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_vector_cow_copy_is_accounted() {
        let s = session();
        let v = numbers(Some(Rc::clone(&s)), &[1.0, 2.0]);
        assert_eq!(s.vector_element_count(), 2);
        let mut w = v.clone();
        w.push(Value::Number(3.0));
        assert_eq!(s.vector_element_count(), 5);
        drop(w);
        assert_eq!(s.vector_element_count(), 2);
        drop(v);
        assert_eq!(s.vector_element_count(), 0);
    }

    // ── teardown ──────────────────────────────────────────────────────────────

    #[test]
    fn test_vector_deep_embedded_chain_drops_without_recursion() {
        let s = session();
        let mut chain = numbers(Some(Rc::clone(&s)), &[0.0]);
        for _ in 0..10_000 {
            let mut parent = VectorValue::new(Some(Rc::clone(&s)));
            parent.push(Value::Number(1.0));
            parent.push(Value::EmbeddedVector(chain.into()));
            chain = parent;
        }
        assert!(s.vector_element_count() > 10_000);
        drop(chain);
        assert_eq!(s.vector_element_count(), 0);
    }

    #[test]
    fn test_vector_deep_plain_nesting_drops_without_recursion() {
        let s = session();
        let mut chain = numbers(Some(Rc::clone(&s)), &[0.0]);
        for _ in 0..10_000 {
            let mut parent = VectorValue::new(Some(Rc::clone(&s)));
            parent.push(Value::Vector(chain));
            chain = parent;
        }
        drop(chain);
        assert_eq!(s.vector_element_count(), 0);
    }

    #[test]
    fn test_vector_shared_child_survives_parent_drop() {
        let child = numbers(None, &[1.0, 2.0]);
        let keeper = child.clone();
        let mut parent = VectorValue::new(None);
        parent.push(Value::EmbeddedVector(child.into()));
        drop(parent);
        assert_eq!(keeper.len(), 2);
        let flat: Vec<f64> = keeper.iter().map(|v| v.to_f64()).collect();
        assert_eq!(flat, vec![1.0, 2.0]);
    }
}
