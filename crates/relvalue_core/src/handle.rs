//! Opaque handles: variables, processes, streams and foreign objects.
//!
//! Handles never compare structurally. Each one carries a serial number
//! that is unique for the whole process, which is all its canonical
//! rendering shows.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::Value;

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Issues a serial number no other handle in this process shares.
pub(crate) fn next_serial() -> u64 {
    NEXT_SERIAL.fetch_add(1, Ordering::Relaxed)
}

/// Opaque reference to an object owned outside the value engine.
#[derive(Clone)]
pub struct Handle {
    serial: u64,
    object: Rc<dyn Any>,
}

impl Handle {
    pub(crate) fn new(serial: u64, object: Rc<dyn Any>) -> Self {
        Self { serial, object }
    }

    /// Returns the process-unique serial number.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Returns the wrapped object.
    #[must_use]
    pub fn object(&self) -> &Rc<dyn Any> {
        &self.object
    }

    /// Returns the wrapped object if it has type `T`.
    #[must_use]
    pub fn downcast<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.serial)
    }
}

/// Mutable cell holding a current value.
pub struct Variable {
    serial: u64,
    current: RefCell<Value>,
}

impl Variable {
    pub(crate) fn new(serial: u64, initial: Value) -> Self {
        Self {
            serial,
            current: RefCell::new(initial),
        }
    }

    /// Returns the process-unique serial number.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> Value {
        self.current.borrow().clone()
    }

    /// Replaces the current value, returning the previous one.
    pub fn set(&self, value: Value) -> Value {
        self.current.replace(value)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.serial)
    }
}
