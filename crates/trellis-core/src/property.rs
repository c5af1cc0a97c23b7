//! Reactive properties with change detection.
//!
//! A [`Property<T>`] wraps a value and reports whether a `set` actually
//! changed it, so the owner can emit the matching notification signal only
//! on real changes. The table engine uses properties for the scroll
//! offsets and for the zoom factor that both axes read at query time.
//!
//! # Example
//!
//! ```
//! use trellis_core::{Property, Signal};
//!
//! struct Viewport {
//!     scroll_y: Property<i32>,
//!     scroll_changed: Signal<i32>,
//! }
//!
//! impl Viewport {
//!     fn set_scroll_y(&self, offset: i32) {
//!         if self.scroll_y.set(offset) {
//!             self.scroll_changed.emit(offset);
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell that tracks changes.
///
/// `set()` compares the new value against the current one and returns
/// whether it actually changed; the caller emits any notification signal.
/// Interior mutability via `RwLock` makes shared read-at-query-time use
/// (e.g. a zoom factor held by two axes) cheap.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, use `with()` instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    ///
    /// Useful during initialization or batch updates where notifications
    /// are deferred.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A read-only view of a property.
///
/// Exposes read access while keeping the setter private to the owner.
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<'a, T: Clone> ReadOnlyProperty<'a, T> {
    /// Create a read-only view of a property.
    pub fn new(property: &'a Property<T>) -> Self {
        Self { inner: property }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_basic() {
        let prop = Property::new(42);
        assert_eq!(prop.get(), 42);
    }

    #[test]
    fn test_property_set_detects_change() {
        let prop = Property::new(10);

        assert!(!prop.set(10));
        assert_eq!(prop.get(), 10);

        assert!(prop.set(20));
        assert_eq!(prop.get(), 20);
    }

    #[test]
    fn test_property_replace() {
        let prop = Property::new("a".to_string());

        assert!(prop.replace("a".to_string()).is_none());

        let old = prop.replace("b".to_string());
        assert_eq!(old, Some("a".to_string()));
        assert_eq!(prop.get(), "b");
    }

    #[test]
    fn test_property_set_silent() {
        let prop = Property::new(1.0f32);
        prop.set_silent(2.0);
        assert_eq!(prop.get(), 2.0);
    }

    #[test]
    fn test_property_with_closure() {
        let prop = Property::new(vec![1, 2, 3]);
        let sum: i32 = prop.with(|v| v.iter().sum());
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_read_only_property_sees_updates() {
        let prop = Property::new(42);
        let ro = ReadOnlyProperty::new(&prop);

        assert_eq!(ro.get(), 42);
        prop.set_silent(100);
        assert_eq!(ro.get(), 100);
    }
}
