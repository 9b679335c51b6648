use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::contract::{ConversionError, FromToken, Value};

/// A shared view onto the typed storage bound to one declared parameter.
///
/// Registration hands out a `Handle`; after resolution the caller reads the
/// final value through [`Handle::get`].
pub struct Handle<T>(Rc<RefCell<T>>);

impl<T> Handle<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self(Rc::new(RefCell::new(initial)))
    }

    pub(crate) fn storage(&self) -> Rc<RefCell<T>> {
        Rc::clone(&self.0)
    }

    /// Read the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handle").field(&self.0.borrow()).finish()
    }
}

/// A destination holding precisely one `T`; repeated occurrences replace.
pub(crate) struct ScalarSlot<T: FromToken> {
    variable: Rc<RefCell<T>>,
}

impl<T: FromToken> ScalarSlot<T> {
    pub(crate) fn new(handle: &Handle<T>) -> Self {
        Self {
            variable: handle.storage(),
        }
    }
}

impl<T: FromToken> Value for ScalarSlot<T> {
    fn set(&mut self, token: &str) -> Result<(), ConversionError> {
        *self.variable.borrow_mut() = T::from_token(token)?;
        Ok(())
    }

    fn render(&self) -> String {
        self.variable.borrow().render()
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }
}

/// A destination mapping down to `Option<T>`; useful for types without a zero value.
pub(crate) struct OptionalSlot<T: FromToken> {
    variable: Rc<RefCell<Option<T>>>,
}

impl<T: FromToken> OptionalSlot<T> {
    pub(crate) fn new(handle: &Handle<Option<T>>) -> Self {
        Self {
            variable: handle.storage(),
        }
    }
}

impl<T: FromToken> Value for OptionalSlot<T> {
    fn set(&mut self, token: &str) -> Result<(), ConversionError> {
        self.variable.borrow_mut().replace(T::from_token(token)?);
        Ok(())
    }

    fn render(&self) -> String {
        match &*self.variable.borrow() {
            Some(value) => value.render(),
            None => String::default(),
        }
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }
}

/// A destination accumulating repeated occurrences into a `Vec<T>`.
pub(crate) struct ListSlot<T: FromToken> {
    variable: Rc<RefCell<Vec<T>>>,
}

impl<T: FromToken> ListSlot<T> {
    pub(crate) fn new(handle: &Handle<Vec<T>>) -> Self {
        Self {
            variable: handle.storage(),
        }
    }
}

impl<T: FromToken> Value for ListSlot<T> {
    fn set(&mut self, token: &str) -> Result<(), ConversionError> {
        self.variable.borrow_mut().push(T::from_token(token)?);
        Ok(())
    }

    fn render(&self) -> String {
        self.variable
            .borrow()
            .iter()
            .map(FromToken::render)
            .collect::<Vec<String>>()
            .join(",")
    }
}

/// A destination accumulating `key=value` tokens into a map.
/// The token splits on the first `=` only.
pub(crate) struct MapSlot {
    variable: Rc<RefCell<HashMap<String, String>>>,
}

impl MapSlot {
    pub(crate) const EXPECTED: &'static str = "a 'key=value' pair";

    pub(crate) fn new(handle: &Handle<HashMap<String, String>>) -> Self {
        Self {
            variable: handle.storage(),
        }
    }
}

impl Value for MapSlot {
    fn set(&mut self, token: &str) -> Result<(), ConversionError> {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| ConversionError::new(token, Self::EXPECTED))?;
        self.variable
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn render(&self) -> String {
        let mut pairs: Vec<String> = self
            .variable
            .borrow()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        // Sorted so the rendering is deterministic.
        pairs.sort();
        pairs.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn scalar_replaces() {
        // Setup
        let handle: Handle<u32> = Handle::new(0);
        let mut slot = ScalarSlot::new(&handle);

        // Execute
        slot.set("1").unwrap();
        slot.set("2").unwrap();

        // Verify
        assert_eq!(handle.get(), 2);
        assert_eq!(slot.render(), "2");
        assert!(!slot.is_bool());
    }

    #[test]
    fn scalar_bool() {
        let handle: Handle<bool> = Handle::new(false);
        let mut slot = ScalarSlot::new(&handle);
        assert!(slot.is_bool());

        slot.set("").unwrap();
        assert!(handle.get());

        slot.set("false").unwrap();
        assert!(!handle.get());
    }

    #[test]
    fn scalar_inconvertable() {
        let handle: Handle<u32> = Handle::new(0);
        let mut slot = ScalarSlot::new(&handle);

        assert_matches!(slot.set("blah"), Err(ConversionError { .. }));
        assert_eq!(handle.get(), 0);
    }

    #[test]
    fn optional_replaces() {
        // Setup
        let handle: Handle<Option<u32>> = Handle::new(None);
        let mut slot = OptionalSlot::new(&handle);
        assert_eq!(slot.render(), "");

        // Execute
        slot.set("5").unwrap();

        // Verify
        assert_eq!(handle.get(), Some(5));
        assert_eq!(slot.render(), "5");
    }

    #[test]
    fn list_accumulates() {
        // Setup
        let handle: Handle<Vec<u32>> = Handle::new(Vec::default());
        let mut slot = ListSlot::new(&handle);

        // Execute
        slot.set("1").unwrap();
        slot.set("3").unwrap();
        slot.set("2").unwrap();

        // Verify
        assert_eq!(handle.get(), vec![1, 3, 2]);
        assert_eq!(slot.render(), "1,3,2");
    }

    #[rstest]
    #[case("key=value", "key", "value")]
    #[case("key=a=b", "key", "a=b")]
    #[case("key=", "key", "")]
    #[case("=value", "", "value")]
    fn map_accumulates(#[case] token: &str, #[case] key: &str, #[case] value: &str) {
        // Setup
        let handle: Handle<HashMap<String, String>> = Handle::new(HashMap::default());
        let mut slot = MapSlot::new(&handle);

        // Execute
        slot.set(token).unwrap();

        // Verify
        assert_eq!(handle.get(), HashMap::from([(key.to_string(), value.to_string())]));
    }

    #[test]
    fn map_overwrites_key() {
        let handle: Handle<HashMap<String, String>> = Handle::new(HashMap::default());
        let mut slot = MapSlot::new(&handle);

        slot.set("a=1").unwrap();
        slot.set("b=2").unwrap();
        slot.set("a=3").unwrap();

        assert_eq!(slot.render(), "a=3,b=2");
        assert_matches!(slot.set("no-delimiter"), Err(ConversionError { .. }));
    }
}
