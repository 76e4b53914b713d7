//! The binding tree: classified structural representation of a setup result.
//!
//! A setup function returns [`Bindings`], a keyed tree of [`Binding`] nodes.
//! Leaves are plain values (copied as-is into the host snapshot), reactive
//! cells (unwrapped under dependency tracking on every snapshot), or
//! functions (exposed to the host as callable methods). Arrays and objects
//! recurse structurally, preserving shape. An [`Binding::Opaque`] leaf —
//! anything the host data format cannot represent — fails the whole binding
//! at load time.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};

use minuet_reactive::{Computed, ReadSignal, Signal};

use crate::error::BindingError;

/// A host-invocable entry point bound from setup.
pub type Method = Rc<dyn Fn(&Value) -> Value>;

type CellReader = Rc<dyn Fn() -> Value>;

/// One node of the binding tree.
pub enum Binding {
    /// Copied into the snapshot as-is.
    Plain(Value),
    /// A mutable reactive cell; unwrapped on every snapshot.
    Ref(CellReader),
    /// A derived reactive cell; treated like `Ref`.
    Computed(CellReader),
    /// Exposed to the host unmodified. Top level only.
    Func(Method),
    Array(Vec<Binding>),
    Object(BTreeMap<String, Binding>),
    /// A value the host snapshot format cannot represent. Always fatal.
    Opaque(String),
}

impl Binding {
    /// Serialize a value once, at construction. Non-serializable values
    /// classify as `Opaque` and fail the binding.
    pub fn plain<T: Serialize>(value: T) -> Binding {
        match serde_json::to_value(value) {
            Ok(v) => Binding::Plain(v),
            Err(_) => Binding::Opaque(std::any::type_name::<T>().to_string()),
        }
    }

    pub fn func(f: impl Fn(&Value) -> Value + 'static) -> Binding {
        Binding::Func(Rc::new(f))
    }

    /// A function binding that takes no argument and returns nothing.
    pub fn action(f: impl Fn() + 'static) -> Binding {
        Binding::Func(Rc::new(move |_| {
            f();
            Value::Null
        }))
    }

    pub fn opaque(type_name: impl Into<String>) -> Binding {
        Binding::Opaque(type_name.into())
    }

    pub fn array(items: impl IntoIterator<Item = Binding>) -> Binding {
        Binding::Array(items.into_iter().collect())
    }

    pub fn object(entries: impl IntoIterator<Item = (String, Binding)>) -> Binding {
        Binding::Object(entries.into_iter().collect())
    }
}

impl<T: Serialize + Clone + 'static> From<&Signal<T>> for Binding {
    fn from(cell: &Signal<T>) -> Binding {
        let cell = cell.clone();
        Binding::Ref(Rc::new(move || {
            cell.with(|v| serde_json::to_value(v).unwrap_or(Value::Null))
        }))
    }
}

impl<T: Serialize + Clone + 'static> From<&ReadSignal<T>> for Binding {
    fn from(cell: &ReadSignal<T>) -> Binding {
        let cell = cell.clone();
        Binding::Ref(Rc::new(move || {
            cell.with(|v| serde_json::to_value(v).unwrap_or(Value::Null))
        }))
    }
}

impl<T: Serialize + Clone + 'static> From<&Computed<T>> for Binding {
    fn from(cell: &Computed<T>) -> Binding {
        let cell = cell.clone();
        Binding::Computed(Rc::new(move || {
            serde_json::to_value(cell.get()).unwrap_or(Value::Null)
        }))
    }
}

impl From<Value> for Binding {
    fn from(v: Value) -> Binding {
        Binding::Plain(v)
    }
}

impl From<bool> for Binding {
    fn from(v: bool) -> Binding {
        Binding::Plain(Value::from(v))
    }
}

impl From<i64> for Binding {
    fn from(v: i64) -> Binding {
        Binding::Plain(Value::from(v))
    }
}

impl From<f64> for Binding {
    fn from(v: f64) -> Binding {
        Binding::Plain(Value::from(v))
    }
}

impl From<&str> for Binding {
    fn from(v: &str) -> Binding {
        Binding::Plain(Value::from(v))
    }
}

impl From<String> for Binding {
    fn from(v: String) -> Binding {
        Binding::Plain(Value::from(v))
    }
}

/// The keyed tree a setup function returns.
#[derive(Default)]
pub struct Bindings(BTreeMap<String, Binding>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Binding>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fail-closed structural check, run synchronously at load before any host
/// update. Opaque leaves anywhere and functions below the top level abort
/// the binding with the offending path.
pub(crate) fn validate(bindings: &Bindings) -> Result<(), BindingError> {
    for (key, node) in &bindings.0 {
        validate_node(node, key, true)?;
    }
    Ok(())
}

fn validate_node(node: &Binding, path: &str, top_level: bool) -> Result<(), BindingError> {
    match node {
        Binding::Opaque(type_name) => Err(BindingError::Unsupported {
            path: path.to_string(),
            type_name: type_name.clone(),
        }),
        Binding::Func(_) if !top_level => Err(BindingError::NestedFunction {
            path: path.to_string(),
        }),
        Binding::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                validate_node(item, &format!("{path}[{i}]"), false)?;
            }
            Ok(())
        }
        Binding::Object(entries) => {
            for (key, value) in entries {
                validate_node(value, &format!("{path}.{key}"), false)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Top-level function entries become host-invocable methods.
pub(crate) fn methods(bindings: &Bindings) -> HashMap<String, Method> {
    bindings
        .0
        .iter()
        .filter_map(|(key, node)| match node {
            Binding::Func(f) => Some((key.clone(), f.clone())),
            _ => None,
        })
        .collect()
}

/// Re-derive the full data snapshot. Cell reads happen here, so running this
/// inside an effect establishes the effect's dependency set.
pub(crate) fn snapshot(bindings: &Bindings) -> Map<String, Value> {
    let mut data = Map::new();
    for (key, node) in &bindings.0 {
        if let Some(value) = snapshot_node(node) {
            data.insert(key.clone(), value);
        }
    }
    data
}

fn snapshot_node(node: &Binding) -> Option<Value> {
    match node {
        Binding::Plain(v) => Some(v.clone()),
        Binding::Ref(read) | Binding::Computed(read) => Some(read()),
        Binding::Func(_) | Binding::Opaque(_) => None,
        Binding::Array(items) => {
            Some(Value::Array(items.iter().filter_map(snapshot_node).collect()))
        }
        Binding::Object(entries) => Some(Value::Object(
            entries
                .iter()
                .filter_map(|(k, v)| snapshot_node(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
    }
}
