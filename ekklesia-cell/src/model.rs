//! Domain models as seen by cells.

use serde_json::Value;
use std::any::{Any, TypeId};

/// Runtime type information for any `'static` value.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An attribute-bearing domain value that a cell can be bound to.
///
/// Cells only read attributes listed in their `model_properties`; everything
/// else stays private to the model.
pub trait Model: AsAny {
    /// Look up a named attribute. `None` means the model has no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Short type name used in diagnostics.
    fn model_name(&self) -> &'static str {
        short_type_name(self.type_name())
    }

    /// Value exposed to templates when the model is the current user.
    fn to_value(&self) -> Value {
        Value::Null
    }
}

impl<'m> dyn Model + 'm {
    /// Registry key of the concrete model type.
    pub fn model_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Model>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Strip the module path (and generic arguments) from a type name.
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
