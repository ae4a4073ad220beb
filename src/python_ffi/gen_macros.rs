/// Wraps a value that a Python method may hand over to another object.
#[macro_export]
macro_rules! MakeConsumable {
    ($name:ident,$inner_type:tt,$obj_name:ident) => {
        pub(super) struct $name {
            obj: Option<$inner_type>,
        }
        impl $name {
            pub(super) fn acquire(val: $inner_type) -> Self {
                Self { obj: Some(val) }
            }
            const CONSUMED: &'static str = std::concat!(
                std::stringify!($obj_name),
                " was handed over to another object and can no longer be used"
            );

            fn get_ref(&self) -> &$inner_type {
                self.obj.as_ref().expect(Self::CONSUMED)
            }
            fn get_ref_mut(&mut self) -> &mut $inner_type {
                self.obj.as_mut().expect(Self::CONSUMED)
            }
            /// Takes the value out, leaving this wrapper unusable.
            fn release(&mut self) -> $inner_type {
                self.obj.take().expect(Self::CONSUMED)
            }
        }
    };
}

/// Turns core error types into Python `ValueError`s.
#[macro_export]
macro_rules! Impl_to_PyErr {
    (for $($t:ty),+) => {
        $(impl From<$t> for PyErr {
            fn from(err: $t) -> Self {
                pyo3::exceptions::PyValueError::new_err(format!("{}", err))
            }
        }
        )*
    }
}
