//! Field-table macro for enrolling plain structs.

/// Implements [`Reflect`](crate::reflect::Reflect) and
/// [`Describe`](crate::reflect::Describe) for a struct from a table of its
/// serialized fields.
///
/// The struct must be `Clone + Default`, and every listed field type must
/// itself implement `Describe` (the built-ins cover `i32`, `u32`, `String`,
/// `Vec<T>` and [`ObjRef`](crate::reflect::ObjRef)). An `Option<T>` field
/// is a nullable slot; a field prefixed with `skip` keeps its descriptor
/// but is excluded by the default field filter. Fields left out of the
/// table are invisible to the engine entirely.
///
/// With the `auto_register` feature (on by default) each enrolled type is
/// also submitted to the process-wide collection picked up by
/// [`SchemaRegistry::auto_registered`](crate::registry::SchemaRegistry::auto_registered).
///
/// # Example
///
/// ```
/// use objpatch::reflect_record;
///
/// #[derive(Clone, Default)]
/// struct Item {
///     name: String,
///     count: i32,
/// }
///
/// reflect_record! {
///     Item {
///         name: String,
///         count: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! reflect_record {
    ($ty:ident { $($fields:tt)* }) => {
        impl $crate::reflect::Reflect for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }

            fn clone_boxed(&self) -> ::std::boxed::Box<dyn $crate::reflect::Reflect> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }
        }

        impl $crate::reflect::Describe for $ty {
            fn descriptor() -> $crate::reflect::TypeDescriptor {
                let mut fields: ::std::vec::Vec<$crate::reflect::FieldDescriptor> =
                    ::std::vec::Vec::new();
                $crate::reflect_record!(@fields $ty, fields, $($fields)*);
                $crate::reflect::TypeDescriptor::of::<$ty>(
                    stringify!($ty),
                    $crate::reflect::TypeShape::Record($crate::reflect::RecordShape::new(
                        fields,
                        || ::std::boxed::Box::new(<$ty as ::core::default::Default>::default()),
                    )),
                )
            }

            fn register_dependencies(schema: &mut $crate::registry::SchemaRegistry) {
                let _ = &schema;
                $crate::reflect_record!(@deps schema, $($fields)*);
            }
        }

        $crate::__submit_registration!($ty);
    };

    // Field table munchers. `skip` and `Option` arms must come before the
    // plain ones so they are not swallowed by `$f:ident : $t:ty`.
    (@fields $owner:ty, $out:ident,) => {};
    (@fields $owner:ty, $out:ident, skip $f:ident : Option<$t:ty> $(, $($rest:tt)*)?) => {
        $out.push($crate::reflect_record!(@opt_field $owner, $f, $t, false));
        $($crate::reflect_record!(@fields $owner, $out, $($rest)*);)?
    };
    (@fields $owner:ty, $out:ident, skip $f:ident : $t:ty $(, $($rest:tt)*)?) => {
        $out.push($crate::reflect_record!(@plain_field $owner, $f, $t, false));
        $($crate::reflect_record!(@fields $owner, $out, $($rest)*);)?
    };
    (@fields $owner:ty, $out:ident, $f:ident : Option<$t:ty> $(, $($rest:tt)*)?) => {
        $out.push($crate::reflect_record!(@opt_field $owner, $f, $t, true));
        $($crate::reflect_record!(@fields $owner, $out, $($rest)*);)?
    };
    (@fields $owner:ty, $out:ident, $f:ident : $t:ty $(, $($rest:tt)*)?) => {
        $out.push($crate::reflect_record!(@plain_field $owner, $f, $t, true));
        $($crate::reflect_record!(@fields $owner, $out, $($rest)*);)?
    };

    (@plain_field $owner:ty, $f:ident, $t:ty, $serialized:expr) => {
        $crate::reflect::FieldDescriptor::new::<$t>(
            stringify!($f),
            $serialized,
            $crate::reflect::FieldAccessor::for_field::<$owner, $t>(
                |owner| {
                    let owner = owner.downcast_ref::<$owner>()?;
                    ::core::option::Option::Some(::std::boxed::Box::new(
                        ::core::clone::Clone::clone(&owner.$f),
                    ) as ::std::boxed::Box<dyn $crate::reflect::Reflect>)
                },
                |owner, value| {
                    if let ::core::option::Option::Some(owner) = owner.downcast_mut::<$owner>() {
                        if let ::core::option::Option::Some(value) =
                            value.and_then(|v| v.take::<$t>())
                        {
                            owner.$f = value;
                        }
                    }
                },
            ),
        )
    };
    (@opt_field $owner:ty, $f:ident, $t:ty, $serialized:expr) => {
        $crate::reflect::FieldDescriptor::new::<$t>(
            stringify!($f),
            $serialized,
            $crate::reflect::FieldAccessor::for_field::<$owner, $t>(
                |owner| {
                    let owner = owner.downcast_ref::<$owner>()?;
                    owner.$f.clone().map(|v| {
                        ::std::boxed::Box::new(v) as ::std::boxed::Box<dyn $crate::reflect::Reflect>
                    })
                },
                |owner, value| {
                    if let ::core::option::Option::Some(owner) = owner.downcast_mut::<$owner>() {
                        owner.$f = value.and_then(|v| v.take::<$t>());
                    }
                },
            ),
        )
    };

    (@deps $schema:ident,) => {};
    (@deps $schema:ident, skip $f:ident : Option<$t:ty> $(, $($rest:tt)*)?) => {
        $schema.register::<$t>();
        $($crate::reflect_record!(@deps $schema, $($rest)*);)?
    };
    (@deps $schema:ident, skip $f:ident : $t:ty $(, $($rest:tt)*)?) => {
        $schema.register::<$t>();
        $($crate::reflect_record!(@deps $schema, $($rest)*);)?
    };
    (@deps $schema:ident, $f:ident : Option<$t:ty> $(, $($rest:tt)*)?) => {
        $schema.register::<$t>();
        $($crate::reflect_record!(@deps $schema, $($rest)*);)?
    };
    (@deps $schema:ident, $f:ident : $t:ty $(, $($rest:tt)*)?) => {
        $schema.register::<$t>();
        $($crate::reflect_record!(@deps $schema, $($rest)*);)?
    };
}

#[cfg(feature = "auto_register")]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit_registration {
    ($ty:ident) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::SchemaRegistration::new(
                |schema: &mut $crate::registry::SchemaRegistry| {
                    schema.register::<$ty>();
                },
            )
        }
    };
}

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit_registration {
    ($ty:ident) => {};
}
