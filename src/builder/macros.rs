//! Macros for declaring state families.

/// Declare a state family as an enum and implement [`State`](crate::core::State) for it.
///
/// Each variant may carry an explicit short name (`Paid = "paid_in_full"`);
/// the others derive theirs from the variant identifier. Optional clauses, in
/// this order:
///
/// - `states: [..]` explicit, ordered list replacing the variant order
/// - `final: [..]` terminal states
/// - `error: [..]` error states
/// - `config: expr` a [`StateConfig`](crate::builder::StateConfig) with the
///   default state and transition graph
///
/// The enum also gets `Serialize`/`Deserialize` through its short name and
/// conversions into [`StateRef`](crate::core::StateRef).
///
/// # Example
///
/// ```
/// use entity_states::builder::StateConfig;
/// use entity_states::core::State;
/// use entity_states::state_enum;
///
/// state_enum! {
///     pub enum PaymentState {
///         Pending,
///         Paid = "paid_in_full",
///         Failed,
///     }
///     final: [Paid, Failed]
///     error: [Failed]
///     config: StateConfig::new().default_state(PaymentState::Pending)
/// }
///
/// assert_eq!(PaymentState::Paid.short_name(), "paid_in_full");
/// assert_eq!(PaymentState::resolve("PaymentState::Failed").unwrap(), PaymentState::Failed);
/// assert_eq!(serde_json::to_string(&PaymentState::Pending).unwrap(), "\"pending\"");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $short:literal)?
            ),* $(,)?
        }

        $(states: [$($declared:ident),* $(,)?])?
        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
        $(config: $config:expr)?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn family() -> &'static str {
                stringify!($name)
            }

            fn module_path() -> &'static str {
                module_path!()
            }

            fn variants() -> ::std::vec::Vec<Self> {
                vec![$(Self::$variant),*]
            }

            $(
                fn declared_states() -> ::std::option::Option<::std::vec::Vec<Self>> {
                    ::std::option::Option::Some(vec![$(Self::$declared),*])
                }
            )?

            fn type_name(&self) -> &'static str {
                match *self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn explicit_name(&self) -> ::std::option::Option<&'static str> {
                match *self {
                    $(Self::$variant => $crate::__state_name!($($short)?)),*
                }
            }

            $(
                fn config() -> $crate::builder::StateConfig<Self> {
                    $config
                }
            )?

            #[allow(unreachable_patterns)]
            fn is_final(&self) -> bool {
                match *self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_error(&self) -> bool {
                match *self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<__S>(&self, serializer: __S) -> ::std::result::Result<__S::Ok, __S::Error>
            where
                __S: $crate::__private::serde::Serializer,
            {
                $crate::entity::cast::serialize_state(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<__D>(deserializer: __D) -> ::std::result::Result<Self, __D::Error>
            where
                __D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::entity::cast::deserialize_state(deserializer)
            }
        }

        impl<'a> ::std::convert::From<$name> for $crate::core::StateRef<'a, $name> {
            fn from(state: $name) -> Self {
                Self::State(state)
            }
        }

        impl<'a> ::std::convert::From<&'a $name> for $crate::core::StateRef<'a, $name> {
            fn from(state: &'a $name) -> Self {
                Self::State(*state)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __state_name {
    () => {
        ::std::option::Option::None
    };
    ($short:literal) => {
        ::std::option::Option::Some($short)
    };
}
