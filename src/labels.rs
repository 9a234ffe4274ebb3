//! Labelled enumerations
//!
//! Categorical fields (status, modality, sanction type, ...) are stored as Rust enums but
//! travel through forms, fixtures and exports as their Brazilian Portuguese labels.

use thiserror::Error;

/// A submitted label did not match any variant of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} label: {label:?}")]
pub struct UnknownLabel {
    /// Enumeration that rejected the label.
    pub kind: &'static str,

    /// The label as submitted.
    pub label: String,
}

/// Declares an enum whose variants map one-to-one onto user-facing labels.
///
/// Generates `LABELS`, `ALL`, `label()`, `Display`, `FromStr` and a label-based
/// `Deserialize` implementation.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Every label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// User-facing label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::labels::UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err($crate::labels::UnknownLabel {
                        kind: stringify!($name),
                        label: other.to_string(),
                    }),
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let label = <String as ::serde::Deserialize>::deserialize(deserializer)?;

                label.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use labelled_enum;

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    labelled_enum! {
        /// Test enumeration.
        enum Light {
            /// Red
            Red => "Vermelho",
            /// Green
            Green => "Verde",
        }
    }

    #[test]
    fn labels_round_trip_through_from_str() -> TestResult {
        for light in Light::ALL {
            assert_eq!(light.label().parse::<Light>()?, *light);
        }

        Ok(())
    }

    #[test]
    fn unknown_label_is_rejected() {
        let result = "Azul".parse::<Light>();

        assert_eq!(
            result,
            Err(super::UnknownLabel {
                kind: "Light",
                label: "Azul".to_string(),
            })
        );
    }

    #[test]
    fn deserializes_from_label() -> TestResult {
        let light: Light = serde_norway::from_str("Verde")?;

        assert_eq!(light, Light::Green);
        assert_eq!(light.to_string(), "Verde");

        Ok(())
    }
}
