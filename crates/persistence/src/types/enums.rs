//! Enumerated field types.
//!
//! Every enum is stored and transported by its upper-case name
//! (`OUT_OF_STOCK`, `XL`, ...).

// Enum variants are self-documenting via their wire names
#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declares a field enum with its canonical names, `Display` and `FromStr`.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the canonical upper-case name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "'{}' is not one of {}",
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

named_enum! {
    /// Garment size of a product.
    Size {
        S => "S",
        M => "M",
        L => "L",
        Xl => "XL",
        Xxl => "XXL",
    }
}

named_enum! {
    /// Lifecycle state of a product order.
    OrderStatus {
        Completed => "COMPLETED",
        Pending => "PENDING",
        Cancelled => "CANCELLED",
    }
}

named_enum! {
    /// Stock state of a single order line.
    OrderItemStatus {
        Available => "AVAILABLE",
        OutOfStock => "OUT_OF_STOCK",
        BackOrder => "BACK_ORDER",
    }
}

named_enum! {
    Gender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("OUT_OF_STOCK".parse::<OrderItemStatus>(), Ok(OrderItemStatus::OutOfStock));
        assert_eq!(Size::Xxl.to_string(), "XXL");
        assert_eq!(OrderStatus::ALL.len(), 3);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let err = "HUGE".parse::<Size>().unwrap_err();
        assert!(err.contains("S, M, L, XL, XXL"));
        assert!("pending".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&OrderItemStatus::BackOrder).unwrap();
        assert_eq!(json, "\"BACK_ORDER\"");
        let gender: Gender = serde_json::from_str("\"FEMALE\"").unwrap();
        assert_eq!(gender, Gender::Female);
    }
}
