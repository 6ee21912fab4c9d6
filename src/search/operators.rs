//! Operator registry: the fixed operator sets the search endpoint accepts,
//! grouped by filter category.
//!
//! Each category is a closed enum with a `FromStr` impl that rejects
//! anything outside the set, naming the category and the full allowed list
//! in the error. Emptiness (`EMPTY` / `NOT EMPTY`) is a member of the
//! categories that support it, never a category of its own.

use std::fmt;
use std::str::FromStr;

use crate::errors::FilterError;

macro_rules! operator_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $category:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every operator the API accepts for this category.
            pub const ALL: &'static [&'static str] = &[$($text),+];

            /// Wire representation of the operator.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(FilterError::InvalidOperator {
                        category: $category,
                        operator: s.to_string(),
                        allowed: Self::ALL,
                    }),
                }
            }
        }
    };
}

operator_enum! {
    /// Numeric comparison, used by number attributes.
    ComparisonOperator, "comparison" {
        Equal => "=",
        NotEqual => "!=",
        LowerThan => "<",
        LowerOrEqual => "<=",
        GreaterThan => ">",
        GreaterOrEqual => ">=",
    }
}

operator_enum! {
    /// Membership tests on code lists (family, groups, select attributes...).
    ListOperator, "list" {
        In => "IN",
        NotIn => "NOT IN",
        Empty => "EMPTY",
        NotEmpty => "NOT EMPTY",
    }
}

operator_enum! {
    /// Date comparisons for `created`/`updated` and date attributes.
    DateOperator, "date" {
        Equal => "=",
        NotEqual => "!=",
        Before => "<",
        After => ">",
        Between => "BETWEEN",
        NotBetween => "NOT BETWEEN",
        Empty => "EMPTY",
        NotEmpty => "NOT EMPTY",
        SinceLastNDays => "SINCE LAST N DAYS",
    }
}

operator_enum! {
    /// Category tree membership.
    CategoryOperator, "category" {
        In => "IN",
        NotIn => "NOT IN",
        InOrUnclassified => "IN OR UNCLASSIFIED",
        InChildren => "IN CHILDREN",
        NotInChildren => "NOT IN CHILDREN",
        Unclassified => "UNCLASSIFIED",
    }
}

operator_enum! {
    /// Completeness percentage comparisons, per scope and optionally per
    /// locale set. The `ALL` / `AT LEAST` members are the product model
    /// variants and carry no value.
    CompletenessOperator, "completeness" {
        Equal => "=",
        NotEqual => "!=",
        LowerThan => "<",
        GreaterThan => ">",
        GreaterThanOnAllLocales => "GREATER THAN ON ALL LOCALES",
        GreaterOrEqualsThanOnAllLocales => "GREATER OR EQUALS THAN ON ALL LOCALES",
        LowerThanOnAllLocales => "LOWER THAN ON ALL LOCALES",
        LowerOrEqualsThanOnAllLocales => "LOWER OR EQUALS THAN ON ALL LOCALES",
        AllComplete => "ALL COMPLETE",
        AllIncomplete => "ALL INCOMPLETE",
        AtLeastComplete => "AT LEAST COMPLETE",
        AtLeastIncomplete => "AT LEAST INCOMPLETE",
    }
}

operator_enum! {
    /// Boolean properties only ever test equality.
    BooleanOperator, "boolean" {
        Equal => "=",
    }
}

operator_enum! {
    /// Text matching for text/textarea and file attributes.
    TextOperator, "text" {
        Equal => "=",
        NotEqual => "!=",
        Contains => "CONTAINS",
        DoesNotContain => "DOES NOT CONTAIN",
        StartsWith => "STARTS WITH",
        Empty => "EMPTY",
        NotEmpty => "NOT EMPTY",
    }
}

operator_enum! {
    /// Parent product model lookup.
    ParentOperator, "parent" {
        Equal => "=",
        In => "IN",
        Empty => "EMPTY",
        NotEmpty => "NOT EMPTY",
    }
}

operator_enum! {
    /// Quality score buckets.
    QualityScoreOperator, "quality-score" {
        In => "IN",
        NotIn => "NOT IN",
    }
}

impl ListOperator {
    /// Whether the operator carries a value (the emptiness members do not).
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Empty | Self::NotEmpty)
    }
}

impl DateOperator {
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Empty | Self::NotEmpty)
    }

    /// `BETWEEN`-class operators require a `[from, to]` pair.
    #[must_use]
    pub const fn requires_range(self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }
}

impl CategoryOperator {
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl CompletenessOperator {
    /// The scalar comparison members carry a percentage value; the
    /// all-locales product model members do not.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LowerThan
                | Self::GreaterThan
                | Self::GreaterThanOnAllLocales
                | Self::GreaterOrEqualsThanOnAllLocales
                | Self::LowerThanOnAllLocales
                | Self::LowerOrEqualsThanOnAllLocales
        )
    }
}

impl TextOperator {
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Empty | Self::NotEmpty)
    }
}

impl ParentOperator {
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Empty | Self::NotEmpty)
    }

    /// `IN` takes a list of parent codes, `=` a single code.
    #[must_use]
    pub const fn expects_list(self) -> bool {
        matches!(self, Self::In)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_member_of_each_category() {
        for op in ComparisonOperator::ALL {
            assert_eq!(op.parse::<ComparisonOperator>().unwrap().as_str(), *op);
        }
        for op in ListOperator::ALL {
            assert_eq!(op.parse::<ListOperator>().unwrap().as_str(), *op);
        }
        for op in DateOperator::ALL {
            assert_eq!(op.parse::<DateOperator>().unwrap().as_str(), *op);
        }
        for op in CategoryOperator::ALL {
            assert_eq!(op.parse::<CategoryOperator>().unwrap().as_str(), *op);
        }
        for op in CompletenessOperator::ALL {
            assert_eq!(op.parse::<CompletenessOperator>().unwrap().as_str(), *op);
        }
        for op in TextOperator::ALL {
            assert_eq!(op.parse::<TextOperator>().unwrap().as_str(), *op);
        }
        for op in ParentOperator::ALL {
            assert_eq!(op.parse::<ParentOperator>().unwrap().as_str(), *op);
        }
        for op in QualityScoreOperator::ALL {
            assert_eq!(op.parse::<QualityScoreOperator>().unwrap().as_str(), *op);
        }
    }

    #[test]
    fn rejects_operators_outside_the_category() {
        let err = "CONTAINS".parse::<ListOperator>().unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidOperator {
                category: "list",
                operator: "CONTAINS".to_string(),
                allowed: ListOperator::ALL,
            }
        );

        // Members of one category are not accepted by another.
        assert!("IN".parse::<BooleanOperator>().is_err());
        assert!("BETWEEN".parse::<ComparisonOperator>().is_err());
    }

    #[test]
    fn operator_matching_is_case_sensitive() {
        assert!("in".parse::<ListOperator>().is_err());
        assert!("between".parse::<DateOperator>().is_err());
    }

    #[test]
    fn emptiness_members_take_no_value() {
        assert!(!ListOperator::Empty.takes_value());
        assert!(!TextOperator::NotEmpty.takes_value());
        assert!(ListOperator::In.takes_value());
        assert!(DateOperator::Between.requires_range());
        assert!(!DateOperator::Equal.requires_range());
        assert!(!CategoryOperator::Unclassified.takes_value());
        assert!(!CompletenessOperator::AllComplete.takes_value());
        assert!(CompletenessOperator::GreaterThan.takes_value());
    }
}
