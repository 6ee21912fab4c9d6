//! Typed filter value objects and their wire-level rendering.
//!
//! A [`Filter`] is one condition on one product property, product model
//! property, or attribute. Construction validates the operator against the
//! category's registry set and the value shape against the operator; a
//! constructed filter is immutable and renders to exactly one [`Condition`]
//! placed under its target key in the criteria mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::operators::{
    BooleanOperator, CategoryOperator, ComparisonOperator, CompletenessOperator, DateOperator,
    ListOperator, ParentOperator, QualityScoreOperator, TextOperator,
};
use crate::errors::FilterError;

/// Wire-level rendering of a single filter: exactly what the search endpoint
/// receives inside the criteria mapping.
///
/// `operator` is always present; `value` is omitted for emptiness-style
/// conditions; at most one of `locale`/`locales` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
}

impl Condition {
    /// A bare condition with only an operator set.
    #[must_use]
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            value: None,
            locale: None,
            scope: None,
            locales: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn with_locales(mut self, locales: Vec<String>) -> Self {
        self.locales = Some(locales);
        self
    }

    fn qualified(mut self, locale: Option<&str>, scope: Option<&str>) -> Self {
        self.locale = locale.map(ToString::to_string);
        self.scope = scope.map(ToString::to_string);
        self
    }
}

/// One validated condition, tagged by what it targets.
///
/// The tag is a closed set so rendering is exhaustive: a new filter kind
/// cannot be added without the compiler pointing at every match on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A product property such as `enabled`, `family` or `completeness`.
    ProductProperty { property: String, condition: Condition },
    /// A product model property such as `identifier`.
    ProductModelProperty { property: String, condition: Condition },
    /// A custom attribute, addressed by its code.
    Attribute { code: String, condition: Condition },
}

fn codes_value(codes: &[&str]) -> Value {
    Value::from(codes.iter().map(|c| Value::from(*c)).collect::<Vec<_>>())
}

fn date_condition(operator: &str, value: Value) -> Result<Condition, FilterError> {
    let op: DateOperator = operator.parse()?;
    if op.requires_range() {
        let ok = value.as_array().is_some_and(|pair| pair.len() == 2);
        if !ok {
            return Err(FilterError::ValueShape {
                operator: operator.to_string(),
                expected: "a two-element [from, to] sequence",
            });
        }
    } else if op == DateOperator::SinceLastNDays && !value.is_number() {
        return Err(FilterError::ValueShape {
            operator: operator.to_string(),
            expected: "a number of days",
        });
    }
    let condition = Condition::new(op.as_str());
    Ok(if op.takes_value() {
        condition.with_value(value)
    } else {
        condition
    })
}

impl Filter {
    // Product property filters

    /// Filter products by UUID membership.
    pub fn uuid(uuids: &[Uuid], operator: &str) -> Result<Self, FilterError> {
        let op: ListOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str());
        if op.takes_value() {
            let ids = uuids.iter().map(|u| Value::from(u.to_string())).collect::<Vec<_>>();
            condition = condition.with_value(Value::from(ids));
        }
        Ok(Self::ProductProperty {
            property: "uuid".to_string(),
            condition,
        })
    }

    /// Filter by category membership.
    pub fn categories(codes: &[&str], operator: &str) -> Result<Self, FilterError> {
        let op: CategoryOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str());
        if op.takes_value() {
            condition = condition.with_value(codes_value(codes));
        }
        Ok(Self::ProductProperty {
            property: "categories".to_string(),
            condition,
        })
    }

    /// Filter by enabled status.
    pub fn enabled(value: bool, operator: &str) -> Result<Self, FilterError> {
        let op: BooleanOperator = operator.parse()?;
        Ok(Self::ProductProperty {
            property: "enabled".to_string(),
            condition: Condition::new(op.as_str()).with_value(Value::from(value)),
        })
    }

    /// Filter by completeness percentage on a channel, optionally narrowed
    /// to a locale set.
    pub fn completeness(
        value: u8,
        scope: &str,
        operator: &str,
        locales: Option<&[&str]>,
    ) -> Result<Self, FilterError> {
        let op: CompletenessOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str()).with_scope(scope);
        if op.takes_value() {
            condition = condition.with_value(Value::from(value));
        }
        if let Some(locales) = locales {
            condition = condition.with_locales(locales.iter().map(ToString::to_string).collect());
        }
        Ok(Self::ProductProperty {
            property: "completeness".to_string(),
            condition,
        })
    }

    /// Filter by family membership.
    pub fn family(codes: &[&str], operator: &str) -> Result<Self, FilterError> {
        let op: ListOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str());
        if op.takes_value() {
            condition = condition.with_value(codes_value(codes));
        }
        Ok(Self::ProductProperty {
            property: "family".to_string(),
            condition,
        })
    }

    /// Filter by group membership.
    pub fn groups(codes: &[&str], operator: &str) -> Result<Self, FilterError> {
        let op: ListOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str());
        if op.takes_value() {
            condition = condition.with_value(codes_value(codes));
        }
        Ok(Self::ProductProperty {
            property: "groups".to_string(),
            condition,
        })
    }

    /// Filter by creation date. `BETWEEN`-class operators expect a
    /// `[from, to]` pair, `SINCE LAST N DAYS` a number.
    pub fn created(value: impl Into<Value>, operator: &str) -> Result<Self, FilterError> {
        Ok(Self::ProductProperty {
            property: "created".to_string(),
            condition: date_condition(operator, value.into())?,
        })
    }

    /// Filter by last-update date, same value rules as [`Filter::created`].
    pub fn updated(value: impl Into<Value>, operator: &str) -> Result<Self, FilterError> {
        Ok(Self::ProductProperty {
            property: "updated".to_string(),
            condition: date_condition(operator, value.into())?,
        })
    }

    /// Filter by parent product model code(s).
    pub fn parent(value: impl Into<Value>, operator: &str) -> Result<Self, FilterError> {
        let op: ParentOperator = operator.parse()?;
        let value = value.into();
        let mut condition = Condition::new(op.as_str());
        if op.takes_value() {
            if op.expects_list() && !value.is_array() {
                return Err(FilterError::ValueShape {
                    operator: operator.to_string(),
                    expected: "a sequence of parent codes",
                });
            }
            condition = condition.with_value(value);
        }
        Ok(Self::ProductProperty {
            property: "parent".to_string(),
            condition,
        })
    }

    /// Filter by quality score buckets on one channel and locale.
    pub fn quality_score(
        scores: &[&str],
        scope: &str,
        locale: &str,
        operator: &str,
    ) -> Result<Self, FilterError> {
        let op: QualityScoreOperator = operator.parse()?;
        Ok(Self::ProductProperty {
            property: "quality_score".to_string(),
            condition: Condition::new(op.as_str())
                .with_value(codes_value(scores))
                .with_scope(scope)
                .with_locale(locale),
        })
    }

    // Product model property filters

    /// Filter product models by identifier membership.
    pub fn identifier(identifiers: &[&str], operator: &str) -> Result<Self, FilterError> {
        let op: ListOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str());
        if op.takes_value() {
            condition = condition.with_value(codes_value(identifiers));
        }
        Ok(Self::ProductModelProperty {
            property: "identifier".to_string(),
            condition,
        })
    }

    /// Filter product models by completeness state on a channel. These
    /// operators carry no percentage value; the locale dimension is either
    /// one `locale` or a `locales` list, never both.
    pub fn model_completeness(
        scope: &str,
        operator: &str,
        locale: Option<&str>,
        locales: Option<&[&str]>,
    ) -> Result<Self, FilterError> {
        let op: CompletenessOperator = operator.parse()?;
        if locale.is_some() && locales.is_some() {
            return Err(FilterError::AmbiguousLocale {
                target: "completeness".to_string(),
            });
        }
        let mut condition = Condition::new(op.as_str()).with_scope(scope);
        if let Some(locale) = locale {
            condition = condition.with_locale(locale);
        }
        if let Some(locales) = locales {
            condition = condition.with_locales(locales.iter().map(ToString::to_string).collect());
        }
        Ok(Self::ProductModelProperty {
            property: "completeness".to_string(),
            condition,
        })
    }

    // Attribute filters

    /// Filter on a text or textarea attribute.
    pub fn attribute_text(
        code: &str,
        value: impl Into<Value>,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Self, FilterError> {
        let op: TextOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str()).qualified(locale, scope);
        if op.takes_value() {
            condition = condition.with_value(value.into());
        }
        Ok(Self::Attribute {
            code: code.to_string(),
            condition,
        })
    }

    /// Filter on a number or metric attribute.
    pub fn attribute_number(
        code: &str,
        value: impl Into<Value>,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Self, FilterError> {
        let op: ComparisonOperator = operator.parse()?;
        let value = value.into();
        if !value.is_number() {
            return Err(FilterError::ValueShape {
                operator: operator.to_string(),
                expected: "a numeric value",
            });
        }
        Ok(Self::Attribute {
            code: code.to_string(),
            condition: Condition::new(op.as_str())
                .with_value(value)
                .qualified(locale, scope),
        })
    }

    /// Filter on a simple- or multi-select attribute by option codes.
    pub fn attribute_select(
        code: &str,
        options: &[&str],
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Self, FilterError> {
        let op: ListOperator = operator.parse()?;
        let mut condition = Condition::new(op.as_str()).qualified(locale, scope);
        if op.takes_value() {
            condition = condition.with_value(codes_value(options));
        }
        Ok(Self::Attribute {
            code: code.to_string(),
            condition,
        })
    }

    /// Filter on a yes/no attribute.
    pub fn attribute_boolean(
        code: &str,
        value: bool,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Self, FilterError> {
        let op: BooleanOperator = operator.parse()?;
        Ok(Self::Attribute {
            code: code.to_string(),
            condition: Condition::new(op.as_str())
                .with_value(Value::from(value))
                .qualified(locale, scope),
        })
    }

    /// Filter on a date attribute, same value rules as [`Filter::created`].
    pub fn attribute_date(
        code: &str,
        value: impl Into<Value>,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Self, FilterError> {
        Ok(Self::Attribute {
            code: code.to_string(),
            condition: date_condition(operator, value.into())?.qualified(locale, scope),
        })
    }

    /// Filter on attribute emptiness. The operator is derived from
    /// `is_empty`, so this constructor cannot fail.
    #[must_use]
    pub fn attribute_empty(
        code: &str,
        is_empty: bool,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Self {
        let operator = if is_empty { "EMPTY" } else { "NOT EMPTY" };
        Self::Attribute {
            code: code.to_string(),
            condition: Condition::new(operator).qualified(locale, scope),
        }
    }

    /// Filter on a file or image attribute by filename.
    pub fn attribute_file(
        code: &str,
        filename: &str,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Self, FilterError> {
        Self::attribute_text(code, filename, operator, locale, scope)
    }

    /// The key this filter's condition is placed under in the criteria
    /// mapping: a property name or an attribute code.
    #[must_use]
    pub fn target_key(&self) -> &str {
        match self {
            Self::ProductProperty { property, .. }
            | Self::ProductModelProperty { property, .. } => property,
            Self::Attribute { code, .. } => code,
        }
    }

    /// The rendered wire condition.
    #[must_use]
    pub fn condition(&self) -> &Condition {
        match self {
            Self::ProductProperty { condition, .. }
            | Self::ProductModelProperty { condition, .. }
            | Self::Attribute { condition, .. } => condition,
        }
    }

    /// Decompose into `(target key, condition)`.
    #[must_use]
    pub fn into_parts(self) -> (String, Condition) {
        match self {
            Self::ProductProperty {
                property,
                condition,
            }
            | Self::ProductModelProperty {
                property,
                condition,
            } => (property, condition),
            Self::Attribute { code, condition } => (code, condition),
        }
    }
}
