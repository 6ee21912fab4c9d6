//! Fluent builders that compile filter declarations into the criteria
//! structure the search endpoint expects.
//!
//! [`FilterBuilder`] accumulates validated [`Filter`]s in declaration order
//! and merges them by target key; [`SearchBuilder`] composes that output
//! with locale/scope defaults and pagination, and serializes to either a
//! query-parameter mapping ([`SearchParams`]) or the raw criteria mapping
//! for POST-body search.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::filter::{Condition, Filter};
use crate::errors::FilterError;

/// Merged criteria: target key to its conditions, in declaration order.
///
/// Multiple filters on the same key append to the key's condition list
/// rather than overwrite it; that is how "X must satisfy A AND B" is
/// expressed on one property.
pub type SearchCriteria = IndexMap<String, Vec<Condition>>;

/// Accumulates filters through fluent declaration methods.
///
/// Declaration methods validate eagerly and return `Result<&mut Self>`, so
/// chains propagate with `?` and a failed construction is never appended.
/// [`FilterBuilder::build`] does not consume or clear the builder; use
/// [`FilterBuilder::reset`] or a fresh builder for an unrelated filter set.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filters: Vec<Filter>,
}

impl FilterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-constructed filter.
    pub fn add(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    fn push(&mut self, filter: Result<Filter, FilterError>) -> Result<&mut Self, FilterError> {
        self.filters.push(filter?);
        Ok(self)
    }

    // Product property filters

    pub fn uuid(&mut self, uuids: &[Uuid], operator: &str) -> Result<&mut Self, FilterError> {
        self.push(Filter::uuid(uuids, operator))
    }

    pub fn categories(&mut self, codes: &[&str], operator: &str) -> Result<&mut Self, FilterError> {
        self.push(Filter::categories(codes, operator))
    }

    pub fn enabled(&mut self, value: bool) -> Result<&mut Self, FilterError> {
        self.push(Filter::enabled(value, "="))
    }

    pub fn completeness(
        &mut self,
        value: u8,
        scope: &str,
        operator: &str,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::completeness(value, scope, operator, None))
    }

    /// Completeness narrowed to a set of locales.
    pub fn completeness_on_locales(
        &mut self,
        value: u8,
        scope: &str,
        operator: &str,
        locales: &[&str],
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::completeness(value, scope, operator, Some(locales)))
    }

    pub fn family(&mut self, codes: &[&str], operator: &str) -> Result<&mut Self, FilterError> {
        self.push(Filter::family(codes, operator))
    }

    pub fn groups(&mut self, codes: &[&str], operator: &str) -> Result<&mut Self, FilterError> {
        self.push(Filter::groups(codes, operator))
    }

    pub fn created(
        &mut self,
        value: impl Into<Value>,
        operator: &str,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::created(value, operator))
    }

    pub fn updated(
        &mut self,
        value: impl Into<Value>,
        operator: &str,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::updated(value, operator))
    }

    pub fn parent(
        &mut self,
        value: impl Into<Value>,
        operator: &str,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::parent(value, operator))
    }

    pub fn quality_score(
        &mut self,
        scores: &[&str],
        scope: &str,
        locale: &str,
        operator: &str,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::quality_score(scores, scope, locale, operator))
    }

    // Product model property filters

    pub fn identifier(
        &mut self,
        identifiers: &[&str],
        operator: &str,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::identifier(identifiers, operator))
    }

    pub fn model_completeness(
        &mut self,
        scope: &str,
        operator: &str,
        locale: Option<&str>,
        locales: Option<&[&str]>,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::model_completeness(scope, operator, locale, locales))
    }

    // Attribute filters

    pub fn attribute_text(
        &mut self,
        code: &str,
        value: impl Into<Value>,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::attribute_text(code, value, operator, locale, scope))
    }

    pub fn attribute_number(
        &mut self,
        code: &str,
        value: impl Into<Value>,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::attribute_number(code, value, operator, locale, scope))
    }

    pub fn attribute_select(
        &mut self,
        code: &str,
        options: &[&str],
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::attribute_select(code, options, operator, locale, scope))
    }

    pub fn attribute_boolean(
        &mut self,
        code: &str,
        value: bool,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::attribute_boolean(code, value, "=", locale, scope))
    }

    pub fn attribute_date(
        &mut self,
        code: &str,
        value: impl Into<Value>,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::attribute_date(code, value, operator, locale, scope))
    }

    pub fn attribute_empty(
        &mut self,
        code: &str,
        is_empty: bool,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> &mut Self {
        self.add(Filter::attribute_empty(code, is_empty, locale, scope))
    }

    pub fn attribute_file(
        &mut self,
        code: &str,
        filename: &str,
        operator: &str,
        locale: Option<&str>,
        scope: Option<&str>,
    ) -> Result<&mut Self, FilterError> {
        self.push(Filter::attribute_file(code, filename, operator, locale, scope))
    }

    /// Compile the accumulated filters into a fresh criteria mapping.
    ///
    /// Conditions for the same key appear in declaration order; the mapping
    /// is independently owned, so later declarations on this builder do not
    /// affect a previously built mapping.
    #[must_use]
    pub fn build(&self) -> SearchCriteria {
        let mut criteria = SearchCriteria::new();
        for filter in &self.filters {
            criteria
                .entry(filter.target_key().to_string())
                .or_default()
                .push(filter.condition().clone());
        }
        criteria
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Drop all accumulated filters.
    pub fn reset(&mut self) -> &mut Self {
        self.filters.clear();
        self
    }
}

/// Flat query-parameter mapping for GET search requests.
///
/// The whole criteria mapping travels JSON-encoded as the single `search`
/// value; locale, scope and pagination are separate scalar entries. Unset
/// fields are omitted entirely, so this serializes cleanly through
/// `reqwest::RequestBuilder::query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_count: Option<bool>,
}

/// Composes compiled criteria with locale/scope defaults and pagination.
///
/// Criteria accumulate across [`SearchBuilder::filters`] and
/// [`SearchBuilder::raw_filter`] calls with the same append-by-key rule as
/// [`FilterBuilder::build`]; pagination fields are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct SearchBuilder {
    criteria: SearchCriteria,
    search_locale: Option<String>,
    search_scope: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
    with_count: Option<bool>,
    include_empty_criteria: bool,
}

impl SearchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare filters against a fresh [`FilterBuilder`] and merge its
    /// output into the accumulated criteria.
    ///
    /// # Errors
    /// Returns the first [`FilterError`] the declaration closure propagates;
    /// filters declared before the failure within the same closure are still
    /// part of that builder and are discarded with it, so a failed call
    /// leaves this `SearchBuilder` unchanged.
    pub fn filters<F>(&mut self, declare: F) -> Result<&mut Self, FilterError>
    where
        F: FnOnce(&mut FilterBuilder) -> Result<(), FilterError>,
    {
        let mut builder = FilterBuilder::new();
        declare(&mut builder)?;
        self.merge(builder.build());
        Ok(self)
    }

    /// Append one pre-constructed filter.
    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        let (key, condition) = filter.into_parts();
        self.criteria.entry(key).or_default().push(condition);
        self
    }

    /// Append a condition verbatim, bypassing operator and value validation.
    ///
    /// Escape hatch for operators or properties the typed builders do not
    /// model. Malformed conditions are passed through untouched; the server
    /// reports them as request errors.
    pub fn raw_filter(
        &mut self,
        property: &str,
        operator: &str,
        value: Option<Value>,
        locale: Option<&str>,
        scope: Option<&str>,
        locales: Option<&[&str]>,
    ) -> &mut Self {
        let mut condition = Condition::new(operator);
        condition.value = value;
        condition.locale = locale.map(ToString::to_string);
        condition.scope = scope.map(ToString::to_string);
        condition.locales = locales.map(|l| l.iter().map(ToString::to_string).collect());
        self.criteria
            .entry(property.to_string())
            .or_default()
            .push(condition);
        self
    }

    fn merge(&mut self, criteria: SearchCriteria) {
        for (key, conditions) in criteria {
            self.criteria.entry(key).or_default().extend(conditions);
        }
    }

    /// Default locale for localizable filters, applied at serialization
    /// time only; individual conditions are never stamped.
    pub fn search_locale(&mut self, locale: &str) -> &mut Self {
        self.search_locale = Some(locale.to_string());
        self
    }

    /// Default channel for scopable filters, same rules as
    /// [`SearchBuilder::search_locale`].
    pub fn search_scope(&mut self, scope: &str) -> &mut Self {
        self.search_scope = Some(scope.to_string());
        self
    }

    /// Page number, 1-based. Values are passed through as declared; like
    /// [`SearchBuilder::raw_filter`], out-of-range input (a zero here) is
    /// left for the server to reject.
    pub fn page(&mut self, page: u32) -> &mut Self {
        self.page = Some(page);
        self
    }

    /// Page size, same pass-through rule as [`SearchBuilder::page`].
    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_count(&mut self, with_count: bool) -> &mut Self {
        self.with_count = Some(with_count);
        self
    }

    /// Set any combination of pagination fields at once; `None` leaves the
    /// current value untouched.
    pub fn pagination(
        &mut self,
        page: Option<u32>,
        limit: Option<u32>,
        with_count: Option<bool>,
    ) -> &mut Self {
        if let Some(page) = page {
            self.page = Some(page);
        }
        if let Some(limit) = limit {
            self.limit = Some(limit);
        }
        if let Some(with_count) = with_count {
            self.with_count = Some(with_count);
        }
        self
    }

    /// When no filter was declared, render `search` as an explicit `{}`
    /// instead of omitting the key. Off by default: most transports treat
    /// an absent key and "no criteria" as the same thing, but some require
    /// the key to always be present.
    pub fn include_empty_criteria(&mut self, include: bool) -> &mut Self {
        self.include_empty_criteria = include;
        self
    }

    /// Serialize to the flat query-parameter shape.
    ///
    /// The criteria mapping becomes one JSON-encoded string under `search`;
    /// every unset field is omitted.
    ///
    /// # Panics
    /// Never in practice: criteria contain only JSON-representable values.
    #[must_use]
    pub fn build_search_params(&self) -> SearchParams {
        let search = if self.criteria.is_empty() && !self.include_empty_criteria {
            None
        } else {
            Some(serde_json::to_string(&self.criteria).expect("criteria serialize to JSON"))
        };
        SearchParams {
            search,
            search_locale: self.search_locale.clone(),
            search_scope: self.search_scope.clone(),
            page: self.page,
            limit: self.limit,
            with_count: self.with_count,
        }
    }

    /// The raw criteria mapping, for transports that POST the criteria as a
    /// native nested body rather than a JSON-encoded string.
    #[must_use]
    pub fn build_search_criteria(&self) -> SearchCriteria {
        self.criteria.clone()
    }

    /// Reset all accumulated state to empty/default.
    pub fn clear(&mut self) -> &mut Self {
        self.criteria.clear();
        self.search_locale = None;
        self.search_scope = None;
        self.page = None;
        self.limit = None;
        self.with_count = None;
        self.include_empty_criteria = false;
        self
    }

    // Common search presets.

    /// Only enabled products.
    #[must_use]
    pub fn enabled_products() -> Self {
        let mut builder = Self::new();
        builder.raw_filter("enabled", "=", Some(Value::from(true)), None, None, None);
        builder
    }

    /// Products classified in any of the given categories.
    #[must_use]
    pub fn in_categories(codes: &[&str]) -> Self {
        let mut builder = Self::new();
        builder.raw_filter(
            "categories",
            "IN",
            Some(Value::from(codes.iter().map(|c| Value::from(*c)).collect::<Vec<_>>())),
            None,
            None,
            None,
        );
        builder
    }

    /// Products belonging to any of the given families.
    #[must_use]
    pub fn with_family(codes: &[&str]) -> Self {
        let mut builder = Self::new();
        builder.raw_filter(
            "family",
            "IN",
            Some(Value::from(codes.iter().map(|c| Value::from(*c)).collect::<Vec<_>>())),
            None,
            None,
            None,
        );
        builder
    }

    /// Products updated within the last `days` days.
    #[must_use]
    pub fn recently_updated(days: u32) -> Self {
        let mut builder = Self::new();
        builder.raw_filter(
            "updated",
            "SINCE LAST N DAYS",
            Some(Value::from(days)),
            None,
            None,
            None,
        );
        builder
    }

    /// Products below a completeness threshold on the given channel.
    #[must_use]
    pub fn incomplete(scope: &str, threshold: u8) -> Self {
        let mut builder = Self::new();
        builder.raw_filter(
            "completeness",
            "<",
            Some(Value::from(threshold)),
            None,
            Some(scope),
            None,
        );
        builder
    }
}
