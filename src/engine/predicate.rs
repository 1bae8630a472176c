//! # engine::predicate
//!
//! Filter criteria and the predicates they expand into.
//!
//! Every option in [`FilterCriteria`] is independently optional.  Each one that
//! is set contributes exactly one [`TradePredicate`]; the engine ANDs them.
//! Adding a new filter option means adding a field and one `push` in
//! [`FilterCriteria::predicates`].

use chrono::NaiveDateTime;

use crate::models::{Side, Trade};

/// A single boxed test applied to each record.
pub type TradePredicate = Box<dyn Fn(&Trade) -> bool + Send + Sync>;

/// The recognised filter options.  `None` means "not requested".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub asset_class: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub trade_type: Option<Side>,
}

impl FilterCriteria {
    /// `true` when no option was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.asset_class.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.trade_type.is_none()
    }

    /// Expands the supplied options into predicates, one per option.
    pub fn predicates(&self) -> Vec<TradePredicate> {
        let mut out: Vec<TradePredicate> = Vec::new();

        if let Some(asset_class) = self.asset_class.clone() {
            out.push(asset_class_is(asset_class));
        }
        if let Some(start) = self.start {
            out.push(executed_at_or_after(start));
        }
        if let Some(end) = self.end {
            out.push(executed_at_or_before(end));
        }
        if let Some(min) = self.min_price {
            out.push(price_at_least(min));
        }
        if let Some(max) = self.max_price {
            out.push(price_at_most(max));
        }
        if let Some(side) = self.trade_type {
            out.push(side_is(side));
        }

        out
    }
}

/// Logical AND over `predicates`.  An empty list matches everything; callers
/// decide what "no criteria" means.
pub fn matches_all(predicates: &[TradePredicate], trade: &Trade) -> bool {
    predicates.iter().all(|p| p(trade))
}

pub fn asset_class_is(asset_class: String) -> TradePredicate {
    Box::new(move |t: &Trade| t.asset_class() == Some(asset_class.as_str()))
}

pub fn executed_at_or_after(start: NaiveDateTime) -> TradePredicate {
    Box::new(move |t: &Trade| t.trade_date_time() >= start)
}

pub fn executed_at_or_before(end: NaiveDateTime) -> TradePredicate {
    Box::new(move |t: &Trade| t.trade_date_time() <= end)
}

pub fn price_at_least(min: f64) -> TradePredicate {
    Box::new(move |t: &Trade| t.details().price() >= min)
}

pub fn price_at_most(max: f64) -> TradePredicate {
    Box::new(move |t: &Trade| t.details().price() <= max)
}

pub fn side_is(side: Side) -> TradePredicate {
    Box::new(move |t: &Trade| t.details().side() == side)
}
