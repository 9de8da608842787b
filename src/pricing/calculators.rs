//! Core pricing calculation functions.
//!
//! Pure functions for rule resolution and pricing math - no database access.
//! Callers fetch an ordered snapshot of rules and pass it in.

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::models::{PricingRule, Tariff};

const TIME_FORMAT: &str = "%H:%M";

/// Result of a single rule predicate.
///
/// `Inconclusive` means the check could not be evaluated (for example the
/// time slot did not parse) and must not reject the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Match,
    NoMatch,
    Inconclusive,
}

impl CheckOutcome {
    /// Whether a rule with this outcome may be applied
    pub fn accepts(self) -> bool {
        !matches!(self, CheckOutcome::NoMatch)
    }

    /// Combine two outcomes: any rejection wins, then any uncertainty.
    pub fn and(self, other: CheckOutcome) -> CheckOutcome {
        match (self, other) {
            (CheckOutcome::NoMatch, _) | (_, CheckOutcome::NoMatch) => CheckOutcome::NoMatch,
            (CheckOutcome::Inconclusive, _) | (_, CheckOutcome::Inconclusive) => {
                CheckOutcome::Inconclusive
            }
            _ => CheckOutcome::Match,
        }
    }
}

/// Computed price for a booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub total_cents: i64,
    pub currency: String,
    /// Rule that produced the quote; `None` when the default tariff was used
    pub rule_id: Option<Uuid>,
    pub rule_name: Option<String>,
    /// True when the applied rule had a time window that could not be verified
    pub time_unverified: bool,
}

/// Parse the start of a `"HH:MM-HH:MM"` time slot.
///
/// A bare `"HH:MM"` is accepted as well. Returns `None` when the start
/// does not parse.
pub fn parse_slot_start(time_slot: &str) -> Option<NaiveTime> {
    let start = time_slot.split('-').next()?.trim();
    NaiveTime::parse_from_str(start, TIME_FORMAT).ok()
}

/// Check the slot start against the rule's time window.
///
/// Bounds are inclusive. A rule without bounds always matches. An
/// unparseable slot start, or an unparseable bound, is inconclusive for
/// that comparison only.
pub fn check_time_window(rule: &PricingRule, slot_start: Option<NaiveTime>) -> CheckOutcome {
    if rule.start_time.is_none() && rule.end_time.is_none() {
        return CheckOutcome::Match;
    }
    let Some(start) = slot_start else {
        return CheckOutcome::Inconclusive;
    };

    let lower = match rule.start_time.as_deref() {
        None => CheckOutcome::Match,
        Some(raw) => match NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT) {
            Ok(bound) if start < bound => CheckOutcome::NoMatch,
            Ok(_) => CheckOutcome::Match,
            Err(_) => CheckOutcome::Inconclusive,
        },
    };

    let upper = match rule.end_time.as_deref() {
        None => CheckOutcome::Match,
        Some(raw) => match NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT) {
            Ok(bound) if start > bound => CheckOutcome::NoMatch,
            Ok(_) => CheckOutcome::Match,
            Err(_) => CheckOutcome::Inconclusive,
        },
    };

    lower.and(upper)
}

/// Check the visit date against the rule's inclusive date range.
pub fn check_date_range(rule: &PricingRule, date: NaiveDate) -> CheckOutcome {
    if rule.start_date.is_some_and(|start| date < start) {
        return CheckOutcome::NoMatch;
    }
    if rule.end_date.is_some_and(|end| date > end) {
        return CheckOutcome::NoMatch;
    }
    CheckOutcome::Match
}

/// Check the visit date's weekday (Monday=0) against the rule's day set.
pub fn check_weekday(rule: &PricingRule, date: NaiveDate) -> CheckOutcome {
    let days = rule.weekdays();
    if days.is_empty() || days.contains(&date.weekday().num_days_from_monday()) {
        CheckOutcome::Match
    } else {
        CheckOutcome::NoMatch
    }
}

/// Evaluate every predicate of a rule for the given date and slot start.
pub fn match_rule(rule: &PricingRule, date: NaiveDate, slot_start: Option<NaiveTime>) -> CheckOutcome {
    let outcome = check_date_range(rule, date);
    if outcome == CheckOutcome::NoMatch {
        return outcome;
    }
    let outcome = outcome.and(check_weekday(rule, date));
    if outcome == CheckOutcome::NoMatch {
        return outcome;
    }
    outcome.and(check_time_window(rule, slot_start))
}

/// Find the first rule, in the given order, that accepts the booking.
pub fn find_applicable_rule<'a>(
    rules: &'a [PricingRule],
    date: NaiveDate,
    time_slot: &str,
) -> Option<(&'a PricingRule, CheckOutcome)> {
    let slot_start = parse_slot_start(time_slot);
    rules.iter().find_map(|rule| {
        let outcome = match_rule(rule, date, slot_start);
        outcome.accepts().then_some((rule, outcome))
    })
}

/// Price a booking against an ordered rule snapshot.
///
/// `rules` must already be sorted by priority descending; among rules of
/// equal priority the first one in the slice wins. Falls back to
/// [`Tariff::default_rate`] when nothing matches.
pub fn resolve(
    rules: &[PricingRule],
    date: NaiveDate,
    time_slot: &str,
    num_adults: u32,
    num_children: u32,
) -> PriceQuote {
    match find_applicable_rule(rules, date, time_slot) {
        Some((rule, outcome)) => {
            let tariff = rule.tariff();
            PriceQuote {
                total_cents: price_for(&tariff, num_adults, num_children),
                currency: tariff.currency,
                rule_id: Some(rule.id),
                rule_name: rule.name.clone(),
                time_unverified: outcome == CheckOutcome::Inconclusive,
            }
        }
        None => {
            let tariff = Tariff::default_rate();
            PriceQuote {
                total_cents: price_for(&tariff, num_adults, num_children),
                currency: tariff.currency,
                rule_id: None,
                rule_name: None,
                time_unverified: false,
            }
        }
    }
}

/// Linear party pricing: `adults * adult_cents + children * child_cents`.
///
/// Unit prices below zero count as zero; the sum saturates instead of
/// overflowing.
pub fn price_for(tariff: &Tariff, num_adults: u32, num_children: u32) -> i64 {
    let adults = i64::from(num_adults).saturating_mul(tariff.adult_cents.max(0));
    let children = i64::from(num_children).saturating_mul(tariff.child_cents.max(0));
    adults.saturating_add(children)
}

/// Stable sort by priority descending, keeping input order among ties.
pub fn sort_by_priority(rules: &mut [PricingRule]) {
    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Convert minor currency units to a major-unit decimal (2 places).
pub fn minor_to_major(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
