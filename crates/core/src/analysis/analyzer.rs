use rust_decimal::Decimal;
use std::collections::HashMap;

use super::analysis_errors::AnalysisError;
use super::analysis_model::{
    ItemAnalysis, ItemIssue, ItemStatus, MissingPricePolicy, PortfolioAnalysis, PriceSource,
};
use crate::constants::{DANGER_TOLERANCE_MULTIPLIER, ONE_HUNDRED};
use crate::portfolios::{Portfolio, PortfolioItemDetail};

/// Price resolved for one item before weights are known.
struct Valuation {
    price: Option<Decimal>,
    source: Option<PriceSource>,
    value: Option<Decimal>,
    issues: Vec<ItemIssue>,
}

/// Computes drift and rebalance figures for a portfolio.
///
/// `prices` maps asset id to the latest price. Missing or non-positive prices
/// are resolved per item according to `policy`, and an item whose value does
/// not fit a `Decimal` is reported as unavailable. The fatal conditions are a
/// non-positive `initial_invest_amount` and portfolio totals that overflow.
/// Items are returned in input order.
pub fn analyze(
    portfolio: &Portfolio,
    items: &[PortfolioItemDetail],
    prices: &HashMap<String, Decimal>,
    policy: MissingPricePolicy,
) -> Result<PortfolioAnalysis, AnalysisError> {
    let invested = portfolio.initial_invest_amount;
    if invested <= Decimal::ZERO {
        return Err(AnalysisError::InvalidInvestment(invested));
    }

    // First pass: value each item so the total is known before weighting.
    let valuations: Vec<Valuation> = items
        .iter()
        .map(|detail| value_item(detail, prices, policy))
        .collect();

    let total_value = valuations
        .iter()
        .filter_map(|v| v.value)
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| AnalysisError::ValueOutOfRange("total value".to_string()))?;

    // Second pass: weights, drift and severity against the completed total.
    let analyzed: Vec<ItemAnalysis> = items
        .iter()
        .zip(valuations)
        .map(|(detail, valuation)| weigh_item(detail, valuation, total_value))
        .collect();

    let out_of_range_count = analyzed.iter().filter(|i| i.is_out_of_range).count();
    let unavailable_count = analyzed
        .iter()
        .filter(|i| i.status == ItemStatus::Unavailable)
        .count();
    let total_return = total_value
        .checked_sub(invested)
        .ok_or_else(|| AnalysisError::ValueOutOfRange("total return".to_string()))?;
    let total_return_pct = percent_of(total_return, invested)
        .ok_or_else(|| AnalysisError::ValueOutOfRange("total return percentage".to_string()))?;

    Ok(PortfolioAnalysis {
        portfolio_id: portfolio.id.clone(),
        portfolio_name: portfolio.name.clone(),
        initial_invest_amount: invested,
        total_value,
        total_return,
        total_return_pct,
        out_of_range_count,
        unavailable_count,
        needs_rebalance: out_of_range_count > 0,
        missing_price_policy: policy,
        items: analyzed,
    })
}

fn value_item(
    detail: &PortfolioItemDetail,
    prices: &HashMap<String, Decimal>,
    policy: MissingPricePolicy,
) -> Valuation {
    let item = &detail.item;
    let live = prices
        .get(&item.asset_id)
        .copied()
        .filter(|p| *p > Decimal::ZERO);

    let (price, source, mut issues) = match live {
        Some(price) => (Some(price), Some(PriceSource::Live), Vec::new()),
        None => {
            let issue = ItemIssue::missing_price(&item.asset_id, &detail.asset.symbol);
            match policy {
                MissingPricePolicy::EntryPriceFallback if item.entry_price > Decimal::ZERO => (
                    Some(item.entry_price),
                    Some(PriceSource::EntryPrice),
                    vec![issue],
                ),
                _ => (None, None, vec![issue]),
            }
        }
    };

    if item.entry_price <= Decimal::ZERO {
        issues.push(ItemIssue::invalid_entry_price(&item.id, item.entry_price));
    }

    let value = match price {
        Some(p) => {
            let value = item.current_quantity.checked_mul(p);
            if value.is_none() {
                issues.push(ItemIssue::value_overflow(&item.id, item.current_quantity, p));
            }
            value
        }
        None => None,
    };

    Valuation {
        price,
        source,
        value,
        issues,
    }
}

fn weigh_item(
    detail: &PortfolioItemDetail,
    valuation: Valuation,
    total_value: Decimal,
) -> ItemAnalysis {
    let item = &detail.item;
    let Valuation {
        price,
        source,
        value,
        issues,
    } = valuation;

    let current_weight = value.and_then(|v| {
        if total_value.is_zero() {
            Some(Decimal::ZERO)
        } else {
            percent_of(v, total_value)
        }
    });
    let weight_diff = current_weight.and_then(|w| w.checked_sub(item.target_weight));
    let is_out_of_range = weight_diff.is_some_and(|d| d.abs() > item.tolerance);

    let status = match weight_diff {
        None => ItemStatus::Unavailable,
        Some(_) if !is_out_of_range => ItemStatus::InRange,
        Some(d)
            if item
                .tolerance
                .checked_mul(DANGER_TOLERANCE_MULTIPLIER)
                .is_some_and(|band| d.abs() <= band) =>
        {
            ItemStatus::Warning
        }
        Some(_) => ItemStatus::Danger,
    };

    let return_pct = match price {
        Some(p) if item.entry_price > Decimal::ZERO => p
            .checked_sub(item.entry_price)
            .and_then(|gain| percent_of(gain, item.entry_price)),
        _ => None,
    };

    let target_value = value.and_then(|_| share_of(total_value, item.target_weight));
    let rebalance_quantity = match (price, value, target_value) {
        (Some(p), Some(v), Some(target)) => target
            .checked_sub(v)
            .and_then(|delta| delta.checked_div(p)),
        _ => None,
    };

    ItemAnalysis {
        item_id: item.id.clone(),
        asset_id: item.asset_id.clone(),
        symbol: detail.asset.symbol.clone(),
        name: detail.asset.name.clone(),
        target_weight: item.target_weight,
        tolerance: item.tolerance,
        entry_price: item.entry_price,
        current_quantity: item.current_quantity,
        current_price: price,
        price_source: source,
        current_value: value,
        current_weight,
        weight_diff,
        is_out_of_range,
        status,
        return_pct,
        target_value,
        rebalance_quantity,
        issues,
    }
}

/// `100 × part / whole`, dividing first when the product would overflow.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    match part.checked_mul(ONE_HUNDRED) {
        Some(scaled) => scaled.checked_div(whole),
        None => part.checked_div(whole)?.checked_mul(ONE_HUNDRED),
    }
}

/// `whole × pct / 100`, dividing first when the product would overflow.
fn share_of(whole: Decimal, pct: Decimal) -> Option<Decimal> {
    match whole.checked_mul(pct) {
        Some(product) => product.checked_div(ONE_HUNDRED),
        None => whole.checked_div(ONE_HUNDRED)?.checked_mul(pct),
    }
}
