// src/common/metrics.rs

use rust_decimal::{Decimal, RoundingStrategy};

// Todas as métricas derivadas (margem %, evolução, taxa de ruptura) passam por aqui.
// Regra única: denominador zero => 0.

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator * 100`, arredondado a 2 casas.
pub fn percentage(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round2)
        .unwrap_or(Decimal::ZERO)
}

/// (atual - anterior) / anterior * 100
pub fn evolution_percent(current: Decimal, previous: Decimal) -> Decimal {
    percentage(current - previous, previous)
}

pub fn stock_break_rate(break_quantity: Decimal, ordered_quantity: Decimal) -> Decimal {
    percentage(break_quantity, ordered_quantity)
}

/// Média simples protegida contra divisão por zero.
pub fn average(total: Decimal, count: Decimal) -> Decimal {
    if count.is_zero() {
        return Decimal::ZERO;
    }
    total.checked_div(count).map(round2).unwrap_or(Decimal::ZERO)
}
