use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// An out-of-range item whose drift exceeds `tolerance × 1.5` is `danger`, otherwise `warning`.
pub const DANGER_TOLERANCE_MULTIPLIER: Decimal = dec!(1.5);

/// Default drift band, in percentage points, when an item omits its tolerance.
pub const DEFAULT_TOLERANCE: Decimal = dec!(5);

pub const MAX_TOLERANCE: Decimal = dec!(50);

pub const MAX_TARGET_WEIGHT: Decimal = dec!(100);

/// Upper bound for `initial_invest_amount`.
pub const MAX_INVEST_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Upper bound for an item's `current_quantity`.
pub const MAX_QUANTITY: Decimal = dec!(1_000_000_000_000_000);

/// Target weights of a portfolio must sum to 100 within this margin.
pub const WEIGHT_SUM_TOLERANCE: Decimal = dec!(0.01);

pub const ONE_HUNDRED: Decimal = dec!(100);

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const MAX_SEARCH_LIMIT: usize = 50;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_ASSET_TYPE: &str = "stock";
