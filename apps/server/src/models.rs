//! Wire types of the REST API.
//!
//! Field names and shapes match the serialized `driftfolio_core` models, so
//! clients can decode responses straight into the core types.

use chrono::NaiveDateTime;
use driftfolio_core::{analysis as core_analysis, assets as core_assets};
use driftfolio_core::{portfolios as core_portfolios, quotes as core_quotes, users as core_users};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl From<Credentials> for core_users::NewUser {
    fn from(c: Credentials) -> Self {
        Self::new(c.email, c.password)
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl From<core_users::User> for User {
    fn from(u: core_users::User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub currency: String,
    pub asset_type: String,
    pub created_at: NaiveDateTime,
}

impl From<core_assets::Asset> for Asset {
    fn from(a: core_assets::Asset) -> Self {
        Self {
            id: a.id,
            symbol: a.symbol,
            name: a.name,
            exchange: a.exchange,
            currency: a.currency,
            asset_type: a.asset_type,
            created_at: a.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct NewAsset {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub asset_type: Option<String>,
}

impl From<NewAsset> for core_assets::NewAsset {
    fn from(a: NewAsset) -> Self {
        Self {
            symbol: a.symbol,
            name: a.name,
            exchange: a.exchange,
            currency: a.currency,
            asset_type: a.asset_type,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct AssetPrice {
    pub symbol: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
}

impl From<core_assets::AssetPrice> for AssetPrice {
    fn from(p: core_assets::AssetPrice) -> Self {
        Self {
            symbol: p.symbol,
            price: p.price,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SymbolSearchResult {
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub asset_type: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub current_price: Option<Decimal>,
}

impl From<core_quotes::SymbolSearchResult> for SymbolSearchResult {
    fn from(r: core_quotes::SymbolSearchResult) -> Self {
        Self {
            symbol: r.symbol,
            name: r.name,
            exchange: r.exchange,
            asset_type: r.asset_type,
            current_price: r.current_price,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub initial_invest_amount: Decimal,
    pub created_at: NaiveDateTime,
}

impl From<core_portfolios::Portfolio> for Portfolio {
    fn from(p: core_portfolios::Portfolio) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            name: p.name,
            description: p.description,
            initial_invest_amount: p.initial_invest_amount,
            created_at: p.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct PortfolioItem {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    #[schema(value_type = f64)]
    pub target_weight: Decimal,
    #[schema(value_type = f64)]
    pub tolerance: Decimal,
    #[schema(value_type = f64)]
    pub entry_price: Decimal,
    #[schema(value_type = f64)]
    pub initial_quantity: Decimal,
    #[schema(value_type = f64)]
    pub current_quantity: Decimal,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<core_portfolios::PortfolioItem> for PortfolioItem {
    fn from(i: core_portfolios::PortfolioItem) -> Self {
        Self {
            id: i.id,
            portfolio_id: i.portfolio_id,
            asset_id: i.asset_id,
            target_weight: i.target_weight,
            tolerance: i.tolerance,
            entry_price: i.entry_price,
            initial_quantity: i.initial_quantity,
            current_quantity: i.current_quantity,
            version: i.version,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

/// An item with its asset inlined.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct PortfolioItemDetail {
    #[serde(flatten)]
    pub item: PortfolioItem,
    pub asset: Asset,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct PortfolioDetail {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub items: Vec<PortfolioItemDetail>,
}

impl From<core_portfolios::PortfolioDetail> for PortfolioDetail {
    fn from(d: core_portfolios::PortfolioDetail) -> Self {
        Self {
            portfolio: d.portfolio.into(),
            items: d
                .items
                .into_iter()
                .map(|detail| PortfolioItemDetail {
                    item: detail.item.into(),
                    asset: detail.asset.into(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct NewPortfolioItem {
    pub asset_id: String,
    #[schema(value_type = f64)]
    pub target_weight: Decimal,
    /// Percentage-point band around the target; defaults to 5.
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub tolerance: Option<Decimal>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct NewPortfolio {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub initial_invest_amount: Decimal,
    pub items: Vec<NewPortfolioItem>,
}

impl From<NewPortfolio> for core_portfolios::NewPortfolio {
    fn from(p: NewPortfolio) -> Self {
        Self {
            name: p.name,
            description: p.description,
            initial_invest_amount: p.initial_invest_amount,
            items: p
                .items
                .into_iter()
                .map(|item| {
                    let new_item =
                        core_portfolios::NewPortfolioItem::new(item.asset_id, item.target_weight);
                    match item.tolerance {
                        Some(tolerance) => new_item.with_tolerance(tolerance),
                        None => new_item,
                    }
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ItemQuantityUpdate {
    #[schema(value_type = f64)]
    pub current_quantity: Decimal,
    /// When set, the update is rejected with 409 unless the item is still at this version.
    #[serde(default)]
    pub expected_version: Option<i32>,
}

impl From<ItemQuantityUpdate> for core_portfolios::ItemQuantityUpdate {
    fn from(u: ItemQuantityUpdate) -> Self {
        Self {
            current_quantity: u.current_quantity,
            expected_version: u.expected_version,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InRange,
    Warning,
    Danger,
    Unavailable,
}

impl From<core_analysis::ItemStatus> for ItemStatus {
    fn from(s: core_analysis::ItemStatus) -> Self {
        match s {
            core_analysis::ItemStatus::InRange => Self::InRange,
            core_analysis::ItemStatus::Warning => Self::Warning,
            core_analysis::ItemStatus::Danger => Self::Danger,
            core_analysis::ItemStatus::Unavailable => Self::Unavailable,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Live,
    EntryPrice,
}

impl From<core_analysis::PriceSource> for PriceSource {
    fn from(s: core_analysis::PriceSource) -> Self {
        match s {
            core_analysis::PriceSource::Live => Self::Live,
            core_analysis::PriceSource::EntryPrice => Self::EntryPrice,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingPricePolicy {
    Exclude,
    EntryPrice,
}

impl From<core_analysis::MissingPricePolicy> for MissingPricePolicy {
    fn from(p: core_analysis::MissingPricePolicy) -> Self {
        match p {
            core_analysis::MissingPricePolicy::Exclude => Self::Exclude,
            core_analysis::MissingPricePolicy::EntryPriceFallback => Self::EntryPrice,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    MissingPrice,
    InvalidEntryPrice,
    ValueOverflow,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ItemIssue {
    pub code: IssueCode,
    pub message: String,
}

impl From<core_analysis::ItemIssue> for ItemIssue {
    fn from(i: core_analysis::ItemIssue) -> Self {
        let code = match i.code {
            core_analysis::IssueCode::MissingPrice => IssueCode::MissingPrice,
            core_analysis::IssueCode::InvalidEntryPrice => IssueCode::InvalidEntryPrice,
            core_analysis::IssueCode::ValueOverflow => IssueCode::ValueOverflow,
        };
        Self {
            code,
            message: i.message,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ItemAnalysis {
    pub item_id: String,
    pub asset_id: String,
    pub symbol: String,
    pub name: String,
    #[schema(value_type = f64)]
    pub target_weight: Decimal,
    #[schema(value_type = f64)]
    pub tolerance: Decimal,
    #[schema(value_type = f64)]
    pub entry_price: Decimal,
    #[schema(value_type = f64)]
    pub current_quantity: Decimal,
    #[schema(value_type = Option<f64>)]
    pub current_price: Option<Decimal>,
    pub price_source: Option<PriceSource>,
    #[schema(value_type = Option<f64>)]
    pub current_value: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub current_weight: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub weight_diff: Option<Decimal>,
    pub is_out_of_range: bool,
    pub status: ItemStatus,
    #[schema(value_type = Option<f64>)]
    pub return_pct: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub target_value: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub rebalance_quantity: Option<Decimal>,
    pub issues: Vec<ItemIssue>,
}

impl From<core_analysis::ItemAnalysis> for ItemAnalysis {
    fn from(a: core_analysis::ItemAnalysis) -> Self {
        Self {
            item_id: a.item_id,
            asset_id: a.asset_id,
            symbol: a.symbol,
            name: a.name,
            target_weight: a.target_weight,
            tolerance: a.tolerance,
            entry_price: a.entry_price,
            current_quantity: a.current_quantity,
            current_price: a.current_price,
            price_source: a.price_source.map(PriceSource::from),
            current_value: a.current_value,
            current_weight: a.current_weight,
            weight_diff: a.weight_diff,
            is_out_of_range: a.is_out_of_range,
            status: a.status.into(),
            return_pct: a.return_pct,
            target_value: a.target_value,
            rebalance_quantity: a.rebalance_quantity,
            issues: a.issues.into_iter().map(ItemIssue::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct PortfolioAnalysis {
    pub portfolio_id: String,
    pub portfolio_name: String,
    #[schema(value_type = f64)]
    pub initial_invest_amount: Decimal,
    #[schema(value_type = f64)]
    pub total_value: Decimal,
    #[schema(value_type = f64)]
    pub total_return: Decimal,
    #[schema(value_type = f64)]
    pub total_return_pct: Decimal,
    pub out_of_range_count: usize,
    pub unavailable_count: usize,
    pub needs_rebalance: bool,
    pub missing_price_policy: MissingPricePolicy,
    pub items: Vec<ItemAnalysis>,
}

impl From<core_analysis::PortfolioAnalysis> for PortfolioAnalysis {
    fn from(a: core_analysis::PortfolioAnalysis) -> Self {
        Self {
            portfolio_id: a.portfolio_id,
            portfolio_name: a.portfolio_name,
            initial_invest_amount: a.initial_invest_amount,
            total_value: a.total_value,
            total_return: a.total_return,
            total_return_pct: a.total_return_pct,
            out_of_range_count: a.out_of_range_count,
            unavailable_count: a.unavailable_count,
            needs_rebalance: a.needs_rebalance,
            missing_price_policy: a.missing_price_policy.into(),
            items: a.items.into_iter().map(ItemAnalysis::from).collect(),
        }
    }
}
