//! Tests for portfolio creation and quantity update validation.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValidationError};
    use crate::portfolios::{ItemQuantityUpdate, NewPortfolio, NewPortfolioItem};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn new_portfolio(items: Vec<NewPortfolioItem>) -> NewPortfolio {
        NewPortfolio {
            name: "Retirement".to_string(),
            description: None,
            initial_invest_amount: dec!(10000),
            items,
        }
    }

    fn message(err: Error) -> String {
        match err {
            Error::Validation(ValidationError::InvalidInput(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_portfolio() {
        let portfolio = new_portfolio(vec![
            NewPortfolioItem::new("a1", dec!(60)),
            NewPortfolioItem::new("a2", dec!(40)).with_tolerance(dec!(2.5)),
        ]);
        assert!(portfolio.validate().is_ok());
    }

    #[test]
    fn test_weight_sum_within_rounding_margin() {
        let portfolio = new_portfolio(vec![
            NewPortfolioItem::new("a1", dec!(33.33)),
            NewPortfolioItem::new("a2", dec!(33.33)),
            NewPortfolioItem::new("a3", dec!(33.33)),
        ]);
        assert!(portfolio.validate().is_ok());
    }

    #[test]
    fn test_weight_sum_must_be_one_hundred() {
        let portfolio = new_portfolio(vec![
            NewPortfolioItem::new("a1", dec!(60)),
            NewPortfolioItem::new("a2", dec!(30)),
        ]);
        assert_eq!(
            message(portfolio.validate().unwrap_err()),
            "Target weights must sum to 100%. Current sum: 90.00%"
        );

        let over = new_portfolio(vec![
            NewPortfolioItem::new("a1", dec!(60)),
            NewPortfolioItem::new("a2", dec!(40.02)),
        ]);
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_name_and_items() {
        let mut portfolio = new_portfolio(vec![NewPortfolioItem::new("a1", dec!(100))]);
        portfolio.name = "  ".to_string();
        assert!(portfolio.validate().is_err());

        assert!(new_portfolio(vec![]).validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_investment() {
        let mut portfolio = new_portfolio(vec![NewPortfolioItem::new("a1", dec!(100))]);
        portfolio.initial_invest_amount = Decimal::ZERO;
        assert!(portfolio.validate().is_err());
    }

    #[test]
    fn test_rejects_investment_above_bound() {
        let mut portfolio = new_portfolio(vec![NewPortfolioItem::new("a1", dec!(100))]);
        portfolio.initial_invest_amount = dec!(1_000_000_000_000_000);
        assert!(portfolio.validate().is_ok());

        portfolio.initial_invest_amount = dec!(1_000_000_000_000_001);
        let err = portfolio.validate().unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_rejects_duplicate_assets() {
        let portfolio = new_portfolio(vec![
            NewPortfolioItem::new("a1", dec!(50)),
            NewPortfolioItem::new("a1", dec!(50)),
        ]);
        assert!(message(portfolio.validate().unwrap_err()).contains("more than once"));
    }

    #[test]
    fn test_item_bounds() {
        assert!(NewPortfolioItem::new("a1", dec!(0)).validate().is_err());
        assert!(NewPortfolioItem::new("a1", dec!(100.01)).validate().is_err());
        assert!(NewPortfolioItem::new("a1", dec!(100)).validate().is_ok());
        assert!(NewPortfolioItem::new("a1", dec!(10))
            .with_tolerance(dec!(-1))
            .validate()
            .is_err());
        assert!(NewPortfolioItem::new("a1", dec!(10))
            .with_tolerance(dec!(50.5))
            .validate()
            .is_err());
        assert!(NewPortfolioItem::new("a1", dec!(10))
            .with_tolerance(dec!(0))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_tolerance_defaults_when_omitted() {
        let item: NewPortfolioItem =
            serde_json::from_str(r#"{"asset_id": "a1", "target_weight": 100}"#).unwrap();
        assert_eq!(item.tolerance, dec!(5));
    }

    #[test]
    fn test_quantity_update_validation() {
        assert!(ItemQuantityUpdate::new(dec!(0)).validate().is_ok());
        assert!(ItemQuantityUpdate::new(dec!(-0.1)).validate().is_err());
        assert!(ItemQuantityUpdate::new(dec!(1_000_000_000_000_000))
            .validate()
            .is_ok());
        assert!(ItemQuantityUpdate::new(dec!(1_000_000_000_000_000.5))
            .validate()
            .is_err());

        let update: ItemQuantityUpdate =
            serde_json::from_str(r#"{"current_quantity": 12.5, "expected_version": 3}"#).unwrap();
        assert_eq!(update, ItemQuantityUpdate::new(dec!(12.5)).expecting_version(3));
    }
}
