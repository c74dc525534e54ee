//! Integration tests for the public sizing API.
//!
//! Run with: cargo test --test position_sizing

use arb_sizer::sizing::{Constraint, PositionSize, PositionSizer, RiskConfig};
use arb_sizer::PriceError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// $1000 cap, 2% of balance.
fn sizer() -> PositionSizer {
    PositionSizer::new(RiskConfig::new(dec!(1000), dec!(0.02)).unwrap())
}

fn assert_invariants(position: &PositionSize, cap: Decimal, balance_ceiling: Decimal) {
    let quantity = Decimal::from(position.contracts);

    assert_eq!(position.yes_cost, quantity * position.yes_price);
    assert_eq!(position.no_cost, quantity * position.no_price);
    assert_eq!(position.total_cost, position.yes_cost + position.no_cost);
    assert_eq!(position.expected_payout, quantity);
    assert_eq!(
        position.expected_profit,
        position.expected_payout - position.total_cost
    );

    if position.total_cost > Decimal::ZERO {
        assert_eq!(
            position.profit_margin,
            position.expected_profit / position.total_cost
        );
    } else {
        assert_eq!(position.profit_margin, Decimal::ZERO);
    }

    if position.contracts > 0 {
        assert_eq!(position.yes_cost / position.yes_price, quantity);
        assert_eq!(position.no_cost / position.no_price, quantity);
        assert!(position.total_cost <= cap.min(balance_ceiling));
    }
}

#[test]
fn scenario_cap_binds() {
    let position = sizer().calculate(dec!(0.45), dec!(0.53), dec!(100000)).unwrap();

    assert_eq!(position.contracts, 1020);
    assert_eq!(position.total_cost, dec!(999.60));
    assert_eq!(position.expected_profit, dec!(20.40));
    assert_eq!(position.constraint_triggered, Constraint::PositionCap);
    assert!(position.is_viable());
    assert_invariants(&position, dec!(1000), dec!(2000));
}

#[test]
fn scenario_balance_binds() {
    let position = sizer().calculate(dec!(0.45), dec!(0.53), dec!(10000)).unwrap();

    assert_eq!(position.contracts, 204);
    assert_eq!(position.total_cost, dec!(199.92));
    assert_eq!(position.constraint_triggered, Constraint::BalancePercent);
    assert_invariants(&position, dec!(1000), dec!(200));
}

#[test]
fn scenario_insufficient_funds() {
    let position = sizer().calculate(dec!(0.45), dec!(0.53), dec!(10)).unwrap();

    assert_eq!(position.contracts, 0);
    assert_eq!(position.total_cost, Decimal::ZERO);
    assert_eq!(position.constraint_triggered, Constraint::InsufficientFunds);
    assert!(!position.is_viable());
    assert_invariants(&position, dec!(1000), dec!(0.20));
}

#[test]
fn scenario_no_arbitrage() {
    let err = sizer()
        .calculate(dec!(0.50), dec!(0.52), dec!(100000))
        .unwrap_err();

    assert_eq!(
        err,
        PriceError::NoArbitrage {
            yes_price: dec!(0.50),
            no_price: dec!(0.52),
            total: dec!(1.02),
        }
    );
    assert!(err.to_string().contains("no arbitrage opportunity"));
}

#[test]
fn scenario_tie_goes_to_cap() {
    // 2% of $50,000 is exactly the $1000 cap
    let position = sizer().calculate(dec!(0.50), dec!(0.48), dec!(50000)).unwrap();

    assert_eq!(position.constraint_triggered, Constraint::PositionCap);
    assert_eq!(position.contracts, 1020);
}

#[test]
fn asymmetric_prices_keep_sides_equal() {
    for (yes, no) in [
        (dec!(0.10), dec!(0.88)),
        (dec!(0.30), dec!(0.68)),
        (dec!(0.01), dec!(0.97)),
        (dec!(0.495), dec!(0.500)),
    ] {
        let position = sizer().calculate(yes, no, dec!(100000)).unwrap();

        assert!(position.contracts > 0);
        assert_eq!(
            position.yes_cost / position.yes_price,
            position.no_cost / position.no_price
        );
        assert_invariants(&position, dec!(1000), dec!(2000));
    }
}

#[test]
fn wider_spread_has_higher_margin() {
    let narrow = sizer().calculate(dec!(0.49), dec!(0.50), dec!(100000)).unwrap();
    let wide = sizer().calculate(dec!(0.45), dec!(0.50), dec!(100000)).unwrap();

    assert!(wide.profit_margin > narrow.profit_margin);
}

#[test]
fn identical_inputs_give_identical_results() {
    let sizer = sizer();
    let first = sizer.calculate(dec!(0.37), dec!(0.59), dec!(12345.67)).unwrap();
    let second = sizer.calculate(dec!(0.37), dec!(0.59), dec!(12345.67)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.profit_margin.serialize(), second.profit_margin.serialize());
}

#[test]
fn contracts_grow_with_balance_until_cap_binds() {
    let sizer = sizer();
    let mut previous = 0;
    let mut cap_reached = None;

    for step in 0..=120u32 {
        let balance = Decimal::from(step) * dec!(500);
        let position = sizer.calculate(dec!(0.45), dec!(0.53), balance).unwrap();

        assert!(position.contracts >= previous, "balance {}", balance);
        assert_invariants(&position, dec!(1000), balance * dec!(0.02));

        match cap_reached {
            Some(contracts) => assert_eq!(position.contracts, contracts),
            None if position.constraint_triggered == Constraint::PositionCap => {
                cap_reached = Some(position.contracts)
            }
            None => {}
        }
        previous = position.contracts;
    }

    assert_eq!(cap_reached, Some(1020));
}

#[test]
fn invalid_prices_name_the_side() {
    let sizer = sizer();

    for (yes, no, message) in [
        (dec!(0), dec!(0.53), "Yes price"),
        (dec!(0.45), dec!(0), "No price"),
        (dec!(1), dec!(0.53), "Yes price"),
        (dec!(-0.10), dec!(0.53), "Yes price"),
        (dec!(0.45), dec!(1.20), "No price"),
    ] {
        let err = sizer.calculate(yes, no, dec!(100000)).unwrap_err();
        assert!(err.to_string().contains(message), "{} / {}: {}", yes, no, err);
    }
}

#[test]
fn pre_filter_matches_margin_rules() {
    let sizer = sizer();

    assert!(sizer.has_opportunity(dec!(0.45), dec!(0.53)));
    assert!(!sizer.has_opportunity(dec!(0.50), dec!(0.51)));
    assert!(!sizer.validate_opportunity(dec!(0.495), dec!(0.500), dec!(0.01)));
}

#[test]
fn sizer_is_shareable_across_threads() {
    let sizer = sizer();
    let expected = sizer.calculate(dec!(0.45), dec!(0.53), dec!(10000)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || sizer.calculate(dec!(0.45), dec!(0.53), dec!(10000))))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(expected.clone()));
    }
}
