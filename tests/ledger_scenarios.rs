use chrono::{NaiveDate, NaiveDateTime};
use expense_tracker::models::clock::ManualClock;
use expense_tracker::utils::amount::{NumberFormat, max_amount, parse_amount};
use expense_tracker::{
    Ledger, LedgerError, MonthLocale, MovementId, MovementKind, ValidationError,
    aggregate_by_month, category_split,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

#[test]
fn opening_balance_with_expense_and_income() {
    let mut ledger = Ledger::new();
    ledger.set_opening_balance(dec!(1000)).unwrap();
    ledger
        .add_movement("groceries", dec!(200), MovementKind::Expense)
        .unwrap();
    ledger
        .add_movement("salary", dec!(500), MovementKind::Income)
        .unwrap();

    let totals = ledger.totals();
    assert_eq!(totals.total_expenses, dec!(200));
    assert_eq!(totals.total_income, dec!(500));
    assert_eq!(totals.current_balance, dec!(1300));
}

#[test]
fn editing_amount_keeps_kind() {
    let mut ledger = Ledger::new();
    let id = ledger
        .add_movement("rent", dec!(300), MovementKind::Expense)
        .unwrap();

    ledger.begin_edit(id).unwrap();
    ledger
        .commit_edit(id, "rent", dec!(100), MovementKind::Expense)
        .unwrap();

    assert_eq!(ledger.totals().total_expenses, dec!(100));
    assert!(ledger.editing().is_none());
}

#[test]
fn deleting_income_removes_it_from_totals() {
    let mut ledger = Ledger::new();
    let id = ledger
        .add_movement("gift", dec!(50), MovementKind::Income)
        .unwrap();

    let removed = ledger.delete_movement(id).unwrap();

    assert_eq!(removed.amount, dec!(50));
    assert_eq!(ledger.totals().total_income, Decimal::ZERO);
}

#[test]
fn flipping_expense_to_income_moves_balance_by_twice_the_amount() {
    let mut ledger = Ledger::new();
    ledger.set_opening_balance(dec!(100)).unwrap();
    let id = ledger
        .add_movement("refund", dec!(40), MovementKind::Expense)
        .unwrap();
    let before = ledger.totals();

    ledger
        .commit_edit(id, "refund", dec!(40), MovementKind::Income)
        .unwrap();
    let after = ledger.totals();

    assert_eq!(after.total_expenses, Decimal::ZERO);
    assert_eq!(after.total_income, dec!(40));
    assert_eq!(after.current_balance - before.current_balance, dec!(80));
}

#[test]
fn balance_may_go_negative() {
    let mut ledger = Ledger::new();
    ledger.set_opening_balance(dec!(10)).unwrap();
    ledger
        .add_movement("laptop", dec!(900), MovementKind::Expense)
        .unwrap();

    assert_eq!(ledger.totals().current_balance, dec!(-890));
}

#[test]
fn failed_validation_leaves_state_unchanged() {
    let mut ledger = Ledger::new();
    let id = ledger
        .add_movement("bus", dec!(2), MovementKind::Expense)
        .unwrap();
    ledger.begin_edit(id).unwrap();
    let before = ledger.totals();

    let err = ledger
        .commit_edit(id, "", dec!(5), MovementKind::Expense)
        .unwrap_err();

    assert_eq!(err, LedgerError::Validation(ValidationError::EmptyDescription));
    assert_eq!(ledger.totals(), before);
    assert_eq!(ledger.movement(id).unwrap().description, "bus");
    assert!(ledger.editing().is_some());
}

#[test]
fn edit_of_missing_movement_reports_not_found() {
    let mut ledger = Ledger::new();

    assert_eq!(
        ledger.begin_edit(MovementId(7)),
        Err(LedgerError::NotFound(MovementId(7)))
    );
    assert!(ledger.editing().is_none());
}

#[test]
fn months_are_grouped_in_first_seen_order() {
    let clock = ManualClock::new(at(2024, 3, 5));
    let mut ledger = Ledger::with_clock(clock.clone());
    ledger
        .add_movement("salary", dec!(1000), MovementKind::Income)
        .unwrap();
    clock.set(at(2024, 1, 20));
    ledger
        .add_movement("heating", dec!(120), MovementKind::Expense)
        .unwrap();
    clock.set(at(2024, 3, 28));
    ledger
        .add_movement("groceries", dec!(80), MovementKind::Expense)
        .unwrap();

    let months = aggregate_by_month(ledger.movements(), MonthLocale::English);

    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, "March");
    assert_eq!(months[0].income_total, dec!(1000));
    assert_eq!(months[0].expense_total, dec!(80));
    assert_eq!(months[1].month, "January");
    assert_eq!(months[1].expense_total, dec!(120));

    let split = category_split(ledger.movements());
    assert_eq!(split.income, dec!(1000));
    assert_eq!(split.expense, dec!(200));
}

#[test]
fn empty_ledger_aggregates_to_nothing() {
    let ledger = Ledger::new();

    assert!(aggregate_by_month(ledger.movements(), MonthLocale::Spanish).is_empty());

    let split = category_split(ledger.movements());
    assert_eq!(split.percent(MovementKind::Income), Decimal::ZERO);
    assert_eq!(split.percent(MovementKind::Expense), Decimal::ZERO);
}

#[test]
fn oversized_amounts_are_rejected_instead_of_overflowing() {
    let mut ledger = Ledger::new();
    let typed = parse_amount(
        "79.228.162.514.264.337.593.543.950.335",
        &NumberFormat::default(),
    );
    assert_eq!(typed, Err(ValidationError::AmountTooLarge));

    for _ in 0..2 {
        assert_eq!(
            ledger.add_movement("jackpot", Decimal::MAX, MovementKind::Income),
            Err(LedgerError::Validation(ValidationError::AmountTooLarge))
        );
    }
    assert!(ledger.is_empty());

    ledger.set_opening_balance(max_amount()).unwrap();
    ledger
        .add_movement("jackpot", max_amount(), MovementKind::Income)
        .unwrap();
    ledger
        .add_movement("jackpot", max_amount(), MovementKind::Income)
        .unwrap();
    ledger
        .add_movement("yacht", max_amount(), MovementKind::Expense)
        .unwrap();

    let totals = ledger.totals();
    assert_eq!(totals.total_income, max_amount() * dec!(2));
    assert_eq!(totals.current_balance, max_amount() * dec!(2));
}
