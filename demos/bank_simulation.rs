// ============================================================================
// Bank Simulation Example
// Currency round trips on a double balance and on a decimal balance
// ============================================================================

use numeric_engine::prelude::*;
use numeric_engine::utils::SeededRandom;
use std::sync::Arc;

const ITERATIONS: usize = 500;
const SEED: u64 = 6;

/// Converts the balance to dong, applies a random transaction, converts back.
fn simulate(bank: &Collection, to_dong: NumericValue, from_dong: NumericValue) -> NumericValue {
    let mut rng = SeededRandom::new(SEED);

    for _ in 0..ITERATIONS {
        let mut amount = rng.next_f64() * 10_000_000.0;
        if rng.next_f64() <= 0.5 {
            amount = -amount;
        }

        bank.update_many(None, &UpdateSpec::mul("balance", to_dong));
        bank.update_many(None, &UpdateSpec::inc("balance", amount));
        bank.update_many(None, &UpdateSpec::mul("balance", from_dong));
    }

    bank.find(None)
        .first()
        .and_then(|doc| doc.get_number("balance").copied())
        .unwrap_or(NumericValue::Int32(0))
}

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt::init();

    println!("=== Bank Simulation ({} iterations) ===\n", ITERATIONS);

    let double_bank = CollectionBuilder::new("doubleBank")
        .build(Arc::new(NoOpEventHandler))
        .unwrap();
    double_bank.insert(Document::new().with_field("balance", 20_000_000_000.0));
    let double_balance = simulate(
        &double_bank,
        NumericValue::Double(21819.00),
        NumericValue::Double(0.0000461),
    );

    let decimal_bank = CollectionBuilder::decimal_first("decimalBank")
        .build(Arc::new(NoOpEventHandler))
        .unwrap();
    decimal_bank.insert(Document::new().with_field("balance", NumericValue::decimal("20000000000").unwrap()));
    let decimal_balance = simulate(
        &decimal_bank,
        NumericValue::decimal("21819.00").unwrap(),
        NumericValue::decimal("0.0000461").unwrap(),
    );

    println!("Double balance:  {}", double_balance);
    println!("Decimal balance: {}", decimal_balance);
    println!(
        "Representations agree: {}",
        values_equal(&double_balance, &decimal_balance)
    );
}
