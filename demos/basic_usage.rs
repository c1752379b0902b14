// ============================================================================
// Basic Usage Example
// ============================================================================

use numeric_engine::numeric::{compare_values, Decimal128, RoundingMode};
use numeric_engine::prelude::*;
use std::sync::Arc;

fn main() {
    println!("=== Numeric Engine Example ===\n");

    // Decimal text keeps its trailing zeros
    let price = Decimal128::parse("5.00").unwrap();
    println!("Parsed 5.00 -> {} (BID 0x{:032x})", price, price.to_bid());

    // Exact decimal sums vs binary doubles
    let tenth = Decimal128::parse("0.1").unwrap();
    let mut total = Decimal128::ZERO;
    for _ in 0..3 {
        total = total.add(&tenth);
    }
    println!("0.1 + 0.1 + 0.1 as decimal: {}", total);
    println!("0.1 + 0.1 + 0.1 as double:  {}\n", 0.1f64 + 0.1 + 0.1);

    // Rounding past 34 digits raises INEXACT
    let third = Decimal128::ONE.divide(&Decimal128::parse("3").unwrap());
    let (rounded, signals) = third.quantize_signaling(&Decimal128::parse("0.01").unwrap(), RoundingMode::TiesToEven);
    println!("1/3 = {}", third);
    println!("1/3 quantized to 0.01 = {} ({:?})\n", rounded, signals);

    // Cross-type comparison by value
    let values = [
        NumericValue::Int32(11),
        NumericValue::long(11),
        NumericValue::Double(11.0),
        NumericValue::decimal("11.00").unwrap(),
        NumericValue::Double(0.1),
        NumericValue::decimal("0.1").unwrap(),
    ];
    for pair in values.windows(2) {
        println!("{} vs {}: {:?}", pair[0], pair[1], compare_values(&pair[0], &pair[1]));
    }
    println!();

    // Collection with logged mutation events
    let prices = CollectionBuilder::new("prices")
        .build(Arc::new(LoggingEventHandler))
        .unwrap();

    prices.insert(Document::new().with_field("item", "widget").with_field("price", NumericValue::decimal("10201.01").unwrap()));
    prices.insert(Document::new().with_field("item", "gadget").with_field("price", NumericValue::long(3)));

    let result = prices.update_many(None, &UpdateSpec::mul("price", NumericValue::long(1_000_000_000_000)));
    println!("$mul matched {} modified {}", result.matched, result.modified);

    let result = prices.update_many(None, &UpdateSpec::bit_or("price", 1));
    println!("$bit errors: {:?}", result.first_error().map(|e| e.to_string()));

    println!("\nDocuments:");
    for doc in prices.find(None) {
        println!("  {}", doc);
    }
}
