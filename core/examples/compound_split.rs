// sluice/examples/compound_split.rs

use sluice::{Chain, CompoundOperator, Operator, Publisher, Source, StageError, Streams};
use tracing::info;

#[derive(Clone, Debug)]
struct Order {
  id: u32,
  amount_cents: u64,
}

fn main() -> Result<(), StageError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Compound Operator Example ---");

  let orders = Source::from_items(
    "orders",
    vec![
      Order { id: 1, amount_cents: 1_200 },
      Order { id: 2, amount_cents: 90_000 },
      Order { id: 3, amount_cents: 4_500 },
    ],
  );
  let limits = Source::from_items("limits", vec![50_000_u64]);

  // Main lane: accepted orders. Secondary lane: a note for each rejected one.
  let review = CompoundOperator::<Order, u64, Order, String>::from_fn("review", |orders: &[Order], limits: &[u64]| {
    let limit = limits.first().copied().unwrap_or(u64::MAX);
    let mut out = Streams::new(Vec::new(), Vec::new());
    for order in orders {
      if order.amount_cents <= limit {
        out.main.push(order.clone());
      } else {
        out.secondary.push(format!("order {} over limit ({} > {})", order.id, order.amount_cents, limit));
      }
    }
    Ok(out)
  });

  orders.operate(review.main_input());
  limits.operate(review.secondary_input());

  let rejected_log = Operator::<String, String>::from_fn("rejected_log", |notes: &[String]| {
    for note in notes {
      info!("rejected: {}", note);
    }
    Ok(notes.to_vec())
  });
  review.secondary_output().operate(rejected_log.clone());

  let totals = Chain::new(review.main_output())
    .retain(review.clone())
    .retain(orders)
    .retain(limits)
    .operate(Operator::<Order, u64>::from_fn("total", |orders: &[Order]| {
      Ok(vec![orders.iter().map(|o| o.amount_cents).sum()])
    }));

  totals.run()?;

  info!("Accepted total (cents): {:?}", totals.outputs());
  info!("Rejections recorded: {}", review.secondary_outputs().len());
  assert_eq!(totals.outputs(), vec![5_700]);
  assert_eq!(rejected_log.outputs().len(), 1);
  Ok(())
}
