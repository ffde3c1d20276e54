//! Connected-Account Resolver
//!
//! Finds the connected account responsible for revenue sharing on a
//! subscription by scanning its line items' product metadata.

use revshare_stripe::Subscription;

/// Metadata key stamped on products by the catalog manager
pub const CONNECTED_ACCOUNT_KEY: &str = "connected_account_id";

/// Return the first non-empty `connected_account_id` found on the
/// subscription's line items, scanning in stored order.
///
/// `None` is a normal outcome for subscriptions that do not participate in
/// revenue sharing; callers skip transfer creation but should log the
/// occurrence for catalog-metadata visibility.
pub fn resolve_connected_account(subscription: &Subscription) -> Option<String> {
    for item in &subscription.items.data {
        let Some(product) = item.price.product.as_ref().and_then(|p| p.as_object()) else {
            tracing::debug!(
                subscription_id = %subscription.id,
                item_id = %item.id,
                "Line item price has no expanded product"
            );
            continue;
        };

        match product.metadata.get(CONNECTED_ACCOUNT_KEY) {
            Some(account_id) if !account_id.is_empty() => {
                tracing::debug!(
                    subscription_id = %subscription.id,
                    product_id = %product.id,
                    account_id = %account_id,
                    "Resolved connected account"
                );
                return Some(account_id.clone());
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(products: &[(&str, Option<&str>)]) -> Subscription {
        let items: Vec<serde_json::Value> = products
            .iter()
            .enumerate()
            .map(|(index, (product_id, account))| {
                let mut metadata = serde_json::Map::new();
                if let Some(account_id) = account {
                    metadata.insert(
                        CONNECTED_ACCOUNT_KEY.into(),
                        serde_json::Value::String((*account_id).into()),
                    );
                }
                serde_json::json!({
                    "id": format!("si_{index}"),
                    "price": {
                        "id": format!("price_{index}"),
                        "currency": "usd",
                        "active": true,
                        "product": {
                            "id": product_id,
                            "name": "offering",
                            "active": true,
                            "metadata": metadata
                        }
                    }
                })
            })
            .collect();

        serde_json::from_value(serde_json::json!({
            "id": "sub_1",
            "status": "active",
            "items": { "data": items, "has_more": false }
        }))
        .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let sub = subscription(&[
            ("prod_a", None),
            ("prod_b", Some("acct_X")),
            ("prod_c", Some("acct_Y")),
        ]);

        assert_eq!(resolve_connected_account(&sub), Some("acct_X".into()));
    }

    #[test]
    fn test_no_line_item_carries_account() {
        let sub = subscription(&[("prod_a", None), ("prod_b", None)]);
        assert_eq!(resolve_connected_account(&sub), None);
    }

    #[test]
    fn test_empty_value_is_skipped() {
        let sub = subscription(&[("prod_a", Some("")), ("prod_b", Some("acct_X"))]);
        assert_eq!(resolve_connected_account(&sub), Some("acct_X".into()));
    }

    #[test]
    fn test_empty_subscription_resolves_to_none() {
        let sub = subscription(&[]);
        assert_eq!(resolve_connected_account(&sub), None);
    }
}
