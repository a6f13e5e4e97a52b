use std::collections::HashSet;
use std::sync::Arc;

use gomarketplace_cart::models::{
    validate_item_id, validate_price, Cart, CartItem, CartOperation, NewCartItem, Validate,
};
use gomarketplace_cart::repositories::{CartRepository, StorageCartRepository};
use gomarketplace_cart::storage::InMemoryStorage;
use proptest::prelude::*;

prop_compose! {
    fn arb_item_id()(id in prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")]) -> String {
        id.to_string()
    }
}

fn arb_valid_price() -> impl Strategy<Value = f64> {
    prop_oneof![0.0f64..1_000_000.0, 0.0f64..1.0e300]
}

prop_compose! {
    fn arb_new_item()(id in arb_item_id(), title in "\\PC{0,300}", price in arb_valid_price()) -> NewCartItem {
        NewCartItem::new(id.clone(), title, format!("https://cdn.example.com/{}.png", id), price)
    }
}

prop_compose! {
    fn arb_stored_item()(
        id in "\\PC{1,300}",
        title in "\\PC{0,300}",
        image_url in "\\PC{0,300}",
        price in arb_valid_price(),
        quantity in 1u32..1000,
    ) -> CartItem {
        CartItem { id, title, image_url, price, quantity }
    }
}

fn arb_operation() -> impl Strategy<Value = CartOperation> {
    prop_oneof![
        arb_new_item().prop_map(CartOperation::Add),
        arb_item_id().prop_map(CartOperation::Increment),
        arb_item_id().prop_map(CartOperation::Decrement),
    ]
}

prop_compose! {
    fn arb_cart_item()(item in arb_new_item(), quantity in 1u32..1000) -> CartItem {
        CartItem {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity,
        }
    }
}

proptest! {
    #[test]
    fn test_operations_keep_cart_invariants(operations in prop::collection::vec(arb_operation(), 0..60)) {
        let mut cart = Cart::new();
        let mut first_added: Vec<String> = Vec::new();

        for operation in &operations {
            if let CartOperation::Add(item) = operation {
                if !first_added.contains(&item.id) {
                    first_added.push(item.id.clone());
                }
            }
            cart.apply(operation);
        }

        let ids: Vec<String> = cart.items().iter().map(|item| item.id.clone()).collect();
        let unique: HashSet<&String> = ids.iter().collect();

        prop_assert_eq!(unique.len(), ids.len());
        prop_assert_eq!(&ids, &first_added);
        prop_assert!(cart.items().iter().all(|item| item.quantity >= 1));
    }

    #[test]
    fn test_quantity_matches_adds_and_steps(operations in prop::collection::vec(arb_operation(), 0..60)) {
        let mut cart = Cart::new();
        let mut expected: Vec<(String, u32)> = Vec::new();

        for operation in &operations {
            match operation {
                CartOperation::Add(item) => match expected.iter_mut().find(|(id, _)| id == &item.id) {
                    Some((_, quantity)) => *quantity += 1,
                    None => expected.push((item.id.clone(), 1)),
                },
                CartOperation::Increment(id) => {
                    if let Some((_, quantity)) = expected.iter_mut().find(|(known, _)| known == id) {
                        *quantity += 1;
                    }
                }
                CartOperation::Decrement(id) => {
                    if let Some((_, quantity)) = expected.iter_mut().find(|(known, _)| known == id) {
                        *quantity = (*quantity - 1).max(1);
                    }
                }
            }
            cart.apply(operation);
        }

        let actual: Vec<(String, u32)> = cart
            .items()
            .iter()
            .map(|item| (item.id.clone(), item.quantity))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_add_keeps_original_item_details(first in arb_new_item(), second in arb_new_item()) {
        let mut cart = Cart::new();
        cart.add(first.clone());
        cart.add(NewCartItem { id: first.id.clone(), ..second });

        let item = cart.get_item(&first.id).unwrap();
        prop_assert_eq!(&item.title, &first.title);
        prop_assert_eq!(item.price, first.price);
        prop_assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_valid_prices_accepted(price in arb_valid_price()) {
        prop_assert!(validate_price(price).is_ok());
    }

    #[test]
    fn test_negative_prices_rejected(price in -1_000_000.0f64..-0.01) {
        prop_assert!(validate_price(price).is_err());
    }

    #[test]
    fn test_any_non_empty_item_id_accepted(id in "\\PC{1,300}") {
        prop_assert!(validate_item_id(&id).is_ok());
    }

    #[test]
    fn test_generated_items_validate(item in arb_cart_item()) {
        prop_assert!(item.validate().is_ok());
    }

    #[test]
    fn test_stored_items_validate(item in arb_stored_item()) {
        prop_assert!(item.validate().is_ok());
    }

    #[test]
    fn test_repository_round_trip(items in prop::collection::vec(arb_stored_item(), 0..10)) {
        let expected = Cart::from_items(items).into_items();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let restored = runtime.block_on(async {
            let repository = StorageCartRepository::new(Arc::new(InMemoryStorage::new()));
            repository.save_products(&expected).await.unwrap();
            repository.load_products().await.unwrap()
        });

        prop_assert_eq!(restored, expected);
    }
}
