use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use storefront_core::{OrderId, ProductId};
use storefront_infra::InMemoryInventoryStore;
use storefront_inventory::{InventoryService, LineItem};

fn bench_reserve_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");

    let store = Arc::new(InMemoryInventoryStore::new());
    let product_id = ProductId::new();
    rt.block_on(store.create(product_id, i64::MAX / 2, 10, None))
        .expect("seed inventory");

    c.bench_function("reserve_order/single_line", |b| {
        b.iter(|| {
            rt.block_on(store.reserve_order(
                OrderId::new(),
                &[LineItem {
                    product_id,
                    quantity: 1,
                }],
            ))
            .expect("reserve")
        })
    });

    let products: Vec<ProductId> = (0..8).map(|_| ProductId::new()).collect();
    for pid in &products {
        rt.block_on(store.create(*pid, i64::MAX / 2, 10, None))
            .expect("seed inventory");
    }
    let lines: Vec<LineItem> = products
        .iter()
        .map(|&product_id| LineItem {
            product_id,
            quantity: 1,
        })
        .collect();

    c.bench_function("reserve_order/eight_lines", |b| {
        b.iter(|| {
            rt.block_on(store.reserve_order(OrderId::new(), &lines))
                .expect("reserve")
        })
    });
}

criterion_group!(benches, bench_reserve_order);
criterion_main!(benches);
