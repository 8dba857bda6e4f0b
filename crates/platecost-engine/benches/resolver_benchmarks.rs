//! Benchmarks for recursive cost resolution
//!
//! Measures resolution passes over wide catalogs where many dishes share
//! the same sub-recipes, which is where the per-pass memo caches pay off.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use platecost_catalog::{InventoryCatalog, RecipeCatalog, RecipeGraph};
use platecost_core::{Config, InventoryItem, Recipe, RecipeIngredient};
use platecost_engine::{resolve_costs, validate, CostResolver};

/// Generate a catalog with `num_dishes` dishes drawing from a layered pool of
/// sub-recipes (each sub-recipe uses the two before it)
fn generate_catalog(num_dishes: usize, num_subs: usize) -> (RecipeCatalog, InventoryCatalog) {
    let inventory: Vec<InventoryItem> = (0..50)
        .map(|i| {
            let unit = match i % 3 {
                0 => "kg",
                1 => "L",
                _ => "unit",
            };
            InventoryItem::new(format!("inv-{}", i), unit, 10.0 + i as f64)
                .with_allergens(if i % 7 == 0 { vec!["Gluten"] } else { vec![] })
        })
        .collect();

    let line_for = |i: usize| {
        let item = i % 50;
        let unit = match item % 3 {
            0 => "g",
            1 => "ml",
            _ => "unit",
        };
        RecipeIngredient::inventory(format!("inv-{}", item), 100.0, unit).with_yield(90.0)
    };

    let mut recipes = Vec::with_capacity(num_dishes + num_subs);

    for i in 0..num_subs {
        let mut sub = Recipe::new(format!("sub-{}", i))
            .as_sub_recipe()
            .with_wastage(2.0)
            .with_production_yield(4.0, "portion")
            .with_ingredient(line_for(i))
            .with_ingredient(line_for(i + 1));

        for j in i.saturating_sub(2)..i {
            sub = sub.with_ingredient(RecipeIngredient::sub_recipe(format!("sub-{}", j), 1.0, "portion"));
        }

        recipes.push(sub);
    }

    for i in 0..num_dishes {
        let dish = Recipe::new(format!("dish-{}", i))
            .with_wastage(5.0)
            .with_production_yield(10.0, "portion")
            .with_ingredient(line_for(i))
            .with_ingredient(RecipeIngredient::sub_recipe(format!("sub-{}", i % num_subs), 2.0, "portion"))
            .with_ingredient(RecipeIngredient::sub_recipe(format!("sub-{}", (i * 7) % num_subs), 1.0, "portion"));

        recipes.push(dish);
    }

    (RecipeCatalog::new(recipes), InventoryCatalog::new(inventory))
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pass");

    for num_dishes in [100, 1_000, 5_000] {
        let (recipes, inventory) = generate_catalog(num_dishes, 50);

        group.bench_with_input(BenchmarkId::from_parameter(num_dishes), &num_dishes, |b, _| {
            b.iter(|| resolve_costs(black_box(&recipes), black_box(&inventory)))
        });
    }

    group.finish();
}

fn bench_single_dish(c: &mut Criterion) {
    let (recipes, inventory) = generate_catalog(1_000, 200);
    let mut group = c.benchmark_group("single_dish");

    group.bench_function("cold_cache", |b| {
        b.iter(|| {
            let mut resolver = CostResolver::new(&recipes, &inventory);
            resolver.resolve_cost(black_box("dish-999"))
        })
    });

    group.bench_function("warm_cache", |b| {
        let mut resolver = CostResolver::new(&recipes, &inventory);
        let _ = resolver.resolve_cost("dish-999");
        b.iter(|| resolver.resolve_cost(black_box("dish-999")))
    });

    group.finish();
}

fn bench_impact_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("impact_analysis");

    for num_subs in [50, 200] {
        let (recipes, _) = generate_catalog(1_000, num_subs);
        let graph = RecipeGraph::from_catalog(&recipes);

        group.bench_with_input(BenchmarkId::from_parameter(num_subs), &num_subs, |b, _| {
            b.iter(|| graph.downstream(black_box("sub-0")))
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let (recipes, inventory) = generate_catalog(1_000, 50);
    let config = Config::default();

    c.bench_function("validate_1000_dishes", |b| {
        b.iter(|| validate(black_box(&recipes), black_box(&inventory), &config))
    });
}

criterion_group!(
    benches,
    bench_full_pass,
    bench_single_dish,
    bench_impact_analysis,
    bench_validation
);
criterion_main!(benches);
