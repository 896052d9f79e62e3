use ean_price_compare::{Pacer, ProductQuery, run_comparison};

use super::*;

#[tokio::test]
async fn test_rows_follow_input_order() {
    let config = test_config();
    let products = vec![
        ProductQuery::new("111", "Produto Um"),
        ProductQuery::new("222", "Produto Dois"),
        ProductQuery::new("333", ""),
    ];
    let mut renderer = ScriptedRenderer::new();

    let table = run_comparison(&mut renderer, &products, &config, Pacer::disabled()).await;

    let eans: Vec<&str> = table.rows().iter().map(|row| row.ean.as_str()).collect();
    assert_eq!(eans, vec!["111", "222", "333"]);
    assert_eq!(
        table.headers(),
        vec!["EAN", "Produto", "Mercado Livre", "Amazon", "Magazine Luiza"]
    );
}

#[tokio::test]
async fn test_every_row_has_every_retailer() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new()
        .with_page("mercadolivre", PageScript::NavigationError("blocked".to_string()))
        .with_page("amazon", PageScript::Timeout);

    let table = run_comparison(&mut renderer, &[dove()], &config, Pacer::disabled()).await;
    let row = &table.rows()[0];

    for retailer in config.retailer_names() {
        assert!(row.get(&retailer).is_some(), "missing column {}", retailer);
    }
    assert_eq!(row.get("Mercado Livre"), Some("error"));
    assert_eq!(row.get("Amazon"), Some("timed out"));
    assert_eq!(row.get("Magazine Luiza"), Some("not found"));
}

#[tokio::test]
async fn test_run_leaves_renderer_open_for_caller() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new();

    run_comparison(&mut renderer, &[dove()], &config, Pacer::disabled()).await;
    assert_eq!(renderer.close_calls, 0);

    renderer.close().await.unwrap();
    assert_eq!(renderer.close_calls, 1);
}
