use ean_price_compare::models::{Extraction, ExtractionFailure, RetailerOutcome, RetailerResult};
use ean_price_compare::{Pacer, PriceComparator, ProductQuery};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::*;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn compare_all(
    renderer: &mut ScriptedRenderer,
    config: &AppConfig,
    query: &ProductQuery,
) -> Vec<RetailerResult> {
    let mut comparator =
        PriceComparator::new(renderer, &config.retailers, &config.extraction, Pacer::disabled());
    let results = comparator.compare(query).await;
    results
}

#[tokio::test]
async fn test_one_result_per_retailer_in_order() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new();

    let results = compare_all(&mut renderer, &config, &dove()).await;

    let names: Vec<&str> = results.iter().map(|r| r.retailer.as_str()).collect();
    assert_eq!(names, vec!["Mercado Livre", "Amazon", "Magazine Luiza"]);
    assert_eq!(
        renderer.visited,
        vec![
            "https://www.mercadolivre.com.br/search?query=Dove+Shampoo+400ml",
            "https://www.amazon.com.br/s?k=7503002941409",
            "https://www.magazineluiza.com.br/busca/7503002941409",
        ]
    );
}

#[tokio::test]
async fn test_failing_retailer_does_not_stop_the_next() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new()
        .with_page("amazon", PageScript::NavigationError("connection reset".to_string()))
        .with_page("magazineluiza", PageScript::Html(magalu_page(&["R$ 32,90", "R$ 30,00"])));

    let results = compare_all(&mut renderer, &config, &dove()).await;

    assert_eq!(results.len(), 3);
    assert!(matches!(
        &results[1].outcome,
        RetailerOutcome::Extracted(Extraction::Failure(ExtractionFailure::Error { message }))
            if message.contains("connection reset")
    ));
    assert_eq!(
        results[2].outcome,
        RetailerOutcome::Extracted(Extraction::Prices(vec![dec("30.00"), dec("32.90")]))
    );
}

#[tokio::test]
async fn test_empty_search_term_skips_request() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new();
    let query = ProductQuery::new(EAN, "");

    let results = compare_all(&mut renderer, &config, &query).await;

    assert_eq!(results[0].outcome, RetailerOutcome::EmptySearchTerm);
    assert_eq!(renderer.visited.len(), 2);
    assert!(renderer.visited.iter().all(|url| !url.contains("mercadolivre")));
}

#[tokio::test]
async fn test_timeout_skips_item_extraction() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new().with_page("mercadolivre", PageScript::Timeout);

    let results = compare_all(&mut renderer, &config, &dove()).await;

    assert_eq!(
        results[0].outcome,
        RetailerOutcome::Extracted(Extraction::Failure(ExtractionFailure::Timeout))
    );
}

#[tokio::test]
async fn test_identifier_must_appear_in_listing() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new().with_page(
        "mercadolivre",
        PageScript::Html(mercado_livre_page(&[
            ("Shampoo genérico 400ml", "9", Some("99")),
            ("Dove Shampoo 400ml 7503002941409", "24", None),
            ("Condicionador Dove", "19", Some("90")),
        ])),
    );

    let results = compare_all(&mut renderer, &config, &dove()).await;

    assert_eq!(
        results[0].outcome,
        RetailerOutcome::Extracted(Extraction::Prices(vec![dec("24.00")]))
    );
}

#[tokio::test]
async fn test_browser_failure_while_waiting_is_not_a_timeout() {
    let config = test_config();
    let mut renderer = ScriptedRenderer::new()
        .with_page("amazon", PageScript::WaitError("tab crashed".to_string()))
        .with_page("magazineluiza", PageScript::Timeout);

    let results = compare_all(&mut renderer, &config, &dove()).await;

    assert!(matches!(
        &results[1].outcome,
        RetailerOutcome::Extracted(Extraction::Failure(ExtractionFailure::Error { message }))
            if message.contains("tab crashed")
    ));
    assert_eq!(
        results[2].outcome,
        RetailerOutcome::Extracted(Extraction::Failure(ExtractionFailure::Timeout))
    );
}
