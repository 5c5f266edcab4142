mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{
    no_delay, pipeline, results, FakeFetcher, FakeGenerator, FakeSearch, RecordingSink,
};
use pretty_assertions::assert_eq;
use research_engine::{
    FailureKind, GenerateError, PipelineError, PipelineSettings, ResearchOutcome, SearchError,
    SourceLink,
};

fn links(results: &[research_engine::SearchResult]) -> Vec<SourceLink> {
    results
        .iter()
        .map(|r| SourceLink {
            title: r.title.clone(),
            url: r.url.clone(),
        })
        .collect()
}

#[tokio::test]
async fn zero_results_report_no_results_and_do_nothing_else() {
    let search = FakeSearch::returning(Vec::new());
    let fetcher = Arc::new(FakeFetcher::default());
    let generator = FakeGenerator::replying("unused");
    let pipeline = pipeline(search.clone(), fetcher.clone(), generator.clone(), no_delay());

    let outcome = pipeline
        .summarize("X", "key", &RecordingSink::default())
        .await
        .unwrap();

    assert_eq!(outcome, ResearchOutcome::NoResults);
    assert_eq!(*search.calls.lock().unwrap(), vec![("X".to_string(), 4)]);
    assert!(fetcher.fetched().is_empty());
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn search_failure_is_treated_as_no_results() {
    let search = FakeSearch::failing(SearchError::HttpStatus(429));
    let generator = FakeGenerator::replying("unused");
    let pipeline = pipeline(search, Arc::new(FakeFetcher::default()), generator.clone(), no_delay());

    let outcome = pipeline
        .summarize("X", "key", &RecordingSink::default())
        .await
        .unwrap();

    assert_eq!(outcome, ResearchOutcome::NoResults);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn all_sources_fetched_produce_summary_with_ordered_sources() {
    let found = results(4);
    let fetcher = Arc::new(FakeFetcher::serving_all(&found));
    let generator = FakeGenerator::replying("- key point");
    let sink = RecordingSink::default();
    let pipeline = pipeline(
        FakeSearch::returning(found.clone()),
        fetcher.clone(),
        generator.clone(),
        no_delay(),
    );

    let outcome = pipeline.summarize("X", "key", &sink).await.unwrap();

    let ResearchOutcome::Summarized(summary) = outcome else {
        panic!("expected a summary");
    };
    assert_eq!(summary.summary, "- key point");
    assert!(!summary.degraded);
    assert_eq!(summary.sources, links(&found));

    let expected_urls: Vec<String> = found.iter().map(|r| r.url.clone()).collect();
    assert_eq!(fetcher.fetched(), expected_urls);

    let progress = sink.take();
    let indices: Vec<usize> = progress.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert!(progress.iter().all(|p| p.total == 4));
    assert_eq!(progress[2].title, "Result 3");

    assert_eq!(generator.call_count(), 1);
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("# Search query:\nX\n"));
    assert!(prompt.contains("--- Source 1 (Result 1) ---\n"));
    assert!(prompt.contains("--- Source 4 (Result 4) ---\n"));
}

#[tokio::test]
async fn failed_sources_are_skipped_but_still_listed() {
    let found = results(3);
    let fetcher = Arc::new(
        FakeFetcher::serving_all(&found)
            .with_failure(&found[1].url, FailureKind::Timeout),
    );
    let generator = FakeGenerator::replying("summary");
    let pipeline = pipeline(
        FakeSearch::returning(found.clone()),
        fetcher.clone(),
        generator.clone(),
        no_delay(),
    );

    let outcome = pipeline
        .summarize("X", "key", &RecordingSink::default())
        .await
        .unwrap();

    let ResearchOutcome::Summarized(summary) = outcome else {
        panic!("expected a summary");
    };
    assert_eq!(summary.sources, links(&found));
    assert_eq!(fetcher.fetched().len(), 3);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("--- Source 1 (Result 1) ---"));
    assert!(!prompt.contains("Source 2"));
    assert!(prompt.contains("--- Source 3 (Result 3) ---"));
}

#[tokio::test]
async fn all_failures_skip_generation() {
    let found = results(4);
    let fetcher = Arc::new(FakeFetcher::default());
    let generator = FakeGenerator::replying("unused");
    let sink = RecordingSink::default();
    let pipeline = pipeline(
        FakeSearch::returning(found.clone()),
        fetcher.clone(),
        generator.clone(),
        no_delay(),
    );

    let outcome = pipeline.summarize("X", "key", &sink).await.unwrap();

    assert_eq!(
        outcome,
        ResearchOutcome::NothingFetched {
            sources: links(&found)
        }
    );
    assert_eq!(fetcher.fetched().len(), 4);
    assert_eq!(sink.take().len(), 4);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn empty_pages_still_reach_generation() {
    let found = results(2);
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_page(&found[0].url, "<body></body>")
            .with_page(&found[1].url, "<body>   </body>"),
    );
    let generator = FakeGenerator::replying("summary");
    let pipeline = pipeline(
        FakeSearch::returning(found.clone()),
        fetcher,
        generator.clone(),
        no_delay(),
    );

    let outcome = pipeline
        .summarize("X", "key", &RecordingSink::default())
        .await
        .unwrap();

    let ResearchOutcome::Summarized(summary) = outcome else {
        panic!("fetched pages must not count as failures");
    };
    assert_eq!(summary.sources, links(&found));
    assert_eq!(generator.call_count(), 1);
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("--- Source 1 (Result 1) ---\n\n"));
    assert!(prompt.contains("--- Source 2 (Result 2) ---\n\n"));
}

#[tokio::test]
async fn generation_failure_becomes_visible_summary_text() {
    let found = results(2);
    let generator = FakeGenerator::failing(GenerateError::Http {
        status: 500,
        message: "internal".to_string(),
    });
    let pipeline = pipeline(
        FakeSearch::returning(found.clone()),
        Arc::new(FakeFetcher::serving_all(&found)),
        generator,
        no_delay(),
    );

    let outcome = pipeline
        .summarize("X", "key", &RecordingSink::default())
        .await
        .unwrap();

    let ResearchOutcome::Summarized(summary) = outcome else {
        panic!("expected a degraded summary");
    };
    assert!(summary.degraded);
    assert!(summary.summary.contains("http status 500"));
    assert_eq!(summary.sources.len(), 2);
}

#[tokio::test]
async fn rejected_credential_is_a_distinct_error() {
    let found = results(1);
    let rejection = GenerateError::CredentialRejected("403 Forbidden".to_string());
    let pipeline = pipeline(
        FakeSearch::returning(found.clone()),
        Arc::new(FakeFetcher::serving_all(&found)),
        FakeGenerator::failing(rejection.clone()),
        no_delay(),
    );

    let err = pipeline
        .summarize("X", "key", &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(err, PipelineError::Credential(rejection));
}

#[tokio::test]
async fn missing_key_fails_before_discovery() {
    let search = FakeSearch::returning(results(4));
    let pipeline = pipeline(
        search.clone(),
        Arc::new(FakeFetcher::default()),
        FakeGenerator::replying("unused"),
        no_delay(),
    );

    let err = pipeline
        .summarize("X", " ", &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(err, PipelineError::MissingCredential);
    assert!(search.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn requests_are_spaced_by_the_configured_delay() {
    let found = results(3);
    let settings = PipelineSettings {
        request_delay: Duration::from_millis(40),
        ..PipelineSettings::default()
    };
    let pipeline = pipeline(
        FakeSearch::returning(found.clone()),
        Arc::new(FakeFetcher::serving_all(&found)),
        FakeGenerator::replying("summary"),
        settings,
    );

    let started = Instant::now();
    pipeline
        .summarize("X", "key", &RecordingSink::default())
        .await
        .unwrap();
    // Two gaps between three requests.
    assert!(started.elapsed() >= Duration::from_millis(80));
}

#[tokio::test]
async fn result_limit_is_configurable() {
    let search = FakeSearch::returning(results(2));
    let settings = PipelineSettings {
        max_results: 2,
        ..no_delay()
    };
    let pipeline = pipeline(
        search.clone(),
        Arc::new(FakeFetcher::default()),
        FakeGenerator::replying("unused"),
        settings,
    );

    let _ = pipeline.summarize("Y", "key", &RecordingSink::default()).await;
    assert_eq!(*search.calls.lock().unwrap(), vec![("Y".to_string(), 2)]);
}
