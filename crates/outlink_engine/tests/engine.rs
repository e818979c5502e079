use std::collections::HashMap;
use std::time::Duration;

use outlink_engine::{
    EngineEvent, EngineHandle, ExtractOutcome, ExtractorSettings, FetchSettings, NoResultReason,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(10);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_runs_jobs_independently() {
    crawl_logging::initialize_for_tests();
    let server = MockServer::start().await;
    for (route, body) in [
        ("/a", r#"<a href="/from-a">a</a>"#),
        ("/b", r#"<a href="/from-b">b</a><a href="/b.pdf">pdf</a>"#),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .mount(&server)
            .await;
    }

    let base = server.uri();
    let outcomes = tokio::task::spawn_blocking(move || {
        let engine =
            EngineHandle::new(FetchSettings::default(), ExtractorSettings::default()).unwrap();
        engine.enqueue(1, format!("{base}/a"));
        engine.enqueue(2, format!("{base}/b"));
        engine.enqueue(3, "mailto:someone@example.com");

        let mut outcomes = HashMap::new();
        while outcomes.len() < 3 {
            match engine.recv_timeout(WAIT) {
                Some(EngineEvent::JobCompleted {
                    job_id, outcome, ..
                }) => {
                    outcomes.insert(job_id, outcome);
                }
                None => break,
            }
        }
        outcomes
    })
    .await
    .unwrap();

    let uri = server.uri();
    let links = |id: u64| {
        outcomes
            .get(&id)
            .cloned()
            .and_then(ExtractOutcome::into_result)
            .map(|result| result.into_outlinks())
            .unwrap_or_default()
    };
    assert_eq!(outcomes.len(), 3);
    assert_eq!(links(1).into_iter().collect::<Vec<_>>(), vec![format!("{uri}/from-a")]);
    assert_eq!(links(2).into_iter().collect::<Vec<_>>(), vec![format!("{uri}/from-b")]);
    assert_eq!(
        outcomes.get(&3),
        Some(&ExtractOutcome::NoResult(NoResultReason::InputRejected))
    );
}

#[test]
fn try_recv_is_empty_without_jobs() {
    let engine = EngineHandle::new(FetchSettings::default(), ExtractorSettings::default()).unwrap();
    assert!(engine.try_recv().is_none());
}
