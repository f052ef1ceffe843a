use httpmock::prelude::*;
use page_sections::core::Storage;
use page_sections::utils::validation::Validate;
use page_sections::{HtmlDocument, LocalStorage, PageConfig, RenderResult, TracingReporter};
use std::sync::Arc;
use tempfile::TempDir;

const INDEX: &str = r#"<!doctype html>
<html>
<body>
  <div id="events-container" class="grid"></div>
  <div id="services-container" class="grid"><p>Loading…</p></div>
  <div id="pricing-container" class="grid"></div>
  <div id="team-container" class="grid"></div>
</body>
</html>"#;

fn write(dir: &TempDir, path: &str, content: &str) {
    let full = dir.path().join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, content).unwrap();
}

fn config_toml(base: &str) -> String {
    format!(
        r#"
[page]
name = "home"
input = "index.html"
output = "dist/index.html"

[source]
base = "{base}"
timeout_seconds = 5

[[sections]]
mount = "events-container"
source = "data/events.json"
template = "event"

[[sections]]
mount = "services-container"
source = "data/services.json"
template = "service"

[[sections]]
mount = "pricing-container"
source = "data/pricing.json"
template = "pricing"

[[sections]]
mount = "team-container"
source = "data/team.json"
template = "team"
subject = "team members"

[[sections]]
mount = "testimonials-container"
source = "data/testimonials.json"
template = "testimonial"
"#
    )
}

#[tokio::test]
async fn test_page_from_local_files() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, "index.html", INDEX);
    write(
        &temp_dir,
        "site/data/events.json",
        r#"[{"title": "Summer Fair", "date": "2025-06-01", "img": "a.png", "link": "/a"}]"#,
    );
    write(
        &temp_dir,
        "site/data/services.json",
        r#"[{"title": "Coaching", "img": "c.png", "description": "1:1 sessions"},
            {"title": "Camps", "img": "k.png"}]"#,
    );
    write(&temp_dir, "site/data/pricing.json", r#"{"plans": []}"#);
    write(&temp_dir, "site/data/team.json", "[]");

    let base = temp_dir.path().join("site");
    let config = PageConfig::from_toml_str(&config_toml(base.to_str().unwrap())).unwrap();
    assert!(config.validate().is_ok());

    let storage = LocalStorage::new(temp_dir.path());
    let html = String::from_utf8(storage.read_file(&config.page.input).await.unwrap()).unwrap();
    let document = Arc::new(HtmlDocument::new(html));

    let initializer = config
        .initializer(document.clone(), Arc::new(TracingReporter))
        .unwrap();
    let outcomes = initializer.initialize().await;

    let results: Vec<&RenderResult> = outcomes.iter().map(|o| &o.result).collect();
    assert_eq!(results[0], &RenderResult::Rendered(1));
    assert_eq!(results[1], &RenderResult::Rendered(2));
    assert!(results[2].is_failed());
    assert_eq!(results[3], &RenderResult::Rendered(0));
    assert_eq!(results[4], &RenderResult::Skipped);

    storage
        .write_file(&config.page.output, document.html().as_bytes())
        .await
        .unwrap();

    let written = std::fs::read_to_string(temp_dir.path().join("dist/index.html")).unwrap();
    assert!(written.contains("<h3>Summer Fair</h3>"));
    assert!(written.contains("<h3>Coaching</h3>"));
    assert!(written.contains("<h3>Camps</h3>"));
    assert!(!written.contains("Loading…"));
    assert!(written.contains(
        r#"<div id="pricing-container" class="grid">Could not load pricing.</div>"#
    ));
    assert!(written.contains(
        r#"<div id="team-container" class="grid">No team members yet.</div>"#
    ));
    assert!(!written.contains("testimonials"));
}

#[tokio::test]
async fn test_page_from_http_source() {
    let server = MockServer::start();
    let events_mock = server.mock(|when, then| {
        when.method(GET).path("/assets/data/events.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"title": "Open Day", "date": "2025-09-14", "img": "o.png", "link": "/open"}
            ]));
    });
    let services_mock = server.mock(|when, then| {
        when.method(GET).path("/assets/data/services.json");
        then.status(503);
    });

    let toml = config_toml(&server.url("/assets/"))
        .replace("data/pricing.json", "data/pricing-missing.json");
    let config = PageConfig::from_toml_str(&toml).unwrap();

    let document = Arc::new(HtmlDocument::new(INDEX));
    let initializer = config
        .initializer(document.clone(), Arc::new(TracingReporter))
        .unwrap();
    let outcomes = initializer.initialize().await;

    events_mock.assert();
    services_mock.assert();
    assert_eq!(outcomes[0].result, RenderResult::Rendered(1));
    assert!(outcomes[1].result.is_failed());

    let html = document.html();
    assert!(html.contains("href=\"/open\""));
    assert!(html.contains("Could not load services."));
}
