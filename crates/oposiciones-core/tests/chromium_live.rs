//! End-to-end runs against a local mock site with a real headless Chrome.
//!
//! These need a Chrome/Chromium install and are ignored by default:
//! `cargo test -p oposiciones-core -- --ignored`

use oposiciones_core::{
    CallRange, ExamBoardScraper, PaginationSettings, ScrapeConfig, Section, SectionStatus,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client-side paged table: the » link re-renders the body and disables
/// itself on the last page.
const PAGED_TABLE: &str = r##"<!DOCTYPE html>
<html><head><meta charset="utf-8"></head><body>
<table>
  <thead><tr><th>Nº Orden</th><th>Nº Sorteo</th><th>Nombre</th><th>Apellidos</th><th>Turno</th></tr></thead>
  <tbody id="rows"></tbody>
</table>
<ul class="pagination"><li id="next" class="page-item"><a class="page-link" href="#">»</a></li></ul>
<script>
  const pages = [
    [["1", "501", "María", "García", "Libre"], ["x", "502", "Juan", "López", "Turno B"]],
    [["2", "503", "Ana", "Ruiz", "Libre"]],
  ];
  let current = 0;
  function render() {
    document.getElementById('rows').innerHTML = pages[current]
      .map(r => '<tr>' + r.map(c => '<td>' + c + '</td>').join('') + '</tr>').join('');
    if (current === pages.length - 1) document.getElementById('next').classList.add('disabled');
  }
  document.querySelector('#next a').addEventListener('click', e => {
    e.preventDefault();
    if (current < pages.length - 1) { current += 1; setTimeout(render, 100); }
  });
  render();
</script>
</body></html>"##;

const CARDS: &str = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"></head><body>
<div id="banner"><button onclick="this.parentNode.remove()">Aceptar</button></div>
<div class="convocatoria-card"><p class="fecha-convocatoria">lunes, 5 de mayo de 2025</p>
  <span class="rango-sorteo-init">1</span><span class="rango-sorteo-fin">50</span></div>
<div class="convocatoria-card"><p class="fecha-convocatoria">5 de mayo de 2025</p>
  <span class="rango-sorteo-init">51</span><span class="rango-sorteo-fin">60</span></div>
</body></html>"#;

async fn mock_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inscritos"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGED_TABLE, "text/html; charset=utf-8"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/convocatorias"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CARDS, "text/html; charset=utf-8"))
        .mount(&server)
        .await;
    server
}

fn config(server: &MockServer) -> ScrapeConfig {
    ScrapeConfig {
        registration_sections: vec![Section::new("local", format!("{}/inscritos", server.uri()))],
        announcement_sections: vec![Section::new("local", format!("{}/convocatorias", server.uri()))],
        pagination: PaginationSettings {
            ready_timeout_ms: 3_000,
            cookie_banner_timeout_ms: 500,
            ..PaginationSettings::default()
        },
        ..ScrapeConfig::default()
    }
}

#[tokio::test]
#[ignore] // Requires Chromium to be installed
async fn test_registration_pages_through_client_side_pager() {
    let server = mock_site().await;
    let scraper = ExamBoardScraper::new(config(&server)).expect("valid config");

    let harvests = scraper.scrape_registrations().await;

    assert_eq!(harvests.len(), 1);
    let harvest = &harvests[0];
    assert_eq!(harvest.status, SectionStatus::Extracted);
    assert_eq!(harvest.pages, 2);
    let names: Vec<&str> = harvest.records.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, vec!["García, María", "Ruiz, Ana"]);
}

#[tokio::test]
#[ignore] // Requires Chromium to be installed
async fn test_announcements_with_cookie_banner() {
    let server = mock_site().await;
    let scraper = ExamBoardScraper::new(config(&server)).expect("valid config");

    let harvests = scraper.scrape_announcements().await;

    let harvest = &harvests[0];
    assert_eq!(harvest.status, SectionStatus::Extracted);
    assert_eq!(harvest.records.len(), 1);
    assert_eq!(
        harvest.records[0].ranges,
        vec![CallRange { start: 1, end: 50 }, CallRange { start: 51, end: 60 }]
    );
}
