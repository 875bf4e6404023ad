//! Live search filtering against an in-memory page.

mod common;

use common::{TestController, sample};
use galaxy_gallery::Error;
use galaxy_gallery::page::{PageEvent, SearchOutcome};

fn type_query(c: &mut TestController, text: &str) {
    let search = c.dom().find("search");
    c.dom_mut().nodes[search].value = text.to_string();
}

fn search(c: &mut TestController, text: &str) -> SearchOutcome {
    type_query(c, text);
    c.run_search().unwrap()
}

fn is_hit(c: &TestController, key: &str) -> bool {
    let dom = c.dom();
    dom.classes(dom.find(&format!("game-{key}"))).contains(&"hit")
}

fn results_mode(c: &TestController) -> bool {
    let dom = c.dom();
    dom.classes(dom.find("games")).contains(&"search-results")
}

#[test]
fn test_query_marks_matching_cards() {
    let (mut c, _) = sample();
    assert_eq!(
        search(&mut c, "witcher"),
        SearchOutcome::Filtered { added: 1, removed: 0, total: 1 }
    );
    assert!(is_hit(&c, "1001"));
    assert!(!is_hit(&c, "1002"));
    assert!(results_mode(&c));
    assert_eq!(c.search_results(), vec!["1001"]);
    assert_eq!(c.last_query(), Some("witcher"));
}

#[test]
fn test_redundant_query_is_skipped() {
    let (mut c, _) = sample();
    search(&mut c, "doom");
    assert_eq!(search(&mut c, "  DOOM  "), SearchOutcome::Unchanged);
    assert_eq!(c.search_results(), vec!["1002"]);
}

#[test]
fn test_tokens_match_in_order() {
    let (mut c, _) = sample();
    search(&mut c, "fantasy final");
    assert!(c.search_results().is_empty());
    assert!(results_mode(&c));

    search(&mut c, "final 7");
    assert_eq!(c.search_results(), vec!["1003"]);
}

#[test]
fn test_alternate_strings_are_searched() {
    let (mut c, _) = sample();
    search(&mut c, "witcher the");
    assert_eq!(c.search_results(), vec!["1001"]);
}

#[test]
fn test_narrowing_only_touches_changed_cards() {
    let (mut c, _) = sample();
    assert_eq!(
        search(&mut c, "i"),
        SearchOutcome::Filtered { added: 2, removed: 0, total: 2 }
    );
    let witcher = c.dom().find("game-1001");
    c.dom_mut().nodes[witcher].styles.insert("order".into(), "1".into());

    assert_eq!(
        search(&mut c, "in"),
        SearchOutcome::Filtered { added: 0, removed: 1, total: 1 }
    );
    assert!(!is_hit(&c, "1001"));
    assert!(is_hit(&c, "1003"));
    assert_eq!(c.dom().style_of(witcher, "order"), None);
}

#[test]
fn test_empty_query_clears_everything() {
    let (mut c, _) = sample();
    search(&mut c, "i");
    assert_eq!(search(&mut c, "   "), SearchOutcome::Cleared { removed: 2 });
    for key in ["1001", "1002", "1003"] {
        assert!(!is_hit(&c, key));
    }
    assert!(!results_mode(&c));
    assert!(c.search_results().is_empty());
    assert_eq!(c.last_query(), Some(""));
}

#[test]
fn test_input_event_runs_search() {
    let (mut c, _) = sample();
    type_query(&mut c, "doom");
    c.handle(PageEvent::SearchInput).unwrap();
    assert_eq!(c.search_results(), vec!["1002"]);
}

#[test]
fn test_blur_reruns_after_delay() {
    let (mut c, clock) = sample();
    search(&mut c, "doom");
    c.handle(PageEvent::SearchBlur).unwrap();
    type_query(&mut c, "witcher");

    clock.advance(9.0);
    c.advance().unwrap();
    assert_eq!(c.search_results(), vec!["1002"]);

    clock.advance(1.0);
    assert_eq!(c.advance().unwrap(), 1);
    assert_eq!(c.search_results(), vec!["1001"]);
}

#[test]
fn test_input_supersedes_pending_rerun() {
    let (mut c, _) = sample();
    c.handle(PageEvent::SearchBlur).unwrap();
    assert!(c.next_deadline().is_some());
    type_query(&mut c, "doom");
    c.handle(PageEvent::SearchInput).unwrap();
    assert_eq!(c.next_deadline(), None);
}

#[test]
fn test_malformed_payload_aborts_search() {
    let (mut c, _) = sample();
    let card = c.dom().find("game-1002");
    c.dom_mut().nodes[card].data.insert("search".into(), "not json".into());

    type_query(&mut c, "doom");
    let err = c.run_search().unwrap_err();
    assert!(matches!(err, Error::Json(_)), "{err}");
    assert_eq!(c.last_query(), None);
    assert!(!results_mode(&c));

    c.dom_mut().nodes[card].data.insert("search".into(), "[\"doom\"]".into());
    assert_eq!(
        c.run_search().unwrap(),
        SearchOutcome::Filtered { added: 1, removed: 0, total: 1 }
    );
}

#[test]
fn test_missing_payload_is_an_error() {
    let (mut c, _) = sample();
    let card = c.dom().find("game-1003");
    c.dom_mut().nodes[card].data.clear();
    let err = search_err(&mut c, "x");
    assert!(matches!(err, Error::MissingSearchData(ref key) if key == "1003"), "{err}");
}

fn search_err(c: &mut TestController, text: &str) -> Error {
    type_query(c, text);
    c.run_search().unwrap_err()
}
