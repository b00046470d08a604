wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::wasm_bindgen_test;

use automount::{
    activate_all,
    web::{DocumentSource, Launcher, CONTENT_LOADED},
    Config, ConstructError, ElementSource, FailurePolicy, Marker, MountError, State,
};

const PAGE: &str = r#"
<header id="header" data-rivus></header>
<div id="plain-1"></div>
<aside id="sidebar" data-rivus="ignored">
    <div id="plain-2"></div>
</aside>
<footer id="footer" data-rivus=""></footer>
"#;

fn get_root(html: &str) -> web_sys::Element {
    let doc = web_sys::window().unwrap().document().unwrap();
    if let Some(elem) = doc.get_element_by_id("testapp") {
        elem.remove();
    }

    let elem = doc.create_element("div").unwrap();
    elem.set_id("testapp");
    elem.set_inner_html(html);
    doc.body().unwrap().append_child(&elem).unwrap();
    elem
}

/// Resolves after every already queued zero-delay timeout has run.
async fn next_task() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn fire_ready(target: &web_sys::EventTarget) {
    let event = web_sys::Event::new(CONTENT_LOADED).unwrap();
    target.dispatch_event(&event).unwrap();
}

type Calls = Rc<RefCell<Vec<String>>>;

fn recording(calls: &Calls) -> impl FnMut(web_sys::Element) -> Result<String, ConstructError> {
    let calls = calls.clone();
    move |elem| {
        calls.borrow_mut().push(elem.id());
        elem.set_text_content(Some("mounted"));
        Ok(elem.id())
    }
}

#[wasm_bindgen_test]
fn test_document_source_order() {
    let root = get_root(PAGE);
    let ids: Vec<_> = DocumentSource::subtree(root)
        .query(&Marker::default())
        .unwrap()
        .into_iter()
        .map(|e| e.id())
        .collect();
    assert_eq!(ids, vec!["header", "sidebar", "footer"]);
}

#[wasm_bindgen_test]
fn test_document_source_nested_markers() {
    let root = get_root(
        r#"<div id="a" data-rivus><div id="b" data-rivus><span id="c" data-rivus></span></div></div><p id="d" data-rivus></p>"#,
    );
    let ids: Vec<_> = DocumentSource::subtree(root)
        .query(&Marker::default())
        .unwrap()
        .into_iter()
        .map(|e| e.id())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[wasm_bindgen_test]
fn test_activate_all_scenario() {
    let root = get_root(PAGE);
    let calls = Calls::default();

    let instances = activate_all(
        &DocumentSource::subtree(root.clone()),
        &mut recording(&calls),
        &Marker::default(),
    )
    .unwrap();

    assert_eq!(instances, vec!["header", "sidebar", "footer"]);
    assert_eq!(*calls.borrow(), vec!["header", "sidebar", "footer"]);

    // Factory side effects land on the element, untagged ones are untouched.
    assert_eq!(
        root.query_selector("#header").unwrap().unwrap().text_content(),
        Some("mounted".to_string())
    );
    assert_eq!(
        root.query_selector("#plain-1").unwrap().unwrap().inner_html(),
        ""
    );
}

#[wasm_bindgen_test]
fn test_activate_all_fail_fast() {
    let root = get_root(PAGE);
    let calls = Calls::default();
    let calls2 = calls.clone();

    let mut factory = move |elem: web_sys::Element| -> Result<(), wasm_bindgen::JsValue> {
        calls2.borrow_mut().push(elem.id());
        if elem.id() == "sidebar" {
            Err(js_sys::Error::new("sidebar exploded").into())
        } else {
            Ok(())
        }
    };
    let err = activate_all(
        &DocumentSource::subtree(root),
        &mut factory,
        &Marker::default(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        MountError::Construction {
            index: 1,
            source: ConstructError::new("Error: sidebar exploded"),
        }
    );
    assert_eq!(*calls.borrow(), vec!["header", "sidebar"]);
}

#[wasm_bindgen_test]
fn test_launcher_waits_for_ready_signal() {
    let root = get_root(PAGE);
    let target = web_sys::EventTarget::new().unwrap();
    let calls = Calls::default();

    let launch = Launcher::new(recording(&calls))
        .with_root(root)
        .with_trigger(target.clone())
        .start()
        .unwrap();

    assert_eq!(launch.state(), State::Idle);
    assert!(calls.borrow().is_empty());

    fire_ready(&target);
    assert_eq!(launch.state(), State::Activated);
    assert_eq!(*calls.borrow(), vec!["header", "sidebar", "footer"]);
}

#[wasm_bindgen_test]
fn test_launcher_ignores_second_ready_signal() {
    let root = get_root(PAGE);
    let target = web_sys::EventTarget::new().unwrap();
    let calls = Calls::default();

    let _launch = Launcher::new(recording(&calls))
        .with_root(root)
        .with_trigger(target.clone())
        .start()
        .unwrap();

    fire_ready(&target);
    fire_ready(&target);
    assert_eq!(calls.borrow().len(), 3);
}

#[wasm_bindgen_test]
fn test_launcher_unguarded_activates_twice() {
    let root = get_root(PAGE);
    let target = web_sys::EventTarget::new().unwrap();
    let calls = Calls::default();

    let _launch = Launcher::new(recording(&calls))
        .with_config(Config::new().with_duplicate_guard(false))
        .with_root(root)
        .with_trigger(target.clone())
        .start()
        .unwrap();

    fire_ready(&target);
    fire_ready(&target);
    assert_eq!(calls.borrow().len(), 6);
}

#[wasm_bindgen_test]
fn test_launcher_reset() {
    let root = get_root(PAGE);
    let target = web_sys::EventTarget::new().unwrap();
    let calls = Calls::default();

    let launch = Launcher::new(recording(&calls))
        .with_root(root)
        .with_trigger(target.clone())
        .start()
        .unwrap();

    fire_ready(&target);
    launch.reset();
    assert_eq!(launch.state(), State::Idle);
    fire_ready(&target);
    assert_eq!(calls.borrow().len(), 6);
}

#[wasm_bindgen_test]
fn test_dropped_launch_never_activates() {
    let root = get_root(PAGE);
    let target = web_sys::EventTarget::new().unwrap();
    let calls = Calls::default();

    let launch = Launcher::new(recording(&calls))
        .with_root(root)
        .with_trigger(target.clone())
        .start()
        .unwrap();
    drop(launch);

    fire_ready(&target);
    assert!(calls.borrow().is_empty());
}

#[wasm_bindgen_test]
fn test_launcher_best_effort_custom_marker() {
    let root = get_root(
        r#"<i id="one" data-widget></i><i id="two" data-widget></i><i id="three" data-widget></i><i id="skip" data-rivus></i>"#,
    );
    let target = web_sys::EventTarget::new().unwrap();
    let calls = Calls::default();
    let calls2 = calls.clone();

    let config = Config::new()
        .with_marker(Marker::new("data-widget").unwrap())
        .with_policy(FailurePolicy::BestEffort);
    let _launch = Launcher::new(move |elem: web_sys::Element| -> Result<(), ConstructError> {
        calls2.borrow_mut().push(elem.id());
        if elem.id() == "one" {
            Err("broken".into())
        } else {
            Ok(())
        }
    })
    .with_config(config)
    .with_root(root)
    .with_trigger(target.clone())
    .start()
    .unwrap();

    fire_ready(&target);
    assert_eq!(*calls.borrow(), vec!["one", "two", "three"]);
}

#[wasm_bindgen_test]
async fn test_launcher_after_parse_is_deferred() {
    // The test page is fully parsed, so activation is scheduled as a task.
    let root = get_root(PAGE);
    let calls = Calls::default();

    let launch = Launcher::new(recording(&calls))
        .with_root(root)
        .start()
        .unwrap();

    assert_eq!(launch.state(), State::Idle);
    assert!(calls.borrow().is_empty());

    next_task().await;

    assert_eq!(launch.state(), State::Activated);
    assert_eq!(*calls.borrow(), vec!["header", "sidebar", "footer"]);
}

#[wasm_bindgen_test]
fn test_document_source_escaped_markers() {
    let root = get_root(
        r#"<i id="ns" x:mount></i><i id="dot" data-my_lib.v2></i><i id="plain" data-rivus></i>"#,
    );
    let source = DocumentSource::subtree(root);

    let ids = |name: &'static str| -> Vec<String> {
        source
            .query(&Marker::new(name).unwrap())
            .unwrap()
            .into_iter()
            .map(|e| e.id())
            .collect()
    };
    assert_eq!(ids("x:mount"), vec!["ns"]);
    assert_eq!(ids("data-my_lib.v2"), vec!["dot"]);
}

#[wasm_bindgen_test]
fn test_launcher_fail_fast_reports_page_error() {
    let root = get_root(PAGE);
    let target = web_sys::EventTarget::new().unwrap();
    let calls = Calls::default();
    let calls2 = calls.clone();
    let errors = Calls::default();
    let errors2 = errors.clone();

    // Collect uncaught errors instead of letting them reach the console.
    let on_error = Closure::wrap(Box::new(move |ev: web_sys::ErrorEvent| {
        ev.prevent_default();
        let message = match ev.error().dyn_into::<js_sys::Error>() {
            Ok(err) => String::from(err.message()),
            Err(_) => ev.message(),
        };
        errors2.borrow_mut().push(message);
    }) as Box<dyn FnMut(web_sys::ErrorEvent)>);
    let window = web_sys::window().unwrap();
    window
        .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .unwrap();

    let launch = Launcher::new(move |elem: web_sys::Element| -> Result<(), ConstructError> {
        calls2.borrow_mut().push(elem.id());
        if elem.id() == "sidebar" {
            Err("sidebar exploded".into())
        } else {
            Ok(())
        }
    })
    .with_root(root)
    .with_trigger(target.clone())
    .start()
    .unwrap();

    fire_ready(&target);
    window
        .remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .unwrap();

    assert_eq!(launch.state(), State::Activated);
    assert_eq!(*calls.borrow(), vec!["header", "sidebar"]);
    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(
        errors.borrow()[0],
        "component construction failed for element #1: sidebar exploded"
    );
}

