// Execution order, joins and asynchronous handlers.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use krikata::prelude::*;

type Log = Rc<RefCell<Vec<String>>>;

/// `step <string>` logs its argument when executed; `fail <string>` fails.
fn logging_language(log: &Log, parallel: bool) -> Language<usize> {
    let prims = Primitives::standard();
    let sink = Rc::clone(log);
    let item: Type<String> = Type::new(
        "item",
        Dispatch::new()
            .funct(Func::new("step").arg(&prims.string).exec(move |s: String| {
                sink.borrow_mut().push(s.clone());
                s
            }))
            .funct(
                Func::new("fail")
                    .arg(&prims.string)
                    .try_exec(|s: String| Err(KrikataError::handler(format!("{s} failed")))),
            ),
    );
    let root = if parallel {
        Func::new("all")
            .arg(Parallel::new(&item))
            .exec(|items: Vec<String>| items.len())
    } else {
        Func::new("each")
            .arg(Repeat::new(&item))
            .exec(|items: Vec<String>| items.len())
    };
    Language::new("log", root.into_type())
}

#[test]
fn repeat_runs_in_input_order() {
    let log = Log::default();
    let lang = logging_language(&log, false);
    let parsed = lang
        .parse_args(["each", "step", "a", "step", "b", "step", "c"])
        .unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(parsed.execute().block_on().unwrap(), 3);
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn repeat_stops_at_first_failure() {
    let log = Log::default();
    let lang = logging_language(&log, false);
    let err = lang
        .parse_args(["each", "step", "a", "fail", "b", "step", "c"])
        .unwrap()
        .execute()
        .block_on()
        .unwrap_err();
    assert_eq!(err.to_string(), "b failed");
    assert_eq!(*log.borrow(), vec!["a"]);
}

#[test]
fn parallel_failure_does_not_cancel_siblings() {
    let log = Log::default();
    let lang = logging_language(&log, true);
    let err = lang
        .parse_args(["all", "step", "a", "fail", "b", "step", "c"])
        .unwrap()
        .execute()
        .block_on()
        .unwrap_err();
    assert_eq!(err.to_string(), "b failed");
    assert_eq!(log.borrow().len(), 2);
}

#[tokio::test]
async fn parallel_join_waits_for_every_child() {
    let prims = Primitives::standard();
    let done = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&done);
    let wait = Func::new("wait")
        .arg(&prims.int)
        .exec_async(move |ms: i64| {
            let sink = Rc::clone(&sink);
            async move {
                tokio::time::sleep(Duration::from_millis(ms as u64)).await;
                sink.borrow_mut().push(ms);
                Ok(ms)
            }
        })
        .into_type();
    let lang = Language::new("waits", Parallel::new(&wait));

    let values = lang
        .run(["wait", "30", "wait", "10", "wait", "20"])
        .await
        .unwrap();
    assert_eq!(values, vec![30, 10, 20]);
    assert_eq!(*done.borrow(), vec![10, 20, 30]);
}

#[tokio::test]
async fn parallel_reports_a_failing_child_after_the_others_finish() {
    let prims = Primitives::standard();
    let finished = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&finished);
    let task = Func::new("task")
        .arg(&prims.int)
        .exec_async(move |ms: i64| {
            let sink = Rc::clone(&sink);
            async move {
                tokio::time::sleep(Duration::from_millis(ms.unsigned_abs())).await;
                if ms < 0 {
                    return Err(KrikataError::handler("negative delay"));
                }
                *sink.borrow_mut() += 1;
                Ok(())
            }
        })
        .into_type();
    let lang = Language::new("tasks", Parallel::new(&task));

    let err = lang
        .run(["task", "-5", "task", "20", "task", "30"])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "negative delay");
    assert_eq!(*finished.borrow(), 2);
}

#[test]
fn arguments_execute_left_to_right() {
    let log = Log::default();
    let prims = Primitives::standard();
    let sink = Rc::clone(&log);
    let word: Type<String> = Func::new("w")
        .arg(&prims.string)
        .exec(move |s: String| {
            sink.borrow_mut().push(s.clone());
            s
        })
        .into_type();
    let pair = Func::new("pair")
        .arg(&word)
        .arg(&word)
        .arg(&word)
        .exec(|a: String, b: String, c: String| format!("{a}{b}{c}"))
        .into_type();
    let lang = Language::new("pairs", &pair);
    let out = lang
        .parse_args(["pair", "w", "x", "w", "y", "w", "z"])
        .unwrap()
        .execute()
        .block_on()
        .unwrap();
    assert_eq!(out, "xyz");
    assert_eq!(*log.borrow(), vec!["x", "y", "z"]);
}

#[test]
fn execution_leaves_the_trace_untouched() {
    let log = Log::default();
    let lang = logging_language(&log, false);
    let parsed = lang.parse_args(["each", "step", "a"]).unwrap();
    let (trace, executor) = parsed.into_parts();
    executor.run().block_on().unwrap();
    assert_eq!(
        trace.typed_tokens(),
        "l.log:[each:[fn:each r.item:[item:[fn:step string:a]]]]"
    );
}
