use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use serde::Deserialize;
use serde_json::json;
use stepwise::{
    runner, Feature, Outcome, Registry, Scenario, ScenarioError, StepError,
    StepGroup,
};

static AFTER_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone, Debug, Deserialize, PartialEq)]
struct Person {
    name: String,
    age: u32,
}

#[derive(Debug, Default)]
struct Queue {
    values: Vec<String>,
    person: Option<Person>,
    people: Vec<Person>,
}

impl Queue {
    fn greeting(&self) -> String {
        let people = self.person.iter().chain(&self.people).collect::<Vec<_>>();
        format!(
            "Hi {}, you're {}",
            people.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(" and "),
            people.iter().map(|p| p.age.to_string()).collect::<Vec<_>>().join(" and "),
        )
    }
}

fn queue_steps() -> StepGroup<Queue> {
    StepGroup::<Queue>::new("^Queue:")
        .unwrap()
        .before(|ctx| {
            ctx.values.clear();
            Ok(())
        })
        .after(|_| {
            AFTER_CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .given(r#"enqueue "(.*)""#, |ctx, args| {
            ctx.values.push(args.str(0)?.to_owned());
            Ok(())
        })
        .unwrap()
        .given("a person", |ctx, args| {
            ctx.person = Some(args.deserialize(0)?);
            Ok(())
        })
        .unwrap()
        .given("people", |ctx, args| {
            ctx.people = args.deserialize(0)?;
            Ok(())
        })
        .unwrap()
        .given("people as args", |ctx, args| {
            ctx.people = (0..args.len())
                .map(|i| args.deserialize(i))
                .collect::<anyhow::Result<_>>()?;
            Ok(())
        })
        .unwrap()
        .given(r#""(.*)" people"#, |ctx, args| {
            anyhow::ensure!(args.str(0)? == "young", "too old");
            ctx.people = args.deserialize(1)?;
            Ok(())
        })
        .unwrap()
        .when(r#"enqueue "(.*)" asynchronously"#, |ctx, args| {
            let value = args.str(0)?.to_owned();
            let done = ctx.defer();
            drop(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                done.resume_with(move |ctx| {
                    ctx.values.push(value);
                    Ok(())
                });
            }));
            Ok(())
        })
        .unwrap()
        .when("async step isn't really async", |ctx, _| {
            ctx.defer().resume();
            Ok(())
        })
        .unwrap()
        .when("enqueue twice later", |ctx, _| {
            for (value, delay) in [("a", 10), ("b", 1)] {
                let done = ctx.defer();
                drop(tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    done.resume_with(move |ctx| {
                        ctx.when(&format!(r#"enqueue "{value}""#))?;
                        Ok(())
                    });
                }));
            }
            Ok(())
        })
        .unwrap()
        .when("forget to resume", |ctx, _| {
            drop(ctx.defer());
            Ok(())
        })
        .unwrap()
        .when("call a missing step", |ctx, _| {
            ctx.when("nonexistent")?;
            Ok(())
        })
        .unwrap()
        .when("sleep forever", |ctx, _| {
            let done = ctx.defer();
            drop(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                done.resume();
            }));
            Ok(())
        })
        .unwrap()
        .when("panic", |_, _| panic!("boom"))
        .unwrap()
        .then(r#"should be "(.*)""#, |ctx, args| {
            let actual = ctx.values.join(",");
            anyhow::ensure!(actual == args.str(0)?, "values are {actual:?}");
            Ok(())
        })
        .unwrap()
        .then(r#"the greeting should be "(.*)""#, |ctx, args| {
            let actual = ctx.greeting();
            anyhow::ensure!(actual == args.str(0)?, "greeting is {actual:?}");
            Ok(())
        })
        .unwrap()
}

async fn run(feature: Feature) -> Vec<Outcome<Queue>> {
    run_with(feature, []).await
}

async fn run_with(
    feature: Feature,
    extra: impl IntoIterator<Item = StepGroup<Queue>>,
) -> Vec<Outcome<Queue>> {
    let mut registry = Registry::new();
    registry.feature(feature).steps(queue_steps());
    for group in extra {
        registry.steps(group);
    }

    let mut outcomes = Vec::new();
    for case in runner::plan(&registry, None) {
        outcomes.push(case.run().await);
    }
    outcomes
}

fn single(mut outcomes: Vec<Outcome<Queue>>) -> Outcome<Queue> {
    assert_eq!(outcomes.len(), 1, "expected exactly one scenario to run");
    outcomes.remove(0)
}

#[tokio::test]
async fn steps_run_in_narrative_order() {
    let outcome = single(
        run(Feature::new("Queue: any order").scenario(
            Scenario::new("can call when after then")
                .given(r#"enqueue "1""#)
                .when(r#"enqueue "2""#)
                .then(r#"should be "1,2""#)
                .when(r#"enqueue "3""#)
                .then(r#"should be "1,2,3""#),
        ))
        .await,
    );

    outcome.result.unwrap();
    assert_eq!(outcome.world.values, ["1", "2", "3"]);
}

#[tokio::test]
async fn after_hooks_run_for_every_scenario() {
    let before = AFTER_CALLS.load(Ordering::SeqCst);

    let outcomes = run(Feature::new("Queue: after")
        .scenario(Scenario::new("first").given(r#"enqueue "1""#))
        .scenario(Scenario::new("second").then(r#"should be """#)))
    .await;

    assert!(outcomes.iter().all(|o| o.result.is_ok()));
    assert!(AFTER_CALLS.load(Ordering::SeqCst) - before >= 2);
}

#[tokio::test]
async fn deferred_steps_complete_before_next_step() {
    let outcomes = run(Feature::new("Queue: async")
        .scenario(
            Scenario::new("simple async")
                .when(r#"enqueue "1" asynchronously"#)
                .then(r#"should be "1""#),
        )
        .scenario(
            Scenario::new("should not blow up if not really async")
                .when("async step isn't really async"),
        )
        .scenario(
            Scenario::new("several continuations and inline steps")
                .when("enqueue twice later")
                .and(r#"enqueue "c""#)
                .then(r#"should be "b,a,c""#),
        ))
    .await;

    for outcome in outcomes {
        outcome.result.unwrap();
    }
}

#[tokio::test]
async fn dropped_continuation_fails_scenario() {
    let outcome = single(
        run(Feature::new("Queue: abandoned").scenario(
            Scenario::new("forgets").when("forget to resume").given(r#"enqueue "1""#),
        ))
        .await,
    );

    assert!(matches!(
        outcome.result,
        Err(ScenarioError::Step(StepError::Abandoned { ref step })) if step == "forget to resume",
    ));
    assert!(outcome.world.values.is_empty());
}

#[tokio::test]
async fn structured_arguments_reach_handlers() {
    let people = json!([{ "name": "Lance", "age": 3 }, { "name": "Lana", "age": 2 }]);
    let outcomes = run(Feature::new("Queue: POJO arguments")
        .scenario(
            Scenario::new("an object")
                .given_with("a person", [json!({ "name": "Lance", "age": 3 })])
                .then(r#"the greeting should be "Hi Lance, you're 3""#),
        )
        .scenario(
            Scenario::new("an array")
                .given_with("people", [people.clone()])
                .then(r#"the greeting should be "Hi Lance and Lana, you're 3 and 2""#),
        )
        .scenario(
            Scenario::new("more than one argument")
                .given_with(
                    "people as args",
                    [json!({ "name": "Lance", "age": 3 }), json!({ "name": "Lana", "age": 2 })],
                )
                .then(r#"the greeting should be "Hi Lance and Lana, you're 3 and 2""#),
        )
        .scenario(
            Scenario::new("captures come first")
                .given_with(r#""young" people"#, [people])
                .then(r#"the greeting should be "Hi Lance and Lana, you're 3 and 2""#),
        ))
    .await;

    assert_eq!(outcomes.len(), 4);
    for outcome in outcomes {
        outcome.result.unwrap();
    }
}

#[tokio::test]
async fn only_and_never_select_scenarios() {
    let outcomes = run(Feature::new("Queue: focus")
        .scenario(Scenario::new("ignored").given(r#"enqueue "ignored""#))
        .scenario(Scenario::only("focused").given(r#"enqueue "focused""#))
        .scenario(Scenario::never("never").given(r#"enqueue "never""#)))
    .await;

    let values = outcomes.into_iter().map(|o| o.world.values).collect::<Vec<_>>();
    assert_eq!(values, [["focused"]]);
}

#[tokio::test]
async fn missing_steps_are_reported_with_suggestions() {
    let outcome = single(
        run(Feature::new("Queue: missing").scenario(
            Scenario::new("typo")
                .given(r#"enqueue "1""#)
                .when(r#"enqeue "3""#)
                .then(r#"should be "1""#),
        ))
        .await,
    );

    assert_eq!(
        outcome.result.unwrap_err().to_string(),
        "Missing step definitions:\n\
         \tenqeue \"3\"\n\
         \t\tDid you mean?\n\
         \t\t\tenqueue \"1\" (2)\n\
         \t\t\tshould be \"1\" (9)",
    );
    assert_eq!(outcome.world.values, ["1"]);
}

#[tokio::test]
async fn every_missing_step_is_reported_and_later_steps_are_skipped() {
    let outcome = single(
        run(Feature::new("Queue: several missing").scenario(
            Scenario::new("two gaps")
                .given(r#"enqueue "a""#)
                .when("missing one")
                .and(r#"enqueue "b""#)
                .then("missing two"),
        ))
        .await,
    );

    assert_eq!(
        outcome.result.unwrap_err().to_string(),
        "Missing step definitions:\n\
         \tmissing one\n\
         \t\tDid you mean?\n\
         \t\t\tenqueue \"a\" (10)\n\
         \t\t\tenqueue \"b\" (10)\n\
         \tmissing two\n\
         \t\tDid you mean?\n\
         \t\t\tenqueue \"a\" (10)\n\
         \t\t\tenqueue \"b\" (10)",
    );
    assert_eq!(outcome.world.values, ["a"], "step after a missing one has run");
}

#[tokio::test]
async fn ambiguous_step_blocks_remaining_steps() {
    let duplicate = StepGroup::<Queue>::new("ambiguous$")
        .unwrap()
        .given(r#"enqueue "(\d+)""#, |_, _| Ok(()))
        .unwrap();

    let outcome = single(
        run_with(
            Feature::new("Queue: ambiguous").scenario(
                Scenario::new("two matches")
                    .given(r#"enqueue "1""#)
                    .and(r#"enqueue "x""#),
            ),
            [duplicate],
        )
        .await,
    );

    let err = outcome.result.unwrap_err();
    assert!(err.is_resolution_failure());
    assert_eq!(err.to_string(), "Ambiguous step definitions:\n\tenqueue \"1\"");
    assert!(outcome.world.values.is_empty(), "blocked step has run");
}

#[tokio::test]
async fn inline_step_failures_are_wrapped() {
    let outcome = single(
        run(Feature::new("Queue: dynamic").scenario(
            Scenario::new("missing inline step").when("call a missing step"),
        ))
        .await,
    );

    assert_eq!(
        outcome.result.unwrap_err().to_string(),
        "error while executing \"call a missing step\"\n failed to find \"nonexistent\"",
    );
}

#[tokio::test]
async fn panics_fail_the_scenario() {
    let outcome = single(
        run(Feature::new("Queue: panics")
            .scenario(Scenario::new("panics").when("panic").given(r#"enqueue "1""#)))
        .await,
    );

    assert_eq!(
        outcome.result.unwrap_err().to_string(),
        "error while executing \"panic\"\n boom",
    );
    assert!(outcome.world.values.is_empty());
}

#[tokio::test]
async fn name_filter_narrows_scenarios() {
    let mut registry = Registry::new();
    registry
        .feature(
            Feature::new("Queue: filter")
                .scenario(Scenario::new("alpha"))
                .scenario(Scenario::new("beta"))
                .scenario(Scenario::new("alphabet")),
        )
        .steps(queue_steps());

    let filter = regex::Regex::new("^alpha").unwrap();
    let names = runner::plan(&registry, Some(&filter))
        .iter()
        .map(|c| c.scenario().description.clone())
        .collect::<Vec<_>>();

    assert_eq!(names, ["alpha", "alphabet"]);
}

#[tokio::test]
async fn timeout_fails_only_the_slow_scenario() {
    let mut registry = Registry::new();
    registry
        .feature(
            Feature::new("Queue: timeout")
                .scenario(Scenario::new("slow").when("sleep forever"))
                .scenario(Scenario::new("fast").given(r#"enqueue "1""#)),
        )
        .steps(queue_steps());

    let summary = stepwise::Suite::new(registry)
        .with_output(Vec::new(), stepwise::cli::Coloring::Never)
        .timeout(Duration::from_millis(50))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].scenario, "slow");
    assert!(matches!(summary.failures[0].error, ScenarioError::TimedOut(_)));
}

#[tokio::test]
async fn fail_fast_stops_after_first_failure() {
    let mut registry = Registry::new();
    registry
        .feature(
            Feature::new("Queue: fail fast")
                .scenario(Scenario::new("passes").given(r#"enqueue "1""#))
                .scenario(Scenario::new("fails").when("panic"))
                .scenario(Scenario::new("never reached").given(r#"enqueue "2""#)),
        )
        .steps(queue_steps());

    let summary = stepwise::Suite::new(registry)
        .with_output(Vec::new(), stepwise::cli::Coloring::Never)
        .fail_fast()
        .run()
        .await
        .unwrap();

    assert_eq!((summary.passed, summary.failed(), summary.skipped), (1, 1, 1));
    assert!(summary.execution_has_failed());
}
