use std::time::Duration;

use stepwise::{Feature, Registry, Scenario, StepGroup, Suite};

#[derive(Debug, Default)]
struct Calculator {
    values: Vec<i64>,
    total: Option<i64>,
}

fn steps() -> stepwise::Result<StepGroup<Calculator>> {
    StepGroup::<Calculator>::new("Calculator:")?
        .before(|ctx| {
            ctx.values.clear();
            ctx.total = None;
            Ok(())
        })
        .given(r#"I added "(.*)" and "(.*)""#, |ctx, args| {
            ctx.when(&format!(r#"I enter "{}""#, args.str(0)?))?;
            ctx.when(&format!(r#"I add "{}""#, args.str(1)?))?;
            Ok(())
        })?
        .given(r#"I eventually add "(.*)" and "(.*)""#, |ctx, args| {
            let (first, second) = (args.str(0)?.to_owned(), args.str(1)?.to_owned());
            let done = ctx.defer();
            drop(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                done.resume_with(move |ctx| {
                    ctx.when(&format!(r#"I enter "{first}""#))?;
                    ctx.when(&format!(r#"I add "{second}""#))?;
                    Ok(())
                });
            }));
            Ok(())
        })?
        .when(r#"I enter "(.*)""#, |ctx, args| {
            ctx.values.push(args.parse(0)?);
            Ok(())
        })?
        .when(r#"I add "(.*)""#, |ctx, args| {
            ctx.values.push(args.parse(0)?);
            let total: i64 = ctx.values.iter().sum();
            ctx.total = Some(total);
            ctx.values = vec![total];
            Ok(())
        })?
        .then(r#"I should get "(.*)""#, |ctx, args| {
            let expected = args.parse::<i64>(0)?;
            anyhow::ensure!(
                ctx.total == Some(expected),
                "expected {expected}, got {:?}",
                ctx.total,
            );
            Ok(())
        })
}

#[tokio::main]
async fn main() -> stepwise::Result<()> {
    let mut registry = Registry::<Calculator>::new();
    registry
        .feature(
            Feature::new("Calculator: add")
                .scenario(
                    Scenario::new("add 2 numbers")
                        .when(r#"I enter "1""#)
                        .and(r#"I add "1""#)
                        .then(r#"I should get "2""#),
                )
                .scenario(
                    Scenario::new("add 3 numbers")
                        .given(r#"I added "1" and "2""#)
                        .when(r#"I add "3""#)
                        .then(r#"I should get "6""#),
                )
                .scenario(
                    Scenario::new("add 3 numbers, some of them later")
                        .given(r#"I eventually add "1" and "2""#)
                        .when(r#"I add "3""#)
                        .then(r#"I should get "6""#),
                ),
        )
        .steps(steps()?);

    Suite::new(registry).timeout(Duration::from_secs(5)).run_and_exit().await;
    Ok(())
}
