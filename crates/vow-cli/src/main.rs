use serde::Serialize;
use std::process::ExitCode;
use tokio::task::LocalSet;
use tokio::time::{Duration, sleep};
use tracing_subscriber::EnvFilter;

use vow_core::{Promise, PromiseState, Runtime, Value};

#[derive(Debug, Serialize)]
struct Report {
    scenario: &'static str,
    state: PromiseState,
    value: serde_json::Value,
}

const SCENARIOS: [&str; 5] = ["a", "b", "c", "d", "selfref"];

/// scenario ごとに promise を組み立てる（まだ決着していなくてよい）
fn build(runtime: &Runtime, scenario: &str) -> Option<Promise> {
    let promise = match scenario {
        // (A) resolve(42).then(x => x + 1)
        "a" => Promise::resolve(runtime, 42)
            .and_then(|v| Ok(Value::from(v.as_i64().unwrap_or_default() + 1))),

        // (B) reject('boom').then(null, e => 'recovered:' + e)
        "b" => Promise::reject(runtime, "boom")
            .catch(|e| Ok(Value::from(format!("recovered:{e}")))),

        // (C) 3 段の adoption。一番内側は少し遅れて fulfill
        "c" => {
            let (third, resolve_third, _) = Promise::with_resolvers(runtime);
            let second = Promise::resolve(runtime, third);
            tokio::task::spawn_local(async move {
                sleep(Duration::from_millis(20)).await;
                resolve_third.call("deep");
            });
            Promise::resolve(runtime, second)
        }

        // (D) handler が Error('x') を throw
        "d" => Promise::resolve(runtime, 1).and_then(|_| Err(Value::error("x"))),

        // 自分自身で resolve
        "selfref" => {
            let (promise, resolve, _) = Promise::with_resolvers(runtime);
            resolve.call(promise.clone());
            promise
        }

        _ => return None,
    };
    Some(promise)
}

async fn run(scenario: &'static str, runtime: &Runtime) -> Option<Report> {
    let promise = build(runtime, scenario)?;
    let outcome = promise.wait().await;
    let value = match &outcome {
        Ok(v) | Err(v) => v.to_json(),
    };
    Some(Report {
        scenario,
        state: promise.state(),
        value,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let arg = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());
    let selected: Vec<&'static str> = if arg == "all" {
        SCENARIOS.to_vec()
    } else {
        match SCENARIOS.iter().find(|s| **s == arg) {
            Some(s) => vec![*s],
            None => {
                eprintln!("unknown scenario: {arg} (expected one of {SCENARIOS:?} or all)");
                return ExitCode::from(2);
            }
        }
    };

    let local = LocalSet::new();
    local
        .run_until(async move {
            // (1) Runtime と scheduler driver を用意
            let (runtime, driver) = Runtime::tokio();
            tokio::task::spawn_local(driver.run());

            // (2) scenario を順に実行して JSON を 1 行ずつ出力
            for scenario in selected {
                let Some(report) = run(scenario, &runtime).await else {
                    continue;
                };
                match serde_json::to_string(&report) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!(error = %e, scenario, "failed to encode report"),
                }
            }
        })
        .await;

    ExitCode::SUCCESS
}
