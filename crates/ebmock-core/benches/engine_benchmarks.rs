use criterion::{criterion_group, criterion_main, Criterion};
use ebmock_core::{Action, Engine, EngineConfig};
use ebmock_schema::{validate, Operation, Params};
use serde_json::{json, Value};

const STACK: &str = "64bit Amazon Linux running Node.js";

fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap()
}

fn create_environment_params(name: &str) -> Params {
    params(json!({
        "ApplicationName": "bench",
        "EnvironmentName": name,
        "SolutionStackName": STACK,
        "VersionLabel": "v1",
        "Tier": { "Name": "WebServer", "Type": "Standard", "Version": "1.0" },
        "OptionSettings": [
            { "Namespace": "aws:autoscaling:asg", "OptionName": "MinSize", "Value": "1" },
            { "Namespace": "aws:autoscaling:asg", "OptionName": "MaxSize", "Value": "4" }
        ],
        "Tags": [{ "Key": "team", "Value": "bench" }]
    }))
}

fn seeded_engine() -> Engine {
    let mut engine = Engine::new(EngineConfig::default().with_seed(1));
    engine
        .execute(
            Action::Modeled(Operation::CreateApplication),
            &params(json!({ "ApplicationName": "bench" })),
        )
        .unwrap();
    engine
        .execute(
            Action::Modeled(Operation::CreateApplicationVersion),
            &params(json!({ "ApplicationName": "bench", "VersionLabel": "v1" })),
        )
        .unwrap();
    engine
}

fn bench_validate(c: &mut Criterion) {
    let request = create_environment_params("bench-env");
    c.bench_function("validate_create_environment", |b| {
        b.iter(|| validate(Operation::CreateEnvironment, &request).unwrap());
    });

    let bad = params(json!({
        "ApplicationName": "bench",
        "EnvironmentName": "-bad-",
        "SolutionStackName": STACK
    }));
    c.bench_function("validate_rejects_bad_name", |b| {
        b.iter(|| validate(Operation::CreateEnvironment, &bad).unwrap_err());
    });
}

fn bench_create_environment(c: &mut Criterion) {
    c.bench_function("engine_create_environment", |b| {
        b.iter_with_setup(
            || (seeded_engine(), create_environment_params("bench-env")),
            |(mut engine, request)| {
                engine
                    .execute(Action::Modeled(Operation::CreateEnvironment), &request)
                    .unwrap();
            },
        );
    });
}

fn bench_describe_many(c: &mut Criterion) {
    let mut engine = seeded_engine();
    for i in 0..100 {
        engine
            .execute(
                Action::Modeled(Operation::CreateEnvironment),
                &create_environment_params(&format!("env-{i}")),
            )
            .unwrap();
    }
    let filter = params(json!({ "ApplicationName": "bench", "IncludeDeleted": false }));
    c.bench_function("engine_describe_100_environments", |b| {
        b.iter(|| {
            engine
                .execute(Action::Modeled(Operation::DescribeEnvironments), &filter)
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_validate,
    bench_create_environment,
    bench_describe_many
);
criterion_main!(benches);
