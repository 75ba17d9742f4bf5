use core::convert::Infallible;
use psyringe::{Container, Entry, ValidateErrorKind};
use rand::seq::SliceRandom as _;
use std::sync::Arc;
use tracing_test::traced_test;

#[derive(Clone)]
struct A;
#[derive(Clone)]
struct B;
#[derive(Clone)]
struct C;
#[derive(Clone)]
struct D;

struct T;

fn validate(entries: Vec<Entry>) -> Result<(), ValidateErrorKind> {
    Container::with_entries(entries).unwrap().validate()
}

#[test]
#[traced_test]
fn test_valid_graph() {
    validate(vec![
        Entry::value(1_i32),
        Entry::value(String::from("hello")),
        Entry::constructor(|_: i32, _: String| Ok::<_, Infallible>(A)),
        Entry::constructor(|_: A, _: i32| Ok::<_, Infallible>(B)),
        Entry::constructor(|_: A, _: B| Ok::<_, Infallible>(C)),
    ])
    .unwrap();
}

#[test]
#[traced_test]
fn test_missing_param() {
    let err = validate(vec![
        Entry::value(String::from("hello")),
        Entry::value(1_i32),
        Entry::constructor(|_: String, _: f64, _: i32| Ok::<_, Infallible>(Arc::new(T))),
    ])
    .unwrap_err();

    assert!(matches!(err, ValidateErrorKind::Missing { position: 1, .. }));
    assert_eq!(
        err.to_string(),
        "unable to satisfy constructor fn(String, f64, i32) -> Arc<T>: unable to satisfy param 1: no constructor or value for f64"
    );
}

#[test]
#[traced_test]
fn test_cycles() {
    let cases = [
        (
            "full cycle",
            vec![
                Entry::constructor(|_: B| Ok::<_, Infallible>(A)),
                Entry::constructor(|_: C| Ok::<_, Infallible>(B)),
                Entry::constructor(|_: A| Ok::<_, Infallible>(C)),
            ],
            "dependency cycle: A: depends on B: depends on C: depends on A",
        ),
        (
            "partial cycle",
            vec![
                Entry::constructor(|_: B| Ok::<_, Infallible>(A)),
                Entry::constructor(|_: C| Ok::<_, Infallible>(B)),
                Entry::constructor(|_: D| Ok::<_, Infallible>(C)),
                Entry::constructor(|_: B| Ok::<_, Infallible>(D)),
            ],
            "dependency cycle: B: depends on C: depends on D: depends on B",
        ),
        (
            "self cycle",
            vec![Entry::constructor(|_: A| Ok::<_, Infallible>(A))],
            "dependency cycle: A: depends on A",
        ),
        (
            "self cycle from chord",
            vec![
                Entry::constructor(|_: B| Ok::<_, Infallible>(A)),
                Entry::constructor(|_: B| Ok::<_, Infallible>(B)),
            ],
            "dependency cycle: B: depends on B",
        ),
        (
            "two self cycles",
            vec![
                Entry::constructor(|_: B| Ok::<_, Infallible>(B)),
                Entry::constructor(|_: A| Ok::<_, Infallible>(A)),
            ],
            "dependency cycle: A: depends on A",
        ),
        (
            "first argument satisfied",
            vec![
                Entry::value(1_i32),
                Entry::constructor(|_: i32, _: B| Ok::<_, Infallible>(A)),
                Entry::constructor(|_: A| Ok::<_, Infallible>(B)),
            ],
            "dependency cycle: A: depends on B: depends on A",
        ),
    ];

    for (name, entries, expected) in cases {
        let err = validate(entries).unwrap_err();
        assert!(matches!(err, ValidateErrorKind::Cycle { .. }), "{name}");
        assert_eq!(err.to_string(), expected, "{name}");
    }
}

#[test]
#[traced_test]
fn test_cycle_is_deterministic() {
    let makers: [fn() -> Entry; 4] = [
        || Entry::constructor(|_: B| Ok::<_, Infallible>(A)),
        || Entry::constructor(|_: C| Ok::<_, Infallible>(B)),
        || Entry::constructor(|_: A| Ok::<_, Infallible>(C)),
        || Entry::value(1_i32),
    ];

    let mut rng = rand::rng();
    for _ in 0..1000 {
        let mut makers = makers;
        makers.shuffle(&mut rng);

        let err = validate(makers.iter().map(|make| make()).collect()).unwrap_err();
        assert_eq!(err.to_string(), "dependency cycle: A: depends on B: depends on C: depends on A");
    }
}

#[test]
#[traced_test]
fn test_missing_before_cycles_is_deterministic() {
    let makers: [fn() -> Entry; 5] = [
        || Entry::constructor(|_: B| Ok::<_, Infallible>(A)),
        || Entry::constructor(|_: A| Ok::<_, Infallible>(B)),
        || Entry::constructor(|_: u8| Ok::<_, Infallible>(C)),
        || Entry::constructor(|_: D| Ok::<_, Infallible>(D)),
        || Entry::constructor(|_: u16, _: String| Ok::<_, Infallible>(Arc::new(T))),
    ];

    let mut rng = rand::rng();
    for _ in 0..1000 {
        let mut makers = makers;
        makers.shuffle(&mut rng);

        let err = validate(makers.iter().map(|make| make()).collect()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to satisfy constructor fn(u16, String) -> Arc<T>: unable to satisfy param 0: no constructor or value for u16"
        );
    }
}

#[test]
#[traced_test]
fn test_validate_constructs_nothing() {
    let container = Container::with_entries([Entry::constructor(|| -> Result<A, Infallible> { panic!("must not run") })]).unwrap();

    container.validate().unwrap();
}
