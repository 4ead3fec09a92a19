//! End-to-end tests through `#[derive(Filter)]`.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use searchkit::{
    Between, Call, ConditionBuilder, Diagnostic, Diagnostics, Filter, FilterError, NullBool,
    NullInt32, NullString, Number, Operator, Predicate, Recorder, Skip, Value, MAX_DEPTH,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Default)]
struct Collect {
    warnings: Mutex<Vec<Diagnostic>>,
    skips: Mutex<Vec<(String, Skip)>>,
}

impl Diagnostics for Collect {
    fn warn(&self, diagnostic: &Diagnostic) {
        self.warnings.lock().unwrap().push(diagnostic.clone());
    }

    fn skipped(&self, _filter: &'static str, field: &str, reason: Skip) {
        self.skips.lock().unwrap().push((field.to_string(), reason));
    }
}

impl Collect {
    fn errors(&self) -> Vec<(String, FilterError)> {
        self.warnings
            .lock()
            .unwrap()
            .iter()
            .map(|d| (d.field.clone(), d.error.clone()))
            .collect()
    }
}

fn compile<T: Filter>() -> (Predicate<T>, Arc<Collect>) {
    let sink = Arc::new(Collect::default());
    let predicate = Predicate::<T>::builder()
        .shared_diagnostics(sink.clone())
        .build();
    (predicate, sink)
}

fn run<T: Filter>(predicate: &Predicate<T>, filter: &T, alias: Option<&str>) -> Vec<Call> {
    let mut recorder = Recorder::new();
    predicate.apply(&mut recorder, filter, alias);
    recorder.into_calls()
}

fn int(n: i64) -> Value<'static> {
    Value::Number(Number::I64(n))
}

fn date(y: i32, m: u32, d: u32) -> Value<'static> {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn compare(op: Operator, column: &str, value: Value<'static>) -> Call {
    Call::Compare {
        op,
        column: column.to_string(),
        value,
    }
}

// ============================================================================
// Annotation grammar
// ============================================================================

#[derive(Filter, Default)]
struct UserSearch {
    #[search("gte")]
    min_age: Option<i32>,
    #[search("lt,operator=lte,column=age")]
    max_age: Option<i32>,
    #[allow(non_snake_case)]
    createdBy: Option<String>,
    #[search("neq,column=status,alias=u")]
    not_status: Option<String>,
}

#[test]
fn shorthand_defaults_and_explicit_operator() {
    let (predicate, sink) = compile::<UserSearch>();
    let filter = UserSearch {
        min_age: Some(18),
        max_age: Some(65),
        createdBy: Some("ann".into()),
        not_status: Some("banned".into()),
    };

    assert_eq!(
        run(&predicate, &filter, None),
        vec![
            compare(Operator::Gte, "min_age", int(18)),
            compare(Operator::Lte, "age", int(65)),
            compare(Operator::Eq, "created_by", Value::from("ann")),
            compare(Operator::Neq, "u.status", Value::from("banned")),
        ]
    );
    assert!(sink.errors().is_empty());
}

#[test]
fn absent_fields_make_no_calls() {
    let (predicate, sink) = compile::<UserSearch>();
    assert!(run(&predicate, &UserSearch::default(), Some("x")).is_empty());
    assert_eq!(sink.skips.lock().unwrap().len(), 4);
}

#[test]
fn conditions_are_introspectable() {
    let predicate = Predicate::<UserSearch>::compile();
    let rendered: Vec<_> = predicate
        .conditions()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        rendered,
        ["min_age gte", "age lte", "created_by eq", "u.status neq"]
    );
}

// ============================================================================
// Pattern family
// ============================================================================

#[derive(Filter, Default)]
struct PostSearch {
    #[search("contains,column=title|description")]
    q: String,
    #[search("notIStartsWith,column=slug")]
    slug: String,
    #[search("endsWith,column=email,alias=a")]
    domain: Option<String>,
}

#[test]
fn multi_column_pattern_groups_with_or() {
    let (predicate, _) = compile::<PostSearch>();
    let filter = PostSearch {
        q: "rust".into(),
        ..PostSearch::default()
    };

    let contains = Operator::Contains.pattern().unwrap();
    assert_eq!(
        run(&predicate, &filter, Some("p")),
        vec![Call::Group(vec![
            Call::Match {
                pattern: contains,
                column: "p.title".into(),
                text: "rust".into(),
                or: true,
            },
            Call::Match {
                pattern: contains,
                column: "p.description".into(),
                text: "rust".into(),
                or: true,
            },
        ])]
    );
}

#[test]
fn single_column_patterns() {
    let (predicate, _) = compile::<PostSearch>();
    let filter = PostSearch {
        q: String::new(),
        slug: "draft-".into(),
        domain: Some("@example.com".into()),
    };

    let calls = run(&predicate, &filter, Some("p"));
    assert_eq!(
        calls,
        vec![
            Call::Match {
                pattern: Operator::NotIStartsWith.pattern().unwrap(),
                column: "p.slug".into(),
                text: "draft-".into(),
                or: false,
            },
            Call::Match {
                pattern: Operator::EndsWith.pattern().unwrap(),
                column: "a.email".into(),
                text: "@example.com".into(),
                or: false,
            },
        ]
    );

    let Call::Match { pattern, text, .. } = &calls[0] else {
        unreachable!()
    };
    assert_eq!(pattern.like_pattern(text), "draft-%");
}

// ============================================================================
// Range, set and null families
// ============================================================================

#[derive(Filter, Default)]
struct OrderSearch {
    #[search("between,column=created_at,params=type:date delimiter::")]
    created: String,
    #[search("notBetween")]
    total: Option<Between<i64>>,
    #[search("between,column=qty")]
    qty: Vec<i32>,
    #[search("in,column=id,params=type:int")]
    ids: String,
    #[search("notIn,column=state")]
    states: Vec<String>,
    #[search("isNull,column=shipped_at")]
    unshipped: NullBool,
    #[search("isNotNull,column=paid_at")]
    paid: bool,
}

#[test]
fn range_set_and_null_values() {
    let (predicate, sink) = compile::<OrderSearch>();
    let filter = OrderSearch {
        created: "2024-01-01:2024-01-31".into(),
        total: Some(Between::new(10, 100)),
        qty: vec![1, 5],
        ids: "1, 2,3".into(),
        states: vec!["void".into()],
        unshipped: NullBool::new(true),
        paid: false,
    };

    assert_eq!(
        run(&predicate, &filter, None),
        vec![
            Call::Range {
                op: Operator::Between,
                column: "created_at".into(),
                start: date(2024, 1, 1),
                end: date(2024, 1, 31),
            },
            Call::Range {
                op: Operator::NotBetween,
                column: "total".into(),
                start: int(10),
                end: int(100),
            },
            Call::Range {
                op: Operator::Between,
                column: "qty".into(),
                start: int(1),
                end: int(5),
            },
            Call::Set {
                op: Operator::In,
                column: "id".into(),
                values: vec![int(1), int(2), int(3)],
            },
            Call::Set {
                op: Operator::NotIn,
                column: "state".into(),
                values: vec![Value::from("void")],
            },
            Call::Null {
                op: Operator::IsNull,
                column: "shipped_at".into(),
            },
        ]
    );
    assert!(sink.errors().is_empty());
}

#[test]
fn malformed_values_skip_only_their_condition() {
    let (predicate, sink) = compile::<OrderSearch>();
    let filter = OrderSearch {
        created: "2024-01-01:2024-01-15:2024-01-31".into(),
        qty: vec![1],
        ids: "1,two".into(),
        paid: true,
        ..OrderSearch::default()
    };

    assert_eq!(
        run(&predicate, &filter, None),
        vec![Call::Null {
            op: Operator::IsNotNull,
            column: "paid_at".into(),
        }]
    );

    let errors = sink.errors();
    let fields: Vec<_> = errors.iter().map(|(field, _)| field.as_str()).collect();
    assert_eq!(fields, ["created", "qty", "ids"]);
    assert!(matches!(errors[0].1, FilterError::Parse { .. }));
    assert_eq!(errors[1].1, FilterError::RangeArity { found: 1 });
}

#[test]
fn empty_inputs_are_quiet() {
    let (predicate, sink) = compile::<OrderSearch>();
    assert!(run(&predicate, &OrderSearch::default(), None).is_empty());
    assert!(sink.errors().is_empty());
    assert!(sink
        .skips
        .lock()
        .unwrap()
        .contains(&("unshipped".to_string(), Skip::NotPresent)));
}

#[test]
fn three_element_range_sequence_warns() {
    let (predicate, sink) = compile::<OrderSearch>();
    let filter = OrderSearch {
        qty: vec![1, 5, 9],
        ..OrderSearch::default()
    };
    assert!(run(&predicate, &filter, None).is_empty());
    assert_eq!(
        sink.errors(),
        vec![("qty".to_string(), FilterError::RangeArity { found: 3 })]
    );
}

// ============================================================================
// Sequences of optional values
// ============================================================================

#[derive(Filter, Default)]
struct SpanSearch {
    #[search("between")]
    span: Vec<Option<i64>>,
    #[search("in,column=id")]
    ids: Vec<Option<i64>>,
}

#[test]
fn sequence_with_absent_element_is_not_present() {
    let (predicate, sink) = compile::<SpanSearch>();
    let filter = SpanSearch {
        span: vec![Some(1), None, Some(9)],
        ids: vec![Some(1), None],
    };
    assert!(run(&predicate, &filter, None).is_empty());
    assert!(sink.errors().is_empty());

    let skips = sink.skips.lock().unwrap();
    assert!(skips.contains(&("span".to_string(), Skip::NotPresent)));
    assert!(skips.contains(&("ids".to_string(), Skip::NotPresent)));
}

#[test]
fn complete_optional_sequences_apply() {
    let (predicate, _) = compile::<SpanSearch>();
    let filter = SpanSearch {
        span: vec![Some(1), Some(9)],
        ids: vec![Some(4)],
    };
    assert_eq!(
        run(&predicate, &filter, None),
        vec![
            Call::Range {
                op: Operator::Between,
                column: "span".into(),
                start: int(1),
                end: int(9),
            },
            Call::Set {
                op: Operator::In,
                column: "id".into(),
                values: vec![int(4)],
            },
        ]
    );
}

// ============================================================================
// Default parameter
// ============================================================================

#[derive(Filter, Default)]
struct DefaultSearch {
    #[search("eq,params=default:open")]
    status: Option<String>,
    #[search("eq,column=kind,params=default:open")]
    kind: NullString,
    #[search("between,params=type:int default:0,10")]
    span: String,
}

#[test]
fn default_param_may_contain_commas() {
    let (predicate, sink) = compile::<DefaultSearch>();
    assert_eq!(predicate.conditions().len(), 3);
    assert!(sink.errors().is_empty());
    assert_eq!(predicate.conditions()[2].params().default_value(), Some("0,10"));
}

#[test]
fn default_never_fills_absent_values() {
    let (predicate, sink) = compile::<DefaultSearch>();
    assert_eq!(
        run(&predicate, &DefaultSearch::default(), None),
        vec![Call::Range {
            op: Operator::Between,
            column: "span".into(),
            start: int(0),
            end: int(10),
        }]
    );
    assert!(sink.errors().is_empty());

    let skips = sink.skips.lock().unwrap();
    assert!(skips.contains(&("status".to_string(), Skip::NotPresent)));
    assert!(skips.contains(&("kind".to_string(), Skip::NotPresent)));
}

#[test]
fn default_fills_present_empty_strings() {
    let (predicate, _) = compile::<DefaultSearch>();
    let filter = DefaultSearch {
        status: Some(String::new()),
        kind: NullString::new(String::new()),
        span: "3,4".into(),
    };
    assert_eq!(
        run(&predicate, &filter, None),
        vec![
            compare(Operator::Eq, "status", Value::from("open")),
            compare(Operator::Eq, "kind", Value::from("open")),
            Call::Range {
                op: Operator::Between,
                column: "span".into(),
                start: int(3),
                end: int(4),
            },
        ]
    );
}

// ============================================================================
// Nullable wrappers
// ============================================================================

#[derive(Filter, Default)]
struct ScoreSearch {
    #[search("gte")]
    score: NullInt32,
    name: NullString,
}

#[test]
fn valid_zero_values_apply() {
    let (predicate, _) = compile::<ScoreSearch>();
    let filter = ScoreSearch {
        score: NullInt32::new(0),
        name: NullString::new(String::new()),
    };
    assert_eq!(
        run(&predicate, &filter, None),
        vec![
            compare(Operator::Gte, "score", int(0)),
            compare(Operator::Eq, "name", Value::from("")),
        ]
    );
    assert!(run(&predicate, &ScoreSearch::default(), None).is_empty());
}

#[test]
fn nullable_fields_deserialize_from_json() {
    #[derive(Filter, serde::Deserialize)]
    struct JsonSearch {
        #[serde(default)]
        score: NullInt32,
        #[serde(default)]
        name: NullString,
    }

    let filter: JsonSearch = serde_json::from_str(r#"{"score": 7, "name": null}"#).unwrap();
    let predicate = Predicate::<JsonSearch>::compile();
    assert_eq!(
        run(&predicate, &filter, None),
        vec![compare(Operator::Eq, "score", int(7))]
    );
}

// ============================================================================
// Nested records
// ============================================================================

#[derive(Filter, Default)]
struct AuthorSearch {
    #[search("iContains,column=name,alias=a")]
    name: Option<String>,
    #[search("-")]
    token: String,
}

#[derive(Filter, Default)]
struct Paging {
    #[search("gt,column=id")]
    after: Option<i64>,
}

#[derive(Filter, Default)]
struct ArticleSearch {
    #[search("dive")]
    author: Option<AuthorSearch>,
    #[search(flatten)]
    paging: Paging,
    #[search(skip)]
    limit: u32,
    title: Option<String>,
}

#[test]
fn dive_and_flatten_walk_nested_records() {
    let (predicate, sink) = compile::<ArticleSearch>();
    let names: Vec<_> = predicate
        .conditions()
        .iter()
        .map(|c| c.field_name())
        .collect();
    assert_eq!(names, ["author.name", "paging.after", "title"]);

    let filter = ArticleSearch {
        author: Some(AuthorSearch {
            name: Some("lee".into()),
            token: "secret".into(),
        }),
        paging: Paging { after: Some(40) },
        limit: 10,
        title: Some("intro".into()),
    };
    assert_eq!(
        run(&predicate, &filter, Some("p")),
        vec![
            Call::Match {
                pattern: Operator::IContains.pattern().unwrap(),
                column: "a.name".into(),
                text: "lee".into(),
                or: false,
            },
            compare(Operator::Gt, "p.id", int(40)),
            compare(Operator::Eq, "p.title", Value::from("intro")),
        ]
    );
    assert!(sink.errors().is_empty());
}

#[test]
fn absent_nested_record_is_not_present() {
    let (predicate, sink) = compile::<ArticleSearch>();
    let filter = ArticleSearch {
        title: Some("intro".into()),
        ..ArticleSearch::default()
    };
    assert_eq!(run(&predicate, &filter, None).len(), 1);
    assert!(sink
        .skips
        .lock()
        .unwrap()
        .contains(&("author.name".to_string(), Skip::NotPresent)));
}

#[derive(Filter)]
struct Node {
    id: Option<i64>,
    #[search(flatten)]
    parent: Option<Box<Node>>,
}

#[test]
fn self_referencing_filter_is_cut_at_depth_limit() {
    let (predicate, sink) = compile::<Node>();
    assert_eq!(predicate.conditions().len(), MAX_DEPTH + 1);
    assert_eq!(
        sink.errors(),
        vec![(
            format!("parent{}", ".parent".repeat(MAX_DEPTH)),
            FilterError::DepthLimit { depth: MAX_DEPTH }
        )]
    );

    let filter = Node {
        id: None,
        parent: Some(Box::new(Node {
            id: Some(7),
            parent: None,
        })),
    };
    assert_eq!(
        run(&predicate, &filter, None),
        vec![compare(Operator::Eq, "id", int(7))]
    );
}

// ============================================================================
// Compile-time diagnostics
// ============================================================================

#[derive(Filter, Default)]
struct BrokenSearch {
    #[search("fuzzy")]
    a: Option<String>,
    #[search("eq,column=x|y")]
    b: Option<String>,
    #[search("eq,column=drop table")]
    c: Option<String>,
    #[search("eq,params=type:money")]
    d: Option<String>,
    #[search("lt")]
    e: Option<i32>,
}

#[test]
fn malformed_annotations_drop_only_their_field() {
    let (predicate, sink) = compile::<BrokenSearch>();
    assert_eq!(predicate.conditions().len(), 1);
    assert_eq!(
        sink.errors(),
        vec![
            ("a".to_string(), FilterError::UnknownOperator("fuzzy".into())),
            (
                "b".to_string(),
                FilterError::MultiColumn {
                    op: Operator::Eq,
                    count: 2
                }
            ),
            (
                "c".to_string(),
                FilterError::InvalidIdentifier("drop table".into())
            ),
            (
                "d".to_string(),
                FilterError::UnknownValueType("money".into())
            ),
        ]
    );

    let filter = BrokenSearch {
        a: Some("x".into()),
        e: Some(3),
        ..BrokenSearch::default()
    };
    assert_eq!(
        run(&predicate, &filter, None),
        vec![compare(Operator::Lt, "e", int(3))]
    );
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn fragments_compose_with_other_builder_calls() {
    let predicate = Predicate::<UserSearch>::builder()
        .default_alias("u")
        .build();
    let filter = UserSearch {
        min_age: Some(21),
        ..UserSearch::default()
    };

    let mut recorder = Recorder::new();
    recorder
        .apply(|b| b.is_null("deleted_at"))
        .apply(predicate.scope(&filter, None))
        .apply_if(false, predicate.scope(&filter, Some("never")));

    let applier = predicate.as_applier::<Recorder>();
    let fragments: Vec<_> = [&filter, &filter].into_iter().map(&applier).collect();
    for fragment in fragments {
        recorder.group(fragment);
    }

    assert_eq!(
        recorder.into_calls(),
        vec![
            Call::Null {
                op: Operator::IsNull,
                column: "deleted_at".into(),
            },
            compare(Operator::Gte, "u.min_age", int(21)),
            Call::Group(vec![compare(Operator::Gte, "u.min_age", int(21))]),
            Call::Group(vec![compare(Operator::Gte, "u.min_age", int(21))]),
        ]
    );
}

#[test]
fn one_predicate_serves_many_threads() {
    let predicate = Predicate::<UserSearch>::compile();

    let results: Vec<Vec<Call>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|age| {
                let predicate = &predicate;
                scope.spawn(move || {
                    let filter = UserSearch {
                        min_age: Some(age),
                        ..UserSearch::default()
                    };
                    run(predicate, &filter, None)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (age, calls) in results.into_iter().enumerate() {
        assert_eq!(
            calls,
            vec![compare(Operator::Gte, "min_age", int(age as i64))]
        );
    }
}
