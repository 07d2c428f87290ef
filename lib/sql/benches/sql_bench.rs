use criterion::{black_box, criterion_group, criterion_main, Criterion};

use openhome_sql::{SQLStore, SqliteStore, TxStmt, Value};

fn bench_exec_insert(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .exec(
            "CREATE TABLE bench (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, value REAL)",
            &[],
        )
        .unwrap();

    c.bench_function("sqlite_insert", |b| {
        b.iter(|| {
            store
                .exec(
                    "INSERT INTO bench (name, value) VALUES (?1, ?2)",
                    &[
                        Value::Text("item-bench".to_string()),
                        Value::Real(42.5),
                    ],
                )
                .unwrap();
        });
    });
}

fn bench_query_by_id(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .exec(
            "CREATE TABLE bench (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)",
            &[],
        )
        .unwrap();
    for i in 0..1000 {
        store
            .exec(
                "INSERT INTO bench (name) VALUES (?1)",
                &[Value::Text(format!("item-{}", i))],
            )
            .unwrap();
    }

    c.bench_function("sqlite_query_by_id", |b| {
        b.iter(|| {
            let rows = store
                .query(
                    "SELECT name FROM bench WHERE id = ?1",
                    &[Value::Integer(black_box(500))],
                )
                .unwrap();
            black_box(rows);
        });
    });
}

fn bench_exec_tx_pair(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .exec(
            "CREATE TABLE edges (a TEXT, b TEXT, PRIMARY KEY (a, b))",
            &[],
        )
        .unwrap();
    store
        .exec("CREATE TABLE counters (id TEXT PRIMARY KEY, n INTEGER NOT NULL)", &[])
        .unwrap();
    store
        .exec(
            "INSERT INTO counters (id, n) VALUES (?1, 0)",
            &[Value::Text("c1".to_string())],
        )
        .unwrap();

    c.bench_function("sqlite_exec_tx_insert_plus_counter", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store
                .exec_tx(&[
                    TxStmt::new(
                        "INSERT INTO edges (a, b) VALUES (?1, ?2)",
                        vec![
                            Value::Text(format!("a{}", i)),
                            Value::Text("b".to_string()),
                        ],
                    ),
                    TxStmt::new(
                        "UPDATE counters SET n = n + 1 WHERE id = ?1",
                        vec![Value::Text("c1".to_string())],
                    )
                    .required(),
                ])
                .unwrap();
            i += 1;
        });
    });
}

criterion_group!(benches, bench_exec_insert, bench_query_by_id, bench_exec_tx_pair);
criterion_main!(benches);
