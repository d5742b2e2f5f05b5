use course_core::normalizer::normalize;
use course_core::{CorpusIndex, CourseRow, RankingConfig, Recommender};
use criterion::{criterion_group, criterion_main, Criterion};

const SUBJECTS: &[&str] = &[
    "sql server database administration", "python data analysis with pandas",
    "java programming fundamentals", "web development with rust and axum",
    "machine learning for beginner analysts", "financial modeling in excel",
];

fn corpus(n: usize) -> Vec<CourseRow> {
    (0..n)
        .map(|i| CourseRow {
            title: Some(format!("Course {i}")),
            text_for_tfidf: Some(format!("{} module {}", SUBJECTS[i % SUBJECTS.len()], i % 97)),
            ..Default::default()
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let text = "The Complete Online SQL Server Course for Beginner Developers: fundamentals to advanced";
    c.bench_function("normalize_title", |b| b.iter(|| normalize(text)));
}

fn bench_recommend(c: &mut Criterion) {
    let rec = Recommender::new(CorpusIndex::build(corpus(5_000)).unwrap(), RankingConfig::default());
    let query = rec.query("python data analysis");
    c.bench_function("recommend_5k", |b| b.iter(|| rec.recommend(&query)));
}

criterion_group!(benches, bench_normalize, bench_recommend);
criterion_main!(benches);
