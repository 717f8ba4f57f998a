use criterion::{black_box, criterion_group, criterion_main, Criterion};
use news_similarity::{BruteForceIndex, NeighborIndex, TFIDFVectorizer, VectorizerConfig};

const WORDS: [&str; 24] = [
    "market", "stock", "oil", "price", "rally", "league", "cup", "final", "election", "vote",
    "senate", "storm", "rain", "flood", "chip", "phone", "launch", "orbit", "bank", "rate",
    "inflation", "goal", "coach", "trade",
];

// 擬似ランダムな見出し + 本文
fn synthetic_corpus(docs: usize) -> Vec<String> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..docs)
        .map(|_| {
            (0..30)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    WORDS[(state % WORDS.len() as u64) as usize]
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn fit_and_query_benchmark(c: &mut Criterion) {
    let texts = synthetic_corpus(5_000);

    c.bench_function("fit_transform_5k", |b| {
        b.iter(|| {
            let (vectorizer, matrix) =
                TFIDFVectorizer::<f64>::fit_transform(VectorizerConfig::default(), &texts).unwrap();
            black_box((vectorizer.vocab_size(), matrix.len()))
        });
    });

    let (vectorizer, matrix) = TFIDFVectorizer::<f64>::fit_transform(VectorizerConfig::default(), &texts).unwrap();
    let index = BruteForceIndex::fit(matrix).unwrap();
    let query = vectorizer.transform_one(&texts[0]);

    c.bench_function("kneighbors_5k", |b| {
        b.iter(|| index.kneighbors(black_box(&query), 4).unwrap());
    });

    c.bench_function("query_row_5k", |b| {
        b.iter(|| index.query(black_box(42), 3).unwrap());
    });
}

criterion_group!(benches, fit_and_query_benchmark);
criterion_main!(benches);
